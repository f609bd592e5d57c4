use serde::Deserialize;

use crate::db::DbPool;
use crate::db::models::Book;
use crate::db::paging::{Bind, Page, paged_query};
use crate::db::queries::{categories, unique};
use crate::error::RepoError;
use crate::sanitize::{sanitize, sanitize_opt};
use crate::validation::{FieldError, Outcome};

/// Candidate fields for a book create/update, as received from the route
/// layer. Missing fields default so validation can report on all of them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookInput {
    pub title: String,
    pub isbn13: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
}

impl BookInput {
    fn sanitized(&self) -> Self {
        Self {
            title: sanitize(&self.title),
            isbn13: sanitize(&self.isbn13),
            author: sanitize_opt(self.author.as_deref()),
            description: sanitize_opt(self.description.as_deref()),
            category_id: self.category_id,
        }
    }
}

/// Collect every violated rule for a (sanitized) book candidate.
/// `exclude_id` is set on the update path so a book may keep its own
/// title and ISBN.
async fn validate(
    pool: &DbPool,
    input: &BookInput,
    exclude_id: Option<i64>,
) -> Result<Vec<FieldError>, sqlx::Error> {
    let mut errors = Vec::new();

    // Two independent title rules: raw emptiness and whitespace-only.
    if input.title.is_empty() {
        errors.push(FieldError::new("title", "Title must be a non-empty string"));
    }
    if input.title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title must not be only whitespace"));
    }
    if unique::find_conflict(pool, unique::UniqueScope::BookTitle, exclude_id, &input.title)
        .await?
        .is_some()
    {
        errors.push(FieldError::new("title", "Title already exists"));
    }

    if input.isbn13.len() != 13 || !input.isbn13.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(FieldError::new(
            "isbn13",
            "ISBN-13 must be a string of exactly 13 digits",
        ));
    }
    if unique::find_conflict(
        pool,
        unique::UniqueScope::BookIsbn13,
        exclude_id,
        &input.isbn13,
    )
    .await?
    .is_some()
    {
        errors.push(FieldError::new("isbn13", "ISBN-13 already exists"));
    }

    match input.category_id {
        None => errors.push(FieldError::new("categoryId", "Category is required")),
        Some(id) => {
            if categories::get_by_id(pool, id).await?.is_none() {
                errors.push(FieldError::new("categoryId", "Category does not exist"));
            }
        }
    }

    Ok(errors)
}

/// Re-check both unique scopes after an insert/update lost a race to the
/// store's constraints, so the fault reports as the same field errors the
/// fast-path check would have produced.
async fn unique_violation_errors(
    pool: &DbPool,
    input: &BookInput,
    exclude_id: Option<i64>,
) -> Result<Vec<FieldError>, sqlx::Error> {
    let mut errors = Vec::new();
    if unique::find_conflict(pool, unique::UniqueScope::BookTitle, exclude_id, &input.title)
        .await?
        .is_some()
    {
        errors.push(FieldError::new("title", "Title already exists"));
    }
    if unique::find_conflict(
        pool,
        unique::UniqueScope::BookIsbn13,
        exclude_id,
        &input.isbn13,
    )
    .await?
    .is_some()
    {
        errors.push(FieldError::new("isbn13", "ISBN-13 already exists"));
    }
    Ok(errors)
}

/// Create a book: sanitize, validate (uniqueness included), persist, and
/// return the stored row with its generated id.
pub async fn add_one(pool: &DbPool, input: &BookInput) -> Result<Outcome<Book>, RepoError> {
    let input = input.sanitized();

    let errors = validate(pool, &input, None)
        .await
        .map_err(RepoError::database)?;
    if !errors.is_empty() {
        return Ok(Outcome::invalid(errors));
    }

    let result = sqlx::query(
        "INSERT INTO books (title, isbn13, author, description, category_id) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.isbn13)
    .bind(&input.author)
    .bind(&input.description)
    .bind(input.category_id)
    .execute(pool)
    .await;

    if let Err(err) = result {
        // Lost a check-then-insert race: the constraint is the source of
        // truth, report it as the same validation errors.
        if unique::is_unique_violation(&err) {
            let errors = unique_violation_errors(pool, &input, None)
                .await
                .map_err(RepoError::database)?;
            if !errors.is_empty() {
                return Ok(Outcome::invalid(errors));
            }
        }
        return Err(RepoError::database(err));
    }

    // AnyPool has no portable last_insert_id — fetch back via the unique ISBN.
    let book: Book = sqlx::query_as("SELECT * FROM books WHERE isbn13 = ?")
        .bind(&input.isbn13)
        .fetch_one(pool)
        .await
        .map_err(RepoError::database)?;
    Ok(Outcome::ok(book))
}

/// Paginated listing. Without a search term, all books ordered by id;
/// with one, a title search under the same envelope and link rules.
/// A blank search term is an explicit error, distinct from no results.
pub async fn find_all(
    pool: &DbPool,
    search: Option<&str>,
    offset: i64,
    limit: i64,
) -> Result<Page<Book>, RepoError> {
    match search {
        None => {
            paged_query(
                pool,
                "books",
                "SELECT * FROM books ORDER BY id LIMIT ? OFFSET ?",
                &[],
                offset,
                limit,
                None,
            )
            .await
        }
        Some(term) => {
            let term = sanitize(term);
            let term = term.trim();
            if term.is_empty() {
                return Err(RepoError::InvalidQuery(
                    "Search term must not be empty".to_string(),
                ));
            }
            let pattern = format!("%{term}%");
            paged_query(
                pool,
                "books",
                "SELECT * FROM books WHERE title LIKE ? ORDER BY id LIMIT ? OFFSET ?",
                &[Bind::Text(&pattern)],
                offset,
                limit,
                Some(term),
            )
            .await
        }
    }
}

/// Lookup by id; absence is the 404 family, not a validation failure.
pub async fn read_one(pool: &DbPool, id: i64) -> Result<Book, RepoError> {
    sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(RepoError::database)?
        .ok_or_else(|| RepoError::NotFound("Book not found".to_string()))
}

/// Update a book. The row must exist (terminal not-found otherwise);
/// uniqueness checks exclude the row itself so unchanged title/ISBN pass.
pub async fn update(pool: &DbPool, id: i64, input: &BookInput) -> Result<Outcome<Book>, RepoError> {
    read_one(pool, id).await?;

    let input = input.sanitized();
    let errors = validate(pool, &input, Some(id))
        .await
        .map_err(RepoError::database)?;
    if !errors.is_empty() {
        return Ok(Outcome::invalid(errors));
    }

    let result = sqlx::query(
        "UPDATE books SET title = ?, isbn13 = ?, author = ?, description = ?, category_id = ? \
         WHERE id = ?",
    )
    .bind(&input.title)
    .bind(&input.isbn13)
    .bind(&input.author)
    .bind(&input.description)
    .bind(input.category_id)
    .bind(id)
    .execute(pool)
    .await;

    if let Err(err) = result {
        if unique::is_unique_violation(&err) {
            let errors = unique_violation_errors(pool, &input, Some(id))
                .await
                .map_err(RepoError::database)?;
            if !errors.is_empty() {
                return Ok(Outcome::invalid(errors));
            }
        }
        return Err(RepoError::database(err));
    }

    read_one(pool, id).await.map(Outcome::ok)
}
