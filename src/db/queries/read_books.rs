use crate::db::DbPool;
use crate::db::models::ReadBook;
use crate::db::paging::{Bind, Page, paged_query};
use crate::db::queries::unique;
use crate::error::RepoError;
use crate::sanitize::sanitize;
use crate::validation::{FieldError, Outcome};

fn validate_grade(grade: Option<i32>) -> Vec<FieldError> {
    match grade {
        Some(g) if (1..=5).contains(&g) => Vec::new(),
        _ => vec![FieldError::new(
            "grade",
            "Grade must be an integer between 1 and 5",
        )],
    }
}

/// The review for one (user, book) pair, if any. Callers must consult
/// this before create (reject when present) and update (reject when
/// absent); the pair is unique.
pub async fn get_by_user_and_book(
    pool: &DbPool,
    user_id: i64,
    book_id: i64,
) -> Result<Option<ReadBook>, RepoError> {
    sqlx::query_as::<_, ReadBook>("SELECT * FROM read_books WHERE user_id = ? AND book_id = ?")
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(pool)
        .await
        .map_err(RepoError::database)
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<ReadBook>, RepoError> {
    sqlx::query_as::<_, ReadBook>("SELECT * FROM read_books WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(RepoError::database)
}

/// Paginated reviews for one user, ordered by id.
pub async fn find_by_user(
    pool: &DbPool,
    user_id: i64,
    offset: i64,
    limit: i64,
) -> Result<Page<ReadBook>, RepoError> {
    let resource = format!("users/{user_id}/read");
    paged_query(
        pool,
        &resource,
        "SELECT * FROM read_books WHERE user_id = ? ORDER BY id LIMIT ? OFFSET ?",
        &[Bind::Int(user_id)],
        offset,
        limit,
        None,
    )
    .await
}

/// Record that a user has read a book. At most one review per
/// (user, book) pair; a race lost to the UNIQUE constraint surfaces as
/// the same conflict the caller-level existence check reports.
pub async fn create(
    pool: &DbPool,
    user_id: i64,
    book_id: i64,
    grade: Option<i32>,
    review: &str,
) -> Result<Outcome<ReadBook>, RepoError> {
    let errors = validate_grade(grade);
    if !errors.is_empty() {
        return Ok(Outcome::invalid(errors));
    }
    let review = sanitize(review);

    let result =
        sqlx::query("INSERT INTO read_books (user_id, book_id, grade, review) VALUES (?, ?, ?, ?)")
            .bind(user_id)
            .bind(book_id)
            .bind(grade)
            .bind(&review)
            .execute(pool)
            .await;

    if let Err(err) = result {
        if unique::is_unique_violation(&err) {
            return Err(RepoError::Conflict("Review already exists.".to_string()));
        }
        return Err(RepoError::database(err));
    }

    let read_book = get_by_user_and_book(pool, user_id, book_id)
        .await?
        .ok_or(RepoError::Database)?;
    Ok(Outcome::ok(read_book))
}

/// Update a review, defaulting omitted grade/review to the stored values
/// before re-validating.
pub async fn update(
    pool: &DbPool,
    user_id: i64,
    book_id: i64,
    grade: Option<i32>,
    review: Option<&str>,
) -> Result<Outcome<ReadBook>, RepoError> {
    let Some(prior) = get_by_user_and_book(pool, user_id, book_id).await? else {
        return Err(RepoError::NotFound("Review does not exist.".to_string()));
    };

    let grade = grade.or(Some(prior.grade));
    let review = match review {
        Some(text) => sanitize(text),
        None => prior.review.clone(),
    };

    let errors = validate_grade(grade);
    if !errors.is_empty() {
        return Ok(Outcome::invalid(errors));
    }

    sqlx::query("UPDATE read_books SET grade = ?, review = ? WHERE id = ?")
        .bind(grade)
        .bind(&review)
        .bind(prior.id)
        .execute(pool)
        .await
        .map_err(RepoError::database)?;

    let updated = find_by_id(pool, prior.id).await?.ok_or(RepoError::Database)?;
    Ok(Outcome::ok(updated))
}

pub async fn delete_by_id(pool: &DbPool, id: i64) -> Result<(), RepoError> {
    sqlx::query("DELETE FROM read_books WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(RepoError::database)?;
    Ok(())
}
