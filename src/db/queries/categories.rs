use crate::db::DbPool;
use crate::db::models::Category;
use crate::db::paging::{Page, paged_query};
use crate::db::queries::unique;
use crate::error::RepoError;
use crate::sanitize::sanitize;
use crate::validation::{FieldError, Outcome};

fn validate_title(title: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if title.is_empty() {
        errors.push(FieldError::new("title", "Title must be a non-empty string"));
    }
    errors
}

/// Create a category. Categories have no update path, so the uniqueness
/// scan never excludes a row.
pub async fn create(pool: &DbPool, title: &str) -> Result<Outcome<Category>, RepoError> {
    let title = sanitize(title);

    let mut errors = validate_title(&title);
    if unique::find_conflict(pool, unique::UniqueScope::CategoryTitle, None, &title)
        .await
        .map_err(RepoError::database)?
        .is_some()
    {
        errors.push(FieldError::new("title", "Category already exists"));
    }
    if !errors.is_empty() {
        return Ok(Outcome::invalid(errors));
    }

    let result = sqlx::query("INSERT INTO categories (title) VALUES (?)")
        .bind(&title)
        .execute(pool)
        .await;

    if let Err(err) = result {
        if unique::is_unique_violation(&err) {
            return Ok(Outcome::invalid(vec![FieldError::new(
                "title",
                "Category already exists",
            )]));
        }
        return Err(RepoError::database(err));
    }

    let category = read_by_title(pool, &title)
        .await?
        .ok_or(RepoError::Database)?;
    Ok(Outcome::ok(category))
}

/// Paginated listing of all categories, ordered by id.
pub async fn read_all(pool: &DbPool, offset: i64, limit: i64) -> Result<Page<Category>, RepoError> {
    paged_query(
        pool,
        "categories",
        "SELECT * FROM categories ORDER BY id LIMIT ? OFFSET ?",
        &[],
        offset,
        limit,
        None,
    )
    .await
}

/// Direct lookup by exact title. Used by the uniqueness fast path and by
/// clients resolving categories before book creation.
pub async fn read_by_title(pool: &DbPool, title: &str) -> Result<Option<Category>, RepoError> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE title = ?")
        .bind(title)
        .fetch_optional(pool)
        .await
        .map_err(RepoError::database)
}

pub async fn get_by_id(pool: &DbPool, id: i64) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}
