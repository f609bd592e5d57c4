use crate::db::DbPool;

/// Fields the uniqueness checker may scan. Each scope maps to a fixed
/// query pair; callers can never feed table or column names into the SQL.
/// Username uniqueness is not listed here: user creation pre-checks it
/// with a direct `find_by_username` lookup instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueScope {
    BookTitle,
    BookIsbn13,
    CategoryTitle,
}

impl UniqueScope {
    fn query_all(self) -> &'static str {
        match self {
            UniqueScope::BookTitle => "SELECT id FROM books WHERE title = ?",
            UniqueScope::BookIsbn13 => "SELECT id FROM books WHERE isbn13 = ?",
            UniqueScope::CategoryTitle => "SELECT id FROM categories WHERE title = ?",
        }
    }

    fn query_excluding(self) -> &'static str {
        match self {
            UniqueScope::BookTitle => "SELECT id FROM books WHERE title = ? AND id <> ?",
            UniqueScope::BookIsbn13 => "SELECT id FROM books WHERE isbn13 = ? AND id <> ?",
            UniqueScope::CategoryTitle => "SELECT id FROM categories WHERE title = ? AND id <> ?",
        }
    }
}

/// Scan for a row already holding `value` in the given scope, returning
/// the conflicting row's id. On the update path `exclude_id` removes the
/// record being updated from the scan so an entity may keep its own
/// values. `value` must already be sanitized so the comparison matches
/// what would actually be stored.
pub async fn find_conflict(
    pool: &DbPool,
    scope: UniqueScope,
    exclude_id: Option<i64>,
    value: &str,
) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> = match exclude_id {
        Some(id) => {
            sqlx::query_as(scope.query_excluding())
                .bind(value)
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        None => {
            sqlx::query_as(scope.query_all())
                .bind(value)
                .fetch_optional(pool)
                .await?
        }
    };
    Ok(row.map(|(id,)| id))
}

/// True when an insert/update was rejected by a store-level unique
/// constraint. The in-code checks are a fast path; the constraint is the
/// source of truth under concurrent writes, and callers map this back to
/// the same validation-error shape.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
