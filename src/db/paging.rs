use serde::Serialize;

use crate::db::DbPool;
use crate::error::RepoError;

/// Self-describing navigation link inside a page envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub href: String,
}

/// Envelope for every multi-row read: the rows plus the window they came
/// from and links to the neighbouring windows.
///
/// `next` is a "maybe more" signal: it appears whenever the page came back
/// full, without a separate total-count query, so a listing whose row count
/// is an exact multiple of `limit` ends with one empty page.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub limit: i64,
    pub offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
}

impl<T> Page<T> {
    /// Wrap a fetched window. `resource` is the path the links point back
    /// at, always a fixed string chosen by the repository, never client
    /// input.
    pub fn new(
        resource: &str,
        items: Vec<T>,
        offset: i64,
        limit: i64,
        search: Option<&str>,
    ) -> Self {
        let prev = (offset > 0).then(|| PageLink {
            href: page_href(resource, offset - limit, limit, search),
        });
        let next = (items.len() as i64 >= limit).then(|| PageLink {
            href: page_href(resource, offset + limit, limit, search),
        });
        Self {
            items,
            limit,
            offset,
            prev,
            next,
        }
    }
}

fn page_href(resource: &str, offset: i64, limit: i64, search: Option<&str>) -> String {
    match search {
        Some(term) => format!(
            "/{resource}?search={}&offset={offset}&limit={limit}",
            urlencoding::encode(term)
        ),
        None => format!("/{resource}?offset={offset}&limit={limit}"),
    }
}

/// Query parameter accepted by [`paged_query`].
#[derive(Debug, Clone, Copy)]
pub enum Bind<'a> {
    Text(&'a str),
    Int(i64),
}

/// Execute a bounded query and wrap the rows in a [`Page`].
///
/// `sql` must end with `LIMIT ? OFFSET ?`; the window is bound as
/// parameters after `params`, never interpolated. A storage error is
/// logged here and surfaces as the masked `RepoError::Database`.
pub async fn paged_query<T>(
    pool: &DbPool,
    resource: &str,
    sql: &str,
    params: &[Bind<'_>],
    offset: i64,
    limit: i64,
    search: Option<&str>,
) -> Result<Page<T>, RepoError>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::any::AnyRow> + Send + Unpin,
{
    let mut query = sqlx::query_as::<sqlx::Any, T>(sql);
    for param in params {
        query = match param {
            Bind::Text(value) => query.bind(*value),
            Bind::Int(value) => query.bind(*value),
        };
    }
    let items = query
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(RepoError::database)?;

    Ok(Page::new(resource, items, offset, limit, search))
}
