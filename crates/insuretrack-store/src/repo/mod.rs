//! Per-entity SQLite repositories
//!
//! Repositories are stateless: every function takes the connection (or a
//! transaction, which derefs to one) it should run on. Row-level access
//! control is the engine's job; list functions only accept an optional owner
//! filter.

use std::str::FromStr;

use insuretrack_core::errors::TrackerError;
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, Row};

use crate::errors::{from_rusqlite, Result};

pub mod claims;
pub mod notifications;
pub mod policies;
pub mod users;

pub use claims::{ClaimFilter, ClaimRepo};
pub use notifications::NotificationRepo;
pub use policies::{PolicyFilter, PolicyRepo};
pub use users::{UserFilter, UserRepo};

/// Rows per page for every paginated list
pub const PER_PAGE: u32 = 10;

/// One page of a filtered, ordered listing. Pages are numbered from 1; a
/// page past the end is empty rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        let per_page = u64::from(self.per_page.max(1));
        u32::try_from(self.total.div_ceil(per_page)).unwrap_or(u32::MAX)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// `WHERE` clause assembled from optional filters
#[derive(Debug, Default)]
pub(crate) struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    /// Add a condition; `?` placeholders bind `params` in order
    pub(crate) fn push(&mut self, condition: &str, params: impl IntoIterator<Item = Value>) {
        self.conditions.push(format!("({})", condition));
        self.params.extend(params);
    }

    /// Substring match on any of `columns`, case-insensitive for ASCII
    pub(crate) fn push_search(&mut self, columns: &[&str], needle: &str) {
        let pattern = like_pattern(needle);
        let condition = columns
            .iter()
            .map(|c| format!("{} LIKE ? ESCAPE '\\'", c))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.push(
            &condition,
            columns.iter().map(|_| Value::Text(pattern.clone())),
        );
    }

    fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }
}

fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Run the count and the page query for `table` under `filter`
pub(crate) fn fetch_page<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    filter: &WhereClause,
    order_by: &str,
    page: u32,
    map_row: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Page<T>> {
    let page = page.max(1);
    let where_sql = filter.sql();

    let total: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM {}{}", table, where_sql),
            rusqlite::params_from_iter(filter.params.iter()),
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;

    let mut params = filter.params.clone();
    params.push(Value::Integer(i64::from(PER_PAGE)));
    params.push(Value::Integer(i64::from(page - 1) * i64::from(PER_PAGE)));

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM {}{} ORDER BY {} LIMIT ? OFFSET ?",
            columns, table, where_sql, order_by
        ))
        .map_err(from_rusqlite)?;
    let items = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), map_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(Page {
        items,
        page,
        per_page: PER_PAGE,
        total: u64::try_from(total).unwrap_or(0),
    })
}

/// Collect every row of a query
pub(crate) fn query_all<T, P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map_row: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params, map_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    Ok(rows)
}

pub(crate) fn exists<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<bool> {
    conn.query_row(&format!("SELECT EXISTS({})", sql), params, |row| {
        row.get(0)
    })
    .map_err(from_rusqlite)
}

pub(crate) fn count<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<u64> {
    let n: i64 = conn
        .query_row(sql, params, |row| row.get(0))
        .map_err(from_rusqlite)?;
    Ok(u64::try_from(n).unwrap_or(0))
}

/// Read a TEXT column into one of the closed enums
pub(crate) fn text_enum<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = TrackerError>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: TrackerError| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_page_arithmetic() {
        let page: Page<()> = Page {
            items: vec![],
            page: 2,
            per_page: 10,
            total: 21,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_prev());

        let empty: Page<()> = Page {
            items: vec![],
            page: 1,
            per_page: 10,
            total: 0,
        };
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_next());
    }
}
