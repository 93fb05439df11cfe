//! Value representations shared by both store adapters.
//!
//! Every cell read from either store is converted into a [`SqlValue`] before
//! the sync engine looks at it, and converted back into the destination
//! driver's native value when written. Keeping the set of variants to the
//! five SQLite storage classes means a value read from one side can always be
//! bound on the other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dialect-neutral cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL
    Null,

    /// 64-bit signed integer
    Integer(i64),

    /// 64-bit floating point
    Real(f64),

    /// UTF-8 text, also used for temporal and decimal values
    Text(String),

    /// Raw bytes
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Whether this value is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Integer(i) => write!(f, "{i}"),
            SqlValue::Real(r) => write!(f, "{r}"),
            SqlValue::Text(s) => write!(f, "'{s}'"),
            SqlValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Blob(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Rows returned by a query, together with their column names.
///
/// Every row has exactly `columns.len()` cells, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    /// Column names in result order
    pub columns: Vec<String>,
    /// Row cells in column order
    pub rows: Vec<Vec<SqlValue>>,
}

impl ResultSet {
    /// Create a result set from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Look up a cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&SqlValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Pair each cell of `row` with its column name.
    pub fn named_row(&self, row: usize) -> Vec<(String, SqlValue)> {
        match self.rows.get(row) {
            Some(cells) => self
                .columns
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_conversion() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some("x")), SqlValue::Text("x".to_string()));
        assert!(SqlValue::from(None::<String>).is_null());
    }

    #[test]
    fn test_result_set_lookup() {
        let rs = ResultSet::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![SqlValue::Integer(1), SqlValue::from("Ada")],
                vec![SqlValue::Integer(2), SqlValue::Null],
            ],
        );

        assert_eq!(rs.len(), 2);
        assert_eq!(rs.get(0, "name"), Some(&SqlValue::from("Ada")));
        assert_eq!(rs.get(1, "name"), Some(&SqlValue::Null));
        assert_eq!(rs.get(0, "missing"), None);
        assert_eq!(rs.get(5, "id"), None);

        let named = rs.named_row(0);
        assert_eq!(named[0], ("id".to_string(), SqlValue::Integer(1)));
        assert!(rs.named_row(9).is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlValue::Null.to_string(), "NULL");
        assert_eq!(SqlValue::from("S1").to_string(), "'S1'");
        assert_eq!(SqlValue::Blob(vec![1, 2, 3]).to_string(), "<3 bytes>");
    }
}
