//! SQLite value conversions for sync-core types.
//!
//! SQLite's five storage classes map one-to-one onto
//! [`SqlValue`](sync_core::SqlValue), so both directions are lossless.
//!
//! # Example
//!
//! ```rust
//! use sqlite_types::SqliteValue;
//! use sync_core::SqlValue;
//!
//! let value = SqliteValue::from(SqlValue::from("S1"));
//! let back: SqlValue = value.into();
//! assert_eq!(back, SqlValue::from("S1"));
//! ```

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::ToSql;
use sync_core::SqlValue;

/// SQLite value wrapper for type-safe conversions.
#[derive(Debug, Clone, PartialEq)]
pub struct SqliteValue(pub Value);

impl SqliteValue {
    /// Get the inner rusqlite value.
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Copy a borrowed cell out of a row.
    pub fn from_ref(value: ValueRef<'_>) -> Self {
        SqliteValue(Value::from(value))
    }
}

impl From<SqlValue> for SqliteValue {
    fn from(value: SqlValue) -> Self {
        SqliteValue(match value {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(i) => Value::Integer(i),
            SqlValue::Real(f) => Value::Real(f),
            SqlValue::Text(s) => Value::Text(s),
            SqlValue::Blob(b) => Value::Blob(b),
        })
    }
}

impl From<SqliteValue> for SqlValue {
    fn from(value: SqliteValue) -> Self {
        match value.0 {
            Value::Null => SqlValue::Null,
            Value::Integer(i) => SqlValue::Integer(i),
            Value::Real(f) => SqlValue::Real(f),
            Value::Text(s) => SqlValue::Text(s),
            Value::Blob(b) => SqlValue::Blob(b),
        }
    }
}

impl ToSql for SqliteValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

/// Convert a list of sync-core values into bindable SQLite parameters.
pub fn to_params(values: Vec<SqlValue>) -> Vec<SqliteValue> {
    values.into_iter().map(SqliteValue::from).collect()
}

/// Read every cell of a row as sync-core values.
pub fn row_to_sql_values(row: &rusqlite::Row<'_>, width: usize) -> rusqlite::Result<Vec<SqlValue>> {
    let mut values = Vec::with_capacity(width);
    for idx in 0..width {
        values.push(SqliteValue::from_ref(row.get_ref(idx)?).into());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_values_bind_and_read_back() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (a, b, c, d, e)").unwrap();

        let input = vec![
            SqlValue::Null,
            SqlValue::Integer(-3),
            SqlValue::Real(0.25),
            SqlValue::from("2024-01-01 00:00:00"),
            SqlValue::Blob(vec![0, 1, 255]),
        ];
        let params = to_params(input.clone());
        conn.execute(
            "INSERT INTO t VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params_from_iter(params.iter()),
        )
        .unwrap();

        let mut stmt = conn.prepare("SELECT a, b, c, d, e FROM t").unwrap();
        let rows: Vec<Vec<SqlValue>> = stmt
            .query_map([], |row| row_to_sql_values(row, 5))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows, vec![input]);
    }
}
