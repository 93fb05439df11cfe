//! Forward conversion: SqlValue → MySQLValue
//!
//! This module implements `From<SqlValue>` for `MySQLValue`, converting
//! sync-core values into MySQL values for bound statement parameters.

use mysql_async::{Params, Value};
use sync_core::SqlValue;

/// MySQL value wrapper for type-safe conversions.
#[derive(Debug, Clone, PartialEq)]
pub struct MySQLValue(pub Value);

impl MySQLValue {
    /// Get the inner mysql_async::Value.
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Get a reference to the inner value.
    pub fn as_inner(&self) -> &Value {
        &self.0
    }
}

impl From<SqlValue> for MySQLValue {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => MySQLValue(Value::NULL),
            SqlValue::Integer(i) => MySQLValue(Value::Int(i)),
            SqlValue::Real(f) => MySQLValue(Value::Double(f)),
            // Temporal and decimal values travel as text; MySQL coerces them
            // to the column type on insert and comparison.
            SqlValue::Text(s) => MySQLValue(Value::Bytes(s.into_bytes())),
            SqlValue::Blob(b) => MySQLValue(Value::Bytes(b)),
        }
    }
}

/// Build positional statement parameters.
pub fn to_params(values: Vec<SqlValue>) -> Params {
    if values.is_empty() {
        Params::Empty
    } else {
        Params::Positional(
            values
                .into_iter()
                .map(|v| MySQLValue::from(v).into_inner())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(MySQLValue::from(SqlValue::Null).into_inner(), Value::NULL);
        assert_eq!(
            MySQLValue::from(SqlValue::Real(1.5)).into_inner(),
            Value::Double(1.5)
        );
        assert_eq!(
            MySQLValue::from(SqlValue::from("2024-01-01 00:00:00")).into_inner(),
            Value::Bytes(b"2024-01-01 00:00:00".to_vec())
        );
        assert_eq!(
            MySQLValue::from(SqlValue::Blob(vec![0, 159])).into_inner(),
            Value::Bytes(vec![0, 159])
        );
    }

    #[test]
    fn test_params() {
        assert!(matches!(to_params(Vec::new()), Params::Empty));
        match to_params(vec![SqlValue::Integer(7), SqlValue::Null]) {
            Params::Positional(values) => {
                assert_eq!(values, vec![Value::Int(7), Value::NULL]);
            }
            other => panic!("expected positional params, got {other:?}"),
        }
    }
}
