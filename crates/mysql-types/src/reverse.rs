//! Reverse conversion: MySQL values → SqlValue
//!
//! Temporal values are rendered as canonical text so that a value read from
//! MySQL, written to SQLite and later compared against MySQL again yields the
//! same string every run.

use chrono::NaiveDate;
use mysql_async::consts::ColumnType;
use mysql_async::{Row, Value};
use sync_core::SqlValue;
use thiserror::Error;

/// Character set id MySQL reports for binary columns.
const BINARY_CHARSET: u16 = 63;

/// MySQL value with the column metadata needed to convert it.
#[derive(Debug, Clone)]
pub struct MySQLValueWithSchema {
    /// The raw MySQL value.
    pub value: Value,
    /// The MySQL column type.
    pub column_type: ColumnType,
    /// Whether the column uses the binary character set.
    pub binary: bool,
}

/// Error during MySQL value conversion.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Invalid date/time value: {0:?}")]
    InvalidDateTime(Value),
    #[error("Invalid numeric text for {column_type:?}: {text}")]
    InvalidNumber {
        column_type: ColumnType,
        text: String,
    },
    #[error("Column {0} missing from row")]
    MissingColumn(usize),
}

impl MySQLValueWithSchema {
    /// Create a new MySQLValueWithSchema.
    pub fn new(value: Value, column_type: ColumnType) -> Self {
        Self {
            value,
            column_type,
            binary: false,
        }
    }

    /// Mark the column as binary.
    pub fn binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    /// Convert to SqlValue.
    pub fn to_sql_value(self) -> Result<SqlValue, ConversionError> {
        SqlValue::try_from(self)
    }
}

impl TryFrom<MySQLValueWithSchema> for SqlValue {
    type Error = ConversionError;

    fn try_from(mv: MySQLValueWithSchema) -> Result<Self, Self::Error> {
        use ColumnType::*;

        match mv.value {
            Value::NULL => Ok(SqlValue::Null),
            Value::Int(i) => Ok(SqlValue::Integer(i)),
            Value::UInt(u) => Ok(match i64::try_from(u) {
                Ok(i) => SqlValue::Integer(i),
                Err(_) => SqlValue::Text(u.to_string()),
            }),
            Value::Float(f) => Ok(SqlValue::Real(f as f64)),
            Value::Double(f) => Ok(SqlValue::Real(f)),
            Value::Date(year, month, day, hour, minute, second, micros) => {
                if year == 0 && month == 0 && day == 0 {
                    // Zero dates have no calendar meaning.
                    return Ok(SqlValue::Null);
                }
                let invalid = || {
                    ConversionError::InvalidDateTime(Value::Date(
                        year, month, day, hour, minute, second, micros,
                    ))
                };
                let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                    .ok_or_else(invalid)?;
                match mv.column_type {
                    MYSQL_TYPE_DATE | MYSQL_TYPE_NEWDATE => {
                        Ok(SqlValue::Text(date.format("%Y-%m-%d").to_string()))
                    }
                    _ => {
                        let dt = date
                            .and_hms_micro_opt(hour as u32, minute as u32, second as u32, micros)
                            .ok_or_else(invalid)?;
                        let text = if micros == 0 {
                            dt.format("%Y-%m-%d %H:%M:%S").to_string()
                        } else {
                            dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
                        };
                        Ok(SqlValue::Text(text))
                    }
                }
            }
            Value::Time(negative, days, hours, minutes, seconds, micros) => {
                let total_hours = days * 24 + hours as u32;
                let sign = if negative { "-" } else { "" };
                let text = if micros == 0 {
                    format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}")
                } else {
                    format!("{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
                };
                Ok(SqlValue::Text(text))
            }
            Value::Bytes(bytes) => match mv.column_type {
                // Text protocol delivers numbers as ASCII digits.
                MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_LONG | MYSQL_TYPE_INT24
                | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    match text.parse::<i64>() {
                        Ok(i) => Ok(SqlValue::Integer(i)),
                        Err(_) => Err(ConversionError::InvalidNumber {
                            column_type: mv.column_type,
                            text,
                        }),
                    }
                }
                MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    match text.parse::<f64>() {
                        Ok(f) => Ok(SqlValue::Real(f)),
                        Err(_) => Err(ConversionError::InvalidNumber {
                            column_type: mv.column_type,
                            text,
                        }),
                    }
                }
                _ if mv.binary => Ok(SqlValue::Blob(bytes)),
                _ => match String::from_utf8(bytes) {
                    Ok(s) => Ok(SqlValue::Text(s)),
                    Err(e) => Ok(SqlValue::Blob(e.into_bytes())),
                },
            },
        }
    }
}

/// Column names of a row, in order.
pub fn row_column_names(row: &Row) -> Vec<String> {
    row.columns_ref()
        .iter()
        .map(|c| c.name_str().into_owned())
        .collect()
}

/// Convert every cell of a row, using the row's column metadata.
pub fn row_to_sql_values(mut row: Row) -> Result<Vec<SqlValue>, ConversionError> {
    let meta: Vec<(ColumnType, bool)> = row
        .columns_ref()
        .iter()
        .map(|c| (c.column_type(), c.character_set() == BINARY_CHARSET))
        .collect();

    let mut values = Vec::with_capacity(meta.len());
    for (idx, (column_type, binary)) in meta.into_iter().enumerate() {
        let value: Value = row.take(idx).ok_or(ConversionError::MissingColumn(idx))?;
        values.push(
            MySQLValueWithSchema::new(value, column_type)
                .binary(binary)
                .to_sql_value()?,
        );
    }
    Ok(values)
}
