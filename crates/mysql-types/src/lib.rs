//! MySQL value conversions for sync-core types.
//!
//! This crate provides bidirectional conversions between sync-core's
//! [`SqlValue`](sync_core::SqlValue) and `mysql_async` values.
//!
//! # Structure
//!
//! - `forward`: Convert `SqlValue` → `MySQLValue` (for bound parameters)
//! - `reverse`: Convert MySQL values → `SqlValue` (for reading rows)
//!
//! # Example
//!
//! ```rust
//! use mysql_types::MySQLValue;
//! use sync_core::SqlValue;
//!
//! let value: MySQLValue = SqlValue::Integer(42).into();
//! assert_eq!(value.into_inner(), mysql_async::Value::Int(42));
//! ```

pub mod forward;
pub mod reverse;

pub use forward::{to_params, MySQLValue};
pub use reverse::{row_column_names, row_to_sql_values, ConversionError, MySQLValueWithSchema};
