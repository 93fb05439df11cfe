//! Core types for the dual-sync engine.
//!
//! This crate provides the foundational types shared by the store adapters,
//! the per-database conversion crates and the sync engine itself:
//!
//! - [`SqlValue`] - Dialect-neutral cell value
//! - [`ResultSet`] - Rows plus their column names
//! - [`Direction`] / [`Leg`] - Which way records flow
//! - [`SyncMode`] - Merge policy of a table
//! - [`TableDescriptor`] / [`TablePlan`] - Static table metadata and the
//!   per-run column plan derived from both schemas
//!
//! # Architecture
//!
//! ```text
//! sync-core (this crate)
//!    │
//!    ├─── sqlite-types   (SqlValue <-> rusqlite values)
//!    ├─── mysql-types    (SqlValue <-> mysql_async values)
//!    └─── dual-sync      (adapters, strategies, manager, daemon)
//! ```
//!
//! # Example
//!
//! ```rust
//! use sync_core::{Leg, TableDescriptor};
//!
//! let requests = TableDescriptor::append_only(
//!     "requests",
//!     "id",
//!     ["student_id", "request_type", "created_at"],
//!     Leg::Pull,
//! );
//! assert!(requests.validate().is_ok());
//! ```

pub mod schema;
pub mod types;
pub mod values;

pub use schema::{SchemaError, TableDescriptor, TablePlan};
pub use types::{Direction, Leg, SyncMode};
pub use values::{ResultSet, SqlValue};
