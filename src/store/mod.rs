//! Store adapters.
//!
//! A [`StoreConnector`] is configured once at startup and opens a fresh
//! [`StoreAdapter`] for every sync run. Adapters execute dialect-neutral
//! [`Statement`]s and transaction operations; they never see sync semantics.
//!
//! - [`LocalStore`] / [`SqliteAdapter`] - the embedded SQLite file
//! - [`RemoteStore`] / [`MySqlAdapter`] - the shared MySQL server

use async_trait::async_trait;
use sync_core::ResultSet;
use thiserror::Error;

mod local;
mod remote;
pub mod statement;

pub use local::{LocalStore, SqliteAdapter};
pub use remote::{MySqlAdapter, RemoteStore};
pub use statement::{Dialect, RenderedStatement, Statement, StatementKind, TxOp};

/// Errors raised by a store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or opened
    #[error("cannot connect to {store} store: {message}")]
    ConnectionFailure { store: String, message: String },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    MySql(#[from] mysql_async::Error),

    #[error(transparent)]
    Conversion(#[from] mysql_types::ConversionError),

    /// The table does not exist on the store
    #[error("table '{0}' does not exist")]
    TableNotFound(String),
}

impl StoreError {
    pub fn connection(store: impl Into<String>, message: impl ToString) -> Self {
        StoreError::ConnectionFailure {
            store: store.into(),
            message: message.to_string(),
        }
    }
}

/// An open session on one store.
///
/// Sessions are used by one task at a time and closed at the end of a run.
#[async_trait]
pub trait StoreAdapter: Send {
    /// Short name used in logs ("local", "remote").
    fn label(&self) -> &str;

    /// Column names of `table`, in table order.
    async fn table_columns(&mut self, table: &str) -> Result<Vec<String>, StoreError>;

    /// Run a statement that returns rows.
    async fn query(&mut self, statement: &Statement) -> Result<ResultSet, StoreError>;

    /// Run a statement that modifies rows, returning the affected row count.
    async fn execute(&mut self, statement: &Statement) -> Result<u64, StoreError>;

    async fn transaction(&mut self, op: TxOp) -> Result<(), StoreError>;

    /// End the session and release its connection.
    async fn close(self: Box<Self>) -> Result<(), StoreError>;
}

/// Configured access to a store.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    fn label(&self) -> &str;

    /// Open a session. Failure is a [`StoreError::ConnectionFailure`].
    async fn open(&self) -> Result<Box<dyn StoreAdapter>, StoreError>;

    /// Release process-wide resources such as connection pools.
    async fn shutdown(&self) {}
}
