//! Local SQLite store.

use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use sqlite_types::{row_to_sql_values, to_params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sync_core::ResultSet;
use tracing::debug;

use super::{Dialect, Statement, StoreAdapter, StoreConnector, StoreError, TxOp};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The SQLite database file on this machine.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    label: String,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            label: "local".to_string(),
        }
    }

    /// Use a different name in logs and errors.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StoreConnector for LocalStore {
    fn label(&self) -> &str {
        &self.label
    }

    async fn open(&self) -> Result<Box<dyn StoreAdapter>, StoreError> {
        // The file must already exist; a typo in the path should not create
        // an empty database.
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags).map_err(|e| {
            StoreError::connection(
                self.label.clone(),
                format!("{}: {e}", self.path.display()),
            )
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .and_then(|_| conn.execute_batch("PRAGMA foreign_keys = ON"))
            .map_err(|e| StoreError::connection(self.label.clone(), e))?;

        debug!("Opened {} store at {}", self.label, self.path.display());
        Ok(Box::new(SqliteAdapter {
            conn,
            label: self.label.clone(),
        }))
    }
}

/// Open session on a SQLite file.
pub struct SqliteAdapter {
    conn: Connection,
    label: String,
}

fn read_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

fn read_rows(conn: &Connection, statement: &Statement) -> rusqlite::Result<ResultSet> {
    let rendered = Dialect::Sqlite.render(statement);
    let mut stmt = conn.prepare(&rendered.sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();
    let params = to_params(rendered.params);
    let rows = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            row_to_sql_values(row, width)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ResultSet::new(columns, rows))
}

#[async_trait]
impl StoreAdapter for SqliteAdapter {
    fn label(&self) -> &str {
        &self.label
    }

    async fn table_columns(&mut self, table: &str) -> Result<Vec<String>, StoreError> {
        let columns = read_columns(&self.conn, table)?;
        if columns.is_empty() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        Ok(columns)
    }

    async fn query(&mut self, statement: &Statement) -> Result<ResultSet, StoreError> {
        Ok(read_rows(&self.conn, statement)?)
    }

    async fn execute(&mut self, statement: &Statement) -> Result<u64, StoreError> {
        let rendered = Dialect::Sqlite.render(statement);
        let params = to_params(rendered.params);
        let affected = self
            .conn
            .execute(&rendered.sql, params_from_iter(params.iter()))?;
        Ok(affected as u64)
    }

    async fn transaction(&mut self, op: TxOp) -> Result<(), StoreError> {
        self.conn
            .execute_batch(&Dialect::Sqlite.transaction_sql(&op))?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }
}
