//! Remote MySQL store.

use async_trait::async_trait;
use mysql_async::{prelude::*, Conn, Pool, Row};
use mysql_types::{row_column_names, row_to_sql_values, to_params};
use std::time::Duration;
use sync_core::ResultSet;
use tracing::{debug, warn};

use super::{Dialect, Statement, StoreAdapter, StoreConnector, StoreError, TxOp};
use crate::config::RemoteConfig;

const COLUMNS_QUERY: &str = "SELECT COLUMN_NAME FROM INFORMATION_SCHEMA.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? ORDER BY ORDINAL_POSITION";

/// The shared MySQL server.
///
/// Owns one connection pool for the life of the process; every run borrows a
/// connection from it.
pub struct RemoteStore {
    pool: Pool,
    connect_timeout: Duration,
    target: String,
}

impl RemoteStore {
    /// Build the pool. No connection is made until [`StoreConnector::open`].
    pub fn new(config: &RemoteConfig, connect_timeout: Duration) -> Self {
        Self {
            pool: Pool::new(config.opts().clone()),
            connect_timeout,
            target: config.redacted(),
        }
    }
}

#[async_trait]
impl StoreConnector for RemoteStore {
    fn label(&self) -> &str {
        "remote"
    }

    async fn open(&self) -> Result<Box<dyn StoreAdapter>, StoreError> {
        let conn = match tokio::time::timeout(self.connect_timeout, self.pool.get_conn()).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                return Err(StoreError::connection(
                    "remote",
                    format!("{}: {e}", self.target),
                ))
            }
            Err(_) => {
                return Err(StoreError::connection(
                    "remote",
                    format!(
                        "{}: timed out after {}s",
                        self.target,
                        self.connect_timeout.as_secs()
                    ),
                ))
            }
        };

        debug!("Opened remote store at {}", self.target);
        Ok(Box::new(MySqlAdapter { conn }))
    }

    async fn shutdown(&self) {
        if let Err(e) = self.pool.clone().disconnect().await {
            warn!("Failed to disconnect remote pool: {e}");
        }
    }
}

/// Open session on the MySQL server, holding one pooled connection.
pub struct MySqlAdapter {
    conn: Conn,
}

#[async_trait]
impl StoreAdapter for MySqlAdapter {
    fn label(&self) -> &str {
        "remote"
    }

    async fn table_columns(&mut self, table: &str) -> Result<Vec<String>, StoreError> {
        let columns: Vec<String> = self.conn.exec(COLUMNS_QUERY, (table,)).await?;
        if columns.is_empty() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        Ok(columns)
    }

    async fn query(&mut self, statement: &Statement) -> Result<ResultSet, StoreError> {
        let rendered = Dialect::MySql.render(statement);
        let rows: Vec<Row> = self
            .conn
            .exec(rendered.sql, to_params(rendered.params))
            .await?;

        let columns = match rows.first() {
            Some(row) => row_column_names(row),
            None => statement.output_columns(),
        };
        let rows = rows
            .into_iter()
            .map(row_to_sql_values)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ResultSet::new(columns, rows))
    }

    async fn execute(&mut self, statement: &Statement) -> Result<u64, StoreError> {
        let rendered = Dialect::MySql.render(statement);
        self.conn
            .exec_drop(rendered.sql, to_params(rendered.params))
            .await?;
        Ok(self.conn.affected_rows())
    }

    async fn transaction(&mut self, op: TxOp) -> Result<(), StoreError> {
        // Savepoint statements are not preparable; use the text protocol.
        self.conn
            .query_drop(Dialect::MySql.transaction_sql(&op))
            .await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), StoreError> {
        // Dropping the connection hands it back to the pool.
        drop(self.conn);
        Ok(())
    }
}
