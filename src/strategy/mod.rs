//! Per-table synchronization.
//!
//! [`sync_table`] moves one table in one leg. The shared preamble plans the
//! columns from both schemas and reads the source. Every destination write
//! then happens inside one transaction with a savepoint per row, so a failing
//! row is rolled back and recorded while the remaining rows still commit.
//! The merge policy itself lives in [`mirrored`] and [`append_only`].

use std::fmt;
use sync_core::{Leg, SqlValue, SyncMode, TableDescriptor, TablePlan};
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::store::{Statement, StoreAdapter, StoreError, TxOp};

pub mod append_only;
pub mod mirrored;

const ROW_SAVEPOINT: &str = "sync_row";

/// What happened to one source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Inserted or overwritten at the destination.
    Written,
    /// An equal record already existed and was left untouched.
    AlreadyPresent,
}

/// Result of syncing one table in one leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOutcome {
    pub table: String,
    pub leg: Leg,
    pub written: usize,
    pub already_present: usize,
    /// Append-only rows with a null natural-key component.
    pub skipped: usize,
    pub errors: Vec<String>,
    /// The leg reached its end: rows were committed or there were none.
    pub completed: bool,
}

impl TableOutcome {
    fn new(table: &str, leg: Leg) -> Self {
        Self {
            table: table.to_string(),
            leg,
            written: 0,
            already_present: 0,
            skipped: 0,
            errors: Vec::new(),
            completed: false,
        }
    }

    /// Rows that are at the destination after this leg.
    pub fn records_synced(&self) -> usize {
        self.written + self.already_present
    }

    fn fail(&mut self, cause: impl fmt::Display) {
        self.errors.push(format!("{}: {cause}", self.table));
    }
}

/// Sync `descriptor` from `source` to `destination`.
///
/// Never returns an error: every failure is recorded in the outcome.
pub async fn sync_table(
    descriptor: &TableDescriptor,
    leg: Leg,
    source: &mut dyn StoreAdapter,
    destination: &mut dyn StoreAdapter,
) -> TableOutcome {
    let table = descriptor.name.as_str();
    let mut outcome = TableOutcome::new(table, leg);

    let plan = match plan_table(descriptor, source, destination).await {
        Ok(plan) => plan,
        Err(e) => {
            warn!("Skipping {table} ({}): {e}", leg.arrow());
            outcome.fail(e);
            return outcome;
        }
    };

    let rows = match source
        .query(&Statement::select(table, plan.columns.clone()))
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Failed to read {table} from {} store: {e}", source.label());
            outcome.fail(e);
            return outcome;
        }
    };
    if rows.is_empty() {
        debug!("{table} ({}): source is empty", leg.arrow());
        outcome.completed = true;
        return outcome;
    }

    if let Err(e) = destination.transaction(TxOp::Begin).await {
        outcome.fail(e);
        return outcome;
    }

    for idx in 0..rows.len() {
        let values = rows.named_row(idx);

        if plan.mode == SyncMode::AppendOnly && append_only::has_null_key(&plan, &values) {
            debug!("{table}: skipping row with incomplete natural key");
            outcome.skipped += 1;
            continue;
        }

        match apply_in_savepoint(&plan, values, destination).await {
            Ok(RowOutcome::Written) => outcome.written += 1,
            Ok(RowOutcome::AlreadyPresent) => outcome.already_present += 1,
            Err(e) => {
                let error = SyncError::RowSync {
                    table: table.to_string(),
                    cause: e.to_string(),
                };
                warn!("Row {} of {table} ({}) failed: {e}", idx + 1, leg.arrow());
                outcome.errors.push(error.to_string());
            }
        }
    }

    if let Err(e) = destination.transaction(TxOp::Commit).await {
        warn!("Commit of {table} ({}) failed: {e}", leg.arrow());
        if let Err(rollback) = destination.transaction(TxOp::Rollback).await {
            warn!("Rollback of {table} failed: {rollback}");
        }
        outcome.written = 0;
        outcome.fail(format!("commit failed: {e}"));
        return outcome;
    }

    outcome.completed = true;
    info!(
        "{table} ({}): {} written, {} already present, {} skipped, {} failed",
        leg.arrow(),
        outcome.written,
        outcome.already_present,
        outcome.skipped,
        outcome.errors.len()
    );
    outcome
}

async fn plan_table(
    descriptor: &TableDescriptor,
    source: &mut dyn StoreAdapter,
    destination: &mut dyn StoreAdapter,
) -> Result<TablePlan, String> {
    let source_columns = source
        .table_columns(&descriptor.name)
        .await
        .map_err(|e| format!("{} store: {e}", source.label()))?;
    let destination_columns = destination
        .table_columns(&descriptor.name)
        .await
        .map_err(|e| format!("{} store: {e}", destination.label()))?;

    descriptor
        .plan(&source_columns, &destination_columns)
        .map_err(|e| SyncError::Configuration(e.to_string()).to_string())
}

/// Apply one row, undoing its partial effects on failure.
async fn apply_in_savepoint(
    plan: &TablePlan,
    values: Vec<(String, SqlValue)>,
    destination: &mut dyn StoreAdapter,
) -> Result<RowOutcome, StoreError> {
    destination
        .transaction(TxOp::Savepoint(ROW_SAVEPOINT.to_string()))
        .await?;

    let applied = match plan.mode {
        SyncMode::Mirrored => mirrored::apply_row(plan, values, destination).await,
        SyncMode::AppendOnly => append_only::apply_row(plan, values, destination).await,
    };

    if applied.is_err() {
        if let Err(e) = destination
            .transaction(TxOp::RollbackTo(ROW_SAVEPOINT.to_string()))
            .await
        {
            warn!("Failed to roll back row in {}: {e}", plan.table);
        }
    }
    // The row's effects stay in the open transaction either way.
    if let Err(e) = destination
        .transaction(TxOp::Release(ROW_SAVEPOINT.to_string()))
        .await
    {
        warn!("Failed to release savepoint in {}: {e}", plan.table);
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sync_core::ResultSet;

    /// In-memory destination that records what it is asked to do.
    struct ScriptedStore {
        columns: Vec<String>,
        rows: Vec<Vec<SqlValue>>,
        refuse_release: bool,
        executed: usize,
        ops: Vec<TxOp>,
    }

    impl ScriptedStore {
        fn books(rows: Vec<Vec<SqlValue>>) -> Self {
            Self {
                columns: vec!["book_id".to_string(), "title".to_string()],
                rows,
                refuse_release: false,
                executed: 0,
                ops: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl StoreAdapter for ScriptedStore {
        fn label(&self) -> &str {
            "scripted"
        }

        async fn table_columns(&mut self, _table: &str) -> Result<Vec<String>, StoreError> {
            Ok(self.columns.clone())
        }

        async fn query(&mut self, _statement: &Statement) -> Result<ResultSet, StoreError> {
            Ok(ResultSet::new(self.columns.clone(), self.rows.clone()))
        }

        async fn execute(&mut self, _statement: &Statement) -> Result<u64, StoreError> {
            self.executed += 1;
            Ok(1)
        }

        async fn transaction(&mut self, op: TxOp) -> Result<(), StoreError> {
            if self.refuse_release && matches!(op, TxOp::Release(_)) {
                return Err(StoreError::connection("scripted", "savepoint does not exist"));
            }
            self.ops.push(op);
            Ok(())
        }

        async fn close(self: Box<Self>) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_rows_count_as_written_when_release_fails() {
        let mut source = ScriptedStore::books(vec![
            vec!["B1".into(), "Dune".into()],
            vec!["B2".into(), "Emma".into()],
        ]);
        let mut destination = ScriptedStore::books(Vec::new());
        destination.refuse_release = true;

        let descriptor = TableDescriptor::mirrored("books", "book_id");
        let outcome = sync_table(&descriptor, Leg::Push, &mut source, &mut destination).await;

        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert_eq!(outcome.written, 2);
        assert!(outcome.completed);
        assert_eq!(destination.executed, 2);
        assert_eq!(destination.ops.last(), Some(&TxOp::Commit));
        assert!(!destination
            .ops
            .iter()
            .any(|op| matches!(op, TxOp::RollbackTo(_))));
    }

    #[tokio::test]
    async fn test_failed_row_rolls_back_to_its_savepoint() {
        struct RejectingStore(ScriptedStore);

        #[async_trait]
        impl StoreAdapter for RejectingStore {
            fn label(&self) -> &str {
                "rejecting"
            }

            async fn table_columns(&mut self, table: &str) -> Result<Vec<String>, StoreError> {
                self.0.table_columns(table).await
            }

            async fn query(&mut self, statement: &Statement) -> Result<ResultSet, StoreError> {
                self.0.query(statement).await
            }

            async fn execute(&mut self, _statement: &Statement) -> Result<u64, StoreError> {
                Err(StoreError::TableNotFound("books".to_string()))
            }

            async fn transaction(&mut self, op: TxOp) -> Result<(), StoreError> {
                self.0.transaction(op).await
            }

            async fn close(self: Box<Self>) -> Result<(), StoreError> {
                Ok(())
            }
        }

        let mut source = ScriptedStore::books(vec![vec!["B1".into(), "Dune".into()]]);
        let mut destination = RejectingStore(ScriptedStore::books(Vec::new()));

        let descriptor = TableDescriptor::mirrored("books", "book_id");
        let outcome = sync_table(&descriptor, Leg::Push, &mut source, &mut destination).await;

        assert_eq!(outcome.written, 0);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("books: "), "{:?}", outcome.errors);
        let savepoint = ROW_SAVEPOINT.to_string();
        assert_eq!(
            destination.0.ops,
            vec![
                TxOp::Begin,
                TxOp::Savepoint(savepoint.clone()),
                TxOp::RollbackTo(savepoint.clone()),
                TxOp::Release(savepoint),
                TxOp::Commit,
            ]
        );
    }
}
