//! Mirrored tables: same primary key on both stores, last writer wins.

use sync_core::{SqlValue, TablePlan};

use super::RowOutcome;
use crate::store::{Statement, StoreAdapter, StoreError};

/// Upsert the row by its shared key, overwriting every other planned column.
pub async fn apply_row(
    plan: &TablePlan,
    values: Vec<(String, SqlValue)>,
    destination: &mut dyn StoreAdapter,
) -> Result<RowOutcome, StoreError> {
    // plan() guarantees exactly one key column for mirrored tables.
    let key = plan.key.first().cloned().unwrap_or_default();
    destination
        .execute(&Statement::upsert(&plan.table, key, values))
        .await?;
    Ok(RowOutcome::Written)
}
