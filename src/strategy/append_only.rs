//! Append-only tables.
//!
//! Records are identified by their natural key, never by the identity column,
//! which each store assigns independently. A record already present at the
//! destination is never updated.

use sync_core::{SqlValue, TablePlan};

use super::RowOutcome;
use crate::store::{Statement, StoreAdapter, StoreError};

/// Natural-key columns of a row, paired with their values.
pub fn natural_key(plan: &TablePlan, values: &[(String, SqlValue)]) -> Vec<(String, SqlValue)> {
    plan.key
        .iter()
        .map(|k| {
            let value = values
                .iter()
                .find(|(c, _)| c == k)
                .map(|(_, v)| v.clone())
                .unwrap_or(SqlValue::Null);
            (k.clone(), value)
        })
        .collect()
}

/// Whether any natural-key component is null. Such rows cannot be matched
/// and are skipped.
pub fn has_null_key(plan: &TablePlan, values: &[(String, SqlValue)]) -> bool {
    natural_key(plan, values).iter().any(|(_, v)| v.is_null())
}

/// Insert the row unless a record with the same natural key exists.
pub async fn apply_row(
    plan: &TablePlan,
    values: Vec<(String, SqlValue)>,
    destination: &mut dyn StoreAdapter,
) -> Result<RowOutcome, StoreError> {
    let existing = destination
        .query(&Statement::find(&plan.table, natural_key(plan, &values)))
        .await?;
    if !existing.is_empty() {
        return Ok(RowOutcome::AlreadyPresent);
    }

    destination
        .execute(&Statement::insert(&plan.table, values))
        .await?;
    Ok(RowOutcome::Written)
}
