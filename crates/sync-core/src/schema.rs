//! Table sync descriptors.
//!
//! A [`TableDescriptor`] is static, code-level metadata about one logical
//! table. At run time it is combined with the column lists actually present
//! on both stores to produce a [`TablePlan`], which is what the sync
//! strategies execute.

use crate::types::{Leg, SyncMode};
use serde::{Deserialize, Serialize};

// ============================================================================
// Error Types
// ============================================================================

/// Configuration problems with a descriptor or with the schemas it is
/// applied to. A table with a schema error is skipped, never partially synced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Append-only table declared without a natural key
    #[error("append-only table '{0}' has no natural key")]
    MissingNaturalKey(String),

    /// Table declared without an identity key
    #[error("table '{0}' has no identity key")]
    MissingIdentityKey(String),

    /// Append-only table declared with no leg, or a mirrored table with none
    #[error("table '{0}' does not participate in any sync leg")]
    NoLegs(String),

    /// A key column is absent from one of the stores
    #[error("column '{column}' of table '{table}' is missing on the {side} store")]
    ColumnMissing {
        table: String,
        column: String,
        side: &'static str,
    },

    /// The identity key is listed as part of the natural key
    #[error("natural key of table '{0}' must not include its identity key")]
    IdentityInNaturalKey(String),

    /// Unknown table requested from a table set
    #[error("unknown table: {0}")]
    UnknownTable(String),
}

// ============================================================================
// Descriptor
// ============================================================================

/// Static per-table sync metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Logical table name, identical on both stores
    pub name: String,

    /// Shared primary key (mirrored) or destination-assigned key (append-only)
    pub identity_key: String,

    /// Columns identifying a logical record across stores (append-only)
    #[serde(default)]
    pub natural_key: Vec<String>,

    /// Merge policy
    pub mode: SyncMode,

    /// Legs this table takes part in
    pub legs: Vec<Leg>,
}

impl TableDescriptor {
    /// A mirrored table synced in both directions.
    pub fn mirrored(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identity_key: key.into(),
            natural_key: Vec::new(),
            mode: SyncMode::Mirrored,
            legs: vec![Leg::Push, Leg::Pull],
        }
    }

    /// An append-only table flowing in a single direction.
    pub fn append_only<I, S>(
        name: impl Into<String>,
        identity_key: impl Into<String>,
        natural_key: I,
        leg: Leg,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            identity_key: identity_key.into(),
            natural_key: natural_key.into_iter().map(Into::into).collect(),
            mode: SyncMode::AppendOnly,
            legs: vec![leg],
        }
    }

    /// Whether the table takes part in `leg`.
    pub fn runs_on(&self, leg: Leg) -> bool {
        self.legs.contains(&leg)
    }

    /// Check the descriptor on its own, without looking at any store.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.identity_key.trim().is_empty() {
            return Err(SchemaError::MissingIdentityKey(self.name.clone()));
        }
        if self.legs.is_empty() {
            return Err(SchemaError::NoLegs(self.name.clone()));
        }
        if self.mode == SyncMode::AppendOnly {
            if self.natural_key.is_empty() || self.natural_key.iter().any(|c| c.trim().is_empty())
            {
                return Err(SchemaError::MissingNaturalKey(self.name.clone()));
            }
            if self.natural_key.contains(&self.identity_key) {
                return Err(SchemaError::IdentityInNaturalKey(self.name.clone()));
            }
        }
        Ok(())
    }

    /// Combine the descriptor with the column lists of the source and
    /// destination stores.
    ///
    /// Planned columns are those present on both sides, in source order.
    /// Append-only plans never include the identity key.
    pub fn plan(
        &self,
        source_columns: &[String],
        destination_columns: &[String],
    ) -> Result<TablePlan, SchemaError> {
        self.validate()?;

        let required: Vec<&String> = match self.mode {
            SyncMode::Mirrored => vec![&self.identity_key],
            SyncMode::AppendOnly => self.natural_key.iter().collect(),
        };
        for column in required {
            if !source_columns.contains(column) {
                return Err(self.missing(column, "source"));
            }
            if !destination_columns.contains(column) {
                return Err(self.missing(column, "destination"));
            }
        }

        let columns: Vec<String> = source_columns
            .iter()
            .filter(|c| destination_columns.contains(c))
            .filter(|c| self.mode == SyncMode::Mirrored || **c != self.identity_key)
            .cloned()
            .collect();

        let key = match self.mode {
            SyncMode::Mirrored => vec![self.identity_key.clone()],
            SyncMode::AppendOnly => self.natural_key.clone(),
        };

        Ok(TablePlan {
            table: self.name.clone(),
            mode: self.mode,
            columns,
            key,
        })
    }

    fn missing(&self, column: &str, side: &'static str) -> SchemaError {
        SchemaError::ColumnMissing {
            table: self.name.clone(),
            column: column.to_string(),
            side,
        }
    }
}

/// Columns to move for one table and leg.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePlan {
    /// Table name
    pub table: String,
    /// Merge policy
    pub mode: SyncMode,
    /// Columns read from the source and written to the destination
    pub columns: Vec<String>,
    /// Upsert key (mirrored) or natural key (append-only)
    pub key: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_append_only_requires_natural_key() {
        let empty: [&str; 0] = [];
        let td = TableDescriptor::append_only("requests", "id", empty, Leg::Pull);
        assert_eq!(
            td.validate(),
            Err(SchemaError::MissingNaturalKey("requests".to_string()))
        );
    }

    #[test]
    fn test_identity_not_allowed_in_natural_key() {
        let td = TableDescriptor::append_only("requests", "id", ["id", "student_id"], Leg::Pull);
        assert_eq!(
            td.validate(),
            Err(SchemaError::IdentityInNaturalKey("requests".to_string()))
        );
    }

    #[test]
    fn test_mirrored_plan_keeps_key_and_intersects() {
        let td = TableDescriptor::mirrored("books", "book_id");
        let plan = td
            .plan(
                &cols(&["book_id", "title", "local_only"]),
                &cols(&["title", "book_id", "remote_only"]),
            )
            .unwrap();

        assert_eq!(plan.columns, cols(&["book_id", "title"]));
        assert_eq!(plan.key, cols(&["book_id"]));
    }

    #[test]
    fn test_append_only_plan_drops_identity() {
        let td = TableDescriptor::append_only(
            "requests",
            "id",
            ["student_id", "request_type", "created_at"],
            Leg::Pull,
        );
        let both = cols(&["id", "student_id", "request_type", "created_at", "status"]);
        let plan = td.plan(&both, &both).unwrap();

        assert!(!plan.columns.contains(&"id".to_string()));
        assert_eq!(plan.columns.len(), 4);
        assert_eq!(
            plan.key,
            cols(&["student_id", "request_type", "created_at"])
        );
    }

    #[test]
    fn test_plan_reports_missing_key_column() {
        let td = TableDescriptor::append_only("broadcasts", "id", ["title", "created_at"], Leg::Push);
        let err = td
            .plan(
                &cols(&["id", "title", "created_at"]),
                &cols(&["id", "title"]),
            )
            .unwrap_err();

        assert_eq!(
            err,
            SchemaError::ColumnMissing {
                table: "broadcasts".to_string(),
                column: "created_at".to_string(),
                side: "destination",
            }
        );
        assert!(err.to_string().contains("destination"));
    }

    #[test]
    fn test_runs_on() {
        let td = TableDescriptor::append_only("broadcasts", "id", ["title"], Leg::Push);
        assert!(td.runs_on(Leg::Push));
        assert!(!td.runs_on(Leg::Pull));
        assert!(TableDescriptor::mirrored("students", "student_id").runs_on(Leg::Pull));
    }
}
