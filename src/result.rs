//! Outcome of one sync run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sync_core::Direction;

/// Errors shown in a summary before the rest are counted.
const SUMMARY_ERRORS: usize = 3;

/// Aggregate result of [`SyncManager::sync_now`](crate::SyncManager::sync_now).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncResult {
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
    /// Tables with at least one leg that committed (or had nothing to copy),
    /// in run order, without duplicates.
    pub tables_synced: Vec<String>,
    /// Rows written or found already present at their destination.
    pub records_synced: usize,
    pub errors: Vec<String>,
    pub success: bool,
}

impl SyncResult {
    pub(crate) fn new(direction: Direction) -> Self {
        Self {
            direction,
            timestamp: Utc::now(),
            tables_synced: Vec::new(),
            records_synced: 0,
            errors: Vec::new(),
            success: false,
        }
    }

    /// A run that did not start.
    pub(crate) fn rejected(direction: Direction, error: impl ToString) -> Self {
        let mut result = Self::new(direction);
        result.errors.push(error.to_string());
        result
    }

    pub(crate) fn finish(mut self) -> Self {
        self.success = self.errors.is_empty();
        self
    }

    /// One-line description for people.
    pub fn summary(&self) -> String {
        if self.success {
            return format!(
                "Synced {} records across tables [{}]",
                self.records_synced,
                self.tables_synced.join(", ")
            );
        }

        let mut text = format!(
            "Sync finished with {} error(s): {}",
            self.errors.len(),
            self.errors
                .iter()
                .take(SUMMARY_ERRORS)
                .cloned()
                .collect::<Vec<_>>()
                .join("; ")
        );
        if self.errors.len() > SUMMARY_ERRORS {
            text.push_str(&format!(
                " ... and {} more",
                self.errors.len() - SUMMARY_ERRORS
            ));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_summary() {
        let mut result = SyncResult::new(Direction::Both);
        result.tables_synced = vec!["students".into(), "books".into()];
        result.records_synced = 12;
        let result = result.finish();

        assert!(result.success);
        assert_eq!(
            result.summary(),
            "Synced 12 records across tables [students, books]"
        );
    }

    #[test]
    fn test_failure_summary_truncates() {
        let mut result = SyncResult::new(Direction::RemoteToLocal);
        result.errors = (1..=5).map(|i| format!("requests: row {i}")).collect();
        let result = result.finish();

        assert!(!result.success);
        assert_eq!(
            result.summary(),
            "Sync finished with 5 error(s): requests: row 1; requests: row 2; requests: row 3 ... and 2 more"
        );
    }

    #[test]
    fn test_json_shape() {
        let result = SyncResult::rejected(Direction::Both, "sync already in progress");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["direction"], "both");
        assert_eq!(json["success"], false);
        assert_eq!(json["records_synced"], 0);
        assert_eq!(json["errors"][0], "sync already in progress");
    }
}
