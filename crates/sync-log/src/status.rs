//! Run status recorded in the sync log.

use serde::{Deserialize, Serialize};

/// Outcome of the most recent sync run.
///
/// `InProgress` is written when a run starts; one of the other three replaces
/// it when the run ends. A log left at `InProgress` means the process stopped
/// mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// A run has started and not yet finished.
    InProgress,

    /// Every table was attempted and no errors were recorded.
    Completed,

    /// Every table was attempted but some tables or rows failed.
    CompletedWithErrors,

    /// The run could not start (e.g. the remote store was unreachable).
    Failed,
}

impl SyncStatus {
    /// Get the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::InProgress => "in_progress",
            SyncStatus::Completed => "completed",
            SyncStatus::CompletedWithErrors => "completed_with_errors",
            SyncStatus::Failed => "failed",
        }
    }

    /// Whether the run this status describes has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SyncStatus::InProgress)
    }
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
