//! Sync directions and merge modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested direction of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Local store → remote store
    LocalToRemote,
    /// Remote store → local store
    RemoteToLocal,
    /// Push then pull, table by table
    Both,
}

impl Direction {
    /// Legs to run for each table, in execution order.
    pub fn legs(&self) -> &'static [Leg] {
        match self {
            Direction::LocalToRemote => &[Leg::Push],
            Direction::RemoteToLocal => &[Leg::Pull],
            Direction::Both => &[Leg::Push, Leg::Pull],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::LocalToRemote => "local_to_remote",
            Direction::RemoteToLocal => "remote_to_local",
            Direction::Both => "both",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One half of a sync run: a single source → destination pass over a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    /// local → remote
    Push,
    /// remote → local
    Pull,
}

impl Leg {
    pub fn arrow(&self) -> &'static str {
        match self {
            Leg::Push => "local→remote",
            Leg::Pull => "remote→local",
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arrow())
    }
}

/// Merge policy of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Both sides share primary-key values; the destination row is
    /// overwritten with the source row on conflict.
    Mirrored,
    /// Each side assigns its own identity value; a record is matched by its
    /// natural key and never updated once present.
    AppendOnly,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_pushes_before_pulling() {
        assert_eq!(Direction::Both.legs(), &[Leg::Push, Leg::Pull]);
        assert_eq!(Direction::LocalToRemote.legs(), &[Leg::Push]);
        assert_eq!(Direction::RemoteToLocal.legs(), &[Leg::Pull]);
    }

    #[test]
    fn test_direction_serde_names() {
        let json = serde_json::to_string(&Direction::RemoteToLocal).unwrap();
        assert_eq!(json, "\"remote_to_local\"");
        assert_eq!(Direction::Both.to_string(), "both");
        assert_eq!(Leg::Pull.to_string(), "remote→local");
    }
}
