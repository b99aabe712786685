//! Leaderboard records.

use serde::{Deserialize, Serialize};

/// One leaderboard record as confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub id: String,
    pub user_name: String,
    pub value: i64,
}

impl ScoreEntry {
    pub fn new(id: impl Into<String>, user_name: impl Into<String>, value: i64) -> Self {
        Self { id: id.into(), user_name: user_name.into(), value }
    }
}

/// A score that has not been written to the backend yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScore {
    pub user_name: String,
    pub value: i64,
}
