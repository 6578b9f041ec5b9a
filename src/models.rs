use serde::{Deserialize, Serialize};

/// One (user_id, message) unit of work read from the input file.
/// Lives only for the duration of a single pipeline iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    pub user_id: i64,
    pub raw_message: String,
}

/// One stored (user, message, score) row in the `user_activity` table.
/// Appended once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub user_id: i64,
    pub processed_message: String,
    /// In [0, 1] by the scoring capability's contract; the store does
    /// not enforce the range.
    pub score: f64,
}

/// Aggregated per-user count and average score.
/// Derived by grouping activity entries, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStatistic {
    pub user_id: i64,
    pub total_messages: i64,
    pub avg_score: f64,
}
