//! SQLite-backed record of processed messages.

use std::path::PathBuf;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::Result;
use crate::models::{ActivityEntry, UserStatistic};

/// Durable store for activity entries, one `user_activity` table.
///
/// Every operation opens its own connection and releases it on return,
/// so entries appended before a mid-run crash stay durable.
#[derive(Debug, Clone)]
pub struct ActivityStore {
    db_path: PathBuf,
}

impl ActivityStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }

    /// Create the backing table if absent and clear any rows from a
    /// previous run. The table is not an accumulating historical log.
    pub fn initialize(&self) -> Result<()> {
        debug!(db = %self.db_path.display(), "initializing activity store");
        let conn = self.connect()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS user_activity (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                translated_message TEXT NOT NULL,
                calculated_score REAL NOT NULL
            );
            DELETE FROM user_activity;",
        )?;
        Ok(())
    }

    /// Insert one activity entry. Each append is independently atomic.
    pub fn append(&self, user_id: i64, processed_message: &str, score: f64) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO user_activity (user_id, translated_message, calculated_score)
             VALUES (?1, ?2, ?3)",
            params![user_id, processed_message, score],
        )?;
        Ok(())
    }

    /// All stored entries in append order.
    pub fn entries(&self) -> Result<Vec<ActivityEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, translated_message, calculated_score
             FROM user_activity ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ActivityEntry {
                id: row.get(0)?,
                user_id: row.get(1)?,
                processed_message: row.get(2)?,
                score: row.get(3)?,
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Per-user (count, average score). Ordering across user groups is
    /// whatever the engine produces; callers must sort if they care.
    pub fn aggregate(&self) -> Result<Vec<UserStatistic>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, COUNT(*), AVG(calculated_score)
             FROM user_activity GROUP BY user_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(UserStatistic {
                user_id: row.get(0)?,
                total_messages: row.get(1)?,
                avg_score: row.get(2)?,
            })
        })?;
        let mut stats = Vec::new();
        for row in rows {
            stats.push(row?);
        }
        Ok(stats)
    }
}
