//! Append-only log of graded attempts.
//!
//! Rows are inserted once per graded answer and only ever removed in
//! bulk for a single player name by [`ResultStore::delete_for_player`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::db::Database;
use crate::error::StoreResult;

/// One graded attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedResult {
    pub id: i64,
    pub verb_id: i64,
    pub success: bool,
    pub player_name: String,
    /// Unix timestamp (seconds) assigned at insert.
    pub created_at: i64,
}

/// Attempt counts for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressCounts {
    pub total: i64,
    pub success_count: i64,
}

/// Writes and aggregate queries over the `result` table.
#[derive(Clone)]
pub struct ResultStore {
    db: Database,
}

impl ResultStore {
    /// Create a new result store backed by `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Append one graded attempt and return the stored row.
    #[instrument(skip(self))]
    pub async fn record(
        &self,
        verb_id: i64,
        player_name: &str,
        success: bool,
    ) -> StoreResult<GradedResult> {
        let player_name = player_name.to_string();
        let created_at = Utc::now().timestamp();

        self.db
            .transaction(move |tx| {
                tx.execute(
                    "INSERT INTO result (verb_id, success, player_name, created_at) \
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![verb_id, success, player_name, created_at],
                )?;
                let id = tx.last_insert_rowid();
                debug!(result_id = id, verb_id, success, "result recorded");
                Ok(GradedResult {
                    id,
                    verb_id,
                    success,
                    player_name,
                    created_at,
                })
            })
            .await
    }

    /// Total and successful attempts for `player_name`, read in one query.
    #[instrument(skip(self))]
    pub async fn counts(&self, player_name: &str) -> StoreResult<ProgressCounts> {
        let player_name = player_name.to_string();
        self.db
            .execute(move |conn| {
                let counts = conn.query_row(
                    "SELECT count(*), COALESCE(SUM(success), 0) FROM result WHERE player_name = ?1",
                    rusqlite::params![player_name],
                    |row| {
                        Ok(ProgressCounts {
                            total: row.get(0)?,
                            success_count: row.get(1)?,
                        })
                    },
                )?;
                Ok(counts)
            })
            .await
    }

    /// Delete every attempt recorded under exactly `player_name`.
    ///
    /// Returns the number of rows removed, as reported by the `DELETE`
    /// itself.
    #[instrument(skip(self))]
    pub async fn delete_for_player(&self, player_name: &str) -> StoreResult<usize> {
        let player_name = player_name.to_string();
        self.db
            .transaction(move |tx| {
                let deleted = tx.execute(
                    "DELETE FROM result WHERE player_name = ?1",
                    rusqlite::params![player_name],
                )?;
                debug!(deleted, "results deleted");
                Ok(deleted)
            })
            .await
    }

    /// Most recent attempts for `player_name`, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_player(
        &self,
        player_name: &str,
        limit: usize,
    ) -> StoreResult<Vec<GradedResult>> {
        let player_name = player_name.to_string();
        self.db
            .execute(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, verb_id, success, player_name, created_at FROM result \
                     WHERE player_name = ?1 ORDER BY id DESC LIMIT ?2",
                )?;
                let rows = stmt
                    .query_map(rusqlite::params![player_name, limit as i64], |row| {
                        Ok(GradedResult {
                            id: row.get(0)?,
                            verb_id: row.get(1)?,
                            success: row.get(2)?,
                            player_name: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
    }
}

// ── tests ────────────────────────────────────────────────────────────
