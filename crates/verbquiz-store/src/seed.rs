//! One-time load of the verb reference data.
//!
//! Seeding runs inside a single `IMMEDIATE` transaction: the emptiness
//! check and the inserts happen under the write lock, so two processes
//! starting against a fresh database cannot both insert the dataset.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::verb_store::NewVerb;

/// Outcome of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReport {
    /// The table was empty and this many verbs were inserted.
    Seeded(usize),
    /// The table already held this many verbs; nothing was inserted.
    AlreadyPresent(usize),
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeded(n) => write!(f, "{n} verbs imported"),
            Self::AlreadyPresent(n) => write!(f, "{n} verbs already present"),
        }
    }
}

/// Parse a JSON seed dataset (an array of verb objects).
pub fn load_dataset(path: &Path) -> StoreResult<Vec<NewVerb>> {
    let raw = std::fs::read_to_string(path).map_err(|e| StoreError::Seed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| StoreError::Seed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Seed from the dataset at `path` if the verb table is empty.
///
/// The file is only read when seeding is actually needed; a missing or
/// malformed file is then an error.
pub async fn seed_if_empty(db: &Database, path: impl Into<PathBuf>) -> StoreResult<SeedReport> {
    let path = path.into();
    seed_with(db, move || load_dataset(&path)).await
}

/// Seed from in-memory records if the verb table is empty.
pub async fn seed_records(db: &Database, records: Vec<NewVerb>) -> StoreResult<SeedReport> {
    seed_with(db, move || Ok(records)).await
}

async fn seed_with<F>(db: &Database, load: F) -> StoreResult<SeedReport>
where
    F: FnOnce() -> StoreResult<Vec<NewVerb>> + Send + 'static,
{
    let report = db
        .transaction(move |tx| {
            let present: i64 = tx.query_row("SELECT count(*) FROM verb", [], |row| row.get(0))?;
            if present > 0 {
                return Ok(SeedReport::AlreadyPresent(present as usize));
            }

            let records = load()?;
            let mut stmt = tx.prepare(
                "INSERT INTO verb (infinitive, past, past_participle, translation) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for verb in &records {
                stmt.execute(rusqlite::params![
                    verb.infinitive,
                    verb.past,
                    verb.past_participle,
                    verb.translation,
                ])?;
            }
            Ok(SeedReport::Seeded(records.len()))
        })
        .await?;

    info!(%report, "verb table ready");
    Ok(report)
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<NewVerb> {
        vec![
            NewVerb {
                infinitive: "go".into(),
                past: "went".into(),
                past_participle: "gone".into(),
                translation: "aller".into(),
            },
            NewVerb {
                infinitive: "take".into(),
                past: "took".into(),
                past_participle: "taken".into(),
                translation: "prendre".into(),
            },
        ]
    }

    async fn setup_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    #[tokio::test]
    async fn seeds_empty_table_once() {
        let db = setup_db().await;

        assert_eq!(
            seed_records(&db, sample()).await.unwrap(),
            SeedReport::Seeded(2)
        );
        assert_eq!(
            seed_records(&db, sample()).await.unwrap(),
            SeedReport::AlreadyPresent(2)
        );
    }

    #[tokio::test]
    async fn populated_table_does_not_read_the_file() {
        let db = setup_db().await;
        seed_records(&db, sample()).await.unwrap();

        let report = seed_if_empty(&db, "/definitely/not/here.json").await.unwrap();
        assert_eq!(report, SeedReport::AlreadyPresent(2));
    }

    #[tokio::test]
    async fn missing_file_fails_and_leaves_table_empty() {
        let db = setup_db().await;

        let err = seed_if_empty(&db, "/definitely/not/here.json")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Seed { .. }));

        let count: i64 = db
            .execute(|conn| Ok(conn.query_row("SELECT count(*) FROM verb", [], |r| r.get(0))?))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn malformed_file_is_a_seed_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verbs.json");
        std::fs::write(&path, r#"[{"infinitive": "go"}]"#).unwrap();

        let err = load_dataset(&path).unwrap_err();
        assert!(err.to_string().contains("verbs.json"));
    }

    #[test]
    fn report_display() {
        assert_eq!(SeedReport::Seeded(157).to_string(), "157 verbs imported");
        assert_eq!(
            SeedReport::AlreadyPresent(3).to_string(),
            "3 verbs already present"
        );
    }
}
