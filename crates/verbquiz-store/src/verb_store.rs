//! Read access to the verb reference table.
//!
//! Verbs are written once by [`crate::seed`] and never changed by the
//! running service, so this store only reads.

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::Database;
use crate::error::{StoreError, StoreResult};

/// An irregular verb with its canonical English forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verb {
    pub id: i64,
    pub infinitive: String,
    pub past: String,
    pub past_participle: String,
    /// Display string in the learner's language.
    pub translation: String,
}

/// A verb record as found in the seed dataset, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVerb {
    pub infinitive: String,
    pub past: String,
    pub past_participle: String,
    #[serde(alias = "fr")]
    pub translation: String,
}

impl Verb {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            infinitive: row.get(1)?,
            past: row.get(2)?,
            past_participle: row.get(3)?,
            translation: row.get(4)?,
        })
    }
}

const SELECT_VERB: &str = "SELECT id, infinitive, past, past_participle, translation FROM verb";

/// Read-only queries over the `verb` table.
#[derive(Clone)]
pub struct VerbStore {
    db: Database,
}

impl VerbStore {
    /// Create a new verb store backed by `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every verb, in storage order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> StoreResult<Vec<Verb>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn.prepare(SELECT_VERB)?;
                let verbs = stmt
                    .query_map([], Verb::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(verbs)
            })
            .await
    }

    /// Fetch a single verb by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> StoreResult<Verb> {
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("{SELECT_VERB} WHERE id = ?1"),
                    rusqlite::params![id],
                    Verb::from_row,
                )
                .map_err(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound {
                        entity: "verb",
                        id: id.to_string(),
                    },
                    other => StoreError::Sqlite(other),
                })
            })
            .await
    }

    /// Number of verbs in the table.
    pub async fn count(&self) -> StoreResult<i64> {
        self.db
            .execute(|conn| Ok(conn.query_row("SELECT count(*) FROM verb", [], |row| row.get(0))?))
            .await
    }
}

// ── tests ────────────────────────────────────────────────────────────
