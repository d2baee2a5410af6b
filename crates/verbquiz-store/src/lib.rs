//! # verbquiz-store
//!
//! Storage engine for verbquiz.
//!
//! Two tables live in a single SQLite file:
//!
//! ```text
//! verb   (id, infinitive, past, past_participle, translation)   seeded once
//! result (id, verb_id → verb.id, success, player_name, created_at)   append-only
//! ```
//!
//! Every access goes through a [`Database`] handle; writes run inside a
//! scoped transaction that commits or rolls back as a unit.
//!
//! ## Quick start
//!
//! ```ignore
//! use verbquiz_store::{Database, ResultStore, VerbStore, seed_if_empty};
//!
//! let db = Database::open_and_migrate("data/verbs.db").await?;
//! seed_if_empty(&db, "data/irregular_verbs.json").await?;
//! let verbs = VerbStore::new(db.clone()).list().await?;
//! ```

pub mod db;
pub mod error;
pub mod migration;
pub mod result_store;
pub mod seed;
pub mod verb_store;

// ── re-exports ───────────────────────────────────────────────────────

pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use result_store::{GradedResult, ProgressCounts, ResultStore};
pub use seed::{SeedReport, load_dataset, seed_if_empty, seed_records};
pub use verb_store::{NewVerb, Verb, VerbStore};
