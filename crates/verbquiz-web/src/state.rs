//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers. It holds no per-player data: the player name arrives with
//! each request.

use verbquiz_store::Database;

use crate::quiz::QuizService;

/// Shared state accessible from every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Database handle, probed directly by the health check.
    pub db: Database,

    /// Quiz operations over the database.
    pub quiz: QuizService,
}

impl AppState {
    /// Build the state around an initialized database.
    pub fn new(db: Database) -> Self {
        let quiz = QuizService::new(db.clone());
        Self { db, quiz }
    }
}
