//! Web interface for verbquiz.
//!
//! This crate provides the HTTP server for the irregular-verb quiz:
//!
//! - A JSON API to draw quizzes, grade answers, and read or reset a
//!   player's progress.
//! - An embedded single-page HTML frontend served at `/`.
//! - Optional static file serving for a separately built frontend.

use std::path::PathBuf;

pub mod api;
pub mod frontend;
pub mod quiz;
pub mod server;
pub mod state;

pub use quiz::{QuizError, QuizService};
pub use server::WebServer;
pub use state::AppState;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
    /// Directory served for paths no API route matches.
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 8000,
            static_dir: None,
        }
    }
}
