//! CLI argument definitions for verbquiz.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// verbquiz -- irregular-verb quiz server.
#[derive(Parser)]
#[command(
    name = "verbquiz",
    version,
    about = "verbquiz -- irregular-verb quiz server",
    long_about = "Serves irregular-verb flashcards over HTTP, grades answers and \
                  tracks each player's success rate in a local SQLite database."
)]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, env = "VERBQUIZ_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and start the web server.
    Serve {
        #[command(flatten)]
        storage: StorageArgs,

        #[command(flatten)]
        server: ServerArgs,
    },

    /// Create the schema and seed the verb table, then exit.
    Init {
        #[command(flatten)]
        storage: StorageArgs,
    },

    /// Show verb count and a player's progress.
    Status {
        #[command(flatten)]
        storage: StorageArgs,

        /// Player name to report on.
        #[arg(long, short)]
        player: Option<String>,
    },
}

/// Where the data lives.
#[derive(Args, Debug, Default, Clone)]
pub struct StorageArgs {
    /// SQLite database file.
    #[arg(long, env = "VERBQUIZ_DATABASE")]
    pub database: Option<PathBuf>,

    /// JSON dataset loaded when the verb table is empty.
    #[arg(long, env = "VERBQUIZ_SEED")]
    pub seed: Option<PathBuf>,
}

/// How the HTTP server listens.
#[derive(Args, Debug, Default, Clone)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to.
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on.
    #[arg(long, short, env = "VERBQUIZ_PORT")]
    pub port: Option<u16>,

    /// Directory served for paths no API route matches.
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}
