//! CLI entry point for verbquiz.
//!
//! This binary provides the `verbquiz` command with subcommands for
//! serving the quiz, initializing the database, and checking status.

mod cli;
mod config;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use verbquiz_store::{Database, ResultStore, seed_if_empty};
use verbquiz_web::{QuizService, WebServer};

use crate::cli::{Cli, Commands, ServerArgs};
use crate::config::{Settings, load_config};

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let file = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { storage, server } => {
            cmd_serve(Settings::resolve(file, &storage, &server)).await
        }
        Commands::Init { storage } => {
            cmd_init(Settings::resolve(file, &storage, &ServerArgs::default())).await
        }
        Commands::Status { storage, player } => {
            cmd_status(
                Settings::resolve(file, &storage, &ServerArgs::default()),
                player.as_deref(),
            )
            .await
        }
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(settings: Settings) -> Result<()> {
    init_tracing("info");
    info!("starting verbquiz");

    // Never serve from a half-initialized database.
    let db = open_and_seed(&settings).await?;

    let server = WebServer::new(settings.web.clone(), db);
    info!(addr = %server.addr(), "listening");
    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("web server failed: {e}"))?;

    info!("shutting down");
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: init
// ---------------------------------------------------------------------------

async fn cmd_init(settings: Settings) -> Result<()> {
    init_tracing("warn");

    open_and_seed(&settings).await?;

    println!();
    println!("  Database ready at {}", settings.database.display());
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

const RECENT_ATTEMPTS: usize = 10;

async fn cmd_status(settings: Settings, player: Option<&str>) -> Result<()> {
    init_tracing("warn");

    println!();
    println!("  verbquiz Status");
    println!("  ===============");
    println!();

    if !settings.database.exists() {
        println!(
            "  Database:   NOT INITIALIZED (run `verbquiz init`) [{}]",
            settings.database.display()
        );
        println!();
        return Ok(());
    }

    let db = Database::open_and_migrate(settings.database.clone())
        .await
        .context("failed to open database")?;
    let quiz = QuizService::new(db.clone());

    let verbs = quiz.verb_count().await?;
    println!("  Database:   OK ({})", settings.database.display());
    println!("  Verbs:      {verbs}");

    let player = verbquiz_web::quiz::resolve_player(player);
    let progress = quiz.progress(&player).await?;
    println!(
        "  Player:     {} -- {} / {} correct ({}%)",
        progress.player, progress.success_count, progress.total, progress.rate
    );

    let recent = ResultStore::new(db)
        .list_for_player(&player, RECENT_ATTEMPTS)
        .await?;
    if !recent.is_empty() {
        let marks: Vec<&str> = recent
            .iter()
            .map(|r| if r.success { "ok" } else { "miss" })
            .collect();
        println!("  Recent:     {} (newest first)", marks.join(" "));
    }
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create the schema and seed the verb table; any failure is fatal.
async fn open_and_seed(settings: &Settings) -> Result<Database> {
    ensure_parent_dir(&settings.database)?;

    let db = Database::open_and_migrate(settings.database.clone())
        .await
        .with_context(|| format!("failed to open {}", settings.database.display()))?;
    info!(path = %settings.database.display(), "store initialized");

    let report = seed_if_empty(&db, settings.seed.clone())
        .await
        .context("failed to seed verb table")?;
    println!("  {report}");

    Ok(db)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Initialize the tracing subscriber with the given default log level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
