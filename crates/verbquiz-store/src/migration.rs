//! Idempotent schema setup.
//!
//! The schema is an ordered list of steps. Every step can run any number
//! of times, from any number of processes: tables and indexes use
//! `IF NOT EXISTS`, and columns introduced after the first release are
//! added with `ALTER TABLE ... ADD COLUMN` only when `PRAGMA table_info`
//! says they are missing. Losing the race to another initializer surfaces
//! as SQLite's "duplicate column name" error, which counts as success.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// What a schema step does.
enum StepKind {
    /// A `CREATE ... IF NOT EXISTS` statement.
    Create(&'static str),
    /// An additive column for databases created by older releases.
    AddColumn {
        table: &'static str,
        column: &'static str,
        definition: &'static str,
    },
}

/// A single named schema step.
struct SchemaStep {
    name: &'static str,
    kind: StepKind,
}

/// All schema steps in order. Append new steps at the end.
static SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        name: "create verb table",
        kind: StepKind::Create(
            r#"
            CREATE TABLE IF NOT EXISTS verb (
                id              INTEGER PRIMARY KEY,
                infinitive      TEXT NOT NULL,
                past            TEXT NOT NULL,
                past_participle TEXT NOT NULL,
                translation     TEXT NOT NULL
            )
            "#,
        ),
    },
    SchemaStep {
        name: "create result table",
        kind: StepKind::Create(
            r#"
            CREATE TABLE IF NOT EXISTS result (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                verb_id     INTEGER NOT NULL REFERENCES verb(id),
                success     BOOLEAN NOT NULL,
                player_name TEXT NOT NULL DEFAULT 'guest',
                created_at  INTEGER NOT NULL DEFAULT 0
            )
            "#,
        ),
    },
    SchemaStep {
        name: "add result.player_name",
        kind: StepKind::AddColumn {
            table: "result",
            column: "player_name",
            definition: "TEXT NOT NULL DEFAULT 'guest'",
        },
    },
    SchemaStep {
        name: "add result.created_at",
        kind: StepKind::AddColumn {
            table: "result",
            column: "created_at",
            definition: "INTEGER NOT NULL DEFAULT 0",
        },
    },
    SchemaStep {
        name: "index result by player",
        kind: StepKind::Create(
            "CREATE INDEX IF NOT EXISTS idx_result_player ON result(player_name)",
        ),
    },
];

// ── public API ───────────────────────────────────────────────────────

/// Apply every schema step against `conn`.
///
/// This is a **synchronous** function; call it from `spawn_blocking`.
pub fn run_all(conn: &Connection) -> StoreResult<()> {
    for step in SCHEMA_STEPS {
        apply(conn, step)?;
    }
    debug!(steps = SCHEMA_STEPS.len(), "schema is up to date");
    Ok(())
}

/// Column names of `table`, in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

// ── internals ────────────────────────────────────────────────────────

fn apply(conn: &Connection, step: &SchemaStep) -> StoreResult<()> {
    match step.kind {
        StepKind::Create(sql) => {
            conn.execute_batch(sql).map_err(|e| StoreError::Migration {
                step: step.name,
                message: e.to_string(),
            })?;
        }
        StepKind::AddColumn {
            table,
            column,
            definition,
        } => add_column(conn, step.name, table, column, definition)?,
    }
    Ok(())
}

fn add_column(
    conn: &Connection,
    step: &'static str,
    table: &str,
    column: &str,
    definition: &str,
) -> StoreResult<()> {
    let columns = table_columns(conn, table).map_err(|e| StoreError::Migration {
        step,
        message: format!("failed to read columns of {table}: {e}"),
    })?;
    if columns.iter().any(|c| c == column) {
        return Ok(());
    }
    alter_add_column(conn, step, table, column, definition)
}

/// Run the `ALTER TABLE`, treating a duplicate column as success.
fn alter_add_column(
    conn: &Connection,
    step: &'static str,
    table: &str,
    column: &str,
    definition: &str,
) -> StoreResult<()> {
    let sql = format!("ALTER TABLE {table} ADD COLUMN {column} {definition}");
    match conn.execute_batch(&sql) {
        Ok(()) => {
            info!(table, column, "added missing column");
            Ok(())
        }
        Err(e) if is_duplicate_column(&e) => {
            debug!(table, column, "column added concurrently by another initializer");
            Ok(())
        }
        Err(e) => Err(StoreError::Migration {
            step,
            message: e.to_string(),
        }),
    }
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    err.to_string()
        .to_lowercase()
        .contains("duplicate column name")
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", "ON").unwrap();
        conn
    }

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn run_all_on_fresh_db() {
        let conn = setup_conn();
        run_all(&conn).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"verb".to_string()));
        assert!(tables.contains(&"result".to_string()));

        let columns = table_columns(&conn, "result").unwrap();
        assert_eq!(
            columns,
            vec!["id", "verb_id", "success", "player_name", "created_at"]
        );
    }

    #[test]
    fn run_all_is_idempotent() {
        let conn = setup_conn();
        run_all(&conn).unwrap();
        run_all(&conn).unwrap();

        let columns = table_columns(&conn, "result").unwrap();
        assert_eq!(columns.iter().filter(|c| *c == "player_name").count(), 1);
    }

    #[test]
    fn legacy_result_table_gains_player_name() {
        let conn = setup_conn();
        conn.execute_batch(
            "CREATE TABLE verb (id INTEGER PRIMARY KEY, infinitive TEXT NOT NULL, \
                 past TEXT NOT NULL, past_participle TEXT NOT NULL, translation TEXT NOT NULL);
             CREATE TABLE result (id INTEGER PRIMARY KEY AUTOINCREMENT, \
                 verb_id INTEGER NOT NULL REFERENCES verb(id), success BOOLEAN NOT NULL);
             INSERT INTO verb (id, infinitive, past, past_participle, translation) \
                 VALUES (1, 'go', 'went', 'gone', 'aller');
             INSERT INTO result (verb_id, success) VALUES (1, 1);",
        )
        .unwrap();

        run_all(&conn).unwrap();

        let columns = table_columns(&conn, "result").unwrap();
        assert!(columns.contains(&"player_name".to_string()));
        assert!(columns.contains(&"created_at".to_string()));

        // Pre-existing rows pick up the column default.
        let player: String = conn
            .query_row("SELECT player_name FROM result WHERE id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(player, "guest");
    }

    #[test]
    fn duplicate_column_is_tolerated() {
        let conn = setup_conn();
        run_all(&conn).unwrap();

        // Simulate losing the race: the column exists by the time ALTER runs.
        let err = conn
            .execute_batch("ALTER TABLE result ADD COLUMN player_name TEXT DEFAULT 'guest'")
            .unwrap_err();
        assert!(is_duplicate_column(&err));
    }

    #[test]
    fn alter_of_existing_column_succeeds() {
        let conn = setup_conn();
        run_all(&conn).unwrap();

        // The column list was read before another initializer added it.
        alter_add_column(
            &conn,
            "add result.player_name",
            "result",
            "player_name",
            "TEXT NOT NULL DEFAULT 'guest'",
        )
        .unwrap();

        let columns = table_columns(&conn, "result").unwrap();
        assert_eq!(columns.iter().filter(|c| *c == "player_name").count(), 1);
    }

    #[test]
    fn other_alter_failures_propagate() {
        let conn = setup_conn();
        let err = add_column(&conn, "bogus", "missing_table", "x", "TEXT").unwrap_err();
        assert!(matches!(err, StoreError::Migration { step: "bogus", .. }));
    }
}
