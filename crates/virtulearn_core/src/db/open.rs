//! Connection bootstrap and schema lifecycle for the Virtulearn store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure pragmas the referential-integrity layer depends on.
//! - Expose idempotent schema creation and the destructive drop.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::migrations::{apply_migrations, reset_user_version};
use super::DbResult;
use log::{error, info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Entity tables in drop order (children before parents).
const ENTITY_TABLES: [&str; 3] = ["enrollments", "courses", "instructors"];

/// Opens the SQLite store file and applies all pending migrations.
///
/// Parent directories are not created here; callers own path layout.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory store and applies all pending migrations.
///
/// Used by tests and dry runs; contents vanish when the connection drops.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

/// Ensures the entity tables exist.
///
/// Safe to call on every startup: an up-to-date store is left untouched and
/// no rows are ever rewritten.
pub fn init_schema(conn: &mut Connection) -> DbResult<()> {
    let started_at = Instant::now();
    match apply_migrations(conn) {
        Ok(applied) => {
            info!(
                "event=schema_init module=db status=ok applied_migrations={} duration_ms={}",
                applied,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_init module=db status=error duration_ms={} error_code=schema_init_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Drops every entity table and resets the schema version.
///
/// Performs no confirmation of its own; the CLI gates this behind an
/// explicit prompt. A later `init_schema` recreates empty tables.
pub fn drop_schema(conn: &mut Connection) -> DbResult<()> {
    warn!("event=schema_drop module=db status=start");
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    for table in ENTITY_TABLES {
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {table};"))?;
    }
    reset_user_version(&tx)?;
    tx.commit()?;
    warn!(
        "event=schema_drop module=db status=ok tables={}",
        ENTITY_TABLES.len()
    );
    Ok(())
}

fn open_with<F>(mode: &'static str, open: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
