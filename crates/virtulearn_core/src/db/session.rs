//! Transaction-scoped storage sessions.
//!
//! # Responsibility
//! - Open one transaction per logical operation on the shared storage handle.
//! - Commit on success, roll back on any error, then hand the error back.
//! - Log every operation with its name, outcome and duration.
//!
//! # Invariants
//! - A session never outlives the borrowed connection.
//! - A session that is dropped without `commit` is rolled back by SQLite
//!   transaction drop semantics, so early returns and panics release it too.
//! - Sessions do not nest; repositories run inside the caller's session and
//!   never open transactions themselves.

use log::{debug, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::fmt::Display;
use std::time::Instant;

/// Locking intent of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Deferred transaction; takes a shared lock on first read.
    Read,
    /// Immediate transaction; takes the write lock up front.
    Write,
}

impl SessionMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }

    fn behavior(self) -> TransactionBehavior {
        match self {
            Self::Read => TransactionBehavior::Deferred,
            Self::Write => TransactionBehavior::Immediate,
        }
    }
}

/// One open transaction bound to a named operation.
pub struct Session<'conn> {
    tx: Transaction<'conn>,
    operation: &'static str,
    mode: SessionMode,
    started_at: Instant,
}

impl<'conn> Session<'conn> {
    /// Begins a transaction for `operation`.
    ///
    /// Fails when the connection is already inside a transaction.
    pub fn begin(
        conn: &'conn Connection,
        operation: &'static str,
        mode: SessionMode,
    ) -> rusqlite::Result<Self> {
        let tx = Transaction::new_unchecked(conn, mode.behavior())?;
        debug!(
            "event=session_begin module=db op={} mode={}",
            operation,
            mode.as_str()
        );
        Ok(Self {
            tx,
            operation,
            mode,
            started_at: Instant::now(),
        })
    }

    /// Connection view used by repositories inside this session.
    pub fn conn(&self) -> &Connection {
        &self.tx
    }

    /// Commits all work done in this session.
    pub fn commit(self) -> rusqlite::Result<()> {
        let Self {
            tx,
            operation,
            mode,
            started_at,
        } = self;
        match tx.commit() {
            Ok(()) => {
                let elapsed = started_at.elapsed().as_millis();
                match mode {
                    SessionMode::Write => info!(
                        "event=operation module=db op={operation} mode=write status=ok duration_ms={elapsed}"
                    ),
                    SessionMode::Read => debug!(
                        "event=operation module=db op={operation} mode=read status=ok duration_ms={elapsed}"
                    ),
                }
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=operation module=db op={} mode={} status=error duration_ms={} error_code=commit_failed error={}",
                    operation,
                    mode.as_str(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Discards all work done in this session.
    pub fn rollback(self) -> rusqlite::Result<()> {
        let operation = self.operation;
        let mode = self.mode;
        let started_at = self.started_at;
        let result = self.tx.rollback();
        debug!(
            "event=session_rollback module=db op={} mode={} status={} duration_ms={}",
            operation,
            mode.as_str(),
            if result.is_ok() { "ok" } else { "error" },
            started_at.elapsed().as_millis()
        );
        result
    }
}

/// Runs `work` inside a write session.
///
/// Commits when `work` returns `Ok`; otherwise rolls back and returns the
/// error from `work` unchanged. Begin and commit failures are converted
/// through `E: From<rusqlite::Error>`.
pub fn with_session<T, E, F>(conn: &Connection, operation: &'static str, work: F) -> Result<T, E>
where
    F: FnOnce(&Connection) -> Result<T, E>,
    E: From<rusqlite::Error> + Display,
{
    run_session(conn, operation, SessionMode::Write, work)
}

/// Runs `work` inside a read session so multi-query reads see one snapshot.
pub fn with_read_session<T, E, F>(
    conn: &Connection,
    operation: &'static str,
    work: F,
) -> Result<T, E>
where
    F: FnOnce(&Connection) -> Result<T, E>,
    E: From<rusqlite::Error> + Display,
{
    run_session(conn, operation, SessionMode::Read, work)
}

fn run_session<T, E, F>(
    conn: &Connection,
    operation: &'static str,
    mode: SessionMode,
    work: F,
) -> Result<T, E>
where
    F: FnOnce(&Connection) -> Result<T, E>,
    E: From<rusqlite::Error> + Display,
{
    let session = Session::begin(conn, operation, mode)?;
    match work(session.conn()) {
        Ok(value) => {
            session.commit()?;
            Ok(value)
        }
        Err(err) => {
            warn!(
                "event=operation module=db op={} mode={} status=rolled_back error={}",
                operation,
                mode.as_str(),
                err
            );
            if let Err(rollback_err) = session.rollback() {
                warn!(
                    "event=session_rollback module=db op={operation} status=error error_code=rollback_failed error={rollback_err}"
                );
            }
            Err(err)
        }
    }
}
