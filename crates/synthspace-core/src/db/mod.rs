//! SQLite persistence. One connection behind a mutex; writable opens apply
//! pragmas and the schema migration, read-only opens never create or alter
//! the file, so the API server and validator can point at unknown databases
//! safely.

mod insert;
mod iter;
mod page;
mod row;
pub(crate) mod schema;
mod workspace;

pub use insert::WriteMode;
pub use page::ActivityFilter;
pub use workspace::{EntityCounts, ExportSummary, SummaryMax};

use crate::{cursor::CursorError, types::RecordId};
use rusqlite::{Connection, OpenFlags};
use std::{
    fs, io,
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(RecordId),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

///
/// Store
///
/// One SQLite database holding any number of generated workspaces. All reads
/// and writes go through explicit methods; the connection never leaks out.
///

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open a writable store, creating the file (and parent directories) if
    /// needed, and bring the schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA temp_store=MEMORY;
             PRAGMA cache_size=20000;",
        )?;
        schema::init(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an existing database without write access. No pragmas, no schema
    /// changes; a missing file is an error, never created.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Throwaway in-memory store with the full schema applied.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::init(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// The store is single-writer; a poisoned lock only means a panic
    /// elsewhere aborted mid-read, so the connection itself is still sound.
    pub(in crate::db) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

///
/// TESTS
///
