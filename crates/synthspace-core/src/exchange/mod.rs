//! Workspace interchange. Streaming JSONL export with optional gzip and
//! incremental cut-offs, and the matching idempotent import; every file
//! format here is line-oriented so tools can process exports with nothing
//! but a decompressor and a JSON parser.

mod export;
mod import;
mod jsonl;

pub use export::{ExportOptions, ExportReport, IncrementalState, export_workspace};
pub use import::{ImportReport, import_workspace};

use crate::db::StoreError;
use std::{io, path::PathBuf};
use thiserror::Error as ThisError;

///
/// ExchangeError
///

#[derive(Debug, ThisError)]
pub enum ExchangeError {
    #[error("no workspaces found in database; generate one first")]
    NoWorkspaces,

    #[error("workspace export not found at {}", .0.display())]
    ExportMissing(PathBuf),

    #[error("{}:{}: malformed jsonl row: {}", .path.display(), .line, .source)]
    MalformedRow {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
