pub mod exchange;
pub mod generate;
pub mod serve;
pub mod stats;
pub mod validate;

use std::{fs, io, path::Path};

use serde::Serialize;
use synthspace::core::{db::StoreError, exchange::ExchangeError};
use thiserror::Error as ThisError;

///
/// CliError
///
/// Everything a subcommand can fail with. All variants are transparent;
/// main prints them behind a single `error:` prefix.
///

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] synthspace::Error),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pretty-print `value` as JSON into `path`, creating parent directories
/// as needed.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), CliError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text)?;

    Ok(())
}
