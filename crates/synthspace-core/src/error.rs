use crate::{
    config::ConfigError, cursor::CursorError, db::StoreError, exchange::ExchangeError,
    generate::GenerateError, hook::HookError,
};
use thiserror::Error as ThisError;

///
/// Error
///
/// The single error surface of the crate. Every subsystem error converts in
/// transparently so callers can match on one type without losing the source.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
