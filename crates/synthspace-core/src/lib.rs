//! Core engine for Synthspace: seeded draw streams, entity synthesis with
//! mutation hooks, the SQLite store, cursor pagination, JSONL exchange, and
//! database validation.

pub mod config;
pub mod cursor;
pub mod db;
pub mod error;
pub mod exchange;
pub mod generate;
pub mod hook;
pub mod lexicon;
pub mod model;
pub mod rng;
pub mod types;
pub mod validate;

pub use error::Error;

///
/// CONSTANTS
///

/// Identity string the generator writes into workspace metadata. Validation
/// warns when a database carries a different generator identity.
pub const GENERATOR_NAME: &str = "synthspace";

/// Version of the persisted SQLite layout this crate reads and writes.
/// Databases reporting a newer version are rejected by validation.
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version, recorded as `generator_version` in workspace metadata.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///
/// Domain vocabulary only. Errors, stores, and codec internals stay behind
/// their module paths.
///

pub mod prelude {
    pub use crate::{
        config::GenerationConfig,
        generate::Generator,
        hook::HookRegistry,
        model::{Channel, ChannelMember, File, Message, RecordKind, User, Workspace},
        types::{ChannelKind, RecordId},
    };
}
