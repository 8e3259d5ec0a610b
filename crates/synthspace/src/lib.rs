//! Umbrella crate for Synthspace.
//!
//! ## Crate layout
//! - `core`: seeded streams, entity synthesis, hooks, the SQLite store,
//!   cursor pagination, JSONL exchange, and database validation.
//!
//! Downstream tooling should depend on this crate; the `prelude` mirrors the
//! vocabulary used when scripting generation runs.

pub use synthspace_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{Error, GENERATOR_NAME, GENERATOR_VERSION, SCHEMA_VERSION};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use serde::{Deserialize, Serialize};
}

///
/// TESTS
///
