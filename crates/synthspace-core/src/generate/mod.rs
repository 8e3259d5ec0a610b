//! Entity synthesis. A [`Generator`] owns the run's general-purpose draw
//! stream and text provider; identifier streams are derived per kind so each
//! family replays independently. Workspace, users, channels, and members are
//! materialized; messages and files are lazy single-pass streams.

mod channels;
mod files;
mod members;
mod messages;
mod run;
mod users;
mod workspace;

pub use files::FileStream;
pub use messages::MessageStream;
pub use run::{GenerationReport, run_generation};

use crate::{
    config::{ConfigError, GenerationConfig},
    hook::{HookError, HookRegistry},
    lexicon::Lexicon,
    model::RecordKind,
    rng::{SeedStream, StreamKind},
    types::RecordId,
};
use thiserror::Error as ThisError;

///
/// GenerateError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("referential gap: {entity} synthesis received no {dependency} ids")]
    ReferentialGap {
        entity: RecordKind,
        dependency: RecordKind,
    },
}

///
/// Generator
///
/// All synthesis goes through one of these. Construction validates the
/// config, so a generator in hand is always safe to drive. Methods must be
/// called in dependency order (workspace, users, channels, members, then the
/// message/file streams); the id lists each stage hands the next are what
/// keep the dataset referentially closed.
///

pub struct Generator<'h> {
    config: GenerationConfig,
    hooks: &'h HookRegistry,
    general: SeedStream,
    lexicon: Lexicon,
    base_ts: i64,
}

impl<'h> Generator<'h> {
    pub fn new(config: GenerationConfig, hooks: &'h HookRegistry) -> Result<Self, ConfigError> {
        config.validate()?;

        let general = SeedStream::from_seed(config.seed);
        let lexicon = Lexicon::from_seed(config.seed);
        let base_ts = config.base_ts();

        Ok(Self {
            config,
            hooks,
            general,
            lexicon,
            base_ts,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    #[must_use]
    pub const fn base_ts(&self) -> i64 {
        self.base_ts
    }

    /// Identity sub-stream for one record family, namespaced by workspace.
    pub(in crate::generate) fn id_stream(
        &self,
        kind: StreamKind,
        workspace_id: &RecordId,
    ) -> SeedStream {
        SeedStream::derive(self.config.seed, kind, workspace_id.as_str())
    }
}
