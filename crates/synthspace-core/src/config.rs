use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// GenerationConfig
///
/// Fully resolved knobs for one generation run. Callers resolve profiles and
/// overrides before constructing this; the engine never consults optional
/// values. The five count fields plus the workspace name form the shape
/// namespace, so changing any of them re-keys every derived identifier.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub workspace_name: String,
    pub users: u32,
    pub channels: u32,
    pub dm_channels: u32,
    pub mpdm_channels: u32,
    pub messages: u32,
    pub files: u32,
    pub seed: u64,
    pub batch_size: u32,
    pub channel_members_min: u32,
    pub channel_members_max: u32,
    pub mpdm_members_min: u32,
    pub mpdm_members_max: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            workspace_name: "Synth Workspace".to_string(),
            users: 2_000,
            channels: 80,
            dm_channels: 0,
            mpdm_channels: 0,
            messages: 120_000,
            files: 5_000,
            seed: 42,
            batch_size: 500,
            channel_members_min: 8,
            channel_members_max: 120,
            mpdm_members_min: 3,
            mpdm_members_max: 7,
        }
    }
}

impl GenerationConfig {
    /// Fail-fast sanity checks, run before anything is written.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::BatchSizeZero);
        }
        if self.channel_members_min == 0 {
            return Err(ConfigError::ChannelMembersMinZero);
        }
        if self.mpdm_members_min == 0 {
            return Err(ConfigError::MpdmMembersMinZero);
        }
        if self.channel_members_min > self.channel_members_max {
            return Err(ConfigError::ChannelMemberBoundsInverted);
        }
        if self.mpdm_members_min > self.mpdm_members_max {
            return Err(ConfigError::MpdmMemberBoundsInverted);
        }

        let dependents = self.dm_channels > 0
            || self.mpdm_channels > 0
            || self.messages > 0
            || self.files > 0;
        if self.users == 0 && dependents {
            return Err(ConfigError::UsersRequired);
        }

        let total_channels = self
            .channels
            .saturating_add(self.dm_channels)
            .saturating_add(self.mpdm_channels);
        if total_channels == 0 && (self.messages > 0 || self.files > 0) {
            return Err(ConfigError::ChannelsRequired);
        }

        Ok(())
    }

    /// The run's base timestamp. Message and file timestamps fall in the 30
    /// day window ending here.
    #[must_use]
    pub fn base_ts(&self) -> i64 {
        let jitter = (self.seed % 10_000) * 100;
        1_700_000_000_i64.saturating_add_unsigned(jitter)
    }

    /// Namespace for the workspace identity stream, covering every
    /// shape-affecting field.
    pub(crate) fn shape_namespace(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.workspace_name,
            self.users,
            self.channels,
            self.dm_channels,
            self.mpdm_channels,
            self.messages,
            self.files
        )
    }
}

///
/// ConfigError
///
/// Message texts double as CLI output, so they speak in flag spelling.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("batch-size must be >= 1")]
    BatchSizeZero,

    #[error("channel-members-min must be >= 1")]
    ChannelMembersMinZero,

    #[error("mpdm-members-min must be >= 1")]
    MpdmMembersMinZero,

    #[error("channel-members-min must be <= channel-members-max")]
    ChannelMemberBoundsInverted,

    #[error("mpdm-members-min must be <= mpdm-members-max")]
    MpdmMemberBoundsInverted,

    #[error("users must be > 0 when dm channels, mpdm channels, messages, or files are requested")]
    UsersRequired,

    #[error("messages and files require at least one channel")]
    ChannelsRequired,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        GenerationConfig::default()
            .validate()
            .expect("defaults validate");
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = GenerationConfig {
            batch_size: 0,
            ..GenerationConfig::default()
        };
        let err = config.validate().expect_err("batch size 0");
        assert_eq!(err, ConfigError::BatchSizeZero);
        assert_eq!(err.to_string(), "batch-size must be >= 1");
    }

    #[test]
    fn inverted_member_bounds_are_rejected() {
        let config = GenerationConfig {
            channel_members_min: 50,
            channel_members_max: 10,
            ..GenerationConfig::default()
        };
        assert_eq!(
            config.validate().expect_err("min above max"),
            ConfigError::ChannelMemberBoundsInverted
        );

        let config = GenerationConfig {
            mpdm_members_min: 9,
            mpdm_members_max: 4,
            ..GenerationConfig::default()
        };
        assert_eq!(
            config.validate().expect_err("mpdm min above max"),
            ConfigError::MpdmMemberBoundsInverted
        );
    }

    #[test]
    fn zero_users_with_dependents_is_rejected() {
        let config = GenerationConfig {
            users: 0,
            ..GenerationConfig::default()
        };
        let err = config.validate().expect_err("users 0 with messages");
        assert!(err.to_string().starts_with("users must be > 0"));
    }

    #[test]
    fn zero_users_without_dependents_is_allowed() {
        let config = GenerationConfig {
            users: 0,
            dm_channels: 0,
            mpdm_channels: 0,
            messages: 0,
            files: 0,
            ..GenerationConfig::default()
        };
        config.validate().expect("users-only-zero validates");
    }

    #[test]
    fn messages_without_any_channel_are_rejected() {
        let config = GenerationConfig {
            channels: 0,
            dm_channels: 0,
            mpdm_channels: 0,
            files: 0,
            ..GenerationConfig::default()
        };
        assert_eq!(
            config.validate().expect_err("messages without channels"),
            ConfigError::ChannelsRequired
        );
    }

    #[test]
    fn base_ts_tracks_the_seed_window() {
        let config = GenerationConfig {
            seed: 42,
            ..GenerationConfig::default()
        };
        assert_eq!(config.base_ts(), 1_700_000_000 + 42 * 100);

        let config = GenerationConfig {
            seed: 20_001,
            ..GenerationConfig::default()
        };
        assert_eq!(config.base_ts(), 1_700_000_000 + 100);
    }

    #[test]
    fn shape_namespace_joins_all_shape_fields() {
        let config = GenerationConfig {
            workspace_name: "Acme".to_string(),
            users: 10,
            channels: 4,
            dm_channels: 2,
            mpdm_channels: 1,
            messages: 100,
            files: 5,
            ..GenerationConfig::default()
        };
        assert_eq!(config.shape_namespace(), "Acme|10|4|2|1|100|5");
    }
}
