use std::{path::PathBuf, process::ExitCode};

use clap::{Args, ValueEnum};
use synthspace::core::{
    config::GenerationConfig, db::Store, generate::run_generation, hook::HookRegistry,
};

use crate::commands::{CliError, write_json_pretty};

///
/// GenerateArgs
///
/// Entity counts come from the profile unless given explicitly; every other
/// knob has a plain default.
///

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Workspace display name
    #[arg(long, default_value = "Synth Workspace")]
    workspace: String,

    /// Size preset supplying any counts not given explicitly
    #[arg(long, value_enum, default_value_t = Profile::Quick)]
    profile: Profile,

    /// Number of users
    #[arg(long)]
    users: Option<u32>,

    /// Number of public/private channels
    #[arg(long)]
    channels: Option<u32>,

    /// Number of direct-message channels
    #[arg(long)]
    dm_channels: Option<u32>,

    /// Number of group direct-message channels
    #[arg(long)]
    mpdm_channels: Option<u32>,

    /// Number of messages
    #[arg(long)]
    messages: Option<u32>,

    /// Number of files
    #[arg(long)]
    files: Option<u32>,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// SQLite DB path
    #[arg(long, default_value = "./data/workspace.db")]
    db: PathBuf,

    /// Insert batch size
    #[arg(long, default_value_t = 500)]
    batch_size: u32,

    /// Fewest members placed in a regular channel
    #[arg(long, default_value_t = 8)]
    channel_members_min: u32,

    /// Most members placed in a regular channel
    #[arg(long, default_value_t = 120)]
    channel_members_max: u32,

    /// Fewest members placed in a group DM
    #[arg(long, default_value_t = 3)]
    mpdm_members_min: u32,

    /// Most members placed in a group DM
    #[arg(long, default_value_t = 7)]
    mpdm_members_max: u32,

    /// Write the workspace summary JSON here after generation
    #[arg(long)]
    export_summary: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn run(self) -> Result<ExitCode, CliError> {
        let config = self.config();
        let store = Store::open(&self.db)?;
        let report = run_generation(&store, &config, &HookRegistry::new(), self.profile.name())?;

        println!("workspace: {}", report.workspace_id);
        println!(
            "users: {}  channels: {}  channel_members: {}  messages: {}  files: {}",
            report.users, report.channels, report.channel_members, report.messages, report.files
        );

        if let Some(path) = &self.export_summary {
            let summary = store.export_summary(&report.workspace_id)?;
            write_json_pretty(path, &summary)?;
            println!("summary: {}", path.display());
        }

        Ok(ExitCode::SUCCESS)
    }

    fn config(&self) -> GenerationConfig {
        let preset = self.profile.counts();

        GenerationConfig {
            workspace_name: self.workspace.clone(),
            users: self.users.unwrap_or(preset.users),
            channels: self.channels.unwrap_or(preset.channels),
            dm_channels: self.dm_channels.unwrap_or(preset.dm_channels),
            mpdm_channels: self.mpdm_channels.unwrap_or(preset.mpdm_channels),
            messages: self.messages.unwrap_or(preset.messages),
            files: self.files.unwrap_or(preset.files),
            seed: self.seed,
            batch_size: self.batch_size,
            channel_members_min: self.channel_members_min,
            channel_members_max: self.channel_members_max,
            mpdm_members_min: self.mpdm_members_min,
            mpdm_members_max: self.mpdm_members_max,
        }
    }
}

///
/// Profile
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Profile {
    /// Small dataset for local iteration
    Quick,
    /// Everyday development workload
    Default,
    /// Large workspace with DMs and group DMs
    Enterprise,
}

struct ProfileCounts {
    users: u32,
    channels: u32,
    dm_channels: u32,
    mpdm_channels: u32,
    messages: u32,
    files: u32,
}

impl Profile {
    const fn counts(self) -> ProfileCounts {
        match self {
            Self::Quick => ProfileCounts {
                users: 200,
                channels: 20,
                dm_channels: 0,
                mpdm_channels: 0,
                messages: 5_000,
                files: 500,
            },
            Self::Default => ProfileCounts {
                users: 2_000,
                channels: 80,
                dm_channels: 0,
                mpdm_channels: 0,
                messages: 120_000,
                files: 5_000,
            },
            Self::Enterprise => ProfileCounts {
                users: 2_500,
                channels: 120,
                dm_channels: 1_800,
                mpdm_channels: 320,
                messages: 180_000,
                files: 9_000,
            },
        }
    }

    /// Name recorded in workspace run metadata.
    const fn name(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Default => "default",
            Self::Enterprise => "enterprise",
        }
    }
}

///
/// TESTS
///
