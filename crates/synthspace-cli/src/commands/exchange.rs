use std::{path::PathBuf, process::ExitCode};

use clap::Args;
use synthspace::core::{
    db::Store,
    exchange::{ExportOptions, export_workspace, import_workspace},
    types::RecordId,
};

use crate::commands::CliError;

///
/// ExportJsonlArgs
///

#[derive(Args, Debug)]
pub struct ExportJsonlArgs {
    /// SQLite DB path
    #[arg(long, default_value = "./data/workspace.db")]
    db: PathBuf,

    /// Output root; the export lands in a subdirectory named by workspace id
    #[arg(long, default_value = "./export")]
    out: PathBuf,

    /// Workspace id (defaults to the most recently created workspace)
    #[arg(long)]
    workspace_id: Option<String>,

    /// Gzip the JSONL outputs
    #[arg(long)]
    compress: bool,

    /// SQLite fetch chunk size
    #[arg(long, default_value_t = 2000)]
    chunk_size: u32,

    /// Only export messages with ts strictly greater than this
    #[arg(long)]
    messages_after_ts: Option<i64>,

    /// Only export files with created_ts strictly greater than this
    #[arg(long)]
    files_after_ts: Option<i64>,

    /// State file consulted before and rewritten after incremental exports
    #[arg(long)]
    incremental_state: Option<PathBuf>,
}

impl ExportJsonlArgs {
    pub fn run(self) -> Result<ExitCode, CliError> {
        let store = Store::open_read_only(&self.db)?;
        let workspace_id = self.workspace_id.map(RecordId::new);
        let options = ExportOptions {
            compress: self.compress,
            chunk_size: self.chunk_size,
            messages_after_ts: self.messages_after_ts,
            files_after_ts: self.files_after_ts,
            state_path: self.incremental_state,
        };

        let report = export_workspace(&store, &self.out, workspace_id.as_ref(), &options)?;
        println!("Wrote export to: {}", report.out_dir.display());

        Ok(ExitCode::SUCCESS)
    }
}

///
/// ImportJsonlArgs
///

#[derive(Args, Debug)]
pub struct ImportJsonlArgs {
    /// Export root containing the `<workspace-id>/` directory to load
    #[arg(long)]
    source: PathBuf,

    /// Workspace id to import
    #[arg(long)]
    workspace_id: String,

    /// SQLite DB path (created if missing)
    #[arg(long, default_value = "./data/workspace.db")]
    db: PathBuf,
}

impl ImportJsonlArgs {
    pub fn run(self) -> Result<ExitCode, CliError> {
        let store = Store::open(&self.db)?;
        let workspace_id = RecordId::new(self.workspace_id);
        let report = import_workspace(&store, &self.source, &workspace_id)?;

        println!("workspace: {}", report.workspace_id);
        println!(
            "users: {}  channels: {}  channel_members: {}  messages: {}  files: {}",
            report.counts.users,
            report.counts.channels,
            report.counts.channel_members,
            report.counts.messages,
            report.counts.files
        );

        Ok(ExitCode::SUCCESS)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use synthspace::core::{
        config::GenerationConfig, generate::run_generation, hook::HookRegistry,
    };

    fn seeded_db(dir: &Path) -> (PathBuf, RecordId) {
        let db = dir.join("source.db");
        let store = Store::open(&db).expect("open store");
        let config = GenerationConfig {
            workspace_name: "CliRoundtrip".to_string(),
            users: 3,
            channels: 2,
            dm_channels: 0,
            mpdm_channels: 0,
            messages: 5,
            files: 4,
            seed: 11,
            batch_size: 50,
            channel_members_min: 2,
            channel_members_max: 3,
            ..GenerationConfig::default()
        };
        let report =
            run_generation(&store, &config, &HookRegistry::new(), "test").expect("generate");

        (db, report.workspace_id)
    }

    #[test]
    fn export_then_import_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (source_db, workspace_id) = seeded_db(dir.path());
        let export_dir = dir.path().join("export");

        let export = ExportJsonlArgs {
            db: source_db,
            out: export_dir.clone(),
            workspace_id: None,
            compress: false,
            chunk_size: 2000,
            messages_after_ts: None,
            files_after_ts: None,
            incremental_state: None,
        };
        let _ = export.run().expect("export");
        assert!(export_dir.join(workspace_id.as_str()).join("summary.json").exists());

        let target_db = dir.path().join("target.db");
        let import = ImportJsonlArgs {
            source: export_dir,
            workspace_id: workspace_id.as_str().to_string(),
            db: target_db.clone(),
        };
        let _ = import.run().expect("import");

        let store = Store::open_read_only(&target_db).expect("open target");
        let summary = store.export_summary(&workspace_id).expect("summary");
        assert_eq!(summary.counts.users, 3);
        assert_eq!(summary.counts.channels, 2);
        assert_eq!(summary.counts.messages, 5);
        assert_eq!(summary.counts.files, 4);
    }
}
