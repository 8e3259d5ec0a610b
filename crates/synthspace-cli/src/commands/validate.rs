use std::{path::PathBuf, process::ExitCode};

use clap::Args;
use synthspace::core::validate::validate_db;

use crate::commands::CliError;

///
/// ValidateDbArgs
///
/// Prints the report JSON to stdout whatever the outcome; the exit code is
/// the pass/fail signal for scripts.
///

#[derive(Args, Debug)]
pub struct ValidateDbArgs {
    /// SQLite DB path
    #[arg(long, default_value = "./data/workspace.db")]
    db: PathBuf,

    /// Workspace id to inspect (defaults to the most recently created)
    #[arg(long)]
    workspace_id: Option<String>,

    /// Fail when the database holds no workspace row
    #[arg(long)]
    require_workspace: bool,
}

impl ValidateDbArgs {
    pub fn run(self) -> Result<ExitCode, CliError> {
        let report = validate_db(
            &self.db,
            self.workspace_id.as_deref(),
            self.require_workspace,
            Some(synthspace::VERSION),
        );

        println!("{}", serde_json::to_string_pretty(&report)?);

        Ok(if report.ok {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
