use std::{path::PathBuf, process::ExitCode};

use clap::Args;
use synthspace::core::{db::Store, exchange::ExchangeError, types::RecordId};

use crate::commands::{CliError, write_json_pretty};

///
/// StatsArgs
///

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// SQLite DB path
    #[arg(long, default_value = "./data/workspace.db")]
    db: PathBuf,

    /// Workspace id (defaults to the most recently created workspace)
    #[arg(long)]
    workspace_id: Option<String>,

    /// Also write the summary JSON to this path
    #[arg(long)]
    json_out: Option<PathBuf>,
}

impl StatsArgs {
    pub fn run(self) -> Result<ExitCode, CliError> {
        let store = Store::open_read_only(&self.db)?;
        let workspace_id = match self.workspace_id {
            Some(id) => RecordId::new(id),
            None => store
                .latest_workspace_id()?
                .ok_or(ExchangeError::NoWorkspaces)?,
        };

        let summary = store.export_summary(&workspace_id)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);

        if let Some(path) = &self.json_out {
            write_json_pretty(path, &summary)?;
        }

        Ok(ExitCode::SUCCESS)
    }
}
