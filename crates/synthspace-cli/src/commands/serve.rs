use std::{path::PathBuf, process::ExitCode};

use clap::Args;

use crate::commands::CliError;

///
/// ServeArgs
///

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// SQLite DB path
    #[arg(long, env = "SYNTHSPACE_DB", default_value = "./data/workspace.db")]
    db: PathBuf,

    /// Bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl ServeArgs {
    pub fn run(self) -> Result<ExitCode, CliError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        runtime.block_on(synthspace_server::serve(self.db, &self.host, self.port))?;

        Ok(ExitCode::SUCCESS)
    }
}
