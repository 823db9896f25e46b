//! Development server launcher

use crate::domain::launcher::LaunchPlan;
use crate::infrastructure::constants::LAUNCH_DEFAULT_BINARY;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
pub struct LaunchCommand {
    /// Prebuilt server binary
    #[arg(long, value_name = "PATH", default_value = LAUNCH_DEFAULT_BINARY)]
    pub binary: PathBuf,

    /// Print the command line without starting the server
    #[arg(long)]
    pub dry_run: bool,
}

impl LaunchCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let plan = LaunchPlan::fixed(&self.binary);
        println!("{}", plan.command_line());

        if self.dry_run {
            return Ok(());
        }

        let status = plan
            .run()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to launch server: {}", e))?;

        if !status.success() {
            anyhow::bail!("Server exited with {}", status);
        }

        Ok(())
    }
}
