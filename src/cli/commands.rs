// CLI command definitions

use super::launch::LaunchCommand;
use super::render::{PlaceholdersCommand, RenderCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "rw-kube",
    version,
    about = "Render rusty-workers Kubernetes manifests from templates",
    long_about = "Copies the manifest templates to <TEMPLATE_DIR>.<SUFFIX>, replaces the \
                  __PLACEHOLDER__ tokens with values from a shell-style config file and \
                  writes an apply.sh that runs `kubectl apply` once per manifest.\n\n\
                  Usage: rw-kube <CONFIG> <SUFFIX>",
    args_conflicts_with_subcommands = true
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Rendering options when no subcommand is given
    #[command(flatten)]
    pub render: RenderCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render templates into <TEMPLATE_DIR>.<SUFFIX> and generate apply.sh
    Render(RenderCommand),

    /// Show every placeholder token and the value it resolves to
    Placeholders(PlaceholdersCommand),

    /// Start a locally built server binary with the fixed development flags
    Launch(LaunchCommand),
}
