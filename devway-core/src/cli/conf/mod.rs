mod check;
mod dump;
#[cfg(test)]
mod tests;

pub use check::*;
use clap::Subcommand;
pub use dump::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to the config file (defaults to ./devway.toml when present)
        path: Option<PathBuf>,

        /// Print without colors
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Print resolved configuration
    Dump {
        path: Option<PathBuf>,

        /// Output as JSON (default)
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },
}

/// Dispatch a `devway config ...` subcommand.
pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path, plain } => check(path, plain),
        ConfigCmd::Dump { path, yaml, .. } => dump(path, yaml),
    }
}
