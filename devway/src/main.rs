use clap::{Parser, Subcommand};
use devway_core::cli::conf::ConfigCmd;
use devway_core::conf::load_config;
use devway_core::logging::init_logging;
use devway_core::server;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "devway",
    version,
    about = "devway: development reverse proxy for the frontend dev server"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },

    /// Run the dev proxy (default)
    Run {
        /// Path to the config file (defaults to ./devway.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { cmd }) => devway_core::cli::conf::run(cmd),
        Some(Command::Run { config }) => run(config.as_deref()),
        None => run(None),
    }
}

fn run(config: Option<&Path>) -> anyhow::Result<()> {
    init_logging();

    let cfg = load_config(config)?;
    tracing::debug!(rules = cfg.rules.len(), "configuration loaded");

    server::run(cfg)
}
