use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use subtree_sync::config::Config;
use tracing_subscriber::EnvFilter;

mod cmd;

use cmd::SyncStatus;

#[derive(Parser)]
#[command(name = "subtree-sync")]
#[command(version, about = "Sync workspace configs from embedded subtrees")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Subtree manifest, relative to the workspace. Overrides subtree-sync.toml.
    #[arg(long, global = true, env = "SUBTREE_SYNC_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Don't write anything; fail if an output file is out of date
    #[arg(long, global = true)]
    pub check: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge subtree pre-commit configs into the workspace config
    Precommit,
    /// Add installable subtrees to the workspace pyproject.toml
    Pyproject,
    /// Run both syncs
    All,
    /// Show subtrees and what each one contributes
    List,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default subtree-sync.toml file
    Init,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "subtree_sync=debug"
    } else {
        "subtree_sync=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let workspace = match cli.workspace.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let config = Config::new(&workspace, cli.manifest.as_deref(), cli.check)?;

    let statuses = match &cli.command {
        Commands::Precommit => vec![cmd::cmd_precommit(&config)?],
        Commands::Pyproject => vec![cmd::cmd_pyproject(&config)?],
        Commands::All => vec![cmd::cmd_precommit(&config)?, cmd::cmd_pyproject(&config)?],
        Commands::List => {
            cmd::cmd_list(&config)?;
            Vec::new()
        }
        Commands::Config { command } => {
            cmd::cmd_config(&config, command.clone())?;
            Vec::new()
        }
    };

    if statuses.contains(&SyncStatus::OutOfDate) {
        anyhow::bail!("Generated files are out of date. Run `subtree-sync` without --check.");
    }

    Ok(())
}
