//! Configuration view and validation commands (`subtree-sync config`).

use anyhow::Result;
use subtree_sync::config::Config;
use subtree_sync::sync_config::{CONFIG_FILE_NAME, SyncToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &Config, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.workspace.join(CONFIG_FILE_NAME);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No {} found, using defaults", CONFIG_FILE_NAME);
            }
            println!();

            let toml = config.toml();
            println!("[paths]");
            println!("  manifest = \"{}\"", toml.paths.manifest);
            println!("  hook_config = \"{}\"", toml.paths.hook_config);
            println!("  pyproject = \"{}\"", toml.paths.pyproject);
            println!();
            println!("[precommit]");
            println!("  default_rev = \"{}\"", toml.precommit.default_rev);
            println!();
            println!("[pyproject]");
            println!("  package_manager = \"{}\"", toml.pyproject.package_manager);
            println!("  project_name = \"{}\"", toml.pyproject.project_name);
            println!("  project_version = \"{}\"", toml.pyproject.project_version);
            println!();

            println!("Effective paths (with env/CLI overrides):");
            println!("  manifest = {}", config.manifest_path.display());
            println!("  hook config output = {}", config.hook_config_path.display());
            println!("  pyproject = {}", config.pyproject_path.display());
            println!();
        }
        Some(ConfigCommands::Validate) => {
            if !config_path.exists() {
                println!("No {} found. Using defaults (valid).", CONFIG_FILE_NAME);
                return Ok(());
            }

            let warnings = config.toml().validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("{} already exists at {}", CONFIG_FILE_NAME, config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            SyncToml::default().save(&config_path)?;
            println!("Created {} at {}", CONFIG_FILE_NAME, config_path.display());
        }
    }

    Ok(())
}
