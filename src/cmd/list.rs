//! Subtree overview (`subtree-sync list`).

use anyhow::Result;
use subtree_sync::Manifest;
use subtree_sync::config::Config;
use subtree_sync::precommit::WorkspaceHookConfigs;
use subtree_sync::pyproject::package_name;

pub fn cmd_list(config: &Config) -> Result<()> {
    let Some(manifest) = Manifest::load_optional(&config.manifest_path)? else {
        println!("No {} found", config.display_path(&config.manifest_path));
        return Ok(());
    };
    if manifest.is_empty() {
        println!("No subtrees configured");
        return Ok(());
    }

    let hooks = WorkspaceHookConfigs::new(&config.workspace, &config.hook_config_name);

    println!();
    println!("Subtrees from: {}", config.display_path(&config.manifest_path));
    println!();
    println!("{:<30} {:<8} {:<30} Hooks", "Path", "Install", "Package");
    println!(
        "{:<30} {:<8} {:<30} -----",
        "------------------------------", "-------", "------------------------------"
    );

    for subtree in &manifest.subtrees {
        let package = if subtree.install {
            package_name(&subtree.path)
        } else {
            "-".to_string()
        };
        let has_hooks = if hooks.config_path(subtree).exists() {
            "yes"
        } else {
            "no"
        };
        println!(
            "{:<30} {:<8} {:<30} {}",
            subtree.path,
            if subtree.install { "yes" } else { "no" },
            package,
            has_hooks
        );
    }
    println!();

    Ok(())
}
