//! Merged hook config generation (`subtree-sync precommit`).

use anyhow::Result;
use subtree_sync::Manifest;
use subtree_sync::config::Config;
use subtree_sync::manifest::Subtree;
use subtree_sync::precommit::{
    HookConfig, HookConfigSource, WorkspaceHookConfigs, merge_hook_configs, render_merged,
};
use subtree_sync::util::write_if_changed;
use tracing::info;

use super::{SyncStatus, report_write};

pub fn cmd_precommit(config: &Config) -> Result<SyncStatus> {
    let Some(manifest) = Manifest::load_optional(&config.manifest_path)? else {
        println!("No {} found", config.display_path(&config.manifest_path));
        return Ok(SyncStatus::NothingToDo);
    };
    if manifest.is_empty() {
        println!("No subtrees configured");
        return Ok(SyncStatus::NothingToDo);
    }

    let disk = WorkspaceHookConfigs::new(&config.workspace, &config.hook_config_name);
    let source = |subtree: &Subtree| -> subtree_sync::Result<Option<HookConfig>> {
        let loaded = disk.load(subtree)?;
        if loaded.is_some() {
            println!("Processing {}/{}", subtree.path, config.hook_config_name);
        }
        Ok(loaded)
    };

    let merged = merge_hook_configs(&manifest.subtrees, &source, &config.default_rev)?;
    if merged.is_empty() {
        println!("No pre-commit configs found in subtrees");
        return Ok(SyncStatus::NothingToDo);
    }
    info!(
        repos = merged.repos.len(),
        hooks = merged.hook_count(),
        "merged subtree hook configs"
    );

    let rendered = render_merged(&merged)?;
    let outcome = write_if_changed(&config.hook_config_path, &rendered, config.check)?;
    Ok(report_write(config, &config.hook_config_path, outcome))
}
