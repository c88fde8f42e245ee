//! Dependency manifest reconciliation (`subtree-sync pyproject`).

use anyhow::Result;
use subtree_sync::config::Config;
use subtree_sync::pyproject::{parse_pyproject, reconcile};
use subtree_sync::util::write_if_changed;
use subtree_sync::{Manifest, SyncError};
use tracing::info;

use super::{SyncStatus, report_write};

pub fn cmd_pyproject(config: &Config) -> Result<SyncStatus> {
    let Some(manifest) = Manifest::load_optional(&config.manifest_path)? else {
        println!("No {} found", config.display_path(&config.manifest_path));
        return Ok(SyncStatus::NothingToDo);
    };

    let installable = manifest.installable();
    if installable.is_empty() {
        println!("No installable subtrees found");
        return Ok(SyncStatus::NothingToDo);
    }

    let path = &config.pyproject_path;
    let existing = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| SyncError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        Some(parse_pyproject(&content)?)
    } else {
        None
    };

    let reconciled = reconcile(existing, &installable, &config.reconcile)?;
    info!(
        packages = reconciled.packages.len(),
        added_dependencies = ?reconciled.added_dependencies,
        added_overrides = ?reconciled.added_overrides,
        "reconciled installable subtrees"
    );

    let outcome = write_if_changed(path, &reconciled.document.to_string(), config.check)?;
    let status = report_write(config, path, outcome);
    if status == SyncStatus::Written {
        println!(
            "Updated {} with {} installable package(s)",
            config.display_path(path),
            installable.len()
        );
    }
    Ok(status)
}
