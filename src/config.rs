use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::pyproject::ReconcileOptions;
use crate::sync_config::SyncToml;

/// Runtime configuration for one invocation.
///
/// Resolves `subtree-sync.toml`, the environment, and CLI flags into the
/// concrete paths and settings the sync commands use.
#[derive(Debug, Clone)]
pub struct Config {
    pub workspace: PathBuf,
    pub manifest_path: PathBuf,
    /// File name of each subtree's hook config
    pub hook_config_name: String,
    /// Where the merged hook config is written
    pub hook_config_path: PathBuf,
    pub pyproject_path: PathBuf,
    pub default_rev: String,
    pub reconcile: ReconcileOptions,
    /// Report drift instead of writing
    pub check: bool,
    /// The file-level configuration this was resolved from
    toml: SyncToml,
}

impl Config {
    /// Resolve configuration for `workspace`.
    ///
    /// `manifest` comes from `--manifest` or `SUBTREE_SYNC_MANIFEST` and
    /// beats `paths.manifest` in the file.
    pub fn new(workspace: &Path, manifest: Option<&Path>, check: bool) -> Result<Self> {
        let workspace = workspace
            .canonicalize()
            .with_context(|| format!("Failed to resolve workspace {}", workspace.display()))?;
        let toml = SyncToml::load_or_default(&workspace)?;
        Ok(Self::from_toml(workspace, toml, manifest, check))
    }

    /// Build a config from an already-loaded file section.
    pub fn from_toml(
        workspace: PathBuf,
        toml: SyncToml,
        manifest: Option<&Path>,
        check: bool,
    ) -> Self {
        let manifest_path = match manifest {
            Some(path) => workspace.join(path),
            None => workspace.join(&toml.paths.manifest),
        };

        Self {
            manifest_path,
            hook_config_name: toml.paths.hook_config.clone(),
            hook_config_path: workspace.join(&toml.paths.hook_config),
            pyproject_path: workspace.join(&toml.paths.pyproject),
            default_rev: toml.precommit.default_rev.clone(),
            reconcile: toml.pyproject.reconcile_options(),
            check,
            workspace,
            toml,
        }
    }

    pub fn toml(&self) -> &SyncToml {
        &self.toml
    }

    /// Path relative to the workspace, for messages.
    pub fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.workspace).unwrap_or(path).display()
    }
}
