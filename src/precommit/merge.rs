//! Merge per-subtree pre-commit configs into one workspace config.

use super::scope::{HookOrigin, scope_hook};
use super::types::{Hook, HookConfig, RepoBlock};
use crate::errors::{Result, SyncError};
use crate::manifest::Subtree;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

/// First lines of every generated workspace config.
pub const GENERATED_HEADER: &str = "# AUTO-GENERATED from subtree pre-commit configs\n\
# Do not edit directly - run `subtree-sync precommit`\n";

/// Supplies the hook config for each subtree.
///
/// Returns `Ok(None)` when a subtree has no config; that subtree is skipped.
pub trait HookConfigSource {
    fn load(&self, subtree: &Subtree) -> Result<Option<HookConfig>>;
}

impl<F> HookConfigSource for F
where
    F: Fn(&Subtree) -> Result<Option<HookConfig>>,
{
    fn load(&self, subtree: &Subtree) -> Result<Option<HookConfig>> {
        self(subtree)
    }
}

/// Reads `<workspace>/<subtree>/<file_name>` from disk.
#[derive(Debug, Clone)]
pub struct WorkspaceHookConfigs {
    root: PathBuf,
    file_name: String,
}

impl WorkspaceHookConfigs {
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    /// Path of the hook config for `subtree`.
    pub fn config_path(&self, subtree: &Subtree) -> PathBuf {
        self.root.join(&subtree.path).join(&self.file_name)
    }
}

impl HookConfigSource for WorkspaceHookConfigs {
    fn load(&self, subtree: &Subtree) -> Result<Option<HookConfig>> {
        let path = self.config_path(subtree);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|source| SyncError::ReadFailed { path, source })?;
        HookConfig::parse(&content)
            .map(Some)
            .map_err(|source| SyncError::HookConfigParse {
                subtree: subtree.path.clone(),
                source,
            })
    }
}

/// Merge the hook configs of `subtrees` into one workspace config.
///
/// Remote blocks are emitted per subtree, in manifest then block order, and
/// are never consolidated across subtrees. All local hooks collect into one
/// trailing `local` block. Remote blocks without a `rev` get `default_rev`;
/// `meta` blocks never carry one.
///
/// Any load or parse error aborts the whole merge.
pub fn merge_hook_configs(
    subtrees: &[Subtree],
    source: &impl HookConfigSource,
    default_rev: &str,
) -> Result<HookConfig> {
    let mut repos = Vec::new();
    let mut local_hooks: Vec<Hook> = Vec::new();

    for subtree in subtrees {
        let Some(config) = source.load(subtree)? else {
            debug!(subtree = %subtree.path, "no hook config, skipping");
            continue;
        };
        debug!(
            subtree = %subtree.path,
            repos = config.repos.len(),
            "merging hook config"
        );

        for block in config.repos {
            if block.is_local() {
                local_hooks.extend(
                    block
                        .hooks
                        .iter()
                        .map(|h| scope_hook(h, &subtree.path, HookOrigin::Local)),
                );
                continue;
            }

            let rev = if block.is_meta() {
                None
            } else {
                Some(block.rev.unwrap_or_else(|| default_rev.to_string()))
            };
            let hooks = block
                .hooks
                .iter()
                .map(|h| scope_hook(h, &subtree.path, HookOrigin::Remote))
                .collect();
            repos.push(RepoBlock {
                repo: block.repo,
                rev,
                hooks,
            });
        }
    }

    if !local_hooks.is_empty() {
        warn_duplicate_ids(&local_hooks);
        repos.push(RepoBlock::local(local_hooks));
    }

    Ok(HookConfig { repos })
}

fn warn_duplicate_ids(hooks: &[Hook]) {
    let mut seen = HashSet::new();
    for hook in hooks {
        if !seen.insert(hook.id.as_str()) {
            warn!(id = %hook.id, "local hook id appears more than once after scoping");
        }
    }
}

/// Render a merged config as YAML with the generated-file header.
pub fn render_merged(config: &HookConfig) -> Result<String> {
    let body = serde_yaml::to_string(config).map_err(SyncError::Render)?;
    Ok(format!("{GENERATED_HEADER}\n{body}"))
}
