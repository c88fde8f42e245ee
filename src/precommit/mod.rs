//! Pre-commit config merging for multi-subtree workspaces.
//!
//! Each subtree may carry its own `.pre-commit-config.yaml`, written as if
//! the subtree were the repository root. Promoting those hooks into one
//! workspace config needs every hook rewritten so that it:
//! - only matches files under its subtree (`files`/`exclude` anchoring)
//! - has a unique id when it is a local hook (subtree-prefixed ids)
//! - shows which subtree it belongs to (`[subtree] name`)
//! - finds its script when run from the workspace root (`entry` re-rooting)
//!
//! # Output layout
//!
//! Remote repo blocks come first, one per subtree usage, in manifest order.
//! All local hooks from all subtrees follow in a single `repo: local` block.
//!
//! # Usage
//!
//! ```ignore
//! use subtree_sync::precommit::{WorkspaceHookConfigs, merge_hook_configs, render_merged};
//!
//! let source = WorkspaceHookConfigs::new(&root, ".pre-commit-config.yaml");
//! let merged = merge_hook_configs(&manifest.subtrees, &source, "main")?;
//! if !merged.is_empty() {
//!     std::fs::write(root.join(".pre-commit-config.yaml"), render_merged(&merged)?)?;
//! }
//! ```

pub mod merge;
pub mod scope;
pub mod types;

pub use merge::{
    GENERATED_HEADER, HookConfigSource, WorkspaceHookConfigs, merge_hook_configs, render_merged,
};
pub use scope::{HookOrigin, flatten_verbose_regex, scope_hook};
pub use types::{Hook, HookConfig, LOCAL_REPO, META_REPO, RepoBlock};
