//! Keep workspace-level config files in sync with the subtrees embedded in
//! the workspace.
//!
//! Two independent derivations, both driven by the subtree manifest:
//! - [`precommit`]: scope each subtree's pre-commit hooks to its directory
//!   and merge them into one workspace hook config
//! - [`pyproject`]: register installable subtrees as editable dependencies
//!   in the workspace `pyproject.toml`, leaving the rest of the file alone
//!
//! The merge and reconcile steps are pure functions over in-memory
//! documents; file access lives in [`manifest`], [`util`] and the hook
//! config sources.

pub mod config;
pub mod errors;
pub mod manifest;
pub mod precommit;
pub mod pyproject;
pub mod sync_config;
pub mod util;

pub use errors::{Result, SyncError};
pub use manifest::{Manifest, Subtree};
