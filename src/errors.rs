//! Typed error hierarchy for subtree-sync.
//!
//! Everything in here is fatal. "Nothing to do" situations (no manifest, no
//! subtrees, no installable subtrees) are not errors and never reach this type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading inputs or merging them into an output document.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse subtree manifest: {0}")]
    ManifestParse(#[source] serde_yaml::Error),

    #[error("Failed to parse hook config for subtree '{subtree}': {source}")]
    HookConfigParse {
        subtree: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse dependency manifest: {0}")]
    PyprojectParse(#[source] toml_edit::TomlError),

    #[error("Failed to render merged hook config: {0}")]
    Render(#[source] serde_yaml::Error),

    #[error("Invalid subtree path '{path}': {reason}")]
    InvalidSubtreePath { path: String, reason: &'static str },

    #[error("Subtree '{path}' is listed more than once in the manifest")]
    DuplicateSubtree { path: String },

    #[error("Subtrees '{first}' and '{second}' both map to package name '{name}'")]
    PackageNameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("Dependency manifest key '{key}' must be {expected}")]
    UnexpectedType { key: String, expected: &'static str },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
