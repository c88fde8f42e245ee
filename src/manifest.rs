//! Subtree manifest (`subtrees.yaml`) loading.
//!
//! The manifest is owned by whatever tool vendors the subtrees in; we only
//! read `path` and `install` from each entry and ignore everything else.
//!
//! ```yaml
//! subtrees:
//!   - path: libs/core
//!     remote: git@example.com:core.git
//!     install: true
//!   - path: tools/lint
//! ```

use crate::errors::{Result, SyncError};
use crate::util::null_as_empty;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// One embedded package directory inside the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subtree {
    /// Workspace-relative directory, no leading or trailing slash
    pub path: String,
    /// Whether the subtree is installed as an editable package
    #[serde(default)]
    pub install: bool,
}

impl Subtree {
    pub fn new(path: impl Into<String>, install: bool) -> Self {
        Self {
            path: path.into(),
            install,
        }
    }

    fn validate(&self) -> Result<()> {
        let reason = if self.path.is_empty() {
            Some("path is empty")
        } else if self.path.starts_with('/') {
            Some("path must be relative to the workspace root")
        } else if self.path.ends_with('/') {
            Some("path must not end with '/'")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SyncError::InvalidSubtreePath {
                path: self.path.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// The parsed subtree manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subtrees: Vec<Subtree>,
}

impl Manifest {
    /// Parse and validate a manifest from YAML text.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file deserializes to unit, not to a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let manifest: Option<Manifest> =
            serde_yaml::from_str(content).map_err(SyncError::ManifestParse)?;
        let manifest = manifest.unwrap_or_default();
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SyncError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load a manifest, returning `None` when the file does not exist.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for subtree in &self.subtrees {
            subtree.validate()?;
            if !seen.insert(subtree.path.as_str()) {
                return Err(SyncError::DuplicateSubtree {
                    path: subtree.path.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.subtrees.is_empty()
    }

    /// Subtrees flagged for installation, in manifest order.
    pub fn installable(&self) -> Vec<&Subtree> {
        self.subtrees.iter().filter(|s| s.install).collect()
    }
}
