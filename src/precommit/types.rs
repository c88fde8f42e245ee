//! Pre-commit config document types.
//!
//! These mirror the shape of a `.pre-commit-config.yaml` file closely enough
//! to read a subtree's config and write the merged workspace config:
//! - `HookConfig`: the whole document (`repos:` list)
//! - `RepoBlock`: one `repo` entry with its hooks
//! - `Hook`: one hook definition, with unknown keys carried through

use crate::util::{null_as_empty, scalar_as_string};
use serde::{Deserialize, Serialize};

/// Sentinel `repo` value for hooks defined in the repository itself.
pub const LOCAL_REPO: &str = "local";

/// Sentinel `repo` value for pre-commit's built-in meta hooks.
pub const META_REPO: &str = "meta";

/// A single pre-commit hook.
///
/// Only the keys the scoper rewrites are typed. Everything else (`args`,
/// `types`, `pass_filenames`, `stages`, ...) lands in `extra` and is written
/// back untouched after the typed keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// Include regex, matched against workspace-relative paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<String>,

    /// Exclude regex, possibly in verbose `(?x)` form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,

    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl Hook {
    /// Create a hook with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            alias: None,
            language: None,
            entry: None,
            files: None,
            exclude: None,
            extra: serde_yaml::Mapping::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_files(mut self, files: impl Into<String>) -> Self {
        self.files = Some(files.into());
        self
    }

    pub fn with_exclude(mut self, exclude: impl Into<String>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    /// Set `language` and `entry` together.
    pub fn with_entry(mut self, language: impl Into<String>, entry: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self.entry = Some(entry.into());
        self
    }
}

/// A group of hooks sharing one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoBlock {
    /// Remote repository URL, or one of the `local`/`meta` sentinels
    pub repo: String,

    #[serde(
        default,
        deserialize_with = "scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub rev: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub hooks: Vec<Hook>,
}

impl RepoBlock {
    pub fn local(hooks: Vec<Hook>) -> Self {
        Self {
            repo: LOCAL_REPO.to_string(),
            rev: None,
            hooks,
        }
    }

    pub fn remote(repo: impl Into<String>, rev: impl Into<String>, hooks: Vec<Hook>) -> Self {
        Self {
            repo: repo.into(),
            rev: Some(rev.into()),
            hooks,
        }
    }

    pub fn is_local(&self) -> bool {
        self.repo == LOCAL_REPO
    }

    pub fn is_meta(&self) -> bool {
        self.repo == META_REPO
    }
}

/// A whole pre-commit config document.
///
/// Used both for a single subtree's config and for the merged workspace
/// config. Top-level keys other than `repos` are not carried over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub repos: Vec<RepoBlock>,
}

impl HookConfig {
    /// Parse a config from YAML text. An empty document has no repos.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<HookConfig> = serde_yaml::from_str(content)?;
        Ok(config.unwrap_or_default())
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// The single `local` block, if any.
    pub fn local_block(&self) -> Option<&RepoBlock> {
        self.repos.iter().find(|r| r.is_local())
    }

    /// Total number of hooks across all blocks.
    pub fn hook_count(&self) -> usize {
        self.repos.iter().map(|r| r.hooks.len()).sum()
    }
}
