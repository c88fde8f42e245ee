//! Tool configuration read from `subtree-sync.toml` at the workspace root.
//!
//! The file is optional; every key has a default. Layering is
//! file → environment → CLI, resolved in [`crate::config::Config`].
//!
//! # Configuration File Format
//!
//! ```toml
//! [paths]
//! manifest = "subtrees.yaml"
//! hook_config = ".pre-commit-config.yaml"
//! pyproject = "pyproject.toml"
//!
//! [precommit]
//! default_rev = "main"
//!
//! [pyproject]
//! package_manager = "uv"
//! project_name = "workspace"
//! project_version = "0.1.0"
//! ```

use crate::pyproject::ReconcileOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the tool configuration, relative to the workspace root.
pub const CONFIG_FILE_NAME: &str = "subtree-sync.toml";

/// Input and output file names, relative to the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsSection {
    /// Subtree manifest
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Hook config file name, read inside each subtree and written at the root
    #[serde(default = "default_hook_config")]
    pub hook_config: String,
    /// Dependency manifest
    #[serde(default = "default_pyproject")]
    pub pyproject: String,
}

fn default_manifest() -> String {
    "subtrees.yaml".to_string()
}

fn default_hook_config() -> String {
    ".pre-commit-config.yaml".to_string()
}

fn default_pyproject() -> String {
    "pyproject.toml".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            hook_config: default_hook_config(),
            pyproject: default_pyproject(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecommitSection {
    /// `rev` given to remote repo blocks that do not pin one
    #[serde(default = "default_rev")]
    pub default_rev: String,
}

fn default_rev() -> String {
    "main".to_string()
}

impl Default for PrecommitSection {
    fn default() -> Self {
        Self {
            default_rev: default_rev(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyprojectSection {
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default = "default_project_version")]
    pub project_version: String,
}

fn default_package_manager() -> String {
    "uv".to_string()
}

fn default_project_name() -> String {
    "workspace".to_string()
}

fn default_project_version() -> String {
    "0.1.0".to_string()
}

impl Default for PyprojectSection {
    fn default() -> Self {
        Self {
            package_manager: default_package_manager(),
            project_name: default_project_name(),
            project_version: default_project_version(),
        }
    }
}

impl PyprojectSection {
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            package_manager: self.package_manager.clone(),
            project_name: self.project_name.clone(),
            project_version: self.project_version.clone(),
        }
    }
}

/// Contents of `subtree-sync.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncToml {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub precommit: PrecommitSection,
    #[serde(default)]
    pub pyproject: PyprojectSection,
}

impl SyncToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| format!("Failed to parse {CONFIG_FILE_NAME}"))
    }

    /// Load configuration from the workspace root.
    /// Returns default configuration if the file doesn't exist.
    pub fn load_or_default(workspace: &Path) -> Result<Self> {
        let config_path = workspace.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .with_context(|| format!("Failed to serialize {CONFIG_FILE_NAME}"))?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (key, value) in [
            ("paths.manifest", &self.paths.manifest),
            ("paths.hook_config", &self.paths.hook_config),
            ("paths.pyproject", &self.paths.pyproject),
            ("precommit.default_rev", &self.precommit.default_rev),
        ] {
            if value.trim().is_empty() {
                warnings.push(format!("{key} is empty"));
            }
        }

        let manager = &self.pyproject.package_manager;
        if manager.is_empty() || manager.contains('.') {
            warnings.push(format!(
                "Invalid pyproject.package_manager '{}': must be a single table name",
                manager
            ));
        }

        warnings
    }
}
