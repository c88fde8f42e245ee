//! Dependency manifest (`pyproject.toml`) reconciliation.
//!
//! Installable subtrees become editable path dependencies of the workspace.
//! The reconciler owns exactly three keys and leaves everything else in the
//! document as it was, comments and formatting included:
//!
//! | Key                                        | Update rule                          |
//! |--------------------------------------------|--------------------------------------|
//! | `project.dependencies`                     | ordered union, new names appended    |
//! | `tool.<pkgmgr>.sources.<name>`             | `{ path, editable = true }`, upserted |
//! | `tool.<pkgmgr>.override-dependencies`      | ordered union, new names appended    |
//!
//! Names already present are never removed or reordered, even when the
//! subtree they came from is gone.

use crate::errors::{Result, SyncError};
use crate::manifest::Subtree;
use std::collections::HashMap;
use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, TableLike, Value};
use tracing::debug;

/// Settings that shape the generated entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Name of the `tool.<name>` table holding sources and overrides
    pub package_manager: String,
    /// `project.name` used when the document has no `[project]` table
    pub project_name: String,
    /// `project.version` used when the document has no `[project]` table
    pub project_version: String,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            package_manager: "uv".to_string(),
            project_name: "workspace".to_string(),
            project_version: "0.1.0".to_string(),
        }
    }
}

/// The reconciled document plus what changed in the list keys.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub document: DocumentMut,
    /// Package names for the installable subtrees, in manifest order
    pub packages: Vec<String>,
    pub added_dependencies: Vec<String>,
    pub added_overrides: Vec<String>,
}

/// Package name for a subtree path: `/` and `_` both become `-`.
///
/// Not injective; see [`package_names`].
pub fn package_name(path: &str) -> String {
    path.replace(['/', '_'], "-")
}

/// Package names for `subtrees`, rejecting two subtrees that map to the same name.
pub fn package_names(subtrees: &[&Subtree]) -> Result<Vec<String>> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut names = Vec::with_capacity(subtrees.len());

    for subtree in subtrees {
        let name = package_name(&subtree.path);
        if let Some(first) = owners.insert(name.clone(), &subtree.path) {
            return Err(SyncError::PackageNameCollision {
                name,
                first: first.to_string(),
                second: subtree.path.clone(),
            });
        }
        names.push(name);
    }

    Ok(names)
}

/// Parse an existing dependency manifest, keeping its formatting.
pub fn parse_pyproject(content: &str) -> Result<DocumentMut> {
    content
        .parse::<DocumentMut>()
        .map_err(SyncError::PyprojectParse)
}

/// Merge `installable` subtrees into `existing` (or into a fresh document).
///
/// Name collisions are checked before the document is touched.
pub fn reconcile(
    existing: Option<DocumentMut>,
    installable: &[&Subtree],
    options: &ReconcileOptions,
) -> Result<Reconciled> {
    let packages = package_names(installable)?;
    let mut document = existing.unwrap_or_default();
    let pkgmgr = options.package_manager.as_str();

    let root = document.as_table_mut();
    if !root.contains_key("project") {
        let mut project = Table::new();
        project.insert("name", toml_edit::value(options.project_name.as_str()));
        project.insert("version", toml_edit::value(options.project_version.as_str()));
        root.insert("project", Item::Table(project));
    }

    let project = root
        .get_mut("project")
        .and_then(Item::as_table_like_mut)
        .ok_or_else(|| SyncError::UnexpectedType {
            key: "project".to_string(),
            expected: "a table",
        })?;
    let added_dependencies =
        union_into(project, "dependencies", "project.dependencies", &packages)?;

    let tool = child_table(root, "tool", "tool", true)?;
    let tool_key = format!("tool.{pkgmgr}");
    let manager = child_table(tool, pkgmgr, &tool_key, false)?;

    let sources_key = format!("{tool_key}.sources");
    let sources = manager
        .entry("sources")
        .or_insert_with(|| Item::Table(Table::new()))
        .as_table_like_mut()
        .ok_or_else(|| SyncError::UnexpectedType {
            key: sources_key,
            expected: "a table",
        })?;
    for (subtree, name) in installable.iter().zip(&packages) {
        upsert_source(sources, name, subtree);
    }

    let added_overrides = union_into(
        manager,
        "override-dependencies",
        &format!("{tool_key}.override-dependencies"),
        &packages,
    )?;

    debug!(
        packages = packages.len(),
        added_dependencies = added_dependencies.len(),
        added_overrides = added_overrides.len(),
        "reconciled dependency manifest"
    );

    Ok(Reconciled {
        document,
        packages,
        added_dependencies,
        added_overrides,
    })
}

fn child_table<'a>(
    parent: &'a mut Table,
    key: &str,
    dotted: &str,
    implicit: bool,
) -> Result<&'a mut Table> {
    parent
        .entry(key)
        .or_insert_with(|| {
            let mut table = Table::new();
            table.set_implicit(implicit);
            Item::Table(table)
        })
        .as_table_mut()
        .ok_or_else(|| SyncError::UnexpectedType {
            key: dotted.to_string(),
            expected: "a table",
        })
}

/// Append the names missing from the string array at `parent[key]`.
fn union_into(
    parent: &mut dyn TableLike,
    key: &str,
    dotted: &str,
    names: &[String],
) -> Result<Vec<String>> {
    let array = parent
        .entry(key)
        .or_insert_with(|| toml_edit::value(Array::new()))
        .as_array_mut()
        .ok_or_else(|| SyncError::UnexpectedType {
            key: dotted.to_string(),
            expected: "an array of strings",
        })?;

    let mut present: Vec<String> = array
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    let mut added = Vec::new();

    for name in names {
        if present.contains(name) {
            continue;
        }
        push_like_last(array, name);
        present.push(name.clone());
        added.push(name.clone());
    }

    Ok(added)
}

/// Push `name`, laid out the way the array's existing items are.
fn push_like_last(array: &mut Array, name: &str) {
    let len = array.len();
    if len == 0 {
        array.push(name);
        return;
    }

    let mut value = Value::from(name);
    if let Some(last) = array.get_mut(len - 1) {
        // The first item of an inline array has no leading space.
        let prefix = match last.decor().prefix().and_then(|p| p.as_str()) {
            Some(p) if len > 1 || p.contains('\n') => p.to_string(),
            _ => " ".to_string(),
        };
        value.decor_mut().set_prefix(prefix);

        // Whitespace before `]` hangs off the last item when there is no
        // trailing comma; it has to move to the new last item.
        let suffix = last.decor().suffix().and_then(|s| s.as_str()).unwrap_or("");
        if !suffix.is_empty() {
            let suffix = suffix.to_string();
            last.decor_mut().set_suffix("");
            value.decor_mut().set_suffix(suffix);
        }
    }
    array.push_formatted(value);
}

fn upsert_source(sources: &mut dyn TableLike, name: &str, subtree: &Subtree) {
    let path = format!("./{}", subtree.path);

    let up_to_date = sources
        .get(name)
        .and_then(Item::as_table_like)
        .is_some_and(|entry| {
            entry.get("path").and_then(Item::as_str) == Some(path.as_str())
                && entry.get("editable").and_then(Item::as_bool) == Some(true)
                && entry.len() == 2
        });
    if up_to_date {
        return;
    }

    let mut source = InlineTable::new();
    source.insert("path", Value::from(path));
    source.insert("editable", Value::from(true));
    sources.insert(name, Item::Value(Value::InlineTable(source)));
}
