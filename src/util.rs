//! Shared utility functions for the subtree-sync crate.

use crate::errors::{Result, SyncError};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// Deserialize a YAML list that may be written as an empty key (`repos:`).
pub fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize an optional scalar as a string, so `rev: 1.0` reads as `"1.0"`.
pub fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a scalar, found {other:?}"
        ))),
    }
}

/// What happened when an output document was handed to [`write_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File already had exactly this content
    Unchanged,
    /// File was created or overwritten
    Written,
    /// Check mode: file differs (or is missing) and was left alone
    WouldChange,
}

/// Write `content` to `path` unless the file already holds the same bytes.
///
/// With `check` set nothing is ever written; the outcome tells the caller
/// whether a write would have happened.
pub fn write_if_changed(path: &Path, content: &str, check: bool) -> Result<WriteOutcome> {
    let current = match std::fs::read_to_string(path) {
        Ok(current) => Some(current),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => {
            return Err(SyncError::ReadFailed {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if current.as_deref() == Some(content) {
        return Ok(WriteOutcome::Unchanged);
    }
    if check {
        return Ok(WriteOutcome::WouldChange);
    }

    std::fs::write(path, content).map_err(|source| SyncError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(WriteOutcome::Written)
}
