//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module      | Commands handled           |
//! |-------------|----------------------------|
//! | `precommit` | `Precommit`, `All`         |
//! | `pyproject` | `Pyproject`, `All`         |
//! | `list`      | `List`                     |
//! | `config`    | `Config`                   |

pub mod config;
pub mod list;
pub mod precommit;
pub mod pyproject;

pub use config::cmd_config;
pub use list::cmd_list;
pub use precommit::cmd_precommit;
pub use pyproject::cmd_pyproject;

use console::style;
use std::path::Path;
use subtree_sync::config::Config;
use subtree_sync::util::WriteOutcome;

/// How a sync command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No input to derive an output from; nothing was written
    NothingToDo,
    UpToDate,
    Written,
    /// Check mode found the output stale
    OutOfDate,
}

/// Print the result of writing `path` and map it to a status.
pub(crate) fn report_write(config: &Config, path: &Path, outcome: WriteOutcome) -> SyncStatus {
    let shown = config.display_path(path);
    match outcome {
        WriteOutcome::Written => {
            println!("{} {}", style("Wrote").green(), shown);
            SyncStatus::Written
        }
        WriteOutcome::Unchanged => {
            println!("{} is up to date", shown);
            SyncStatus::UpToDate
        }
        WriteOutcome::WouldChange => {
            println!("{} {} is out of date", style("!").yellow(), shown);
            SyncStatus::OutOfDate
        }
    }
}
