/// Applies a rename plan to the filesystem.
///
/// Items run in plan order. A failing item is logged and recorded against
/// its plan id; the remaining items still run and nothing is rolled back.
use crate::output::OutputFormatter;
use crate::rename_plan::{RenamePlan, RenamePlanItem};
use indicatif::ProgressBar;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Errors that can occur while renaming a single entry.
#[derive(Debug)]
pub enum RenameError {
    /// Another entry already occupies the target name.
    DestinationExists { path: PathBuf },
    /// The rename system call failed.
    RenameFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DestinationExists { path } => {
                write!(f, "Destination already exists: {}", path.display())
            }
            Self::RenameFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to rename {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for RenameError {}

/// Result type for rename operations.
pub type RenameResult<T> = Result<T, RenameError>;

/// What happened to one plan item.
#[derive(Debug)]
pub enum RenameOutcome {
    Renamed,
    /// The transliterated name equals the current one.
    Unchanged,
    /// Dry run: the item would have been renamed.
    WouldRename,
    Failed(RenameError),
}

/// Outcomes of a plan run, indexed by plan item id.
#[derive(Debug, Default)]
pub struct ExecutionReport {
    outcomes: Vec<RenameOutcome>,
}

impl ExecutionReport {
    /// Outcome recorded for the item with `id`.
    pub fn outcome(&self, id: usize) -> Option<&RenameOutcome> {
        self.outcomes.get(id)
    }

    /// The error for item `id`, if it failed.
    pub fn failure(&self, id: usize) -> Option<&RenameError> {
        match self.outcomes.get(id) {
            Some(RenameOutcome::Failed(error)) => Some(error),
            _ => None,
        }
    }

    pub fn renamed_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, RenameOutcome::Renamed))
    }

    pub fn unchanged_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, RenameOutcome::Unchanged))
    }

    pub fn would_rename_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, RenameOutcome::WouldRename))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, RenameOutcome::Failed(_)))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn count(&self, predicate: impl Fn(&RenameOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}

/// Renames a single entry according to its plan item.
///
/// Refuses to replace an existing entry. A change that only differs in
/// letter case is let through, since on case-insensitive filesystems the
/// "existing" destination is the entry itself.
pub fn rename_item(item: &RenamePlanItem) -> RenameResult<()> {
    let case_only = item.original_name.to_lowercase() == item.final_name.to_lowercase();
    if !case_only && fs::symlink_metadata(&item.new_path).is_ok() {
        return Err(RenameError::DestinationExists {
            path: item.new_path.clone(),
        });
    }

    fs::rename(&item.old_path, &item.new_path).map_err(|e| RenameError::RenameFailed {
        source: item.old_path.clone(),
        destination: item.new_path.clone(),
        source_error: e,
    })
}

/// Runs every item of `plan` in order.
///
/// With `dry_run` set nothing is touched and changing items are reported as
/// [`RenameOutcome::WouldRename`]. Console lines are printed around the
/// progress bar so they do not garble it.
pub fn execute_plan(plan: &RenamePlan, dry_run: bool, progress: &ProgressBar) -> ExecutionReport {
    let mut outcomes = Vec::with_capacity(plan.len());

    for item in &plan.items {
        let outcome = if !item.changes_name() {
            RenameOutcome::Unchanged
        } else if dry_run {
            progress.suspend(|| {
                OutputFormatter::dry_run_notice(&format!(
                    "{} -> {}",
                    item.relative_path.display(),
                    item.final_relative_path.display()
                ))
            });
            RenameOutcome::WouldRename
        } else {
            match rename_item(item) {
                Ok(()) => {
                    debug!(id = item.id, from = %item.old_path.display(), to = %item.new_path.display(), "renamed");
                    progress.suspend(|| {
                        OutputFormatter::success(&format!(
                            "Renamed: {} -> {}",
                            item.original_name, item.final_name
                        ))
                    });
                    RenameOutcome::Renamed
                }
                Err(e) => {
                    warn!(id = item.id, error = %e, "rename failed");
                    progress.suspend(|| {
                        OutputFormatter::error(&format!(
                            "Error renaming {}: {}",
                            item.old_path.display(),
                            e
                        ))
                    });
                    RenameOutcome::Failed(e)
                }
            }
        };
        outcomes.push(outcome);
        progress.inc(1);
    }

    progress.finish_and_clear();
    ExecutionReport { outcomes }
}
