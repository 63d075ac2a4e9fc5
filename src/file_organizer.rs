/// Moving dated entries into their date folders.
///
/// Each date group gets a folder named after its canonical date directly
/// under the root. An entry whose name already exists in that folder is
/// left where it is; nothing is overwritten or merged.
use crate::date_groups::DateGroups;
use crate::output::OutputFormatter;
use crate::rename_plan::{EntryKind, FsEntry};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Errors that can occur during date sorting.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a date directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move an entry into its date directory.
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for date sorting operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// What happened to one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(PathBuf),
    /// Something with the same name is already at the destination.
    Skipped(PathBuf),
}

/// Summary of a sorting run.
#[derive(Debug, Default)]
pub struct MoveReport {
    /// Date folders created during the run.
    pub created_dirs: Vec<PathBuf>,
    pub moved: usize,
    pub would_move: usize,
    /// Entries left alone because the destination name was taken.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Sorts grouped entries into date folders.
pub struct DateOrganizer;

impl DateOrganizer {
    /// Makes sure `root/<date>` exists as a directory.
    ///
    /// Returns the folder path and whether it had to be created.
    pub fn ensure_date_dir(root: &Path, date: &str) -> OrganizeResult<(PathBuf, bool)> {
        let date_dir = root.join(date);
        if date_dir.is_dir() {
            return Ok((date_dir, false));
        }

        fs::create_dir(&date_dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: date_dir.clone(),
            source: e,
        })?;
        Ok((date_dir, true))
    }

    /// Moves one entry into `date_dir` unless the name is already taken there.
    pub fn move_into(entry_path: &Path, date_dir: &Path) -> OrganizeResult<MoveOutcome> {
        let name = entry_path
            .file_name()
            .ok_or_else(|| OrganizeError::MoveFailed {
                source: entry_path.to_path_buf(),
                destination: date_dir.to_path_buf(),
                source_error: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "entry has no name component",
                ),
            })?;
        let destination = date_dir.join(name);

        if fs::symlink_metadata(&destination).is_ok() {
            return Ok(MoveOutcome::Skipped(destination));
        }

        fs::rename(entry_path, &destination).map_err(|e| OrganizeError::MoveFailed {
            source: entry_path.to_path_buf(),
            destination: destination.clone(),
            source_error: e,
        })?;

        Ok(MoveOutcome::Moved(destination))
    }

    /// Creates date folders and moves every grouped entry into them.
    ///
    /// Groups run in date order, folders before files. Per-entry failures are
    /// reported and counted; the remaining entries still move. If a date
    /// folder cannot be created, every entry of that group is counted as
    /// failed.
    pub fn organize(root: &Path, groups: &DateGroups, dry_run: bool) -> OrganizeResult<MoveReport> {
        if !root.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: root.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "base path does not exist",
                ),
            });
        }

        let mut report = MoveReport::default();

        for (date, group) in groups {
            let entries = group.folders.iter().chain(group.files.iter());

            if dry_run {
                for entry in entries {
                    OutputFormatter::dry_run_notice(&format!(
                        "Would move {} {} -> {}/",
                        entry.kind.label(),
                        entry.original_name,
                        date
                    ));
                    report.would_move += 1;
                }
                continue;
            }

            let date_dir = match Self::ensure_date_dir(root, date) {
                Ok((date_dir, created)) => {
                    if created {
                        OutputFormatter::info(&format!("Created folder: {}", date));
                        report.created_dirs.push(date_dir.clone());
                    }
                    date_dir
                }
                Err(e) => {
                    warn!(date = %date, error = %e, "cannot create date folder");
                    OutputFormatter::error(&e.to_string());
                    for entry in entries {
                        report
                            .failed
                            .push((entry.absolute_path.clone(), e.to_string()));
                    }
                    continue;
                }
            };

            for entry in entries {
                Self::move_entry(entry, &date_dir, date, &mut report);
            }
        }

        Ok(report)
    }

    fn move_entry(entry: &FsEntry, date_dir: &Path, date: &str, report: &mut MoveReport) {
        let label = match entry.kind {
            EntryKind::Directory => "Moved folder",
            EntryKind::File => "Moved file",
        };

        match Self::move_into(&entry.absolute_path, date_dir) {
            Ok(MoveOutcome::Moved(destination)) => {
                debug!(from = %entry.absolute_path.display(), to = %destination.display(), "moved");
                OutputFormatter::success(&format!("{}: {} -> {}/", label, entry.original_name, date));
                report.moved += 1;
            }
            Ok(MoveOutcome::Skipped(destination)) => {
                OutputFormatter::warning(&format!(
                    "Skipped {}: {} already exists",
                    entry.original_name,
                    destination.display()
                ));
                report.skipped.push(entry.absolute_path.clone());
            }
            Err(e) => {
                warn!(error = %e, "move failed");
                OutputFormatter::error(&format!(
                    "Error moving {} {}: {}",
                    entry.kind.label(),
                    entry.original_name,
                    e
                ));
                report.failed.push((entry.absolute_path.clone(), e.to_string()));
            }
        }
    }
}
