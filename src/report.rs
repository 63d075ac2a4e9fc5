//! Text reports written after a transliteration run.
//!
//! Three UTF-8 files land in the processed directory: every rename, only
//! the renames that needed a counter suffix, and the files renamed without
//! a collision. The conflicts file is removed when a run has no conflicts
//! so a stale one from an earlier run does not linger.

use crate::config::ReportNames;
use crate::rename_plan::{FsEntry, RenamePlan, RenamePlanItem};
use crate::renamer::ExecutionReport;
use std::fs;
use std::path::{Path, PathBuf};

const ALL_RENAMES_HEADER: &str = "ПОЛНЫЙ СПИСОК ПЕРЕИМЕНОВАНИЙ:";
const CONFLICTS_HEADER: &str = "КОНФЛИКТЫ ИМЕН (добавлены индексы):";
const NON_CONFLICT_HEADER: &str = "ФАЙЛЫ БЕЗ КОНФЛИКТОВ:";
const ERROR_PREFIX: &str = "ОШИБКА";
const UNDECODABLE_REASON: &str = "name is not valid UTF-8, left unchanged";
const RULE_WIDTH: usize = 80;

/// Errors that can occur while writing reports.
#[derive(Debug)]
pub enum ReportError {
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    RemoveFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WriteFailed { path, source } => {
                write!(f, "Failed to write report {}: {}", path.display(), source)
            }
            Self::RemoveFailed { path, source } => {
                write!(
                    f,
                    "Failed to remove stale report {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ReportError {}

/// Report lines built from a plan and its execution results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReports {
    pub all_renames: Vec<String>,
    pub conflicts: Vec<String>,
    pub non_conflict_files: Vec<String>,
}

/// Where the reports were written.
#[derive(Debug, Clone)]
pub struct WrittenReports {
    pub all_renames: PathBuf,
    pub conflicts: Option<PathBuf>,
    pub non_conflict_files: PathBuf,
}

fn rename_line(item: &RenamePlanItem) -> String {
    format!(
        "{} -> {}",
        item.relative_path.display(),
        item.final_relative_path.display()
    )
}

impl RenameReports {
    /// Builds the report lines.
    ///
    /// Failed items are matched by plan id and written as
    /// `ОШИБКА: <line> - <error>` in the full list. Entries whose names
    /// could not be decoded follow the plan items, one error line each.
    pub fn build(
        plan: &RenamePlan,
        execution: &ExecutionReport,
        undecodable: &[FsEntry],
    ) -> Self {
        let all_renames = plan
            .items
            .iter()
            .map(|item| match execution.failure(item.id) {
                Some(error) => format!("{}: {} - {}", ERROR_PREFIX, rename_line(item), error),
                None => rename_line(item),
            })
            .chain(undecodable.iter().map(|entry| {
                format!(
                    "{}: {} - {}",
                    ERROR_PREFIX,
                    entry.relative_path.display(),
                    UNDECODABLE_REASON
                )
            }))
            .collect();

        let conflicts = plan.conflicts().map(rename_line).collect();

        let non_conflict_files = plan
            .clean_files()
            .into_iter()
            .map(|path| path.display().to_string())
            .collect();

        Self {
            all_renames,
            conflicts,
            non_conflict_files,
        }
    }

    /// Writes the reports into `root`.
    pub fn write(&self, root: &Path, names: &ReportNames) -> Result<WrittenReports, ReportError> {
        let all_renames = root.join(&names.all_renames);
        write_report(&all_renames, ALL_RENAMES_HEADER, &self.all_renames)?;

        let conflicts_path = root.join(&names.conflicts);
        let conflicts = if self.conflicts.is_empty() {
            if conflicts_path.exists() {
                fs::remove_file(&conflicts_path).map_err(|e| ReportError::RemoveFailed {
                    path: conflicts_path.clone(),
                    source: e,
                })?;
            }
            None
        } else {
            write_report(&conflicts_path, CONFLICTS_HEADER, &self.conflicts)?;
            Some(conflicts_path)
        };

        let non_conflict_files = root.join(&names.non_conflict_files);
        write_report(
            &non_conflict_files,
            NON_CONFLICT_HEADER,
            &self.non_conflict_files,
        )?;

        Ok(WrittenReports {
            all_renames,
            conflicts,
            non_conflict_files,
        })
    }
}

fn render(header: &str, lines: &[String]) -> String {
    let mut text = format!("{}\n{}\n\n", header, "=".repeat(RULE_WIDTH));
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

fn write_report(path: &Path, header: &str, lines: &[String]) -> Result<(), ReportError> {
    fs::write(path, render(header, lines)).map_err(|e| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename_plan::{EntryKind, FsEntry, NameRegistry, plan_renames};
    use crate::renamer::execute_plan;
    use indicatif::ProgressBar;
    use tempfile::TempDir;

    #[test]
    fn test_render_layout() {
        let text = render("HEADER:", &["a -> b".to_string()]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "HEADER:");
        assert_eq!(lines[1], "=".repeat(80));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "a -> b");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_reports_from_dry_run_plan() {
        let root = Path::new("/data");
        let entries = vec![
            FsEntry::new(EntryKind::Directory, root, "Папка"),
            FsEntry::new(EntryKind::File, root, "Папка/Фото.JPG"),
            FsEntry::new(EntryKind::File, root, "Papka"),
        ];
        let plan = plan_renames(root, entries, NameRegistry::new());
        let execution = execute_plan(&plan, true, &ProgressBar::hidden());
        let reports = RenameReports::build(&plan, &execution, &[]);

        assert_eq!(reports.all_renames.len(), 3);
        let photo_line = format!(
            "{} -> {}",
            Path::new("Папка/Фото.JPG").display(),
            Path::new("Papka_1/Foto.jpg").display()
        );
        assert!(reports.all_renames.contains(&photo_line));
        assert_eq!(reports.conflicts, vec!["Папка -> Papka_1".to_string()]);
        assert_eq!(
            reports.non_conflict_files,
            vec![
                "Papka".to_string(),
                Path::new("Папка/Фото.JPG").display().to_string()
            ]
        );
    }

    #[test]
    fn test_failed_item_annotated_by_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("Есть.txt"), "1").unwrap();

        // two entries sharing a prefix; only the missing one must be marked
        let entries = vec![
            FsEntry::new(EntryKind::File, root, "Есть.txt"),
            FsEntry::new(EntryKind::File, root, "Есть.txt.bak"),
        ];
        let plan = plan_renames(root, entries, NameRegistry::new());
        let execution = execute_plan(&plan, false, &ProgressBar::hidden());
        let reports = RenameReports::build(&plan, &execution, &[]);

        let errors: Vec<_> = reports
            .all_renames
            .iter()
            .filter(|line| line.starts_with("ОШИБКА: "))
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("ОШИБКА: Есть.txt.bak -> Est.txt.bak - "));
        assert!(reports.all_renames.contains(&"Есть.txt -> Est.txt".to_string()));
    }

    #[test]
    fn test_undecodable_entries_get_error_lines() {
        let root = Path::new("/data");
        let plan = plan_renames(
            root,
            vec![FsEntry::new(EntryKind::File, root, "Дом.txt")],
            NameRegistry::new(),
        );
        let execution = execute_plan(&plan, true, &ProgressBar::hidden());
        let undecodable = vec![FsEntry::new(EntryKind::File, root, "bad\u{FFFD}.txt")];

        let reports = RenameReports::build(&plan, &execution, &undecodable);

        assert_eq!(
            reports.all_renames,
            vec![
                "Дом.txt -> Dom.txt".to_string(),
                "ОШИБКА: bad\u{FFFD}.txt - name is not valid UTF-8, left unchanged".to_string(),
            ]
        );
        assert_eq!(reports.non_conflict_files, vec!["Дом.txt".to_string()]);
    }

    #[test]
    fn test_conflicts_file_removed_when_no_conflicts() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let names = ReportNames::default();
        fs::write(root.join(&names.conflicts), "stale").unwrap();

        let reports = RenameReports {
            all_renames: vec!["a -> a".to_string()],
            conflicts: Vec::new(),
            non_conflict_files: vec!["a".to_string()],
        };
        let written = reports.write(root, &names).unwrap();

        assert!(written.conflicts.is_none());
        assert!(!root.join("conflicts.txt").exists());
        let all = fs::read_to_string(root.join("original_names.txt")).unwrap();
        assert!(all.starts_with("ПОЛНЫЙ СПИСОК ПЕРЕИМЕНОВАНИЙ:\n"));
        assert!(all.ends_with("a -> a\n"));
        let clean = fs::read_to_string(root.join("non_conflict_files.txt")).unwrap();
        assert!(clean.starts_with("ФАЙЛЫ БЕЗ КОНФЛИКТОВ:\n"));
    }

    #[test]
    fn test_conflicts_file_written_with_custom_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let names = ReportNames {
            conflicts: "clashes.txt".to_string(),
            ..ReportNames::default()
        };

        let reports = RenameReports {
            all_renames: vec!["Б -> B_1".to_string()],
            conflicts: vec!["Б -> B_1".to_string()],
            non_conflict_files: Vec::new(),
        };
        let written = reports.write(root, &names).unwrap();

        assert_eq!(written.conflicts, Some(root.join("clashes.txt")));
        let text = fs::read_to_string(root.join("clashes.txt")).unwrap();
        assert!(text.starts_with("КОНФЛИКТЫ ИМЕН (добавлены индексы):\n"));
        assert!(text.contains("Б -> B_1\n"));
    }
}
