//! Scanning a directory for dated entries and grouping them by date.
//!
//! Only the immediate children of the root are looked at. Scanning does the
//! I/O; grouping is a pure function over the scanned list.

use crate::config::CompiledFilters;
use crate::date_extract::{canonical_date, extract_date_match, is_sorted_folder_name};
use crate::file_organizer::{OrganizeError, OrganizeResult};
use crate::rename_plan::{EntryKind, FsEntry};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A top-level entry together with what the grouper needs to know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedEntry {
    pub entry: FsEntry,
    /// For directories: whether it contains at least one entry.
    /// Always true for files.
    pub non_empty: bool,
}

impl ScannedEntry {
    pub fn file(root: &Path, name: &str) -> Self {
        Self {
            entry: FsEntry::new(EntryKind::File, root, name),
            non_empty: true,
        }
    }

    pub fn directory(root: &Path, name: &str, non_empty: bool) -> Self {
        Self {
            entry: FsEntry::new(EntryKind::Directory, root, name),
            non_empty,
        }
    }
}

/// Folders and files that share one date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateGroup {
    pub folders: Vec<FsEntry>,
    pub files: Vec<FsEntry>,
}

impl DateGroup {
    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

/// Groups keyed by canonical date (`YYYY.MM.DD`), in ascending date order.
pub type DateGroups = BTreeMap<String, DateGroup>;

/// Returns true if the directory has at least one entry.
///
/// Any error while reading it counts as empty.
fn has_entries(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_some(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot read folder, treating as empty");
            false
        }
    }
}

/// Lists the immediate children of `root` that pass `filters`.
///
/// Entries are returned sorted by name. Names that are not valid UTF-8 are
/// skipped.
pub fn scan_root(root: &Path, filters: &CompiledFilters) -> OrganizeResult<Vec<ScannedEntry>> {
    let entries = fs::read_dir(root).map_err(|e| OrganizeError::InvalidBasePath {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut scanned = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!(path = %entry.path().display(), "name is not valid UTF-8, skipping");
            continue;
        };
        if !filters.should_include(Path::new(&name)) {
            continue;
        }
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "cannot read entry type, skipping"
                );
                continue;
            }
        };

        if file_type.is_dir() {
            let non_empty = has_entries(&entry.path());
            scanned.push(ScannedEntry::directory(root, &name, non_empty));
        } else if file_type.is_file() {
            scanned.push(ScannedEntry::file(root, &name));
        }
    }

    scanned.sort_by(|a, b| a.entry.original_name.cmp(&b.entry.original_name));
    Ok(scanned)
}

/// Groups scanned entries by the date found in their names.
///
/// * Directories already named like a date folder are skipped.
/// * Dated directories are kept only if they are non-empty.
/// * Dated files are always kept.
///
/// A group only exists if at least one entry landed in it. The emptiness
/// check runs before a group is opened, so an empty dated folder never
/// leaves an empty `YYYY.MM.DD` folder behind.
pub fn group_by_date(entries: Vec<ScannedEntry>) -> DateGroups {
    let mut groups = DateGroups::new();

    for scanned in entries {
        let entry = scanned.entry;
        if entry.kind == EntryKind::Directory && is_sorted_folder_name(&entry.original_name) {
            continue;
        }

        let Some(found) = extract_date_match(&entry.original_name) else {
            continue;
        };
        if found.pattern.assumes_century() {
            debug!(name = %entry.original_name, date = %found.date, "two-digit year read as 20YY");
        }

        let key = canonical_date(found.date);
        match entry.kind {
            EntryKind::Directory if scanned.non_empty => {
                groups.entry(key).or_default().folders.push(entry);
            }
            EntryKind::Directory => {
                debug!(name = %entry.original_name, "empty dated folder left in place");
            }
            EntryKind::File => {
                groups.entry(key).or_default().files.push(entry);
            }
        }
    }

    groups
}
