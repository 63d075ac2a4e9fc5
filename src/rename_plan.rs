//! Tree walking and rename planning.
//!
//! Planning is pure: it takes a list of [`FsEntry`] values (from
//! [`walk_tree`] or built by hand) and a [`NameRegistry`], and returns a
//! [`RenamePlan`] without touching the filesystem. Entries are processed
//! deepest first so a child is always renamed while its parent still has
//! its old name.

use crate::config::CompiledFilters;
use crate::transliterate::{to_latin, unique_name};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Whether an entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Lower-case label used in console output.
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "folder",
        }
    }
}

/// A file or directory discovered under the processed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub kind: EntryKind,
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    pub original_name: String,
}

impl FsEntry {
    /// Builds an entry from a root and a path relative to it.
    ///
    /// Used for virtual listings in tests and by the walker.
    pub fn new(kind: EntryKind, root: &Path, relative_path: impl Into<PathBuf>) -> Self {
        let relative_path = relative_path.into();
        let original_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            kind,
            absolute_path: root.join(&relative_path),
            relative_path,
            original_name,
        }
    }

    /// Directory that contains this entry.
    pub fn parent(&self) -> &Path {
        self.absolute_path.parent().unwrap_or(Path::new(""))
    }

    /// Number of path components below the root.
    pub fn depth(&self) -> usize {
        self.relative_path.components().count()
    }
}

/// Names assigned so far, per parent directory.
///
/// Within one parent directory every assigned name is distinct.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    taken: HashMap<PathBuf, HashSet<String>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry where the given entries already hold their names.
    ///
    /// Entries that are not going to be renamed still occupy a name in their
    /// directory; seeding them keeps planned names from landing on them.
    pub fn seeded<'a>(entries: impl IntoIterator<Item = &'a FsEntry>) -> Self {
        let mut registry = Self::new();
        for entry in entries {
            registry.assign(entry.parent(), entry.original_name.clone());
        }
        registry
    }

    /// Returns true if `name` is taken in `parent`.
    pub fn contains(&self, parent: &Path, name: &str) -> bool {
        self.taken
            .get(parent)
            .is_some_and(|names| names.contains(name))
    }

    /// Resolves `candidate` against `parent` and records the result.
    pub fn claim(&mut self, parent: &Path, candidate: &str, kind: EntryKind) -> String {
        let names = self.taken.entry(parent.to_path_buf()).or_default();
        let name = unique_name(candidate, names, kind);
        names.insert(name.clone());
        name
    }

    fn assign(&mut self, parent: &Path, name: String) {
        self.taken.entry(parent.to_path_buf()).or_default().insert(name);
    }
}

/// One planned rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlanItem {
    /// Position in the plan; used to match execution results back.
    pub id: usize,
    pub kind: EntryKind,
    /// Current location of the entry when the rename runs.
    pub old_path: PathBuf,
    /// Target of the rename: the old parent joined with `final_name`.
    pub new_path: PathBuf,
    pub original_name: String,
    /// Plain transliteration before collision handling.
    pub transliterated_name: String,
    pub final_name: String,
    /// Original path relative to the root.
    pub relative_path: PathBuf,
    /// Path relative to the root once every rename in the plan has run.
    pub final_relative_path: PathBuf,
}

impl RenamePlanItem {
    /// True if a counter suffix had to be added to avoid a collision.
    pub fn is_conflict(&self) -> bool {
        self.final_name != self.transliterated_name
    }

    /// True for files renamed without a collision.
    pub fn is_clean_file(&self) -> bool {
        self.kind == EntryKind::File && !self.is_conflict()
    }

    /// True if the name on disk changes.
    pub fn changes_name(&self) -> bool {
        self.final_name != self.original_name
    }
}

/// The ordered list of renames for one run.
#[derive(Debug, Clone)]
pub struct RenamePlan {
    pub root: PathBuf,
    pub items: Vec<RenamePlanItem>,
    pub registry: NameRegistry,
}

impl RenamePlan {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items that needed a disambiguating suffix.
    pub fn conflicts(&self) -> impl Iterator<Item = &RenamePlanItem> {
        self.items.iter().filter(|item| item.is_conflict())
    }

    /// Relative paths of files renamed without collision, sorted.
    pub fn clean_files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = self
            .items
            .iter()
            .filter(|item| item.is_clean_file())
            .map(|item| item.relative_path.as_path())
            .collect();
        files.sort();
        files
    }
}

/// Errors raised while walking the tree.
#[derive(Debug)]
pub enum WalkError {
    /// The root itself could not be read.
    RootUnreadable {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl std::fmt::Display for WalkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RootUnreadable { path, source } => {
                write!(f, "Cannot read directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for WalkError {}

/// Result of walking a tree: entries to rename and entries left alone.
#[derive(Debug, Default)]
pub struct WalkResult {
    pub entries: Vec<FsEntry>,
    /// Entries rejected by the filters. An excluded directory is listed
    /// itself; nothing below it is visited.
    pub excluded: Vec<FsEntry>,
    /// Entries whose names are not valid UTF-8 and cannot be transliterated.
    pub undecodable: Vec<FsEntry>,
}

impl WalkResult {
    /// Entries that keep their current names.
    pub fn untouched(&self) -> impl Iterator<Item = &FsEntry> {
        self.excluded.iter().chain(&self.undecodable)
    }
}

/// Enumerates every file and directory under `root`, recursively.
///
/// Symlinks are not followed. Entries rejected by `filters` go to
/// [`WalkResult::excluded`] and excluded directories are not descended
/// into. Entries whose names are not valid UTF-8 go to
/// [`WalkResult::undecodable`]; their contents are still visited.
/// Unreadable subdirectories are logged and skipped.
pub fn walk_tree(root: &Path, filters: &CompiledFilters) -> Result<WalkResult, WalkError> {
    let mut result = WalkResult::default();

    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false).into_iter();
    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(WalkError::RootUnreadable {
                    path: root.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let Ok(relative_path) = entry.path().strip_prefix(root) else {
            continue;
        };
        let kind = if entry.file_type().is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let fs_entry = FsEntry::new(kind, root, relative_path);

        if entry.file_name().to_str().is_none() {
            warn!(path = %entry.path().display(), "name is not valid UTF-8, leaving as is");
            result.undecodable.push(fs_entry);
        } else if filters.should_include(relative_path) {
            result.entries.push(fs_entry);
        } else {
            debug!(path = %relative_path.display(), "excluded by filters");
            if kind == EntryKind::Directory {
                walker.skip_current_dir();
            }
            result.excluded.push(fs_entry);
        }
    }

    Ok(result)
}

/// Sorts entries deepest first.
///
/// Depth is the number of components below the root; ties are broken by
/// longer path first and then by path, so the order is fully deterministic.
pub fn order_bottom_up(entries: &mut [FsEntry]) {
    entries.sort_by(|a, b| {
        (
            Reverse(a.depth()),
            Reverse(a.absolute_path.as_os_str().len()),
            &a.relative_path,
        )
            .cmp(&(
                Reverse(b.depth()),
                Reverse(b.absolute_path.as_os_str().len()),
                &b.relative_path,
            ))
    });
}

/// Builds the rename plan for `entries`.
///
/// Every entry gets a plan item, including ones whose name does not change,
/// so the plan lists the whole tree. Entries whose transliteration equals
/// their current name keep it; other entries are placed around them.
/// `registry` may be pre-seeded with names that must not be reused; the
/// filled registry is returned in the plan.
pub fn plan_renames(root: &Path, mut entries: Vec<FsEntry>, registry: NameRegistry) -> RenamePlan {
    order_bottom_up(&mut entries);

    let mut registry = registry;
    let mut items = Vec::with_capacity(entries.len());

    let transliterated: Vec<String> = entries
        .iter()
        .map(|entry| to_latin(&entry.original_name, entry.kind))
        .collect();

    // Entries that keep their name hold it before anything else is placed.
    for (entry, latin) in entries.iter().zip(&transliterated) {
        if *latin == entry.original_name {
            registry.assign(entry.parent(), latin.clone());
        }
    }

    for (id, (entry, transliterated_name)) in entries.into_iter().zip(transliterated).enumerate() {
        let final_name = if transliterated_name == entry.original_name {
            transliterated_name.clone()
        } else {
            registry.claim(entry.parent(), &transliterated_name, entry.kind)
        };
        let new_path = entry.parent().join(&final_name);

        if final_name != transliterated_name {
            debug!(
                path = %entry.relative_path.display(),
                candidate = %transliterated_name,
                resolved = %final_name,
                "name collision resolved"
            );
        }

        items.push(RenamePlanItem {
            id,
            kind: entry.kind,
            old_path: entry.absolute_path,
            new_path,
            original_name: entry.original_name,
            transliterated_name,
            final_name,
            final_relative_path: PathBuf::new(),
            relative_path: entry.relative_path,
        });
    }

    resolve_final_paths(&mut items);

    RenamePlan {
        root: root.to_path_buf(),
        items,
        registry,
    }
}

/// Fills in `final_relative_path` using the final names of every ancestor.
fn resolve_final_paths(items: &mut [RenamePlanItem]) {
    let renamed_dirs: HashMap<PathBuf, String> = items
        .iter()
        .filter(|item| item.kind == EntryKind::Directory)
        .map(|item| (item.relative_path.clone(), item.final_name.clone()))
        .collect();

    for item in items.iter_mut() {
        let mut prefix = PathBuf::new();
        let mut resolved = PathBuf::new();
        if let Some(parent) = item.relative_path.parent() {
            for component in parent.components() {
                prefix.push(component);
                match renamed_dirs.get(&prefix) {
                    Some(name) => resolved.push(name),
                    None => resolved.push(component),
                }
            }
        }
        resolved.push(&item.final_name);
        item.final_relative_path = resolved;
    }
}
