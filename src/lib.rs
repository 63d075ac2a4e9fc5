//! nametidy - file and folder name housekeeping
//!
//! Two independent tools live here:
//! - a recursive renamer that transliterates Cyrillic names to Latin,
//!   resolving name collisions and writing text reports of what changed;
//! - a date sorter that moves top-level files and folders carrying a date
//!   in their name into `YYYY.MM.DD` folders.
//!
//! Both split their work into a pure planning step and an apply step, so
//! the planning halves can be used and tested without touching the disk.

pub mod cli;
pub mod config;
pub mod date_extract;
pub mod date_groups;
pub mod file_organizer;
pub mod logging;
pub mod output;
pub mod rename_plan;
pub mod renamer;
pub mod report;
pub mod transliterate;

pub use config::{CompiledFilters, ConfigError, ToolConfig};
pub use date_extract::{canonical_date, extract_date};
pub use date_groups::{DateGroup, DateGroups, group_by_date};
pub use file_organizer::{DateOrganizer, MoveReport, OrganizeError};
pub use rename_plan::{EntryKind, FsEntry, NameRegistry, RenamePlan, plan_renames};
pub use renamer::{ExecutionReport, RenameOutcome, execute_plan};
pub use transliterate::{to_latin, unique_name};

pub use cli::{Command, run_cli};
