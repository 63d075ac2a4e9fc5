//! Command-line interface module for nametidy.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Interactive directory prompt for the renamer
//! - Orchestration of the transliteration run (walk, plan, execute, report)
//! - Orchestration of the date sorting run (scan, group, move)

use crate::config::ToolConfig;
use crate::date_groups::{group_by_date, scan_root};
use crate::file_organizer::{DateOrganizer, MoveReport};
use crate::output::OutputFormatter;
use crate::rename_plan::{NameRegistry, plan_renames, walk_tree};
use crate::renamer::execute_plan;
use crate::report::RenameReports;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Transliterate Cyrillic names and sort dated items into date folders.
#[derive(Debug, Parser)]
#[command(name = "nametidy", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: .nametidyrc.toml, then ~/.config/nametidy/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Rename every file and folder under a directory to Latin characters.
    Translit {
        /// Directory to process; prompted for when omitted.
        path: Option<PathBuf>,
        /// Show what would be renamed without touching anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Move dated files and folders into YYYY.MM.DD folders.
    Sort {
        /// Directory to sort; defaults to the current directory.
        path: Option<PathBuf>,
        /// Show what would be moved without touching anything.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Problems with a directory path given by the user.
#[derive(Debug)]
pub enum PromptError {
    Empty,
    NotFound(PathBuf),
    NotADirectory(PathBuf),
    /// Input ended before a valid directory was given.
    Interrupted,
    Io(io::Error),
}

impl std::fmt::Display for PromptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Path cannot be empty"),
            Self::NotFound(path) => write!(f, "Folder '{}' does not exist", path.display()),
            Self::NotADirectory(path) => write!(f, "'{}' is not a folder", path.display()),
            Self::Interrupted => write!(f, "Interrupted by user"),
            Self::Io(e) => write!(f, "Could not read input: {}", e),
        }
    }
}

impl std::error::Error for PromptError {}

/// Exit status after the user interrupts a run with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Installs the Ctrl-C handler for the whole process.
///
/// The handler reports the interruption and exits right away. Renames and
/// moves that already completed stay applied; nothing is rolled back.
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        OutputFormatter::warning("Interrupted by user.");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
}

/// Counts from a transliteration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslitSummary {
    pub processed: usize,
    pub renamed: usize,
    pub unchanged: usize,
    pub conflicts: usize,
    pub failed: usize,
}

/// Checks that `path` is an existing directory and makes it absolute.
pub fn validate_directory(path: &Path) -> Result<PathBuf, PromptError> {
    let absolute = std::path::absolute(path).map_err(PromptError::Io)?;
    if !absolute.exists() {
        return Err(PromptError::NotFound(absolute));
    }
    if !absolute.is_dir() {
        return Err(PromptError::NotADirectory(absolute));
    }
    Ok(absolute)
}

/// Parses a typed path: trims whitespace and surrounding quotes.
pub fn resolve_directory(input: &str) -> Result<PathBuf, PromptError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PromptError::Empty);
    }
    let unquoted = trimmed.trim_matches(|c| c == '"' || c == '\'');
    if unquoted.is_empty() {
        return Err(PromptError::Empty);
    }
    validate_directory(Path::new(unquoted))
}

/// Asks for a directory until an existing one is entered.
///
/// End of input yields [`PromptError::Interrupted`].
pub fn prompt_for_directory<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf, PromptError> {
    writeln!(output, "Enter the path of the folder to process:").map_err(PromptError::Io)?;

    loop {
        write!(output, "Path: ").map_err(PromptError::Io)?;
        output.flush().map_err(PromptError::Io)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(PromptError::Io)? == 0 {
            return Err(PromptError::Interrupted);
        }

        match resolve_directory(&line) {
            Ok(path) => return Ok(path),
            Err(e) => writeln!(output, "Error: {}. Try again.", e).map_err(PromptError::Io)?,
        }
    }
}

/// Runs the CLI application with the given command.
///
/// # Examples
///
/// ```no_run
/// use nametidy::cli::{run_cli, Command};
///
/// let result = run_cli(&Command::Sort { path: None, dry_run: true });
/// if let Err(e) = result {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: &Command) -> Result<(), String> {
    run_cli_with_config(command, None)
}

/// Runs the CLI application with an optional configuration file.
pub fn run_cli_with_config(command: &Command, config_path: Option<&Path>) -> Result<(), String> {
    let config =
        ToolConfig::load(config_path).map_err(|e| format!("Error loading configuration: {}", e))?;

    match command {
        Command::Translit { path, dry_run } => {
            let root = match path {
                Some(path) => validate_directory(path).map_err(|e| e.to_string())?,
                None => {
                    let stdin = io::stdin();
                    match prompt_for_directory(&mut stdin.lock(), &mut io::stdout()) {
                        Ok(root) => root,
                        Err(PromptError::Interrupted) => {
                            OutputFormatter::warning("Interrupted by user.");
                            return Ok(());
                        }
                        Err(e) => return Err(e.to_string()),
                    }
                }
            };
            transliterate_directory(&root, &config, *dry_run).map(|_| ())
        }
        Command::Sort { path, dry_run } => {
            let root = match path {
                Some(path) => path.clone(),
                None => std::env::current_dir()
                    .map_err(|e| format!("Cannot determine current directory: {}", e))?,
            };
            sort_directory(&root, &config, *dry_run).map(|_| ())
        }
    }
}

/// Transliterates every name under `root` and writes the reports.
///
/// This function:
/// 1. Walks the tree, setting aside entries the filters exclude
/// 2. Plans all renames deepest first, resolving name collisions
/// 3. Applies the plan, continuing past per-item failures
/// 4. Writes the three reports into `root` (skipped in dry-run mode)
pub fn transliterate_directory(
    root: &Path,
    config: &ToolConfig,
    dry_run: bool,
) -> Result<TranslitSummary, String> {
    if dry_run {
        OutputFormatter::dry_run_notice(&format!("Analyzing: {}", root.display()));
    } else {
        OutputFormatter::info(&format!("Processing folder: {}", root.display()));
    }
    OutputFormatter::plain("Collecting files and folders...");

    let filters = config
        .compile_filters()
        .map_err(|e| format!("Error compiling filters: {}", e))?;
    let walked = walk_tree(root, &filters).map_err(|e| e.to_string())?;

    let registry = NameRegistry::seeded(walked.untouched());
    let plan = plan_renames(root, walked.entries, registry);

    let progress = OutputFormatter::create_progress_bar(plan.len() as u64);
    let execution = execute_plan(&plan, dry_run, &progress);

    let summary = TranslitSummary {
        processed: plan.len(),
        renamed: if dry_run {
            execution.would_rename_count()
        } else {
            execution.renamed_count()
        },
        unchanged: execution.unchanged_count(),
        conflicts: plan.conflicts().count(),
        failed: execution.failed_count(),
    };

    OutputFormatter::summary_table(&[
        ("Processed", summary.processed),
        (if dry_run { "Would rename" } else { "Renamed" }, summary.renamed),
        ("Unchanged", summary.unchanged),
        ("Conflicts", summary.conflicts),
        ("Failed", summary.failed),
    ]);

    if dry_run {
        OutputFormatter::dry_run_notice("No files were modified and no reports were written.");
        return Ok(summary);
    }

    let reports = RenameReports::build(&plan, &execution, &walked.undecodable);
    let written = reports
        .write(root, &config.reports)
        .map_err(|e| e.to_string())?;

    OutputFormatter::plain(&format!(
        "Original names saved to: {}",
        written.all_renames.display()
    ));
    OutputFormatter::plain(&format!(
        "Files without conflicts saved to: {}",
        written.non_conflict_files.display()
    ));
    if let Some(conflicts) = &written.conflicts {
        OutputFormatter::plain(&format!("Conflicts saved to: {}", conflicts.display()));
    }
    if summary.failed > 0 {
        OutputFormatter::warning("Some entries could not be renamed. Please review errors above.");
    }

    Ok(summary)
}

/// Moves dated top-level files and folders of `root` into date folders.
pub fn sort_directory(root: &Path, config: &ToolConfig, dry_run: bool) -> Result<MoveReport, String> {
    OutputFormatter::info(&format!("Scanning files and folders in: {}", root.display()));

    let filters = config
        .compile_filters()
        .map_err(|e| format!("Error compiling filters: {}", e))?;
    let scanned = scan_root(root, &filters).map_err(|e| e.to_string())?;
    let groups = group_by_date(scanned);

    for (date, group) in &groups {
        for folder in &group.folders {
            OutputFormatter::plain(&format!(
                " - Found folder: {} -> date: {}",
                folder.original_name, date
            ));
        }
        for file in &group.files {
            OutputFormatter::plain(&format!(
                " - Found file: {} -> date: {}",
                file.original_name, date
            ));
        }
    }
    OutputFormatter::plain(&format!("\nDate groups found: {}", groups.len()));

    let report = DateOrganizer::organize(root, &groups, dry_run).map_err(|e| e.to_string())?;

    if dry_run {
        OutputFormatter::summary_table(&[
            ("Date groups", groups.len()),
            ("Would move", report.would_move),
        ]);
        OutputFormatter::dry_run_notice("No files were modified.");
    } else {
        OutputFormatter::summary_table(&[
            ("Date groups", groups.len()),
            ("Folders created", report.created_dirs.len()),
            ("Moved", report.moved),
            ("Skipped", report.skipped.len()),
            ("Failed", report.failed.len()),
        ]);
        OutputFormatter::success(&format!("Done! Items moved: {}", report.moved));
    }

    Ok(report)
}
