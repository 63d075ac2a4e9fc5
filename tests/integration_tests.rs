use nametidy::cli::{Command, run_cli_with_config, sort_directory, transliterate_directory};
/// Integration tests for nametidy
///
/// These tests run both tools end to end against temporary directories.
///
/// Test categories:
/// 1. Transliteration runs and their reports
/// 2. Date sorting runs
/// 3. CLI entry points and configuration
use nametidy::config::ToolConfig;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers to build and inspect a tree.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a text file, creating parent folders as needed.
    fn create_text_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_subdir(&self, rel_path: &str) {
        fs::create_dir_all(self.path().join(rel_path)).expect("Failed to create subdirectory");
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", rel_path, e))
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.is_dir(),
            "Directory should exist: {}",
            path.display()
        );
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    /// Lines of a report after its header, rule and blank line.
    fn report_lines(&self, name: &str) -> Vec<String> {
        self.read(name).lines().skip(3).map(str::to_string).collect()
    }
}

/// Joins `/`-separated components with the platform separator.
fn native(rel_path: &str) -> String {
    rel_path
        .split('/')
        .collect::<PathBuf>()
        .display()
        .to_string()
}

fn translit(fixture: &TestFixture) -> nametidy::cli::TranslitSummary {
    transliterate_directory(fixture.path(), &ToolConfig::default(), false)
        .expect("transliteration should succeed")
}

// ============================================================================
// Test Suite 1: Transliteration
// ============================================================================

#[test]
fn test_translit_empty_directory() {
    let fixture = TestFixture::new();

    let summary = translit(&fixture);

    assert_eq!(summary.processed, 0);
    fixture.assert_file_exists("original_names.txt");
    fixture.assert_file_exists("non_conflict_files.txt");
    fixture.assert_not_exists("conflicts.txt");
    assert!(fixture.report_lines("original_names.txt").is_empty());
}

#[test]
fn test_translit_nested_tree() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Документы/Отчёт.docx", "report");
    fixture.create_text_file("Документы/Фото/лето 2024.JPG", "photo");
    fixture.create_text_file("readme.md", "readme");

    let summary = translit(&fixture);

    assert_eq!(summary.processed, 5);
    assert_eq!(summary.renamed, 4);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.failed, 0);

    assert_eq!(fixture.read("Dokumenty/Otchyot.docx"), "report");
    assert_eq!(fixture.read("Dokumenty/Foto/leto-2024.jpg"), "photo");
    assert_eq!(fixture.read("readme.md"), "readme");
    fixture.assert_not_exists("Документы");

    let lines = fixture.report_lines("original_names.txt");
    assert!(lines.contains(&format!(
        "{} -> {}",
        native("Документы/Фото/лето 2024.JPG"),
        native("Dokumenty/Foto/leto-2024.jpg")
    )));
    assert!(lines.contains(&"Документы -> Dokumenty".to_string()));
}

#[test]
fn test_translit_every_entry_reported_once() {
    let fixture = TestFixture::new();
    fixture.create_text_file("А/Б/в.txt", "1");
    fixture.create_text_file("А/г.txt", "2");
    fixture.create_subdir("А/Пустая");
    fixture.create_text_file("д.txt", "3");

    translit(&fixture);

    let originals = ["А", "А/Б", "А/Б/в.txt", "А/г.txt", "А/Пустая", "д.txt"];
    let lines = fixture.report_lines("original_names.txt");
    assert_eq!(lines.len(), originals.len());
    for original in originals {
        let prefix = format!("{} -> ", native(original));
        let count = lines.iter().filter(|l| l.starts_with(&prefix)).count();
        assert_eq!(count, 1, "{} should be reported exactly once", original);
    }
}

#[test]
fn test_translit_deep_file_ends_up_under_renamed_parents() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Альфа/Бета/с.txt", "deep");

    translit(&fixture);

    assert_eq!(fixture.read("Alfa/Beta/s.txt"), "deep");
    let lines = fixture.report_lines("original_names.txt");
    assert!(lines.contains(&format!(
        "{} -> {}",
        native("Альфа/Бета/с.txt"),
        native("Alfa/Beta/s.txt")
    )));
}

#[test]
fn test_translit_collision_gets_suffix_and_is_reported() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Файл.txt", "cyrillic");
    fixture.create_text_file("Fayl.txt", "latin");

    let summary = translit(&fixture);

    assert_eq!(summary.conflicts, 1);
    assert_eq!(fixture.read("Fayl.txt"), "latin");
    assert_eq!(fixture.read("Fayl_1.txt"), "cyrillic");

    assert_eq!(
        fixture.report_lines("conflicts.txt"),
        vec!["Файл.txt -> Fayl_1.txt".to_string()]
    );
    assert_eq!(
        fixture.report_lines("non_conflict_files.txt"),
        vec!["Fayl.txt".to_string()]
    );
}

#[test]
fn test_translit_non_conflict_files_sorted() {
    let fixture = TestFixture::new();
    fixture.create_text_file("яблоко.txt", "");
    fixture.create_text_file("арбуз.txt", "");
    fixture.create_text_file("Папка/груша.txt", "");

    translit(&fixture);

    let lines = fixture.report_lines("non_conflict_files.txt");
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_translit_second_run_changes_nothing() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Привет мир.TXT", "hi");
    fixture.create_text_file("Каталог/Ёлка.png", "tree");

    translit(&fixture);
    let second = translit(&fixture);

    assert_eq!(second.renamed, 0);
    assert_eq!(second.conflicts, 0);
    fixture.assert_file_exists("Privet-mir.txt");
    fixture.assert_file_exists("Katalog/Yolka.png");
}

#[test]
fn test_translit_removes_stale_conflicts_report() {
    let fixture = TestFixture::new();
    fixture.create_text_file("conflicts.txt", "from an earlier run");
    fixture.create_text_file("Дом.txt", "");

    let summary = translit(&fixture);

    assert_eq!(summary.conflicts, 0);
    fixture.assert_not_exists("conflicts.txt");
    fixture.assert_file_exists("Dom.txt");
}

#[test]
fn test_translit_dry_run_touches_nothing() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Папка/Файл.txt", "x");

    let summary = transliterate_directory(fixture.path(), &ToolConfig::default(), true).unwrap();

    assert_eq!(summary.renamed, 2);
    fixture.assert_file_exists("Папка/Файл.txt");
    fixture.assert_not_exists("Papka");
    fixture.assert_not_exists("original_names.txt");
    fixture.assert_not_exists("non_conflict_files.txt");
}

#[test]
fn test_translit_excluded_entries_keep_names_and_block_collisions() {
    let fixture = TestFixture::new();
    fixture.create_text_file("Заметка.md", "cyrillic");
    fixture.create_text_file("Zametka.md", "latin");
    fixture.create_text_file("Оставить.keep", "kept");

    let config = ToolConfig::from_toml(
        r#"
[filters.exclude]
extensions = ["keep"]
filenames = ["Zametka.md"]
"#,
    )
    .unwrap();
    let summary = transliterate_directory(fixture.path(), &config, false).unwrap();

    // excluded entries are not planned but still reserve their names
    assert_eq!(summary.processed, 1);
    assert_eq!(fixture.read("Оставить.keep"), "kept");
    assert_eq!(fixture.read("Zametka.md"), "latin");
    assert_eq!(fixture.read("Zametka_1.md"), "cyrillic");
}

#[test]
fn test_translit_hidden_directory_contents_left_alone() {
    let fixture = TestFixture::new();
    fixture.create_text_file(".скрытая/вложенная/файл.txt", "hidden");
    fixture.create_text_file("Видимый.txt", "shown");

    let config = ToolConfig::from_toml("[filters]\nenable_hidden_files = false\n").unwrap();
    let summary = transliterate_directory(fixture.path(), &config, false).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(fixture.read(".скрытая/вложенная/файл.txt"), "hidden");
    fixture.assert_not_exists(".скрытая/vlozhennaya");
    assert_eq!(fixture.read("Vidimyy.txt"), "shown");
}

#[cfg(target_os = "linux")]
#[test]
fn test_translit_undecodable_name_reported_as_error() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let fixture = TestFixture::new();
    fs::write(fixture.path().join(OsStr::from_bytes(b"bad\xff.txt")), "x").unwrap();
    fixture.create_text_file("Кот.txt", "cat");

    translit(&fixture);

    assert!(fixture.path().join(OsStr::from_bytes(b"bad\xff.txt")).exists());
    assert_eq!(fixture.read("Kot.txt"), "cat");
    let lines = fixture.report_lines("original_names.txt");
    assert_eq!(lines.len(), 2);
    assert!(lines.contains(&"Кот.txt -> Kot.txt".to_string()));
    let errors: Vec<_> = lines.iter().filter(|l| l.starts_with("ОШИБКА: bad")).collect();
    assert_eq!(errors.len(), 1);
}

// ============================================================================
// Test Suite 2: Date Sorting
// ============================================================================

fn build_dated_tree(fixture: &TestFixture) {
    fixture.create_text_file("EZSInfo_Name_2025.04.19/inner.txt", "inner");
    fixture.create_text_file("ezbase_final_251109_0903.zip", "zip");
    fixture.create_text_file("dump_2025.04.19_1200.sql", "sql");
    fixture.create_subdir("empty_2025.05.05");
    fixture.create_text_file("notes.txt", "notes");
    fixture.create_text_file("2025.01.01/old.txt", "old");
}

#[test]
fn test_sort_moves_dated_entries() {
    let fixture = TestFixture::new();
    build_dated_tree(&fixture);

    let report = sort_directory(fixture.path(), &ToolConfig::default(), false).unwrap();

    assert_eq!(report.moved, 3);
    assert!(report.failed.is_empty());
    assert_eq!(
        fixture.read("2025.04.19/EZSInfo_Name_2025.04.19/inner.txt"),
        "inner"
    );
    assert_eq!(fixture.read("2025.04.19/dump_2025.04.19_1200.sql"), "sql");
    assert_eq!(fixture.read("2025.11.09/ezbase_final_251109_0903.zip"), "zip");

    // empty dated folders and undated files stay put
    fixture.assert_dir_exists("empty_2025.05.05");
    fixture.assert_not_exists("2025.05.05");
    fixture.assert_file_exists("notes.txt");
    assert_eq!(fixture.read("2025.01.01/old.txt"), "old");
}

#[test]
fn test_sort_second_run_leaves_date_folders_alone() {
    let fixture = TestFixture::new();
    build_dated_tree(&fixture);

    sort_directory(fixture.path(), &ToolConfig::default(), false).unwrap();
    let second = sort_directory(fixture.path(), &ToolConfig::default(), false).unwrap();

    assert_eq!(second.moved, 0);
    assert!(second.created_dirs.is_empty());
    fixture.assert_dir_exists("2025.04.19");
    fixture.assert_not_exists("2025.04.19/2025.04.19");
}

#[test]
fn test_sort_never_overwrites_destination() {
    let fixture = TestFixture::new();
    fixture.create_text_file("2025.04.19/a_2025.04.19.txt", "already sorted");
    fixture.create_text_file("a_2025.04.19.txt", "new copy");

    let report = sort_directory(fixture.path(), &ToolConfig::default(), false).unwrap();

    assert_eq!(report.moved, 0);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(fixture.read("a_2025.04.19.txt"), "new copy");
    assert_eq!(fixture.read("2025.04.19/a_2025.04.19.txt"), "already sorted");
}

#[test]
fn test_sort_dry_run_touches_nothing() {
    let fixture = TestFixture::new();
    build_dated_tree(&fixture);

    let report = sort_directory(fixture.path(), &ToolConfig::default(), true).unwrap();

    assert_eq!(report.would_move, 3);
    assert_eq!(report.moved, 0);
    fixture.assert_not_exists("2025.04.19");
    fixture.assert_file_exists("dump_2025.04.19_1200.sql");
}

#[test]
fn test_sort_invalid_dates_are_ignored() {
    let fixture = TestFixture::new();
    fixture.create_text_file("report_2025.13.40_1200.txt", "bad");

    let report = sort_directory(fixture.path(), &ToolConfig::default(), false).unwrap();

    assert_eq!(report.moved, 0);
    fixture.assert_file_exists("report_2025.13.40_1200.txt");
}

// ============================================================================
// Test Suite 3: CLI and Configuration
// ============================================================================

#[test]
fn test_cli_translit_with_explicit_config() {
    let fixture = TestFixture::new();
    let config_dir = TestFixture::new();
    let config_path = config_dir.path().join("nametidy.toml");
    fs::write(&config_path, "[reports]\nall_renames = \"renames.txt\"\n").unwrap();
    fixture.create_text_file("Тест.txt", "t");

    let command = Command::Translit {
        path: Some(fixture.path().to_path_buf()),
        dry_run: false,
    };
    let result = run_cli_with_config(&command, Some(&config_path));

    assert!(result.is_ok(), "{:?}", result);
    fixture.assert_file_exists("Test.txt");
    fixture.assert_file_exists("renames.txt");
    fixture.assert_not_exists("original_names.txt");
}

#[test]
fn test_cli_sort_with_explicit_path() {
    let fixture = TestFixture::new();
    let config_dir = TestFixture::new();
    let config_path = config_dir.path().join("nametidy.toml");
    fs::write(&config_path, "").unwrap();
    fixture.create_text_file("log_2024.12.31_2359.txt", "l");

    let command = Command::Sort {
        path: Some(fixture.path().to_path_buf()),
        dry_run: false,
    };
    let result = run_cli_with_config(&command, Some(&config_path));

    assert!(result.is_ok());
    fixture.assert_file_exists("2024.12.31/log_2024.12.31_2359.txt");
}

#[test]
fn test_cli_translit_rejects_missing_directory() {
    let config_dir = TestFixture::new();
    let config_path = config_dir.path().join("nametidy.toml");
    fs::write(&config_path, "").unwrap();

    let command = Command::Translit {
        path: Some(PathBuf::from("/non/existent/dir")),
        dry_run: false,
    };
    let result = run_cli_with_config(&command, Some(&config_path));

    assert!(result.is_err());
}

#[test]
fn test_cli_missing_config_file_is_an_error() {
    let fixture = TestFixture::new();
    let command = Command::Sort {
        path: Some(fixture.path().to_path_buf()),
        dry_run: true,
    };

    let result = run_cli_with_config(&command, Some(Path::new("/non/existent/config.toml")));

    assert!(result.is_err());
}
