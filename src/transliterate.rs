//! Cyrillic to Latin name transliteration and collision-free name generation.
//!
//! # Examples
//!
//! ```
//! use nametidy::rename_plan::EntryKind;
//! use nametidy::transliterate::to_latin;
//!
//! assert_eq!(to_latin("Отчёт за май.DOCX", EntryKind::File), "Otchyot-za-may.docx");
//! assert_eq!(to_latin("Архив.Старый", EntryKind::Directory), "Arkhiv.Staryy");
//! ```

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::rename_plan::EntryKind;

/// Fixed Cyrillic to Latin mapping. Soft and hard signs map to nothing.
const TABLE: [(char, &str); 66] = [
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('д', "d"),
    ('е', "e"),
    ('ё', "yo"),
    ('ж', "zh"),
    ('з', "z"),
    ('и', "i"),
    ('й', "y"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "kh"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "sch"),
    ('ъ', ""),
    ('ы', "y"),
    ('ь', ""),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "ya"),
    ('А', "A"),
    ('Б', "B"),
    ('В', "V"),
    ('Г', "G"),
    ('Д', "D"),
    ('Е', "E"),
    ('Ё', "Yo"),
    ('Ж', "Zh"),
    ('З', "Z"),
    ('И', "I"),
    ('Й', "Y"),
    ('К', "K"),
    ('Л', "L"),
    ('М', "M"),
    ('Н', "N"),
    ('О', "O"),
    ('П', "P"),
    ('Р', "R"),
    ('С', "S"),
    ('Т', "T"),
    ('У', "U"),
    ('Ф', "F"),
    ('Х', "Kh"),
    ('Ц', "Ts"),
    ('Ч', "Ch"),
    ('Ш', "Sh"),
    ('Щ', "Sch"),
    ('Ъ', ""),
    ('Ы', "Y"),
    ('Ь', ""),
    ('Э', "E"),
    ('Ю', "Yu"),
    ('Я', "Ya"),
];

static SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-.]+").expect("separator pattern is valid"));
static HYPHEN_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("hyphen pattern is valid"));

/// Looks up the Latin replacement for a single character.
fn latin_for(ch: char) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(cyrillic, _)| *cyrillic == ch)
        .map(|(_, latin)| *latin)
}

/// Splits a name into `(stem, extension)` at the last `.`.
///
/// The extension keeps its leading dot. Leading dots belong to the stem, so
/// `.bashrc` has no extension while `archive.tar.gz` splits into
/// `("archive.tar", ".gz")`.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(pos) => name.split_at(leading + pos),
        None => (name, ""),
    }
}

/// Transliterates a file or directory name into Latin characters.
///
/// Characters outside the table pass through untouched. Runs of anything
/// other than word characters, `-` and `.` collapse into a single hyphen,
/// and leading/trailing hyphens are trimmed. For files the extension is
/// lower-cased but otherwise left as is; directory names are treated as a
/// single stem.
///
/// If nothing is left of the stem, the input is returned unchanged.
pub fn to_latin(name: &str, kind: EntryKind) -> String {
    let (stem, extension) = match kind {
        EntryKind::File => split_extension(name),
        EntryKind::Directory => (name, ""),
    };

    let mut latin = String::with_capacity(stem.len());
    for ch in stem.chars() {
        match latin_for(ch) {
            Some(replacement) => latin.push_str(replacement),
            None => latin.push(ch),
        }
    }

    let latin = SEPARATOR_RUNS.replace_all(&latin, "-");
    let latin = HYPHEN_RUNS.replace_all(&latin, "-");
    let latin = latin.trim_matches('-');

    if latin.is_empty() {
        return name.to_string();
    }

    format!("{}{}", latin, extension.to_lowercase())
}

/// Returns `candidate`, or the first `stem_N` variant not already taken.
///
/// Files keep their extension after the counter (`a.txt` becomes
/// `a_1.txt`); directory names are never split.
pub fn unique_name(candidate: &str, taken: &HashSet<String>, kind: EntryKind) -> String {
    if !taken.contains(candidate) {
        return candidate.to_string();
    }

    let (stem, extension) = match kind {
        EntryKind::File => split_extension(candidate),
        EntryKind::Directory => (candidate, ""),
    };

    (1u64..)
        .map(|counter| format!("{}_{}{}", stem, counter, extension))
        .find(|probe| !taken.contains(probe))
        .unwrap_or_else(|| candidate.to_string())
}
