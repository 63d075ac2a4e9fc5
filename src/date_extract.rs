//! Date extraction from file and folder names.
//!
//! Three patterns are tried in a fixed order and the first one that yields
//! a real calendar date wins:
//!
//! 1. `YYYY.MM.DD` anywhere in the name (`EZSInfo_Name_2025.04.19`)
//! 2. `YYYY.MM.DD_HHHH` (`2025.10.29_1456`)
//! 3. `YYMMDD_HHHH` (`ezbase_final_251109_0903`)
//!
//! ```
//! use chrono::NaiveDate;
//! use nametidy::date_extract::{canonical_date, extract_date};
//!
//! let date = extract_date("ezbase_final_251109_0903").unwrap();
//! assert_eq!(date, NaiveDate::from_ymd_opt(2025, 11, 9).unwrap());
//! assert_eq!(canonical_date(date), "2025.11.09");
//! ```

use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Format of date folder names, also used as the grouping key.
pub const CANONICAL_FORMAT: &str = "%Y.%m.%d";

static DOTTED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})\.([0-9]{2})\.([0-9]{2})").expect("dotted date pattern is valid")
});
static DOTTED_DATE_WITH_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})\.([0-9]{2})\.([0-9]{2})_[0-9]{4}")
        .expect("dotted date-time pattern is valid")
});
static COMPACT_DATE_WITH_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2})([0-9]{2})([0-9]{2})_[0-9]{4}").expect("compact date pattern is valid")
});
static SORTED_FOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}\.[0-9]{2}\.[0-9]{2}").expect("sorted folder pattern is valid")
});

/// Which pattern produced a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `YYYY.MM.DD`
    Dotted,
    /// `YYYY.MM.DD_HHHH`
    DottedWithTime,
    /// `YYMMDD_HHHH`; the century is assumed to be 2000.
    CompactWithTime,
}

impl DatePattern {
    /// True when the year was inferred from two digits.
    pub fn assumes_century(&self) -> bool {
        matches!(self, DatePattern::CompactWithTime)
    }
}

/// A date found in a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch {
    pub date: NaiveDate,
    pub pattern: DatePattern,
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

/// Turns the first match of `regex` into a date, if it is a valid one.
fn first_date(regex: &Regex, name: &str, two_digit_year: bool) -> Option<NaiveDate> {
    let caps = regex.captures(name)?;
    let year = number(&caps, 1)?;
    let year = if two_digit_year && year < 100 {
        2000 + year
    } else {
        year
    };
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, number(&caps, 2)?, number(&caps, 3)?)
}

/// Finds a date in `name` and reports which pattern matched.
pub fn extract_date_match(name: &str) -> Option<DateMatch> {
    let attempts = [
        (&*DOTTED_DATE, DatePattern::Dotted, false),
        (&*DOTTED_DATE_WITH_TIME, DatePattern::DottedWithTime, false),
        (&*COMPACT_DATE_WITH_TIME, DatePattern::CompactWithTime, true),
    ];

    attempts
        .into_iter()
        .find_map(|(regex, pattern, two_digit_year)| {
            first_date(regex, name, two_digit_year).map(|date| DateMatch { date, pattern })
        })
}

/// Finds a date in `name`.
///
/// Returns `None` when no pattern matches or every match is not a real
/// calendar date (month 13, day 40, ...).
pub fn extract_date(name: &str) -> Option<NaiveDate> {
    extract_date_match(name).map(|found| found.date)
}

/// Formats a date as `YYYY.MM.DD`.
pub fn canonical_date(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// True for names that start with a `YYYY.MM.DD` date, i.e. date folders
/// produced by an earlier run.
pub fn is_sorted_folder_name(name: &str) -> bool {
    SORTED_FOLDER.is_match(name)
}
