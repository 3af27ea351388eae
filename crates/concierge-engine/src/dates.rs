//! Free-text stay-date parsing.
//!
//! Accepts exactly two shapes: numeric `D/M/Y` (separators `/`, `-`, `.`;
//! 2-digit years are 2000s) and worded `D MonthName Y` (month matched by a
//! case-insensitive 3+ letter prefix). Anything else, including relative
//! terms like "tomorrow", fails validation.

use chrono::NaiveDate;

const SEPARATORS: [char; 3] = ['/', '-', '.'];

const MONTH_ABBREVS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// A successfully parsed stay date with both guest-facing and sortable forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    /// Guest-facing form, `DD Mon YYYY`.
    pub display: String,
    /// Canonical sortable form, `YYYY-MM-DD`.
    pub canonical: String,
}

/// Parse free text into a calendar date, or None if the shape or the date
/// itself is invalid. Day/month rollover (e.g. `31/02/2026`) is rejected:
/// the date is constructed field-by-field and never normalized.
pub fn parse(text: &str) -> Option<ParsedDate> {
    let text = text.trim();
    let (day, month, year) = parse_numeric(text).or_else(|| parse_worded(text))?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(ParsedDate {
        date,
        display: display(date),
        canonical: date.format("%Y-%m-%d").to_string(),
    })
}

/// Guest-facing form of a date, `DD Mon YYYY`.
pub fn display(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Numeric shape: `D sep M sep Y` with a single separator kind.
fn parse_numeric(text: &str) -> Option<(u32, u32, i32)> {
    let sep = text.chars().find(|c| SEPARATORS.contains(c))?;
    let parts: Vec<&str> = text.split(sep).collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let year = parse_year(parts[2].trim())?;
    Some((day, month, year))
}

/// Worded shape: `D MonthName Y`, whitespace separated.
fn parse_worded(text: &str) -> Option<(u32, u32, i32)> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].parse().ok()?;
    let month = match_month(parts[1])?;
    let year = parse_year(parts[2])?;
    Some((day, month, year))
}

/// 2-digit years are assumed 2000s; only 2- or 4-digit years are accepted.
fn parse_year(text: &str) -> Option<i32> {
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match text.len() {
        2 => text.parse::<i32>().ok().map(|y| y + 2000),
        4 => text.parse().ok(),
        _ => None,
    }
}

/// Month word matched by case-insensitive 3+ letter prefix ("feb",
/// "February", "febr" all resolve to 2).
fn match_month(word: &str) -> Option<u32> {
    if word.len() < 3 || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let lower = word.to_lowercase();
    MONTH_ABBREVS
        .iter()
        .position(|abbrev| lower.starts_with(abbrev))
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ---- Numeric shape ----

    #[test]
    fn test_numeric_slash() {
        let parsed = parse("10/02/2026").unwrap();
        assert_eq!(parsed.date, date(2026, 2, 10));
        assert_eq!(parsed.canonical, "2026-02-10");
        assert_eq!(parsed.display, "10 Feb 2026");
    }

    #[test]
    fn test_numeric_dash_and_dot() {
        assert_eq!(parse("10-02-2026").unwrap().date, date(2026, 2, 10));
        assert_eq!(parse("10.02.2026").unwrap().date, date(2026, 2, 10));
    }

    #[test]
    fn test_numeric_two_digit_year() {
        assert_eq!(parse("5/3/26").unwrap().date, date(2026, 3, 5));
    }

    #[test]
    fn test_numeric_single_digit_fields() {
        let parsed = parse("5/3/2026").unwrap();
        assert_eq!(parsed.display, "05 Mar 2026");
    }

    #[test]
    fn test_numeric_mixed_separators_rejected() {
        assert!(parse("10-02.2026").is_none());
        assert!(parse("10/02-2026").is_none());
    }

    #[test]
    fn test_numeric_rollover_rejected() {
        assert!(parse("31/02/2026").is_none());
        assert!(parse("29/02/2025").is_none()); // not a leap year
        assert!(parse("32/01/2026").is_none());
        assert!(parse("0/01/2026").is_none());
        assert!(parse("10/13/2026").is_none());
        assert!(parse("10/0/2026").is_none());
    }

    #[test]
    fn test_leap_day_accepted() {
        assert_eq!(parse("29/02/2028").unwrap().date, date(2028, 2, 29));
    }

    // ---- Worded shape ----

    #[test]
    fn test_worded_abbreviation() {
        let parsed = parse("10 Feb 2026").unwrap();
        assert_eq!(parsed.date, date(2026, 2, 10));
    }

    #[test]
    fn test_worded_full_month_name() {
        assert_eq!(parse("10 February 2026").unwrap().date, date(2026, 2, 10));
    }

    #[test]
    fn test_worded_case_insensitive() {
        assert_eq!(parse("10 FEB 2026").unwrap().date, date(2026, 2, 10));
        assert_eq!(parse("10 february 2026").unwrap().date, date(2026, 2, 10));
    }

    #[test]
    fn test_worded_two_digit_year() {
        assert_eq!(parse("1 Jan 26").unwrap().date, date(2026, 1, 1));
    }

    #[test]
    fn test_worded_short_month_word_rejected() {
        assert!(parse("10 Fe 2026").is_none());
    }

    #[test]
    fn test_worded_unknown_month_rejected() {
        assert!(parse("10 Xyz 2026").is_none());
    }

    #[test]
    fn test_worded_rollover_rejected() {
        assert!(parse("31 Feb 2026").is_none());
        assert!(parse("31 Apr 2026").is_none());
    }

    // ---- Rejected shapes ----

    #[test]
    fn test_relative_terms_rejected() {
        assert!(parse("tomorrow").is_none());
        assert!(parse("next week").is_none());
        assert!(parse("today").is_none());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse("").is_none());
        assert!(parse("hello").is_none());
        assert!(parse("10/02").is_none());
        assert!(parse("10/02/2026/01").is_none());
        assert!(parse("2026-02-10T00:00:00").is_none());
        assert!(parse("10 Feb").is_none());
        assert!(parse("Feb 10 2026").is_none()); // month-first is not a shape
    }

    #[test]
    fn test_three_digit_year_rejected() {
        assert!(parse("10/02/202").is_none());
        assert!(parse("10 Feb 202").is_none());
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(parse("  10/02/2026  ").unwrap().date, date(2026, 2, 10));
    }

    // ---- Round trip ----

    #[test]
    fn test_display_round_trip() {
        for (y, m, d) in [(2026, 2, 10), (2025, 12, 31), (2027, 1, 5), (2028, 2, 29)] {
            let original = date(y, m, d);
            let reparsed = parse(&display(original)).unwrap();
            assert_eq!(reparsed.canonical, original.format("%Y-%m-%d").to_string());
        }
    }
}
