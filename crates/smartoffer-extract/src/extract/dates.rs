//! Offer start/end dates from "between X and Y", "from X to Y", or a lone
//! "starting X" / "from X".
//!
//! An end date is never produced without a start date. Dates with unknown
//! month names or impossible days are skipped, leaving the fields empty
//! unless a later pattern yields a valid date.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferDates {
    pub start: String,
    pub end: String,
}

// Month name, day with optional ordinal suffix, optional ", 2026". The last
// group catches a reward unit right after the "year" ("July 15 2000 points"),
// which means the digits were an amount, not a year.
const MONTH_DAY: &str =
    r"([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s+((?:19|20)\d{2})\b(\s*(?:points?|pts|%|bonus))?)?";

/// Capture groups per `MONTH_DAY`.
const MONTH_DAY_GROUPS: usize = 4;

static BETWEEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bbetween\s+{MONTH_DAY}\s+and\s+{MONTH_DAY}")).unwrap()
});
static FROM_TO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\bfrom\s+{MONTH_DAY}\s+to\s+{MONTH_DAY}")).unwrap()
});
static START_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:starting|from)\s+{MONTH_DAY}")).unwrap()
});

/// Parse a month name or common abbreviation.
pub fn month_number(name: &str) -> Option<u32> {
    let m = match name.to_ascii_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(m)
}

/// One side of a date phrase, before a year has been chosen.
#[derive(Debug, Clone, Copy)]
struct MonthDay {
    month: u32,
    day: u32,
    year: Option<i32>,
}

impl MonthDay {
    /// Read the month/day/year triple starting at capture group `first`.
    fn from_captures(cap: &Captures, first: usize) -> Option<Self> {
        let month = month_number(cap.get(first)?.as_str())?;
        let day = cap.get(first + 1)?.as_str().parse().ok()?;
        let year = match cap.get(first + 3) {
            Some(_) => None,
            None => cap.get(first + 2).and_then(|m| m.as_str().parse().ok()),
        };
        Some(Self { month, day, year })
    }

    fn resolve(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_range(cap: &Captures, default_year: i32) -> Option<OfferDates> {
    let start = MonthDay::from_captures(cap, 1)?;
    let end = MonthDay::from_captures(cap, 1 + MONTH_DAY_GROUPS)?;

    let start_year = start.year.or(end.year).unwrap_or(default_year);
    let start_date = start.resolve(start_year)?;

    let mut end_date = end.resolve(end.year.unwrap_or(start_year))?;
    // "December 20 to January 5" without years crosses into the next year.
    if end.year.is_none() && end_date < start_date {
        end_date = end.resolve(start_year + 1)?;
    }

    Some(OfferDates {
        start: iso(start_date),
        end: iso(end_date),
    })
}

fn parse_start(cap: &Captures, default_year: i32) -> Option<OfferDates> {
    let start = MonthDay::from_captures(cap, 1)?;
    let date = start.resolve(start.year.unwrap_or(default_year))?;
    Some(OfferDates {
        start: iso(date),
        end: String::new(),
    })
}

/// Try the range patterns, then the start-only pattern; first valid parse wins.
pub fn extract_dates(text: &str, default_year: i32) -> OfferDates {
    for re in [&*BETWEEN_RE, &*FROM_TO_RE] {
        if let Some(dates) = re
            .captures_iter(text)
            .find_map(|cap| parse_range(&cap, default_year))
        {
            debug!("Offer dates: {} to {}", dates.start, dates.end);
            return dates;
        }
    }

    if let Some(dates) = START_ONLY_RE
        .captures_iter(text)
        .find_map(|cap| parse_start(&cap, default_year))
    {
        debug!("Offer start date: {}", dates.start);
        return dates;
    }

    OfferDates::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(text: &str) -> (String, String) {
        let d = extract_dates(text, 2025);
        (d.start, d.end)
    }

    #[test]
    fn test_between_range_with_ordinals() {
        assert_eq!(
            dates("between July 15th and July 22nd"),
            ("2025-07-15".into(), "2025-07-22".into())
        );
    }

    #[test]
    fn test_from_to_range() {
        assert_eq!(
            dates("valid from Aug 1st to Sept 3rd only"),
            ("2025-08-01".into(), "2025-09-03".into())
        );
    }

    #[test]
    fn test_start_only() {
        assert_eq!(dates("starting June 2"), ("2025-06-02".into(), String::new()));
        assert_eq!(dates("from october 9th"), ("2025-10-09".into(), String::new()));
    }

    #[test]
    fn test_explicit_year() {
        assert_eq!(
            dates("between March 1, 2026 and March 31, 2026"),
            ("2026-03-01".into(), "2026-03-31".into())
        );
        assert_eq!(
            dates("between March 1 and April 2 2027"),
            ("2027-03-01".into(), "2027-04-02".into())
        );
    }

    #[test]
    fn test_reward_amount_is_not_a_year() {
        assert_eq!(
            dates("starting July 15 2000 points per dollar"),
            ("2025-07-15".into(), String::new())
        );
        assert_eq!(
            dates("from July 1 to July 31 1000 bonus points"),
            ("2025-07-01".into(), "2025-07-31".into())
        );
        assert_eq!(
            dates("between July 15th and July 22nd 2000 points per dollar"),
            ("2025-07-15".into(), "2025-07-22".into())
        );
        assert_eq!(
            dates("between May 1 and May 9 2030% back"),
            ("2025-05-01".into(), "2025-05-09".into())
        );
    }

    #[test]
    fn test_range_wraps_year_end() {
        assert_eq!(
            dates("from December 20th to January 5th"),
            ("2025-12-20".into(), "2026-01-05".into())
        );
    }

    #[test]
    fn test_unparseable_month_is_empty() {
        assert_eq!(dates("between Smarch 3 and Smarch 9"), (String::new(), String::new()));
        assert_eq!(dates("starting Blursday 4"), (String::new(), String::new()));
    }

    #[test]
    fn test_invalid_day_is_empty() {
        assert_eq!(dates("between Feb 30 and Mar 2"), (String::new(), String::new()));
    }

    #[test]
    fn test_bad_range_end_falls_back_to_start() {
        // Range end is unparseable; the lone "from" clause still yields a start.
        assert_eq!(
            dates("from May 4th to Foo 9th"),
            ("2025-05-04".into(), String::new())
        );
    }

    #[test]
    fn test_end_never_without_start() {
        for text in [
            "",
            "until July 4",
            "ends July 22nd",
            "between Foo 1 and July 2",
            "between July 15th and July 22nd",
        ] {
            let d = extract_dates(text, 2025);
            assert!(d.end.is_empty() || !d.start.is_empty(), "{text}");
        }
    }

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("JULY"), Some(7));
        assert_eq!(month_number("Sept"), Some(9));
        assert_eq!(month_number("Smarch"), None);
    }
}
