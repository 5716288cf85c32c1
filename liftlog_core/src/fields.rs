//! Numeric field derivation for set lines.
//!
//! Every function here is total: bad input yields `None` (or the raw
//! text for dates), never an error.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

static PLUS_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\+\s*").unwrap());

static DASH_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*-\s*").unwrap());

static DATE_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[-_/](\d{1,2})[-_/](\d{2,4})$").unwrap());

/// Parse a float and truncate it toward zero
fn truncate(raw: &str) -> Option<i32> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value.abs() > i32::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i32)
}

/// Parse a reps field such as `8`, `8+2` or `8-10`
///
/// - `8+2` sums the parts (10)
/// - `8-10` takes the lower bound (8)
pub fn parse_reps(raw: &str) -> Option<i32> {
    let raw = raw.trim();

    if raw.contains('+') {
        return PLUS_SPLIT
            .split(raw)
            .map(truncate)
            .try_fold(0i32, |acc, part| acc.checked_add(part?));
    }

    if raw.contains('-') {
        return DASH_SPLIT.split(raw).next().and_then(truncate);
    }

    truncate(raw)
}

/// Parse a weight, tolerating stray unit text like `60kg`
pub fn parse_weight(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => FIRST_NUMBER
            .find(raw)
            .and_then(|m| m.as_str().parse::<f64>().ok()),
    }
}

/// Parse a duration in seconds
pub fn parse_time(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Training volume: weight x reps
pub fn volume(weight: Option<f64>, reps: Option<i32>) -> Option<f64> {
    Some(weight? * f64::from(reps?))
}

/// Isometric load: weight x hold time
pub fn iso_load(weight: Option<f64>, time_sec: Option<f64>) -> Option<f64> {
    Some(weight? * time_sec?)
}

/// Normalize a date token to ISO `YYYY-MM-DD`, reading it day-first
///
/// Falls back to month-first when the day-first reading is not a real
/// date, and to the raw token when neither reading works.
pub fn normalize_date(raw: &str) -> String {
    parse_day_first(raw)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| {
            tracing::debug!("Keeping unparseable date {:?} as written", raw);
            raw.to_string()
        })
}

fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let caps = DATE_PARTS.captures(raw.trim())?;
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year = expand_year(&caps[3])?;

    NaiveDate::from_ymd_opt(year, second, first)
        .or_else(|| NaiveDate::from_ymd_opt(year, first, second))
}

/// Two-digit years pivot at 69 (00-68 -> 20xx, 69-99 -> 19xx)
///
/// The pivot is fixed, not a window around the current year, so `70`
/// always means 1970 no matter when the log is parsed.
fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    if raw.len() == 2 {
        Some(if year < 69 { 2000 + year } else { 1900 + year })
    } else {
        Some(year)
    }
}
