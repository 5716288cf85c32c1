//! Line grammar for workout logs.
//!
//! Each matcher looks at one trimmed line and either recognizes it or
//! declines. [`match_line`] runs them in fixed priority and the first
//! match wins:
//!
//! 1. Date header: `10-07-25 Push A`
//! 2. Section header: `Accessories:` or a `---` divider
//! 3. Set line: `S1: 60kg x 8 reps (felt easy)`
//! 4. Exercise name: `- Bench Press (8-10 reps)`
//!
//! Lines none of them accept come back as [`LineMatch::Unmatched`].

use crate::fields;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static DATE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}[-_/]\d{1,2}[-_/]\d{2,4})\s+(.+)$").unwrap());

static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z\s\-&()/']*:\s*$").unwrap());

static SET_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^S(\d+)\s*:\s*(.*)$").unwrap());

static TRAILING_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*\((.*?)\)\s*$").unwrap());

static WEIGHT_REPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(\d+(?:\.\d+)?)\s*(?:kgs?)?\s*[×x*]\s*(\d+(?:\.\d+)?(?:\s*[+\-]\s*\d+(?:\.\d+)?)?)\s*(?:reps?)?$",
    )
    .unwrap()
});

static WEIGHT_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(?:kgs?)?\s*[×x*]\s*(\d+(?:\.\d+)?)\s*sec(?:ond)?s?$")
        .unwrap()
});

static TIME_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*sec(?:ond)?s?$").unwrap());

static REPS_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?(?:\s*[+\-]\s*\d+(?:\.\d+)?)?)\s*(?:reps?)?$").unwrap()
});

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Weight x reps anywhere in a line, no `S<n>:` prefix needed
static LOOSE_WEIGHT_REPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:kgs?)?\s*[×x*]\s*(\d+(?:\.\d+)?)").unwrap()
});

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:[-•*]|\d+[.)])\s*").unwrap());

static EXERCISE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9\s\-–—()\[\]{}']*[A-Za-z0-9)\]}]$").unwrap());

static NUMERIC_SET_EXPR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d+(?:\s*kg)?\s*[×x]\s*\d+").unwrap());

static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\d+(?:\s*reps?)?$").unwrap());

static TRAILING_PAREN_REPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\(\s*\d{1,3}\s*(?:[-–—]\s*\d{1,3})?\s*(?:reps?)?\s*\)\s*$").unwrap()
});

static TRAILING_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\d{1,3}\s*[-–—]\s*\d{1,3}\s*(?:reps?)?\s*$").unwrap()
});

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[(\[{][^)\]}]*[)\]}]").unwrap());

/// Warm-up, cool-down and bookkeeping lines that look like exercise names
static EXCLUDED_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "arm circles",
        "leg swings",
        "band pull-aparts",
        "thoracic rotations",
        "stretch",
        "cool-down",
        "warm-up",
        "superset 1",
        "superset 2",
        "superset 3",
        "dead hangs",
        "v - bar",
        "scapular pull-ups",
        "cat-cow stretch",
        "total weight",
        "total weight including bar",
    ])
});

/// Numeric fields pulled from a set line body
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetFields {
    pub weight_kg: Option<f64>,
    pub reps: Option<i32>,
    pub time_sec: Option<f64>,
    pub iso_load: Option<f64>,
    pub volume: Option<f64>,
    pub notes: Option<String>,
}

impl SetFields {
    /// Weight and reps, with volume derived when both are present
    fn weight_reps(weight_kg: Option<f64>, reps: Option<i32>) -> Self {
        Self {
            weight_kg,
            reps,
            volume: fields::volume(weight_kg, reps),
            ..Self::default()
        }
    }

    /// True if the line carried anything worth recording
    pub fn has_content(&self) -> bool {
        self.weight_kg.is_some()
            || self.reps.is_some()
            || self.time_sec.is_some()
            || self.iso_load.is_some()
            || self.notes.is_some()
    }
}

/// Outcome of running the grammar over one line
#[derive(Clone, Debug, PartialEq)]
pub enum LineMatch {
    DateHeader { date: String, program: String },
    SectionHeader,
    SetLine { set_no: Option<u32>, fields: SetFields },
    /// Cleaned, not yet canonicalized, exercise name
    ExerciseLine(String),
    Unmatched,
}

type Matcher = fn(&str) -> Option<LineMatch>;

/// Matchers in priority order
const MATCHERS: [Matcher; 4] = [
    match_date_header,
    match_section_header,
    match_set_line,
    match_exercise_line,
];

/// Run every matcher in priority order; first success wins
pub fn match_line(line: &str) -> LineMatch {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(line))
        .unwrap_or(LineMatch::Unmatched)
}

pub fn match_date_header(line: &str) -> Option<LineMatch> {
    let caps = DATE_HEADER.captures(line)?;
    Some(LineMatch::DateHeader {
        date: fields::normalize_date(&caps[1]),
        program: caps[2].trim().to_string(),
    })
}

pub fn match_section_header(line: &str) -> Option<LineMatch> {
    if line.starts_with("---") || SECTION_HEADER.is_match(line) {
        Some(LineMatch::SectionHeader)
    } else {
        None
    }
}

pub fn match_set_line(line: &str) -> Option<LineMatch> {
    let caps = SET_PREFIX.captures(line)?;
    let set_no = caps[1].parse().ok();
    Some(LineMatch::SetLine {
        set_no,
        fields: parse_set_body(caps[2].trim()),
    })
}

pub fn match_exercise_line(line: &str) -> Option<LineMatch> {
    let stripped = BULLET.replace(line, "");
    if !EXERCISE_LINE.is_match(stripped.trim()) {
        return None;
    }
    clean_exercise_name(line).map(LineMatch::ExerciseLine)
}

/// Parse the text after `S<n>:`
///
/// A trailing `(...)` is taken as notes whichever branch matches.
fn parse_set_body(body: &str) -> SetFields {
    let (body, notes) = match TRAILING_NOTE.captures(body) {
        Some(caps) => {
            let note = caps[2].trim();
            let note = (!note.is_empty()).then(|| note.to_string());
            (caps.get(1).map_or("", |m| m.as_str()).trim(), note)
        }
        None => (body, None),
    };

    let mut parsed = parse_set_measurements(body);
    if parsed.notes.is_none() {
        parsed.notes = notes;
    } else if let Some(note) = notes {
        // Catch-all text and a parenthetical both present; keep the parenthetical
        parsed.notes = Some(note);
    }
    parsed
}

fn parse_set_measurements(body: &str) -> SetFields {
    if let Some(caps) = WEIGHT_REPS.captures(body) {
        return SetFields::weight_reps(
            fields::parse_weight(&caps[1]),
            fields::parse_reps(&caps[2]),
        );
    }

    if let Some(caps) = WEIGHT_TIME.captures(body) {
        let weight_kg = fields::parse_weight(&caps[1]);
        let time_sec = fields::parse_time(&caps[2]);
        return SetFields {
            weight_kg,
            time_sec,
            iso_load: fields::iso_load(weight_kg, time_sec),
            ..SetFields::default()
        };
    }

    if let Some(caps) = TIME_ONLY.captures(body) {
        return SetFields {
            time_sec: fields::parse_time(&caps[1]),
            ..SetFields::default()
        };
    }

    if let Some(caps) = REPS_ONLY.captures(body) {
        return SetFields {
            reps: fields::parse_reps(&caps[1]),
            ..SetFields::default()
        };
    }

    if body.is_empty() {
        return SetFields::default();
    }

    // Catch-all: a bare number wins over free text. Digit runs too long
    // for i32 saturate rather than drop the line.
    match FIRST_INTEGER.find(body) {
        Some(m) => SetFields {
            reps: Some(m.as_str().parse().unwrap_or(i32::MAX)),
            ..SetFields::default()
        },
        None => SetFields {
            notes: Some(body.to_string()),
            ..SetFields::default()
        },
    }
}

/// Weight x reps found anywhere in `line`
pub fn match_loose_set(line: &str) -> Option<SetFields> {
    let caps = LOOSE_WEIGHT_REPS.captures(line)?;
    Some(SetFields::weight_reps(
        fields::parse_weight(&caps[1]),
        fields::parse_reps(&caps[2]),
    ))
}

/// Reduce a line to a bare exercise name
///
/// Strips bullets and numbering, rep annotations like `(8-10 reps)` or a
/// trailing `5-8`, and any remaining bracketed notes. Returns `None` for
/// lines that are really numbers or headings.
pub fn clean_exercise_name(line: &str) -> Option<String> {
    let name = collapse_whitespace(&BULLET.replace(line, ""));

    if name.is_empty() || name.ends_with(':') {
        return None;
    }
    if name.starts_with('(') && name.ends_with(')') {
        return None;
    }
    if NUMERIC_SET_EXPR.is_match(&name) || BARE_NUMBER.is_match(&name) {
        return None;
    }

    let name = TRAILING_PAREN_REPS.replace(&name, "");
    let name = TRAILING_RANGE.replace(&name, "");
    let name = BRACKETED.replace_all(&name, "");
    let name = TRAILING_RANGE.replace(&name, "");
    let name = collapse_whitespace(&name);

    (!name.is_empty()).then_some(name)
}

/// Warm-up and other non-working names that must not become the exercise
pub fn is_excluded_name(name: &str) -> bool {
    EXCLUDED_NAMES.contains(crate::normalize::lookup_key(name).as_str())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_fields(line: &str) -> SetFields {
        match match_line(line) {
            LineMatch::SetLine { fields, .. } => fields,
            other => panic!("expected set line for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_date_header() {
        assert_eq!(
            match_line("10-07-25 Push A"),
            LineMatch::DateHeader {
                date: "2025-07-10".into(),
                program: "Push A".into(),
            }
        );
    }

    #[test]
    fn test_date_header_keeps_raw_date() {
        assert_eq!(
            match_line("45/13/25   Legs  "),
            LineMatch::DateHeader {
                date: "45/13/25".into(),
                program: "Legs".into(),
            }
        );
    }

    #[test]
    fn test_date_without_program_is_not_a_header() {
        assert_eq!(match_line("10-07-25"), LineMatch::Unmatched);
    }

    #[test]
    fn test_section_headers() {
        assert_eq!(match_line("Accessories:"), LineMatch::SectionHeader);
        assert_eq!(match_line("Warm-up:"), LineMatch::SectionHeader);
        assert_eq!(match_line("---"), LineMatch::SectionHeader);
        assert_eq!(match_line("----- finisher -----"), LineMatch::SectionHeader);
    }

    #[test]
    fn test_weight_reps_branch() {
        let fields = set_fields("S1: 60kg x 8 reps");
        assert_eq!(fields.weight_kg, Some(60.0));
        assert_eq!(fields.reps, Some(8));
        assert_eq!(fields.volume, Some(480.0));
        assert_eq!(fields.iso_load, None);
        assert_eq!(fields.time_sec, None);
    }

    #[test]
    fn test_weight_reps_variants() {
        let fields = set_fields("S2: 62.5 kgs × 8+2 reps");
        assert_eq!(fields.weight_kg, Some(62.5));
        assert_eq!(fields.reps, Some(10));
        assert_eq!(fields.volume, Some(625.0));

        let fields = set_fields("S3: 40*10");
        assert_eq!(fields.weight_kg, Some(40.0));
        assert_eq!(fields.reps, Some(10));

        let fields = set_fields("s4: 100 X 5 rep");
        assert_eq!(fields.reps, Some(5));
    }

    #[test]
    fn test_weight_time_branch() {
        let fields = set_fields("S1: 20kg x 30 sec");
        assert_eq!(fields.weight_kg, Some(20.0));
        assert_eq!(fields.time_sec, Some(30.0));
        assert_eq!(fields.iso_load, Some(600.0));
        assert_eq!(fields.volume, None);
        assert_eq!(fields.reps, None);
    }

    #[test]
    fn test_time_only_branch() {
        let fields = set_fields("S1: 45 seconds");
        assert_eq!(fields.time_sec, Some(45.0));
        assert_eq!(fields.weight_kg, None);
        assert_eq!(fields.iso_load, None);
    }

    #[test]
    fn test_reps_only_branch() {
        assert_eq!(set_fields("S1: 12 reps").reps, Some(12));
        assert_eq!(set_fields("S2: 8-10 reps").reps, Some(8));
        assert_eq!(set_fields("S3: 5 + 3").reps, Some(8));
        assert_eq!(set_fields("S3: 5 + 3").weight_kg, None);
    }

    #[test]
    fn test_catch_all_branch() {
        let fields = set_fields("S1: bodyweight to failure, got 14");
        assert_eq!(fields.reps, Some(14));
        assert_eq!(fields.notes, None);

        let fields = set_fields("S2: failed");
        assert_eq!(fields.reps, None);
        assert_eq!(fields.notes.as_deref(), Some("failed"));
    }

    #[test]
    fn test_catch_all_oversized_number_saturates() {
        let fields = set_fields("S1: did 99999999999 today");
        assert_eq!(fields.reps, Some(i32::MAX));
        assert!(fields.has_content());
    }

    #[test]
    fn test_trailing_notes_with_any_branch() {
        let fields = set_fields("S1: 60kg x 8 reps (felt easy)");
        assert_eq!(fields.reps, Some(8));
        assert_eq!(fields.notes.as_deref(), Some("felt easy"));

        let fields = set_fields("S2: 30 sec (shaky)");
        assert_eq!(fields.time_sec, Some(30.0));
        assert_eq!(fields.notes.as_deref(), Some("shaky"));

        let fields = set_fields("S3: skipped (elbow)");
        assert_eq!(fields.notes.as_deref(), Some("elbow"));
    }

    #[test]
    fn test_empty_set_body() {
        let fields = set_fields("S1:");
        assert!(!fields.has_content());
    }

    #[test]
    fn test_set_number_captured() {
        match match_line("S12: 5 reps") {
            LineMatch::SetLine { set_no, .. } => assert_eq!(set_no, Some(12)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_exercise_lines() {
        assert_eq!(
            match_line("Bench Press"),
            LineMatch::ExerciseLine("Bench Press".into())
        );
        assert_eq!(
            match_line("- Barbell  Rows (8-10 reps)"),
            LineMatch::ExerciseLine("Barbell Rows".into())
        );
        assert_eq!(
            match_line("2. Lat Pulldown 10-12"),
            LineMatch::ExerciseLine("Lat Pulldown".into())
        );
        assert_eq!(
            match_line("• Face Pulls (rope) (15)"),
            LineMatch::ExerciseLine("Face Pulls".into())
        );
    }

    #[test]
    fn test_numeric_lines_are_not_exercises() {
        assert_eq!(match_line("60kg x 8"), LineMatch::Unmatched);
        assert_eq!(match_line("12"), LineMatch::Unmatched);
        assert_eq!(match_line("felt strong, good pump"), LineMatch::Unmatched);
    }

    #[test]
    fn test_clean_exercise_name_rejections() {
        assert_eq!(clean_exercise_name("Superset:"), None);
        assert_eq!(clean_exercise_name("(rest 2 min)"), None);
        assert_eq!(clean_exercise_name("60 kg x 8"), None);
        assert_eq!(clean_exercise_name("10 reps"), None);
        assert_eq!(clean_exercise_name("- "), None);
    }

    #[test]
    fn test_excluded_names() {
        assert!(is_excluded_name("Stretch"));
        assert!(is_excluded_name("cool-down"));
        assert!(is_excluded_name("Dead  Hangs"));
        assert!(!is_excluded_name("Deadlifts"));
    }

    #[test]
    fn test_loose_set_match() {
        let fields = match_loose_set("did 60 x 8 after warmup").unwrap();
        assert_eq!(fields.weight_kg, Some(60.0));
        assert_eq!(fields.reps, Some(8));
        assert_eq!(fields.volume, Some(480.0));
        assert!(match_loose_set("just chatting").is_none());
    }
}
