//! Line-by-line workout log parser.
//!
//! Walks a file once, front to back, keeping a [`ParseContext`] of the
//! current date, program and exercise. Each line goes through the grammar
//! first; lines the grammar rejects are handed to the classifier fallback.

use crate::classify::{
    Fallback, FallbackDispatch, LineClassifier, ReviewSink, DEFAULT_CONFIDENCE_THRESHOLD,
};
use crate::grammar::{self, LineMatch, SetFields};
use crate::normalize::{default_synonyms, SynonymTable};
use crate::{ParseContext, SetRecord};

/// Counters for one parsed file
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub records: usize,
    pub classified: usize,
    pub quarantined: usize,
}

/// Parser configured with its collaborators
///
/// The parser holds no per-file state; every call to [`LogParser::parse`]
/// starts from a fresh context.
pub struct LogParser<'a> {
    classifier: &'a dyn LineClassifier,
    review: &'a dyn ReviewSink,
    synonyms: &'a SynonymTable,
    threshold: f64,
}

impl<'a> LogParser<'a> {
    pub fn new(classifier: &'a dyn LineClassifier, review: &'a dyn ReviewSink) -> Self {
        Self {
            classifier,
            review,
            synonyms: default_synonyms(),
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_synonyms(mut self, synonyms: &'a SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Parse one file's text into set records, in line order
    pub fn parse(&self, text: &str, source: &str) -> Vec<SetRecord> {
        self.parse_with_stats(text, source).0
    }

    /// Like [`LogParser::parse`], also returning per-file counters
    pub fn parse_with_stats(&self, text: &str, source: &str) -> (Vec<SetRecord>, ParseStats) {
        let mut file = FileParse::new(self.synonyms);
        let dispatch = FallbackDispatch::new(self.classifier, self.review, self.threshold);

        for (line_no, line) in log_lines(text) {
            file.stats.lines += 1;
            match grammar::match_line(line) {
                LineMatch::Unmatched => {
                    file.stats.classified += 1;
                    let (fallback, quarantined) = dispatch.resolve(line, source, line_no);
                    if quarantined {
                        file.stats.quarantined += 1;
                    }
                    file.apply_fallback(fallback);
                }
                matched => file.apply_match(matched),
            }
        }

        file.stats.records = file.records.len();
        tracing::info!(
            "Parsed {} records from {} ({} lines, {} classified, {} queued for review)",
            file.stats.records,
            source,
            file.stats.lines,
            file.stats.classified,
            file.stats.quarantined
        );
        (file.records, file.stats)
    }
}

/// Parse one file with the built-in synonym table
pub fn parse_log(
    text: &str,
    source: &str,
    classifier: &dyn LineClassifier,
    review: &dyn ReviewSink,
    threshold: f64,
) -> Vec<SetRecord> {
    LogParser::new(classifier, review)
        .with_threshold(threshold)
        .parse(text, source)
}

/// Non-empty, non-comment lines with their 1-based position
///
/// Lines are right-trimmed before filtering and fully trimmed when
/// yielded. Numbering counts only the lines that survive the filter.
pub fn log_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.trim_start().starts_with('#'))
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
}

/// State owned by a single file's parse
struct FileParse<'a> {
    synonyms: &'a SynonymTable,
    ctx: ParseContext,
    records: Vec<SetRecord>,
    /// Index of the most recently appended record
    last_record: Option<usize>,
    stats: ParseStats,
}

impl<'a> FileParse<'a> {
    fn new(synonyms: &'a SynonymTable) -> Self {
        Self {
            synonyms,
            ctx: ParseContext::default(),
            records: Vec::new(),
            last_record: None,
            stats: ParseStats::default(),
        }
    }

    fn apply_match(&mut self, matched: LineMatch) {
        match matched {
            LineMatch::DateHeader { date, program } => {
                tracing::debug!("Session {} ({})", date, program);
                self.ctx.start_session(date, program);
            }
            LineMatch::SectionHeader => self.ctx.clear_exercise(),
            LineMatch::SetLine { set_no, fields } => {
                if fields.has_content() {
                    self.emit(set_no, fields);
                }
            }
            LineMatch::ExerciseLine(name) => self.set_exercise(&name),
            LineMatch::Unmatched => {}
        }
    }

    fn apply_fallback(&mut self, fallback: Fallback) {
        match fallback {
            Fallback::Set(fields) => self.emit(
                None,
                SetFields {
                    notes: None,
                    ..fields
                },
            ),
            Fallback::Exercise(name) => self.set_exercise(&name),
            Fallback::Note(note) => self.merge_note(&note),
            Fallback::Ignore => {}
        }
    }

    /// Switch to `name`, or drop the exercise if it is a warm-up style name
    fn set_exercise(&mut self, name: &str) {
        let canonical = self.synonyms.canonicalize(name);
        if grammar::is_excluded_name(name) || grammar::is_excluded_name(canonical) {
            tracing::debug!("Ignoring non-working exercise {:?}", name);
            self.ctx.clear_exercise();
        } else {
            tracing::debug!("Exercise {:?}", canonical);
            self.ctx.current_exercise = Some(canonical.to_string());
        }
    }

    /// Append a record if the context has both a date and an exercise
    fn emit(&mut self, set_no: Option<u32>, fields: SetFields) {
        let Some(base) = self.ctx.record() else {
            tracing::debug!("Dropping set outside of an active exercise");
            return;
        };

        self.records.push(SetRecord {
            set_no,
            weight_kg: fields.weight_kg,
            reps: fields.reps,
            time_sec: fields.time_sec,
            iso_load: fields.iso_load,
            volume: fields.volume,
            notes: fields.notes,
            ..base
        });
        self.last_record = Some(self.records.len() - 1);
    }

    fn merge_note(&mut self, note: &str) {
        match self.last_record.and_then(|i| self.records.get_mut(i)) {
            Some(record) => record.append_note(note),
            None => tracing::debug!("No record yet to attach note {:?}", note),
        }
    }
}
