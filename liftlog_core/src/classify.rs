//! Classifier fallback for lines the grammar does not recognize.
//!
//! The classifier and the review queue are injected capabilities. The
//! dispatch layer absorbs classifier failures, quarantines low-confidence
//! answers, and turns the label into a [`Fallback`] for the parser.

use crate::grammar::{self, SetFields};
use crate::{Classification, Label, Result, ReviewEntry};
use std::sync::Mutex;

/// Default confidence below which lines are queued for review
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.60;

/// Labels a raw log line
///
/// Classifiers may be shared between files parsed on different threads.
pub trait LineClassifier: Send + Sync {
    fn classify(&self, line: &str) -> Result<Classification>;
}

/// Receives lines the classifier was unsure about
///
/// Sinks may be shared between files parsed on different threads.
pub trait ReviewSink: Send + Sync {
    fn record(&self, entry: &ReviewEntry);
}

/// Classifier used when none is configured
///
/// Every line is `OTHER` with full confidence, so nothing is recorded
/// and nothing is queued.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClassifier;

impl LineClassifier for NoClassifier {
    fn classify(&self, _line: &str) -> Result<Classification> {
        Ok(Classification::new(Label::Other, 1.0))
    }
}

/// Review sink that drops every entry
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReview;

impl ReviewSink for NoReview {
    fn record(&self, _entry: &ReviewEntry) {}
}

/// In-memory review sink
#[derive(Debug, Default)]
pub struct MemoryReviewSink {
    entries: Mutex<Vec<ReviewEntry>>,
}

impl MemoryReviewSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn entries(&self) -> Vec<ReviewEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReviewSink for MemoryReviewSink {
    fn record(&self, entry: &ReviewEntry) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(entry.clone()),
            Err(poisoned) => poisoned.into_inner().push(entry.clone()),
        }
    }
}

/// What the parser should do with a line the classifier labelled
#[derive(Clone, Debug, PartialEq)]
pub enum Fallback {
    /// `SET` with a recognizable weight x reps
    Set(SetFields),
    /// `EXERCISE` whose text cleaned up to a name
    Exercise(String),
    /// `NOTE` to merge into the previous record
    Note(String),
    /// Nothing to do
    Ignore,
}

/// Wraps the injected classifier and review sink
pub struct FallbackDispatch<'a> {
    classifier: &'a dyn LineClassifier,
    review: &'a dyn ReviewSink,
    threshold: f64,
}

impl<'a> FallbackDispatch<'a> {
    pub fn new(
        classifier: &'a dyn LineClassifier,
        review: &'a dyn ReviewSink,
        threshold: f64,
    ) -> Self {
        Self {
            classifier,
            review,
            threshold,
        }
    }

    /// Classify `line`, never failing
    ///
    /// Errors become `(OTHER, 0.0)`. Confidences are clamped to `[0, 1]`
    /// and non-finite values count as zero.
    pub fn classify(&self, line: &str) -> Classification {
        match self.classifier.classify(line) {
            Ok(mut result) => {
                result.confidence = if result.confidence.is_finite() {
                    result.confidence.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                result
            }
            Err(e) => {
                tracing::warn!("Classifier failed on {:?}: {}", line, e);
                Classification::unknown()
            }
        }
    }

    /// Classify `line`, queue it for review if unsure, and decide what to do
    ///
    /// Returns the fallback action and whether the line was quarantined.
    pub fn resolve(&self, line: &str, source: &str, line_no: usize) -> (Fallback, bool) {
        let result = self.classify(line);
        tracing::debug!(
            "Line {} classified as {} ({:.2})",
            line_no,
            result.label,
            result.confidence
        );

        let quarantined = result.confidence < self.threshold;
        if quarantined {
            tracing::info!(
                "Queueing line {} of {} for review (confidence {:.2})",
                line_no,
                source,
                result.confidence
            );
            self.review.record(&ReviewEntry {
                line: line.to_string(),
                confidence: result.confidence,
                source_file: source.to_string(),
                line_no,
            });
        }

        let fallback = match result.label {
            Label::Set => grammar::match_loose_set(line).map_or(Fallback::Ignore, Fallback::Set),
            Label::Exercise => {
                grammar::clean_exercise_name(line).map_or(Fallback::Ignore, Fallback::Exercise)
            }
            Label::Note => Fallback::Note(line.to_string()),
            Label::Section | Label::Other => Fallback::Ignore,
        };

        (fallback, quarantined)
    }
}
