use clap::{Parser, Subcommand};
use liftlog_core::classify::LineClassifier;
use liftlog_core::config::validate_threshold;
use liftlog_core::review::read_review_queue;
use liftlog_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout log parser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse raw log files into structured sets
    Parse {
        /// Log files to parse
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output CSV (defaults to processed/workouts_raw_sets.csv)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Review queue CSV for low-confidence lines
        #[arg(long)]
        review: Option<PathBuf>,

        /// Labelled lines CSV used to classify unrecognized lines
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Confidence below which lines are queued for review
        #[arg(long)]
        threshold: Option<f64>,

        /// Print records as JSON lines instead of writing CSV
        #[arg(long)]
        json: bool,
    },

    /// Build the per-day exercise summary from parsed sets
    Summary {
        /// Parsed sets CSV
        #[arg(long)]
        input: Option<PathBuf>,

        /// Summary CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Fold reviewed, labelled lines into the training labels
    MergeLabels {
        /// Training labels CSV
        #[arg(long)]
        training: Option<PathBuf>,

        /// Review queue CSV with a filled-in label column
        #[arg(long)]
        reviewed: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    liftlog_core::logging::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    match cli.command {
        Commands::Parse {
            files,
            out,
            review,
            labels,
            threshold,
            json,
        } => cmd_parse(
            &config,
            &files,
            out.unwrap_or_else(|| config.data.raw_sets_path()),
            review.unwrap_or_else(|| config.data.review_queue_path()),
            labels.unwrap_or_else(|| config.data.training_labels_path()),
            threshold.unwrap_or(config.parser.confidence_threshold),
            json,
        ),
        Commands::Summary { input, out } => cmd_summary(
            input.unwrap_or_else(|| config.data.raw_sets_path()),
            out.unwrap_or_else(|| config.data.daily_summary_path()),
        ),
        Commands::MergeLabels { training, reviewed } => cmd_merge_labels(
            training.unwrap_or_else(|| config.data.training_labels_path()),
            reviewed.unwrap_or_else(|| config.data.review_queue_path()),
        ),
    }
}

fn cmd_parse(
    config: &Config,
    files: &[PathBuf],
    out_path: PathBuf,
    review_path: PathBuf,
    labels_path: PathBuf,
    threshold: f64,
    json: bool,
) -> Result<()> {
    validate_threshold(threshold)?;

    let synonyms = config.normalizer.synonym_table()?;
    let classifier = load_classifier(&labels_path)?;
    let queue = CsvReviewSink::new(&review_path);
    let review = CountingSink::new(&queue);

    let parser = LogParser::new(classifier.as_ref(), &review)
        .with_threshold(threshold)
        .with_synonyms(&synonyms);

    let mut rows = Vec::new();
    for path in files {
        let name = source_name(path);
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("ERROR reading {}: {}", path.display(), e);
                continue;
            }
        };

        let records = parser.parse(&text, &name);
        eprintln!("-> Parsed {} sets from {}", records.len(), name);
        rows.extend(records.into_iter().map(|record| SourcedRecord {
            source_file: name.clone(),
            record,
        }));
    }

    if json {
        export::write_records_jsonl(std::io::stdout().lock(), &rows)?;
    } else if rows.is_empty() {
        println!("No rows parsed.");
    } else {
        export::write_records_csv(&out_path, &rows)?;
        println!("Wrote {} rows to {}", rows.len(), out_path.display());
    }

    let queued = review.count();
    if queued > 0 {
        eprintln!(
            "Low-confidence lines saved: {} ({})",
            queued,
            review_path.display()
        );
    }

    Ok(())
}

fn cmd_summary(input: PathBuf, out: PathBuf) -> Result<()> {
    if !input.exists() {
        println!("No parsed sets found at {} - run `liftlog parse` first.", input.display());
        return Ok(());
    }

    let rows = export::read_records_csv(&input)?;
    let summary = summary::daily_summary(rows.iter().map(|row| &row.record));
    summary::write_summary_csv(&out, &summary)?;

    println!("✓ Created daily summary: {} rows", summary.len());
    println!("  CSV: {}", out.display());
    Ok(())
}

fn cmd_merge_labels(training_path: PathBuf, reviewed_path: PathBuf) -> Result<()> {
    let training = if training_path.exists() {
        labels::read_labelled_lines(&training_path)?
    } else {
        Vec::new()
    };
    let reviewed = read_review_queue(&reviewed_path)?;

    let merged = labels::merge_labels(training, &reviewed);
    labels::write_labelled_lines(&training_path, &merged)?;

    println!("Final training set: {} lines", merged.len());
    Ok(())
}

/// Lookup classifier if a labels file exists, otherwise none
fn load_classifier(labels_path: &Path) -> Result<Box<dyn LineClassifier>> {
    if labels_path.exists() {
        Ok(Box::new(LabelTableClassifier::load_from(labels_path)?))
    } else {
        tracing::info!(
            "No labelled lines at {:?}, unrecognized lines will be ignored",
            labels_path
        );
        Ok(Box::new(NoClassifier))
    }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Forwards to another sink while counting entries
struct CountingSink<'a> {
    inner: &'a dyn ReviewSink,
    count: std::sync::atomic::AtomicUsize,
}

impl<'a> CountingSink<'a> {
    fn new(inner: &'a dyn ReviewSink) -> Self {
        Self {
            inner,
            count: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    fn count(&self) -> usize {
        self.count.load(std::sync::atomic::Ordering::Relaxed)
    }
}

impl ReviewSink for CountingSink<'_> {
    fn record(&self, entry: &ReviewEntry) {
        self.count
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.inner.record(entry);
    }
}
