//! Integration tests for the liftlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Parsing log files into the combined CSV
//! - Review queue and labelled-line classification
//! - Daily summary generation
//! - Label merging

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PUSH_DAY: &str = "\
# July block
10-07-25 Push A
Bench Press
S1: 60kg x 8 reps
S2: 62.5kg x 6 reps (paused)
felt strong, add weight next week
Plank
S1: 20kg x 45 sec
";

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
}

fn write_log(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write log");
    path
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout log parser"));
}

#[test]
fn test_parse_writes_combined_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let log = write_log(&data_dir, "push.txt", PUSH_DAY);

    cli()
        .arg("parse")
        .arg(&log)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 rows"))
        .stderr(predicate::str::contains("Parsed 3 sets from push.txt"));

    let csv_path = data_dir.join("processed/workouts_raw_sets.csv");
    let mut reader = csv::Reader::from_path(&csv_path).expect("Failed to open CSV");
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "_source_file");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][1], "2025-07-10");
    assert_eq!(&rows[0][2], "Push A");
    assert_eq!(&rows[0][3], "Barbell Bench Press");
    assert_eq!(&rows[1][10], "paused");
    assert_eq!(&rows[2][3], "Plank");

    // No classifier configured, so nothing is queued
    assert!(!data_dir.join("labels/to_review.csv").exists());
}

#[test]
fn test_parse_json_output() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "push.txt", PUSH_DAY);

    let output = cli()
        .arg("parse")
        .arg(&log)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--json")
        .output()
        .expect("Failed to run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let first: serde_json::Value =
        serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["exercise"], "Barbell Bench Press");
    assert_eq!(first["volume"], 480.0);
    assert_eq!(first["source_file"], "push.txt");
    assert_eq!(stdout.lines().count(), 3);
}

#[test]
fn test_labels_drive_fallback_and_review() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let log = write_log(&data_dir, "push.txt", &format!("{}what a session, hm\n", PUSH_DAY));

    fs::create_dir_all(data_dir.join("labels")).unwrap();
    fs::write(
        data_dir.join("labels/lines_for_training.csv"),
        "raw_line,label\n\"felt strong, add weight next week\",NOTE\n",
    )
    .unwrap();

    cli()
        .arg("parse")
        .arg(&log)
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("paused ; felt strong, add weight next week"))
        .stderr(predicate::str::contains("Low-confidence lines saved: 1"));

    let queue = fs::read_to_string(data_dir.join("labels/to_review.csv")).unwrap();
    assert!(queue.starts_with("raw_line,confidence,source_file,line_no"));
    assert!(queue.contains("\"what a session, hm\",0.0,push.txt,8"));
}

#[test]
fn test_threshold_zero_disables_review() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let log = write_log(&data_dir, "push.txt", PUSH_DAY);
    fs::create_dir_all(data_dir.join("labels")).unwrap();
    fs::write(data_dir.join("labels/lines_for_training.csv"), "raw_line,label\n").unwrap();

    cli()
        .arg("parse")
        .arg(&log)
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--threshold")
        .arg("0")
        .assert()
        .success();

    assert!(!data_dir.join("labels/to_review.csv").exists());
}

#[test]
fn test_invalid_threshold_fails() {
    let temp_dir = setup_test_dir();
    let log = write_log(temp_dir.path(), "push.txt", PUSH_DAY);

    cli()
        .arg("parse")
        .arg(&log)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--threshold")
        .arg("1.5")
        .assert()
        .failure();
}

#[test]
fn test_unreadable_file_is_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let log = write_log(&data_dir, "push.txt", PUSH_DAY);

    cli()
        .arg("parse")
        .arg(data_dir.join("missing.txt"))
        .arg(&log)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("ERROR reading"))
        .stdout(predicate::str::contains("Wrote 3 rows"));
}

#[test]
fn test_summary_from_parsed_sets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let log = write_log(&data_dir, "push.txt", PUSH_DAY);

    cli()
        .arg("parse")
        .arg(&log)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("summary")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created daily summary: 2 rows"));

    let summary =
        fs::read_to_string(data_dir.join("processed/workouts_daily_exercise.csv")).unwrap();
    assert!(summary.contains("2025-07-10,Push A,Barbell Bench Press,2,"));
    assert!(summary.contains("2025-07-10,Push A,Plank,1,"));
}

#[test]
fn test_summary_without_input() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("summary")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No parsed sets found"));
}

#[test]
fn test_merge_labels() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let labels_dir = data_dir.join("labels");
    fs::create_dir_all(&labels_dir).unwrap();

    fs::write(
        labels_dir.join("lines_for_training.csv"),
        "raw_line,label\nfelt heavy,NOTE\nold line,OTHER\n",
    )
    .unwrap();
    fs::write(
        labels_dir.join("to_review.csv"),
        "raw_line,confidence,source_file,line_no,label\n\
         felt heavy,0.3,a.txt,2,OTHER\n\
         \"60 x 8, easy\",0.4,a.txt,5,SET\n\
         unlabelled,0.2,a.txt,9,\n",
    )
    .unwrap();

    cli()
        .arg("merge-labels")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Final training set: 3 lines"));

    let merged = fs::read_to_string(labels_dir.join("lines_for_training.csv")).unwrap();
    let lines: Vec<_> = merged.lines().collect();
    assert_eq!(
        lines,
        vec![
            "raw_line,label",
            "old line,OTHER",
            "felt heavy,OTHER",
            "\"60 x 8, easy\",SET",
        ]
    );
}
