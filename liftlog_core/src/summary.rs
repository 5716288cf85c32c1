//! Per-day exercise summaries.
//!
//! Collapses set records into one row per `(date, program, exercise)` with
//! the best set, an Epley one-rep-max estimate and total volume.

use crate::{Result, SetRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// One exercise on one training day
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DailySummary {
    pub date: String,
    pub program: Option<String>,
    pub exercise: String,
    pub num_sets: usize,
    pub max_1rm: Option<f64>,
    pub best_weight_kg: Option<f64>,
    pub best_reps: Option<i32>,
    pub total_volume: f64,
    pub max_time_sec: Option<f64>,
}

/// Epley estimate: `weight * (1 + reps / 30)`, rounded
///
/// Returns `None` without both values or for zero reps.
pub fn estimate_one_rep_max(weight: Option<f64>, reps: Option<i32>) -> Option<f64> {
    let weight = weight?;
    let reps = reps.filter(|r| *r != 0)?;
    Some((weight * (1.0 + f64::from(reps) / 30.0)).round())
}

fn max_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Summarize records, ordered by date, then program, then exercise
pub fn daily_summary<'a, I>(records: I) -> Vec<DailySummary>
where
    I: IntoIterator<Item = &'a SetRecord>,
{
    type Key = (String, Option<String>, String);
    let mut groups: BTreeMap<Key, Vec<&SetRecord>> = BTreeMap::new();

    for record in records {
        groups
            .entry((
                record.date.clone(),
                record.program.clone(),
                record.exercise.clone(),
            ))
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|((date, program, exercise), sets)| {
            let best_weight_kg = sets.iter().fold(None, |acc, s| max_opt(acc, s.weight_kg));
            let best_reps = best_weight_kg.and_then(|best| {
                sets.iter()
                    .filter(|s| s.weight_kg == Some(best))
                    .filter_map(|s| s.reps)
                    .max()
            });

            DailySummary {
                date,
                program,
                exercise,
                num_sets: sets.iter().filter(|s| s.set_no.is_some()).count(),
                max_1rm: sets.iter().fold(None, |acc, s| {
                    max_opt(acc, estimate_one_rep_max(s.weight_kg, s.reps))
                }),
                best_weight_kg,
                best_reps,
                total_volume: sets.iter().filter_map(|s| s.volume).sum(),
                max_time_sec: sets.iter().fold(None, |acc, s| max_opt(acc, s.time_sec)),
            }
        })
        .collect()
}

/// Write summaries to a CSV file, replacing it
pub fn write_summary_csv(path: &Path, rows: &[DailySummary]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} daily summary rows to {:?}", rows.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(exercise: &str, set_no: Option<u32>, weight: Option<f64>, reps: Option<i32>) -> SetRecord {
        SetRecord {
            date: "2025-07-10".into(),
            program: Some("Push A".into()),
            exercise: exercise.into(),
            set_no,
            weight_kg: weight,
            reps,
            volume: crate::fields::volume(weight, reps),
            ..SetRecord::default()
        }
    }

    #[test]
    fn test_epley() {
        assert_eq!(estimate_one_rep_max(Some(100.0), Some(5)), Some(117.0));
        assert_eq!(estimate_one_rep_max(Some(60.0), Some(8)), Some(76.0));
        assert_eq!(estimate_one_rep_max(Some(60.0), Some(0)), None);
        assert_eq!(estimate_one_rep_max(None, Some(5)), None);
        assert_eq!(estimate_one_rep_max(Some(60.0), None), None);
    }

    #[test]
    fn test_daily_summary_groups_and_aggregates() {
        let records = vec![
            set("Barbell Bench Press", Some(1), Some(60.0), Some(8)),
            set("Barbell Bench Press", Some(2), Some(70.0), Some(5)),
            set("Barbell Bench Press", Some(3), Some(70.0), Some(6)),
            set("Barbell Bench Press", None, Some(50.0), Some(10)),
            set("Face Pulls", Some(1), None, Some(15)),
        ];

        let summary = daily_summary(&records);
        assert_eq!(summary.len(), 2);

        let bench = &summary[0];
        assert_eq!(bench.exercise, "Barbell Bench Press");
        assert_eq!(bench.num_sets, 3);
        assert_eq!(bench.best_weight_kg, Some(70.0));
        assert_eq!(bench.best_reps, Some(6));
        assert_eq!(bench.max_1rm, Some(84.0));
        assert_eq!(bench.total_volume, 480.0 + 350.0 + 420.0 + 500.0);
        assert_eq!(bench.max_time_sec, None);

        let face_pulls = &summary[1];
        assert_eq!(face_pulls.best_weight_kg, None);
        assert_eq!(face_pulls.best_reps, None);
        assert_eq!(face_pulls.max_1rm, None);
        assert_eq!(face_pulls.total_volume, 0.0);
    }

    #[test]
    fn test_summary_csv_written() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("processed/workouts_daily_exercise.csv");

        let records = vec![set("Deadlifts", Some(1), Some(140.0), Some(5))];
        write_summary_csv(&path, &daily_summary(&records)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with(
            "date,program,exercise,num_sets,max_1rm,best_weight_kg,best_reps,total_volume,max_time_sec"
        ));
        assert!(contents.contains("Deadlifts,1,163.0,140.0,5,700.0,"));
    }
}
