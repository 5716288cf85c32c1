//! Exercise name normalization.
//!
//! Synonymous spellings ("bench press", "Barbell Bench Press") are folded
//! into one canonical name through a [`SynonymTable`]. Unknown names pass
//! through untouched.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Cached built-in table, built once and shared
static DEFAULT_SYNONYMS: Lazy<SynonymTable> = Lazy::new(SynonymTable::builtin);

/// Get a reference to the cached built-in synonym table
pub fn default_synonyms() -> &'static SynonymTable {
    &DEFAULT_SYNONYMS
}

/// Lowercase, trim and collapse internal whitespace
pub fn lookup_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Immutable mapping from lookup key to canonical exercise name
#[derive(Clone, Debug, Default)]
pub struct SynonymTable {
    entries: HashMap<String, String>,
}

/// On-disk format for user-supplied synonyms
#[derive(Debug, Deserialize)]
struct SynonymFile {
    #[serde(default)]
    synonyms: HashMap<String, String>,
}

impl SynonymTable {
    /// Build a table from `(variant, canonical)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (lookup_key(k.as_ref()), v.into()))
            .collect();
        Self { entries }
    }

    /// Return a copy of this table with `other` layered on top
    pub fn extend(&self, other: &SynonymTable) -> Self {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { entries }
    }

    /// Load extra synonyms from a TOML file with a `[synonyms]` table
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: SynonymFile = toml::from_str(&contents)?;
        if file.synonyms.values().any(|v| v.trim().is_empty()) {
            return Err(Error::Config(format!(
                "Empty canonical name in synonyms file {:?}",
                path
            )));
        }
        tracing::info!("Loaded {} synonyms from {:?}", file.synonyms.len(), path);
        Ok(Self::from_pairs(file.synonyms))
    }

    /// Canonical name for `name`, or `name` itself when unmapped
    pub fn canonicalize<'a>(&'a self, name: &'a str) -> &'a str {
        if name.trim().is_empty() {
            return name;
        }
        self.entries
            .get(&lookup_key(name))
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in table of common gym exercise spellings
    pub fn builtin() -> Self {
        Self::from_pairs([
            // Squats
            ("barbell back squats", "Barbell Back Squats"),
            ("barbell squats", "Barbell Back Squats"),
            ("front squats", "Front Barbell Squats"),
            ("goblet squats", "Front Dumbbell Squats"),
            ("hack squats", "Hack Squat"),
            ("bulgarian split squats", "Bulgarian Split Squats"),
            ("lunges", "Lunges"),
            // Bench press
            ("barbell bench press", "Barbell Bench Press"),
            ("bench press", "Barbell Bench Press"),
            ("db bench press", "Dumbbell Bench Press"),
            ("incline db press", "Incline Dumbbell Press"),
            ("incline barbell bench press", "Incline Barbell Bench Press"),
            ("incline barbell press", "Incline Barbell Bench Press"),
            ("incline bench press", "Incline Barbell Bench Press"),
            ("inclined barbell press", "Incline Barbell Bench Press"),
            ("incline smith bench press", "Incline Smith Bench Press"),
            // Rows
            ("barbell bent-over rows", "Barbell Bent Over Rows"),
            ("barbell rows", "Barbell Bent Over Rows"),
            ("chest supported db row", "Chest Supported DB Rows"),
            ("cable seated rows", "Seated Cable Rows"),
            ("seated cable row", "Seated Cable Rows"),
            ("seated cable rows", "Seated Cable Rows"),
            ("seated row", "Seated Cable Rows"),
            ("t-bar rows", "T-Bar Rows"),
            // Hinges
            ("barbell good mornings", "Barbell Good Mornings"),
            ("good mornings", "Barbell Good Mornings"),
            ("barbell rdl", "Barbell RDLs"),
            ("db rdl", "Dumbbell RDLs"),
            ("deadlift", "Deadlifts"),
            ("deadlifts", "Deadlifts"),
            // Overhead press
            ("barbell overhead press", "Barbell Overhead Press"),
            ("overhead press", "Barbell Overhead Press"),
            ("over head press", "Barbell Overhead Press"),
            ("standing overhead press", "Barbell Overhead Press"),
            ("seated barbell ohp", "Seated Barbell Press"),
            ("seated db shoulder press", "Seated Dumbbell Press"),
            ("seated db press", "Seated Dumbbell Press"),
            // Shrugs
            ("barbell shrugs", "Shrugs"),
            ("db shrugs", "Shrugs"),
            ("trap-bar shrugs", "Shrugs"),
            // Curls
            ("barbell curls", "Barbell Bicep Curls"),
            ("barbell hammer curl", "Barbell Hammer Curls"),
            ("cable curls", "Cable Bicep Curls"),
            ("db hammer curls", "Dumbbell Hammer Curls"),
            ("hammer curls", "Dumbbell Hammer Curls"),
            ("rope hammer curls", "Cable Hammer Curls"),
            ("db preacher curls", "Dumbbell Preacher Curls"),
            ("preacher curls", "Dumbbell Preacher Curls"),
            ("ez bar curls", "EZ Bar Bicep Curls"),
            ("ez bar spider curls", "EZ Bar Spider Curls"),
            ("reverse curls", "Reverse Curls"),
            ("reverse curls cable", "Reverse Cable Curls"),
            ("reverse ez bar curls", "Reverse EZ Bar Curls"),
            // Wrists
            ("db front wrist curls", "Front Wrist Curls"),
            ("front wrist curl", "Front Wrist Curls"),
            ("front wrist curls", "Front Wrist Curls"),
            ("wrist curls", "Front Wrist Curls"),
            ("db reverse wrist curls", "Reverse Wrist Curls"),
            ("reverse wrist curls", "Reverse Wrist Curls"),
            // Triceps
            ("cable kickback", "Cable Tricep Kickbacks"),
            ("cable triceps kickback", "Cable Tricep Kickbacks"),
            ("cable tricep kickback", "Cable Tricep Kickbacks"),
            ("cable pushdowns", "Cable Tricep Pushdowns"),
            ("cable triceps pushdown", "Cable Tricep Pushdowns"),
            ("triceps cable push down", "Cable Tricep Pushdowns"),
            ("triceps pushdown", "Cable Tricep Pushdowns"),
            ("ez skull crusher", "EZ Bar Skull Crushers"),
            ("ez skull crushers", "EZ Bar Skull Crushers"),
            ("over head cable tricep extensions", "Overhead Cable Tricep Extension"),
            ("overhead cable extensions", "Overhead Cable Tricep Extension"),
            ("overhead cable triceps extensions", "Overhead Cable Tricep Extension"),
            ("overhead cable extension", "Overhead Cable Tricep Extension"),
            ("overhead extension cable", "Overhead Cable Tricep Extension"),
            ("overhead triceps extensions", "Overhead Cable Tricep Extension"),
            ("triceps dips", "Weighted Triceps Dips"),
            ("weighted dips", "Weighted Triceps Dips"),
            ("weighted triceps dips", "Weighted Triceps Dips"),
            // Shoulders
            ("cable lateral raises", "Cable Lateral Raises"),
            ("db lateral raises", "Dumbbell Lateral Raises"),
            ("incline db lateral raises", "Incline DB Lateral Raises"),
            ("face pulls", "Face Pulls"),
            ("incline db reverse flys", "Incline Dumbbell Reverse Fly"),
            ("incline reverse db flies", "Incline Dumbbell Reverse Fly"),
            ("seated db reverse flys", "Seated Dumbbell Reverse Fly"),
            ("seated reverse flys", "Seated Dumbbell Reverse Fly"),
            // Chest machines
            ("chest pec dec", "Chest Pec Deck"),
            ("reverse pec dec", "Reverse Pec Deck"),
            ("single arm reverse pec dec", "1-Arm Reverse Pec Deck"),
            ("stright arm cable pull over", "Straight-Arm Cable Pullover"),
            // Back
            ("lat pulldown", "Lat Pulldown"),
            ("pull-ups", "Weighted Pull-Ups"),
            ("pullups", "Weighted Pull-Ups"),
            ("weighted pull-ups", "Weighted Pull-Ups"),
            ("weighted chinups", "Weighted Chin-Ups"),
            ("chinups", "Weighted Chin-Ups"),
            ("dead hang", "Dead Hangs"),
            // Legs
            ("leg extension", "Leg Extension"),
            ("seated leg extension", "Leg Extension"),
            ("leg press", "Leg Press"),
            ("lying hamstring curls", "Lying Hamstring Curls"),
            ("seated calf raises", "Seated Calf Raises"),
            ("seated calf raise", "Seated Calf Raises"),
            ("standing calf raises", "Standing Calf Raises"),
            ("leg compression lifts", "Leg Compression Lifts"),
            // Core
            ("cable crunches", "Cable Crunches"),
            ("declined crunches", "Decline Crunches"),
            ("elbow supported leg raises", "Elbow-Supported Leg Raises"),
            ("elbow supported leg rises", "Elbow-Supported Leg Raises"),
            ("hanging knee raises", "Hanging Knee Raises"),
            ("hanging knee rises", "Hanging Knee Raises"),
            ("hanging kneeraises", "Hanging Knee Raises"),
            ("hanging leg rises", "Hanging Leg Raises"),
            ("l sit", "L-Sit"),
            ("plank", "Plank"),
            ("side planks", "Side Plank"),
            // Bodyweight and carries
            ("push ups", "Push-Ups"),
            ("finger push ups", "Finger Push-Ups"),
            ("farmer carry db", "Farmer Carry"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_known_names() {
        let table = default_synonyms();
        assert_eq!(table.canonicalize("Barbell Squats"), "Barbell Back Squats");
        assert_eq!(table.canonicalize("bench press"), "Barbell Bench Press");
        assert_eq!(table.canonicalize("  Seated   Row "), "Seated Cable Rows");
    }

    #[test]
    fn test_unmapped_name_passes_through() {
        let table = default_synonyms();
        assert_eq!(table.canonicalize("Zercher Squats"), "Zercher Squats");
        assert_eq!(table.canonicalize("  odd   Spacing "), "  odd   Spacing ");
        assert_eq!(table.canonicalize(""), "");
    }

    #[test]
    fn test_custom_table_replaces_builtin() {
        let table = SynonymTable::from_pairs([("Zercher  Squats", "Zercher Squat")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.canonicalize("zercher squats"), "Zercher Squat");
        assert_eq!(table.canonicalize("bench press"), "bench press");
    }

    #[test]
    fn test_extend_overrides() {
        let extra = SynonymTable::from_pairs([("bench press", "Flat Bench")]);
        let merged = default_synonyms().extend(&extra);
        assert_eq!(merged.canonicalize("Bench Press"), "Flat Bench");
        assert_eq!(merged.canonicalize("deadlift"), "Deadlifts");
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("synonyms.toml");
        std::fs::write(
            &path,
            r#"
[synonyms]
"zercher squats" = "Zercher Squats"
"ssb squats" = "Safety Bar Squats"
"#,
        )
        .unwrap();

        let table = SynonymTable::load_from(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.canonicalize("SSB Squats"), "Safety Bar Squats");
    }

    #[test]
    fn test_load_rejects_empty_canonical() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("synonyms.toml");
        std::fs::write(&path, "[synonyms]\n\"x\" = \"\"\n").unwrap();

        assert!(SynonymTable::load_from(&path).is_err());
    }
}
