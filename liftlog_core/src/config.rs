//! Configuration file support for Liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::classify::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::normalize::{default_synonyms, SynonymTable};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub parser: ParserConfig,

    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// Combined parsed sets, one row per set
    pub fn raw_sets_path(&self) -> PathBuf {
        self.data_dir.join("processed").join("workouts_raw_sets.csv")
    }

    /// Per-day, per-exercise summary
    pub fn daily_summary_path(&self) -> PathBuf {
        self.data_dir
            .join("processed")
            .join("workouts_daily_exercise.csv")
    }

    /// Lines waiting for a human label
    pub fn review_queue_path(&self) -> PathBuf {
        self.data_dir.join("labels").join("to_review.csv")
    }

    /// Labelled lines used by the lookup classifier
    pub fn training_labels_path(&self) -> PathBuf {
        self.data_dir.join("labels").join("lines_for_training.csv")
    }
}

/// Parser tuning
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

/// Exercise name normalization
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct NormalizerConfig {
    /// TOML file with extra `[synonyms]`, layered over the built-in table
    #[serde(default)]
    pub synonyms_path: Option<PathBuf>,
}

impl NormalizerConfig {
    /// Built-in synonyms, plus the user's file if one is configured
    pub fn synonym_table(&self) -> Result<SynonymTable> {
        match &self.synonyms_path {
            Some(path) => Ok(default_synonyms().extend(&SynonymTable::load_from(path)?)),
            None => Ok(default_synonyms().clone()),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("liftlog")
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.parser.confidence_threshold)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("liftlog").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

/// A confidence threshold must lie in `[0, 1]`
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "confidence_threshold must be between 0 and 1, got {}",
            threshold
        )))
    }
}
