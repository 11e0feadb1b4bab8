use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::chart::spec::Mark;
use crate::data::loader::HttpSettings;

pub const DEFAULT_SOURCE: &str =
    "https://github.com/byuidatascience/data4python4ds/raw/master/data-raw/diamonds/diamonds.csv";

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything a run needs. Every field has a default, so an empty JSON
/// object (or no file at all) reproduces the stock chart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// URL or local path of the CSV.
    pub source: String,
    /// Numeric column used for both the filter and the x axis.
    pub column: String,
    /// Rows with `column <= threshold` are kept.
    pub threshold: f64,
    /// PNG destination, overwritten on every run.
    pub output: PathBuf,
    /// Optional destination for the chart description as JSON.
    pub spec_output: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub mark: Mark,
    pub title: Option<String>,
    /// TrueType font for labels; system fonts are tried when unset.
    pub font: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            column: "carat".to_string(),
            threshold: 2.5,
            output: PathBuf::from("markdown/diamonds_25.png"),
            spec_output: None,
            width: 800,
            height: 600,
            mark: Mark::Line,
            title: None,
            font: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("threshold must be a finite number, got {0}")]
    NonFiniteThreshold(f64),

    #[error("image size must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("column name must not be empty")]
    EmptyColumn,

    #[error("output {0} must have a .png extension")]
    UnsupportedOutput(PathBuf),
}

impl Config {
    /// Defaults when `path` is `None`, otherwise the JSON file overlaid on
    /// the defaults. The result is validated either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            None => Config::default(),
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::NonFiniteThreshold(self.threshold));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if self.column.trim().is_empty() {
            return Err(ConfigError::EmptyColumn);
        }
        let is_png = self
            .output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if !is_png {
            return Err(ConfigError::UnsupportedOutput(self.output.clone()));
        }
        Ok(())
    }

    pub fn http(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            ..HttpSettings::default()
        }
    }
}
