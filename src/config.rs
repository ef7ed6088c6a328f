use crate::error::{Error, Result};
use crate::linear_model::LogisticRegression;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings for one run of the pipeline.
///
/// Loaded from an optional TOML file; any key left out keeps its default.
///
/// ```toml
/// data_path = "data/auto.csv"
/// seed = 7
/// c = 0.5
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_path: PathBuf,
    pub train_fraction: f64,
    /// Fixed seed for the shuffle. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub head_rows: usize,
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    /// Inverse L2 regularization strength.
    pub c: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("auto.csv"),
            train_fraction: 0.70,
            seed: None,
            head_rows: 5,
            learning_rate: 0.5,
            max_iterations: 5000,
            tolerance: 1e-6,
            c: 1.0,
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(Error::Config(format!(
                "train_fraction must be between 0 and 1, got {}",
                self.train_fraction
            )));
        }
        if !(self.learning_rate > 0.0) {
            return Err(Error::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be at least 1".to_string()));
        }
        if !(self.tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        if !(self.c > 0.0) {
            return Err(Error::Config(format!("c must be positive, got {}", self.c)));
        }
        Ok(())
    }

    /// Unfitted binary model carrying this configuration's solver settings.
    pub fn estimator(&self) -> LogisticRegression {
        LogisticRegression::new()
            .learning_rate(self.learning_rate)
            .max_iterations(self.max_iterations)
            .tolerance(self.tolerance)
            .c(self.c)
    }
}
