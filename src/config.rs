//! Configuration file support for the dashboard
//!
//! Reads `launch-dash.toml` from the working directory, or the file given
//! with `--config`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "launch-dash.toml";

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DashConfig {
    /// Window title
    #[serde(default = "default_title")]
    pub title: String,

    /// Launch sites offered in the dropdown even before data is loaded.
    /// Sites found in the data but missing here are appended after these.
    #[serde(default = "default_sites")]
    pub sites: Vec<String>,

    /// Payload slider settings
    #[serde(default)]
    pub payload: PayloadSliderConfig,
}

/// Payload range slider domain and step, in kilograms
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PayloadSliderConfig {
    #[serde(default)]
    pub min: f64,

    #[serde(default = "default_slider_max")]
    pub max: f64,

    #[serde(default = "default_slider_step")]
    pub step: f64,
}

fn default_title() -> String {
    "SpaceX Launch Records Dashboard".to_string()
}

fn default_sites() -> Vec<String> {
    ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_slider_max() -> f64 {
    10_000.0
}

fn default_slider_step() -> f64 {
    1000.0
}

impl Default for PayloadSliderConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: default_slider_max(),
            step: default_slider_step(),
        }
    }
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            sites: default_sites(),
            payload: PayloadSliderConfig::default(),
        }
    }
}

impl DashConfig {
    /// Load the configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, a
    /// `launch-dash.toml` in the working directory is used when present;
    /// if it is absent or broken the defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if !default_path.exists() {
            return Ok(Self::default());
        }
        match Self::from_file(&default_path) {
            Ok(config) => Ok(config),
            Err(e) => {
                log::warn!("Ignoring {DEFAULT_CONFIG_FILE}: {e:#}");
                Ok(Self::default())
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject slider settings the UI cannot represent.
    pub fn validate(&self) -> Result<()> {
        let p = &self.payload;
        if !(p.min.is_finite() && p.max.is_finite() && p.step.is_finite()) {
            bail!("payload slider bounds must be finite numbers");
        }
        if p.min < 0.0 || p.min >= p.max {
            bail!("payload slider needs 0 <= min < max, got {}..{}", p.min, p.max);
        }
        if p.step <= 0.0 {
            bail!("payload slider step must be positive, got {}", p.step);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = DashConfig::default();
        assert_eq!(config.sites.len(), 4);
        assert_eq!(config.sites[2], "KSC LC-39A");
        assert_eq!(config.payload.min, 0.0);
        assert_eq!(config.payload.max, 10_000.0);
        assert_eq!(config.payload.step, 1000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
title = "Launches"

[payload]
max = 16000
"#;
        let config: DashConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.title, "Launches");
        assert_eq!(config.sites, default_sites());
        assert_eq!(config.payload.max, 16_000.0);
        assert_eq!(config.payload.step, 1000.0);
    }

    #[test]
    fn test_validate_rejects_bad_slider() {
        let mut config = DashConfig::default();
        config.payload.step = 0.0;
        assert!(config.validate().is_err());

        let mut config = DashConfig::default();
        config.payload.min = 10_000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sites = [\"KSC LC-39A\"]").unwrap();
        let config = DashConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.sites, vec!["KSC LC-39A".to_string()]);
    }

    #[test]
    fn test_load_explicit_file_errors_are_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[payload]\nstep = -5").unwrap();
        assert!(DashConfig::load(Some(file.path())).is_err());

        assert!(DashConfig::load(Some(Path::new("/nonexistent/launch-dash.toml"))).is_err());
    }
}
