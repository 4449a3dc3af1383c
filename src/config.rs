//! Tool configuration.
//!
//! Handles loading, validating, and merging `pixfit.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! Passed explicitly with `--config <FILE>`, otherwise `pixfit.toml` in the
//! working directory is used when it exists.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! quality = 0.9                # Encoder quality for lossy resizes (0.0-1.0)
//! maintain_aspect_ratio = true # Lock width/height to the original ratio
//!
//! [compress]
//! iterations = 7               # Quality search steps (1-32), one encode each
//! unit = "KB"                  # Default unit for --target (KB or MB)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{ProcessSettings, Quality};
use crate::types::SizeUnit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "pixfit.toml";

/// Upper bound for `compress.iterations`.
pub const MAX_ITERATIONS: u32 = 32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Plain resize settings.
    pub resize: ResizeConfig,
    /// Target-size compression settings.
    pub compress: CompressConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.resize.quality) {
            return Err(ConfigError::Validation(
                "resize.quality must be between 0.0 and 1.0".into(),
            ));
        }
        if self.compress.iterations == 0 || self.compress.iterations > MAX_ITERATIONS {
            return Err(ConfigError::Validation(format!(
                "compress.iterations must be 1-{MAX_ITERATIONS}"
            )));
        }
        Ok(())
    }

    pub fn process_settings(&self) -> ProcessSettings {
        ProcessSettings {
            resize_quality: Quality::new(self.resize.quality),
            iterations: self.compress.iterations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Encoder quality for lossy formats (PNG is always written losslessly).
    pub quality: f32,
    /// Initial state of the aspect-ratio lock.
    pub maintain_aspect_ratio: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            quality: 0.9,
            maintain_aspect_ratio: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressConfig {
    /// Bisection steps; each costs one encode.
    pub iterations: u32,
    /// Unit applied to a bare `--target` number.
    pub unit: SizeUnit,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            iterations: crate::search::DEFAULT_ITERATIONS,
            unit: SizeUnit::Kb,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// An explicit path must exist. Without one, `pixfit.toml` in `dir` is used
/// if present and stock defaults otherwise.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config, ConfigError> {
    let overlay = match explicit {
        Some(path) => Some(load_raw_config(path)?),
        None => {
            let candidate = dir.join(DEFAULT_CONFIG_FILE);
            if candidate.exists() {
                log::debug!("using config {}", candidate.display());
                Some(load_raw_config(&candidate)?)
            } else {
                None
            }
        }
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `pixfit.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r#"# pixfit configuration
# =====================
# Every key is optional; missing keys keep the defaults shown here.

[resize]
# Encoder quality for lossy resizes, 0.0 (smallest) to 1.0 (best).
# PNG output is lossless and ignores this.
quality = 0.9
# Keep width and height locked to the original aspect ratio.
maintain_aspect_ratio = true

[compress]
# Quality search steps for --target. Each step is one full encode;
# 7 steps resolve quality to 1/128.
iterations = 7
# Unit for a bare --target number: "KB" or "MB" (1 KB = 1024 bytes).
unit = "KB"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.resize.quality, 0.9);
        assert!(config.resize.maintain_aspect_ratio);
        assert_eq!(config.compress.iterations, 7);
        assert_eq!(config.compress.unit, SizeUnit::Kb);
    }

    #[test]
    fn parse_partial_config() {
        let config: Config = toml::from_str("[compress]\niterations = 12\n").unwrap();
        assert_eq!(config.compress.iterations, 12);
        assert_eq!(config.compress.unit, SizeUnit::Kb);
        assert_eq!(config.resize.quality, 0.9);
    }

    #[test]
    fn parse_unit_names() {
        let config: Config = toml::from_str("[compress]\nunit = \"MB\"\n").unwrap();
        assert_eq!(config.compress.unit, SizeUnit::Mb);
    }

    #[test]
    fn process_settings_follow_config() {
        let mut config = Config::default();
        config.resize.quality = 0.75;
        config.compress.iterations = 9;
        let settings = config.process_settings();
        assert_eq!(settings.resize_quality.value(), 0.75);
        assert_eq!(settings.iterations, 9);
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_config_reads_default_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(DEFAULT_CONFIG_FILE),
            "[resize]\nquality = 0.5\n",
        )
        .unwrap();

        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config.resize.quality, 0.5);
        assert_eq!(config.compress.iterations, 7);
    }

    #[test]
    fn load_config_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[resize]\nmaintain_aspect_ratio = false\n").unwrap();

        let config = load_config(Some(path.as_path()), Path::new("/nonexistent")).unwrap();
        assert!(!config.resize.maintain_aspect_ratio);
    }

    #[test]
    fn load_config_missing_explicit_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(tmp.path().join("nope.toml").as_path()), tmp.path());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(DEFAULT_CONFIG_FILE), "this is not toml [[[").unwrap();
        assert!(load_config(None, tmp.path()).is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(DEFAULT_CONFIG_FILE),
            "[compress]\niteratons = 9\n",
        )
        .unwrap();
        assert!(load_config(None, tmp.path()).is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_quality_bounds() {
        let mut config = Config::default();
        config.resize.quality = 1.0;
        assert!(config.validate().is_ok());
        config.resize.quality = 0.0;
        assert!(config.validate().is_ok());
        config.resize.quality = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("quality"));
    }

    #[test]
    fn validate_iterations_bounds() {
        let mut config = Config::default();
        config.compress.iterations = 0;
        assert!(config.validate().is_err());
        config.compress.iterations = MAX_ITERATIONS + 1;
        assert!(config.validate().is_err());
        config.compress.iterations = MAX_ITERATIONS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(DEFAULT_CONFIG_FILE), "[resize]\nquality = 2.0\n").unwrap();
        let result = load_config(None, tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(1));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[compress]\niterations = 3").unwrap();
        let merged = merge_toml(base, overlay);
        let compress = merged.get("compress").unwrap();
        assert_eq!(compress.get("iterations").unwrap().as_integer(), Some(3));
        assert_eq!(compress.get("unit").unwrap().as_str(), Some("KB"));
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: Config = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        assert!(value.get("resize").is_some());
        assert!(value.get("compress").is_some());
    }
}
