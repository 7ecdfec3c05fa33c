//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `loadshift.toml` in the working directory, or at the path in
//! `LOADSHIFT_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use chrono::TimeDelta;
use loadshift_domain::time::{TimeDensity, parse_duration};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "loadshift.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Densities and limits of the scheduling run.
    pub scheduling: SchedulingConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Scheduling settings as written in the file, `HH:MM:SS` durations as text.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Width of one scheduling time point.
    pub time_density: String,
    /// Width of one time point of the coarse first-pass stage.
    pub abstract_time_density: String,
    /// How far ahead a device may be moved when rescheduling.
    pub rescheduling_window: String,
    /// Upper bound on the joint candidate space.
    pub max_candidates: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Validated scheduling settings handed to the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduling {
    pub time_density: TimeDensity,
    pub abstract_time_density: TimeDensity,
    pub rescheduling_window: TimeDelta,
    pub max_candidates: usize,
}

impl Config {
    /// Load configuration from `loadshift.toml` (or `LOADSHIFT_CONFIG`) if
    /// present, then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting settings are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("LOADSHIFT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("LOADSHIFT_TIME_DENSITY") {
            self.scheduling.time_density = val;
        }
        if let Some(val) = lookup("LOADSHIFT_ABSTRACT_TIME_DENSITY") {
            self.scheduling.abstract_time_density = val;
        }
        if let Some(val) = lookup("LOADSHIFT_RESCHEDULING_WINDOW") {
            self.scheduling.rescheduling_window = val;
        }
        if let Some(val) = lookup("LOADSHIFT_MAX_CANDIDATES") {
            if let Ok(max) = val.parse() {
                self.scheduling.max_candidates = max;
            }
        }
        if let Some(val) = lookup("LOADSHIFT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.scheduling().map(|_| ())
    }

    /// Parse the scheduling settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when a density does not parse or
    /// does not divide a day, the window does not parse, or the candidate
    /// limit is zero.
    pub fn scheduling(&self) -> Result<Scheduling, ConfigError> {
        let raw = &self.scheduling;
        let time_density = parse_setting("time_density", &raw.time_density, str::parse::<TimeDensity>)?;
        let abstract_time_density = parse_setting(
            "abstract_time_density",
            &raw.abstract_time_density,
            str::parse::<TimeDensity>,
        )?;
        let rescheduling_window =
            parse_setting("rescheduling_window", &raw.rescheduling_window, parse_duration)?;
        if raw.max_candidates == 0 {
            return Err(ConfigError::Validation(
                "max_candidates must be non-zero".to_string(),
            ));
        }
        Ok(Scheduling {
            time_density,
            abstract_time_density,
            rescheduling_window,
            max_candidates: raw.max_candidates,
        })
    }
}

fn parse_setting<T, E: std::fmt::Display>(
    name: &str,
    value: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    parse(value).map_err(|err| ConfigError::Validation(format!("{name} = {value:?}: {err}")))
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            time_density: "00:15:00".to_string(),
            abstract_time_density: "01:00:00".to_string(),
            rescheduling_window: "06:00:00".to_string(),
            max_candidates: 1_000_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "loadshift=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
