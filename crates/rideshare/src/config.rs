//! Runtime configuration.
//!
//! Defaults work out of the box. A TOML file named by `RIDESHARE_CONFIG`
//! replaces them field by field, and environment variables override both:
//!
//! ```toml
//! database_path = "/var/lib/rideshare/app.db"
//! channel_capacity = 64
//!
//! [hash_cost]
//! memory_kib = 19456
//! iterations = 2
//! ```
//!
//! | Variable | Field |
//! |---|---|
//! | `RIDESHARE_CONFIG` | (file to load) |
//! | `RIDESHARE_DATABASE` | `database_path` |
//! | `RIDESHARE_HASH_MEMORY_KIB` | `hash_cost.memory_kib` |
//! | `RIDESHARE_PROCESSOR_TIMEOUT_MS` | `processor_timeout_ms` |

use crate::account::HashCost;
use crate::location_actor::DEFAULT_PRICE_PER_MILE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE_ENV: &str = "RIDESHARE_CONFIG";
pub const DATABASE_ENV: &str = "RIDESHARE_DATABASE";
pub const HASH_MEMORY_ENV: &str = "RIDESHARE_HASH_MEMORY_KIB";
pub const PROCESSOR_TIMEOUT_ENV: &str = "RIDESHARE_PROCESSOR_TIMEOUT_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("Failed to read config file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RideshareConfig {
    pub database_path: PathBuf,
    pub hash_cost: HashCost,
    /// Request buffer of each registry actor.
    pub channel_capacity: usize,
    /// `None` lets processor calls run without a deadline.
    pub processor_timeout_ms: Option<u64>,
    pub default_price_per_mile: f64,
}

impl Default for RideshareConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./data/app.db"),
            hash_cost: HashCost::default(),
            channel_capacity: 32,
            processor_timeout_ms: Some(5_000),
            default_price_per_mile: DEFAULT_PRICE_PER_MILE,
        }
    }
}

fn parse_number<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

impl RideshareConfig {
    /// The file named by `RIDESHARE_CONFIG` (if any), then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`RideshareConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = match lookup(CONFIG_FILE_ENV) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        base.with_overrides(lookup)
    }

    /// Reads a TOML file. Missing fields keep their defaults; a missing file
    /// is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Applies the environment overrides. Unset variables leave the field alone.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = lookup(DATABASE_ENV) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(HASH_MEMORY_ENV) {
            self.hash_cost.memory_kib = parse_number(HASH_MEMORY_ENV, value)?;
        }
        if let Some(value) = lookup(PROCESSOR_TIMEOUT_ENV) {
            self.processor_timeout_ms = Some(parse_number(PROCESSOR_TIMEOUT_ENV, value)?);
        }
        Ok(self)
    }

    pub fn processor_timeout(&self) -> Option<Duration> {
        self.processor_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = RideshareConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RideshareConfig::default());
        assert_eq!(config.database_path, PathBuf::from("./data/app.db"));
        assert_eq!(config.hash_cost.memory_kib, 4096);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = RideshareConfig::from_lookup(lookup(&[
            (DATABASE_ENV, "/tmp/rides.db"),
            (HASH_MEMORY_ENV, "65536"),
            (PROCESSOR_TIMEOUT_ENV, "250"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/rides.db"));
        assert_eq!(config.hash_cost.memory_kib, 65536);
        assert_eq!(config.processor_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn file_values_sit_between_defaults_and_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rideshare.toml");
        std::fs::write(
            &path,
            "database_path = \"/srv/rides.db\"\n\
             channel_capacity = 64\n\
             [hash_cost]\n\
             memory_kib = 19456\n",
        )
        .unwrap();
        let path_str = path.to_string_lossy().into_owned();

        let config = RideshareConfig::from_lookup(lookup(&[
            (CONFIG_FILE_ENV, path_str.as_str()),
            (DATABASE_ENV, "/tmp/override.db"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/override.db"));
        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.hash_cost.memory_kib, 19456);
        // Unlisted fields keep their defaults.
        assert_eq!(config.hash_cost.iterations, 3);
        assert_eq!(config.processor_timeout_ms, Some(5_000));
    }

    #[test]
    fn unreadable_or_malformed_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            RideshareConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "channel_capacity = \"many\"").unwrap();
        assert!(matches!(
            RideshareConfig::load(&broken),
            Err(ConfigError::Parse { path, .. }) if path == broken
        ));
    }

    #[test]
    fn malformed_numbers_are_reported() {
        let err = RideshareConfig::from_lookup(lookup(&[(HASH_MEMORY_ENV, "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: HASH_MEMORY_ENV,
                value: "lots".into()
            }
        );
    }
}
