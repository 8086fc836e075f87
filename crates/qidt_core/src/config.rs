//! Runtime configuration resolved from environment variables.
//!
//! | Variable          | Meaning                                          | Default        |
//! |-------------------|--------------------------------------------------|----------------|
//! | `QIDT_DATA_DIR`   | Root holding `entries/` and `results/`           | `.`            |
//! | `QIDT_PASSPHRASE` | Shared passphrase for the session gate           | `qidtnote123`  |
//! | `QIDT_LOG_LEVEL`  | `trace|debug|info|warn|error`                    | build-mode     |
//! | `QIDT_LOG_DIR`    | Absolute directory for rolling logs              | logging off    |

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DATA_DIR: &str = "QIDT_DATA_DIR";
pub const ENV_PASSPHRASE: &str = "QIDT_PASSPHRASE";
pub const ENV_LOG_LEVEL: &str = "QIDT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "QIDT_LOG_DIR";

pub const DEFAULT_PASSPHRASE: &str = "qidtnote123";
pub const ENTRIES_DIR_NAME: &str = "entries";
pub const RESULTS_DIR_NAME: &str = "results";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    /// Passphrase variable is set but blank; an empty gate would admit anyone.
    BlankPassphrase,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{ENV_LOG_LEVEL}: {message}"),
            Self::BlankPassphrase => write!(f, "{ENV_PASSPHRASE} must not be blank"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub passphrase: String,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Configuration rooted at `data_dir` with default passphrase and no logging.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            passphrase: DEFAULT_PASSPHRASE.to_string(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }

    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its
    /// value. Blank values count as unset except for the passphrase.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = non_blank(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let passphrase = match lookup(ENV_PASSPHRASE) {
            Some(value) if value.trim().is_empty() => return Err(ConfigError::BlankPassphrase),
            Some(value) => value,
            None => DEFAULT_PASSPHRASE.to_string(),
        };

        let log_level = match non_blank(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            data_dir,
            passphrase,
            log_level,
            log_dir: non_blank(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    pub fn entries_dir(&self) -> PathBuf {
        self.data_dir.join(ENTRIES_DIR_NAME)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.data_dir.join(RESULTS_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.passphrase, DEFAULT_PASSPHRASE);
        assert_eq!(config.log_level, default_log_level());
        assert!(config.log_dir.is_none());
        assert_eq!(config.entries_dir(), PathBuf::from("./entries"));
    }

    #[test]
    fn values_are_read_and_level_normalized() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DATA_DIR, " /srv/qidt "),
            (ENV_PASSPHRASE, "s3cret"),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/var/log/qidt"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/qidt"));
        assert_eq!(config.results_dir(), PathBuf::from("/srv/qidt/results"));
        assert_eq!(config.passphrase, "s3cret");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/qidt")));
    }

    #[test]
    fn blank_passphrase_and_bad_level_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_PASSPHRASE, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::BlankPassphrase);

        let err = AppConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }
}
