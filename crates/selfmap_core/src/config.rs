//! Runtime configuration for the board.
//!
//! # Responsibility
//! - Collect storage and logging settings in one validated value.
//! - Normalize user-supplied log levels.
//!
//! # Invariants
//! - `db_path = None` means local-only operation: nothing is persisted.
//! - A configured log directory is always absolute after `validate()`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_TRAIT_PREFIX: &str = "Trait";

/// Supported log verbosity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Default level for the current build mode.
    ///
    /// - `debug` builds -> `debug`
    /// - `release` builds -> `info`
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::UnsupportedLogLevel(other.to_string())),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLogLevel(String),
    RelativeLogDir(PathBuf),
    BlankTraitPrefix,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLogLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => write!(
                f,
                "log_dir must be an absolute path, got `{}`",
                path.display()
            ),
            Self::BlankTraitPrefix => write!(f, "default trait prefix must not be blank"),
        }
    }
}

impl Error for ConfigError {}

/// Settings consumed by `BoardService::bootstrap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// SQLite file backing the board. `None` runs local-only.
    pub db_path: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// Prefix of generated trait names (`"<prefix> <n>"`).
    pub default_trait_prefix: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: LogLevel::build_default(),
            log_dir: None,
            default_trait_prefix: DEFAULT_TRAIT_PREFIX.to_string(),
        }
    }
}

impl BoardConfig {
    /// Config persisting to the given database file.
    pub fn with_db(path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Checks invariants that cannot be expressed in the type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        if self.default_trait_prefix.trim().is_empty() {
            return Err(ConfigError::BlankTraitPrefix);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError, LogLevel};
    use std::path::PathBuf;

    #[test]
    fn log_level_accepts_known_values() {
        assert_eq!("INFO".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!(" warning ".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(ConfigError::UnsupportedLogLevel(_))
        ));
    }

    #[test]
    fn validate_rejects_relative_log_dir() {
        let config = BoardConfig {
            log_dir: Some(PathBuf::from("logs/dev")),
            ..BoardConfig::default()
        };
        let error = config.validate().expect_err("relative paths must be rejected");
        assert!(error.to_string().contains("absolute"));
    }

    #[test]
    fn default_config_is_local_only() {
        let config = BoardConfig::default();
        assert!(config.db_path.is_none());
        assert_eq!(config.default_trait_prefix, "Trait");
        assert!(config.validate().is_ok());
    }
}
