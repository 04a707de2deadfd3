//! Configuration types and CLI options.
//!
//! This module defines the library configuration (`Config`), the logging
//! enums, and the command-line options that are converted into a `Config`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{MAX_REDIRECT_HOPS, SOCKET_TIMEOUT_SECS, USER_AGENTS};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Client configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use pinoader::Config;
///
/// let config = Config {
///     max_redirects: 8,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Connect/read/write timeout for every socket, in seconds
    pub timeout_seconds: u64,

    /// Request/response cycles a fetch may spend following redirects
    pub max_redirects: usize,

    /// User-Agent pool; one entry is picked at random per request
    pub user_agents: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_seconds: SOCKET_TIMEOUT_SECS,
            max_redirects: MAX_REDIRECT_HOPS,
            user_agents: USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

/// A configuration field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what is accepted instead
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigValidationError {}

impl Config {
    /// Socket timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Checks that every field holds a usable value.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError {
                field: "timeout_seconds",
                message: "must be greater than 0 (a zero timeout would block forever)".into(),
            });
        }
        if self.max_redirects == 0 {
            return Err(ConfigValidationError {
                field: "max_redirects",
                message: "must be greater than 0 to allow at least one request".into(),
            });
        }
        if self.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(ConfigValidationError {
                field: "user_agents",
                message: "must contain at least one non-empty User-Agent string".into(),
            });
        }
        Ok(())
    }
}

/// Command-line options for the `pinoader` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pinoader",
    version,
    about = "A utility for downloading videos from Pinterest.",
    after_help = "EXAMPLES:\n  pinoader https://pin.it/example\n  pinoader https://pin.it/example -o my_video.mp4\n  pinoader https://pin.it/example -t --debug"
)]
pub struct Opt {
    /// Pinterest pin URL (short pin.it links are followed)
    pub url: String,

    /// Set a custom filename for the video. If not specified, the name is generated from the pin ID.
    #[arg(short, long, value_name = "FILENAME")]
    pub output: Option<PathBuf>,

    /// Download the thumbnail (cover image) too, saved next to the video with a .jpg extension.
    #[arg(short, long)]
    pub thumbnail: bool,

    /// Enable debug mode with verbose output.
    #[arg(long, conflicts_with = "clear")]
    pub debug: bool,

    /// Silent mode, shows only errors.
    #[arg(long)]
    pub clear: bool,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Socket timeout in seconds
    #[arg(long, default_value_t = SOCKET_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum number of request cycles spent following redirects
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS)]
    pub max_redirects: usize,
}

impl Opt {
    /// Level implied by `--debug` / `--clear`.
    pub fn log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else if self.clear {
            LogLevel::Error
        } else {
            LogLevel::Info
        }
    }

    /// Library configuration derived from the CLI flags.
    pub fn client_config(&self) -> Config {
        Config {
            timeout_seconds: self.timeout,
            max_redirects: self.max_redirects,
            ..Default::default()
        }
    }
}
