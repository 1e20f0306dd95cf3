//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_COLLECTION, DEFAULT_DATABASE, DEFAULT_RECORD_COUNT, DEFAULT_URI, ENV_PASSWORD,
    ENV_URI, ENV_USERNAME, MEMORY_SCHEME, MONGODB_SCHEMES,
};
use crate::error_handling::ConfigError;
use crate::storage::Credentials;

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

/// How retrieved records are written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table with a header row (default)
    Table,
    /// One JSON object per line
    Jsonl,
}

/// Demo configuration.
///
/// Parsed from the command line by the binary; library callers can build it
/// directly and fill the rest from `Default`.
///
/// # Examples
///
/// ```no_run
/// use bullet_trains::Config;
///
/// let config = Config {
///     uri: "memory://".to_string(),
///     count: 3,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bullet_trains",
    version,
    about = "Writes synthetic bullet train telemetry to MongoDB and prints the collection as a table"
)]
pub struct Config {
    /// MongoDB connect string (use `memory://` for an in-process store)
    #[arg(long, env = ENV_URI, default_value = DEFAULT_URI)]
    pub uri: String,

    /// MongoDB username
    #[arg(short = 'u', long, env = ENV_USERNAME)]
    pub username: Option<String>,

    /// MongoDB password
    #[arg(short = 'p', long, env = ENV_PASSWORD, hide_env_values = true)]
    pub password: Option<String>,

    /// Database to connect to
    #[arg(long, default_value = DEFAULT_DATABASE)]
    pub db: String,

    /// Collection to interact with
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Number of fake documents to generate
    #[arg(long, default_value_t = DEFAULT_RECORD_COUNT)]
    pub count: usize,

    /// Insert all generated documents in a single batch
    #[arg(long)]
    pub batch: bool,

    /// After inserting, set `capacity` on every train sharing the first train's velocity
    #[arg(long)]
    pub set_capacity: Option<i64>,

    /// Output format for the retrieved documents
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            username: None,
            password: None,
            db: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            count: DEFAULT_RECORD_COUNT,
            batch: false,
            set_capacity: None,
            output_format: OutputFormat::Table,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Whether the configured URI points at a real deployment that needs a login.
    ///
    /// URIs without a recognizable scheme are treated as MongoDB URIs.
    pub fn requires_credentials(&self) -> bool {
        match uri_scheme(&self.uri) {
            Some(scheme) if scheme == MEMORY_SCHEME => false,
            Some(scheme) => MONGODB_SCHEMES.contains(&scheme),
            None => true,
        }
    }

    /// Returns the credentials to authenticate with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` when the URI requires a login and
    /// either the username or the password is missing or empty.
    pub fn credentials(&self) -> Result<Option<Credentials>, ConfigError> {
        let username = self.username.as_deref().filter(|u| !u.is_empty());
        let password = self.password.as_deref().filter(|p| !p.is_empty());
        match (username, password) {
            (Some(username), Some(password)) => Ok(Some(Credentials::new(username, password))),
            _ if self.requires_credentials() => Err(ConfigError::MissingCredentials),
            _ => Ok(None),
        }
    }
}

/// Returns the scheme part of a connection URI (`mongodb` for `mongodb://host`).
pub fn uri_scheme(uri: &str) -> Option<&str> {
    uri.split_once("://").map(|(scheme, _)| scheme)
}
