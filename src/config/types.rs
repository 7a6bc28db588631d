//! Configuration types.
//!
//! This module defines the library configuration struct plus the enums used
//! for command-line log control.

use clap::ValueEnum;

use crate::config::constants::DEFAULT_MAX_REDIRECTS;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace). Lifecycle-event diagnostics are emitted at Debug.
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
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Immutable per-run settings for one visit. Constructed once by the caller
/// and never mutated by the visitor.
///
/// # Examples
///
/// ```no_run
/// use url_timing::Config;
///
/// let config = Config {
///     follow_redirects: true,
///     include_headers: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP request method (validated against the standard method set)
    pub method: String,

    /// Raw `"Key: Value"` header strings, applied in order
    pub headers: Vec<String>,

    /// Print response headers for the final hop
    pub include_headers: bool,

    /// Follow `Location` on redirect statuses
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow before giving up
    pub max_redirects: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            headers: Vec::new(),
            include_headers: false,
            follow_redirects: false,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_log_level_ordering() {
        // Error < Warn < Info < Debug < Trace
        let error = log::LevelFilter::from(LogLevel::Error);
        let warn = log::LevelFilter::from(LogLevel::Warn);
        let info = log::LevelFilter::from(LogLevel::Info);
        let debug = log::LevelFilter::from(LogLevel::Debug);
        let trace = log::LevelFilter::from(LogLevel::Trace);

        assert!(error < warn);
        assert!(warn < info);
        assert!(info < debug);
        assert!(debug < trace);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.method, "GET");
        assert!(config.headers.is_empty());
        assert!(!config.include_headers);
        assert!(!config.follow_redirects);
        assert_eq!(config.max_redirects, DEFAULT_MAX_REDIRECTS);
    }
}
