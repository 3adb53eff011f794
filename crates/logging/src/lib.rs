//! Dropcraft Logging
//!
//! Shared tracing-subscriber setup for the dropcraft binaries.
//!
//! All log output goes to **stderr**: stdout carries manifest JSON and
//! Merkle roots for piping into other tools, and logs must never mix into
//! it. `RUST_LOG` overrides the level chosen here.

use tracing_subscriber::EnvFilter;

/// Log level for the application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors (default)
    #[default]
    Info,
    /// Debug messages and above
    Debug,
}

impl LogLevel {
    /// Map the usual `-v/--verbose` CLI flag onto a level.
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Self::Debug
        } else {
            Self::Info
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// Initialize logging once at process start.
///
/// # Panics
///
/// Panics if a global subscriber is already set; use `try_init` to handle
/// that case.
pub fn init(level: LogLevel) {
    try_init(level).expect("failed to initialize logging");
}

/// Try to initialize logging, reporting an error if already initialized.
pub fn try_init(level: LogLevel) -> Result<(), String> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| e.to_string())
}
