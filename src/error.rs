//! Error handling for the badger-stats library.
//!
//! Every fallible library call returns [`Result`], whose error is the
//! [`StatsError`] enum. The variants split into two groups:
//!
//! - [`StatsError::CacheMiss`] is recoverable. A cache file was absent or
//!   could not be read, and the caller is expected to rebuild from the next
//!   source down (enriched cache -> raw cache -> network).
//! - Every other variant is fatal for the operation that produced it.
//!
//! ```
//! use badger_stats::error::StatsError;
//!
//! fn describe(err: &StatsError) -> &'static str {
//!     if err.is_cache_miss() { "rebuild" } else { "abort" }
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! [`ResultExt`] adds `.context()` to any result whose error converts into
//! [`StatsError`]:
//!
//! ```no_run
//! use badger_stats::error::ResultExt as _;
//!
//! fn read_doc() -> badger_stats::error::Result<String> {
//!     std::fs::read_to_string("data.json").context("Failed to read raw cache")
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

/// Main error type for badger-stats operations.
#[derive(Debug)]
pub enum StatsError {
    /// A cache file could not be used; the caller should fall back.
    CacheMiss { path: PathBuf, reason: String },

    /// Network fetch of the source document failed
    Fetch(String),

    /// I/O errors (cache writes, console)
    Io(std::io::Error),

    /// The source document or a config file is not the JSON we expect
    Json(String),

    /// Polars errors while building, persisting or querying frames
    DataProcessing(String),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl StatsError {
    pub fn cache_miss(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::CacheMiss {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True when the error only means "try the next source".
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheMiss { .. })
    }
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CacheMiss { path, reason } => {
                write!(f, "Cache miss for {}: {reason}", path.display())
            }
            Self::Fetch(msg) => write!(f, "Fetch error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StatsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for StatsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for StatsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

impl From<polars::error::PolarsError> for StatsError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for badger-stats operations.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<StatsError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(msg.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(f(), e.into()))
    }
}

// A cache miss keeps its kind so fallbacks still fire after context is added.
fn wrap(msg: String, err: StatsError) -> StatsError {
    match err {
        StatsError::CacheMiss { path, reason } => StatsError::CacheMiss {
            path,
            reason: format!("{msg}: {reason}"),
        },
        other => StatsError::Other(format!("{msg}: {other}")),
    }
}
