//! Crate-level error type.

use crate::driver::DriverError;
use thiserror::Error;

/// Errors that can abort a keyword, a site run, or the whole process.
///
/// Per-field and per-interaction failures are handled (and logged) where they
/// occur and never surface here; what does surface is the class of failure
/// that makes the current unit of work unable to progress: navigation,
/// configuration, or output I/O.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("bad listing url `{url}`: {source}")]
    BadUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
