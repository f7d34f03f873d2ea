//! Typed failures.
//!
//! Everything that can stop a run is a [`StripError`]. The binary pairs it with
//! the name of the operation that was in progress ([`Fatal`]) and handles it in
//! exactly one place.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripError {
    #[error("request to {provider} failed: {reason}")]
    Fetch {
        provider: &'static str,
        reason: String,
    },

    #[error("unexpected response from {provider}: {reason}")]
    Payload {
        provider: &'static str,
        reason: String,
    },

    #[error("no CDN ranges were returned by the providers")]
    NoRanges,

    #[error("no cache location: set HOME or pass --cache")]
    NoCacheLocation,

    #[error("cache file {}: {source}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open input {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open output {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),

    #[error("worker pool stopped abnormally: {0}")]
    Workers(String),
}

/// Reasons a range literal is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("'{0}' has no prefix length")]
    MissingPrefix(String),

    #[error("invalid address in '{0}'")]
    Address(String),

    #[error("invalid prefix length in '{0}'")]
    Prefix(String),
}

/// A [`StripError`] tagged with the operation that produced it.
#[derive(Debug, Error)]
#[error("[{}] {error}", .operation.to_uppercase())]
pub struct Fatal {
    pub operation: &'static str,
    #[source]
    pub error: StripError,
}

/// Names the operation a fallible step belongs to.
pub trait Stage<T> {
    fn during(self, operation: &'static str) -> Result<T, Fatal>;
}

impl<T, E> Stage<T> for Result<T, E>
where
    E: Into<StripError>,
{
    fn during(self, operation: &'static str) -> Result<T, Fatal> {
        self.map_err(|e| Fatal {
            operation,
            error: e.into(),
        })
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
