// Error types for fetching and parsing stat exports.
//
// Rows rejected by the validator and zero-game divisions in the metric
// deriver are expected behavior and never surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain the raw text of a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{resource} returned HTTP {status}")]
    Status { resource: String, status: u16 },

    #[error("request for {resource} failed: {source}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Structurally malformed CSV. `line` is 1-based within the normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed CSV at line {line}: {message}")]
pub struct ParseError {
    pub line: u64,
    pub message: String,
}

/// Anything that prevents a selection from producing a record set.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to parse {resource}: {source}")]
    Parse {
        resource: String,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// Short label for the status line ("fetch" / "parse").
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Fetch(_) => "fetch",
            LoadError::Parse { .. } => "parse",
        }
    }
}
