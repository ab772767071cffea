//! Error types for content loading and rendering

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or rendering site content
#[derive(Debug, Error)]
pub enum SiteError {
    /// A collection file could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A collection file is not valid JSON for its schema
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A referenced body file does not exist
    #[error("content file not found: {0}")]
    BodyMissing(String),

    /// A request or content path tried to leave the site root
    #[error("path escapes site root: {0}")]
    InvalidPath(String),

    /// An activity date could not be interpreted
    #[error("invalid Thai date: {0}")]
    InvalidDate(String),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

pub type SiteResult<T> = std::result::Result<T, SiteError>;
