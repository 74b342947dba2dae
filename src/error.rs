// src/error.rs
// =============================================================================
// Error types for the md-links library.
//
// Two kinds of failure exist and they are kept apart on purpose:
// - MdLinksError: stops the whole run (missing file, wrong file type, empty
//   file, no links at all)
// - ProbeError: one link could not be reached. This never stops the run, it
//   is turned into the `error` field of that link's record instead.
//
// Rust concepts:
// - thiserror: Derives std::error::Error and Display from attributes
// - #[source]: Keeps the underlying cause available for error chains
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a run before any result is produced.
#[derive(Debug, Error)]
pub enum MdLinksError {
    #[error("File/directory not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Incompatible file: not a Markdown file: {}", path.display())]
    IncompatibleFileType { path: PathBuf },

    #[error("Unable to read the file because it is empty: {}", path.display())]
    EmptyFile { path: PathBuf },

    #[error("No links found in this file: {file}")]
    NoLinksFound { file: String },

    /// Any other I/O failure while reading the document
    /// (permissions, invalid UTF-8, ...)
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, MdLinksError>;

/// Why a single probe failed at the transport level.
///
/// The Display string is what ends up in `LinkRecord::error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("Request timed out")]
    Timeout,

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Could not resolve hostname")]
    Dns,

    #[error("SSL certificate error")]
    Tls,

    #[error("Connection failed")]
    Connect,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Anything else, with the transport's own message
    #[error("{0}")]
    Other(String),
}
