//! Error types for Prism.

use thiserror::Error;

/// Result type alias using Prism's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Prism operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No registered container format scored above zero for the probed data.
    #[error("unidentified container format")]
    UnknownFormat,

    /// Malformed filter or demuxer configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error from the underlying byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Memory reservation failed while growing a table or buffer.
    #[error("allocation failed: {0}")]
    Alloc(String),

    /// Operation on a demuxer that is closed or has no header yet.
    #[error("demuxer is not streaming")]
    Closed,

    /// Registry registration or lookup failure.
    #[error("registry error: {0}")]
    Registry(String),

    /// Filter graph construction failure.
    #[error("graph error: {0}")]
    Graph(String),
}
