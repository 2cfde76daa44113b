//! Unified error types for Longan.
//!
//! Package analysis itself reports [`OpcError`](crate::ooxml::opc::OpcError);
//! this type covers the outer surfaces (export, extraction, the command line)
//! which also deal with serialization and the filesystem.
use thiserror::Error;

/// Main error type for Longan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The package could not be analyzed
    #[error(transparent)]
    Package(crate::ooxml::opc::OpcError),

    /// Corrupted or malformed archive
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for Longan operations.
pub type Result<T> = std::result::Result<T, Error>;
