/// Error types for OPC package operations
use thiserror::Error;

/// Everything that can go wrong while building or querying the package model.
///
/// All resolution variants are raised during [`Document`] construction and abort
/// the load as a whole; there is no partially built model.
///
/// [`Document`]: crate::ooxml::Document
#[derive(Error, Debug)]
pub enum OpcError {
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    #[error("File extension is not an OOXML file type: {0}")]
    UnrecognizedPackageExtension(String),

    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Part cannot be parsed as XML: {part}: {reason}")]
    MalformedXml { part: String, reason: String },

    #[error("Invalid path query '{0}'")]
    InvalidQuery(String),

    #[error("Content type not found for partname: {0}")]
    UnresolvableContentType(String),

    #[error("Relationship source is not a valid part: {source_path} (declared in {rels_part})")]
    UnresolvableRelationshipSource {
        rels_part: String,
        source_path: String,
    },

    #[error("Relationship target is not a valid part: {target_path} (declared in {rels_part})")]
    UnresolvableRelationshipTarget {
        rels_part: String,
        target_path: String,
    },

    #[error("Invalid relationship in {rels_part}: {reason}")]
    InvalidRelationship { rels_part: String, reason: String },

    #[error("More than one core properties part: {0:?}")]
    AmbiguousCoreProperties(Vec<String>),

    #[error("Package has {0} main parts defined; it should have exactly 1")]
    AmbiguousMainPart(usize),

    #[error("Package has no main part defined")]
    MissingMainPart,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for OpcError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => OpcError::Io(e),
            other => OpcError::CorruptArchive(other.to_string()),
        }
    }
}

impl OpcError {
    /// Build a [`OpcError::MalformedXml`] for `part`.
    pub(crate) fn malformed<P: Into<String>, R: std::fmt::Display>(part: P, reason: R) -> Self {
        OpcError::MalformedXml {
            part: part.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
