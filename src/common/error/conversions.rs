//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;
use crate::ooxml::opc::OpcError;

impl From<OpcError> for Error {
    fn from(err: OpcError) -> Self {
        match err {
            OpcError::Io(e) => Error::Io(e),
            other => Error::Package(other),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::CorruptedFile(other.to_string()),
        }
    }
}

impl From<crate::common::xml::XmlError> for Error {
    fn from(err: crate::common::xml::XmlError) -> Self {
        Error::XmlError(err.to_string())
    }
}
