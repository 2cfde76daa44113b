//! Longan - A Rust library for dissecting Office Open XML packages
//!
//! This library builds a read-only object model of OOXML packages (.docx,
//! .xlsx, .pptx and their variants) for static analysis: every part with its
//! content type, the relationship graph between parts, semantic feature sets
//! and the core document properties.
//!
//! # Features
//!
//! - **Part registry**: every ZIP member as a part, with its resolved content type
//! - **Relationship graph**: internal, external and dangling targets, plus the virtual root
//! - **Feature classification**: images, media, fonts, macros, comments, embeddings, signatures
//! - **Metadata extraction**: core properties via namespace-qualified path queries
//! - **Export**: JSON reports and media sidecar dumps
//!
//! # Example
//!
//! ```no_run
//! use longan::ooxml::{Document, PartRef};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Document::open("document.docx")?;
//! println!("{} document, macros: {}", doc.kind(), doc.is_macro_enabled());
//!
//! // Package-level relationships
//! for rel in doc.relationships_out(PartRef::Root) {
//!     println!("{} -> {}", rel.reltype(), rel.target_ref());
//! }
//!
//! // Query a part's XML
//! let main = doc.main_part()?;
//! let paragraphs = main.xpath(
//!     "count(//w:p)",
//!     &[("w", "http://schemas.openxmlformats.org/wordprocessingml/2006/main")],
//! )?;
//! println!("paragraphs: {}", paragraphs[0].value);
//! # Ok(())
//! # }
//! ```

/// Common utilities: unified error, text decoding and XML queries
pub mod common;

/// OOXML (Office Open XML) package model
///
/// This module provides the package layer and the document model built on it.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use ooxml::{CoreProperties, Document, Feature, Features, PackageKind};
