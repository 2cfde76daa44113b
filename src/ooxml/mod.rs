//! Office Open XML (OOXML) package analysis.
//!
//! This module builds a navigable model of Word (.docx), Excel (.xlsx, .xlsb)
//! and PowerPoint (.pptx) packages, including their macro-enabled and template
//! variants, without interpreting the document content itself.
//!
//! # Architecture
//!
//! The module is organized into several layers:
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, parts, content types, relationships)
//! 2. **Model**:
//!    - `document`: the [`Document`] façade and the extension table
//!    - `features`: parts grouped into images, macros, signatures, ...
//!    - `core_properties`: title, creator, dates and friends
//! 3. **Consumers**: `export` (JSON) and `extract` (media sidecar files)
//!
//! # Example
//!
//! ```rust,no_run
//! use longan::ooxml::{Document, Feature};
//!
//! let doc = Document::open("document.docx")?;
//! println!("main part: {}", doc.main_part()?.name());
//! println!("title: {}", doc.core_properties().title);
//!
//! for part in doc.feature_parts(Feature::Macros) {
//!     println!("macro part {} ({} bytes)", part.name(), part.size());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod core_properties;
pub mod document;
pub mod export;
pub mod extract;
pub mod features;
pub mod opc;

pub use core_properties::CoreProperties;
pub use document::{Document, FileType, PackageKind};
pub use export::ExportOptions;
pub use features::{Feature, Features};

// Re-export commonly used types from OPC layer
pub use opc::{LoadOptions, OpcError, OpcPackage, PackURI, Part, PartRef, Relationship};
