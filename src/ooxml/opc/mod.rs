/// Open Packaging Conventions (OPC) implementation.
///
/// This module reads the structure of Office Open XML packages:
///
/// - Physical ZIP access behind the [`PhysPkgReader`](phys_pkg::PhysPkgReader) trait
/// - Part indexing and content type resolution
/// - Relationship parsing and target resolution, including the virtual root
/// - Pack URI arithmetic
///
/// The layer is read-only; packages are never written back.
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod rel;

// Re-export commonly used types
pub use error::{OpcError, Result};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{Part, PartId, PartRef};
pub use pkgreader::LoadOptions;
pub use rel::{RelId, RelSource, RelTarget, Relationship, RelationshipGraph};
