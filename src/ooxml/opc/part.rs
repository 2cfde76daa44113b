//! Open Packaging Convention (OPC) objects related to package parts.
//!
//! A [`Part`] is one member of the package, identified by its absolute partname.
//! Relationships may also originate from the package itself; that virtual
//! source is modelled by the [`PartRef::Root`] variant rather than by a fake part.

use crate::common::xml::{XmlError, XmlNode, XmlTree};
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use std::hash::{Hash, Hasher};
use std::io::Cursor;

/// Position of a part in archive order.
///
/// Identifiers are only meaningful within the package that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub(crate) usize);

impl PartId {
    /// Index of the part in [`Document::parts`](crate::ooxml::Document::parts).
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A member of an OPC package.
///
/// The content type is resolved once while the package is loaded and the bytes
/// are held in memory, so a `Part` never touches the archive again.
#[derive(Debug)]
pub struct Part {
    id: PartId,

    /// The partname (URI) of this part
    partname: PackURI,

    /// The resolved content type of this part
    content_type: String,

    /// The decompressed content of this part
    blob: Vec<u8>,

    /// Size of the member inside the archive
    compressed_size: u64,
}

impl Part {
    pub(crate) fn new(
        id: PartId,
        partname: PackURI,
        content_type: String,
        blob: Vec<u8>,
        compressed_size: u64,
    ) -> Self {
        Self {
            id,
            partname,
            content_type,
            blob,
            compressed_size,
        }
    }

    #[inline]
    pub fn id(&self) -> PartId {
        self.id
    }

    /// Absolute partname, e.g. `/word/document.xml`.
    #[inline]
    pub fn name(&self) -> &str {
        self.partname.as_str()
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Get the binary content of this part.
    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Get a reader over the content of this part.
    #[inline]
    pub fn stream(&self) -> Cursor<&[u8]> {
        Cursor::new(self.blob.as_slice())
    }

    /// Uncompressed size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.blob.len() as u64
    }

    /// Compressed size inside the archive.
    #[inline]
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// Parse the content of this part as XML.
    ///
    /// # Errors
    /// [`OpcError::MalformedXml`] when the content is not well-formed XML.
    pub fn xml(&self) -> Result<XmlTree> {
        XmlTree::parse(&self.blob).map_err(|e| OpcError::malformed(self.name(), e))
    }

    /// Evaluate a path expression against the XML of this part.
    ///
    /// `namespaces` binds the prefixes used in `expr` to namespace URIs, e.g.
    /// `[("cp", namespace::OPC_CORE_PROPERTIES)]`.
    pub fn xpath(&self, expr: &str, namespaces: &[(&str, &str)]) -> Result<Vec<XmlNode>> {
        self.xml()?.query(expr, namespaces).map_err(|e| match e {
            XmlError::Parse(reason) => OpcError::malformed(self.name(), reason),
            XmlError::InvalidQuery(expr) => OpcError::InvalidQuery(expr),
            XmlError::Evaluation { expr, reason } => {
                OpcError::InvalidQuery(format!("{}: {}", expr, reason))
            },
        })
    }

    /// String which uniquely identifies this part, e.g. `Part [/word/document.xml]`.
    pub fn to_reference(&self) -> String {
        format!("Part [{}]", self.name())
    }
}

impl PartialEq for Part {
    fn eq(&self, other: &Self) -> bool {
        self.partname == other.partname
    }
}

impl Eq for Part {}

impl Hash for Part {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.partname.hash(state);
    }
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Part [{}]", self.name())
    }
}

/// Name reported by the virtual root part.
pub const ROOT_PART_NAME: &str = "RootPart";

/// Either a real part or the virtual root standing in for the package itself.
#[derive(Debug, Clone, Copy)]
pub enum PartRef<'a> {
    Root,
    Part(&'a Part),
}

impl<'a> PartRef<'a> {
    /// Partname of a real part, `RootPart` for the root.
    pub fn name(&self) -> &'a str {
        match *self {
            PartRef::Root => ROOT_PART_NAME,
            PartRef::Part(part) => part.name(),
        }
    }

    pub fn content_type(&self) -> &'a str {
        match *self {
            PartRef::Root => ct::VIRTUAL_ROOT,
            PartRef::Part(part) => part.content_type(),
        }
    }

    /// Content bytes; always empty for the root.
    pub fn blob(&self) -> &'a [u8] {
        match *self {
            PartRef::Root => &[],
            PartRef::Part(part) => part.blob(),
        }
    }

    /// Parsed XML, `None` for the root which has no content to parse.
    pub fn xml(&self) -> Option<Result<XmlTree>> {
        match *self {
            PartRef::Root => None,
            PartRef::Part(part) => Some(part.xml()),
        }
    }

    /// Path query, `None` for the root.
    pub fn xpath(&self, expr: &str, namespaces: &[(&str, &str)]) -> Option<Result<Vec<XmlNode>>> {
        match *self {
            PartRef::Root => None,
            PartRef::Part(part) => Some(part.xpath(expr, namespaces)),
        }
    }

    /// The underlying part, `None` for the root.
    pub fn as_part(&self) -> Option<&'a Part> {
        match *self {
            PartRef::Root => None,
            PartRef::Part(part) => Some(part),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        matches!(self, PartRef::Root)
    }

    pub fn to_reference(&self) -> String {
        format!("Part [{}]", self.name())
    }
}

impl PartialEq for PartRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PartRef::Root, PartRef::Root) => true,
            (PartRef::Part(a), PartRef::Part(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PartRef<'_> {}
