//! Low-level, read-only API to a serialized Open Packaging Convention (OPC) package.
//!
//! This module provides the PackageReader, which indexes every archive member as a
//! [`Part`] and resolves its content type, and the parser for relationship parts.
//! Both `[Content_Types].xml` and `.rels` parts are read with quick-xml's
//! namespace-aware streaming reader.

use crate::common::encoding::decode_xml_text;
use crate::ooxml::opc::constants::{namespace, target_mode};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::ooxml::opc::part::{Part, PartId};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Serialized relationship as read from a .rels file.
///
/// Contains all relationship information in string form, before the source and
/// target are resolved to parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedRelationship {
    /// Relationship ID (e.g., "rId1")
    pub r_id: String,

    /// Relationship type URI
    pub reltype: String,

    /// Target reference (relative URI or external URL)
    pub target_ref: String,

    /// Target mode (Internal or External)
    pub target_mode: String,
}

impl SerializedRelationship {
    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target_mode == target_mode::EXTERNAL
    }

    /// Check if the target is the `NULL` placeholder of a dropped part.
    #[inline]
    pub fn is_dangling(&self) -> bool {
        !self.is_external() && self.target_ref == target_mode::NULL_TARGET
    }
}

/// Content type map for looking up content types by part name or extension.
///
/// Implements the OPC content type discovery algorithm using Default and Override elements
/// from [Content_Types].xml. When an element is declared twice the first declaration wins.
#[derive(Debug, Default)]
pub struct ContentTypeMap {
    /// Maps file extensions (case as declared) to default content types
    defaults: HashMap<String, String>,

    /// Maps specific partnames to override content types
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    /// Parse content types from [Content_Types].xml.
    ///
    /// Only `Default` and `Override` children of a `Types` root in the OPC
    /// content-types namespace are honoured.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let malformed = |reason: String| OpcError::malformed(CONTENT_TYPES_URI, reason);

        let text = decode_xml_text(xml).map_err(malformed)?;
        let mut reader = NsReader::from_str(&text);
        reader.config_mut().trim_text(true);

        let mut map = Self::default();
        let mut depth = 0usize;
        let mut in_types = false;

        loop {
            let (ns, event) = reader
                .read_resolved_event()
                .map_err(|e| malformed(e.to_string()))?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let is_ct = is_bound_to(&ns, namespace::OPC_CONTENT_TYPES);
                    match depth {
                        0 => in_types = is_ct && e.local_name().as_ref() == b"Types",
                        1 if in_types && is_ct => match e.local_name().as_ref() {
                            b"Default" => {
                                let ext = attr_value(e, b"Extension").map_err(malformed)?;
                                let ct = attr_value(e, b"ContentType").map_err(malformed)?;
                                if let (Some(ext), Some(ct)) = (ext, ct) {
                                    map.add_default(ext, ct);
                                }
                            },
                            b"Override" => {
                                let pn = attr_value(e, b"PartName").map_err(malformed)?;
                                let ct = attr_value(e, b"ContentType").map_err(malformed)?;
                                if let (Some(pn), Some(ct)) = (pn, ct) {
                                    map.add_override(pn, ct);
                                }
                            },
                            _ => {},
                        },
                        _ => {},
                    }
                    if matches!(event, Event::Start(_)) {
                        depth += 1;
                    }
                },
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(map)
    }

    /// Add a default content type mapping for a file extension.
    pub fn add_default(&mut self, extension: String, content_type: String) {
        if let Entry::Vacant(slot) = self.defaults.entry(extension) {
            slot.insert(content_type);
        }
    }

    /// Add an override content type mapping for a specific partname.
    pub fn add_override(&mut self, partname: String, content_type: String) {
        if let Entry::Vacant(slot) = self.overrides.entry(partname) {
            slot.insert(content_type);
        }
    }

    /// Get the content type for a partname.
    ///
    /// An Override naming the part exactly wins; otherwise the Default for the
    /// part's extension applies.
    ///
    /// # Errors
    /// [`OpcError::UnresolvableContentType`] when neither lookup matches.
    pub fn get(&self, pack_uri: &PackURI) -> Result<&str> {
        if let Some(ct) = self.overrides.get(pack_uri.as_str()) {
            return Ok(ct);
        }

        pack_uri
            .ext()
            .and_then(|ext| self.defaults.get(ext))
            .map(String::as_str)
            .ok_or_else(|| OpcError::UnresolvableContentType(pack_uri.to_string()))
    }
}

/// Whether a resolved element namespace is `uri`.
fn is_bound_to(ns: &ResolveResult<'_>, uri: &str) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(bound)) if *bound == uri.as_bytes())
}

/// Read an unqualified attribute of `e`, unescaped.
fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> std::result::Result<Option<String>, String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(|err| err.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Parse the `Relationship` entries of a relationships part.
///
/// Entries must be direct children of a `Relationships` root in the OPC
/// relationships namespace; anything else in the part is ignored.
///
/// # Errors
/// [`OpcError::MalformedXml`] for unparseable content and
/// [`OpcError::InvalidRelationship`] for an entry without `Id`, `Type` or `Target`.
pub fn parse_rels_xml(
    rels_partname: &str,
    rels_xml: &[u8],
) -> Result<SmallVec<[SerializedRelationship; 8]>> {
    let malformed = |reason: String| OpcError::malformed(rels_partname, reason);
    let missing = |attr: &str| OpcError::InvalidRelationship {
        rels_part: rels_partname.to_string(),
        reason: format!("Relationship without {} attribute", attr),
    };

    let text = decode_xml_text(rels_xml).map_err(malformed)?;
    let mut reader = NsReader::from_str(&text);
    reader.config_mut().trim_text(true);

    let mut srels = SmallVec::new();
    let mut depth = 0usize;
    let mut in_rels = false;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| malformed(e.to_string()))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_rel = is_bound_to(&ns, namespace::OPC_RELATIONSHIPS);
                match depth {
                    0 => in_rels = is_rel && e.local_name().as_ref() == b"Relationships",
                    1 if in_rels && is_rel && e.local_name().as_ref() == b"Relationship" => {
                        let r_id = attr_value(e, b"Id").map_err(malformed)?;
                        let reltype = attr_value(e, b"Type").map_err(malformed)?;
                        let target_ref = attr_value(e, b"Target").map_err(malformed)?;
                        let target_mode = attr_value(e, b"TargetMode")
                            .map_err(malformed)?
                            .unwrap_or_else(|| target_mode::INTERNAL.to_string());

                        srels.push(SerializedRelationship {
                            r_id: r_id.ok_or_else(|| missing("Id"))?,
                            reltype: reltype.ok_or_else(|| missing("Type"))?,
                            target_ref: target_ref.ok_or_else(|| missing("Target"))?,
                            target_mode,
                        });
                    },
                    _ => {},
                }
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            },
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(srels)
}

/// Options controlling how a package is read.
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::opc::LoadOptions;
///
/// let options = LoadOptions::new().with_verify_integrity(false);
/// assert!(!options.verify_integrity);
/// ```
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Check every member's CRC before indexing the package
    pub verify_integrity: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            verify_integrity: true,
        }
    }
}

impl LoadOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the archive integrity check runs before indexing.
    #[inline]
    pub fn with_verify_integrity(mut self, verify: bool) -> Self {
        self.verify_integrity = verify;
        self
    }
}

/// Index of every part in a package, with content types resolved.
///
/// Parts are kept in archive order; [`PartId`]s index into that order.
#[derive(Debug)]
pub struct PackageReader {
    parts: Vec<Part>,
    part_by_name: HashMap<String, PartId>,
    comment: Vec<u8>,
}

impl PackageReader {
    /// Index all non-directory members of a physical package.
    ///
    /// 1. Verify archive integrity (unless disabled)
    /// 2. Read every member as a part named `"/" + membername`
    /// 3. Resolve each part's content type from `[Content_Types].xml`
    pub fn from_phys_reader<R: PhysPkgReader + ?Sized>(
        phys_reader: &mut R,
        options: &LoadOptions,
    ) -> Result<Self> {
        if options.verify_integrity {
            phys_reader.verify()?;
        }

        let members = phys_reader.members()?;
        let mut loaded = Vec::with_capacity(members.len());
        let mut part_by_name = HashMap::with_capacity(members.len());

        for member in members {
            if member.is_dir || member.name.ends_with('/') {
                continue;
            }

            let partname = PackURI::from_membername(&member.name);
            let id = PartId(loaded.len());
            if part_by_name.insert(partname.to_string(), id).is_some() {
                return Err(OpcError::CorruptArchive(format!(
                    "duplicate member {}",
                    member.name
                )));
            }

            let blob = phys_reader.blob_for(&member.name)?;
            loaded.push((partname, blob, member.compressed_size));
        }

        let content_types = match part_by_name.get(CONTENT_TYPES_URI) {
            Some(id) => ContentTypeMap::from_xml(&loaded[id.0].1)?,
            None => return Err(OpcError::PartNotFound(CONTENT_TYPES_URI.to_string())),
        };

        let mut parts = Vec::with_capacity(loaded.len());
        for (index, (partname, blob, compressed_size)) in loaded.into_iter().enumerate() {
            let content_type = content_types.get(&partname)?.to_string();
            tracing::trace!(part = %partname, content_type = %content_type, "resolved content type");
            parts.push(Part::new(
                PartId(index),
                partname,
                content_type,
                blob,
                compressed_size,
            ));
        }

        tracing::debug!(parts = parts.len(), "indexed package parts");

        Ok(Self {
            parts,
            part_by_name,
            comment: phys_reader.comment().to_vec(),
        })
    }

    /// All parts in archive order.
    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Look up a part by its absolute partname.
    #[inline]
    pub fn part_id(&self, partname: &str) -> Option<PartId> {
        self.part_by_name.get(partname).copied()
    }

    /// Take ownership of the index (zero-copy move).
    pub(crate) fn into_parts(self) -> (Vec<Part>, HashMap<String, PartId>, Vec<u8>) {
        (self.parts, self.part_by_name, self.comment)
    }
}
