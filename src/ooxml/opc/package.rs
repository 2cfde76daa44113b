//! Objects that implement reading OPC packages.
//!
//! This module provides the main OpcPackage type: every part of a package, the
//! virtual root, and the fully resolved relationship graph. Loading is
//! all-or-nothing; any resolution error aborts it.

use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PackURI, RelsSource};
use crate::ooxml::opc::part::{Part, PartId, PartRef};
use crate::ooxml::opc::phys_pkg::{PhysPkgReader, ZipPkgReader};
use crate::ooxml::opc::pkgreader::{LoadOptions, PackageReader, SerializedRelationship, parse_rels_xml};
use crate::ooxml::opc::rel::{RelSource, RelTarget, Relationship, RelationshipGraph};
use std::collections::HashMap;
use std::path::Path;

/// Main API class for working with OPC packages.
///
/// OpcPackage represents an Open Packaging Convention package in memory,
/// providing access to parts and the relationships between them.
#[derive(Debug)]
pub struct OpcPackage {
    /// All parts in archive order
    parts: Vec<Part>,

    /// Partname to position in `parts`
    part_by_name: HashMap<String, PartId>,

    rels: RelationshipGraph,

    /// ZIP archive comment
    comment: Vec<u8>,
}

impl OpcPackage {
    /// Open an OPC package from a file.
    ///
    /// # Example
    /// ```no_run
    /// use longan::ooxml::opc::{LoadOptions, OpcPackage};
    ///
    /// let pkg = OpcPackage::open("document.docx", &LoadOptions::default()).unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let mut phys_reader = ZipPkgReader::open(path)?;
        Self::from_phys_reader(&mut phys_reader, options)
    }

    /// Load an OPC package from in-memory ZIP bytes.
    pub fn from_bytes(data: Vec<u8>, options: &LoadOptions) -> Result<Self> {
        let mut phys_reader = ZipPkgReader::from_bytes(data)?;
        Self::from_phys_reader(&mut phys_reader, options)
    }

    /// Load an OPC package from any physical package reader.
    pub fn from_phys_reader<R: PhysPkgReader + ?Sized>(
        phys_reader: &mut R,
        options: &LoadOptions,
    ) -> Result<Self> {
        let pkg_reader = PackageReader::from_phys_reader(phys_reader, options)?;
        let (parts, part_by_name, comment) = pkg_reader.into_parts();

        let mut package = Self {
            parts,
            part_by_name,
            rels: RelationshipGraph::new(),
            comment,
        };
        package.rels = package.resolve_relationships()?;

        tracing::debug!(
            parts = package.parts.len(),
            relationships = package.rels.len(),
            "loaded package"
        );
        Ok(package)
    }

    /// Parse every relationships part and resolve its entries.
    ///
    /// Relationships parts are visited in archive order and their entries in
    /// declaration order, so the resulting list is deterministic.
    fn resolve_relationships(&self) -> Result<RelationshipGraph> {
        let mut graph = RelationshipGraph::new();

        for rels_part in self.parts.iter().filter(|p| p.content_type() == ct::OPC_RELATIONSHIPS) {
            let rels_name = rels_part.name();
            let origin = RelsSource::from_rels_partname(rels_name).ok_or_else(|| {
                OpcError::UnresolvableRelationshipSource {
                    rels_part: rels_name.to_string(),
                    source_path: rels_name.to_string(),
                }
            })?;

            let source = if origin.is_package() {
                RelSource::Root
            } else {
                let id = self.part_by_name.get(&origin.source).copied().ok_or_else(|| {
                    OpcError::UnresolvableRelationshipSource {
                        rels_part: rels_name.to_string(),
                        source_path: origin.source.clone(),
                    }
                })?;
                RelSource::Part(id)
            };
            let source_reference = self.source_ref(source).to_reference();

            for srel in parse_rels_xml(rels_name, rels_part.blob())? {
                let target = self.resolve_target(rels_name, &origin, &srel)?;
                tracing::trace!(
                    rels_part = rels_name,
                    r_id = %srel.r_id,
                    target = %srel.target_ref,
                    "resolved relationship"
                );

                let rel = Relationship::new(
                    graph.next_id(),
                    source,
                    source_reference.clone(),
                    srel.r_id,
                    srel.reltype,
                    srel.target_ref,
                    target,
                );
                graph.push(rel);
            }
        }

        Ok(graph)
    }

    /// Classify one declared target as external, dangling or an existing part.
    fn resolve_target(
        &self,
        rels_name: &str,
        origin: &RelsSource,
        srel: &SerializedRelationship,
    ) -> Result<RelTarget> {
        if srel.is_external() {
            return Ok(RelTarget::External);
        }
        if srel.is_dangling() {
            tracing::warn!(
                rels_part = rels_name,
                r_id = %srel.r_id,
                "relationship target is NULL"
            );
            return Ok(RelTarget::Dangling);
        }

        let unresolvable = |target_path: String| OpcError::UnresolvableRelationshipTarget {
            rels_part: rels_name.to_string(),
            target_path,
        };
        let target = PackURI::from_rel_ref(&origin.base_uri, &srel.target_ref)
            .map_err(|_| unresolvable(srel.target_ref.clone()))?;

        self.part_by_name
            .get(target.as_str())
            .map(|&id| RelTarget::Part(id))
            .ok_or_else(|| unresolvable(target.to_string()))
    }

    /// All parts in archive order.
    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Get a part by its partname.
    #[inline]
    pub fn part(&self, partname: &str) -> Option<&Part> {
        self.part_by_name.get(partname).map(|id| &self.parts[id.0])
    }

    /// Get a part by id.
    #[inline]
    pub fn part_by_id(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.0)
    }

    #[inline]
    pub fn relationships(&self) -> &RelationshipGraph {
        &self.rels
    }

    /// View a relationship source as a part reference.
    pub fn source_ref(&self, source: RelSource) -> PartRef<'_> {
        match source {
            RelSource::Root => PartRef::Root,
            RelSource::Part(id) => PartRef::Part(&self.parts[id.0]),
        }
    }

    /// The resolved target part of a relationship, if internal and present.
    pub fn target_part(&self, rel: &Relationship) -> Option<&Part> {
        rel.target_part_id().map(|id| &self.parts[id.0])
    }

    #[inline]
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }
}
