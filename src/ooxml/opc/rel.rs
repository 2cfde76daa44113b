//! Relationship-related objects for OPC packages.
//!
//! Relationships are resolved once while the package loads and are immutable
//! afterwards. Sources and targets are recorded by [`PartId`], and the
//! [`RelationshipGraph`] keeps forward and reverse adjacency built in a single
//! pass so lookups never rescan the relationship list.

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::part::PartId;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Position of a relationship in declaration order across the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelId(pub(crate) usize);

impl RelId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a relationship originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelSource {
    /// The package itself (`/_rels/.rels`)
    Root,
    Part(PartId),
}

/// What a relationship resolved to.
///
/// Exactly one outcome holds for every relationship, so the three cases are
/// variants rather than independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelTarget {
    /// An internal target that exists in the package
    Part(PartId),
    /// `TargetMode="External"`; the target is a URI outside the package
    External,
    /// The literal `NULL` target left behind when a part was removed
    Dangling,
}

/// A single relationship from a source to a target.
///
/// Identified by an rId that is only unique within the relationships part
/// that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    id: RelId,

    source: RelSource,

    /// Reference string of the source, e.g. `Part [/word/document.xml]`
    source_reference: String,

    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target exactly as declared (relative partname, URL or `NULL`)
    target_ref: String,

    target: RelTarget,
}

impl Relationship {
    pub(crate) fn new(
        id: RelId,
        source: RelSource,
        source_reference: String,
        r_id: String,
        reltype: String,
        target_ref: String,
        target: RelTarget,
    ) -> Self {
        Self {
            id,
            source,
            source_reference,
            r_id,
            reltype,
            target_ref,
            target,
        }
    }

    #[inline]
    pub fn id(&self) -> RelId {
        self.id
    }

    #[inline]
    pub fn source(&self) -> RelSource {
        self.source
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference as declared.
    ///
    /// For internal relationships, this is a relative part reference.
    /// For external relationships, this is usually an absolute URL.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn target(&self) -> RelTarget {
        self.target
    }

    /// The resolved target part, `None` for external and dangling targets.
    #[inline]
    pub fn target_part_id(&self) -> Option<PartId> {
        match self.target {
            RelTarget::Part(id) => Some(id),
            RelTarget::External | RelTarget::Dangling => None,
        }
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.target == RelTarget::External
    }

    #[inline]
    pub fn is_dangling(&self) -> bool {
        self.target == RelTarget::Dangling
    }

    /// Whether the type URI ends with the literal `suffix`, e.g. `relationships/image`.
    #[inline]
    pub fn reltype_ends_with(&self, suffix: &str) -> bool {
        self.reltype.ends_with(suffix)
    }

    /// String which uniquely identifies this relationship,
    /// e.g. `Relationship [rId1] (source Part [RootPart])`.
    pub fn to_reference(&self) -> String {
        format!(
            "Relationship [{}] (source {})",
            self.r_id, self.source_reference
        )
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_reference())
    }
}

type RelList = SmallVec<[RelId; 8]>;

/// Compile `suffix` into a pattern anchored at the end of a type URI.
fn suffix_pattern(suffix: &str) -> Result<Regex> {
    Regex::new(&format!("(?:{})$", suffix)).map_err(|e| OpcError::InvalidQuery(e.to_string()))
}

/// Every relationship in a package, with adjacency indices.
///
/// Built once during load and never mutated afterwards.
#[derive(Debug, Default)]
pub struct RelationshipGraph {
    rels: Vec<Relationship>,

    /// Source to relationships declared by it
    outgoing: HashMap<RelSource, RelList>,

    /// Target part to relationships resolving to it
    incoming: HashMap<PartId, RelList>,

    /// Full type URI to relationships, declaration order per key
    by_type: HashMap<String, RelList>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next pushed relationship will receive.
    #[inline]
    pub(crate) fn next_id(&self) -> RelId {
        RelId(self.rels.len())
    }

    /// Append a relationship and index it.
    pub(crate) fn push(&mut self, rel: Relationship) -> RelId {
        let id = rel.id;
        debug_assert_eq!(id, self.next_id());

        self.outgoing.entry(rel.source).or_default().push(id);
        if let RelTarget::Part(target) = rel.target {
            self.incoming.entry(target).or_default().push(id);
        }
        self.by_type.entry(rel.reltype.clone()).or_default().push(id);
        self.rels.push(rel);
        id
    }

    /// All relationships in declaration order.
    #[inline]
    pub fn all(&self) -> &[Relationship] {
        &self.rels
    }

    #[inline]
    pub fn get(&self, id: RelId) -> Option<&Relationship> {
        self.rels.get(id.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Relationships whose source is `source`.
    pub fn outgoing(&self, source: RelSource) -> impl Iterator<Item = &Relationship> + '_ {
        self.resolve(self.outgoing.get(&source))
    }

    /// Relationships whose resolved target is `part`.
    pub fn incoming(&self, part: PartId) -> impl Iterator<Item = &Relationship> + '_ {
        self.resolve(self.incoming.get(&part))
    }

    /// Relationships with exactly this type URI.
    pub fn by_type(&self, reltype: &str) -> impl Iterator<Item = &Relationship> + '_ {
        self.resolve(self.by_type.get(reltype))
    }

    /// Relationships whose type URI ends with a match of the pattern `suffix`.
    ///
    /// # Errors
    /// [`OpcError::InvalidQuery`] when `suffix` is not a valid pattern.
    pub fn by_type_suffix<'a>(
        &'a self,
        suffix: &str,
    ) -> Result<impl Iterator<Item = &'a Relationship> + use<'a>> {
        let pattern = suffix_pattern(suffix)?;
        Ok(self.rels.iter().filter(move |rel| pattern.is_match(&rel.reltype)))
    }

    fn resolve<'a>(&'a self, ids: Option<&'a RelList>) -> impl Iterator<Item = &'a Relationship> + 'a {
        ids.into_iter()
            .flat_map(|ids| ids.iter())
            .map(move |id| &self.rels[id.0])
    }
}
