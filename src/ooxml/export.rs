//! JSON export of the document model.
//!
//! The layout is
//! `{"document": [{"parts": [...]}, {"relationships": [...]}]}`, where parts and
//! relationships refer to each other through their reference strings.

use crate::common::error::Result;
use crate::ooxml::document::Document;
use crate::ooxml::opc::{Part, PartRef, Relationship};
use base64::Engine;
use serde::Serialize;

/// Options for [`Document::to_json`].
///
/// # Examples
///
/// ```rust
/// use longan::ooxml::ExportOptions;
///
/// let options = ExportOptions::new().with_streams(true).with_pretty(false);
/// assert!(options.include_streams);
/// ```
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Include every part's bytes as base64 under `stream_b64`
    pub include_streams: bool,
    /// Indent the output
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_streams: false,
            pretty: true,
        }
    }
}

impl ExportOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_streams(mut self, include: bool) -> Self {
        self.include_streams = include;
        self
    }

    #[inline]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Serialized form of one part.
#[derive(Debug, Serialize)]
pub struct PartRecord<'a> {
    pub uri: &'a str,
    #[serde(rename = "content-type")]
    pub content_type: &'a str,
    pub relationships_in: Vec<String>,
    pub relationships_out: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_b64: Option<String>,
}

/// Serialized form of one relationship.
#[derive(Debug, Serialize)]
pub struct RelationshipRecord<'a> {
    pub source: String,
    /// Target as declared, not the resolved partname
    pub target: &'a str,
    #[serde(rename = "type")]
    pub reltype: &'a str,
    pub id: &'a str,
    pub is_external: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Section<'a> {
    Parts { parts: Vec<PartRecord<'a>> },
    Relationships { relationships: Vec<RelationshipRecord<'a>> },
}

#[derive(Serialize)]
struct Envelope<'a> {
    document: [Section<'a>; 2],
}

impl Document {
    /// Build the record for one part.
    pub fn part_record<'a>(&'a self, part: &'a Part, include_stream: bool) -> PartRecord<'a> {
        let refs = |rels: Vec<&Relationship>| -> Vec<String> {
            rels.iter().map(|r| r.to_reference()).collect()
        };
        PartRecord {
            uri: part.name(),
            content_type: part.content_type(),
            relationships_in: refs(self.relationships_in(PartRef::Part(part))),
            relationships_out: refs(self.relationships_out(PartRef::Part(part))),
            stream_b64: include_stream
                .then(|| base64::engine::general_purpose::STANDARD.encode(part.blob())),
        }
    }

    /// Build the record for one relationship.
    pub fn relationship_record<'a>(&'a self, rel: &'a Relationship) -> RelationshipRecord<'a> {
        RelationshipRecord {
            source: self.source(rel).to_reference(),
            target: rel.target_ref(),
            reltype: rel.reltype(),
            id: rel.r_id(),
            is_external: rel.is_external(),
        }
    }

    /// Serialize every part and relationship to JSON.
    pub fn to_json(&self, options: &ExportOptions) -> Result<String> {
        let parts = self
            .parts()
            .iter()
            .map(|part| self.part_record(part, options.include_streams))
            .collect();
        let relationships = self
            .relationships()
            .iter()
            .map(|rel| self.relationship_record(rel))
            .collect();

        let envelope = Envelope {
            document: [
                Section::Parts { parts },
                Section::Relationships { relationships },
            ],
        };

        let json = if options.pretty {
            serde_json::to_string_pretty(&envelope)?
        } else {
            serde_json::to_string(&envelope)?
        };
        Ok(json)
    }
}
