//! Synthetic OOXML packages for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
pub const REL_VBA_PROJECT: &str = "http://schemas.microsoft.com/office/2006/relationships/vbaProject";
pub const REL_CUSTOM_XML: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/customXml";
pub const REL_SIGNATURE_ORIGIN: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/digital-signature/origin";
pub const REL_SIGNATURE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/digital-signature/signature";

pub const CT_DOCUMENT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub const CT_CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";

pub const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>Field Notes</dc:title>
    <dc:creator>Alex Sample</dc:creator>
    <cp:keywords>survey, coast</cp:keywords>
    <dcterms:created xsi:type="dcterms:W3CDTF">2014-03-01T10:00:00Z</dcterms:created>
</cp:coreProperties>"#;

pub const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>one</w:t></w:r></w:p><w:p><w:r><w:t>two</w:t></w:r></w:p></w:body></w:document>"#;

/// One `Relationship` element.
pub struct Rel<'a> {
    pub id: &'a str,
    pub reltype: &'a str,
    pub target: &'a str,
    pub external: bool,
}

pub fn rel<'a>(id: &'a str, reltype: &'a str, target: &'a str) -> Rel<'a> {
    Rel {
        id,
        reltype,
        target,
        external: false,
    }
}

pub fn external<'a>(id: &'a str, reltype: &'a str, target: &'a str) -> Rel<'a> {
    Rel {
        id,
        reltype,
        target,
        external: true,
    }
}

pub fn rels_xml(rels: &[Rel<'_>]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}">"#,
        RELS_NS
    );
    for r in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
            r.id,
            r.reltype,
            r.target,
            if r.external { r#" TargetMode="External""# } else { "" }
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Builds a ZIP package member by member.
pub struct PackageBuilder {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
    members: Vec<(String, Vec<u8>)>,
    comment: Option<String>,
}

impl PackageBuilder {
    /// A builder pre-populated with the usual `rels`/`xml` defaults.
    pub fn new() -> Self {
        Self {
            defaults: vec![
                (
                    "rels".to_string(),
                    "application/vnd.openxmlformats-package.relationships+xml".to_string(),
                ),
                ("xml".to_string(), "application/xml".to_string()),
            ],
            overrides: Vec::new(),
            members: Vec::new(),
            comment: None,
        }
    }

    pub fn default_type(mut self, ext: &str, content_type: &str) -> Self {
        self.defaults.push((ext.to_string(), content_type.to_string()));
        self
    }

    pub fn override_type(mut self, partname: &str, content_type: &str) -> Self {
        self.overrides.push((partname.to_string(), content_type.to_string()));
        self
    }

    pub fn part(mut self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.members.push((name.to_string(), data.as_ref().to_vec()));
        self
    }

    pub fn rels(self, name: &str, rels: &[Rel<'_>]) -> Self {
        let xml = rels_xml(rels);
        self.part(name, xml)
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn content_types_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(r#"<Default Extension="{}" ContentType="{}"/>"#, ext, ct));
        }
        for (name, ct) in &self.overrides {
            xml.push_str(&format!(r#"<Override PartName="{}" ContentType="{}"/>"#, name, ct));
        }
        xml.push_str("</Types>");
        xml
    }

    /// Serialize to ZIP bytes, with `[Content_Types].xml` first.
    pub fn build(&self) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(self.content_types_xml().as_bytes()).unwrap();
        for (name, data) in &self.members {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data).unwrap();
        }
        if let Some(comment) = &self.comment {
            zip.set_comment(comment.clone());
        }
        zip.finish().unwrap().into_inner()
    }

    /// Write the package into a fresh temporary directory as `file_name`.
    pub fn write(&self, file_name: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);
        std::fs::write(&path, self.build()).unwrap();
        (dir, path)
    }
}

/// A small but complete word-processing package.
pub fn sample_docx() -> PackageBuilder {
    PackageBuilder::new()
        .default_type("png", "image/png")
        .override_type("/word/document.xml", CT_DOCUMENT_MAIN)
        .override_type("/docProps/core.xml", CT_CORE_PROPERTIES)
        .rels(
            "_rels/.rels",
            &[
                rel("rId1", REL_OFFICE_DOCUMENT, "word/document.xml"),
                rel("rId2", REL_CORE_PROPERTIES, "docProps/core.xml"),
            ],
        )
        .part("docProps/core.xml", CORE_XML)
        .part("word/document.xml", DOCUMENT_XML)
        .rels(
            "word/_rels/document.xml.rels",
            &[
                rel("rId1", REL_IMAGE, "media/image1.png"),
                external("rId2", REL_HYPERLINK, "https://example.org/report?id=7"),
                rel("rId3", REL_IMAGE, "NULL"),
                rel("rId4", REL_CUSTOM_XML, "../customXml/item1.xml"),
            ],
        )
        .part("word/media/image1.png", b"\x89PNG\r\n\x1a\n")
        .part("word/media/image2.png", b"\x89PNG\r\n\x1a\n")
        .part("customXml/item1.xml", "<root/>")
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// A stored (uncompressed) archive written byte by byte, so directory fields
/// can say things a well-behaved writer never would.
///
/// When `declared_size` is `Some`, the central directory entry of that member
/// claims the given uncompressed size through a zip64 extra field.
pub fn raw_stored_zip(members: &[(&str, &[u8], Option<u64>)]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for &(name, data, declared_size) in members {
        let offset = out.len() as u32;
        let crc = crc32(data);
        let len = data.len() as u32;

        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // flags
        out.extend_from_slice(&0u16.to_le_bytes()); // stored
        out.extend_from_slice(&0u16.to_le_bytes()); // time
        out.extend_from_slice(&0x21u16.to_le_bytes()); // 1980-01-01
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(data);

        let mut extra = Vec::new();
        if let Some(size) = declared_size {
            extra.extend_from_slice(&0x0001u16.to_le_bytes());
            extra.extend_from_slice(&8u16.to_le_bytes());
            extra.extend_from_slice(&size.to_le_bytes());
        }
        let uncompressed = if declared_size.is_some() { u32::MAX } else { len };

        central.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        central.extend_from_slice(&45u16.to_le_bytes()); // made by
        central.extend_from_slice(&45u16.to_le_bytes()); // needed
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0x21u16.to_le_bytes());
        central.extend_from_slice(&crc.to_le_bytes());
        central.extend_from_slice(&len.to_le_bytes());
        central.extend_from_slice(&uncompressed.to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&(extra.len() as u16).to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes()); // comment
        central.extend_from_slice(&0u16.to_le_bytes()); // disk
        central.extend_from_slice(&0u16.to_le_bytes()); // internal attributes
        central.extend_from_slice(&0u32.to_le_bytes()); // external attributes
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name.as_bytes());
        central.extend_from_slice(&extra);
    }

    let central_offset = out.len() as u32;
    out.extend_from_slice(&central);

    let count = members.len() as u16;
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&(central.len() as u32).to_le_bytes());
    out.extend_from_slice(&central_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}
