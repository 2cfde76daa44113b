mod common;

use common::*;
use longan::ooxml::opc::{OpcError, RelTarget};
use longan::ooxml::{Document, ExportOptions, Feature, LoadOptions, PackageKind, PartRef};
use std::collections::HashSet;

#[test]
fn test_open_sample_document() {
    let (_dir, path) = sample_docx().write("sample.docx");
    let doc = Document::open(&path).unwrap();

    assert_eq!(doc.kind(), PackageKind::Word);
    assert!(!doc.is_macro_enabled());
    assert!(!doc.is_template());
    assert_eq!(doc.path(), path.as_path());

    let names: Vec<&str> = doc.parts().iter().map(|p| p.name()).collect();
    assert_eq!(
        names,
        [
            "/[Content_Types].xml",
            "/_rels/.rels",
            "/docProps/core.xml",
            "/word/document.xml",
            "/word/_rels/document.xml.rels",
            "/word/media/image1.png",
            "/word/media/image2.png",
            "/customXml/item1.xml",
        ]
    );
    assert!(doc.parts().iter().all(|p| !p.content_type().is_empty()));

    let main = doc.main_part().unwrap();
    assert_eq!(main.name(), "/word/document.xml");
    assert_eq!(main.content_type(), CT_DOCUMENT_MAIN);

    let props = doc.core_properties();
    assert_eq!(props.name, "/docProps/core.xml");
    assert_eq!(props.title, "Field Notes");
    assert_eq!(props.creator, "Alex Sample");
    assert_eq!(props.keywords, "survey, coast");
    assert_eq!(props.created, "2014-03-01T10:00:00Z");
    assert_eq!(props.subject, "");
}

#[test]
fn test_relationship_outcomes() {
    let (_dir, path) = sample_docx().write("sample.docx");
    let doc = Document::open(&path).unwrap();

    let rels = doc.relationships();
    assert_eq!(rels.len(), 6);

    for rel in rels {
        let outcomes = [
            doc.target_part(rel).is_some(),
            rel.is_external(),
            rel.target_ref() == "NULL" && !rel.is_external(),
        ];
        assert_eq!(outcomes.iter().filter(|&&o| o).count(), 1, "{}", rel);
    }

    let link = doc.find_relationships_by_type("relationships/hyperlink").unwrap();
    assert_eq!(link.len(), 1);
    assert!(link[0].is_external());
    assert_eq!(link[0].target(), RelTarget::External);
    assert_eq!(link[0].target_ref(), "https://example.org/report?id=7");
    assert!(doc.target_part(link[0]).is_none());

    let dangling: Vec<_> = rels.iter().filter(|r| r.is_dangling()).collect();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].r_id(), "rId3");
    assert!(!dangling[0].is_external());

    let custom = doc.parts_by_relationship_type("relationships/customXml").unwrap();
    assert_eq!(custom.len(), 1);
    assert_eq!(custom[0].name(), "/customXml/item1.xml");

    let by_type = doc.relationships_by_type(REL_IMAGE);
    let ids: Vec<&str> = by_type.iter().map(|r| r.r_id()).collect();
    assert_eq!(ids, ["rId1", "rId3"]);
    assert!(doc.relationships_by_type("relationships/image").is_empty());
}

#[test]
fn test_root_part() {
    let (_dir, path) = sample_docx().write("sample.docx");
    let doc = Document::open(&path).unwrap();

    let root = doc.root();
    assert!(root.is_root());
    assert_eq!(root.name(), "RootPart");
    assert_eq!(root.content_type(), "(virtual root part)");
    assert!(root.blob().is_empty());
    assert!(root.xpath("/", &[]).is_none());

    let out = doc.relationships_out(root);
    let targets: Vec<&str> = out.iter().map(|r| r.target_ref()).collect();
    assert_eq!(targets, ["word/document.xml", "docProps/core.xml"]);
    assert!(out.iter().all(|r| doc.source(r) == PartRef::Root));
    assert_eq!(
        out[0].to_reference(),
        "Relationship [rId1] (source Part [RootPart])"
    );
    assert!(doc.relationships_in(root).is_empty());
}

#[test]
fn test_adjacency_round_trip() {
    let (_dir, path) = sample_docx().write("sample.docx");
    let doc = Document::open(&path).unwrap();

    for part in doc.parts() {
        let incoming: HashSet<_> = doc
            .relationships_in(PartRef::Part(part))
            .iter()
            .map(|r| r.id())
            .collect();
        let expected: HashSet<_> = doc
            .relationships()
            .iter()
            .filter(|r| doc.target_part(r).map(|t| t.name()) == Some(part.name()))
            .map(|r| r.id())
            .collect();
        assert_eq!(incoming, expected, "incoming of {}", part);

        let outgoing: HashSet<_> = doc
            .relationships_out(PartRef::Part(part))
            .iter()
            .map(|r| r.id())
            .collect();
        let expected: HashSet<_> = doc
            .relationships()
            .iter()
            .filter(|r| doc.source(r) == PartRef::Part(part))
            .map(|r| r.id())
            .collect();
        assert_eq!(outgoing, expected, "outgoing of {}", part);
    }
}

#[test]
fn test_features() {
    let (_dir, path) = sample_docx().write("sample.docx");
    let doc = Document::open(&path).unwrap();

    // image2.png has no relationship pointing at it; its content type is enough.
    let images: Vec<&str> = doc.images().iter().map(|p| p.name()).collect();
    assert_eq!(images, ["/word/media/image1.png", "/word/media/image2.png"]);

    let custom: Vec<&str> = doc
        .feature_parts(Feature::CustomXml)
        .iter()
        .map(|p| p.name())
        .collect();
    assert_eq!(custom, ["/customXml/item1.xml"]);
    assert!(doc.macros().is_empty());

    let again = longan::ooxml::Features::classify(doc.package());
    assert_eq!(&again, doc.features());
}

#[test]
fn test_macro_enabled_package() {
    let builder = PackageBuilder::new()
        .override_type("/word/document.xml", "application/vnd.ms-word.document.macroEnabled.main+xml")
        .override_type("/word/vbaProject.bin", "application/vnd.ms-office.vbaProject")
        .override_type("/_xmlsignatures/origin.sigs", "application/vnd.openxmlformats-package.digital-signature-origin")
        .override_type(
            "/_xmlsignatures/sig1.xml",
            "application/vnd.openxmlformats-package.digital-signature-xmlsignature+xml",
        )
        .rels(
            "_rels/.rels",
            &[
                rel("rId1", REL_OFFICE_DOCUMENT, "word/document.xml"),
                rel("rId2", REL_SIGNATURE_ORIGIN, "_xmlsignatures/origin.sigs"),
            ],
        )
        .part("word/document.xml", DOCUMENT_XML)
        .rels(
            "word/_rels/document.xml.rels",
            &[rel("rId1", REL_VBA_PROJECT, "vbaProject.bin")],
        )
        .part("word/vbaProject.bin", b"\xcc\x61\xff\xff")
        .part("_xmlsignatures/origin.sigs", b"")
        .rels(
            "_xmlsignatures/_rels/origin.sigs.rels",
            &[rel("rId1", REL_SIGNATURE, "sig1.xml")],
        )
        .part("_xmlsignatures/sig1.xml", "<Signature/>");
    let (_dir, path) = builder.write("macro.docm");
    let doc = Document::open(&path).unwrap();

    assert!(doc.is_macro_enabled());
    let macros: Vec<&str> = doc.macros().iter().map(|p| p.name()).collect();
    assert_eq!(macros, ["/word/vbaProject.bin"]);

    let signatures: Vec<&str> = doc
        .feature_parts(Feature::DigitalSignatures)
        .iter()
        .map(|p| p.name())
        .collect();
    assert_eq!(signatures, ["/_xmlsignatures/origin.sigs", "/_xmlsignatures/sig1.xml"]);

    // No core properties part at all.
    assert!(doc.core_properties().is_empty());
    assert_eq!(doc.core_properties().title, "");
}

#[test]
fn test_main_part_errors() {
    let none = PackageBuilder::new().part("word/document.xml", DOCUMENT_XML);
    let (_dir, path) = none.write("none.docx");
    let doc = Document::open(&path).unwrap();
    assert!(matches!(doc.main_part(), Err(OpcError::MissingMainPart)));

    let two = PackageBuilder::new()
        .rels(
            "_rels/.rels",
            &[
                rel("rId1", REL_OFFICE_DOCUMENT, "word/document.xml"),
                rel("rId2", REL_OFFICE_DOCUMENT, "word/other.xml"),
            ],
        )
        .part("word/document.xml", DOCUMENT_XML)
        .part("word/other.xml", DOCUMENT_XML);
    let (_dir, path) = two.write("two.docx");
    let doc = Document::open(&path).unwrap();
    assert!(matches!(doc.main_part(), Err(OpcError::AmbiguousMainPart(2))));
}

#[test]
fn test_load_failures_are_fatal() {
    let (_dir, path) = sample_docx().write("sample.txt");
    assert!(matches!(
        Document::open(&path),
        Err(OpcError::UnrecognizedPackageExtension(ext)) if ext == ".txt"
    ));

    let missing = std::env::temp_dir().join("longan-does-not-exist.docx");
    assert!(matches!(Document::open(&missing), Err(OpcError::PackageNotFound(_))));

    let untyped = sample_docx().part("word/settings.bin", b"\0");
    let (_dir, path) = untyped.write("untyped.docx");
    assert!(matches!(
        Document::open(&path),
        Err(OpcError::UnresolvableContentType(name)) if name == "/word/settings.bin"
    ));

    let broken_target = PackageBuilder::new()
        .rels("_rels/.rels", &[rel("rId1", REL_OFFICE_DOCUMENT, "word/missing.xml")]);
    let (_dir, path) = broken_target.write("broken.docx");
    assert!(matches!(
        Document::open(&path),
        Err(OpcError::UnresolvableRelationshipTarget { .. })
    ));

    let two_cores = sample_docx()
        .override_type("/docProps/core2.xml", CT_CORE_PROPERTIES)
        .part("docProps/core2.xml", CORE_XML);
    let (_dir, path) = two_cores.write("cores.docx");
    assert!(matches!(
        Document::open(&path),
        Err(OpcError::AmbiguousCoreProperties(_))
    ));
}

#[test]
fn test_corrupt_archive() {
    let mut bytes = sample_docx().build();
    // Truncating the central directory leaves nothing readable.
    bytes.truncate(bytes.len() / 2);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.docx");
    std::fs::write(&path, bytes).unwrap();
    assert!(matches!(Document::open(&path), Err(OpcError::CorruptArchive(_))));
}

#[test]
fn test_in_memory_and_options() {
    let bytes = sample_docx().comment("made by hand").build();
    let options = LoadOptions::new().with_verify_integrity(false);
    let doc = Document::from_bytes("memory.xlsm", bytes, &options).unwrap();

    assert_eq!(doc.kind(), PackageKind::Excel);
    assert!(doc.is_macro_enabled());
    assert_eq!(doc.archive_comment(), b"made by hand");

    let image = doc.part("/word/media/image1.png").unwrap();
    assert_eq!(image.size(), 8);
    assert!(image.compressed_size() > 0);
}

#[test]
fn test_part_queries() {
    let (_dir, path) = sample_docx().write("sample.docx");
    let doc = Document::open(&path).unwrap();

    let pngs = doc.parts_by_content_type("image/png");
    assert_eq!(pngs.len(), 2);

    let xmlish = doc.parts_by_content_type_regex(r"\+xml$").unwrap();
    let names: HashSet<&str> = xmlish.iter().map(|p| p.name()).collect();
    assert!(names.contains("/word/document.xml"));
    assert!(names.contains("/_rels/.rels"));
    assert!(!names.contains("/word/media/image1.png"));

    assert!(matches!(
        doc.parts_by_content_type_regex("(unclosed"),
        Err(OpcError::InvalidQuery(_))
    ));

    let main = doc.main_part().unwrap();
    let count = main
        .xpath(
            "count(//w:p)",
            &[("w", "http://schemas.openxmlformats.org/wordprocessingml/2006/main")],
        )
        .unwrap();
    assert_eq!(count[0].value, "2");

    let broken = sample_docx().part("word/broken.xml", "<w:document>");
    let (_dir, path) = broken.write("broken.docx");
    let doc = Document::open(&path).unwrap();
    let part = doc.part("/word/broken.xml").unwrap();
    assert!(matches!(part.xml(), Err(OpcError::MalformedXml { .. })));
}

#[test]
fn test_json_export() {
    let (_dir, path) = sample_docx().write("sample.docx");
    let doc = Document::open(&path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&doc.to_json(&ExportOptions::default()).unwrap()).unwrap();
    let parts = json["document"][0]["parts"].as_array().unwrap();
    let rels = json["document"][1]["relationships"].as_array().unwrap();
    assert_eq!(parts.len(), doc.parts().len());
    assert_eq!(rels.len(), doc.relationships().len());

    let image = parts
        .iter()
        .find(|p| p["uri"] == "/word/media/image1.png")
        .unwrap();
    assert_eq!(image["content-type"], "image/png");
    assert_eq!(
        image["relationships_in"][0],
        "Relationship [rId1] (source Part [/word/document.xml])"
    );

    let dangling = rels.iter().find(|r| r["target"] == "NULL").unwrap();
    assert_eq!(dangling["is_external"], false);
    assert_eq!(dangling["source"], "Part [/word/document.xml]");
}

#[test]
fn test_dump_media() {
    let (_dir, path) = sample_docx().write("sample.docx");
    let doc = Document::open(&path).unwrap();

    let out = tempfile::tempdir().unwrap();
    let target = out.path().join("sample").join("parts");
    let written = longan::ooxml::extract::dump_media(&doc, &target).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["word+media+image1.png", "word+media+image2.png"]);
    assert_eq!(
        std::fs::read(target.join("word+media+image1.png")).unwrap(),
        b"\x89PNG\r\n\x1a\n"
    );
}

#[test]
fn test_inflated_declared_size_is_not_trusted() {
    let content_types = PackageBuilder::new()
        .default_type("png", "image/png")
        .content_types_xml();
    let png: &[u8] = b"\x89PNG\r\n\x1a\n";

    for verify in [true, false] {
        let bytes = raw_stored_zip(&[
            ("[Content_Types].xml", content_types.as_bytes(), None),
            ("a.png", png, Some(1 << 50)),
        ]);
        let options = LoadOptions::new().with_verify_integrity(verify);

        // Either outcome is a per-file result; what matters is that the load returns.
        match Document::from_bytes("inflated.docx", bytes, &options) {
            Ok(doc) => {
                assert_eq!(doc.parts().len(), 2);
                assert_eq!(doc.part("/a.png").unwrap().blob(), png);
            },
            Err(e) => assert!(
                matches!(e, OpcError::CorruptArchive(_) | OpcError::Io(_)),
                "{}",
                e
            ),
        }
    }

    let honest = raw_stored_zip(&[
        ("[Content_Types].xml", content_types.as_bytes(), None),
        ("a.png", png, None),
    ]);
    let doc = Document::from_bytes("honest.docx", honest, &LoadOptions::default()).unwrap();
    assert_eq!(doc.part("/a.png").unwrap().size(), 8);
}

#[test]
fn test_relationship_type_patterns() {
    let (_dir, path) = sample_docx().write("sample.docx");
    let doc = Document::open(&path).unwrap();

    // rId3 is dangling, so only the image and custom XML targets come back.
    let parts: Vec<&str> = doc
        .parts_by_relationship_type("relationships/(image|customXml)")
        .unwrap()
        .iter()
        .map(|p| p.name())
        .collect();
    assert_eq!(parts, ["/word/media/image1.png", "/customXml/item1.xml"]);

    let main = doc.find_relationships_by_type("ships/officeDoc.*").unwrap();
    assert_eq!(main.len(), 1);
    assert_eq!(main[0].target_ref(), "word/document.xml");

    assert!(doc.find_relationships_by_type("officeDocument/2006").unwrap().is_empty());
    assert!(matches!(
        doc.parts_by_relationship_type("relationships/(image"),
        Err(OpcError::InvalidQuery(_))
    ));
}
