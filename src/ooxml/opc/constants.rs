//! Constant values related to the Open Packaging Convention.
//!
//! This module contains content type URIs (like MIME-types) that specify a part's format,
//! XML namespaces, and relationship types used in OPC packages.

/// Content type URIs (like MIME-types) that specify a part's format
pub mod content_type {
    // Image content types
    pub const PNG: &str = "image/png";

    // Office common content types
    pub const OFC_CUSTOM_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.custom-properties+xml";
    pub const OFC_OBFUSCATED_FONT: &str =
        "application/vnd.openxmlformats-officedocument.obfuscatedFont";

    // MS Office extensions
    pub const MS_ACTIVEX: &str = "application/vnd.ms-office.activeX+xml";
    pub const MS_VBA_PROJECT: &str = "application/vnd.ms-office.vbaProject";
    pub const MS_INTL_MACROSHEET: &str = "application/vnd.ms-excel.intlmacrosheet+xml";

    // OPC core content types
    pub const OPC_CORE_PROPERTIES: &str =
        "application/vnd.openxmlformats-package.core-properties+xml";
    pub const OPC_DIGITAL_SIGNATURE_CERTIFICATE: &str =
        "application/vnd.openxmlformats-package.digital-signature-certificate";
    pub const OPC_DIGITAL_SIGNATURE_ORIGIN: &str =
        "application/vnd.openxmlformats-package.digital-signature-origin";
    pub const OPC_DIGITAL_SIGNATURE_XMLSIGNATURE: &str =
        "application/vnd.openxmlformats-package.digital-signature-xmlsignature+xml";
    pub const OPC_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

    // Comments, one per host application
    pub const WML_COMMENTS: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
    pub const SML_COMMENTS: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.comments+xml";
    pub const PML_COMMENTS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.comments+xml";

    pub const WML_DOCUMENT_MAIN: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

    // Generic XML
    pub const XML: &str = "application/xml";

    /// Sentinel content type reported by the virtual root part.
    pub const VIRTUAL_ROOT: &str = "(virtual root part)";
}

/// XML namespace URIs used in OPC packages
pub mod namespace {
    /// OPC relationships namespace
    pub const OPC_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships";

    /// OPC content types namespace
    pub const OPC_CONTENT_TYPES: &str =
        "http://schemas.openxmlformats.org/package/2006/content-types";

    /// Core properties namespace (`cp:`)
    pub const OPC_CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

    /// Dublin Core elements (`dc:`)
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";

    /// Dublin Core terms (`dcterms:`)
    pub const DC_TERMS: &str = "http://purl.org/dc/terms/";

    /// Dublin Core type vocabulary (`dcmitype:`)
    pub const DCMI_TYPE: &str = "http://purl.org/dc/dcmitype/";

    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}

/// Open XML relationship target modes
pub mod target_mode {
    /// Internal relationship target mode (default)
    pub const INTERNAL: &str = "Internal";

    /// External relationship target mode (e.g., hyperlinks to external URLs)
    pub const EXTERNAL: &str = "External";

    /// Literal target some producers write for a relationship whose part was dropped.
    pub const NULL_TARGET: &str = "NULL";
}

/// Relationship type URIs used in OPC packages
pub mod relationship_type {
    // Core relationships
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

    // Office document
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

    // Images and media
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

    // Active content
    pub const VBA_PROJECT: &str = "http://schemas.microsoft.com/office/2006/relationships/vbaProject";

    // External links and embeddings
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    pub const OLE_OBJECT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/oleObject";
}
