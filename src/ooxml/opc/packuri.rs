//! Provides the PackURI value type and utilities for working with package URIs.
//!
//! All path arithmetic used by relationship resolution lives here so it can be
//! tested on its own.

use crate::ooxml::opc::error::{OpcError, Result};

/// A part name within an OPC package.
///
/// PackURIs always begin with a forward slash and use forward slashes as path separators,
/// following the OPC specification. They provide access to various components like
/// the base URI (directory), filename and extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    /// The full pack URI string (e.g., "/word/document.xml")
    uri: String,
}

impl PackURI {
    /// Create a new PackURI from a string.
    ///
    /// # Arguments
    /// * `uri` - The URI string, which must begin with a forward slash
    ///
    /// # Returns
    /// * `Ok(PackURI)` if the URI is valid
    /// * `Err(OpcError::InvalidPackUri)` if the URI doesn't start with a forward slash
    pub fn new<S: Into<String>>(uri: S) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(OpcError::InvalidPackUri(uri));
        }
        Ok(PackURI { uri })
    }

    /// Create the PackURI of a ZIP member.
    ///
    /// Member names carry no leading slash; the partname is `"/" + membername`.
    pub fn from_membername(membername: &str) -> Self {
        PackURI {
            uri: format!("/{}", membername),
        }
    }

    /// Create a PackURI from a relative reference and a base URI.
    ///
    /// This translates a relative reference (like "../styles.xml") onto a base URI
    /// (like "/word") to produce an absolute PackURI (like "/styles.xml").
    /// A reference that already begins with a slash is taken from the package
    /// root, not joined onto `base_uri`, so `/media/logo.png` from `/word` is
    /// `/media/logo.png` rather than `/word/media/logo.png`.
    ///
    /// # Arguments
    /// * `base_uri` - The base URI to resolve from
    /// * `relative_ref` - The relative reference to resolve
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self> {
        let joined = if relative_ref.starts_with('/') {
            relative_ref.to_string()
        } else {
            Self::join_paths(base_uri, relative_ref)
        };
        let normalized = normalize_path(&joined);
        Self::new(normalized)
    }

    /// Get the base URI (directory portion) of this PackURI.
    ///
    /// For example, "/ppt/slides" for "/ppt/slides/slide1.xml".
    /// For the package pseudo-partname "/", returns "/".
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Get the filename portion of this PackURI.
    ///
    /// For example, "slide1.xml" for "/ppt/slides/slide1.xml".
    /// For the package pseudo-partname "/", returns an empty string.
    pub fn filename(&self) -> &str {
        if let Some(pos) = self.uri.rfind('/') {
            &self.uri[pos + 1..]
        } else {
            ""
        }
    }

    /// Get the extension portion of this PackURI.
    ///
    /// For example, "xml" for "/word/document.xml" (note: no leading period).
    /// Case is preserved; `None` when the filename has no period.
    pub fn ext(&self) -> Option<&str> {
        let filename = self.filename();
        filename.rfind('.').map(|pos| &filename[pos + 1..])
    }

    /// Get the membername (URI with leading slash stripped).
    ///
    /// This is the form used as the Zip file membername for the package item.
    /// Returns an empty string for the package pseudo-partname "/".
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Whether this is the package pseudo-partname "/".
    #[inline]
    pub fn is_package(&self) -> bool {
        self.uri == PACKAGE_URI
    }

    /// Get the full URI string.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Helper function to join two paths using forward slashes
    fn join_paths(base: &str, rel: &str) -> String {
        if base.ends_with('/') {
            format!("{}{}", base, rel)
        } else {
            format!("{}/{}", base, rel)
        }
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// Source location derived from the name of a relationships part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelsSource {
    /// Partname of the source, or "/" when the package itself is the source.
    pub source: String,
    /// Directory that relative targets are resolved against.
    pub base_uri: String,
}

impl RelsSource {
    /// Derive the source of a relationships part from its partname.
    ///
    /// `/word/_rels/document.xml.rels` declares relationships of `/word/document.xml`
    /// and resolves targets against `/word`; `/_rels/.rels` belongs to the package.
    /// The final extension is dropped and the directory holding the file (normally
    /// `_rels`) is removed. Returns `None` when the name is too shallow to contain
    /// such a directory.
    pub fn from_rels_partname(rels_partname: &str) -> Option<Self> {
        let (stem, _) = rels_partname.rsplit_once('.')?;
        let mut pieces = stem.rsplitn(3, '/');
        let filename = pieces.next()?;
        let _rels_dir = pieces.next()?;
        let dir = pieces.next()?;

        let base_uri = if dir.is_empty() { PACKAGE_URI } else { dir };
        Some(RelsSource {
            source: format!("{}/{}", dir, filename),
            base_uri: base_uri.to_string(),
        })
    }

    /// Whether the package itself is the source.
    #[inline]
    pub fn is_package(&self) -> bool {
        self.source == PACKAGE_URI
    }
}

/// Normalize an absolute slash-separated path.
///
/// Empty and `.` segments are dropped and `..` removes the preceding segment;
/// `..` never climbs above the root. The result always begins with a slash and
/// never ends with one unless it is the root itself.
pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            _ => parts.push(part),
        }
    }

    if parts.is_empty() {
        return PACKAGE_URI.to_string();
    }

    let mut normalized = String::with_capacity(path.len());
    for part in parts {
        normalized.push('/');
        normalized.push_str(part);
    }
    normalized
}

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";
