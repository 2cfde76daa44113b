//! The document model.
//!
//! A [`Document`] owns the package, its resolved relationship graph, the feature
//! sets and the core properties of one analyzed file. It is built once, fully,
//! and is read-only afterwards.

use crate::ooxml::core_properties::CoreProperties;
use crate::ooxml::features::{Feature, Features};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::phys_pkg::{PhysPkgReader, ZipPkgReader};
use crate::ooxml::opc::{LoadOptions, OpcPackage, Part, PartRef, RelSource, Relationship};
use phf::phf_map;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Application family of a package, inferred from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    Word,
    Excel,
    ExcelBinary,
    ExcelAddIn,
    PowerPoint,
    PowerPointAddIn,
    PowerPointShow,
    PowerPointSlide,
    OfficeTheme,
}

impl PackageKind {
    /// Human-readable label, e.g. `Excel add-in`.
    pub fn label(self) -> &'static str {
        match self {
            PackageKind::Word => "Word",
            PackageKind::Excel => "Excel",
            PackageKind::ExcelBinary => "Excel binary",
            PackageKind::ExcelAddIn => "Excel add-in",
            PackageKind::PowerPoint => "PowerPoint",
            PackageKind::PowerPointAddIn => "PowerPoint add-in",
            PackageKind::PowerPointShow => "PowerPoint show",
            PackageKind::PowerPointSlide => "PowerPoint slide",
            PackageKind::OfficeTheme => "Office theme",
        }
    }
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a file extension says about a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileType {
    pub kind: PackageKind,
    pub macro_enabled: bool,
    pub template: bool,
}

const fn file_type(kind: PackageKind, macro_enabled: bool, template: bool) -> FileType {
    FileType {
        kind,
        macro_enabled,
        template,
    }
}

/// Known OOXML extensions, including the leading period.
static FILE_TYPES: phf::Map<&'static str, FileType> = phf_map! {
    ".docx" => file_type(PackageKind::Word, false, false),
    ".docm" => file_type(PackageKind::Word, true, false),
    ".dotx" => file_type(PackageKind::Word, false, true),
    ".dotm" => file_type(PackageKind::Word, true, true),
    ".xlsx" => file_type(PackageKind::Excel, false, false),
    ".xlsm" => file_type(PackageKind::Excel, true, false),
    ".xltx" => file_type(PackageKind::Excel, false, true),
    ".xltm" => file_type(PackageKind::Excel, true, true),
    ".xlsb" => file_type(PackageKind::ExcelBinary, false, false),
    ".xlam" => file_type(PackageKind::ExcelAddIn, true, false),
    ".pptx" => file_type(PackageKind::PowerPoint, false, false),
    ".pptm" => file_type(PackageKind::PowerPoint, true, false),
    ".potx" => file_type(PackageKind::PowerPoint, false, true),
    ".potm" => file_type(PackageKind::PowerPoint, true, true),
    ".ppam" => file_type(PackageKind::PowerPointAddIn, true, false),
    ".ppsx" => file_type(PackageKind::PowerPointShow, false, false),
    ".ppsm" => file_type(PackageKind::PowerPointShow, true, false),
    ".sldx" => file_type(PackageKind::PowerPointSlide, false, false),
    ".sldm" => file_type(PackageKind::PowerPointSlide, true, false),
    ".thmx" => file_type(PackageKind::OfficeTheme, false, false),
};

impl FileType {
    /// Look up the final extension of `path` (case-sensitive).
    ///
    /// # Errors
    /// [`OpcError::UnrecognizedPackageExtension`] for anything outside the table.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        FILE_TYPES
            .get(ext.as_str())
            .copied()
            .ok_or(OpcError::UnrecognizedPackageExtension(ext))
    }
}

/// Relationship type suffix of the main document relationship.
const OFFICE_DOCUMENT_SUFFIX: &str = "officeDocument";

/// An analyzed OOXML file.
///
/// # Examples
///
/// ```no_run
/// use longan::ooxml::Document;
///
/// let doc = Document::open("report.docx")?;
/// println!("{} ({})", doc.main_part()?.name(), doc.kind());
/// for image in doc.images() {
///     println!("{} {}", image.name(), image.content_type());
/// }
/// # Ok::<(), longan::ooxml::opc::OpcError>(())
/// ```
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    file_type: FileType,
    package: OpcPackage,
    features: Features,
    core_properties: CoreProperties,
}

impl Document {
    /// Open and analyze a package with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &LoadOptions::default())
    }

    /// Open and analyze a package.
    ///
    /// 1. Check the file exists and, unless disabled, the archive integrity
    /// 2. Classify the package from its file extension
    /// 3. Index parts and resolve content types
    /// 4. Resolve relationships
    /// 5. Classify features and extract core properties
    ///
    /// Any failure aborts the load.
    pub fn open_with<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut phys_reader = ZipPkgReader::open(path)?;
        Self::load(path.to_path_buf(), &mut phys_reader, options)
    }

    /// Analyze a package held in memory.
    ///
    /// `file_name` is only used for the extension lookup and reporting.
    pub fn from_bytes<P: AsRef<Path>>(file_name: P, data: Vec<u8>, options: &LoadOptions) -> Result<Self> {
        let mut phys_reader = ZipPkgReader::from_bytes(data)?;
        Self::load(file_name.as_ref().to_path_buf(), &mut phys_reader, options)
    }

    fn load<R: PhysPkgReader + ?Sized>(
        path: PathBuf,
        phys_reader: &mut R,
        options: &LoadOptions,
    ) -> Result<Self> {
        if options.verify_integrity {
            phys_reader.verify()?;
        }
        let file_type = FileType::from_path(&path)?;

        let indexing = options.clone().with_verify_integrity(false);
        let package = OpcPackage::from_phys_reader(phys_reader, &indexing)?;
        let features = Features::classify(&package);
        let core_properties = CoreProperties::extract(&package)?;

        tracing::debug!(
            path = %path.display(),
            kind = %file_type.kind,
            parts = package.parts().len(),
            "analyzed document"
        );

        Ok(Self {
            path,
            file_type,
            package,
            features,
            core_properties,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    #[inline]
    pub fn kind(&self) -> PackageKind {
        self.file_type.kind
    }

    #[inline]
    pub fn is_macro_enabled(&self) -> bool {
        self.file_type.macro_enabled
    }

    #[inline]
    pub fn is_template(&self) -> bool {
        self.file_type.template
    }

    /// The underlying package.
    #[inline]
    pub fn package(&self) -> &OpcPackage {
        &self.package
    }

    /// All parts in archive order.
    #[inline]
    pub fn parts(&self) -> &[Part] {
        self.package.parts()
    }

    /// Look up a part by its absolute name, e.g. `/word/document.xml`.
    #[inline]
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.package.part(name)
    }

    /// The virtual root standing in for the package itself.
    #[inline]
    pub fn root(&self) -> PartRef<'_> {
        PartRef::Root
    }

    /// All relationships in declaration order.
    #[inline]
    pub fn relationships(&self) -> &[Relationship] {
        self.package.relationships().all()
    }

    #[inline]
    pub fn features(&self) -> &Features {
        &self.features
    }

    #[inline]
    pub fn core_properties(&self) -> &CoreProperties {
        &self.core_properties
    }

    /// The ZIP archive comment, empty when there is none.
    #[inline]
    pub fn archive_comment(&self) -> &[u8] {
        self.package.comment()
    }

    /// Parts whose content type equals `content_type`.
    pub fn parts_by_content_type(&self, content_type: &str) -> Vec<&Part> {
        self.parts()
            .iter()
            .filter(|p| p.content_type() == content_type)
            .collect()
    }

    /// Parts whose content type matches the regular expression `pattern` anywhere.
    ///
    /// # Errors
    /// [`OpcError::InvalidQuery`] when `pattern` does not compile.
    pub fn parts_by_content_type_regex(&self, pattern: &str) -> Result<Vec<&Part>> {
        let re = Regex::new(pattern).map_err(|e| OpcError::InvalidQuery(e.to_string()))?;
        Ok(self
            .parts()
            .iter()
            .filter(|p| re.is_match(p.content_type()))
            .collect())
    }

    /// Targets of internal relationships whose type ends with a match of the
    /// pattern `suffix`, e.g. `relationships/(image|media)`.
    ///
    /// One entry per relationship, so a part targeted twice appears twice.
    ///
    /// # Errors
    /// [`OpcError::InvalidQuery`] when `suffix` does not compile.
    pub fn parts_by_relationship_type(&self, suffix: &str) -> Result<Vec<&Part>> {
        Ok(self
            .package
            .relationships()
            .by_type_suffix(suffix)?
            .filter_map(|rel| self.package.target_part(rel))
            .collect())
    }

    /// Relationships whose type ends with a match of the pattern `suffix`,
    /// including external and dangling ones.
    ///
    /// # Errors
    /// [`OpcError::InvalidQuery`] when `suffix` does not compile.
    pub fn find_relationships_by_type(&self, suffix: &str) -> Result<Vec<&Relationship>> {
        Ok(self.package.relationships().by_type_suffix(suffix)?.collect())
    }

    /// Relationships whose type is exactly `reltype`, in declaration order.
    pub fn relationships_by_type(&self, reltype: &str) -> Vec<&Relationship> {
        self.package.relationships().by_type(reltype).collect()
    }

    /// Relationships declared by `part` (or by the package, for the root).
    pub fn relationships_out(&self, part: PartRef<'_>) -> Vec<&Relationship> {
        let source = match part {
            PartRef::Root => RelSource::Root,
            PartRef::Part(part) => RelSource::Part(part.id()),
        };
        self.package.relationships().outgoing(source).collect()
    }

    /// Relationships resolving to `part`. The root is never a target.
    pub fn relationships_in(&self, part: PartRef<'_>) -> Vec<&Relationship> {
        match part {
            PartRef::Root => Vec::new(),
            PartRef::Part(part) => self.package.relationships().incoming(part.id()).collect(),
        }
    }

    /// Source of a relationship.
    #[inline]
    pub fn source(&self, rel: &Relationship) -> PartRef<'_> {
        self.package.source_ref(rel.source())
    }

    /// Resolved target of a relationship, `None` when external or dangling.
    #[inline]
    pub fn target_part(&self, rel: &Relationship) -> Option<&Part> {
        self.package.target_part(rel)
    }

    /// The main document part (`document.xml`, `workbook.xml`, `presentation.xml`, ...).
    ///
    /// # Errors
    /// [`OpcError::MissingMainPart`] or [`OpcError::AmbiguousMainPart`] unless
    /// exactly one `officeDocument` relationship resolves to a part.
    pub fn main_part(&self) -> Result<&Part> {
        match self.parts_by_relationship_type(OFFICE_DOCUMENT_SUFFIX)?.as_slice() {
            [] => Err(OpcError::MissingMainPart),
            [part] => Ok(*part),
            parts => Err(OpcError::AmbiguousMainPart(parts.len())),
        }
    }

    /// Resolve a feature set to parts.
    pub fn feature_parts(&self, feature: Feature) -> Vec<&Part> {
        self.features.parts(&self.package, feature).collect()
    }

    pub fn images(&self) -> Vec<&Part> {
        self.feature_parts(Feature::Images)
    }

    pub fn macros(&self) -> Vec<&Part> {
        self.feature_parts(Feature::Macros)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Document [{}]", self.path.display())
    }
}
