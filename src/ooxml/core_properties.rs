/// OOXML core properties extraction.
///
/// Core properties are usually stored in the "docProps/core.xml" part and contain
/// standard document metadata like title, creator, creation date, etc. The part
/// is located both by content type and by the package relationship pointing at
/// it; both lookups must agree on a single part.
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::part::{Part, PartId};
use serde::Serialize;

/// Relationship type suffix of the core properties relationship.
const CORE_PROPERTIES_SUFFIX: &str = "metadata/core-properties";

/// Prefix bindings used by the property queries.
const NAMESPACES: &[(&str, &str)] = &[
    ("cp", namespace::OPC_CORE_PROPERTIES),
    ("dc", namespace::DC),
    ("dcterms", namespace::DC_TERMS),
    ("dcmitype", namespace::DCMI_TYPE),
    ("xsi", namespace::XSI),
];

/// Core metadata of a package.
///
/// Every field holds the raw text of its element; dates are not parsed. A
/// package without a core properties part yields all-empty fields and an
/// empty `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoreProperties {
    /// Partname the properties were read from, empty when there is none
    pub name: String,
    pub category: String,
    pub content_status: String,
    pub created: String,
    pub creator: String,
    pub description: String,
    pub identifier: String,
    /// Comma-joined keywords
    pub keywords: String,
    pub language: String,
    pub last_modified_by: String,
    pub last_printed: String,
    pub modified: String,
    pub revision: String,
    pub subject: String,
    pub title: String,
    pub version: String,
}

impl CoreProperties {
    /// Locate and parse the core properties part of `package`.
    ///
    /// # Errors
    /// [`OpcError::AmbiguousCoreProperties`] when more than one distinct part
    /// qualifies, and XML errors from the part itself.
    pub fn extract(package: &OpcPackage) -> Result<Self> {
        match find_core_properties_part(package)? {
            Some(part) => Self::from_part(part),
            None => {
                tracing::debug!("package has no core properties");
                Ok(Self::default())
            },
        }
    }

    /// Parse the properties held by `part`.
    pub fn from_part(part: &Part) -> Result<Self> {
        let tree = part.xml()?;
        let field = |element: &str| -> Result<String> {
            let expr = format!("/cp:coreProperties/{}", element);
            let hits = tree
                .query(&expr, NAMESPACES)
                .map_err(|e| OpcError::InvalidQuery(e.to_string()))?;
            Ok(hits
                .into_iter()
                .next()
                .and_then(|node| node.text)
                .unwrap_or_default())
        };

        let mut props = Self {
            name: part.name().to_string(),
            category: field("cp:category")?,
            content_status: field("cp:contentStatus")?,
            created: field("dcterms:created")?,
            creator: field("dc:creator")?,
            description: field("dc:description")?,
            identifier: field("dc:identifier")?,
            keywords: String::new(),
            language: field("dc:language")?,
            last_modified_by: field("cp:lastModifiedBy")?,
            last_printed: field("cp:lastPrinted")?,
            modified: field("dcterms:modified")?,
            revision: field("cp:revision")?,
            subject: field("dc:subject")?,
            title: field("dc:title")?,
            version: field("cp:version")?,
        };

        let keywords = tree
            .query("/cp:coreProperties/cp:keywords", NAMESPACES)
            .map_err(|e| OpcError::InvalidQuery(e.to_string()))?;

        // Leaf text of every keywords element, then the nested items of the first.
        let mut fragments: Vec<String> = keywords
            .iter()
            .filter_map(|k| k.text.clone())
            .collect();
        if let Some(first) = keywords.first() {
            let nested: Vec<&str> = first
                .children
                .iter()
                .filter_map(|item| item.text.as_deref())
                .collect();
            fragments.push(nested.join(", "));
        }
        fragments.retain(|f| !f.trim().is_empty());
        props.keywords = fragments.join(", ");

        Ok(props)
    }

    /// Whether no core properties part was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Union of parts typed as core properties and parts targeted by a
/// core-properties relationship.
fn find_core_properties_part(package: &OpcPackage) -> Result<Option<&Part>> {
    let mut found: Vec<PartId> = package
        .parts()
        .iter()
        .filter(|p| p.content_type() == ct::OPC_CORE_PROPERTIES)
        .map(Part::id)
        .collect();

    found.extend(
        package
            .relationships()
            .by_type_suffix(CORE_PROPERTIES_SUFFIX)?
            .filter_map(|rel| rel.target_part_id()),
    );
    found.sort_unstable();
    found.dedup();

    match found.as_slice() {
        [] => Ok(None),
        [id] => Ok(package.part_by_id(*id)),
        ids => Err(OpcError::AmbiguousCoreProperties(
            ids.iter()
                .filter_map(|&id| package.part_by_id(id))
                .map(|p| p.name().to_string())
                .collect(),
        )),
    }
}
