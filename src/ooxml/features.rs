//! Semantic feature sets of a package.
//!
//! Parts are identified two ways: by their content type and by the type of the
//! relationships pointing at them. A part belongs to a feature when either
//! channel matches, and each feature set lists a part at most once.

use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::part::{Part, PartId};
use fixedbitset::FixedBitSet;
use once_cell::sync::Lazy;
use regex::RegexSet;

/// A named category of parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    CustomProperties,
    Images,
    Videos,
    Sounds,
    Fonts,
    Macros,
    Comments,
    CustomXml,
    EmbeddedControls,
    EmbeddedObjects,
    EmbeddedPackages,
    DigitalSignatures,
}

/// Content-type fragments and relationship-type suffixes identifying a feature.
struct Rule {
    content_types: &'static [&'static str],
    rel_suffixes: &'static [&'static str],
}

impl Feature {
    pub const ALL: [Feature; 12] = [
        Feature::CustomProperties,
        Feature::Images,
        Feature::Videos,
        Feature::Sounds,
        Feature::Fonts,
        Feature::Macros,
        Feature::Comments,
        Feature::CustomXml,
        Feature::EmbeddedControls,
        Feature::EmbeddedObjects,
        Feature::EmbeddedPackages,
        Feature::DigitalSignatures,
    ];

    /// Snake-case name, e.g. `embedded_objects`.
    pub fn name(self) -> &'static str {
        match self {
            Feature::CustomProperties => "custom_properties",
            Feature::Images => "images",
            Feature::Videos => "videos",
            Feature::Sounds => "sounds",
            Feature::Fonts => "fonts",
            Feature::Macros => "macros",
            Feature::Comments => "comments",
            Feature::CustomXml => "custom_xml",
            Feature::EmbeddedControls => "embedded_controls",
            Feature::EmbeddedObjects => "embedded_objects",
            Feature::EmbeddedPackages => "embedded_packages",
            Feature::DigitalSignatures => "digital_signatures",
        }
    }

    fn rule(self) -> Rule {
        match self {
            Feature::CustomProperties => Rule {
                content_types: &[ct::OFC_CUSTOM_PROPERTIES],
                rel_suffixes: &["custom-properties"],
            },
            Feature::Images => Rule {
                content_types: &["image/"],
                rel_suffixes: &["relationships/image"],
            },
            Feature::Videos => Rule {
                content_types: &["video/"],
                rel_suffixes: &["relationships/video"],
            },
            Feature::Sounds => Rule {
                content_types: &["audio/"],
                rel_suffixes: &["relationships/audio"],
            },
            Feature::Fonts => Rule {
                content_types: &["application/x-font", ct::OFC_OBFUSCATED_FONT],
                rel_suffixes: &["relationships/font"],
            },
            Feature::Macros => Rule {
                content_types: &[ct::MS_VBA_PROJECT, ct::MS_INTL_MACROSHEET],
                rel_suffixes: &["relationships/xlIntlMacrosheet", "relationships/vbaProject"],
            },
            Feature::Comments => Rule {
                content_types: &[ct::WML_COMMENTS, ct::SML_COMMENTS, ct::PML_COMMENTS],
                rel_suffixes: &["relationships/comments"],
            },
            Feature::CustomXml => Rule {
                content_types: &[],
                rel_suffixes: &["relationships/customXml"],
            },
            Feature::EmbeddedControls => Rule {
                content_types: &[ct::MS_ACTIVEX],
                rel_suffixes: &["relationships/control"],
            },
            Feature::EmbeddedObjects => Rule {
                content_types: &[],
                rel_suffixes: &["relationships/oleObject"],
            },
            Feature::EmbeddedPackages => Rule {
                content_types: &[],
                rel_suffixes: &["relationships/package"],
            },
            // Both spellings of the signature relationship types occur in the wild.
            Feature::DigitalSignatures => Rule {
                content_types: &[
                    ct::OPC_DIGITAL_SIGNATURE_CERTIFICATE,
                    ct::OPC_DIGITAL_SIGNATURE_ORIGIN,
                    ct::OPC_DIGITAL_SIGNATURE_XMLSIGNATURE,
                ],
                rel_suffixes: &[
                    "relationships/digital-signature/signature",
                    "relationships/digital-signature/certificate",
                    "relationships/digital-signature/origin",
                    "relationships/digitalsignature/signature",
                    "relationships/digitalsignature/certificate",
                    "relationships/digitalsignature/origin",
                ],
            },
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// Content-type fragments are literal; they match anywhere in the content type.
static CONTENT_TYPE_MATCHERS: Lazy<Vec<RegexSet>> = Lazy::new(|| {
    Feature::ALL
        .iter()
        .map(|feature| {
            RegexSet::new(feature.rule().content_types.iter().map(|p| regex::escape(p)))
                .expect("Failed to build content type matcher")
        })
        .collect()
});

/// Parts of a package grouped by feature.
///
/// Every set is in archive order and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features {
    sets: [Vec<PartId>; 12],
}

impl Features {
    /// Classify every part of `package`.
    ///
    /// Classification is a pure function of the package, so running it twice
    /// yields identical sets.
    pub fn classify(package: &OpcPackage) -> Self {
        let parts = package.parts();
        let graph = package.relationships();
        let mut features = Self::default();

        for (slot, feature) in Feature::ALL.iter().enumerate() {
            let rule = feature.rule();
            let matcher = &CONTENT_TYPE_MATCHERS[slot];
            let mut members = FixedBitSet::with_capacity(parts.len());

            for part in parts {
                if matcher.is_match(part.content_type()) {
                    members.insert(part.id().index());
                }
            }

            for rel in graph.all() {
                let Some(target) = rel.target_part_id() else {
                    continue;
                };
                if rule.rel_suffixes.iter().any(|suffix| rel.reltype_ends_with(suffix)) {
                    members.insert(target.index());
                }
            }

            features.sets[slot] = members.ones().map(PartId).collect();
        }

        tracing::debug!(
            images = features.images().len(),
            macros = features.macros().len(),
            "classified features"
        );
        features
    }

    /// Ids of the parts in one feature set.
    #[inline]
    pub fn get(&self, feature: Feature) -> &[PartId] {
        &self.sets[feature as usize]
    }

    /// Whether `part` belongs to `feature`.
    pub fn contains(&self, feature: Feature, part: PartId) -> bool {
        self.get(feature).binary_search(&part).is_ok()
    }

    /// Resolve a feature set to parts.
    pub fn parts<'a>(
        &'a self,
        package: &'a OpcPackage,
        feature: Feature,
    ) -> impl Iterator<Item = &'a Part> + 'a {
        self.get(feature)
            .iter()
            .filter_map(move |&id| package.part_by_id(id))
    }

    /// Iterate over every feature with its set.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, &[PartId])> + '_ {
        Feature::ALL.iter().map(move |&f| (f, self.get(f)))
    }

    #[inline]
    pub fn custom_properties(&self) -> &[PartId] {
        self.get(Feature::CustomProperties)
    }

    #[inline]
    pub fn images(&self) -> &[PartId] {
        self.get(Feature::Images)
    }

    #[inline]
    pub fn videos(&self) -> &[PartId] {
        self.get(Feature::Videos)
    }

    #[inline]
    pub fn sounds(&self) -> &[PartId] {
        self.get(Feature::Sounds)
    }

    #[inline]
    pub fn fonts(&self) -> &[PartId] {
        self.get(Feature::Fonts)
    }

    #[inline]
    pub fn macros(&self) -> &[PartId] {
        self.get(Feature::Macros)
    }

    #[inline]
    pub fn comments(&self) -> &[PartId] {
        self.get(Feature::Comments)
    }

    #[inline]
    pub fn custom_xml(&self) -> &[PartId] {
        self.get(Feature::CustomXml)
    }

    #[inline]
    pub fn embedded_controls(&self) -> &[PartId] {
        self.get(Feature::EmbeddedControls)
    }

    #[inline]
    pub fn embedded_objects(&self) -> &[PartId] {
        self.get(Feature::EmbeddedObjects)
    }

    #[inline]
    pub fn embedded_packages(&self) -> &[PartId] {
        self.get(Feature::EmbeddedPackages)
    }

    #[inline]
    pub fn digital_signatures(&self) -> &[PartId] {
        self.get(Feature::DigitalSignatures)
    }
}
