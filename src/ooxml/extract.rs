//! Dumping media parts to a sidecar directory.

use crate::common::error::Result;
use crate::ooxml::document::Document;
use crate::ooxml::features::Feature;
use fixedbitset::FixedBitSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Feature sets written by [`dump_media`].
pub const MEDIA_FEATURES: [Feature; 4] = [
    Feature::Images,
    Feature::Sounds,
    Feature::Videos,
    Feature::Fonts,
];

/// Flat file name for a part: `/word/media/image1.png` becomes
/// `word+media+image1.png`.
pub fn sidecar_name(part_name: &str) -> String {
    part_name.trim_start_matches('/').replace('/', "+")
}

/// Write every image, sound, video and font part of `doc` into `dir`.
///
/// The directory is created when missing. A part that belongs to several of
/// these sets is written once. Returns the written paths in archive order.
pub fn dump_media<P: AsRef<Path>>(doc: &Document, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut selected = FixedBitSet::with_capacity(doc.parts().len());
    for feature in MEDIA_FEATURES {
        for id in doc.features().get(feature) {
            selected.insert(id.index());
        }
    }

    let mut written = Vec::with_capacity(selected.count_ones(..));
    for index in selected.ones() {
        let part = &doc.parts()[index];
        let path = dir.join(sidecar_name(part.name()));
        fs::write(&path, part.blob())?;
        tracing::debug!(part = part.name(), path = %path.display(), "wrote media part");
        written.push(path);
    }

    Ok(written)
}
