//! Provides a general interface to a physical OPC package (ZIP file).
//!
//! This module handles the low-level reading of OPC packages from ZIP archives.
//! The package model only needs three things from the container: an ordered
//! member listing, the bytes of a named member, and an integrity check. Those are
//! expressed by the [`PhysPkgReader`] trait so the model can be built from any
//! container source; [`ZipPkgReader`] is the implementation over the `zip` crate.

use crate::ooxml::opc::error::{OpcError, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

/// Upper bound on the buffer reserved from a member's declared size.
const PREALLOC_LIMIT: u64 = 16 * 1024 * 1024;

/// Directory information about one archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Member name as stored in the archive (no leading slash)
    pub name: String,
    /// Compressed size in bytes
    pub compressed_size: u64,
    /// Whether the member is a directory entry
    pub is_dir: bool,
}

/// Read access to the physical container of an OPC package.
pub trait PhysPkgReader {
    /// List every member of the container in archive order, directories included.
    fn members(&mut self) -> Result<Vec<MemberInfo>>;

    /// Read and decompress the member called `membername`.
    fn blob_for(&mut self, membername: &str) -> Result<Vec<u8>>;

    /// Check the integrity of every member.
    ///
    /// Fails with [`OpcError::CorruptArchive`] on the first member whose stored
    /// checksum does not match its content.
    fn verify(&mut self) -> Result<()>;

    /// Archive-level comment, empty when the container has none.
    fn comment(&self) -> &[u8] {
        &[]
    }
}

/// [`PhysPkgReader`] over a ZIP archive.
pub struct ZipPkgReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl ZipPkgReader<BufReader<File>> {
    /// Open an OPC package from a file path.
    ///
    /// # Errors
    /// Returns [`OpcError::PackageNotFound`] if the file doesn't exist and
    /// [`OpcError::CorruptArchive`] if it isn't a readable ZIP file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl ZipPkgReader<Cursor<Vec<u8>>> {
    /// Create a reader over an in-memory ZIP archive.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read + Seek> ZipPkgReader<R> {
    /// Create a reader by parsing the central directory of `reader`.
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader).map_err(corrupt)?;
        Ok(Self { archive })
    }

    /// Number of members in the archive, directories included.
    #[inline]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the archive has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }
}

impl<R: Read + Seek> PhysPkgReader for ZipPkgReader<R> {
    fn members(&mut self) -> Result<Vec<MemberInfo>> {
        let mut members = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let file = self.archive.by_index_raw(i).map_err(corrupt)?;
            members.push(MemberInfo {
                name: file.name().to_string(),
                compressed_size: file.compressed_size(),
                is_dir: file.is_dir(),
            });
        }
        Ok(members)
    }

    fn blob_for(&mut self, membername: &str) -> Result<Vec<u8>> {
        let file = match self.archive.by_name(membername) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(OpcError::PartNotFound(format!("/{}", membername)));
            },
            Err(e) => return Err(corrupt(e)),
        };

        // The declared size is untrusted; only a bounded amount is reserved up front.
        let declared = file.size();
        let mut blob = Vec::with_capacity(declared.min(PREALLOC_LIMIT) as usize);
        file.take(declared)
            .read_to_end(&mut blob)
            .map_err(|e| OpcError::CorruptArchive(format!("{}: {}", membername, e)))?;
        Ok(blob)
    }

    fn verify(&mut self) -> Result<()> {
        for i in 0..self.archive.len() {
            let mut file = self.archive.by_index(i).map_err(corrupt)?;
            if file.is_dir() {
                continue;
            }
            // Reading to the end is what triggers the CRC comparison.
            std::io::copy(&mut file, &mut std::io::sink())
                .map_err(|e| OpcError::CorruptArchive(format!("{}: {}", file.name(), e)))?;
        }
        Ok(())
    }

    fn comment(&self) -> &[u8] {
        self.archive.comment()
    }
}

fn corrupt(err: ZipError) -> OpcError {
    OpcError::CorruptArchive(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_members_in_archive_order() {
        let data = build_zip(&[
            ("[Content_Types].xml", b"<Types/>"),
            ("_rels/.rels", b"<Relationships/>"),
            ("word/document.xml", b"<document/>"),
        ]);
        let mut reader = ZipPkgReader::from_bytes(data).unwrap();

        let names: Vec<String> = reader.members().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["[Content_Types].xml", "_rels/.rels", "word/document.xml"]);
        assert_eq!(reader.blob_for("word/document.xml").unwrap(), b"<document/>");
        assert_eq!(reader.len(), 3);
    }

    #[test]
    fn test_missing_member() {
        let data = build_zip(&[("a.xml", b"<a/>")]);
        let mut reader = ZipPkgReader::from_bytes(data).unwrap();
        assert!(matches!(
            reader.blob_for("b.xml"),
            Err(OpcError::PartNotFound(name)) if name == "/b.xml"
        ));
    }

    #[test]
    fn test_not_a_zip() {
        let result = ZipPkgReader::from_bytes(b"definitely not a zip archive".to_vec());
        assert!(matches!(result, Err(OpcError::CorruptArchive(_))));
    }

    #[test]
    fn test_verify_detects_bad_crc() {
        let payload = b"stored payload with a checksum";
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("payload.bin", options).unwrap();
        writer.write_all(payload).unwrap();
        let mut data = writer.finish().unwrap().into_inner();

        let mut reader = ZipPkgReader::from_bytes(data.clone()).unwrap();
        reader.verify().unwrap();

        // Flip a byte of the stored (uncompressed) content.
        let pos = data
            .windows(payload.len())
            .position(|w| w == payload)
            .unwrap();
        data[pos] ^= 0xFF;

        let mut reader = ZipPkgReader::from_bytes(data).unwrap();
        assert!(matches!(reader.verify(), Err(OpcError::CorruptArchive(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ZipPkgReader::open("/nonexistent/fakefile.docx");
        assert!(matches!(result, Err(OpcError::PackageNotFound(_))));
    }
}
