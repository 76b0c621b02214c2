//! Physical OPC package (ZIP file) access.
//!
//! All members are read into memory when a package is opened and written back
//! in their original order on save. Only parts that were replaced through
//! [`Package::set_part`] change; everything else is copied byte for byte.

use crate::common::xml::XmlDocument;
use crate::error::{Error, Result};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

use super::template;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const PACKAGE_RELS_PART: &str = "_rels/.rels";
pub const DEFAULT_MAIN_DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the buffer reserved from a member's declared size.
const MAX_PREALLOCATION: u64 = 1 << 24;

const RT_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// A member of the package.
#[derive(Debug, Clone)]
struct PackagePart {
    name: String,
    data: Vec<u8>,
}

/// In-memory OPC package.
#[derive(Debug, Clone)]
pub struct Package {
    parts: Vec<PackagePart>,
}

impl Package {
    /// Open a package from a file path.
    ///
    /// # Errors
    /// [`Error::InputNotFound`] if the file does not exist, a ZIP error if it
    /// is not a valid archive.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::InputNotFound(path.display().to_string()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Read a package from owned bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(preallocation(file.size()));
            file.read_to_end(&mut data)?;
            parts.push(PackagePart { name, data });
        }

        Ok(Self { parts })
    }

    /// A fresh package holding the blank document template.
    pub fn blank() -> Self {
        let parts = template::PARTS
            .iter()
            .map(|(name, content)| PackagePart {
                name: (*name).to_string(),
                data: content.as_bytes().to_vec(),
            })
            .collect();
        Self { parts }
    }

    /// Get a part's bytes by member name.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Replace a part's bytes, appending the part if it does not exist.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(PackagePart {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// List all member names in the package.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Member name of the main document part.
    ///
    /// Resolved through the package relationships, falling back to
    /// `word/document.xml` when they are missing.
    pub fn main_document_part_name(&self) -> Result<String> {
        let Some(rels) = self.part(PACKAGE_RELS_PART) else {
            return Ok(DEFAULT_MAIN_DOCUMENT_PART.to_string());
        };

        let rels = XmlDocument::parse(rels)?;
        let target = rels
            .root
            .elements()
            .filter(|e| e.name == "Relationship")
            .find(|e| e.attr("Type") == Some(RT_OFFICE_DOCUMENT))
            .and_then(|e| e.attr("Target"));

        Ok(match target {
            Some(target) => target.trim_start_matches('/').to_string(),
            None => DEFAULT_MAIN_DOCUMENT_PART.to_string(),
        })
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for part in &self.parts {
            writer.start_file(part.name.as_str(), options)?;
            writer.write_all(&part.data)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// The header size is untrusted; larger members grow the buffer while reading.
fn preallocation(declared: u64) -> usize {
    declared.min(MAX_PREALLOCATION) as usize
}
