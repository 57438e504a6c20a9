//! OPC package I/O: the ZIP container around the document parts.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::DocxError;

/// Largest decompressed size accepted for a single part.
pub const MAX_PART_BYTES: u64 = 32 * 1024 * 1024;
/// Largest decompressed size accepted for the whole package.
pub const MAX_PACKAGE_BYTES: u64 = 128 * 1024 * 1024;
/// Upper bound on the buffer preallocated from a size the archive declares.
const PART_CAPACITY_HINT: usize = 1024 * 1024;

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

/// Every entry of the archive, in archive order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    entries: Vec<PackageEntry>,
}

impl Package {
    pub fn read(bytes: &[u8]) -> Result<Self, DocxError> {
        Self::read_with_limits(bytes, MAX_PART_BYTES, MAX_PACKAGE_BYTES)
    }

    /// Reads the archive, rejecting any part that inflates past `part_limit`
    /// bytes or a package that inflates past `package_limit` bytes in total.
    ///
    /// Declared sizes come from the uploader, so they only serve as an early
    /// rejection and a bounded allocation hint; the actual read is capped too.
    pub fn read_with_limits(
        bytes: &[u8],
        part_limit: u64,
        package_limit: u64,
    ) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());
        let mut total: u64 = 0;

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let name = file.name().to_string();
            if file.size() > part_limit {
                return Err(DocxError::PartTooLarge {
                    name,
                    limit: part_limit,
                });
            }

            let hint = usize::try_from(file.size())
                .unwrap_or(PART_CAPACITY_HINT)
                .min(PART_CAPACITY_HINT);
            let mut data = Vec::with_capacity(hint);
            file.by_ref()
                .take(part_limit.saturating_add(1))
                .read_to_end(&mut data)?;
            if data.len() as u64 > part_limit {
                return Err(DocxError::PartTooLarge {
                    name,
                    limit: part_limit,
                });
            }

            total = total.saturating_add(data.len() as u64);
            if total > package_limit {
                return Err(DocxError::PackageTooLarge {
                    limit: package_limit,
                });
            }

            entries.push(PackageEntry {
                name,
                is_dir: file.is_dir(),
                data,
            });
        }

        Ok(Self { entries })
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| !e.is_dir && e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// Replaces the named part, or appends it if the package has none.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_string(),
                data,
                is_dir: false,
            }),
        }
    }

    #[cfg(test)]
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn write(&self) -> Result<Vec<u8>, DocxError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in &self.entries {
            if entry.is_dir {
                writer.add_directory(entry.name.as_str(), options)?;
                continue;
            }
            writer.start_file(entry.name.as_str(), options)?;
            writer.write_all(&entry.data)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}
