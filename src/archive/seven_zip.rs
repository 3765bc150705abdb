use std::{
    io::Read,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use sevenz_rust::{Password, SevenZArchiveEntry, SevenZReader};

use crate::{
    catalog::is_page_name,
    error::{OpenError, ReadError},
};

use super::{ArchiveFormat, ArchiveHandle, RawEntry};

enum Content {
    /// Not a page candidate, never kept in memory
    Skipped,
    Page(Vec<u8>),
    /// Extraction failed, e.g. on a checksum mismatch
    Damaged,
}

struct StoredEntry {
    name: String,
    is_dir: bool,
    content: Content,
}

/// 7z/CB7 archive handler
///
/// 7z archives are usually solid, so random access to a single entry would mean
/// decompressing the whole block it lives in. Page contents are extracted once
/// at open time instead, and stay in memory for the lifetime of the handle.
///
/// An entry that fails to extract is only marked as damaged, and reading it
/// later fails. Corruption the decoder cannot get past (broken headers, or a
/// solid block that cannot be resumed) still fails the whole `open`.
pub struct SevenZipFile {
    path: PathBuf,
    entries: Vec<StoredEntry>,
}

impl ArchiveHandle for SevenZipFile {
    fn item_matches(path: &Path) -> bool
    where
        Self: Sized,
    {
        path.is_file() && ArchiveFormat::detect(path) == Some(ArchiveFormat::SevenZip)
    }

    fn open(path: &Path) -> Result<Self, OpenError>
    where
        Self: Sized,
    {
        let mut reader = SevenZReader::open(path, Password::empty())
            .map_err(|err| OpenError::SevenZ(err.to_string()))?;

        let mut entries = vec![];

        reader
            .for_each_entries(|entry: &SevenZArchiveEntry, reader: &mut dyn Read| {
                let is_dir = entry.is_directory();
                let name = entry.name().to_owned();

                let content = if is_dir || !is_page_name(&name) {
                    Content::Skipped
                } else {
                    let mut bytes = vec![];

                    match reader.read_to_end(&mut bytes) {
                        Ok(_) => Content::Page(bytes),
                        Err(err) => {
                            warn!("Failed to extract {name} from {}: {err}", path.display());
                            Content::Damaged
                        }
                    }
                };

                entries.push(StoredEntry {
                    name,
                    is_dir,
                    content,
                });

                Ok(true)
            })
            .map_err(|err| OpenError::SevenZ(err.to_string()))?;

        debug!(
            "Extracted {} page candidates out of {} entries from {}",
            entries
                .iter()
                .filter(|e| matches!(e.content, Content::Page(_)))
                .count(),
            entries.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn list_entries(&self) -> Result<Vec<RawEntry>, ReadError> {
        Ok(self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| RawEntry {
                index,
                name: entry.name.clone(),
                is_dir: entry.is_dir,
            })
            .collect())
    }

    fn read_bytes(&self, index: usize) -> Result<Vec<u8>, ReadError> {
        let entry = self.entries.get(index).ok_or(ReadError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })?;

        if entry.is_dir {
            return Err(ReadError::NotAFile(index));
        }

        match &entry.content {
            Content::Page(bytes) => Ok(bytes.clone()),
            Content::Skipped => Err(ReadError::Unavailable {
                index,
                reason: "not extracted as it is not an image page",
            }),
            Content::Damaged => Err(ReadError::Unavailable {
                index,
                reason: "damaged in the archive",
            }),
        }
    }
}
