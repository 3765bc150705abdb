use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::Mutex,
};

use zip::ZipArchive;

use crate::error::{OpenError, ReadError};

use super::{ArchiveFormat, ArchiveHandle, RawEntry, ReadConcurrency};

/// ZIP/CBZ archive handler
pub struct ZipFile {
    path: PathBuf,
    archive: Mutex<ZipArchive<File>>,
}

impl ArchiveHandle for ZipFile {
    fn item_matches(path: &Path) -> bool
    where
        Self: Sized,
    {
        path.is_file() && ArchiveFormat::detect(path) == Some(ArchiveFormat::Zip)
    }

    fn open(path: &Path) -> Result<Self, OpenError>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(|source| OpenError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let archive = ZipArchive::new(file)?;

        Ok(Self {
            path: path.to_path_buf(),
            archive: Mutex::new(archive),
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn list_entries(&self) -> Result<Vec<RawEntry>, ReadError> {
        let mut archive = self.lock()?;
        let mut entries = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let item = archive.by_index(index)?;

            entries.push(RawEntry {
                index,
                name: item.name().to_owned(),
                is_dir: item.is_dir(),
            });
        }

        Ok(entries)
    }

    fn read_bytes(&self, index: usize) -> Result<Vec<u8>, ReadError> {
        let mut archive = self.lock()?;

        if index >= archive.len() {
            return Err(ReadError::IndexOutOfRange {
                index,
                len: archive.len(),
            });
        }

        let mut file = archive.by_index(index)?;

        if !file.is_file() {
            return Err(ReadError::NotAFile(index));
        }

        let mut out = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut out)?;

        Ok(out)
    }

    // `ZipArchive` seeks a single shared file descriptor
    fn read_concurrency(&self) -> ReadConcurrency {
        ReadConcurrency::Exclusive
    }
}

impl ZipFile {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ZipArchive<File>>, ReadError> {
        self.archive.lock().map_err(|_| ReadError::Poisoned)
    }
}
