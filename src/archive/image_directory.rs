use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{OpenError, ReadError};

use super::{ArchiveHandle, RawEntry};

/// Handler for directory of images, treated as an unpacked archive
pub struct ImageDirectory {
    path: PathBuf,
    files: Vec<(String, PathBuf)>,
}

impl ArchiveHandle for ImageDirectory {
    fn item_matches(path: &Path) -> bool
    where
        Self: Sized,
    {
        path.is_dir()
    }

    fn open(path: &Path) -> Result<Self, OpenError>
    where
        Self: Sized,
    {
        let io_err = |source| OpenError::Io {
            path: path.to_path_buf(),
            source,
        };

        let items = fs::read_dir(path)
            .map_err(io_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_err)?;

        // read_dir order is unspecified, indexes must not depend on it
        let mut files = items
            .into_iter()
            .filter_map(|item| {
                let path = item.path();

                if !path.is_file() {
                    return None;
                }

                let name = path.file_name()?.to_str()?.to_owned();
                Some((name, path))
            })
            .collect::<Vec<_>>();

        files.sort();

        Ok(Self {
            path: path.to_path_buf(),
            files,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn list_entries(&self) -> Result<Vec<RawEntry>, ReadError> {
        Ok(self
            .files
            .iter()
            .enumerate()
            .map(|(index, (name, _))| RawEntry {
                index,
                name: name.clone(),
                is_dir: false,
            })
            .collect())
    }

    fn read_bytes(&self, index: usize) -> Result<Vec<u8>, ReadError> {
        let (_, page_path) = self.files.get(index).ok_or(ReadError::IndexOutOfRange {
            index,
            len: self.files.len(),
        })?;

        Ok(fs::read(page_path)?)
    }
}
