mod image_directory;
mod seven_zip;
mod zip_file;

pub use self::{image_directory::ImageDirectory, seven_zip::SevenZipFile, zip_file::ZipFile};

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;

use crate::error::{OpenError, ReadError};

/// One item as listed by an archive, before any filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Handle-native identifier, stable for the lifetime of the handle
    pub index: usize,
    pub name: String,
    pub is_dir: bool,
}

/// Whether a handle tolerates concurrent [`ArchiveHandle::read_bytes`] calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadConcurrency {
    /// Reads on different entries may run in parallel
    Shared,
    /// Reads need exclusive access to the underlying reader
    Exclusive,
}

/// An opened archive (or anything that looks like one)
pub trait ArchiveHandle: Send + Sync {
    /// Check if a path can be handled by this kind of archive
    /// e.g. is it a file with a specific extension, etc.
    fn item_matches(path: &Path) -> bool
    where
        Self: Sized;

    /// Open the archive at the provided path
    /// Should come after a check from [`ArchiveHandle::item_matches`]
    fn open(path: &Path) -> Result<Self, OpenError>
    where
        Self: Sized;

    /// Path the archive was opened from
    fn path(&self) -> &Path;

    /// List every entry of the archive, in archive order
    fn list_entries(&self) -> Result<Vec<RawEntry>, ReadError>;

    /// Read the full content of an entry
    fn read_bytes(&self, index: usize) -> Result<Vec<u8>, ReadError>;

    fn read_concurrency(&self) -> ReadConcurrency {
        ReadConcurrency::Shared
    }
}

/// Archive formats recognized from a file's first bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    SevenZip,
    Rar,
}

impl ArchiveFormat {
    /// Identify a format from the leading bytes of a file
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.starts_with(b"PK\x03\x04") || header.starts_with(b"PK\x05\x06") {
            Some(Self::Zip)
        } else if header.starts_with(b"7z\xBC\xAF\x27\x1C") {
            Some(Self::SevenZip)
        } else if header.starts_with(b"Rar!\x1A\x07") {
            Some(Self::Rar)
        } else {
            None
        }
    }

    /// Identify a format from a path's extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();

        match ext.as_str() {
            "zip" | "cbz" => Some(Self::Zip),
            "7z" | "cb7" => Some(Self::SevenZip),
            "rar" | "cbr" => Some(Self::Rar),
            _ => None,
        }
    }

    /// Magic bytes win over the extension, as comic files are frequently misnamed
    pub fn detect(path: &Path) -> Option<Self> {
        match read_header(path) {
            Ok(header) => Self::sniff(&header).or_else(|| Self::from_extension(path)),
            Err(err) => {
                debug!("Could not sniff {}: {err}", path.display());
                Self::from_extension(path)
            }
        }
    }
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(8);
    File::open(path)?.take(8).read_to_end(&mut header)?;
    Ok(header)
}

/// Try to open a path as an archive handle
pub fn open_archive(path: &Path) -> Result<Arc<dyn ArchiveHandle>, OpenError> {
    macro_rules! identify_archive {
        ($($handle: ident),+) => {{
            $( if $handle::item_matches(path) {
                return Ok(Arc::new($handle::open(path)?))
            } )+
        }}
    }

    identify_archive!(ImageDirectory, ZipFile, SevenZipFile);

    if !path.exists() {
        return Err(OpenError::Io {
            path: path.to_path_buf(),
            source: std::io::ErrorKind::NotFound.into(),
        });
    }

    match ArchiveFormat::detect(path) {
        Some(ArchiveFormat::Rar) => Err(OpenError::UnsupportedFormat { format: "RAR" }),
        _ => Err(OpenError::NotRecognized(PathBuf::from(path))),
    }
}
