use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to open an archive
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("failed to open {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read ZIP directory")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to read 7z archive: {0}")]
    SevenZ(String),

    #[error("{format} archives are not supported")]
    UnsupportedFormat { format: &'static str },

    #[error("{} is not a recognized comic archive", .0.display())]
    NotRecognized(PathBuf),
}

/// Failure to read a single entry's bytes
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("entry {index} does not exist (archive has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("entry {0} is not a regular file")]
    NotAFile(usize),

    #[error("failed to read entry content")]
    Io(#[from] io::Error),

    #[error("failed to locate entry in archive")]
    Zip(#[from] zip::result::ZipError),

    #[error("entry {index} is unavailable: {reason}")]
    Unavailable { index: usize, reason: &'static str },

    #[error("archive reader was poisoned by a panicking thread")]
    Poisoned,
}

/// Failure to turn bytes into an image
#[derive(Debug, Error)]
#[error("failed to decode image")]
pub struct DecodeError(#[from] pub image::ImageError);

/// Why an archive was deemed impossible to preview
#[derive(Debug, Error)]
pub enum CorruptCause {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error("failed to list entries")]
    Listing(#[source] ReadError),

    #[error("archive has no entries")]
    Empty,

    #[error("archive contains no image pages")]
    NoPages,
}

/// Errors that abort a whole preview
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("cannot preview {}", .path.display())]
    CorruptArchive {
        path: PathBuf,
        #[source]
        cause: CorruptCause,
    },
}

impl PreviewError {
    pub fn corrupt(path: impl Into<PathBuf>, cause: impl Into<CorruptCause>) -> Self {
        Self::CorruptArchive {
            path: path.into(),
            cause: cause.into(),
        }
    }

    pub fn cause(&self) -> &CorruptCause {
        match self {
            Self::CorruptArchive { cause, .. } => cause,
        }
    }
}
