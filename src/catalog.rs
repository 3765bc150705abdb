use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    archive::{ArchiveHandle, RawEntry},
    decode::{decode_page, PageSize},
    error::{CorruptCause, PreviewError},
};

/// List of supported image extensions (used for filtering)
pub static IMG_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Check if an archive entry name looks like a comic page
///
/// Hidden files and macOS resource forks (`__MACOSX/`) are never pages, even
/// when their extension says otherwise.
pub fn is_page_name(name: &str) -> bool {
    if name.ends_with('/') {
        return false;
    }

    let mut components = name.split(['/', '\\']).filter(|c| !c.is_empty());

    if components.any(|c| c.starts_with('.') || c == "__MACOSX") {
        return false;
    }

    let Some(ext) = Path::new(name).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMG_EXTENSIONS
        .iter()
        .any(|candidate| ext.eq_ignore_ascii_case(candidate))
}

/// Natural ordering of entry names: `page2` comes before `page10`
///
/// Comparison ignores case first, then falls back to the exact name so that the
/// order stays total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    alphanumeric_sort::compare_str(a.to_lowercase(), b.to_lowercase())
        .then_with(|| alphanumeric_sort::compare_str(a, b))
}

/// A displayable page of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Identifier in the archive handle (not the position in the catalog)
    pub index: usize,
    pub name: String,
}

impl Entry {
    pub fn is_displayable(&self) -> bool {
        is_page_name(&self.name)
    }
}

/// Pages of an archive, in reading order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    source: PathBuf,
    entries: Vec<Entry>,
}

impl Catalog {
    /// List, filter and sort the pages of an archive
    pub fn build(handle: &dyn ArchiveHandle) -> Result<Self, PreviewError> {
        let source = handle.path();

        let raw_entries = handle
            .list_entries()
            .map_err(|err| PreviewError::corrupt(source, CorruptCause::Listing(err)))?;

        if raw_entries.is_empty() {
            return Err(PreviewError::corrupt(source, CorruptCause::Empty));
        }

        let total = raw_entries.len();

        let mut entries = raw_entries
            .into_iter()
            .filter(|RawEntry { is_dir, .. }| !is_dir)
            .map(|RawEntry { index, name, .. }| Entry { index, name })
            .filter(Entry::is_displayable)
            .collect::<Vec<_>>();

        if entries.is_empty() {
            return Err(PreviewError::corrupt(source, CorruptCause::NoPages));
        }

        entries.sort_by(|a, b| natural_cmp(&a.name, &b.name).then(a.index.cmp(&b.index)));

        info!(
            "Found {} pages out of {total} entries in {}",
            entries.len(),
            source.display()
        );

        Ok(Self {
            source: source.to_path_buf(),
            entries,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&Entry> {
        self.entries.get(position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Size of the first page, assumed to be representative of the whole book
///
/// This is only advisory: any failure results in [`PageSize::FALLBACK`].
pub fn first_page_size(handle: &dyn ArchiveHandle, catalog: &Catalog) -> PageSize {
    let Some(first) = catalog.get(0) else {
        return PageSize::FALLBACK;
    };

    let decoded = handle
        .read_bytes(first.index)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| decode_page(&bytes, None).map_err(anyhow::Error::from));

    match decoded {
        Ok(page) => page.size(),
        Err(err) => {
            debug!(
                "Could not probe size of first page '{}': {err:#}",
                first.name
            );
            PageSize::FALLBACK
        }
    }
}
