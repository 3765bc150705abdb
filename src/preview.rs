use std::{path::Path, sync::Arc};

use log::info;

use crate::{
    archive::{open_archive, ArchiveHandle},
    catalog::{first_page_size, Catalog},
    decode::PageSize,
    error::PreviewError,
    presenter::{LazyGridPresenter, PresenterOptions},
};

/// Everything needed to display one archive
///
/// The session is the only strong owner of the archive handle: presenters and
/// their background loads only refer to it weakly, and stop loading new pages
/// once the session is dropped. Loads still queued at that point are skipped.
pub struct PreviewSession {
    handle: Arc<dyn ArchiveHandle>,
    catalog: Arc<Catalog>,
    page_size: PageSize,
}

/// Open an archive and prepare it for display
///
/// Fails only if the archive cannot be opened or contains no page at all.
pub fn prepare(path: &Path) -> Result<PreviewSession, PreviewError> {
    let handle = open_archive(path).map_err(|err| PreviewError::corrupt(path, err))?;

    let catalog = Catalog::build(&*handle)?;
    let page_size = first_page_size(&*handle, &catalog);

    info!(
        "Prepared preview of {} ({} pages, {}x{})",
        path.display(),
        catalog.len(),
        page_size.width,
        page_size.height
    );

    Ok(PreviewSession {
        handle,
        catalog: Arc::new(catalog),
        page_size,
    })
}

impl PreviewSession {
    pub fn handle(&self) -> &Arc<dyn ArchiveHandle> {
        &self.handle
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Advisory size of the pages, from the first one
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Create a presenter for this session's pages
    pub fn presenter(&self, options: PresenterOptions) -> LazyGridPresenter {
        LazyGridPresenter::new(&self.handle, Arc::clone(&self.catalog), options)
    }
}
