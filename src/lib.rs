//! Thumbnail grid previews of comic book archives (CBZ, CB7, image folders).
//!
//! [`preview::prepare`] opens an archive and lists its pages in reading order,
//! [`presenter::LazyGridPresenter`] then decodes pages on demand for the cells
//! of a grid, off the UI thread.

pub mod archive;
pub mod catalog;
pub mod decode;
pub mod error;
pub mod presenter;
pub mod preview;

pub use self::{
    catalog::{first_page_size, Catalog, Entry},
    decode::{PageImage, PageSize},
    error::{CorruptCause, DecodeError, OpenError, PreviewError, ReadError},
    presenter::{CellId, CellImage, GridDataSource, GridDelegate, LazyGridPresenter},
    preview::{prepare, PreviewSession},
};
