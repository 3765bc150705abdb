//! Lazy loading of archive pages into a grid of reusable cells.
//!
//! Cells are owned by the UI thread. Each time a cell is bound to a catalog
//! position it receives a new generation number; background loads remember
//! the generation they were started for, and their outcome is only applied if
//! the cell still carries that generation when it comes back.

mod dispatch;

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{Arc, Weak},
    time::{Duration, Instant},
};

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, trace, warn};

use crate::{
    archive::ArchiveHandle,
    catalog::Catalog,
    decode::{decode_page, PageImage},
};

use self::dispatch::{Dispatch, Job};

/// Callback used by background loads to wake up the UI thread
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Identifier of a reusable display cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(usize);

impl CellId {
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

/// What a cell currently displays
#[derive(Debug, Clone, Default)]
pub enum CellImage {
    /// Nothing requested yet
    #[default]
    Empty,
    /// A load is in flight for the current binding
    Loading,
    Loaded(Arc<PageImage>),
    /// The page could not be read or decoded
    Placeholder,
}

impl CellImage {
    pub fn page(&self) -> Option<&Arc<PageImage>> {
        match self {
            Self::Loaded(page) => Some(page),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// Association between a cell and the archive entry it represents
#[derive(Debug, Clone)]
pub struct Binding {
    /// Position in the catalog
    pub position: usize,
    /// Index of the entry in the archive handle
    pub index: usize,
    pub generation: u64,
    handle: Weak<dyn ArchiveHandle>,
}

#[derive(Default)]
struct Cell {
    binding: Option<Binding>,
    image: CellImage,
}

struct Completion {
    cell: CellId,
    generation: u64,
    image: CellImage,
}

/// Presenter settings
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenterOptions {
    /// Downscale decoded pages so that neither side exceeds this many pixels
    pub thumbnail_edge: Option<u32>,

    /// Read entries from a single background thread, even if the archive
    /// supports concurrent reads
    pub force_serial: bool,
}

/// Provides cells to a grid
pub trait GridDataSource {
    fn cell_count(&self) -> usize;

    fn make_cell(&mut self) -> CellId;

    fn bind_cell(&mut self, cell: CellId, position: usize);
}

/// Receives display events from a grid
pub trait GridDelegate {
    fn on_will_display(&mut self, cell: CellId);
}

/// Binds the pages of a catalog to grid cells and decodes them on demand
pub struct LazyGridPresenter {
    handle: Weak<dyn ArchiveHandle>,
    catalog: Arc<Catalog>,
    options: PresenterOptions,
    cells: Vec<Cell>,
    next_generation: u64,
    dispatch: Dispatch,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
    in_flight: usize,
    waker: Option<Waker>,
}

impl LazyGridPresenter {
    pub fn new(
        handle: &Arc<dyn ArchiveHandle>,
        catalog: Arc<Catalog>,
        options: PresenterOptions,
    ) -> Self {
        let dispatch = Dispatch::for_concurrency(handle.read_concurrency(), options.force_serial);
        let (completions_tx, completions_rx) = unbounded();

        debug!(
            "Presenting {} pages from {} ({} loading)",
            catalog.len(),
            catalog.source().display(),
            if dispatch.is_serial() { "serial" } else { "parallel" }
        );

        Self {
            handle: Arc::downgrade(handle),
            catalog,
            options,
            cells: vec![],
            next_generation: 0,
            dispatch,
            completions_tx,
            completions_rx,
            in_flight: 0,
            waker: None,
        }
    }

    /// Call the provided function every time a background load finishes
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_serial(&self) -> bool {
        self.dispatch.is_serial()
    }

    /// Number of cells the grid should display
    pub fn cell_count(&self) -> usize {
        self.catalog.len()
    }

    /// Allocate a new, unbound cell
    pub fn make_cell(&mut self) -> CellId {
        self.cells.push(Cell::default());
        CellId(self.cells.len() - 1)
    }

    /// Associate a cell with the page at `position` in the catalog
    ///
    /// Any previous association is replaced, and loads started for it will be
    /// ignored when they complete.
    pub fn bind(&mut self, cell: CellId, position: usize) {
        let generation = self.next_generation;
        self.next_generation += 1;

        let Some(state) = self.cells.get_mut(cell.0) else {
            warn!("Cannot bind unknown cell {cell:?}");
            return;
        };

        state.image = CellImage::Empty;
        state.binding = self.catalog.get(position).map(|entry| Binding {
            position,
            index: entry.index,
            generation,
            handle: Weak::clone(&self.handle),
        });

        if state.binding.is_none() {
            warn!(
                "Position {position} is out of range ({} pages), cell {cell:?} left unbound",
                self.catalog.len()
            );
        }
    }

    /// Detach a cell from its page, e.g. when it scrolls out of view
    pub fn unbind(&mut self, cell: CellId) {
        if let Some(state) = self.cells.get_mut(cell.0) {
            state.binding = None;
            state.image = CellImage::Empty;
        }
    }

    /// Start loading the page bound to a cell, unless it is already loaded or loading
    pub fn will_display(&mut self, cell: CellId) {
        let Some(state) = self.cells.get_mut(cell.0) else {
            warn!("Cannot display unknown cell {cell:?}");
            return;
        };

        let Some(binding) = &state.binding else {
            return;
        };

        if matches!(state.image, CellImage::Loaded(_) | CellImage::Loading) {
            return;
        }

        if binding.handle.strong_count() == 0 {
            debug!("Archive was closed, not loading cell {cell:?}");
            return;
        }

        let handle = Weak::clone(&binding.handle);
        let (index, generation) = (binding.index, binding.generation);
        let max_edge = self.options.thumbnail_edge;
        let completions = self.completions_tx.clone();
        let waker = self.waker.clone();

        let job: Job = Box::new(move || {
            // Queued loads must not keep a closed archive alive
            let image = match handle.upgrade() {
                Some(handle) => {
                    catch_unwind(AssertUnwindSafe(|| load_page(&*handle, index, max_edge)))
                        .unwrap_or_else(|_| {
                            error!("Loading entry {index} panicked");
                            CellImage::Placeholder
                        })
                }
                None => {
                    debug!("Archive was closed before entry {index} could be read");
                    CellImage::Empty
                }
            };

            let completion = Completion {
                cell,
                generation,
                image,
            };

            // The presenter may be gone already, nobody is waiting for this page then
            if completions.send(completion).is_ok() {
                if let Some(waker) = waker {
                    waker();
                }
            }
        });

        state.image = CellImage::Loading;

        match self.dispatch.run(job) {
            Ok(()) => self.in_flight += 1,
            Err(err) => {
                error!("Failed to schedule loading of entry {index}: {err:#}");
                state.image = CellImage::Placeholder;
            }
        }
    }

    /// Apply the outcome of finished loads, returns how many were still relevant
    ///
    /// Must be called from the thread that owns the grid.
    pub fn apply_completions(&mut self) -> usize {
        let mut applied = 0;

        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }

        applied
    }

    /// Like [`Self::apply_completions`], but waits up to `timeout` for at least one load to finish
    pub fn wait_for_completions(&mut self, timeout: Duration) -> usize {
        match self.completions_rx.recv_timeout(timeout) {
            Ok(completion) => usize::from(self.apply(completion)) + self.apply_completions(),
            Err(_) => 0,
        }
    }

    /// Wait until no load is in flight anymore
    /// Returns `false` if the timeout expired first
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());

            if remaining.is_zero() {
                return false;
            }

            self.wait_for_completions(remaining);
        }

        true
    }

    fn apply(&mut self, completion: Completion) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        let Completion {
            cell,
            generation,
            image,
        } = completion;

        let Some(state) = self.cells.get_mut(cell.0) else {
            return false;
        };

        match &state.binding {
            Some(binding) if binding.generation == generation => {
                state.image = image;
                true
            }

            _ => {
                trace!("Discarding stale load for cell {cell:?} (generation {generation})");
                false
            }
        }
    }

    /// Whether a cell is bound to `position` and has its page, or is getting it
    pub fn is_showing(&self, cell: CellId, position: usize) -> bool {
        self.cells.get(cell.0).map_or(false, |state| {
            state.binding.as_ref().map(|b| b.position) == Some(position)
                && matches!(state.image, CellImage::Loaded(_) | CellImage::Loading)
        })
    }

    pub fn cell_image(&self, cell: CellId) -> Option<&CellImage> {
        self.cells.get(cell.0).map(|state| &state.image)
    }

    pub fn cell_binding(&self, cell: CellId) -> Option<&Binding> {
        self.cells.get(cell.0)?.binding.as_ref()
    }

    /// Number of loads started but not yet received back
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl GridDataSource for LazyGridPresenter {
    fn cell_count(&self) -> usize {
        LazyGridPresenter::cell_count(self)
    }

    fn make_cell(&mut self) -> CellId {
        LazyGridPresenter::make_cell(self)
    }

    fn bind_cell(&mut self, cell: CellId, position: usize) {
        self.bind(cell, position);
    }
}

impl GridDelegate for LazyGridPresenter {
    fn on_will_display(&mut self, cell: CellId) {
        self.will_display(cell);
    }
}

/// Read and decode an entry, any failure resulting in the placeholder
fn load_page(handle: &dyn ArchiveHandle, index: usize, max_edge: Option<u32>) -> CellImage {
    let bytes = match handle.read_bytes(index) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!("Failed to read entry {index}: {err}");
            return CellImage::Placeholder;
        }
    };

    match decode_page(&bytes, max_edge) {
        Ok(page) => CellImage::Loaded(Arc::new(page)),
        Err(err) => {
            debug!("Failed to decode entry {index}: {err:#}");
            CellImage::Placeholder
        }
    }
}
