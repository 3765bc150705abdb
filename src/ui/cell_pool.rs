use std::{collections::BTreeMap, ops::Range};

use quickcomic::{CellId, GridDataSource, GridDelegate};

/// Recycles cells as positions scroll in and out of view
///
/// Cells leaving the visible range go to a reuse queue and keep their old
/// binding until they are bound again.
#[derive(Default)]
pub struct CellPool {
    visible: BTreeMap<usize, CellId>,
    reusable: Vec<CellId>,
}

impl CellPool {
    /// Make `range` the set of visible positions
    ///
    /// Positions entering the view get a (possibly recycled) cell bound to them
    /// and are announced to the delegate, once.
    pub fn show<G>(&mut self, grid: &mut G, range: Range<usize>) -> Vec<(usize, CellId)>
    where
        G: GridDataSource + GridDelegate,
    {
        let range = range.start..range.end.min(grid.cell_count());

        let hidden = self
            .visible
            .keys()
            .filter(|position| !range.contains(position))
            .copied()
            .collect::<Vec<_>>();

        for position in hidden {
            if let Some(cell) = self.visible.remove(&position) {
                self.reusable.push(cell);
            }
        }

        range
            .map(|position| {
                let cell = match self.visible.get(&position) {
                    Some(&cell) => cell,
                    None => {
                        let cell = self.reusable.pop().unwrap_or_else(|| grid.make_cell());
                        grid.bind_cell(cell, position);
                        grid.on_will_display(cell);
                        self.visible.insert(position, cell);
                        cell
                    }
                };

                (position, cell)
            })
            .collect()
    }

    /// Total number of cells ever created
    #[cfg(test)]
    pub fn allocated(&self) -> usize {
        self.visible.len() + self.reusable.len()
    }
}
