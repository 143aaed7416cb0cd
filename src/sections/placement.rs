//! Tick placement strategies.
//!
//! ## Grid
//!
//! A run of ticks lands in the row holding the first empty cell (one past
//! the last non-empty cell). If that row's advantage cell is already ticked
//! the run moves to the start of the next row instead.
//!
//! When the run is longer than the room left in the row, but the row itself
//! is long enough and its trailing cells hold nothing but empties or
//! sentinels, the run overwrites those trailing cells. Otherwise as much of
//! the run as fits is written and the rest is dropped. A run never spills into
//! another row.
//!
//! ## Slot
//!
//! Each addressed slot receives a sentinel.

use super::definition::{GridLayout, SectionLayout, SlotLayout, EMPTY_CELL, SENTINEL};

/// Writes tick runs into a section's cell array.
pub trait TickPlacer {
    /// Place `run` into `ticks`. Grid layouts ignore `slots`; slot layouts
    /// ignore the run values.
    fn place(&self, ticks: &mut [u8], run: &[u8], slots: &[usize]);

    /// Check if no further placement is possible.
    fn is_full(&self, ticks: &[u8]) -> bool;
}

impl TickPlacer for GridLayout {
    fn place(&self, ticks: &mut [u8], run: &[u8], _slots: &[usize]) {
        let first_empty = ticks
            .iter()
            .rposition(|&cell| cell != EMPTY_CELL)
            .map_or(0, |last| last + 1);
        let Some(mut row) = self.row_of(first_empty) else {
            return;
        };

        let offset = if ticks[self.advantage_cell(row)] != EMPTY_CELL {
            row += 1;
            if row >= self.row_count() {
                return;
            }
            0
        } else {
            let range = self.row_range(row);
            ticks[range.clone()]
                .iter()
                .position(|&cell| cell == EMPTY_CELL)
                .unwrap_or(range.len())
        };

        let range = self.row_range(row);
        let row_cells = &mut ticks[range];
        let row_len = row_cells.len();
        let capacity = row_len - offset;

        if capacity < run.len()
            && row_len >= run.len()
            && row_cells[row_len - run.len()..]
                .iter()
                .all(|&cell| cell == EMPTY_CELL || cell == SENTINEL)
        {
            row_cells[row_len - run.len()..].copy_from_slice(run);
            return;
        }

        let written = run.len().min(capacity);
        row_cells[offset..offset + written].copy_from_slice(&run[..written]);
    }

    fn is_full(&self, ticks: &[u8]) -> bool {
        match self.row_count().checked_sub(1) {
            Some(last) => ticks
                .get(self.advantage_cell(last))
                .is_some_and(|&cell| cell != EMPTY_CELL),
            None => true,
        }
    }
}

impl TickPlacer for SlotLayout {
    fn place(&self, ticks: &mut [u8], _run: &[u8], slots: &[usize]) {
        for &slot in slots {
            if let Some(cell) = ticks.get_mut(slot) {
                *cell = SENTINEL;
            }
        }
    }

    fn is_full(&self, ticks: &[u8]) -> bool {
        ticks.iter().all(|&cell| cell != EMPTY_CELL)
    }
}

impl SectionLayout {
    /// Placement strategy for this layout.
    #[must_use]
    pub fn placer(&self) -> &dyn TickPlacer {
        match self {
            SectionLayout::Grid(grid) => grid,
            SectionLayout::Slot(slots) => slots,
        }
    }
}
