use std::ops::Range;

use crate::raffle::{OccupancySet, TicketNumber};
use crate::selection::SelectionSet;

pub const TICKETS_PER_PAGE: u32 = 50;
pub const PAGE_JUMP: i32 = 10;
pub const MIN_CELL_PX: f32 = 44.0;
pub const ROW_OVERSCAN: u32 = 2;

pub const COLUMN_BREAKPOINTS: [(f32, u32); 5] = [
    (0.0, 5),
    (480.0, 8),
    (768.0, 10),
    (1024.0, 13),
    (1440.0, 16),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Available,
    Selected,
    Occupied,
}

pub fn cell_state(
    ticket: TicketNumber,
    selection: &SelectionSet,
    occupancy: &OccupancySet,
) -> CellState {
    if occupancy.contains(ticket) {
        CellState::Occupied
    } else if selection.contains(ticket) {
        CellState::Selected
    } else {
        CellState::Available
    }
}

/// Pages are 1-based. An empty universe still reports one page so the
/// cursor always has a valid home.
pub fn page_count(universe_len: usize, page_size: u32) -> u32 {
    let size = page_size.max(1) as usize;
    (universe_len.div_ceil(size) as u32).max(1)
}

pub fn clamp_page(page: u32, universe_len: usize, page_size: u32) -> u32 {
    page.clamp(1, page_count(universe_len, page_size))
}

/// Steps the cursor by `delta` pages, clamped to valid bounds. Stepping past
/// either end parks at the edge page, never errors.
pub fn step_page(page: u32, delta: i32, universe_len: usize, page_size: u32) -> u32 {
    let stepped = (page as i64 + delta as i64).max(1) as u32;
    clamp_page(stepped, universe_len, page_size)
}

pub fn page_slice(universe: &[TicketNumber], page: u32, page_size: u32) -> &[TicketNumber] {
    let size = page_size.max(1) as usize;
    let page = clamp_page(page, universe.len(), page_size);
    let start = (page as usize - 1) * size;
    let end = (start + size).min(universe.len());
    if start >= universe.len() {
        &[]
    } else {
        &universe[start..end]
    }
}

/// Column count for the measured container width, or `None` while the width
/// is unknown (the scroll board shows a loading placeholder until then).
/// Discrete breakpoints pick the count; the tap-target floor caps it so a
/// cell never shrinks below `MIN_CELL_PX`.
pub fn columns_for_width(width: f32) -> Option<u32> {
    if !width.is_finite() || width <= 0.0 {
        return None;
    }
    let mut columns = COLUMN_BREAKPOINTS[0].1;
    for (min_width, cols) in COLUMN_BREAKPOINTS {
        if width >= min_width {
            columns = cols;
        }
    }
    let tap_cap = (width / MIN_CELL_PX).floor() as u32;
    Some(columns.min(tap_cap).max(1))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardGrid {
    pub columns: u32,
    pub rows: u32,
    pub cell_count: u32,
}

pub fn grid_for(universe_len: usize, width: f32) -> Option<BoardGrid> {
    let columns = columns_for_width(width)?;
    let cell_count = universe_len as u32;
    Some(BoardGrid {
        columns,
        rows: cell_count.div_ceil(columns),
        cell_count,
    })
}

/// Logical grid addressing: linear index of a cell, independent of any
/// rendering layer.
pub fn cell_index(row: u32, col: u32, columns: u32) -> usize {
    row as usize * columns as usize + col as usize
}

/// Ticket behind a cell, or `None` when the cell falls outside the universe
/// (trailing cells of the last partial row render empty).
pub fn ticket_at(
    universe: &[TicketNumber],
    row: u32,
    col: u32,
    columns: u32,
) -> Option<TicketNumber> {
    if columns == 0 || col >= columns {
        return None;
    }
    universe.get(cell_index(row, col, columns)).copied()
}

pub fn row_cells(
    universe: &[TicketNumber],
    row: u32,
    columns: u32,
) -> Vec<Option<TicketNumber>> {
    (0..columns)
        .map(|col| ticket_at(universe, row, col, columns))
        .collect()
}

/// Rows intersecting the viewport, widened by `ROW_OVERSCAN` on each side
/// and clamped to the grid. Degenerate geometry yields an empty range.
pub fn visible_rows(
    scroll_top: f32,
    viewport_height: f32,
    row_height: f32,
    total_rows: u32,
) -> Range<u32> {
    if !row_height.is_finite() || row_height <= 0.0 || viewport_height <= 0.0 {
        return 0..0;
    }
    let top = scroll_top.max(0.0);
    let first = (top / row_height).floor() as u32;
    let last = ((top + viewport_height) / row_height).ceil() as u32;
    let first = first.saturating_sub(ROW_OVERSCAN).min(total_rows);
    let last = last.saturating_add(ROW_OVERSCAN).min(total_rows);
    first..last
}
