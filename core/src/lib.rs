pub mod allocator;
pub mod board;
pub mod error;
pub mod handoff;
pub mod order;
pub mod pricing;
pub mod raffle;
pub mod selection;
pub mod slug;
pub mod universe;

pub use allocator::draw_tickets;
pub use board::{
    cell_index, cell_state, clamp_page, columns_for_width, grid_for, page_count, page_slice,
    row_cells, step_page, ticket_at, visible_rows, BoardGrid, CellState, COLUMN_BREAKPOINTS,
    MIN_CELL_PX, PAGE_JUMP, ROW_OVERSCAN, TICKETS_PER_PAGE,
};
pub use error::EngineError;
pub use handoff::{HandoffError, PurchaseIntent};
pub use order::{Order, OrderDraft};
pub use pricing::{auto_match, quote, PriceMode, PriceRequest, Quote, DEFAULT_PACK_QUANTITY};
pub use raffle::{OccupancyDoc, OccupancySet, Pack, PackDoc, Raffle, RaffleDoc, TicketNumber};
pub use selection::{SelectionSet, ToggleOutcome};
pub use slug::{is_valid_slug, RaffleSlug, SlugError, SLUG_MAX_LEN};
pub use universe::build_universe;
