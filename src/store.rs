use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use boletera_core::board::{self, BoardGrid, CellState, PAGE_JUMP, TICKETS_PER_PAGE};
use boletera_core::pricing::{self, PriceRequest, Quote, DEFAULT_PACK_QUANTITY};
use boletera_core::{
    build_universe, draw_tickets, EngineError, OccupancySet, PurchaseIntent, Raffle,
    SelectionSet, TicketNumber,
};

pub type StoreSubscriber = Rc<dyn Fn()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Ready,
    NotFound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayMode {
    Paged,
    Scroll,
}

/// Outcome of applying a fetch completion against the store's current load
/// generation. Stale completions belong to a view the user already left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Stale,
}

/// User-facing condition raised by a store mutation. One slot; a newer
/// notice replaces an undismissed older one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    TicketTaken { ticket: TicketNumber },
    NotEnoughTickets { requested: u32, available: u32 },
    SelectionTrimmed { tickets: Vec<TicketNumber> },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::TicketTaken { ticket } => {
                format!("ticket {ticket} is already taken")
            }
            Notice::NotEnoughTickets {
                requested,
                available,
            } => {
                format!("only {available} tickets are still available, requested {requested}")
            }
            Notice::SelectionTrimmed { tickets } => {
                let list = tickets
                    .iter()
                    .map(|ticket| ticket.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("tickets no longer available and removed from your selection: {list}")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TicketCell {
    pub ticket: TicketNumber,
    pub state: CellState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackView {
    pub index: usize,
    pub quantity: u32,
    pub tickets: Vec<TicketNumber>,
}

#[derive(Clone, Debug)]
struct PackPurchase {
    index: usize,
    quantity: u32,
    tickets: Vec<TicketNumber>,
}

struct StoreState {
    phase: LoadPhase,
    load_generation: u64,
    raffle: Option<Raffle>,
    occupancy: OccupancySet,
    hide_occupied: bool,
    universe: Vec<TicketNumber>,
    selection: SelectionSet,
    pack: Option<PackPurchase>,
    display_mode: DisplayMode,
    page: u32,
    viewport_width: Option<f32>,
    notice: Option<Notice>,
    rng: SmallRng,
}

impl StoreState {
    fn new(rng: SmallRng) -> Self {
        Self {
            phase: LoadPhase::Idle,
            load_generation: 0,
            raffle: None,
            occupancy: OccupancySet::new(),
            hide_occupied: false,
            universe: Vec::new(),
            selection: SelectionSet::new(),
            pack: None,
            display_mode: DisplayMode::Paged,
            page: 1,
            viewport_width: None,
            notice: None,
            rng,
        }
    }

    fn ticket_total(&self) -> u32 {
        self.raffle.as_ref().map(|raffle| raffle.ticket_total).unwrap_or(0)
    }

    fn rebuild_universe(&mut self) {
        self.universe = build_universe(self.ticket_total(), &self.occupancy, self.hide_occupied);
        self.page = board::clamp_page(self.page, self.universe.len(), TICKETS_PER_PAGE);
    }

    fn draw(&mut self, quantity: u32) -> Result<Vec<TicketNumber>, EngineError> {
        let total = self.ticket_total();
        let mut drawn = draw_tickets(total, &self.occupancy, quantity, &mut self.rng)?;
        drawn.sort_unstable();
        Ok(drawn)
    }

    fn price_request(&self) -> Option<PriceRequest> {
        if let Some(pack) = &self.pack {
            return Some(PriceRequest::Pack {
                index: pack.index,
                quantity: pack.quantity,
            });
        }
        let count = self.selection.len() as u32;
        if count == 0 {
            None
        } else {
            Some(PriceRequest::Tickets { count })
        }
    }
}

/// Current derived view of one raffle page: plain data plus index helpers for
/// the two board modes. Cell states live in a vector parallel to `universe`.
#[derive(Clone)]
pub struct StoreSnapshot {
    pub phase: LoadPhase,
    pub raffle: Option<Raffle>,
    pub hide_occupied: bool,
    pub display_mode: DisplayMode,
    pub universe: Vec<TicketNumber>,
    pub cell_states: Vec<CellState>,
    pub available_count: u32,
    pub page: u32,
    pub page_count: u32,
    pub grid: Option<BoardGrid>,
    pub selection: Vec<TicketNumber>,
    pub pack: Option<PackView>,
    pub quote: Option<Quote>,
    pub notice: Option<Notice>,
}

impl StoreSnapshot {
    pub fn universe_len(&self) -> usize {
        self.universe.len()
    }

    /// Cells of the current page, in universe order.
    pub fn page_cells(&self) -> Vec<TicketCell> {
        let page = board::clamp_page(self.page, self.universe.len(), TICKETS_PER_PAGE);
        let start = (page as usize - 1) * TICKETS_PER_PAGE as usize;
        board::page_slice(&self.universe, page, TICKETS_PER_PAGE)
            .iter()
            .enumerate()
            .map(|(i, ticket)| TicketCell {
                ticket: *ticket,
                state: self.cell_states[start + i],
            })
            .collect()
    }

    /// Cell behind a scroll-grid position; `None` past the universe end
    /// (trailing cells of the last row stay empty).
    pub fn cell(&self, row: u32, col: u32) -> Option<TicketCell> {
        let grid = self.grid?;
        let ticket = board::ticket_at(&self.universe, row, col, grid.columns)?;
        let index = board::cell_index(row, col, grid.columns);
        Some(TicketCell {
            ticket,
            state: self.cell_states[index],
        })
    }

    /// Rows intersecting a viewport window, materialized as cell options.
    pub fn visible_row_cells(
        &self,
        scroll_top: f32,
        viewport_height: f32,
        row_height: f32,
    ) -> Vec<(u32, Vec<Option<TicketCell>>)> {
        let Some(grid) = self.grid else {
            return Vec::new();
        };
        board::visible_rows(scroll_top, viewport_height, row_height, grid.rows)
            .map(|row| {
                let cells = (0..grid.columns).map(|col| self.cell(row, col)).collect();
                (row, cells)
            })
            .collect()
    }
}

struct SnapshotBuffer {
    front: StoreSnapshot,
    back: StoreSnapshot,
}

impl SnapshotBuffer {
    fn new(state: &StoreState) -> Self {
        let snapshot = build_snapshot_from_state(state);
        Self {
            front: snapshot.clone(),
            back: snapshot,
        }
    }

    fn refresh_from_state(&mut self, state: &StoreState) {
        self.back = build_snapshot_from_state(state);
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

fn build_snapshot_from_state(state: &StoreState) -> StoreSnapshot {
    let cell_states = state
        .universe
        .iter()
        .map(|ticket| board::cell_state(*ticket, &state.selection, &state.occupancy))
        .collect();
    let quote = state.price_request().and_then(|request| {
        let raffle = state.raffle.as_ref()?;
        pricing::quote(
            request,
            &raffle.packs,
            raffle.price_per_ticket,
            raffle.entries_per_ticket,
        )
    });
    StoreSnapshot {
        phase: state.phase,
        raffle: state.raffle.clone(),
        hide_occupied: state.hide_occupied,
        display_mode: state.display_mode,
        universe: state.universe.clone(),
        cell_states,
        available_count: state.occupancy.available_count(state.ticket_total()),
        page: state.page,
        page_count: board::page_count(state.universe.len(), TICKETS_PER_PAGE),
        grid: state
            .viewport_width
            .and_then(|width| board::grid_for(state.universe.len(), width)),
        selection: state.selection.to_sorted_vec(),
        pack: state.pack.as_ref().map(|pack| PackView {
            index: pack.index,
            quantity: pack.quantity,
            tickets: pack.tickets.clone(),
        }),
        quote,
        notice: state.notice.clone(),
    }
}

pub struct RaffleStore {
    state: RefCell<StoreState>,
    snapshots: RefCell<SnapshotBuffer>,
    subscribers: Rc<RefCell<Vec<StoreSubscriber>>>,
}

impl RaffleStore {
    pub fn new() -> Rc<Self> {
        Self::with_rng(SmallRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic store for tests and seeded CLI runs.
    pub fn with_seed(seed: u64) -> Rc<Self> {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Rc<Self> {
        let state = StoreState::new(rng);
        let snapshots = SnapshotBuffer::new(&state);
        Rc::new(Self {
            state: RefCell::new(state),
            snapshots: RefCell::new(snapshots),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub fn subscribe(&self, subscriber: StoreSubscriber) -> StoreSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        StoreSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.snapshots.borrow().front.clone()
    }

    fn notify(&self) {
        {
            let state = self.state.borrow();
            let mut snapshots = self.snapshots.borrow_mut();
            snapshots.refresh_from_state(&state);
        }
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }

    /// Marks the view loading and returns the generation the eventual fetch
    /// completion must present. Bumping the generation is what cancels any
    /// fetch still in flight for the previous view.
    pub fn begin_load(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.load_generation += 1;
        let generation = state.load_generation;
        state.phase = LoadPhase::Loading;
        state.raffle = None;
        state.occupancy = OccupancySet::new();
        state.universe.clear();
        state.selection.clear();
        state.pack = None;
        state.page = 1;
        state.notice = None;
        drop(state);
        self.notify();
        generation
    }

    pub fn apply_loaded(
        &self,
        generation: u64,
        raffle: Raffle,
        occupancy: OccupancySet,
    ) -> LoadOutcome {
        let mut state = self.state.borrow_mut();
        if generation != state.load_generation {
            return LoadOutcome::Stale;
        }
        state.phase = LoadPhase::Ready;
        state.raffle = Some(raffle);
        state.occupancy = occupancy;
        state.selection.clear();
        state.pack = None;
        state.page = 1;
        state.rebuild_universe();
        drop(state);
        self.notify();
        LoadOutcome::Applied
    }

    pub fn apply_not_found(&self, generation: u64) -> LoadOutcome {
        let mut state = self.state.borrow_mut();
        if generation != state.load_generation {
            return LoadOutcome::Stale;
        }
        state.phase = LoadPhase::NotFound;
        state.raffle = None;
        state.universe.clear();
        drop(state);
        self.notify();
        LoadOutcome::Applied
    }

    /// Applies a re-fetched occupancy snapshot. Selected tickets the new
    /// snapshot marks taken are evicted and reported; a pack allocation is
    /// redrawn against the new pool, or dropped when the pool got too small.
    pub fn apply_occupancy(&self, generation: u64, occupancy: OccupancySet) -> LoadOutcome {
        let mut state = self.state.borrow_mut();
        if generation != state.load_generation || state.phase != LoadPhase::Ready {
            return LoadOutcome::Stale;
        }
        let evicted = state.selection.evict_occupied(&occupancy);
        state.occupancy = occupancy;
        if !evicted.is_empty() {
            state.notice = Some(Notice::SelectionTrimmed { tickets: evicted });
        }
        if let Some(pack) = state.pack.clone() {
            let wanted = pack_draw_size(&state, pack.index, pack.quantity);
            match wanted.map(|size| state.draw(size)) {
                Some(Ok(tickets)) => {
                    state.pack = Some(PackPurchase {
                        tickets,
                        ..pack
                    });
                }
                Some(Err(EngineError::InsufficientAvailability {
                    requested,
                    available,
                })) => {
                    state.pack = None;
                    state.notice = Some(Notice::NotEnoughTickets {
                        requested,
                        available,
                    });
                }
                _ => {
                    state.pack = None;
                }
            }
        }
        state.rebuild_universe();
        drop(state);
        self.notify();
        LoadOutcome::Applied
    }

    /// Single activation path for both board modes. Occupied cells warn and
    /// change nothing; anything else toggles, which also leaves pack mode.
    pub fn activate_ticket(&self, ticket: TicketNumber) {
        let mut state = self.state.borrow_mut();
        if state.phase != LoadPhase::Ready {
            return;
        }
        let outcome = {
            let state = &mut *state;
            state.selection.toggle(ticket, &state.occupancy)
        };
        match outcome {
            Ok(_) => {
                state.pack = None;
                state.notice = None;
            }
            Err(EngineError::OccupiedTicketSelected { ticket }) => {
                state.notice = Some(Notice::TicketTaken { ticket });
            }
            Err(_) => {}
        }
        drop(state);
        self.notify();
    }

    pub fn activate_cell(&self, row: u32, col: u32) {
        let ticket = {
            let state = self.state.borrow();
            let grid = state
                .viewport_width
                .and_then(|width| board::grid_for(state.universe.len(), width));
            let Some(grid) = grid else {
                return;
            };
            board::ticket_at(&state.universe, row, col, grid.columns)
        };
        if let Some(ticket) = ticket {
            self.activate_ticket(ticket);
        }
    }

    /// Casino-style draw: replaces the whole selection with `quantity`
    /// random available tickets. Runs again freely; each spin is an
    /// independent draw.
    pub fn quick_pick(&self, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let mut state = self.state.borrow_mut();
        if state.phase != LoadPhase::Ready {
            return;
        }
        match state.draw(quantity) {
            Ok(tickets) => {
                state.pack = None;
                state.selection.replace_all(tickets);
                state.notice = None;
            }
            Err(EngineError::InsufficientAvailability {
                requested,
                available,
            }) => {
                state.notice = Some(Notice::NotEnoughTickets {
                    requested,
                    available,
                });
            }
            Err(_) => {}
        }
        drop(state);
        self.notify();
    }

    /// Enters explicit pack mode: clears the manual selection and draws the
    /// concrete tickets backing the pack.
    pub fn choose_pack(&self, index: usize) {
        self.set_pack(index, DEFAULT_PACK_QUANTITY);
    }

    pub fn set_pack_quantity(&self, quantity: u32) {
        let index = {
            let state = self.state.borrow();
            match &state.pack {
                Some(pack) => pack.index,
                None => return,
            }
        };
        self.set_pack(index, quantity);
    }

    fn set_pack(&self, index: usize, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let mut state = self.state.borrow_mut();
        if state.phase != LoadPhase::Ready {
            return;
        }
        let Some(size) = pack_draw_size(&state, index, quantity) else {
            return;
        };
        match state.draw(size) {
            Ok(tickets) => {
                state.selection.clear();
                state.pack = Some(PackPurchase {
                    index,
                    quantity,
                    tickets,
                });
                state.notice = None;
            }
            Err(EngineError::InsufficientAvailability {
                requested,
                available,
            }) => {
                state.notice = Some(Notice::NotEnoughTickets {
                    requested,
                    available,
                });
            }
            Err(_) => {}
        }
        drop(state);
        self.notify();
    }

    /// Fresh independent draw of whatever is currently allocated: the pack
    /// tickets in pack mode, or a same-sized quick pick otherwise.
    pub fn spin_again(&self) {
        let (pack, selection_len) = {
            let state = self.state.borrow();
            (
                state.pack.as_ref().map(|pack| (pack.index, pack.quantity)),
                state.selection.len() as u32,
            )
        };
        match pack {
            Some((index, quantity)) => self.set_pack(index, quantity),
            None if selection_len > 0 => self.quick_pick(selection_len),
            None => {}
        }
    }

    /// Leaves pack mode and empties the selection.
    pub fn clear_pack(&self) {
        let mut state = self.state.borrow_mut();
        state.pack = None;
        state.selection.clear();
        drop(state);
        self.notify();
    }

    pub fn set_hide_occupied(&self, hide: bool) {
        let mut state = self.state.borrow_mut();
        if state.hide_occupied == hide {
            return;
        }
        state.hide_occupied = hide;
        state.rebuild_universe();
        drop(state);
        self.notify();
    }

    pub fn set_page(&self, page: u32) {
        let mut state = self.state.borrow_mut();
        let clamped = board::clamp_page(page, state.universe.len(), TICKETS_PER_PAGE);
        if clamped == state.page {
            return;
        }
        state.page = clamped;
        drop(state);
        self.notify();
    }

    pub fn step_page(&self, delta: i32) {
        let mut state = self.state.borrow_mut();
        let stepped = board::step_page(state.page, delta, state.universe.len(), TICKETS_PER_PAGE);
        if stepped == state.page {
            return;
        }
        state.page = stepped;
        drop(state);
        self.notify();
    }

    pub fn jump_page_forward(&self) {
        self.step_page(PAGE_JUMP);
    }

    pub fn jump_page_back(&self) {
        self.step_page(-PAGE_JUMP);
    }

    pub fn set_display_mode(&self, mode: DisplayMode) {
        let mut state = self.state.borrow_mut();
        if state.display_mode == mode {
            return;
        }
        state.display_mode = mode;
        drop(state);
        self.notify();
    }

    pub fn set_viewport_width(&self, width: f32) {
        let mut state = self.state.borrow_mut();
        state.viewport_width = Some(width);
        drop(state);
        self.notify();
    }

    pub fn dismiss_notice(&self) {
        let mut state = self.state.borrow_mut();
        if state.notice.is_none() {
            return;
        }
        state.notice = None;
        drop(state);
        self.notify();
    }

    /// Hand-off payload for the checkout view, or `None` when nothing is
    /// chosen yet.
    pub fn purchase_intent(&self) -> Option<PurchaseIntent> {
        let state = self.state.borrow();
        if let Some(pack) = &state.pack {
            return Some(PurchaseIntent::Pack {
                index: pack.index,
                quantity: pack.quantity,
            });
        }
        if state.selection.is_empty() {
            None
        } else {
            Some(PurchaseIntent::Tickets {
                tickets: state.selection.to_sorted_vec(),
            })
        }
    }
}

// Saturates on overflow; the draw reports the shortfall.
fn pack_draw_size(state: &StoreState, index: usize, quantity: u32) -> Option<u32> {
    let raffle = state.raffle.as_ref()?;
    let pack = raffle.packs.get(index)?;
    Some(pack.ticket_count.saturating_mul(quantity))
}

pub struct StoreSubscription {
    subscriber: StoreSubscriber,
    subscribers: Rc<RefCell<Vec<StoreSubscriber>>>,
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}
