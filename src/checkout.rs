use rand::Rng;

use boletera_core::pricing::{self, PriceRequest, Quote};
use boletera_core::{
    draw_tickets, EngineError, HandoffError, OccupancySet, Order, OrderDraft, PurchaseIntent,
    Raffle, RaffleSlug, TicketNumber,
};

use crate::backend::{BackendError, StoreBackend};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CheckoutError {
    #[error("checkout link is invalid: {0}")]
    BadLink(#[from] HandoffError),
    #[error("{0}")]
    Backend(#[from] BackendError),
    #[error("{0}")]
    Engine(#[from] EngineError),
    #[error("pack {index} is not in this raffle's catalog")]
    UnknownPack { index: usize },
    #[error("ticket {ticket} is outside this raffle")]
    TicketOutsideRaffle { ticket: TicketNumber },
    #[error("tickets no longer available: {tickets:?}")]
    TicketsTaken { tickets: Vec<TicketNumber> },
}

/// Purchase state rebuilt on the checkout view from the hand-off query and a
/// fresh raffle + occupancy fetch. Pricing goes through the same quote path
/// the raffle view uses, so both pages always show one price for one
/// selection.
#[derive(Debug)]
pub struct CheckoutFlow {
    raffle: Raffle,
    occupancy: OccupancySet,
    intent: PurchaseIntent,
    tickets: Vec<TicketNumber>,
    quote: Quote,
}

impl CheckoutFlow {
    /// Decodes the hand-off, re-fetches the raffle and its occupancy, and
    /// re-validates the intent against the new snapshot. Ticket intents that
    /// collide with fresh occupancy are reported whole; pack intents draw
    /// fresh concrete tickets (a hand-off never pins an allocation).
    pub fn begin(
        backend: &dyn StoreBackend,
        slug: &RaffleSlug,
        query: &str,
        rng: &mut impl Rng,
    ) -> Result<Self, CheckoutError> {
        let intent = PurchaseIntent::from_query(query)?;
        let raffle = backend.fetch_raffle(slug)?;
        let occupancy = backend.fetch_occupied(&raffle.id)?;
        if raffle.ticket_total == 0 {
            return Err(EngineError::InvalidRaffleState.into());
        }
        let (tickets, request) = match &intent {
            PurchaseIntent::Tickets { tickets } => {
                if let Some(ticket) = tickets.iter().find(|t| **t > raffle.ticket_total) {
                    return Err(CheckoutError::TicketOutsideRaffle { ticket: *ticket });
                }
                let taken: Vec<TicketNumber> = tickets
                    .iter()
                    .copied()
                    .filter(|ticket| occupancy.contains(*ticket))
                    .collect();
                if !taken.is_empty() {
                    return Err(CheckoutError::TicketsTaken { tickets: taken });
                }
                let request = PriceRequest::Tickets {
                    count: tickets.len() as u32,
                };
                (tickets.clone(), request)
            }
            PurchaseIntent::Pack { index, quantity } => {
                let pack = raffle
                    .packs
                    .get(*index)
                    .ok_or(CheckoutError::UnknownPack { index: *index })?;
                // A hand-off carries any u32 quantity; an overflowed product
                // is never satisfiable, so saturate and let the draw report
                // the shortfall.
                let wanted = pack.ticket_count.saturating_mul(*quantity);
                let mut drawn = draw_tickets(raffle.ticket_total, &occupancy, wanted, rng)?;
                drawn.sort_unstable();
                let request = PriceRequest::Pack {
                    index: *index,
                    quantity: *quantity,
                };
                (drawn, request)
            }
        };
        let quote = pricing::quote(
            request,
            &raffle.packs,
            raffle.price_per_ticket,
            raffle.entries_per_ticket,
        )
        .ok_or_else(|| match request {
            PriceRequest::Pack { index, .. } => CheckoutError::UnknownPack { index },
            PriceRequest::Tickets { .. } => EngineError::InvalidRaffleState.into(),
        })?;
        Ok(Self {
            raffle,
            occupancy,
            intent,
            tickets,
            quote,
        })
    }

    pub fn raffle(&self) -> &Raffle {
        &self.raffle
    }

    pub fn occupancy(&self) -> &OccupancySet {
        &self.occupancy
    }

    pub fn intent(&self) -> &PurchaseIntent {
        &self.intent
    }

    /// Concrete tickets the order will carry, ascending.
    pub fn tickets(&self) -> &[TicketNumber] {
        &self.tickets
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn order_draft(&self) -> OrderDraft {
        OrderDraft {
            raffle_id: self.raffle.id.clone(),
            tickets: self.tickets.clone(),
            total: self.quote.total,
        }
    }

    /// Submits the order. On failure the flow is untouched, selection
    /// included, so the user can retry without re-picking; nothing is
    /// re-allocated automatically.
    pub fn submit(&self, backend: &dyn StoreBackend) -> Result<Order, CheckoutError> {
        backend
            .submit_order(self.order_draft())
            .map_err(|err| match err {
                BackendError::OrderRejected { conflicting, .. } if !conflicting.is_empty() => {
                    CheckoutError::TicketsTaken {
                        tickets: conflicting,
                    }
                }
                BackendError::OrderRejected { reason, .. } => {
                    EngineError::OrderSubmissionFailure { reason }.into()
                }
                other => CheckoutError::Backend(other),
            })
    }
}
