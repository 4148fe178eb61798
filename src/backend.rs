use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde::Deserialize;

use boletera_core::{
    OccupancySet, Order, OrderDraft, Raffle, RaffleDoc, RaffleSlug, SlugError, TicketNumber,
};

/// The three boundary calls the storefront makes. Real deployments put an
/// HTTP client behind this; tests and the CLI use the in-memory fixture.
pub trait StoreBackend {
    fn fetch_raffle(&self, slug: &RaffleSlug) -> Result<Raffle, BackendError>;
    fn fetch_occupied(&self, raffle_id: &str) -> Result<OccupancySet, BackendError>;
    fn submit_order(&self, draft: OrderDraft) -> Result<Order, BackendError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("raffle not found")]
    NotFound,
    #[error("order rejected: {reason}")]
    OrderRejected {
        reason: String,
        conflicting: Vec<TicketNumber>,
    },
    #[error("transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("fixture catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fixture raffle has a bad slug: {0}")]
    Slug(#[from] SlugError),
}

#[derive(Deserialize)]
struct FixtureDoc {
    #[serde(flatten)]
    raffle: RaffleDoc,
    #[serde(default)]
    occupied: Vec<TicketNumber>,
}

const DEMO_CATALOG: &str = include_str!("fixtures/raffles.json");

/// In-memory storefront backend: a small raffle catalog, per-raffle
/// occupancy, and an order ledger. Successful orders occupy their tickets,
/// so a second order for the same numbers collides the way a real
/// double-sale would. `prime_rejection` forces the next submission to fail
/// for exercising the retry path.
pub struct FixtureBackend {
    raffles: Vec<Raffle>,
    occupied: RefCell<HashMap<String, OccupancySet>>,
    orders: RefCell<Vec<Order>>,
    reject_next: RefCell<Option<String>>,
    next_order: Cell<u32>,
}

impl FixtureBackend {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let docs: Vec<FixtureDoc> = serde_json::from_str(json)?;
        let mut raffles = Vec::with_capacity(docs.len());
        let mut occupied = HashMap::new();
        for doc in docs {
            let taken = doc.occupied;
            let raffle = doc.raffle.normalize()?;
            occupied.insert(
                raffle.id.clone(),
                OccupancySet::from_tickets(taken, raffle.ticket_total),
            );
            raffles.push(raffle);
        }
        Ok(Self {
            raffles,
            occupied: RefCell::new(occupied),
            orders: RefCell::new(Vec::new()),
            reject_next: RefCell::new(None),
            next_order: Cell::new(1),
        })
    }

    pub fn demo() -> Result<Self, FixtureError> {
        Self::from_json(DEMO_CATALOG)
    }

    pub fn raffles(&self) -> &[Raffle] {
        &self.raffles
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.borrow().clone()
    }

    /// The next `submit_order` fails with this reason instead of landing.
    pub fn prime_rejection(&self, reason: impl Into<String>) {
        *self.reject_next.borrow_mut() = Some(reason.into());
    }

    fn raffle_by_id(&self, raffle_id: &str) -> Option<&Raffle> {
        self.raffles.iter().find(|raffle| raffle.id == raffle_id)
    }
}

impl StoreBackend for FixtureBackend {
    fn fetch_raffle(&self, slug: &RaffleSlug) -> Result<Raffle, BackendError> {
        self.raffles
            .iter()
            .find(|raffle| raffle.slug == *slug)
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    fn fetch_occupied(&self, raffle_id: &str) -> Result<OccupancySet, BackendError> {
        self.occupied
            .borrow()
            .get(raffle_id)
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    fn submit_order(&self, draft: OrderDraft) -> Result<Order, BackendError> {
        if let Some(reason) = self.reject_next.borrow_mut().take() {
            return Err(BackendError::OrderRejected {
                reason,
                conflicting: Vec::new(),
            });
        }
        let raffle = self
            .raffle_by_id(&draft.raffle_id)
            .ok_or(BackendError::NotFound)?;
        if draft.tickets.is_empty() {
            return Err(BackendError::OrderRejected {
                reason: "order carries no tickets".to_string(),
                conflicting: Vec::new(),
            });
        }
        if let Some(bad) = draft
            .tickets
            .iter()
            .find(|ticket| **ticket == 0 || **ticket > raffle.ticket_total)
        {
            return Err(BackendError::OrderRejected {
                reason: format!("ticket {bad} is outside this raffle"),
                conflicting: vec![*bad],
            });
        }
        let mut occupied = self.occupied.borrow_mut();
        let taken = occupied
            .get_mut(&draft.raffle_id)
            .ok_or(BackendError::NotFound)?;
        let conflicting: Vec<TicketNumber> = draft
            .tickets
            .iter()
            .copied()
            .filter(|ticket| taken.contains(*ticket))
            .collect();
        if !conflicting.is_empty() {
            return Err(BackendError::OrderRejected {
                reason: "tickets were taken by another buyer".to_string(),
                conflicting,
            });
        }
        let merged: Vec<TicketNumber> = taken.iter().chain(draft.tickets.iter().copied()).collect();
        *taken = OccupancySet::from_tickets(merged, raffle.ticket_total);
        let order = Order {
            id: format!("ord-{:04}", self.next_order.get()),
            raffle_id: draft.raffle_id,
            tickets: draft.tickets,
            total: draft.total,
        };
        self.next_order.set(self.next_order.get() + 1);
        self.orders.borrow_mut().push(order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_parses_and_normalizes() {
        let backend = FixtureBackend::demo().expect("demo catalog");
        assert!(!backend.raffles().is_empty());
        let moto = backend
            .raffles()
            .iter()
            .find(|raffle| raffle.slug.as_str() == "gran-rifa-moto")
            .expect("demo raffle present");
        assert_eq!(moto.packs.len(), 2);
        assert_eq!(moto.packs[1].ticket_count, 10);
        assert_eq!(moto.entries_per_ticket, 3);
    }

    #[test]
    fn successful_order_occupies_its_tickets() {
        let backend = FixtureBackend::demo().expect("demo catalog");
        let raffle = backend.raffles()[0].clone();
        let draft = OrderDraft {
            raffle_id: raffle.id.clone(),
            tickets: vec![20, 21],
            total: 100.0,
        };
        backend.submit_order(draft.clone()).expect("first order lands");
        let err = backend.submit_order(draft).expect_err("double sale rejected");
        match err {
            BackendError::OrderRejected { conflicting, .. } => {
                assert_eq!(conflicting, vec![20, 21]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn primed_rejection_fails_once_then_clears() {
        let backend = FixtureBackend::demo().expect("demo catalog");
        let raffle = backend.raffles()[0].clone();
        backend.prime_rejection("payment gateway sneezed");
        let draft = OrderDraft {
            raffle_id: raffle.id.clone(),
            tickets: vec![40],
            total: 50.0,
        };
        assert!(backend.submit_order(draft.clone()).is_err());
        assert!(backend.submit_order(draft).is_ok());
    }
}
