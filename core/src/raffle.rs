use std::collections::BTreeSet;

use serde::Deserialize;

use crate::slug::{RaffleSlug, SlugError};

pub type TicketNumber = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct Pack {
    pub name: Option<String>,
    pub ticket_count: u32,
    pub price: f64,
}

#[derive(Clone, Debug)]
pub struct Raffle {
    pub id: String,
    pub slug: RaffleSlug,
    pub title: String,
    pub price_per_ticket: f64,
    pub ticket_total: u32,
    pub packs: Vec<Pack>,
    pub entries_per_ticket: u32,
    pub draw_label: Option<String>,
}

impl Raffle {
    pub fn bonus_entries_active(&self) -> bool {
        self.entries_per_ticket > 1
    }
}

/// Wire shape of a pack as the catalog API serves it. Older records carry
/// the ticket count under `q` instead of `tickets`; both land in the same
/// canonical field here so nothing downstream ever sees the raw split.
#[derive(Clone, Debug, Deserialize)]
pub struct PackDoc {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "q")]
    pub tickets: Option<u32>,
    pub price: f64,
}

impl PackDoc {
    pub fn normalize(self) -> Option<Pack> {
        let ticket_count = self.tickets?;
        if ticket_count == 0 || !(self.price > 0.0) {
            return None;
        }
        Some(Pack {
            name: self.name,
            ticket_count,
            price: self.price,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RaffleDoc {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub tickets: u32,
    #[serde(default)]
    pub packs: Vec<PackDoc>,
    #[serde(default, rename = "boletosConOportunidades")]
    pub bonus_entries: bool,
    #[serde(default, rename = "numeroOportunidades")]
    pub entry_multiplier: u32,
    #[serde(default, rename = "fecha")]
    pub draw_label: Option<String>,
}

impl RaffleDoc {
    pub fn normalize(self) -> Result<Raffle, SlugError> {
        let slug = RaffleSlug::parse(&self.slug)?;
        let entries_per_ticket = if self.bonus_entries {
            self.entry_multiplier.max(1)
        } else {
            1
        };
        let packs = self
            .packs
            .into_iter()
            .filter_map(PackDoc::normalize)
            .collect();
        Ok(Raffle {
            id: self.id,
            slug,
            title: self.title,
            price_per_ticket: self.price,
            ticket_total: self.tickets,
            packs,
            entries_per_ticket,
            draw_label: self.draw_label,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct OccupancyDoc {
    #[serde(default)]
    pub tickets: Vec<TicketNumber>,
}

/// Point-in-time set of sold or reserved ticket numbers. Immutable for one
/// page visit; only a fresh fetch replaces it. Numbers outside `[1, total]`
/// are dropped on ingestion so membership stays within the ticket space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancySet {
    taken: BTreeSet<TicketNumber>,
}

impl OccupancySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tickets(tickets: impl IntoIterator<Item = TicketNumber>, total: u32) -> Self {
        let taken = tickets
            .into_iter()
            .filter(|ticket| *ticket >= 1 && *ticket <= total)
            .collect();
        Self { taken }
    }

    pub fn from_doc(doc: OccupancyDoc, total: u32) -> Self {
        Self::from_tickets(doc.tickets, total)
    }

    pub fn contains(&self, ticket: TicketNumber) -> bool {
        self.taken.contains(&ticket)
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TicketNumber> + '_ {
        self.taken.iter().copied()
    }

    pub fn available_count(&self, total: u32) -> u32 {
        total - self.taken.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_doc_accepts_tickets_or_q() {
        let from_tickets: PackDoc =
            serde_json::from_str(r#"{ "name": "Combo 5", "tickets": 5, "price": 200.0 }"#)
                .expect("pack with tickets field");
        let from_q: PackDoc =
            serde_json::from_str(r#"{ "q": 5, "price": 200.0 }"#).expect("pack with q field");
        assert_eq!(from_tickets.normalize().expect("valid pack").ticket_count, 5);
        assert_eq!(from_q.normalize().expect("valid pack").ticket_count, 5);
    }

    #[test]
    fn pack_doc_drops_invalid_records() {
        let missing: PackDoc =
            serde_json::from_str(r#"{ "name": "sin cupo", "price": 10.0 }"#).expect("parse");
        let zero: PackDoc = serde_json::from_str(r#"{ "tickets": 0, "price": 10.0 }"#)
            .expect("parse");
        let free: PackDoc = serde_json::from_str(r#"{ "tickets": 3, "price": 0.0 }"#)
            .expect("parse");
        assert_eq!(missing.normalize(), None);
        assert_eq!(zero.normalize(), None);
        assert_eq!(free.normalize(), None);
    }

    #[test]
    fn raffle_doc_collapses_bonus_fields() {
        let doc: RaffleDoc = serde_json::from_str(
            r#"{
                "id": "r1",
                "slug": "gran-rifa",
                "title": "Gran Rifa",
                "price": 50.0,
                "tickets": 100,
                "boletosConOportunidades": true,
                "numeroOportunidades": 3
            }"#,
        )
        .expect("raffle doc");
        let raffle = doc.normalize().expect("normalize");
        assert_eq!(raffle.entries_per_ticket, 3);
        assert!(raffle.bonus_entries_active());

        let disabled: RaffleDoc = serde_json::from_str(
            r#"{
                "id": "r2",
                "slug": "rifa-plana",
                "title": "Rifa Plana",
                "price": 50.0,
                "tickets": 100,
                "numeroOportunidades": 4
            }"#,
        )
        .expect("raffle doc");
        let raffle = disabled.normalize().expect("normalize");
        assert_eq!(raffle.entries_per_ticket, 1);
        assert!(!raffle.bonus_entries_active());
    }

    #[test]
    fn occupancy_drops_out_of_range_numbers() {
        let set = OccupancySet::from_tickets([0, 1, 50, 100, 101], 100);
        assert_eq!(set.len(), 3);
        assert!(set.contains(1));
        assert!(set.contains(100));
        assert!(!set.contains(0));
        assert!(!set.contains(101));
        assert_eq!(set.available_count(100), 97);
    }
}
