use std::collections::BTreeSet;

use crate::error::EngineError;
use crate::raffle::{OccupancySet, TicketNumber};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Tickets the user has tentatively chosen. Disjoint from the occupancy set
/// at all times: occupied tickets are rejected on toggle, and a newly applied
/// occupancy snapshot evicts anything it now covers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    chosen: BTreeSet<TicketNumber>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(
        &mut self,
        ticket: TicketNumber,
        occupancy: &OccupancySet,
    ) -> Result<ToggleOutcome, EngineError> {
        if occupancy.contains(ticket) {
            return Err(EngineError::OccupiedTicketSelected { ticket });
        }
        if self.chosen.remove(&ticket) {
            Ok(ToggleOutcome::Removed)
        } else {
            self.chosen.insert(ticket);
            Ok(ToggleOutcome::Added)
        }
    }

    /// Unconditional replacement. Callers guarantee the new tickets are
    /// disjoint from occupancy; the allocator does so by construction.
    pub fn replace_all(&mut self, tickets: impl IntoIterator<Item = TicketNumber>) {
        self.chosen = tickets.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.chosen.clear();
    }

    /// Removes tickets a fresh occupancy snapshot now marks taken and
    /// returns them ascending, so the caller can tell the user what was
    /// dropped.
    pub fn evict_occupied(&mut self, occupancy: &OccupancySet) -> Vec<TicketNumber> {
        let evicted: Vec<TicketNumber> = self
            .chosen
            .iter()
            .copied()
            .filter(|ticket| occupancy.contains(*ticket))
            .collect();
        for ticket in &evicted {
            self.chosen.remove(ticket);
        }
        evicted
    }

    pub fn contains(&self, ticket: TicketNumber) -> bool {
        self.chosen.contains(&ticket)
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TicketNumber> + '_ {
        self.chosen.iter().copied()
    }

    pub fn to_sorted_vec(&self) -> Vec<TicketNumber> {
        self.chosen.iter().copied().collect()
    }
}
