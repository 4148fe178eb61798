use crate::raffle::Pack;

pub const DEFAULT_PACK_QUANTITY: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceRequest {
    Tickets { count: u32 },
    Pack { index: usize, quantity: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceMode {
    Individual,
    AutoMatched { pack_index: usize },
    ExplicitPack { pack_index: usize, quantity: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    pub mode: PriceMode,
    pub ticket_count: u32,
    pub total: f64,
    pub unit_equivalent_price: f64,
    pub savings: f64,
    pub entries_per_ticket: u32,
    pub total_entries: u32,
}

impl Quote {
    /// Savings line for the UI: only an automatic match that actually beats
    /// the per-ticket total gets one.
    pub fn displayed_savings(&self) -> Option<f64> {
        match self.mode {
            PriceMode::AutoMatched { .. } if self.savings > 0.0 => Some(self.savings),
            _ => None,
        }
    }

    pub fn bonus_entries(&self) -> u32 {
        self.total_entries.saturating_sub(self.ticket_count)
    }
}

/// First pack whose size equals the selection, in catalog order. When two
/// packs share a size (data anomaly) the earlier one wins; kept as product
/// behavior.
pub fn auto_match(selection_len: u32, packs: &[Pack]) -> Option<usize> {
    if selection_len == 0 {
        return None;
    }
    packs
        .iter()
        .position(|pack| pack.ticket_count == selection_len)
}

/// The one pricing path for every surface that shows a total. Returns `None`
/// for requests that reference a pack the catalog does not have, ask for a
/// zero pack quantity, or whose ticket or entry total does not fit in `u32`.
///
/// Bonus entries multiply the displayed entry count, never the price.
pub fn quote(
    request: PriceRequest,
    packs: &[Pack],
    price_per_ticket: f64,
    entries_per_ticket: u32,
) -> Option<Quote> {
    let entries_per_ticket = entries_per_ticket.max(1);
    let built = match request {
        PriceRequest::Tickets { count } => {
            let naive_total = count as f64 * price_per_ticket;
            let total_entries = count.checked_mul(entries_per_ticket)?;
            match auto_match(count, packs) {
                Some(pack_index) => {
                    let pack = &packs[pack_index];
                    Quote {
                        mode: PriceMode::AutoMatched { pack_index },
                        ticket_count: count,
                        total: pack.price,
                        unit_equivalent_price: unit_price(pack.price, count),
                        savings: naive_total - pack.price,
                        entries_per_ticket,
                        total_entries,
                    }
                }
                None => Quote {
                    mode: PriceMode::Individual,
                    ticket_count: count,
                    total: naive_total,
                    unit_equivalent_price: unit_price(naive_total, count),
                    savings: 0.0,
                    entries_per_ticket,
                    total_entries,
                },
            }
        }
        PriceRequest::Pack { index, quantity } => {
            if quantity == 0 {
                return None;
            }
            let pack = packs.get(index)?;
            let ticket_count = pack.ticket_count.checked_mul(quantity)?;
            let total_entries = ticket_count.checked_mul(entries_per_ticket)?;
            let total = pack.price * quantity as f64;
            Quote {
                mode: PriceMode::ExplicitPack {
                    pack_index: index,
                    quantity,
                },
                ticket_count,
                total,
                unit_equivalent_price: unit_price(total, ticket_count),
                savings: 0.0,
                entries_per_ticket,
                total_entries,
            }
        }
    };
    Some(built)
}

fn unit_price(total: f64, ticket_count: u32) -> f64 {
    if ticket_count == 0 {
        0.0
    } else {
        total / ticket_count as f64
    }
}
