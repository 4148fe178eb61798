use crate::raffle::{OccupancySet, TicketNumber};

/// Ordered working list of ticket numbers for display and sampling.
///
/// With `hide_occupied` unset the list is every available ticket ascending
/// followed by every occupied ticket ascending, covering `[1, total]` exactly
/// once. With it set, only the available tickets remain. A zero `total`
/// yields an empty list; downstream treats that as nothing to display.
pub fn build_universe(
    total: u32,
    occupancy: &OccupancySet,
    hide_occupied: bool,
) -> Vec<TicketNumber> {
    let capacity = if hide_occupied {
        occupancy.available_count(total) as usize
    } else {
        total as usize
    };
    let mut universe = Vec::with_capacity(capacity);
    for ticket in 1..=total {
        if !occupancy.contains(ticket) {
            universe.push(ticket);
        }
    }
    if !hide_occupied {
        universe.extend(occupancy.iter());
    }
    universe
}
