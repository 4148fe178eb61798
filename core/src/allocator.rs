use rand::Rng;

use crate::error::EngineError;
use crate::raffle::{OccupancySet, TicketNumber};
use crate::universe::build_universe;

/// Draws `quantity` distinct unoccupied tickets uniformly at random.
///
/// Partial Fisher-Yates over the available pool: position `i` swaps with a
/// uniformly random position `>= i`, and the first `quantity` positions are
/// the draw. Runs in `O(available)` and gives every unoccupied ticket equal
/// probability. When the pool is too small the draw fails whole, carrying
/// the actual remaining count; nothing is allocated partially.
///
/// The result is in draw order; callers sort ascending for display.
pub fn draw_tickets(
    total: u32,
    occupancy: &OccupancySet,
    quantity: u32,
    rng: &mut impl Rng,
) -> Result<Vec<TicketNumber>, EngineError> {
    let mut available = build_universe(total, occupancy, true);
    let wanted = quantity as usize;
    if available.len() < wanted {
        return Err(EngineError::InsufficientAvailability {
            requested: quantity,
            available: available.len() as u32,
        });
    }
    for i in 0..wanted {
        let j = rng.random_range(i..available.len());
        available.swap(i, j);
    }
    available.truncate(wanted);
    Ok(available)
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn zero_quantity_draws_nothing() {
        let occupancy = OccupancySet::new();
        let mut rng = SmallRng::seed_from_u64(7);
        let drawn = draw_tickets(10, &occupancy, 0, &mut rng).expect("empty draw");
        assert!(drawn.is_empty());
    }

    #[test]
    fn full_pool_draw_is_a_permutation() {
        let occupancy = OccupancySet::from_tickets([2, 4], 6);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut drawn = draw_tickets(6, &occupancy, 4, &mut rng).expect("draw all");
        drawn.sort_unstable();
        assert_eq!(drawn, vec![1, 3, 5, 6]);
    }
}
