use std::collections::{BTreeSet, HashMap};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use boletera_core::{draw_tickets, EngineError, OccupancySet};

#[test]
fn draw_returns_distinct_available_tickets() {
    let occupancy = OccupancySet::from_tickets([5, 10, 15], 100);
    let mut rng = SmallRng::seed_from_u64(21);
    let drawn = draw_tickets(100, &occupancy, 10, &mut rng).expect("draw");
    assert_eq!(drawn.len(), 10);
    let unique: BTreeSet<_> = drawn.iter().copied().collect();
    assert_eq!(unique.len(), 10);
    for &ticket in &drawn {
        assert!((1..=100).contains(&ticket));
        assert!(!occupancy.contains(ticket));
    }
}

#[test]
fn same_seed_reproduces_the_draw() {
    let occupancy = OccupancySet::from_tickets([7], 50);
    let mut first = SmallRng::seed_from_u64(0xFEED);
    let mut second = SmallRng::seed_from_u64(0xFEED);
    assert_eq!(
        draw_tickets(50, &occupancy, 5, &mut first).expect("draw"),
        draw_tickets(50, &occupancy, 5, &mut second).expect("draw"),
    );
}

#[test]
fn oversized_draw_fails_whole_with_the_real_count() {
    let occupancy = OccupancySet::from_tickets([1, 2, 3], 10);
    let mut rng = SmallRng::seed_from_u64(21);
    let err = draw_tickets(10, &occupancy, 10, &mut rng).expect_err("pool too small");
    assert_eq!(
        err,
        EngineError::InsufficientAvailability {
            requested: 10,
            available: 7,
        }
    );
}

#[test]
fn draw_can_exhaust_the_pool() {
    let occupancy = OccupancySet::from_tickets([2], 5);
    let mut rng = SmallRng::seed_from_u64(3);
    let mut drawn = draw_tickets(5, &occupancy, 4, &mut rng).expect("draw all");
    drawn.sort_unstable();
    assert_eq!(drawn, vec![1, 3, 4, 5]);
}

#[test]
fn every_available_ticket_is_drawn_with_similar_frequency() {
    let occupancy = OccupancySet::from_tickets([3, 6], 10);
    let trials = 8_000u32;
    let mut counts: HashMap<u32, u32> = HashMap::new();
    for seed in 0..trials {
        let mut rng = SmallRng::seed_from_u64(seed as u64);
        let drawn = draw_tickets(10, &occupancy, 1, &mut rng).expect("single draw");
        *counts.entry(drawn[0]).or_insert(0) += 1;
    }
    assert_eq!(counts.len(), 8);
    let expected = trials / 8;
    for (&ticket, &count) in &counts {
        assert!(!occupancy.contains(ticket));
        assert!(
            count > expected * 85 / 100 && count < expected * 115 / 100,
            "ticket {ticket} drawn {count} times, expected near {expected}"
        );
    }
}
