use boletera_core::{build_universe, OccupancySet};

#[test]
fn full_board_covers_every_ticket_once() {
    let occupancy = OccupancySet::from_tickets([5, 10, 15], 100);
    let universe = build_universe(100, &occupancy, false);
    assert_eq!(universe.len(), 100);
    let mut sorted = universe.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (1..=100).collect::<Vec<_>>());
}

#[test]
fn available_block_precedes_occupied_block() {
    let occupancy = OccupancySet::from_tickets([2, 4], 6);
    let universe = build_universe(6, &occupancy, false);
    assert_eq!(universe, vec![1, 3, 5, 6, 2, 4]);
}

#[test]
fn hide_occupied_keeps_only_available_ascending() {
    let occupancy = OccupancySet::from_tickets([5, 10, 15], 100);
    let universe = build_universe(100, &occupancy, true);
    assert_eq!(universe.len(), 97);
    assert!(universe.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(universe.iter().all(|&ticket| !occupancy.contains(ticket)));
}

#[test]
fn zero_total_yields_empty_universe() {
    let occupancy = OccupancySet::new();
    assert!(build_universe(0, &occupancy, false).is_empty());
    assert!(build_universe(0, &occupancy, true).is_empty());
}

#[test]
fn fully_occupied_board_is_one_taken_block() {
    let occupancy = OccupancySet::from_tickets(1..=4, 4);
    assert_eq!(build_universe(4, &occupancy, false), vec![1, 2, 3, 4]);
    assert!(build_universe(4, &occupancy, true).is_empty());
}

#[test]
fn out_of_range_occupancy_never_reaches_the_board() {
    let occupancy = OccupancySet::from_tickets([3, 0, 99], 5);
    let universe = build_universe(5, &occupancy, false);
    assert_eq!(universe, vec![1, 2, 4, 5, 3]);
}
