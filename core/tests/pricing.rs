use boletera_core::pricing::{auto_match, quote, PriceMode, PriceRequest};
use boletera_core::Pack;

fn pack(name: &str, ticket_count: u32, price: f64) -> Pack {
    Pack {
        name: Some(name.to_string()),
        ticket_count,
        price,
    }
}

fn demo_packs() -> Vec<Pack> {
    vec![pack("Combo 5", 5, 200.0), pack("Combo 10", 10, 350.0)]
}

#[test]
fn matching_count_substitutes_the_pack_price() {
    let packs = demo_packs();
    let quoted = quote(PriceRequest::Tickets { count: 5 }, &packs, 50.0, 1).expect("quote");
    assert_eq!(quoted.mode, PriceMode::AutoMatched { pack_index: 0 });
    assert_eq!(quoted.ticket_count, 5);
    assert_eq!(quoted.total, 200.0);
    assert_eq!(quoted.unit_equivalent_price, 40.0);
    assert_eq!(quoted.displayed_savings(), Some(50.0));
}

#[test]
fn unmatched_count_prices_individually() {
    let packs = demo_packs();
    let quoted = quote(PriceRequest::Tickets { count: 3 }, &packs, 50.0, 1).expect("quote");
    assert_eq!(quoted.mode, PriceMode::Individual);
    assert_eq!(quoted.total, 150.0);
    assert_eq!(quoted.unit_equivalent_price, 50.0);
    assert_eq!(quoted.displayed_savings(), None);
}

#[test]
fn first_catalog_pack_wins_a_size_tie() {
    let packs = vec![pack("Primero", 5, 200.0), pack("Segundo", 5, 180.0)];
    assert_eq!(auto_match(5, &packs), Some(0));
    let quoted = quote(PriceRequest::Tickets { count: 5 }, &packs, 50.0, 1).expect("quote");
    assert_eq!(quoted.mode, PriceMode::AutoMatched { pack_index: 0 });
    assert_eq!(quoted.total, 200.0);
}

#[test]
fn pack_above_naive_price_still_applies_without_a_savings_line() {
    let packs = vec![pack("Caro", 2, 150.0)];
    let quoted = quote(PriceRequest::Tickets { count: 2 }, &packs, 50.0, 1).expect("quote");
    assert_eq!(quoted.mode, PriceMode::AutoMatched { pack_index: 0 });
    assert_eq!(quoted.total, 150.0);
    assert!(quoted.savings < 0.0);
    assert_eq!(quoted.displayed_savings(), None);
}

#[test]
fn explicit_pack_multiplies_by_quantity() {
    let packs = demo_packs();
    let quoted = quote(
        PriceRequest::Pack {
            index: 1,
            quantity: 3,
        },
        &packs,
        50.0,
        1,
    )
    .expect("quote");
    assert_eq!(
        quoted.mode,
        PriceMode::ExplicitPack {
            pack_index: 1,
            quantity: 3,
        }
    );
    assert_eq!(quoted.ticket_count, 30);
    assert_eq!(quoted.total, 1050.0);
    assert_eq!(quoted.unit_equivalent_price, 35.0);
    assert_eq!(quoted.displayed_savings(), None);
}

#[test]
fn unknown_pack_or_zero_quantity_has_no_price() {
    let packs = demo_packs();
    assert_eq!(
        quote(
            PriceRequest::Pack {
                index: 5,
                quantity: 1,
            },
            &packs,
            50.0,
            1,
        ),
        None
    );
    assert_eq!(
        quote(
            PriceRequest::Pack {
                index: 0,
                quantity: 0,
            },
            &packs,
            50.0,
            1,
        ),
        None
    );
}

#[test]
fn counts_past_u32_have_no_price() {
    let packs = demo_packs();
    assert_eq!(
        quote(
            PriceRequest::Pack {
                index: 0,
                quantity: 858_993_460,
            },
            &packs,
            50.0,
            1,
        ),
        None
    );
    assert_eq!(
        quote(
            PriceRequest::Tickets {
                count: u32::MAX / 2,
            },
            &packs,
            50.0,
            3,
        ),
        None
    );

    let at_the_limit = quote(
        PriceRequest::Pack {
            index: 0,
            quantity: u32::MAX / 5,
        },
        &packs,
        50.0,
        1,
    )
    .expect("quote");
    assert_eq!(at_the_limit.ticket_count, u32::MAX);
}

#[test]
fn bonus_entries_multiply_entries_never_the_price() {
    let packs = demo_packs();
    let quoted = quote(PriceRequest::Tickets { count: 5 }, &packs, 50.0, 3).expect("quote");
    assert_eq!(quoted.total, 200.0);
    assert_eq!(quoted.entries_per_ticket, 3);
    assert_eq!(quoted.total_entries, 15);
    assert_eq!(quoted.bonus_entries(), 10);

    let explicit = quote(
        PriceRequest::Pack {
            index: 0,
            quantity: 2,
        },
        &packs,
        50.0,
        3,
    )
    .expect("quote");
    assert_eq!(explicit.total, 400.0);
    assert_eq!(explicit.total_entries, 30);
}

#[test]
fn zero_tickets_price_to_zero() {
    let packs = demo_packs();
    let quoted = quote(PriceRequest::Tickets { count: 0 }, &packs, 50.0, 3).expect("quote");
    assert_eq!(quoted.mode, PriceMode::Individual);
    assert_eq!(quoted.total, 0.0);
    assert_eq!(quoted.total_entries, 0);
}

#[test]
fn equal_requests_quote_identically() {
    let packs = demo_packs();
    let request = PriceRequest::Tickets { count: 10 };
    let first = quote(request, &packs, 50.0, 3).expect("quote");
    let second = quote(request, &packs, 50.0, 3).expect("quote");
    assert_eq!(first, second);
}
