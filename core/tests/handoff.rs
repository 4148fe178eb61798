use boletera_core::{HandoffError, PurchaseIntent};

#[test]
fn ticket_intent_round_trips() {
    let intent = PurchaseIntent::Tickets {
        tickets: vec![3, 17, 42],
    };
    let query = intent.to_query();
    assert_eq!(query, "tickets=3%2C17%2C42");
    assert_eq!(PurchaseIntent::from_query(&query).expect("decode"), intent);
}

#[test]
fn pack_intent_round_trips() {
    let intent = PurchaseIntent::Pack {
        index: 1,
        quantity: 2,
    };
    let query = intent.to_query();
    assert_eq!(query, "pack=1&quantity=2");
    assert_eq!(PurchaseIntent::from_query(&query).expect("decode"), intent);
}

#[test]
fn leading_question_mark_and_key_case_are_tolerated() {
    assert_eq!(
        PurchaseIntent::from_query("?Tickets=8").expect("decode"),
        PurchaseIntent::Tickets { tickets: vec![8] }
    );
    assert_eq!(
        PurchaseIntent::from_query("PACK=2").expect("decode"),
        PurchaseIntent::Pack {
            index: 2,
            quantity: 1,
        }
    );
}

#[test]
fn ticket_list_is_deduped_and_sorted() {
    let intent = PurchaseIntent::from_query("tickets=9,1,5,1,").expect("decode");
    assert_eq!(
        intent,
        PurchaseIntent::Tickets {
            tickets: vec![1, 5, 9],
        }
    );
}

#[test]
fn missing_quantity_defaults_to_one() {
    assert_eq!(
        PurchaseIntent::from_query("pack=0").expect("decode"),
        PurchaseIntent::Pack {
            index: 0,
            quantity: 1,
        }
    );
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = PurchaseIntent::from_query("tickets=1&tickets=2").expect_err("duplicate");
    assert_eq!(
        err,
        HandoffError::DuplicateKey {
            key: "tickets".to_string(),
        }
    );
    let err = PurchaseIntent::from_query("pack=0&PACK=1").expect_err("duplicate across case");
    assert_eq!(
        err,
        HandoffError::DuplicateKey {
            key: "pack".to_string(),
        }
    );
}

#[test]
fn mixed_ticket_and_pack_parameters_are_rejected() {
    assert_eq!(
        PurchaseIntent::from_query("tickets=1&pack=0").expect_err("conflict"),
        HandoffError::ConflictingIntent
    );
    assert_eq!(
        PurchaseIntent::from_query("tickets=1&quantity=2").expect_err("conflict"),
        HandoffError::ConflictingIntent
    );
}

#[test]
fn zero_values_are_rejected() {
    assert_eq!(
        PurchaseIntent::from_query("pack=0&quantity=0").expect_err("zero quantity"),
        HandoffError::ZeroQuantity
    );
    assert!(matches!(
        PurchaseIntent::from_query("tickets=0").expect_err("zero ticket"),
        HandoffError::InvalidNumber { .. }
    ));
}

#[test]
fn empty_or_missing_intent_is_rejected() {
    assert_eq!(
        PurchaseIntent::from_query("tickets=,,").expect_err("empty list"),
        HandoffError::EmptyTickets
    );
    assert_eq!(
        PurchaseIntent::from_query("tickets=").expect_err("empty value"),
        HandoffError::EmptyTickets
    );
    assert_eq!(
        PurchaseIntent::from_query("").expect_err("no parameters"),
        HandoffError::MissingIntent
    );
    assert_eq!(
        PurchaseIntent::from_query("utm_source=mail").expect_err("unrelated parameters"),
        HandoffError::MissingIntent
    );
}

#[test]
fn malformed_numbers_are_rejected() {
    assert!(matches!(
        PurchaseIntent::from_query("tickets=1,x").expect_err("bad ticket"),
        HandoffError::InvalidNumber { key: "tickets", .. }
    ));
    assert!(matches!(
        PurchaseIntent::from_query("pack=one").expect_err("bad pack index"),
        HandoffError::InvalidNumber { key: "pack", .. }
    ));
    assert!(matches!(
        PurchaseIntent::from_query("pack=0&quantity=-2").expect_err("negative quantity"),
        HandoffError::InvalidNumber { key: "quantity", .. }
    ));
}
