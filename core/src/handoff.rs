use std::collections::BTreeSet;
use std::fmt;

use url::form_urlencoded;

use crate::pricing::DEFAULT_PACK_QUANTITY;
use crate::raffle::TicketNumber;

pub const TICKETS_KEY: &str = "tickets";
pub const PACK_KEY: &str = "pack";
pub const QUANTITY_KEY: &str = "quantity";

/// What the raffle view hands to the checkout view: either concrete ticket
/// numbers (ascending) or a pack choice with a purchase quantity. Encoded as
/// query parameters and reconstructed on the other side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PurchaseIntent {
    Tickets { tickets: Vec<TicketNumber> },
    Pack { index: usize, quantity: u32 },
}

impl PurchaseIntent {
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        match self {
            PurchaseIntent::Tickets { tickets } => {
                let list = tickets
                    .iter()
                    .map(|ticket| ticket.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                query.append_pair(TICKETS_KEY, &list);
            }
            PurchaseIntent::Pack { index, quantity } => {
                query.append_pair(PACK_KEY, &index.to_string());
                query.append_pair(QUANTITY_KEY, &quantity.to_string());
            }
        }
        query.finish()
    }

    pub fn from_query(query: &str) -> Result<Self, HandoffError> {
        let raw = query.trim().trim_start_matches('?');
        let mut tickets_value: Option<String> = None;
        let mut pack_value: Option<String> = None;
        let mut quantity_value: Option<String> = None;
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let slot = if key.eq_ignore_ascii_case(TICKETS_KEY) {
                &mut tickets_value
            } else if key.eq_ignore_ascii_case(PACK_KEY) {
                &mut pack_value
            } else if key.eq_ignore_ascii_case(QUANTITY_KEY) {
                &mut quantity_value
            } else {
                continue;
            };
            if slot.is_some() {
                return Err(HandoffError::DuplicateKey {
                    key: key.to_ascii_lowercase(),
                });
            }
            *slot = Some(value.into_owned());
        }

        match (tickets_value, pack_value) {
            (Some(_), Some(_)) => Err(HandoffError::ConflictingIntent),
            (Some(list), None) => {
                if quantity_value.is_some() {
                    return Err(HandoffError::ConflictingIntent);
                }
                let mut tickets = BTreeSet::new();
                for item in list.split(',') {
                    let item = item.trim();
                    if item.is_empty() {
                        continue;
                    }
                    let ticket: TicketNumber = parse_number(TICKETS_KEY, item)?;
                    if ticket == 0 {
                        return Err(HandoffError::InvalidNumber {
                            key: TICKETS_KEY,
                            value: item.to_string(),
                        });
                    }
                    tickets.insert(ticket);
                }
                if tickets.is_empty() {
                    return Err(HandoffError::EmptyTickets);
                }
                Ok(PurchaseIntent::Tickets {
                    tickets: tickets.into_iter().collect(),
                })
            }
            (None, Some(raw_index)) => {
                let index: usize = parse_number(PACK_KEY, raw_index.trim())?;
                let quantity: u32 = match quantity_value {
                    Some(raw_quantity) => parse_number(QUANTITY_KEY, raw_quantity.trim())?,
                    None => DEFAULT_PACK_QUANTITY,
                };
                if quantity == 0 {
                    return Err(HandoffError::ZeroQuantity);
                }
                Ok(PurchaseIntent::Pack { index, quantity })
            }
            (None, None) => Err(HandoffError::MissingIntent),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, HandoffError> {
    value.parse::<T>().map_err(|_| HandoffError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandoffError {
    MissingIntent,
    ConflictingIntent,
    DuplicateKey { key: String },
    InvalidNumber { key: &'static str, value: String },
    EmptyTickets,
    ZeroQuantity,
}

impl fmt::Display for HandoffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandoffError::MissingIntent => {
                write!(f, "checkout link carries neither tickets nor a pack")
            }
            HandoffError::ConflictingIntent => {
                write!(f, "checkout link mixes ticket and pack parameters")
            }
            HandoffError::DuplicateKey { key } => {
                write!(f, "checkout link repeats parameter '{key}'")
            }
            HandoffError::InvalidNumber { key, value } => {
                write!(f, "parameter '{key}' has invalid number '{value}'")
            }
            HandoffError::EmptyTickets => write!(f, "ticket list is empty"),
            HandoffError::ZeroQuantity => write!(f, "pack quantity must be at least 1"),
        }
    }
}

impl std::error::Error for HandoffError {}
