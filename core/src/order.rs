use serde::{Deserialize, Serialize};

use crate::raffle::TicketNumber;

/// Payload for the order-creation boundary, the engine's only write.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(rename = "raffleId")]
    pub raffle_id: String,
    pub tickets: Vec<TicketNumber>,
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(rename = "raffleId")]
    pub raffle_id: String,
    pub tickets: Vec<TicketNumber>,
    pub total: f64,
}
