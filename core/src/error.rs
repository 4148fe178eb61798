use crate::raffle::TicketNumber;

/// Failure taxonomy of the selection and allocation engine. Every variant is
/// recoverable: callers translate it into a user-facing notice and leave the
/// surrounding state untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("ticket {ticket} is already taken")]
    OccupiedTicketSelected { ticket: TicketNumber },
    #[error("only {available} tickets are still available, requested {requested}")]
    InsufficientAvailability { requested: u32, available: u32 },
    #[error("raffle is empty or missing")]
    InvalidRaffleState,
    #[error("order was rejected: {reason}")]
    OrderSubmissionFailure { reason: String },
}
