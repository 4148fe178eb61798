pub mod backend;
pub mod checkout;
pub mod store;

pub use backend::{BackendError, FixtureBackend, FixtureError, StoreBackend};
pub use checkout::{CheckoutError, CheckoutFlow};
pub use store::{
    DisplayMode, LoadOutcome, LoadPhase, Notice, PackView, RaffleStore, StoreSnapshot,
    StoreSubscription, TicketCell,
};
