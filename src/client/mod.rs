pub mod api;
pub mod sequence;
pub mod session;

pub use api::*;
pub use sequence::{RequestSlot, Ticket};
pub use session::*;
