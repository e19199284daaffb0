//! PUCCH allocator (§4.3): the MAC-scheduler-facing entry point that turns
//! UCI events (HARQ-ACK, scheduling request, CSI) into PUCCH PDUs, backed by
//! the collision and resource-manager crates for the underlying reservation
//! bookkeeping.

mod allocator;
mod error;
mod grid;
mod pdu;
mod prb;
mod state;

pub use allocator::Allocator;
pub use error::RejectReason;
pub use grid::ResourceGrid;
pub use pdu::{GrantKind, PucchPdu};
pub use state::UeGrants;
