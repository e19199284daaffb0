use thiserror::Error;

use pucch_config::{PucchResourceId, Rnti, SlotPoint};

/// Local, recoverable rejection reasons (§7). Never propagated as a `Result`
/// the caller must handle: entry points surface these as `None`, logging the
/// reason at debug level first (§11, §12).
#[derive(Debug, Error, Eq, PartialEq)]
pub enum RejectReason {
    #[error("slot {0} at the cell's PUCCH grant capacity")]
    CapacityReached(SlotPoint),

    #[error("resource {0} is busy: {1}")]
    ResourceBusy(PucchResourceId, #[source] pucch_resource_manager::ReservationReject),

    #[error("chosen rectangle collides with an existing uplink grant on the resource grid")]
    CollisionOnGrid,

    #[error("merged UCI payload of {0} bits exceeds the format's maximum")]
    PayloadOverflow(u16),

    #[error("no PUCCH resource is available for this request")]
    NoResourceAvailable,
}

pub(crate) fn log_reject(slot: SlotPoint, rnti: Rnti, reason: &RejectReason) {
    log::debug!("pucch allocator: rejected request for {rnti} at slot {slot}: {reason}");
}
