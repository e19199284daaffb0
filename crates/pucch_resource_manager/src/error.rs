use thiserror::Error;

use pucch_config::{PucchResourceId, Rnti};

/// Local, recoverable rejection of a reservation attempt, logged at debug
/// level and surfaced to the allocator as `None`/`Err` rather than panicking.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ReservationReject {
    #[error("no resource in the set has free capacity for this slot")]
    SetExhausted,

    #[error("resource indicator {0} is out of range for this resource set")]
    IndicatorOutOfRange(u8),

    #[error(transparent)]
    Collision(#[from] pucch_collision::CollisionReject),

    #[error("resource {0} is already owned by {1}, not the requesting UE")]
    OwnedByAnotherUe(PucchResourceId, Rnti),
}
