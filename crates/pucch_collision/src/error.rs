use thiserror::Error;

use pucch_config::PucchResourceId;

/// Fatal: the cell's dedicated resource ids do not form a contiguous
/// cell-resource-id space on top of the 16 ids reserved for common resources.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum CollisionConfigError {
    #[error("dedicated resource id {0} overlaps the [0, 16) range reserved for common resources")]
    DedicatedIdOverlapsCommonRange(PucchResourceId),

    #[error("dedicated resource id {0} falls outside the contiguous cell-resource-id space")]
    DedicatedIdOutOfRange(PucchResourceId),

    #[error("cell-resource-id {0} has no resource assigned to it")]
    NonContiguousResourceIds(usize),
}

/// Local, recoverable rejection of a reservation attempt. Surfaced to callers
/// as `None`/`Err` rather than propagated as a fatal error; logged at debug
/// level by the caller before being discarded.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum CollisionReject {
    #[error("resource {0} collides with an already-reserved resource in its multiplexing group")]
    PucchCollision(PucchResourceId),
}
