//! Collision manager: derives the common PUCCH resources from TS38.213 Table
//! 9.2.1-1, builds the static footprint/multiplexing collision matrix over a
//! cell's common and dedicated resources, and tracks per-slot reservations
//! against it.

pub mod bitset;
pub mod common_resources;
pub mod error;
pub mod manager;
pub mod table;

pub use bitset::ResourceBitset;
pub use common_resources::{build_common_resources, resource_index};
pub use error::{CollisionConfigError, CollisionReject};
pub use manager::CollisionManager;
pub use table::{CollisionTable, NOF_COMMON_RESOURCES};
