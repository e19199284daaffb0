//! Configuration and data-model types shared by the PUCCH collision manager,
//! resource manager and allocator: cell- and UE-level PUCCH configuration,
//! resource descriptors, UCI-bit tuples and the slot/RNTI identifiers used
//! throughout the core.

pub mod cell;
pub mod dci;
pub mod error;
pub mod format;
pub mod ids;
pub mod resource;
pub mod ring;
pub mod ue;
pub mod uci;

pub use cell::{CellPucchConfig, UplinkBwp};
pub use dci::DciContext;
pub use error::ConfigError;
pub use format::{FormatParams, OccLength, PucchFormat};
pub use ids::{PucchResourceId, Rnti, SlotPoint};
pub use resource::{Hop, PrbInterval, PucchResource, SymbolInterval};
pub use ring::{ring_capacity, ring_index};
pub use ue::{HighFormatCommonConfig, UeCellPucchConfig};
pub use uci::UciBits;
