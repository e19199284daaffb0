use thiserror::Error;

use crate::ids::PucchResourceId;

/// Construction-time configuration rejection (the `InvalidConfig` kind of
/// the error taxonomy). Always fatal: an embedder that receives this should
/// treat the offending RRC/O&M message as malformed and must not build the
/// allocator on top of it.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("pucch_resource_common index {0} is out of range [0, 16)")]
    ResourceCommonOutOfRange(u8),

    #[error("initial uplink BWP has {0} CRBs, need at least 2 for common PUCCH resources")]
    BwpTooSmall(u16),

    #[error("PUCCH resource-set 0 must not be empty")]
    EmptyHarqSet0,

    #[error("PUCCH resource {0} referenced by UE configuration does not exist in the cell")]
    UnknownResourceId(PucchResourceId),

    #[error("resource {0} in PUCCH resource-set 0 has format {1}, expected Format0 or Format1")]
    WrongFormatInSet0(PucchResourceId, crate::format::PucchFormat),

    #[error("resource {0} in PUCCH resource-set 1 has format {1}, expected Format2, Format3 or Format4")]
    WrongFormatInSet1(PucchResourceId, crate::format::PucchFormat),

    #[error("expected exactly one SR resource, got {0}")]
    SrResourceCountNotOne(usize),

    #[error(
        "Format0 HARQ-ACK combined with a Format3/Format4 SR resource is not a supported configuration"
    )]
    Format0HarqWithHighFormatSr,

    #[error("CSI reporting combined with an SR resource carried on Format0 is not supported")]
    CsiWithSrOnFormat0,

    #[error("max_pucch_grants_per_slot must be greater than zero")]
    ZeroCapacity,

    #[error("duplicate PUCCH resource id {0}")]
    DuplicateResourceId(PucchResourceId),
}
