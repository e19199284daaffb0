use derive_more::Display;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Tag distinguishing the five PUCCH transmission formats. The allocator
/// dispatches on this tag at exactly three sites: multiplexing, PDU filling
/// and PRB recomputation.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum PucchFormat {
    #[display("Format0")]
    Format0 = 0,
    #[display("Format1")]
    Format1 = 1,
    #[display("Format2")]
    Format2 = 2,
    #[display("Format3")]
    Format3 = 3,
    #[display("Format4")]
    Format4 = 4,
}

impl PucchFormat {
    /// Formats 0/1 carry at most 2 HARQ-ACK bits and 1 SR bit and are never
    /// multiplexed by code rate (they rely purely on sequence orthogonality).
    #[must_use]
    pub const fn is_low_payload(self) -> bool {
        matches!(self, Self::Format0 | Self::Format1)
    }

    #[must_use]
    pub const fn max_low_payload_harq_bits(self) -> u16 {
        2
    }
}

/// Spreading factor used by the time-domain orthogonal cover code of Format 4.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum OccLength {
    Two,
    Four,
}

impl OccLength {
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }
}

/// Format-specific parameter block of a PUCCH resource descriptor. The
/// multiplexing index used by the collision manager is derived from this
/// block (see [`PucchFormat`] dispatch sites).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FormatParams {
    Format0 {
        initial_cyclic_shift: u8,
    },
    Format1 {
        initial_cyclic_shift: u8,
        time_domain_occ: u8,
    },
    Format2 {
        nof_prbs: u16,
    },
    Format3 {
        nof_prbs: u16,
    },
    Format4 {
        occ_length: OccLength,
        occ_index: u8,
    },
}

impl FormatParams {
    #[must_use]
    pub const fn format(&self) -> PucchFormat {
        match self {
            Self::Format0 { .. } => PucchFormat::Format0,
            Self::Format1 { .. } => PucchFormat::Format1,
            Self::Format2 { .. } => PucchFormat::Format2,
            Self::Format3 { .. } => PucchFormat::Format3,
            Self::Format4 { .. } => PucchFormat::Format4,
        }
    }

    /// The scalar that distinguishes orthogonal resources sharing the same
    /// time-frequency footprint. Formats 2 and 3 are never multiplexed and so
    /// always report index 0 (§4.1).
    #[must_use]
    pub const fn multiplexing_index(&self) -> u16 {
        match *self {
            Self::Format0 {
                initial_cyclic_shift,
            } => initial_cyclic_shift as u16,
            Self::Format1 {
                initial_cyclic_shift,
                time_domain_occ,
            } => initial_cyclic_shift as u16 + time_domain_occ as u16 * 12,
            Self::Format2 { .. } | Self::Format3 { .. } => 0,
            Self::Format4 { occ_index, .. } => occ_index as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format1_multiplexing_index_combines_cyclic_shift_and_occ() {
        let params = FormatParams::Format1 {
            initial_cyclic_shift: 3,
            time_domain_occ: 2,
        };
        assert_eq!(params.multiplexing_index(), 3 + 2 * 12);
    }

    #[test]
    fn format2_and_format3_never_multiplex() {
        assert_eq!(
            FormatParams::Format2 { nof_prbs: 4 }.multiplexing_index(),
            0
        );
        assert_eq!(
            FormatParams::Format3 { nof_prbs: 2 }.multiplexing_index(),
            0
        );
    }
}
