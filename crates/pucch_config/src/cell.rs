use crate::error::ConfigError;
use crate::ids::PucchResourceId;
use crate::resource::PucchResource;

/// The initial uplink bandwidth part: a contiguous PRB sub-range of the cell
/// carrier, expressed in common resource blocks (CRBs).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UplinkBwp {
    pub scs_numerology: u8,
    pub start_crb: u16,
    pub nof_crbs: u16,
}

impl UplinkBwp {
    #[must_use]
    pub const fn end_crb(self) -> u16 {
        self.start_crb + self.nof_crbs
    }

    /// Clamps a PRB interval to the BWP's CRB range, per §4.3.5 (grid
    /// marking never extends outside the initial uplink BWP).
    #[must_use]
    pub fn clamp(self, start: u16, length: u16) -> (u16, u16) {
        let clamped_start = start.max(self.start_crb);
        let clamped_end = (start + length).min(self.end_crb());
        if clamped_end <= clamped_start {
            (clamped_start, 0)
        } else {
            (clamped_start, clamped_end - clamped_start)
        }
    }
}

/// Cell-wide PUCCH configuration (`sched_cell_configuration`, §6), built once
/// at boot and immutable afterward. Validated so that unrecognized or
/// inconsistent configurations are rejected before an allocator is built on
/// top of them.
#[derive(Debug, Clone)]
pub struct CellPucchConfig {
    pub ul_bwp: UplinkBwp,
    pub pucch_resource_common: u8,
    pub dedicated_resources: Vec<PucchResource>,
    pub guard_band_prbs: u16,
    pub max_pucch_grants_per_slot: usize,
}

impl CellPucchConfig {
    pub fn new(
        ul_bwp: UplinkBwp,
        pucch_resource_common: u8,
        dedicated_resources: Vec<PucchResource>,
        guard_band_prbs: u16,
        max_pucch_grants_per_slot: usize,
    ) -> Result<Self, ConfigError> {
        if pucch_resource_common >= 16 {
            return Err(ConfigError::ResourceCommonOutOfRange(pucch_resource_common));
        }
        if ul_bwp.nof_crbs < 2 {
            return Err(ConfigError::BwpTooSmall(ul_bwp.nof_crbs));
        }
        if max_pucch_grants_per_slot == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        let mut seen = std::collections::HashSet::with_capacity(dedicated_resources.len());
        for resource in &dedicated_resources {
            if !seen.insert(resource.id) {
                return Err(ConfigError::DuplicateResourceId(resource.id));
            }
        }

        Ok(Self {
            ul_bwp,
            pucch_resource_common,
            dedicated_resources,
            guard_band_prbs,
            max_pucch_grants_per_slot,
        })
    }

    #[must_use]
    pub fn resource(&self, id: PucchResourceId) -> Option<&PucchResource> {
        self.dedicated_resources.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FormatParams;

    fn bwp() -> UplinkBwp {
        UplinkBwp {
            scs_numerology: 0,
            start_crb: 0,
            nof_crbs: 52,
        }
    }

    #[test]
    fn rejects_out_of_range_resource_common_index() {
        let err = CellPucchConfig::new(bwp(), 16, vec![], 0, 8).unwrap_err();
        assert_eq!(err, ConfigError::ResourceCommonOutOfRange(16));
    }

    #[test]
    fn rejects_duplicate_resource_ids() {
        let resource = |id| PucchResource {
            id: PucchResourceId::new(id),
            starting_prb: 0,
            second_hop_prb: None,
            starting_symbol: 0,
            nof_symbols: 14,
            params: FormatParams::Format1 {
                initial_cyclic_shift: 0,
                time_domain_occ: 0,
            },
        };
        let err = CellPucchConfig::new(bwp(), 11, vec![resource(0), resource(0)], 0, 8)
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateResourceId(PucchResourceId::new(0)));
    }

    #[test]
    fn clamp_keeps_rectangle_inside_bwp() {
        let (start, length) = bwp().clamp(50, 5);
        assert_eq!((start, length), (50, 2));
    }
}
