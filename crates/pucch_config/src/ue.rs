use crate::cell::CellPucchConfig;
use crate::error::ConfigError;
use crate::format::PucchFormat;
use crate::ids::PucchResourceId;

/// Common PUCCH parameters shared by Format 2/3/4 resources, carried per UE
/// (§6: "common-parameter blocks per format").
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HighFormatCommonConfig {
    pub max_code_rate: f32,
    pub pi2_bpsk: bool,
    pub additional_dmrs: bool,
}

impl Default for HighFormatCommonConfig {
    fn default() -> Self {
        Self {
            max_code_rate: 0.8,
            pi2_bpsk: false,
            additional_dmrs: false,
        }
    }
}

/// Per-UE PUCCH configuration (`ue_cell_configuration`, §6), validated
/// against the owning cell's dedicated resource table at construction.
#[derive(Debug, Clone)]
pub struct UeCellPucchConfig {
    pub harq_set0: Vec<PucchResourceId>,
    pub harq_set1: Vec<PucchResourceId>,
    pub sr_resource: PucchResourceId,
    pub csi_resource: Option<PucchResourceId>,
    pub format_common: HighFormatCommonConfig,
}

impl UeCellPucchConfig {
    pub fn new(
        cell: &CellPucchConfig,
        harq_set0: Vec<PucchResourceId>,
        harq_set1: Vec<PucchResourceId>,
        sr_resource_ids: Vec<PucchResourceId>,
        csi_resource: Option<PucchResourceId>,
        format_common: HighFormatCommonConfig,
    ) -> Result<Self, ConfigError> {
        if harq_set0.is_empty() {
            return Err(ConfigError::EmptyHarqSet0);
        }
        if sr_resource_ids.len() != 1 {
            return Err(ConfigError::SrResourceCountNotOne(sr_resource_ids.len()));
        }
        let sr_resource = sr_resource_ids[0];

        for &id in &harq_set0 {
            let resource = cell
                .resource(id)
                .ok_or(ConfigError::UnknownResourceId(id))?;
            if !matches!(resource.format(), PucchFormat::Format0 | PucchFormat::Format1) {
                return Err(ConfigError::WrongFormatInSet0(id, resource.format()));
            }
        }
        for &id in &harq_set1 {
            let resource = cell
                .resource(id)
                .ok_or(ConfigError::UnknownResourceId(id))?;
            if matches!(resource.format(), PucchFormat::Format0 | PucchFormat::Format1) {
                return Err(ConfigError::WrongFormatInSet1(id, resource.format()));
            }
        }

        let sr_format = cell
            .resource(sr_resource)
            .ok_or(ConfigError::UnknownResourceId(sr_resource))?
            .format();

        if harq_set0
            .iter()
            .filter_map(|id| cell.resource(*id))
            .any(|r| r.format() == PucchFormat::Format0)
            && matches!(sr_format, PucchFormat::Format3 | PucchFormat::Format4)
        {
            return Err(ConfigError::Format0HarqWithHighFormatSr);
        }

        if csi_resource.is_some() && sr_format == PucchFormat::Format0 {
            return Err(ConfigError::CsiWithSrOnFormat0);
        }

        if let Some(id) = csi_resource {
            cell.resource(id).ok_or(ConfigError::UnknownResourceId(id))?;
        }

        Ok(Self {
            harq_set0,
            harq_set1,
            sr_resource,
            csi_resource,
            format_common,
        })
    }

    /// True when set-0 is configured as Format0 HARQ alongside a Format2
    /// resource elsewhere in the UE's config — in that shape the last two
    /// entries of set-0 are reserved for SR/CSI multiplexing and must be
    /// skipped by `reserve_next_harq_set_i` (§4.2).
    #[must_use]
    pub fn reserves_set0_tail_for_multiplexing(&self, cell: &CellPucchConfig) -> bool {
        let set0_is_format0 = self
            .harq_set0
            .first()
            .and_then(|id| cell.resource(*id))
            .is_some_and(|r| r.format() == PucchFormat::Format0);
        let has_format2_elsewhere = self
            .harq_set1
            .iter()
            .filter_map(|id| cell.resource(*id))
            .any(|r| r.format() == PucchFormat::Format2);
        set0_is_format0 && has_format2_elsewhere && self.harq_set0.len() > 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::UplinkBwp;
    use crate::format::FormatParams;
    use crate::resource::PucchResource;

    fn format1_resource(id: u16) -> PucchResource {
        PucchResource {
            id: PucchResourceId::new(id),
            starting_prb: id,
            second_hop_prb: None,
            starting_symbol: 0,
            nof_symbols: 14,
            params: FormatParams::Format1 {
                initial_cyclic_shift: 0,
                time_domain_occ: 0,
            },
        }
    }

    fn cell_with(resources: Vec<PucchResource>) -> CellPucchConfig {
        CellPucchConfig::new(
            UplinkBwp {
                scs_numerology: 0,
                start_crb: 0,
                nof_crbs: 52,
            },
            11,
            resources,
            0,
            8,
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_harq_set0() {
        let cell = cell_with(vec![format1_resource(0)]);
        let err = UeCellPucchConfig::new(
            &cell,
            vec![],
            vec![],
            vec![PucchResourceId::new(0)],
            None,
            HighFormatCommonConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::EmptyHarqSet0);
    }

    #[test]
    fn rejects_more_than_one_sr_resource() {
        let cell = cell_with(vec![format1_resource(0), format1_resource(1)]);
        let err = UeCellPucchConfig::new(
            &cell,
            vec![PucchResourceId::new(0)],
            vec![],
            vec![PucchResourceId::new(0), PucchResourceId::new(1)],
            None,
            HighFormatCommonConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::SrResourceCountNotOne(2));
    }

    #[test]
    fn accepts_a_minimal_valid_configuration() {
        let cell = cell_with(vec![format1_resource(0), format1_resource(1)]);
        let ue = UeCellPucchConfig::new(
            &cell,
            vec![PucchResourceId::new(0)],
            vec![],
            vec![PucchResourceId::new(1)],
            None,
            HighFormatCommonConfig::default(),
        )
        .unwrap();
        assert_eq!(ue.sr_resource, PucchResourceId::new(1));
    }
}
