use std::collections::HashSet;

use pucch::ResourceGrid;
use pucch_config::{
    CellPucchConfig, FormatParams, HighFormatCommonConfig, PrbInterval, PucchResource,
    PucchResourceId, SymbolInterval, UeCellPucchConfig, UplinkBwp,
};

/// Minimal in-memory stand-in for the uplink resource grid: a set of
/// occupied (PRB, symbol) cells. The real grid is an external collaborator;
/// this one only needs to satisfy `ResourceGrid` and let tests inspect what
/// the allocator marked.
#[derive(Default)]
pub struct FakeGrid {
    occupied: HashSet<(u16, u8)>,
}

impl FakeGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_filled(&self, prb: u16, symbol: u8) -> bool {
        self.occupied.contains(&(prb, symbol))
    }

    pub fn nof_filled_cells(&self) -> usize {
        self.occupied.len()
    }
}

impl ResourceGrid for FakeGrid {
    fn collides(&self, prb: PrbInterval, symbols: SymbolInterval) -> bool {
        (prb.start..prb.end()).any(|p| (symbols.start..symbols.end()).any(|s| self.occupied.contains(&(p, s))))
    }

    fn fill(&mut self, prb: PrbInterval, symbols: SymbolInterval) {
        for p in prb.start..prb.end() {
            for s in symbols.start..symbols.end() {
                self.occupied.insert((p, s));
            }
        }
    }

    fn clear(&mut self, prb: PrbInterval, symbols: SymbolInterval) {
        for p in prb.start..prb.end() {
            for s in symbols.start..symbols.end() {
                self.occupied.remove(&(p, s));
            }
        }
    }
}

pub fn bwp() -> UplinkBwp {
    UplinkBwp {
        scs_numerology: 0,
        start_crb: 0,
        nof_crbs: 52,
    }
}

pub fn format1_resource(id: u16, cyclic_shift: u8) -> PucchResource {
    PucchResource {
        id: PucchResourceId::new(id),
        starting_prb: 2 + id,
        second_hop_prb: None,
        starting_symbol: 0,
        nof_symbols: 14,
        params: FormatParams::Format1 {
            initial_cyclic_shift: cyclic_shift,
            time_domain_occ: 0,
        },
    }
}

pub fn format2_resource(id: u16, nof_prbs: u16) -> PucchResource {
    PucchResource {
        id: PucchResourceId::new(id),
        starting_prb: 2 + id,
        second_hop_prb: None,
        starting_symbol: 12,
        nof_symbols: 2,
        params: FormatParams::Format2 { nof_prbs },
    }
}

/// A cell with `pucch_resource_common = 11` over a 52-PRB, 15 kHz-SCS BWP,
/// the literal configuration used by every scenario in this suite.
pub fn cell(dedicated: Vec<PucchResource>, max_pucch_grants_per_slot: usize) -> CellPucchConfig {
    let _ = env_logger::try_init();
    CellPucchConfig::new(bwp(), 11, dedicated, 0, max_pucch_grants_per_slot).unwrap()
}

#[allow(clippy::too_many_arguments)]
pub fn ue(
    cell: &CellPucchConfig,
    harq_set0: Vec<PucchResourceId>,
    harq_set1: Vec<PucchResourceId>,
    sr_resource: PucchResourceId,
    csi_resource: Option<PucchResourceId>,
) -> UeCellPucchConfig {
    UeCellPucchConfig::new(cell, harq_set0, harq_set1, vec![sr_resource], csi_resource, HighFormatCommonConfig::default()).unwrap()
}
