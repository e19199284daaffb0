mod common;

use common::{cell, FakeGrid};
use pucch::Allocator;
use pucch_config::{DciContext, FormatParams, Rnti, SlotPoint};

/// S1 — a bare Random-Access UE gets a common PUCCH resource via the Δ_PRI
/// search, with the smallest Δ_PRI that is both free and grid-clear.
#[test]
fn common_only_harq_picks_delta_pri_zero_on_an_empty_slot() {
    let cell = cell(vec![], 8);
    let mut allocator = Allocator::new(cell, 8).unwrap();
    let slot = SlotPoint::new(0, 0);
    let rnti = Rnti::new(0x4601);
    let mut grid = FakeGrid::new();

    let delta_pri = allocator
        .alloc_common_harq(slot, rnti, DciContext::new(0, 4), &mut grid)
        .unwrap();
    assert_eq!(delta_pri, 0);

    let grants = allocator.ue_grants(slot, rnti);
    let pdu = grants.harq.expect("common HARQ grant installed");
    assert_eq!(pdu.uci.harq_ack_bits, 1);
    assert_eq!(pdu.uci.sr_bits, 0);
    assert_eq!(pdu.first_hop.prb.start, 0);
    assert_eq!(pdu.first_hop.prb.length, 1);
    let second_hop = pdu.second_hop.expect("row 11 uses intra-slot hopping");
    assert_eq!(second_hop.prb.start, 51);
    assert_eq!(second_hop.prb.length, 1);
    assert!(matches!(
        pdu.params,
        FormatParams::Format1 {
            initial_cyclic_shift: 0,
            time_domain_occ: 0
        }
    ));

    assert!(grid.is_filled(0, 0));
    assert!(grid.is_filled(51, 13));
    assert!(!grid.is_filled(0, 7));
}

#[test]
fn common_only_harq_rejects_once_the_cell_is_at_capacity() {
    let cell = cell(vec![], 1);
    let mut allocator = Allocator::new(cell, 8).unwrap();
    let slot = SlotPoint::new(0, 0);
    let mut grid = FakeGrid::new();

    allocator
        .alloc_common_harq(slot, Rnti::new(0x4601), DciContext::new(0, 4), &mut grid)
        .unwrap();
    let rejected = allocator.alloc_common_harq(slot, Rnti::new(0x4602), DciContext::new(2, 4), &mut grid);
    assert!(rejected.is_none());
}
