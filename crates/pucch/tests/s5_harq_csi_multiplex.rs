mod common;

use common::{cell, format1_resource, format2_resource, ue, FakeGrid};
use pucch::Allocator;
use pucch_config::{PucchResourceId, Rnti, SlotPoint};

fn rid(value: u16) -> PucchResourceId {
    PucchResourceId::new(value)
}

/// S5 — a HARQ bit landing on an existing CSI grant always merges into a
/// set-1 resource, carrying the union of HARQ and CSI bits.
#[test]
fn harq_arriving_on_an_existing_csi_grant_merges_into_set1() {
    let cell = cell(
        vec![
            format1_resource(16, 0),
            format1_resource(17, 1),
            format2_resource(18, 16),
            format2_resource(19, 16),
        ],
        8,
    );
    let ue_cfg = ue(&cell, vec![rid(16)], vec![rid(18)], rid(17), Some(rid(19)));
    let mut allocator = Allocator::new(cell, 8).unwrap();
    let slot = SlotPoint::new(0, 0);
    let rnti = Rnti::new(0x4601);
    let mut grid = FakeGrid::new();

    allocator.pucch_allocate_csi(slot, rnti, &ue_cfg, 4, &mut grid).unwrap();
    allocator.alloc_ded_harq(slot, rnti, &ue_cfg, 1, &mut grid).unwrap();

    let grants = allocator.ue_grants(slot, rnti);
    assert!(grants.csi.is_none(), "CSI was folded into the merged set-1 grant");
    let pdu = grants.harq.expect("merged grant lives under the HARQ slot");
    assert_eq!(pdu.resource_id, rid(18));
    assert_eq!(pdu.uci.harq_ack_bits, 1);
    assert_eq!(pdu.uci.csi_part1_bits, 4);
    assert_eq!(pdu.uci.sr_bits, 0);
}
