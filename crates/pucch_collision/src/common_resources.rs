//! Derivation of the 16 common PUCCH resources from TS38.213 Table 9.2.1-1,
//! selected by the `pucch_resource_common` index carried in PUCCH-ConfigCommon
//! and used before a UE has dedicated PUCCH resources (§4.1 point 1).

use pucch_config::{CellPucchConfig, FormatParams, PucchFormat, PucchResource, PucchResourceId};

struct CommonResourceRow {
    format: PucchFormat,
    first_symbol_index: u8,
    nof_symbols: u8,
    rb_bwp_offset: u16,
    cs_indexes: &'static [u8],
}

const TABLE_9_2_1_1: [CommonResourceRow; 16] = [
    row(PucchFormat::Format0, 12, 2, 0, &[0, 3]),
    row(PucchFormat::Format0, 12, 2, 0, &[0, 4, 8]),
    row(PucchFormat::Format0, 12, 2, 3, &[0, 4, 8]),
    row(PucchFormat::Format1, 10, 4, 0, &[0, 6]),
    row(PucchFormat::Format1, 10, 4, 0, &[0, 3, 6, 9]),
    row(PucchFormat::Format1, 10, 4, 2, &[0, 3, 6, 9]),
    row(PucchFormat::Format1, 10, 4, 4, &[0, 3, 6, 9]),
    row(PucchFormat::Format1, 4, 10, 0, &[0, 6]),
    row(PucchFormat::Format1, 4, 10, 0, &[0, 3, 6, 9]),
    row(PucchFormat::Format1, 4, 10, 2, &[0, 3, 6, 9]),
    row(PucchFormat::Format1, 4, 10, 4, &[0, 3, 6, 9]),
    row(PucchFormat::Format1, 0, 14, 0, &[0, 6]),
    row(PucchFormat::Format1, 0, 14, 0, &[0, 3, 6, 9]),
    row(PucchFormat::Format1, 0, 14, 2, &[0, 3, 6, 9]),
    row(PucchFormat::Format1, 0, 14, 4, &[0, 3, 6, 9]),
    row(PucchFormat::Format1, 0, 14, 0, &[0, 3, 6, 9]),
];

const fn row(
    format: PucchFormat,
    first_symbol_index: u8,
    nof_symbols: u8,
    rb_bwp_offset: u16,
    cs_indexes: &'static [u8],
) -> CommonResourceRow {
    CommonResourceRow {
        format,
        first_symbol_index,
        nof_symbols,
        rb_bwp_offset,
        cs_indexes,
    }
}

/// `r_PUCCH` index into the common-resource table: `(2*n_cce)/nof_cce + 2*delta_pri`.
#[must_use]
pub fn resource_index(n_cce: u16, nof_cce: u16, delta_pri: u8) -> u8 {
    debug_assert!(nof_cce > 0, "CORESET must contain at least one CCE");
    ((2 * n_cce as u32) / nof_cce as u32 + 2 * delta_pri as u32) as u8
}

/// PRB index pair `(first_hop, second_hop)` for a given `r_pucch`, per TS38.213 §9.2.1.
#[must_use]
fn prb_indexes(r_pucch: u8, rb_bwp_offset: u16, nof_cs: u16, n_bwp_size: u16) -> (u16, u16) {
    assert!(r_pucch < 16, "r_pucch must be in 0..16");
    let mut prb_first = rb_bwp_offset + (r_pucch as u16 / nof_cs);
    let mut prb_second = n_bwp_size - 1 - prb_first;
    if r_pucch / 8 == 1 {
        prb_second = rb_bwp_offset + ((r_pucch as u16 - 8) / nof_cs);
        prb_first = n_bwp_size - 1 - prb_second;
    }
    (prb_first, prb_second)
}

/// Initial cyclic shift for a given `r_pucch`, per TS38.213 §9.2.1.
#[must_use]
fn cyclic_shift(r_pucch: u8, nof_cs: u16) -> u8 {
    assert!(r_pucch < 16, "r_pucch must be in 0..16");
    assert!(nof_cs > 0, "number of cyclic shifts must be greater than zero");
    let index = if r_pucch > 8 { r_pucch - 8 } else { r_pucch };
    (index as u16 % nof_cs) as u8
}

/// Builds the 16 common PUCCH resources addressable under `cell.pucch_resource_common`
/// (TS38.213 Table 9.2.1-1), with the row at index 15 carrying a BWP-size-dependent
/// PRB offset as specified.
///
/// The resulting resources are assigned ids `0..16`, reserved exclusively for common
/// resources by convention: dedicated resource ids configured by the UE layer must not
/// reuse this range.
#[must_use]
pub fn build_common_resources(cell: &CellPucchConfig) -> Vec<PucchResource> {
    let n_bwp_size = cell.ul_bwp.nof_crbs;
    (0..16u8)
        .map(|r_pucch| {
            let table_row = &TABLE_9_2_1_1[cell.pucch_resource_common as usize];
            let rb_bwp_offset = if cell.pucch_resource_common == 15 {
                n_bwp_size / 4
            } else {
                table_row.rb_bwp_offset
            };
            let nof_cs = table_row.cs_indexes.len() as u16;
            let (prb_first, prb_second) = prb_indexes(r_pucch, rb_bwp_offset, nof_cs, n_bwp_size);
            let cs = cyclic_shift(r_pucch, nof_cs);

            let params = match table_row.format {
                PucchFormat::Format0 => FormatParams::Format0 {
                    initial_cyclic_shift: cs,
                },
                PucchFormat::Format1 => FormatParams::Format1 {
                    initial_cyclic_shift: cs,
                    time_domain_occ: 0,
                },
                _ => unreachable!("table 9.2.1-1 only ever selects Format0 or Format1"),
            };

            PucchResource {
                id: PucchResourceId::new(r_pucch as u16),
                starting_prb: cell.ul_bwp.start_crb + prb_first,
                second_hop_prb: Some(cell.ul_bwp.start_crb + prb_second),
                starting_symbol: table_row.first_symbol_index,
                nof_symbols: table_row.nof_symbols,
                params,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pucch_config::UplinkBwp;

    fn cell(pucch_resource_common: u8) -> CellPucchConfig {
        CellPucchConfig::new(
            UplinkBwp {
                scs_numerology: 0,
                start_crb: 0,
                nof_crbs: 52,
            },
            pucch_resource_common,
            vec![],
            0,
            8,
        )
        .unwrap()
    }

    #[test]
    fn row_eleven_matches_the_scenario_expected_in_the_test_suite() {
        let resources = build_common_resources(&cell(11));
        let r0 = &resources[0];
        assert_eq!(r0.format(), PucchFormat::Format1);
        assert_eq!(r0.starting_symbol, 0);
        assert_eq!(r0.nof_symbols, 14);
        assert_eq!(r0.starting_prb, 0);
        assert_eq!(r0.second_hop_prb, Some(51));
        assert_eq!(
            r0.params,
            FormatParams::Format1 {
                initial_cyclic_shift: 0,
                time_domain_occ: 0
            }
        );
    }

    #[test]
    fn row_fifteen_uses_bwp_size_dependent_offset() {
        let resources = build_common_resources(&cell(15));
        // rb_bwp_offset = 52 / 4 = 13, nof_cs = 4, r_pucch=0 -> prb_first = 13 + 0 = 13
        assert_eq!(resources[0].starting_prb, 13);
    }

    #[test]
    fn resource_index_applies_delta_pri_search_step() {
        assert_eq!(resource_index(0, 4, 0), 0);
        assert_eq!(resource_index(0, 4, 1), 2);
        assert_eq!(resource_index(2, 4, 0), 1);
    }
}
