//! Format-2/3 PRB recomputation (§4.3.4): as a UCI payload grows or shrinks,
//! the number of PRBs carrying a Format-2/3 grant is recomputed so the
//! effective code rate stays under the configured ceiling.

/// CRC length attached to the UCI payload before encoding, selected by
/// payload-size threshold.
#[must_use]
pub fn crc_length(payload_bits: u16) -> u16 {
    match payload_bits {
        0..=11 => 0,
        12..=19 => 6,
        _ => 11,
    }
}

/// Whether the payload is large enough to be segmented into two code blocks.
#[must_use]
pub fn is_segmented(payload_bits: u16, codeword_bits: u32) -> bool {
    (payload_bits >= 360 && codeword_bits >= 1088) || payload_bits >= 1013
}

/// Format-2 PRB count for a given payload, symbol count and code-rate ceiling
/// (§4.3.4). Returns `None` if even `configured_max_prbs` cannot bring the
/// effective code rate under `max_code_rate`.
#[must_use]
pub fn recompute_format2_prbs(
    payload_bits: u16,
    symbols: u8,
    max_code_rate: f32,
    configured_max_prbs: u16,
) -> Option<u16> {
    let crc = crc_length(payload_bits);
    let total_bits = f64::from(payload_bits + crc);
    let denom = 8.0 * f64::from(symbols) * 2.0 * f64::from(max_code_rate);
    let mut prbs = ((total_bits / denom).ceil() as u16).max(1);

    let codeword_bits_estimate = u32::from(prbs) * 12 * u32::from(symbols) * 2;
    if is_segmented(payload_bits, codeword_bits_estimate) {
        prbs = prbs.saturating_mul(2);
    }
    let prbs = prbs.min(configured_max_prbs).max(1);

    let channel_bits = u32::from(prbs) * 12 * u32::from(symbols) * 2;
    let effective_code_rate = total_bits / f64::from(channel_bits);
    (effective_code_rate <= f64::from(max_code_rate)).then_some(prbs)
}

/// Number of OFDM symbols within a Format-3/4 grant carrying DM-RS rather
/// than data, approximating TS38.211 Table 6.4.1.3.3.2-1's symbol positions
/// by count only (the code-rate computation below only needs the count).
#[must_use]
fn dmrs_symbol_count(nof_symbols: u8, intra_slot_hopping: bool, additional_dmrs: bool) -> u8 {
    let base = match nof_symbols {
        4..=9 => {
            if intra_slot_hopping {
                2
            } else {
                1
            }
        }
        10..=14 => {
            if intra_slot_hopping {
                4
            } else {
                2
            }
        }
        _ => 1,
    };
    if additional_dmrs {
        base * 2
    } else {
        base
    }
}

/// Format-3 PRB count for a given payload and symbol configuration (§4.3.4).
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn recompute_format3_prbs(
    payload_bits: u16,
    nof_symbols: u8,
    pi2_bpsk: bool,
    intra_slot_hopping: bool,
    additional_dmrs: bool,
    max_code_rate: f32,
    configured_max_prbs: u16,
) -> Option<u16> {
    let crc = crc_length(payload_bits);
    let total_bits = f64::from(payload_bits + crc);
    let dmrs_symbols = dmrs_symbol_count(nof_symbols, intra_slot_hopping, additional_dmrs);
    let data_symbols = nof_symbols.saturating_sub(dmrs_symbols).max(1);
    let bits_per_re: u32 = if pi2_bpsk { 1 } else { 2 };
    let per_prb_bits = 12 * u32::from(data_symbols) * bits_per_re;

    let mut prbs = ((total_bits / f64::from(per_prb_bits)).ceil() as u16).max(1);
    let codeword_bits_estimate = u32::from(prbs) * per_prb_bits;
    if is_segmented(payload_bits, codeword_bits_estimate) {
        prbs = prbs.saturating_mul(2);
    }
    let prbs = prbs.min(configured_max_prbs).max(1);

    let channel_bits = u32::from(prbs) * per_prb_bits;
    let effective_code_rate = total_bits / f64::from(channel_bits);
    (effective_code_rate <= f64::from(max_code_rate)).then_some(prbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_payload_needs_no_crc() {
        assert_eq!(crc_length(10), 0);
        assert_eq!(crc_length(15), 6);
        assert_eq!(crc_length(40), 11);
    }

    #[test]
    fn format2_prb_grows_with_payload() {
        let small = recompute_format2_prbs(2, 2, 0.8, 16).unwrap();
        let large = recompute_format2_prbs(100, 2, 0.8, 16).unwrap();
        assert!(large > small);
    }

    #[test]
    fn format2_returns_none_when_max_prbs_cannot_meet_code_rate() {
        assert!(recompute_format2_prbs(1700, 2, 0.8, 1).is_none());
    }

    #[test]
    fn format3_pi2_bpsk_halves_capacity_per_prb() {
        let qpsk = recompute_format3_prbs(50, 10, false, false, false, 0.8, 16).unwrap();
        let bpsk = recompute_format3_prbs(50, 10, true, false, false, 0.8, 16).unwrap();
        assert!(bpsk >= qpsk);
    }
}
