use pucch_config::{FormatParams, Hop, HighFormatCommonConfig, PucchFormat, PucchResourceId, Rnti, UciBits, UplinkBwp};

/// Which UCI contribution a grant within a [`crate::state::UeGrants`] carries.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GrantKind {
    Harq,
    Sr,
    Csi,
}

/// A concrete PUCCH transmission to hand to the PHY interface (§4.3 Output).
#[derive(Debug, Clone, PartialEq)]
pub struct PucchPdu {
    pub rnti: Rnti,
    pub bwp: UplinkBwp,
    pub resource_id: PucchResourceId,
    pub format: PucchFormat,
    pub first_hop: Hop,
    pub second_hop: Option<Hop>,
    pub uci: UciBits,
    pub params: FormatParams,
    pub format_common: HighFormatCommonConfig,
    /// `(resource-set index, PUCCH resource indicator)`, present only for
    /// dedicated HARQ-ACK grants (§3 PUCCH grant).
    pub harq_set_and_indicator: Option<(u8, u8)>,
}

impl PucchPdu {
    #[must_use]
    pub fn hops(&self) -> impl Iterator<Item = Hop> + '_ {
        std::iter::once(self.first_hop).chain(self.second_hop)
    }
}
