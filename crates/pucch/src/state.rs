use crate::pdu::{GrantKind, PucchPdu};

/// All PUCCH grants a single UE holds in a single slot (§3 UE grant list).
/// Invariant: at most one grant of each kind; a UE never holds both a
/// dedicated-HARQ grant and a common-HARQ reservation at once (the allocator
/// always releases the common resource before installing a dedicated one).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UeGrants {
    pub harq: Option<PucchPdu>,
    pub sr: Option<PucchPdu>,
    pub csi: Option<PucchPdu>,
}

impl UeGrants {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.harq.is_none() && self.sr.is_none() && self.csi.is_none()
    }

    pub fn slot_mut(&mut self, kind: GrantKind) -> &mut Option<PucchPdu> {
        match kind {
            GrantKind::Harq => &mut self.harq,
            GrantKind::Sr => &mut self.sr,
            GrantKind::Csi => &mut self.csi,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PucchPdu> {
        [&self.harq, &self.sr, &self.csi].into_iter().flatten()
    }

    /// The HARQ-ACK bit count currently active for this UE, wherever it is
    /// physically carried (a standalone HARQ grant, or merged into a set-1
    /// grant alongside SR/CSI).
    #[must_use]
    pub fn current_harq_bits(&self) -> Option<u16> {
        self.iter().map(|pdu| pdu.uci.harq_ack_bits).find(|&bits| bits > 0)
    }

    #[must_use]
    pub fn current_sr(&self) -> bool {
        self.iter().any(|pdu| pdu.uci.has_sr())
    }

    #[must_use]
    pub fn current_csi_bits(&self) -> Option<u16> {
        self.iter().map(|pdu| pdu.uci.csi_part1_bits).find(|&bits| bits > 0)
    }
}
