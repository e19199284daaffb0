/// The subset of DCI scheduling context needed to pick a common PUCCH
/// resource via the Δ_PRI search (§4.3.1).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DciContext {
    /// First CCE index of the scheduling PDCCH allocation.
    pub n_cce: u16,
    /// Number of CCEs in the CORESET the PDCCH was allocated from.
    pub n_cce_coreset: u16,
}

impl DciContext {
    #[must_use]
    pub const fn new(n_cce: u16, n_cce_coreset: u16) -> Self {
        Self {
            n_cce,
            n_cce_coreset,
        }
    }
}
