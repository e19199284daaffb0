use pucch_config::{PrbInterval, SymbolInterval};

/// The uplink resource grid is an external collaborator (§1): this crate only
/// ever reads `collides` and writes `fill`/`clear` on a rectangle the caller
/// exclusively owns for the duration of the call (§5).
pub trait ResourceGrid {
    /// True if any PRB/symbol in the rectangle is already occupied by a
    /// non-PUCCH uplink grant.
    fn collides(&self, prb: PrbInterval, symbols: SymbolInterval) -> bool;

    /// Marks the rectangle as occupied by a PUCCH transmission.
    fn fill(&mut self, prb: PrbInterval, symbols: SymbolInterval);

    /// Clears a rectangle previously marked by `fill`, used on rollback and
    /// `remove_ue_uci`.
    fn clear(&mut self, prb: PrbInterval, symbols: SymbolInterval);
}
