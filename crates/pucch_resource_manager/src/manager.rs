use pucch_collision::{CollisionConfigError, CollisionManager, CollisionTable};
use pucch_config::{CellPucchConfig, PucchResourceId, Rnti, SlotPoint, UeCellPucchConfig};

use crate::guard::ReservationGuard;
use crate::ownership::OwnershipRing;

/// Owns the collision manager and the per-UE ownership bookkeeping layered
/// on top of it. One instance per cell; reservation transactions are opened
/// with [`ResourceManager::begin_reservation`] and either committed or rolled
/// back through the returned [`ReservationGuard`].
pub struct ResourceManager {
    pub(crate) collision: CollisionManager,
    pub(crate) ownership: OwnershipRing,
    last_slot: Option<SlotPoint>,
}

impl ResourceManager {
    pub fn new(cell: &CellPucchConfig, ring_size: usize) -> Result<Self, CollisionConfigError> {
        Ok(Self {
            collision: CollisionManager::new(cell, ring_size)?,
            ownership: OwnershipRing::new(ring_size),
            last_slot: None,
        })
    }

    #[must_use]
    pub fn resource_table(&self) -> &CollisionTable {
        self.collision.table()
    }

    pub fn begin_reservation<'a>(
        &'a mut self,
        slot: SlotPoint,
        rnti: Rnti,
        ue: &'a UeCellPucchConfig,
    ) -> ReservationGuard<'a> {
        ReservationGuard::new(self, ue, slot, rnti)
    }

    /// Opens a transaction with no dedicated UE configuration, for the common
    /// (pre-dedicated-resource) allocation path.
    pub fn begin_common_reservation(&mut self, slot: SlotPoint, rnti: Rnti) -> ReservationGuard<'_> {
        ReservationGuard::new_common(self, slot, rnti)
    }

    #[must_use]
    pub fn owner(&self, slot: SlotPoint, id: PucchResourceId) -> Option<Rnti> {
        self.ownership.owner(slot, id)
    }

    /// Whether `id` could be reserved for `slot` right now, without actually
    /// reserving it (§4.3.1 Δ_PRI search needs to probe several candidates).
    #[must_use]
    pub fn resource_is_free(&self, slot: SlotPoint, id: PucchResourceId) -> bool {
        !self.collision.would_collide(slot, id)
    }

    /// Advances the ring past `slot`, discarding every reservation still held
    /// there. Called once per new slot entering the scheduling window
    /// (§4.2 slot lifecycle).
    pub fn slot_indication(&mut self, slot: SlotPoint) {
        self.collision.clear_slot(slot);
        self.ownership.clear_slot(slot);
        self.last_slot = Some(slot);
        log::trace!("pucch resource manager: advanced past slot {slot}");
    }

    /// Resets every ring entry and forgets the last observed slot (§4.2
    /// Lifecycle) — a harder reset than `slot_indication`, which only ever
    /// touches the one slot entering the window.
    pub fn stop(&mut self) {
        self.collision.stop();
        self.ownership.stop();
        self.last_slot = None;
        log::trace!("pucch resource manager: stopped");
    }

    #[must_use]
    pub fn last_observed_slot(&self) -> Option<SlotPoint> {
        self.last_slot
    }
}
