use pucch_config::{ring_index, CellPucchConfig, PucchResourceId, SlotPoint};

use crate::bitset::ResourceBitset;
use crate::error::{CollisionConfigError, CollisionReject};
use crate::table::CollisionTable;

/// Owns the precomputed collision table and the ring of per-slot "in use"
/// bitsets that make up the PUCCH-PUCCH collision check (§4.1). Reservation
/// here is purely intra-PUCCH: collision against an unrelated uplink grant on
/// the shared resource grid is the allocator's concern, checked separately
/// against the resource grid.
pub struct CollisionManager {
    table: CollisionTable,
    ring: Vec<ResourceBitset>,
}

impl CollisionManager {
    pub fn new(cell: &CellPucchConfig, ring_size: usize) -> Result<Self, CollisionConfigError> {
        assert!(ring_size.is_power_of_two(), "ring size must be a power of two");
        let table = CollisionTable::new(cell)?;
        let ring = std::iter::repeat_with(|| ResourceBitset::new(table.nof_resources()))
            .take(ring_size)
            .collect();
        Ok(Self { table, ring })
    }

    #[must_use]
    pub fn table(&self) -> &CollisionTable {
        &self.table
    }

    fn ring_slot(&mut self, slot: SlotPoint) -> &mut ResourceBitset {
        let index = ring_index(slot.to_uint(), self.ring.len());
        &mut self.ring[index]
    }

    /// Non-mutating check of whether `try_reserve(slot, id)` would currently
    /// fail, without taking the reservation. Used by callers that need to
    /// probe several candidates before committing to one (§4.3.1).
    #[must_use]
    pub fn would_collide(&self, slot: SlotPoint, id: PucchResourceId) -> bool {
        let index = ring_index(slot.to_uint(), self.ring.len());
        self.ring[index].intersects(self.table.collision_row(id))
    }

    /// Marks `id` as in use for `slot`, failing if it collides with a
    /// resource already reserved there.
    pub fn try_reserve(&mut self, slot: SlotPoint, id: PucchResourceId) -> Result<(), CollisionReject> {
        let row = self.table.collision_row(id).clone();
        let bitset = self.ring_slot(slot);
        if bitset.intersects(&row) {
            log::debug!("pucch collision manager: {id} collides with an in-use resource at slot {slot}");
            return Err(CollisionReject::PucchCollision(id));
        }
        bitset.set(id.0 as usize);
        log::trace!("pucch collision manager: reserved {id} at slot {slot}");
        Ok(())
    }

    pub fn free(&mut self, slot: SlotPoint, id: PucchResourceId) {
        self.ring_slot(slot).clear(id.0 as usize);
    }

    /// Clears every reservation for `slot`, called when the ring advances
    /// past it (`slot_indication`, §4.2).
    pub fn clear_slot(&mut self, slot: SlotPoint) {
        self.ring_slot(slot).clear_all();
    }

    /// Clears every slot in the ring, used by `ResourceManager::stop` (§4.2
    /// Lifecycle) rather than just the one slot `slot_indication` advances
    /// past.
    pub fn stop(&mut self) {
        for bitset in &mut self.ring {
            bitset.clear_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pucch_config::UplinkBwp;

    fn cell() -> CellPucchConfig {
        CellPucchConfig::new(
            UplinkBwp {
                scs_numerology: 0,
                start_crb: 0,
                nof_crbs: 52,
            },
            11,
            vec![],
            0,
            8,
        )
        .unwrap()
    }

    #[test]
    fn second_reservation_of_a_colliding_resource_is_rejected() {
        let mut manager = CollisionManager::new(&cell(), 8).unwrap();
        let slot = SlotPoint::new(0, 0);
        let id = PucchResourceId::new(0);
        manager.try_reserve(slot, id).unwrap();
        assert!(manager.try_reserve(slot, id).is_err());
    }

    #[test]
    fn freeing_a_resource_allows_it_to_be_reserved_again() {
        let mut manager = CollisionManager::new(&cell(), 8).unwrap();
        let slot = SlotPoint::new(0, 0);
        let id = PucchResourceId::new(0);
        manager.try_reserve(slot, id).unwrap();
        manager.free(slot, id);
        assert!(manager.try_reserve(slot, id).is_ok());
    }

    #[test]
    fn reservations_in_different_ring_slots_do_not_interfere() {
        let mut manager = CollisionManager::new(&cell(), 8).unwrap();
        let id = PucchResourceId::new(0);
        manager.try_reserve(SlotPoint::new(0, 0), id).unwrap();
        assert!(manager.try_reserve(SlotPoint::new(0, 1), id).is_ok());
    }

    #[test]
    fn clear_slot_releases_every_reservation_in_it() {
        let mut manager = CollisionManager::new(&cell(), 8).unwrap();
        let slot = SlotPoint::new(0, 0);
        let id = PucchResourceId::new(0);
        manager.try_reserve(slot, id).unwrap();
        manager.clear_slot(slot);
        assert!(manager.try_reserve(slot, id).is_ok());
    }

    #[test]
    fn stop_releases_reservations_across_every_ring_slot() {
        let mut manager = CollisionManager::new(&cell(), 8).unwrap();
        let id = PucchResourceId::new(0);
        manager.try_reserve(SlotPoint::new(0, 0), id).unwrap();
        manager.try_reserve(SlotPoint::new(0, 1), id).unwrap();
        manager.stop();
        assert!(manager.try_reserve(SlotPoint::new(0, 0), id).is_ok());
        assert!(manager.try_reserve(SlotPoint::new(0, 1), id).is_ok());
    }
}
