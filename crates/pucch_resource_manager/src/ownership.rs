use std::collections::HashMap;

use pucch_config::{ring_index, PucchResourceId, Rnti, SlotPoint};

/// Ring of per-slot dedicated-resource ownership maps, sized identically to
/// the collision manager's reservation ring (§3). Tracks which RNTI a
/// dedicated resource was reserved for in a given slot, so a reservation
/// guard can tell an idempotent re-reservation by the same UE apart from a
/// genuine collision with someone else's grant.
pub struct OwnershipRing {
    slots: Vec<HashMap<PucchResourceId, Rnti>>,
}

impl OwnershipRing {
    #[must_use]
    pub fn new(ring_size: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(HashMap::new).take(ring_size).collect(),
        }
    }

    fn slot_map(&mut self, slot: SlotPoint) -> &mut HashMap<PucchResourceId, Rnti> {
        let index = ring_index(slot.to_uint(), self.slots.len());
        &mut self.slots[index]
    }

    #[must_use]
    pub fn owner(&self, slot: SlotPoint, id: PucchResourceId) -> Option<Rnti> {
        let index = ring_index(slot.to_uint(), self.slots.len());
        self.slots[index].get(&id).copied()
    }

    pub fn claim(&mut self, slot: SlotPoint, id: PucchResourceId, rnti: Rnti) {
        self.slot_map(slot).insert(id, rnti);
    }

    pub fn release(&mut self, slot: SlotPoint, id: PucchResourceId) {
        self.slot_map(slot).remove(&id);
    }

    pub fn clear_slot(&mut self, slot: SlotPoint) {
        self.slot_map(slot).clear();
    }

    /// Clears every slot in the ring, used by `ResourceManager::stop` (§4.2
    /// Lifecycle).
    pub fn stop(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_then_owner_round_trips() {
        let mut ring = OwnershipRing::new(4);
        let slot = SlotPoint::new(0, 1);
        let id = PucchResourceId::new(0);
        ring.claim(slot, id, Rnti::new(0x4601));
        assert_eq!(ring.owner(slot, id), Some(Rnti::new(0x4601)));
    }

    #[test]
    fn release_clears_ownership() {
        let mut ring = OwnershipRing::new(4);
        let slot = SlotPoint::new(0, 1);
        let id = PucchResourceId::new(0);
        ring.claim(slot, id, Rnti::new(0x4601));
        ring.release(slot, id);
        assert_eq!(ring.owner(slot, id), None);
    }

    #[test]
    fn different_ring_slots_are_independent() {
        let mut ring = OwnershipRing::new(4);
        let id = PucchResourceId::new(0);
        ring.claim(SlotPoint::new(0, 1), id, Rnti::new(0x4601));
        assert_eq!(ring.owner(SlotPoint::new(0, 2), id), None);
    }

    #[test]
    fn stop_clears_ownership_across_every_ring_slot() {
        let mut ring = OwnershipRing::new(4);
        let id = PucchResourceId::new(0);
        ring.claim(SlotPoint::new(0, 1), id, Rnti::new(0x4601));
        ring.claim(SlotPoint::new(0, 2), id, Rnti::new(0x4602));
        ring.stop();
        assert_eq!(ring.owner(SlotPoint::new(0, 1), id), None);
        assert_eq!(ring.owner(SlotPoint::new(0, 2), id), None);
    }
}
