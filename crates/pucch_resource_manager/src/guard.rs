use pucch_config::{CellPucchConfig, PucchResourceId, Rnti, SlotPoint, UeCellPucchConfig};

use crate::error::ReservationReject;
use crate::manager::ResourceManager;

/// One PUCCH reservation transaction for a single UE in a single slot.
///
/// Every `reserve_*` call that succeeds is recorded; if the guard is dropped
/// without [`ReservationGuard::commit`] being called, every resource it
/// reserved is rolled back automatically, so a caller that bails out of an
/// allocation attempt partway through (e.g. because Format2 PRB recomputation
/// later fails) never leaks a reservation.
pub struct ReservationGuard<'a> {
    manager: &'a mut ResourceManager,
    ue: Option<&'a UeCellPucchConfig>,
    slot: SlotPoint,
    rnti: Rnti,
    reserved: Vec<PucchResourceId>,
    committed: bool,
}

impl<'a> ReservationGuard<'a> {
    /// Opens a transaction for a UE with a known dedicated configuration,
    /// giving access to the named `harq`/`sr`/`csi` accessors.
    pub(crate) fn new(
        manager: &'a mut ResourceManager,
        ue: &'a UeCellPucchConfig,
        slot: SlotPoint,
        rnti: Rnti,
    ) -> Self {
        Self {
            manager,
            ue: Some(ue),
            slot,
            rnti,
            reserved: Vec::new(),
            committed: false,
        }
    }

    /// Opens a transaction with no dedicated configuration, for the common
    /// (pre-dedicated-resource) allocation path — only [`Self::reserve_common`]
    /// is available.
    pub(crate) fn new_common(manager: &'a mut ResourceManager, slot: SlotPoint, rnti: Rnti) -> Self {
        Self {
            manager,
            ue: None,
            slot,
            rnti,
            reserved: Vec::new(),
            committed: false,
        }
    }

    fn ue(&self) -> &'a UeCellPucchConfig {
        self.ue
            .expect("this reservation guard was opened without a UE configuration")
    }

    /// Exposes the resource table while the transaction is open, so a caller
    /// can look up a candidate's footprint before deciding whether to commit
    /// it, without needing a second borrow of the owning [`ResourceManager`].
    #[must_use]
    pub fn resource_table(&self) -> &pucch_collision::CollisionTable {
        self.manager.resource_table()
    }

    fn reserve_one(&mut self, id: PucchResourceId) -> Result<PucchResourceId, ReservationReject> {
        if let Some(owner) = self.manager.ownership.owner(self.slot, id) {
            return if owner == self.rnti {
                Ok(id)
            } else {
                Err(ReservationReject::OwnedByAnotherUe(id, owner))
            };
        }
        self.manager.collision.try_reserve(self.slot, id)?;
        self.manager.ownership.claim(self.slot, id, self.rnti);
        self.reserved.push(id);
        Ok(id)
    }

    fn release_one(&mut self, id: PucchResourceId) {
        self.manager.collision.free(self.slot, id);
        self.manager.ownership.release(self.slot, id);
        self.reserved.retain(|&x| x != id);
    }

    /// Reserves an arbitrary cell-resource-id, used by the allocator for the
    /// common (pre-dedicated) PUCCH resource path, which is addressed
    /// directly by the Δ_PRI search rather than through the UE's resource
    /// sets (§4.3.1).
    pub fn reserve_common(&mut self, id: PucchResourceId) -> Result<PucchResourceId, ReservationReject> {
        self.reserve_one(id)
    }

    /// First-fit reservation over resource-set 0 or 1, skipping the last two
    /// entries of set 0 when they are reserved for SR/CSI multiplexing
    /// (§4.2, [`UeCellPucchConfig::reserves_set0_tail_for_multiplexing`]).
    pub fn reserve_next_harq_set_i(&mut self, set_index: u8, cell: &CellPucchConfig) -> Result<PucchResourceId, ReservationReject> {
        let ids = self.harq_set(set_index);
        let usable = if set_index == 0 && self.ue().reserves_set0_tail_for_multiplexing(cell) {
            &ids[..ids.len().saturating_sub(2)]
        } else {
            &ids[..]
        };
        for &id in usable {
            if let Ok(id) = self.reserve_one(id) {
                return Ok(id);
            }
        }
        Err(ReservationReject::SetExhausted)
    }

    /// Reserves the set entry directly addressed by a DCI PUCCH resource
    /// indicator field.
    pub fn reserve_harq_by_indicator(&mut self, set_index: u8, indicator: u8) -> Result<PucchResourceId, ReservationReject> {
        let ids = self.harq_set(set_index);
        let id = *ids
            .get(indicator as usize)
            .ok_or(ReservationReject::IndicatorOutOfRange(indicator))?;
        self.reserve_one(id)
    }

    pub fn reserve_sr(&mut self) -> Result<PucchResourceId, ReservationReject> {
        self.reserve_one(self.ue().sr_resource)
    }

    pub fn reserve_csi(&mut self) -> Result<PucchResourceId, ReservationReject> {
        let id = self.ue().csi_resource.ok_or(ReservationReject::SetExhausted)?;
        self.reserve_one(id)
    }

    #[must_use]
    pub fn peek_sr(&self) -> Option<PucchResourceId> {
        let sr_resource = self.ue().sr_resource;
        (self.manager.ownership.owner(self.slot, sr_resource) == Some(self.rnti)).then_some(sr_resource)
    }

    #[must_use]
    pub fn peek_csi(&self) -> Option<PucchResourceId> {
        let id = self.ue().csi_resource?;
        (self.manager.ownership.owner(self.slot, id) == Some(self.rnti)).then_some(id)
    }

    pub fn release_harq_set0(&mut self) {
        for id in self.ue().harq_set0.clone() {
            self.release_one(id);
        }
    }

    pub fn release_harq_set1(&mut self) {
        for id in self.ue().harq_set1.clone() {
            self.release_one(id);
        }
    }

    pub fn release_sr(&mut self) {
        self.release_one(self.ue().sr_resource);
    }

    pub fn release_csi(&mut self) {
        if let Some(id) = self.ue().csi_resource {
            self.release_one(id);
        }
    }

    /// Releases an arbitrary cell-resource-id, the common-resource
    /// counterpart to [`Self::reserve_common`].
    pub fn release_common(&mut self, id: PucchResourceId) {
        self.release_one(id);
    }

    fn harq_set(&self, set_index: u8) -> Vec<PucchResourceId> {
        match set_index {
            0 => self.ue().harq_set0.clone(),
            1 => self.ue().harq_set1.clone(),
            other => unreachable!("resource set index must be 0 or 1, got {other}"),
        }
    }

    /// Finalizes every reservation made through this guard. Without this
    /// call, dropping the guard rolls every one of them back.
    ///
    /// If the transaction ends up holding both a set-0 and a set-1 HARQ
    /// resource, the set-0 one is released: a merge into a high-format set-1
    /// grant supersedes the low-format set-0 entry it replaces (§4.2).
    pub fn commit(mut self) {
        if let Some(ue) = self.ue {
            let holds_set0 = ue.harq_set0.iter().any(|&id| self.reserved.contains(&id));
            let holds_set1 = ue.harq_set1.iter().any(|&id| self.reserved.contains(&id));
            if holds_set0 && holds_set1 {
                self.release_harq_set0();
            }
        }
        self.committed = true;
    }
}

impl Drop for ReservationGuard<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for id in std::mem::take(&mut self.reserved) {
            self.manager.collision.free(self.slot, id);
            self.manager.ownership.release(self.slot, id);
        }
    }
}
