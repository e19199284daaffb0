use pucch_config::{CellPucchConfig, Hop, PucchResource, PucchResourceId};

use crate::bitset::ResourceBitset;
use crate::common_resources::build_common_resources;
use crate::error::{CollisionConfigError, CollisionReject};

/// The number of common resources reserved at the bottom of the
/// cell-resource-id space (TS38.213 Table 9.2.1-1 always yields 16 rows).
pub const NOF_COMMON_RESOURCES: usize = 16;

fn footprint(resource: &PucchResource) -> (Hop, Option<Hop>) {
    resource.hops()
}

fn hop_overlaps(a: Hop, b: Hop) -> bool {
    a.prb.overlaps(b.prb) && a.symbols.overlaps(b.symbols)
}

fn footprints_overlap(a: &PucchResource, b: &PucchResource) -> bool {
    let (a0, a1) = footprint(a);
    let (b0, b1) = footprint(b);
    hop_overlaps(a0, b0)
        || a1.is_some_and(|h| hop_overlaps(h, b0))
        || b1.is_some_and(|h| hop_overlaps(a0, h))
        || matches!((a1, b1), (Some(ha), Some(hb)) if hop_overlaps(ha, hb))
}

/// Two resources belong to the same multiplexing family when they share a
/// format and an identical time-frequency footprint; within a family, only
/// the multiplexing index (cyclic shift / OCC / occ-index) tells them apart.
fn same_family(a: &PucchResource, b: &PucchResource) -> bool {
    a.format() == b.format() && footprint(a) == footprint(b)
}

/// Per §4.1: resources with disjoint footprints never collide. Resources
/// sharing a footprint only avoid collision when they are members of the same
/// multiplexing family *and* carry distinct multiplexing indexes; otherwise
/// (different family, or same index) they collide. A resource always collides
/// with itself.
fn resources_collide(a: &PucchResource, b: &PucchResource) -> bool {
    if !footprints_overlap(a, b) {
        return false;
    }
    if same_family(a, b) {
        a.params.multiplexing_index() == b.params.multiplexing_index()
    } else {
        true
    }
}

/// Precomputed, immutable per-cell resource table: the common and dedicated
/// PUCCH resources numbered into one contiguous cell-resource-id space, the
/// static collision matrix derived from their footprints, and the
/// multiplexing-region grouping used to report whether a region has spare
/// capacity before attempting a reservation.
pub struct CollisionTable {
    resources: Vec<PucchResource>,
    collision_rows: Vec<ResourceBitset>,
    mux_region_of: Vec<Option<usize>>,
    mux_regions: Vec<Vec<usize>>,
}

impl CollisionTable {
    pub fn new(cell: &CellPucchConfig) -> Result<Self, CollisionConfigError> {
        let common = build_common_resources(cell);
        let total_len = NOF_COMMON_RESOURCES + cell.dedicated_resources.len();

        let mut slots: Vec<Option<PucchResource>> = std::iter::repeat_with(|| None)
            .take(total_len)
            .collect();
        for resource in common {
            slots[resource.id.0 as usize] = Some(resource);
        }
        for resource in &cell.dedicated_resources {
            let index = resource.id.0 as usize;
            if index < NOF_COMMON_RESOURCES {
                return Err(CollisionConfigError::DedicatedIdOverlapsCommonRange(
                    resource.id,
                ));
            }
            if index >= total_len {
                return Err(CollisionConfigError::DedicatedIdOutOfRange(resource.id));
            }
            slots[index] = Some(resource.clone());
        }

        let resources = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(CollisionConfigError::NonContiguousResourceIds(index)))
            .collect::<Result<Vec<_>, _>>()?;

        let collision_rows = resources
            .iter()
            .map(|a| {
                let mut row = ResourceBitset::new(resources.len());
                for (j, b) in resources.iter().enumerate() {
                    if resources_collide(a, b) {
                        row.set(j);
                    }
                }
                row
            })
            .collect();

        let mut mux_regions: Vec<Vec<usize>> = Vec::new();
        let mut mux_region_of: Vec<Option<usize>> = vec![None; resources.len()];
        for i in 0..resources.len() {
            if mux_region_of[i].is_some() {
                continue;
            }
            let group: Vec<usize> = (i..resources.len())
                .filter(|&j| same_family(&resources[i], &resources[j]))
                .collect();
            if group.len() > 1 {
                let region_index = mux_regions.len();
                for &member in &group {
                    mux_region_of[member] = Some(region_index);
                }
                mux_regions.push(group);
            }
        }

        Ok(Self {
            resources,
            collision_rows,
            mux_region_of,
            mux_regions,
        })
    }

    #[must_use]
    pub fn resource(&self, id: PucchResourceId) -> &PucchResource {
        &self.resources[id.0 as usize]
    }

    #[must_use]
    pub fn nof_resources(&self) -> usize {
        self.resources.len()
    }

    /// Other members of `id`'s multiplexing region (excluding `id` itself),
    /// or an empty slice when the resource is not part of one.
    #[must_use]
    pub fn multiplexing_peers(&self, id: PucchResourceId) -> &[usize] {
        match self.mux_region_of[id.0 as usize] {
            Some(region) => &self.mux_regions[region],
            None => &[],
        }
    }

    #[must_use]
    pub fn collides(&self, a: PucchResourceId, b: PucchResourceId) -> bool {
        self.collision_rows[a.0 as usize].test(b.0 as usize)
    }

    pub(crate) fn collision_row(&self, id: PucchResourceId) -> &ResourceBitset {
        &self.collision_rows[id.0 as usize]
    }
}
