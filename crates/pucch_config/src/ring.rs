/// Rounds `max_delay_slots` (the longest valid PUCCH-vs-PDSCH delay plus the
/// maximum timing-advance offset) up to the next power of two, which is the
/// ring capacity shared by the collision manager's and resource manager's
/// per-slot rings (§3, §9 Design Notes).
#[must_use]
pub fn ring_capacity(max_delay_slots: u32) -> usize {
    let margin = max_delay_slots.saturating_add(1);
    margin.next_power_of_two().max(2) as usize
}

/// Maps a slot onto a ring index of the given capacity.
#[must_use]
pub fn ring_index(slot_uint: u32, ring_size: usize) -> usize {
    slot_uint as usize % ring_size
}
