//! Handles to host-owned objects.
//!
//! The core never owns scene objects. It keeps [`ObjectId`]s as cache keys
//! and asks the host whether one still resolves every time it is about to
//! use it. A handle names a slot plus the generation the slot had when the
//! object was created; freeing the slot bumps its generation, so a handle
//! kept past its object's destruction fails the check instead of naming
//! whatever reuses the slot.

use std::fmt;

// ---------------------------------------------------------------------------
// ObjectId
// ---------------------------------------------------------------------------

/// Non-owning reference to a host object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    slot: u32,
    generation: u32,
}

impl ObjectId {
    /// Handle for `slot` as of `generation`. Hosts normally get these from a
    /// [`HandleAllocator`].
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub fn slot(self) -> u32 {
        self.slot
    }

    /// How many times the slot had been freed when this handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({self})")
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.slot, self.generation)
    }
}

// ---------------------------------------------------------------------------
// SubscriptionId
// ---------------------------------------------------------------------------

/// Token returned by the host when a creation-notification subscription is
/// registered. Handing it back unsubscribes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

// ---------------------------------------------------------------------------
// HandleAllocator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    occupied: bool,
}

/// Issues [`ObjectId`]s for a host and answers liveness queries about them.
///
/// Freed slots are reused most-recent first; the generation bump on release
/// is what keeps old handles from resolving.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    slots: Vec<Slot>,
    vacant: Vec<u32>,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a handle for a newly created object.
    pub fn allocate(&mut self) -> ObjectId {
        match self.vacant.pop() {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                entry.occupied = true;
                ObjectId::new(slot, entry.generation)
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    occupied: true,
                });
                ObjectId::new(slot, 0)
            }
        }
    }

    /// The object behind `id` was destroyed. Every copy of `id` stops
    /// resolving. Returns `false` if `id` was already stale.
    pub fn release(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let entry = &mut self.slots[id.slot as usize];
        entry.occupied = false;
        entry.generation = entry.generation.wrapping_add(1);
        self.vacant.push(id.slot);
        true
    }

    /// Whether `id` still names the object it was issued for.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.slots
            .get(id.slot as usize)
            .is_some_and(|s| s.occupied && s.generation == id.generation)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_handles_are_distinct() {
        let mut alloc = HandleAllocator::new();
        let mut ids: Vec<ObjectId> = (0..50).map(|_| alloc.allocate()).collect();
        assert!(ids.iter().all(|&id| alloc.is_alive(id)));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn destroyed_object_handle_stops_resolving_when_slot_is_reused() {
        let mut alloc = HandleAllocator::new();
        let component = alloc.allocate();
        assert!(alloc.release(component));

        let replacement = alloc.allocate();
        assert_eq!(replacement.slot(), component.slot());
        assert_eq!(replacement.generation(), component.generation() + 1);
        assert!(alloc.is_alive(replacement));
        assert!(!alloc.is_alive(component));
    }

    #[test]
    fn releasing_twice_is_rejected() {
        let mut alloc = HandleAllocator::new();
        let id = alloc.allocate();
        assert!(alloc.release(id));
        assert!(!alloc.release(id));
        assert!(!alloc.is_alive(ObjectId::new(7, 0)), "never issued");
    }

    #[test]
    fn formatting() {
        let id = ObjectId::new(3, 2);
        assert_eq!(id.to_string(), "#3:2");
        assert_eq!(format!("{id:?}"), "ObjectId(#3:2)");
    }
}
