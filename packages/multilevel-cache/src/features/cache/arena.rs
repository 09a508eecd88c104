//! Slot arena with intrusive doubly-linked lists
//!
//! Entries live in a dense `Vec` and are addressed by stable slot index from
//! both the key index and the ordering lists. Lists are plain head/tail
//! records owned by the caller, so one arena can thread one list per
//! frequency tier.

use super::types::Entry;

pub(crate) type SlotId = usize;

struct Slot<K, V> {
    entry: Entry<K, V>,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// One ordering list threaded through the arena
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SlotList {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl SlotList {
    pub(crate) fn head(&self) -> Option<SlotId> {
        self.head
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub(crate) struct SlotArena<K, V> {
    slots: Vec<Option<Slot<K, V>>>,
    free: Vec<SlotId>,
    occupied: usize,
}

impl<K, V> SlotArena<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            occupied: 0,
        }
    }

    /// Store an entry in a vacant slot. The slot is not linked into any list.
    pub(crate) fn insert(&mut self, entry: Entry<K, V>) -> SlotId {
        let slot = Slot {
            entry,
            prev: None,
            next: None,
        };
        self.occupied += 1;
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(slot);
                id
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        }
    }

    /// Vacate a slot. The caller unlinks it from its list first.
    pub(crate) fn remove(&mut self, id: SlotId) -> Option<Entry<K, V>> {
        let slot = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        self.occupied -= 1;
        Some(slot.entry)
    }

    pub(crate) fn get(&self, id: SlotId) -> Option<&Entry<K, V>> {
        self.slot(id).map(|slot| &slot.entry)
    }

    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut Entry<K, V>> {
        self.slot_mut(id).map(|slot| &mut slot.entry)
    }

    pub(crate) fn len(&self) -> usize {
        self.occupied
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.occupied = 0;
    }

    /// Link `id` at the tail of `list`
    pub(crate) fn push_back(&mut self, list: &mut SlotList, id: SlotId) {
        let old_tail = list.tail;
        if let Some(slot) = self.slot_mut(id) {
            slot.prev = old_tail;
            slot.next = None;
        } else {
            return;
        }

        match old_tail.and_then(|tail| self.slot_mut(tail)) {
            Some(tail) => tail.next = Some(id),
            None => list.head = Some(id),
        }
        list.tail = Some(id);
        list.len += 1;
    }

    /// Unlink `id` from `list`; the slot stays occupied
    pub(crate) fn unlink(&mut self, list: &mut SlotList, id: SlotId) {
        let (prev, next) = match self.slot_mut(id) {
            Some(slot) => (slot.prev.take(), slot.next.take()),
            None => return,
        };

        match prev.and_then(|p| self.slot_mut(p)) {
            Some(prev_slot) => prev_slot.next = next,
            None => list.head = next,
        }
        match next.and_then(|n| self.slot_mut(n)) {
            Some(next_slot) => next_slot.prev = prev,
            None => list.tail = prev,
        }
        list.len = list.len.saturating_sub(1);
    }

    /// Iterate a list head to tail
    pub(crate) fn iter(&self, list: &SlotList) -> SlotIter<'_, K, V> {
        SlotIter {
            arena: self,
            cursor: list.head,
        }
    }

    fn slot(&self, id: SlotId) -> Option<&Slot<K, V>> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot<K, V>> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }
}

pub(crate) struct SlotIter<'a, K, V> {
    arena: &'a SlotArena<K, V>,
    cursor: Option<SlotId>,
}

impl<'a, K, V> Iterator for SlotIter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.arena.slot(self.cursor?)?;
        self.cursor = slot.next;
        Some(&slot.entry)
    }
}
