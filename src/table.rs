use std::collections::BTreeMap;

use crate::channel_set::ChannelSet;
use crate::key::TimestampKey;

/// Ordered mapping from [`TimestampKey`] to a channel set's partial slot.
/// This is the Synchronizer's pending state.
///
/// Backed by a [`BTreeMap`], which gives ascending-key traversal for free;
/// both eviction sweeps the Synchronizer performs (watermark and
/// size-bound) rely on that ordering rather than sorting anything
/// themselves.
pub(crate) struct PendingTable<T: ChannelSet> {
    slots: BTreeMap<TimestampKey, T::Partial>,
}

impl<T: ChannelSet> PendingTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slot at `key`, creating an empty one first if absent.
    pub(crate) fn slot_mut(&mut self, key: TimestampKey) -> &mut T::Partial {
        self.slots.entry(key).or_insert_with(T::empty_partial)
    }

    pub(crate) fn remove(&mut self, key: TimestampKey) -> Option<T::Partial> {
        self.slots.remove(&key)
    }

    /// Removes and returns every slot whose key is `<= watermark`, in
    /// ascending key order.
    pub(crate) fn drain_through(&mut self, watermark: TimestampKey) -> Vec<T::Partial> {
        let stale: Vec<TimestampKey> = self
            .slots
            .range(..=watermark)
            .map(|(&key, _)| key)
            .collect();
        stale
            .into_iter()
            .map(|key| {
                self.slots
                    .remove(&key)
                    .expect("key was just read from this same map")
            })
            .collect()
    }

    /// Removes and returns the slot with the smallest key, if any.
    pub(crate) fn evict_oldest(&mut self) -> Option<T::Partial> {
        let key = *self.slots.keys().next()?;
        self.slots.remove(&key)
    }
}
