use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::channel_set::ChannelSet;
use crate::key::TimestampKey;
use crate::table::PendingTable;

struct Subscriber<F> {
    id: u64,
    callback: Arc<dyn Fn(F) + Send + Sync>,
}

/// Shared state guarded by a single mutex, per spec: the PendingTable, the
/// watermark, and both subscriber lists live under one lock so OutputSignal
/// and DropSignal emissions are totally ordered against each other and
/// against concurrent `add_N` calls on other threads.
struct State<T: ChannelSet> {
    table: PendingTable<T>,
    last_signal_time: Option<TimestampKey>,
    output_subs: Vec<Subscriber<T::Full>>,
    drop_subs: Vec<Subscriber<T::Partial>>,
}

impl<T: ChannelSet> State<T> {
    fn new() -> Self {
        Self {
            table: PendingTable::new(),
            last_signal_time: None,
            output_subs: Vec::new(),
            drop_subs: Vec::new(),
        }
    }
}

pub(crate) struct Inner<T: ChannelSet> {
    name: Mutex<String>,
    queue_size: usize,
    projections: T::Projections,
    state: Mutex<State<T>>,
    next_sub_id: AtomicU64,
}

impl<T: ChannelSet> Inner<T> {
    fn next_id(&self) -> u64 {
        self.next_sub_id.fetch_add(1, Ordering::Relaxed)
    }

    /// The whole state machine described in spec.md §4.4.1, written once,
    /// generic over the channel set. `key` is the match key this arrival
    /// was filed under (derived by the caller from the message's own
    /// projection); `place` writes the message into the correct position of
    /// a `T::Partial`.
    pub(crate) fn process(&self, key: TimestampKey, place: impl FnOnce(&mut T::Partial)) {
        let mut state = self.state.lock().expect("synchronizer state mutex poisoned");

        // Resolved open question: short-circuit arrivals at or below the
        // watermark straight to DropSignal instead of inserting them and
        // waiting for a later fire to sweep them out. See SPEC_FULL.md §4.4.
        if let Some(watermark) = state.last_signal_time {
            if key <= watermark {
                let mut partial = T::empty_partial();
                place(&mut partial);
                Self::notify(&state.drop_subs, partial);
                return;
            }
        }

        let slot = state.table.slot_mut(key);
        place(slot);

        if T::is_complete(slot) {
            let partial = state
                .table
                .remove(key)
                .expect("slot was just written above");
            let full = T::into_full(partial);
            state.last_signal_time = Some(key);

            Self::notify(&state.output_subs, full);

            for stale in state.table.drain_through(key) {
                Self::notify(&state.drop_subs, stale);
            }
        }

        if self.queue_size > 0 {
            while state.table.len() > self.queue_size {
                let evicted = state
                    .table
                    .evict_oldest()
                    .expect("len() > queue_size implies the table is non-empty");
                Self::notify(&state.drop_subs, evicted);
            }
        }
    }

    /// Invokes every subscriber with its own clone of `value`, isolating
    /// panics so one broken subscriber cannot poison the mutex or stop the
    /// rest of the fan-out (spec.md §7).
    fn notify<F: Clone>(subs: &[Subscriber<F>], value: F) {
        for sub in subs {
            let callback = sub.callback.clone();
            let value = value.clone();
            let _ = panic::catch_unwind(AssertUnwindSafe(|| (callback)(value)));
        }
    }
}

/// A bounded, timestamp-keyed partial-match fan-in over `T::ARITY` channels.
///
/// Cheap to clone (an `Arc` handle around shared state), so independent
/// producer threads and subscriber code can each hold their own handle to
/// the same synchronizer.
pub struct Synchronizer<T: ChannelSet> {
    pub(crate) inner: Arc<Inner<T>>,
}

impl<T: ChannelSet> Clone for Synchronizer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ChannelSet> Synchronizer<T> {
    /// Builds a new synchronizer. `queue_size` is a soft cap on the number
    /// of pending (partial) slots; `0` means unbounded, no size-based
    /// eviction, though watermark eviction still applies. Arity and
    /// per-channel projection completeness are enforced by `T` itself, so
    /// construction is infallible.
    pub fn new(queue_size: usize, projections: T::Projections) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: Mutex::new(String::new()),
                queue_size,
                projections,
                state: Mutex::new(State::new()),
                next_sub_id: AtomicU64::new(0),
            }),
        }
    }

    /// Diagnostic label; purely informational, no semantic effect.
    pub fn name(&self) -> String {
        self.inner
            .name
            .lock()
            .expect("synchronizer name mutex poisoned")
            .clone()
    }

    /// Sets the diagnostic label.
    pub fn set_name(&self, name: impl Into<String>) {
        *self.inner.name.lock().expect("synchronizer name mutex poisoned") = name.into();
    }

    /// Number of channels this synchronizer was built for.
    pub fn arity(&self) -> usize {
        T::ARITY
    }

    /// Registers a callback invoked, under the state lock, with every
    /// completed N-tuple in channel order. Exactly one invocation per fired
    /// event per subscriber; invocation order across subscribers of the
    /// same event is unspecified.
    pub fn register_callback(
        &self,
        callback: impl Fn(T::Full) + Send + Sync + 'static,
    ) -> OutputHandle<T> {
        let id = self.inner.next_id();
        let mut state = self
            .inner
            .state
            .lock()
            .expect("synchronizer state mutex poisoned");
        state.output_subs.push(Subscriber {
            id,
            callback: Arc::new(callback),
        });
        OutputHandle {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Registers a callback invoked, under the state lock, with every
    /// evicted partial slot (watermark eviction, size-bound eviction, or a
    /// stale arrival short-circuited straight to drop).
    pub fn register_drop_callback(
        &self,
        callback: impl Fn(T::Partial) + Send + Sync + 'static,
    ) -> DropHandle<T> {
        let id = self.inner.next_id();
        let mut state = self
            .inner
            .state
            .lock()
            .expect("synchronizer state mutex poisoned");
        state.drop_subs.push(Subscriber {
            id,
            callback: Arc::new(callback),
        });
        DropHandle {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Number of slots currently pending (neither fired nor dropped).
    pub fn pending_len(&self) -> usize {
        self.inner
            .state
            .lock()
            .expect("synchronizer state mutex poisoned")
            .table
            .len()
    }

    pub(crate) fn projections(&self) -> &T::Projections {
        &self.inner.projections
    }
}

/// Subscription handle for [`Synchronizer::register_callback`]. Dropping it
/// deregisters the callback; no further invocations happen from the thread
/// that drops it onward.
pub struct OutputHandle<T: ChannelSet> {
    id: u64,
    inner: Weak<Inner<T>>,
}

impl<T: ChannelSet> Drop for OutputHandle<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut state = inner.state.lock().expect("synchronizer state mutex poisoned");
            state.output_subs.retain(|sub| sub.id != self.id);
        }
    }
}

/// Subscription handle for [`Synchronizer::register_drop_callback`].
pub struct DropHandle<T: ChannelSet> {
    id: u64,
    inner: Weak<Inner<T>>,
}

impl<T: ChannelSet> Drop for DropHandle<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut state = inner.state.lock().expect("synchronizer state mutex poisoned");
            state.drop_subs.retain(|sub| sub.id != self.id);
        }
    }
}
