use std::sync::{Arc, Mutex};

use crate::channel_set::ChannelSet;
use crate::error::ContractViolation;
use crate::synchronizer::Synchronizer;

/// An external producer of timestamped messages that a [`Synchronizer`] can
/// be wired up to directly, instead of the caller driving `add_N` by hand.
///
/// Implemented outside this crate, against whatever publish/subscribe
/// mechanism the embedding application already uses (a topic bus, a socket
/// reader, a test fixture). `register_sink` is called once per binding and
/// must keep invoking `sink` with every message the source produces until
/// the returned token is dropped.
pub trait ChannelSource: Send + Sync {
    /// The message type this source produces.
    type Message: Send + Sync + 'static;

    /// Subscribes `sink` to this source's message stream. The returned token
    /// detaches the subscription when dropped; its `Drop` impl belongs to
    /// the implementor, not to this crate.
    fn register_sink(
        &self,
        sink: Arc<dyn Fn(Arc<Self::Message>) + Send + Sync>,
    ) -> Result<Box<dyn Send>, ContractViolation>;
}

impl<S: ChannelSource + ?Sized> ChannelSource for Arc<S> {
    type Message = S::Message;

    fn register_sink(
        &self,
        sink: Arc<dyn Fn(Arc<Self::Message>) + Send + Sync>,
    ) -> Result<Box<dyn Send>, ContractViolation> {
        (**self).register_sink(sink)
    }
}

/// Wires a [`Synchronizer`] to a set of [`ChannelSource`]s, one per channel.
///
/// `connect_input` (arity-generated, see [`crate::arity`]) replaces whatever
/// sources were previously bound: the old subscription tokens are dropped
/// before the new ones are registered, so there is never a window where both
/// the old and new sources feed the same synchronizer.
pub struct InputBinding<T: ChannelSet> {
    pub(crate) synchronizer: Synchronizer<T>,
    pub(crate) handles: Mutex<Vec<Box<dyn Send>>>,
}

impl<T: ChannelSet> InputBinding<T> {
    /// Creates a binding with no sources attached yet.
    pub fn new(synchronizer: Synchronizer<T>) -> Self {
        Self {
            synchronizer,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// The synchronizer this binding feeds.
    pub fn synchronizer(&self) -> &Synchronizer<T> {
        &self.synchronizer
    }

    /// Detaches every currently bound source, dropping their subscription
    /// tokens. Leaves the synchronizer itself untouched.
    pub fn disconnect(&self) {
        self.handles
            .lock()
            .expect("input binding handle mutex poisoned")
            .clear();
    }

    pub(crate) fn replace_handles(&self, new_handles: Vec<Box<dyn Send>>) {
        let mut handles = self
            .handles
            .lock()
            .expect("input binding handle mutex poisoned");
        handles.clear();
        *handles = new_handles;
    }
}
