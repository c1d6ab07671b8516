use std::sync::Arc;

use crate::key::TimestampKey;

/// Extracts the match key from a channel's message type.
///
/// Pure, cheap, deterministic by contract. A channel whose message type
/// carries no natural timestamp should return [`TimestampKey::ZERO`] for
/// every message; such a channel then only matches other sentinel-keyed
/// channels, which preserves the arity at the type level instead of
/// disabling the channel outright.
pub type Projection<M> = Box<dyn Fn(&M) -> TimestampKey + Send + Sync>;

/// The heterogeneous set of message types bound to one [`Synchronizer`].
///
/// Implemented for tuples `(M0, M1)` through `(M0, .., M8)`, arities 2..=9,
/// by the arity macro in [`crate::arity`]. One trait implementation per
/// tuple size carries all of the per-arity variance; the actual
/// state-machine logic in [`crate::synchronizer`] is written exactly once,
/// generic over `T: ChannelSet`.
///
/// [`Synchronizer`]: crate::synchronizer::Synchronizer
pub trait ChannelSet: Send + Sync + 'static {
    /// Number of channels, fixed per implementing tuple, always 2..=9.
    const ARITY: usize;

    /// One optional message handle per channel: a pending slot's contents.
    /// Empty slots do not exist; creation happens at first arrival, so
    /// `Partial` is only ever observed with at least one position occupied.
    type Partial: Clone + Send + 'static;

    /// One present message handle per channel, what a completed slot
    /// yields to [`OutputSignal`](crate::synchronizer) subscribers.
    type Full: Clone + Send + 'static;

    /// One [`Projection`] per channel, supplied once at construction.
    type Projections: Send + Sync + 'static;

    /// A slot with no channel populated yet.
    fn empty_partial() -> Self::Partial;

    /// True iff every channel position is occupied.
    fn is_complete(partial: &Self::Partial) -> bool;

    /// Consumes a complete slot, yielding its messages in channel order.
    ///
    /// Callers must only invoke this once [`is_complete`](Self::is_complete)
    /// has returned `true` for the same value.
    fn into_full(partial: Self::Partial) -> Self::Full;
}

/// Message handle shared between the Synchronizer and its subscribers.
///
/// Re-exported mainly so channel message types read naturally as
/// `Arc<Frame>` etc. at call sites. The Synchronizer never constructs one
/// itself: producers do, once, and every subscriber gets a cheap clone of
/// the same handle.
pub type Message<M> = Arc<M>;
