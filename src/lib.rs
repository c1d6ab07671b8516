//! A multi-channel timestamp synchronizer: a fan-in filter over 2..9
//! independent, timestamp-bearing input streams that emits one aggregate
//! event per matching timestamp across every channel.
//!
//! Construct a [`Synchronizer`](synchronizer::Synchronizer) with one
//! [`Projection`](channel_set::Projection) per channel (a closure that
//! extracts a [`TimestampKey`](key::TimestampKey) from that channel's
//! message type), feed it messages with the generated `add_0` .. `add_8`
//! methods, and subscribe to completed tuples or dropped partial slots with
//! [`register_callback`](synchronizer::Synchronizer::register_callback) and
//! [`register_drop_callback`](synchronizer::Synchronizer::register_drop_callback).
//! The arity-specific methods, type aliases (`Synchronizer2` ..
//! `Synchronizer9`), and free constructor functions (`synchronizer2(..)` ..
//! `synchronizer9(..)`) are generated for tuple sizes 2 through 9 by the
//! macro in [`arity`].
//!
//! No approximate matching, no within-channel reordering, no wire protocol
//! or transport, no persistence, no clock synchronization across producers.
#![deny(unsafe_code)]

mod arity;
pub mod binding;
pub mod channel_set;
pub mod error;
pub mod key;
pub mod synchronizer;
mod table;

pub use arity::*;
pub use binding::{ChannelSource, InputBinding};
pub use channel_set::{ChannelSet, Message, Projection};
pub use error::ContractViolation;
pub use key::TimestampKey;
pub use synchronizer::{DropHandle, OutputHandle, Synchronizer};
