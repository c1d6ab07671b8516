use std::fmt;

/// Errors surfaced by the parts of the API that still have a genuinely
/// dynamic failure mode.
///
/// An out-of-range channel index or a message filed under the wrong key
/// cannot happen here at all: `add_0` .. `add_{N-1}` are distinct,
/// statically-typed methods rather than one `add(index, msg)` entry point,
/// and every key a message is filed under is derived from that same
/// message's own projection, so the two can never disagree. What remains is
/// binding to an external, out-of-scope collaborator, which can fail for
/// reasons this crate cannot predict or prevent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContractViolation {
    /// An [`InputBinding`](crate::binding::InputBinding) attempted to attach
    /// to an external channel source that refused the subscription (for
    /// instance, because the source was already shut down).
    SourceUnavailable {
        /// Index of the channel whose source rejected the binding.
        channel: usize,
    },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::SourceUnavailable { channel } => {
                write!(f, "channel {channel}: source unavailable for binding")
            }
        }
    }
}

impl std::error::Error for ContractViolation {}
