use std::fmt;

/// A totally ordered timestamp used as the match key across channels.
///
/// Nanosecond resolution, exact equality only: no tolerance, no clock
/// synchronization. Two arrivals on different channels "match" iff their
/// keys compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimestampKey(i64);

impl TimestampKey {
    /// The sentinel key used by channels whose message type carries no
    /// natural timestamp. Such a channel only ever matches other
    /// sentinel-keyed channels.
    pub const ZERO: TimestampKey = TimestampKey(0);

    /// Builds a key directly from a nanosecond count.
    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Returns the underlying nanosecond count.
    #[inline]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }
}

impl From<i64> for TimestampKey {
    #[inline]
    fn from(nanos: i64) -> Self {
        Self(nanos)
    }
}

impl fmt::Display for TimestampKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}
