//! Time representation for transform stamps
//!
//! Transforms are stamped with a (seconds, nanoseconds) pair. The all-zero
//! time doubles as a sentinel meaning "the latest available transform".

use std::fmt;

/// Nanoseconds per second.
const NANOS_PER_SEC: i64 = 1_000_000_000;

/// An instant on the buffer timeline.
///
/// Seconds are signed so times before the epoch are representable; the
/// nanosecond field is unsigned and is not required to be normalized below
/// one second, callers pass whatever the wire carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TfTime {
    pub sec: i32,
    pub nanosec: u32,
}

impl TfTime {
    /// The zero time, used as the "latest available" sentinel in lookups.
    pub const ZERO: TfTime = TfTime { sec: 0, nanosec: 0 };

    pub fn new(sec: i32, nanosec: u32) -> Self {
        Self { sec, nanosec }
    }

    /// Build a time from a total nanosecond count.
    ///
    /// The result is normalized: `nanosec` is always below one second. A
    /// count whose second component falls outside the `i32` range (an
    /// unnormalized `nanosec` can push it past the edge) saturates at the
    /// nearest representable time instead of wrapping.
    pub fn from_nanos(nanos: i64) -> Self {
        let sec = nanos.div_euclid(NANOS_PER_SEC);
        if sec > i32::MAX as i64 {
            return Self {
                sec: i32::MAX,
                nanosec: (NANOS_PER_SEC - 1) as u32,
            };
        }
        if sec < i32::MIN as i64 {
            return Self {
                sec: i32::MIN,
                nanosec: 0,
            };
        }
        Self {
            sec: sec as i32,
            nanosec: nanos.rem_euclid(NANOS_PER_SEC) as u32,
        }
    }

    /// Total nanoseconds since the epoch.
    pub fn as_nanos(&self) -> i64 {
        self.sec as i64 * NANOS_PER_SEC + self.nanosec as i64
    }

    /// Whether this is the "latest available" sentinel.
    pub fn is_zero(&self) -> bool {
        self.sec == 0 && self.nanosec == 0
    }
}

impl PartialOrd for TfTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TfTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_nanos().cmp(&other.as_nanos())
    }
}

impl fmt::Display for TfTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nanosec)
    }
}
