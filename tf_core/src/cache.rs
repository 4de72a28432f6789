//! Time-ordered sample storage for one dynamic transform edge
//!
//! Keeps a bounded, stamp-sorted history of transforms and answers
//! interpolated queries. Requests outside the stored range are extrapolation
//! errors, never clamped.

use crate::error::{TfError, TfResult};
use crate::time::TfTime;
use crate::transform::Transform;

/// Default number of samples kept per edge.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// A bounded, time-ordered buffer of transform samples.
///
/// Samples are keyed by their stamp in total nanoseconds. Inserting at an
/// existing stamp replaces that sample; when the capacity is exceeded the
/// oldest sample is dropped.
#[derive(Debug, Clone)]
pub struct TimeCache {
    /// Samples sorted by stamp, oldest first
    samples: Vec<(i64, Transform)>,
    /// Maximum number of samples
    capacity: usize,
}

impl Default for TimeCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl TimeCache {
    /// Create a cache holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Insert a sample, keeping the buffer sorted by stamp.
    pub fn insert(&mut self, stamp: i64, transform: Transform) {
        match self.samples.binary_search_by_key(&stamp, |(s, _)| *s) {
            Ok(i) => self.samples[i] = (stamp, transform),
            Err(i) => self.samples.insert(i, (stamp, transform)),
        }
        if self.samples.len() > self.capacity {
            self.samples.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Stamp of the newest sample.
    pub fn newest_stamp(&self) -> Option<i64> {
        self.samples.last().map(|(s, _)| *s)
    }

    /// Stamp of the oldest sample.
    pub fn oldest_stamp(&self) -> Option<i64> {
        self.samples.first().map(|(s, _)| *s)
    }

    /// Remove all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Get the transform at `stamp`, interpolating between the two
    /// surrounding samples.
    ///
    /// Requests outside the buffered range fail with
    /// [`TfError::Extrapolation`]; a single-sample cache only answers its
    /// exact stamp.
    pub fn lookup(&self, stamp: i64) -> TfResult<Transform> {
        let (oldest, newest) = match (self.oldest_stamp(), self.newest_stamp()) {
            (Some(o), Some(n)) => (o, n),
            _ => {
                return Err(TfError::Extrapolation(format!(
                    "lookup at time {} failed, transform cache is empty",
                    TfTime::from_nanos(stamp)
                )))
            }
        };

        if self.samples.len() == 1 {
            return if stamp == oldest {
                Ok(self.samples[0].1)
            } else {
                Err(TfError::Extrapolation(format!(
                    "lookup would require extrapolation at time {}, but only a \
                     single transform is available at time {}",
                    TfTime::from_nanos(stamp),
                    TfTime::from_nanos(oldest)
                )))
            };
        }

        if stamp < oldest {
            return Err(TfError::Extrapolation(format!(
                "lookup would require extrapolation into the past: requested \
                 time {} but the earliest data is at time {}",
                TfTime::from_nanos(stamp),
                TfTime::from_nanos(oldest)
            )));
        }
        if stamp > newest {
            return Err(TfError::Extrapolation(format!(
                "lookup would require extrapolation into the future: requested \
                 time {} but the latest data is at time {}",
                TfTime::from_nanos(stamp),
                TfTime::from_nanos(newest)
            )));
        }

        let after = match self.samples.binary_search_by_key(&stamp, |(s, _)| *s) {
            Ok(i) => return Ok(self.samples[i].1),
            Err(i) => i,
        };
        let (t0, before) = self.samples[after - 1];
        let (t1, next) = self.samples[after];
        let ratio = (stamp - t0) as f64 / (t1 - t0) as f64;
        Ok(before.interpolate(&next, ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_insert_keeps_order() {
        let mut cache = TimeCache::new(10);
        cache.insert(300, Transform::from_translation([3.0, 0.0, 0.0]));
        cache.insert(100, Transform::from_translation([1.0, 0.0, 0.0]));
        cache.insert(200, Transform::from_translation([2.0, 0.0, 0.0]));

        assert_eq!(cache.oldest_stamp(), Some(100));
        assert_eq!(cache.newest_stamp(), Some(300));
    }

    #[test]
    fn test_insert_replaces_same_stamp() {
        let mut cache = TimeCache::new(10);
        cache.insert(100, Transform::from_translation([1.0, 0.0, 0.0]));
        cache.insert(100, Transform::from_translation([9.0, 0.0, 0.0]));

        assert_eq!(cache.len(), 1);
        let tf = cache.lookup(100).unwrap();
        assert_relative_eq!(tf.translation[0], 9.0);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut cache = TimeCache::new(2);
        cache.insert(100, Transform::identity());
        cache.insert(200, Transform::identity());
        cache.insert(300, Transform::identity());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.oldest_stamp(), Some(200));
    }

    #[test]
    fn test_lookup_interpolates() {
        let mut cache = TimeCache::new(10);
        cache.insert(0, Transform::from_translation([0.0, 0.0, 0.0]));
        cache.insert(100, Transform::from_translation([10.0, 0.0, 0.0]));

        let tf = cache.lookup(50).unwrap();
        assert_relative_eq!(tf.translation[0], 5.0);
    }

    #[test]
    fn test_lookup_exact_sample() {
        let mut cache = TimeCache::new(10);
        cache.insert(100, Transform::from_translation([1.0, 0.0, 0.0]));
        cache.insert(200, Transform::from_translation([2.0, 0.0, 0.0]));

        let tf = cache.lookup(200).unwrap();
        assert_relative_eq!(tf.translation[0], 2.0);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let mut cache = TimeCache::new(10);
        cache.insert(100, Transform::identity());
        cache.insert(200, Transform::identity());

        assert!(matches!(cache.lookup(50), Err(TfError::Extrapolation(_))));
        assert!(matches!(cache.lookup(250), Err(TfError::Extrapolation(_))));
    }

    #[test]
    fn test_lookup_single_sample() {
        let mut cache = TimeCache::new(10);
        cache.insert(100, Transform::from_translation([1.0, 0.0, 0.0]));

        assert!(cache.lookup(100).is_ok());
        assert!(matches!(cache.lookup(101), Err(TfError::Extrapolation(_))));
    }

    #[test]
    fn test_lookup_empty() {
        let cache = TimeCache::new(10);
        assert!(matches!(cache.lookup(0), Err(TfError::Extrapolation(_))));
    }
}
