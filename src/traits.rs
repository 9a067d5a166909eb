//! Collaborator interfaces consumed by the planner.
//!
//! These are intentionally minimal. Concrete apps implement them over their
//! own routing service and storage.

use std::time::SystemTime;

use crate::error::{CacheError, SourceError};
use crate::model::{CacheKey, DistanceCacheRecord, Point, TravelMode};

/// Outcome reported by a distance source for one ordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStatus {
    Ok {
        duration_seconds: u32,
        distance_meters: u32,
    },
    /// The source had no usable answer (error status, no route, unmapped mode).
    Unusable,
}

/// Provides travel measurements for a set of points in one batched call.
///
/// The result is indexed by the provided point order: `result[i][j]` is the
/// status from `points[i]` to `points[j]`. Diagonal cells are ignored.
pub trait DistanceSource {
    fn fetch(&self, points: &[Point], mode: TravelMode) -> Result<Vec<Vec<PairStatus>>, SourceError>;
}

/// Time-bounded store of previously resolved distance entries.
///
/// Implementations must never return a record whose `expires_at` is not
/// after `now`.
pub trait DistanceCache: Sync {
    fn get(&self, key: &CacheKey, now: SystemTime) -> Result<Option<DistanceCacheRecord>, CacheError>;

    /// Insert or replace the record stored under `record.key()`.
    fn upsert(&self, record: &DistanceCacheRecord) -> Result<(), CacheError>;
}

impl<T: DistanceSource + ?Sized> DistanceSource for &T {
    fn fetch(&self, points: &[Point], mode: TravelMode) -> Result<Vec<Vec<PairStatus>>, SourceError> {
        (**self).fetch(points, mode)
    }
}

impl<T: DistanceCache + ?Sized> DistanceCache for &T {
    fn get(&self, key: &CacheKey, now: SystemTime) -> Result<Option<DistanceCacheRecord>, CacheError> {
        (**self).get(key, now)
    }

    fn upsert(&self, record: &DistanceCacheRecord) -> Result<(), CacheError> {
        (**self).upsert(record)
    }
}
