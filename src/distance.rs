//! Pairwise travel data: cache lookup, batched fetch, geometric fallback.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, SystemTime};

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::haversine::{DEFAULT_SPEED_KMH, HaversineEstimator};
use crate::model::{CacheKey, DistanceCacheRecord, DistanceEntry, Point, TravelMode};
use crate::traits::{DistanceCache, DistanceSource, PairStatus};

/// Cached entries live for one day.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DistanceOptions {
    pub cache_ttl_secs: u64,
    /// Assumed speed for the straight-line fallback.
    pub fallback_speed_kmh: f64,
}

impl Default for DistanceOptions {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            fallback_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

/// Resolves directed travel entries for every ordered pair of points.
///
/// Fresh cache records are served first; the remaining pairs come from one
/// batched request to the source. Pairs the source cannot answer, or every
/// missing pair when the request fails outright, are estimated with the
/// haversine fallback. Only source-resolved entries are written back.
#[derive(Debug)]
pub struct DistanceProvider<S, C> {
    source: S,
    cache: C,
    options: DistanceOptions,
}

impl<S, C> DistanceProvider<S, C>
where
    S: DistanceSource,
    C: DistanceCache,
{
    pub fn new(source: S, cache: C) -> Self {
        Self::with_options(source, cache, DistanceOptions::default())
    }

    pub fn with_options(source: S, cache: C, options: DistanceOptions) -> Self {
        Self { source, cache, options }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Entries for every ordered pair `(i, j), i != j` of distinct points.
    ///
    /// Points sharing an id are queried once, so `n` distinct ids always
    /// yield `n * (n - 1)` entries, ordered by origin then destination.
    pub fn get_matrix(&self, points: &[Point], mode: TravelMode) -> Vec<DistanceEntry> {
        let points = unique_points(points);
        let n = points.len();
        let now = SystemTime::now();

        let mut slots: Vec<Option<DistanceEntry>> = vec![None; n * n];
        let mut misses = Vec::new();
        for (i, origin) in points.iter().enumerate() {
            for (j, dest) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                match self.cached(&CacheKey::new(origin.id.as_str(), dest.id.as_str(), mode), now) {
                    Some(entry) => slots[i * n + j] = Some(entry),
                    None => misses.push((i, j)),
                }
            }
        }

        debug!(
            point_count = n,
            hits = n * n.saturating_sub(1) - misses.len(),
            misses = misses.len(),
            mode = mode.as_str(),
            "distance cache lookup"
        );

        if !misses.is_empty() {
            let fetched = self.resolve_misses(&points, mode, &misses, &mut slots);
            self.persist(fetched, mode, now);
        }

        slots.into_iter().flatten().collect()
    }

    fn cached(&self, key: &CacheKey, now: SystemTime) -> Option<DistanceEntry> {
        match self.cache.get(key, now) {
            Ok(record) => record.filter(|r| r.is_fresh(now)).map(|r| r.entry),
            Err(err) => {
                warn!(error = %err, origin = %key.origin_id, dest = %key.dest_id, "distance cache read failed");
                None
            }
        }
    }

    /// Fill every missing slot. Returns the entries that came from the source.
    fn resolve_misses(
        &self,
        points: &[Point],
        mode: TravelMode,
        misses: &[(usize, usize)],
        slots: &mut [Option<DistanceEntry>],
    ) -> Vec<DistanceEntry> {
        let n = points.len();
        let estimator = HaversineEstimator::new(self.options.fallback_speed_kmh);

        let table = match self.source.fetch(points, mode) {
            Ok(table) => table,
            Err(err) => {
                warn!(error = %err, fallback = misses.len(), "distance source failed, using straight-line estimates");
                for &(i, j) in misses {
                    slots[i * n + j] = Some(estimator.estimate(&points[i], &points[j]));
                }
                return Vec::new();
            }
        };

        let mut fetched = Vec::new();
        let mut substituted = 0usize;
        for &(i, j) in misses {
            let status = table.get(i).and_then(|row| row.get(j)).copied();
            let entry = match status {
                Some(PairStatus::Ok {
                    duration_seconds,
                    distance_meters,
                }) => {
                    let entry = DistanceEntry {
                        origin_id: points[i].id.clone(),
                        dest_id: points[j].id.clone(),
                        duration_seconds,
                        distance_meters,
                    };
                    fetched.push(entry.clone());
                    entry
                }
                Some(PairStatus::Unusable) | None => {
                    substituted += 1;
                    estimator.estimate(&points[i], &points[j])
                }
            };
            slots[i * n + j] = Some(entry);
        }

        if substituted > 0 {
            debug!(substituted, "unusable pairs replaced by straight-line estimates");
        }

        fetched
    }

    /// Best-effort write-back. Failures are logged and dropped.
    fn persist(&self, entries: Vec<DistanceEntry>, mode: TravelMode, now: SystemTime) {
        if entries.is_empty() {
            return;
        }

        let expires_at = now + Duration::from_secs(self.options.cache_ttl_secs);
        let cache = &self.cache;
        entries
            .into_par_iter()
            .map(|entry| DistanceCacheRecord {
                entry,
                travel_mode: mode,
                expires_at,
            })
            .for_each(|record| {
                if let Err(err) = cache.upsert(&record) {
                    warn!(
                        error = %err,
                        origin = %record.entry.origin_id,
                        dest = %record.entry.dest_id,
                        "distance cache write failed"
                    );
                }
            });
    }
}

fn unique_points(points: &[Point]) -> Vec<Point> {
    let mut seen = HashSet::new();
    points
        .iter()
        .filter(|point| seen.insert(point.id.as_str()))
        .cloned()
        .collect()
}

/// Directed lookup over resolved entries.
#[derive(Debug, Clone, Default)]
pub struct TravelTable {
    entries: HashMap<String, HashMap<String, DistanceEntry>>,
}

impl TravelTable {
    pub fn new(entries: Vec<DistanceEntry>) -> Self {
        let mut table: HashMap<String, HashMap<String, DistanceEntry>> = HashMap::new();
        for entry in entries {
            table
                .entry(entry.origin_id.clone())
                .or_default()
                .insert(entry.dest_id.clone(), entry);
        }
        Self { entries: table }
    }

    pub fn get(&self, origin_id: &str, dest_id: &str) -> Option<&DistanceEntry> {
        self.entries.get(origin_id).and_then(|row| row.get(dest_id))
    }

    /// `(seconds, meters)` from origin to dest. A point to itself is free.
    pub fn travel(&self, origin_id: &str, dest_id: &str) -> Option<(u32, u32)> {
        if origin_id == dest_id {
            return Some((0, 0));
        }
        self.get(origin_id, dest_id)
            .map(|entry| (entry.duration_seconds, entry.distance_meters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryDistanceCache;
    use crate::error::SourceError;
    use crate::model::Category;

    struct FixedSource(u32);

    impl DistanceSource for FixedSource {
        fn fetch(&self, points: &[Point], _mode: TravelMode) -> Result<Vec<Vec<PairStatus>>, SourceError> {
            let cell = PairStatus::Ok {
                duration_seconds: self.0,
                distance_meters: self.0 * 10,
            };
            Ok(vec![vec![cell; points.len()]; points.len()])
        }
    }

    #[test]
    fn test_duplicate_point_ids_are_queried_once() {
        let provider = DistanceProvider::new(FixedSource(60), MemoryDistanceCache::new());
        let a = Point::new("a", 37.5, 127.0, Category::Cafe);
        let b = Point::new("b", 37.6, 127.1, Category::Bar);

        let entries = provider.get_matrix(&[a.clone(), b, a], TravelMode::Walking);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.origin_id != e.dest_id));
    }

    #[test]
    fn test_single_point_has_no_entries() {
        let provider = DistanceProvider::new(FixedSource(60), MemoryDistanceCache::new());
        let a = Point::new("a", 37.5, 127.0, Category::Cafe);
        assert!(provider.get_matrix(&[a], TravelMode::Walking).is_empty());
    }

    #[test]
    fn test_travel_table_lookup() {
        let table = TravelTable::new(vec![DistanceEntry {
            origin_id: "a".to_string(),
            dest_id: "b".to_string(),
            duration_seconds: 61,
            distance_meters: 800,
        }]);

        assert_eq!(table.travel("a", "b"), Some((61, 800)));
        assert_eq!(table.travel("b", "a"), None);
        assert_eq!(table.travel("a", "a"), Some((0, 0)));
    }
}
