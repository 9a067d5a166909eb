//! Test fixtures for itinerary-planner.
//!
//! Provides:
//! - Real Seoul locations
//! - Stub distance sources and caches that never touch the network
//! - Builders for candidate stops
#![allow(dead_code)]

pub mod seoul_locations;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;

use itinerary_planner::error::{CacheError, SourceError};
use itinerary_planner::model::{CacheKey, CandidateStop, Category, DistanceCacheRecord, Point, Priority, TravelMode};
use itinerary_planner::traits::{DistanceCache, DistanceSource, PairStatus};

pub use seoul_locations::*;

type PairFn = Box<dyn Fn(&Point, &Point) -> PairStatus + Send + Sync>;

enum StubResponse {
    Pairs(PairFn),
    Error,
}

/// Distance source answering from a function of the two points.
pub struct StubSource {
    response: StubResponse,
    calls: AtomicUsize,
    last_mode: std::sync::Mutex<Option<TravelMode>>,
}

impl StubSource {
    pub fn with_pairs(f: impl Fn(&Point, &Point) -> PairStatus + Send + Sync + 'static) -> Self {
        Self {
            response: StubResponse::Pairs(Box::new(f)),
            calls: AtomicUsize::new(0),
            last_mode: std::sync::Mutex::new(None),
        }
    }

    /// Every pair costs `seconds`, with ten meters per second.
    pub fn uniform(seconds: u32) -> Self {
        Self::with_pairs(move |_, _| PairStatus::Ok {
            duration_seconds: seconds,
            distance_meters: seconds * 10,
        })
    }

    /// Whole-call transport failure.
    pub fn failing() -> Self {
        Self {
            response: StubResponse::Error,
            calls: AtomicUsize::new(0),
            last_mode: std::sync::Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_mode(&self) -> Option<TravelMode> {
        *self.last_mode.lock().unwrap()
    }
}

impl DistanceSource for StubSource {
    fn fetch(&self, points: &[Point], mode: TravelMode) -> Result<Vec<Vec<PairStatus>>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_mode.lock().unwrap() = Some(mode);
        match &self.response {
            StubResponse::Pairs(f) => Ok(points
                .iter()
                .map(|origin| points.iter().map(|dest| f(origin, dest)).collect())
                .collect()),
            StubResponse::Error => Err(SourceError::Service {
                code: "UNKNOWN_ERROR".to_string(),
                message: "stubbed outage".to_string(),
            }),
        }
    }
}

/// Cache whose every operation fails.
pub struct BrokenCache {
    pub writes: AtomicUsize,
}

impl BrokenCache {
    pub fn new() -> Self {
        Self {
            writes: AtomicUsize::new(0),
        }
    }
}

impl DistanceCache for BrokenCache {
    fn get(&self, _key: &CacheKey, _now: SystemTime) -> Result<Option<DistanceCacheRecord>, CacheError> {
        Err(CacheError::Backend {
            message: "connection reset".to_string(),
        })
    }

    fn upsert(&self, _record: &DistanceCacheRecord) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Backend {
            message: "connection reset".to_string(),
        })
    }
}

pub fn point(id: &str, lat: f64, lng: f64, category: Category) -> Point {
    Point::new(id, lat, lng, category)
}

pub fn stop(id: &str, priority: Priority) -> CandidateStop {
    CandidateStop::new(id, point(id, 37.57, 126.98, Category::Attraction), priority)
}

/// Candidate stops at real Seoul locations, all WANT attractions.
pub fn seoul_stops(count: usize) -> Vec<CandidateStop> {
    all_locations()
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, loc)| {
            CandidateStop::new(
                format!("stop-{}", i),
                Point::new(format!("place-{}", i), loc.lat, loc.lng, Category::Attraction),
                Priority::Want,
            )
        })
        .collect()
}
