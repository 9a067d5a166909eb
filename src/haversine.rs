//! Great-circle fallback for travel estimates.
//!
//! Uses straight-line distance and an assumed average speed. Less accurate
//! than a routing service (ignores roads) but always available.

use crate::model::{DistanceEntry, Point};

/// Average speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine-based travel estimator.
#[derive(Debug, Clone, Copy)]
pub struct HaversineEstimator {
    /// Assumed average speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two (lat, lng) points in meters.
    pub fn distance_meters(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }

    /// Convert a distance in meters to travel time in seconds.
    pub fn meters_to_seconds(&self, meters: f64) -> u32 {
        let seconds_per_km = 3600.0 / self.speed_kmh;
        (meters / 1000.0 * seconds_per_km).round() as u32
    }

    /// Estimated directed entry between two points.
    pub fn estimate(&self, origin: &Point, dest: &Point) -> DistanceEntry {
        let meters = Self::distance_meters(origin.location(), dest.location());
        DistanceEntry {
            origin_id: origin.id.clone(),
            dest_id: dest.id.clone(),
            duration_seconds: self.meters_to_seconds(meters),
            distance_meters: meters.round() as u32,
        }
    }
}
