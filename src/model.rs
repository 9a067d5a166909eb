//! Domain types shared by the distance, ordering and scheduling stages.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::stay::format_minutes;

/// A physical location. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
}

impl Point {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64, category: Category) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            category,
        }
    }

    /// Coordinates as (lat, lng).
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Place category, used to pick a default stay duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Restaurant,
    Cafe,
    Bar,
    Attraction,
    Shopping,
    SpaMassage,
    Entertainment,
    Accommodation,
    TransportHub,
    #[serde(other)]
    Other,
}

/// How much the traveller cares about visiting a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Must,
    Want,
    Optional,
}

impl Priority {
    /// Contribution of a committed stop to the route score.
    pub fn score_points(self) -> f64 {
        match self {
            Priority::Must => 3.0,
            Priority::Want => 1.5,
            Priority::Optional => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Walking,
    PublicTransit,
    Driving,
    Taxi,
}

impl TravelMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walking => "WALKING",
            TravelMode::PublicTransit => "PUBLIC_TRANSIT",
            TravelMode::Driving => "DRIVING",
            TravelMode::Taxi => "TAXI",
        }
    }
}

/// A point under consideration for one day's plan.
///
/// Priority and duration overrides are set by the caller and never touched by
/// the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStop {
    pub id: String,
    pub point: Point,
    pub priority: Priority,
    /// Explicit stay override in minutes.
    pub custom_duration: Option<u32>,
    /// Observed average stay in minutes, from enrichment data.
    pub average_duration: Option<u32>,
    /// Preferred visiting time as `"HH:mm"`; carried through, not scheduled against.
    pub preferred_time: Option<String>,
}

impl CandidateStop {
    pub fn new(id: impl Into<String>, point: Point, priority: Priority) -> Self {
        Self {
            id: id.into(),
            point,
            priority,
            custom_duration: None,
            average_duration: None,
            preferred_time: None,
        }
    }

    pub fn with_custom_duration(mut self, minutes: u32) -> Self {
        self.custom_duration = Some(minutes);
        self
    }

    pub fn with_average_duration(mut self, minutes: u32) -> Self {
        self.average_duration = Some(minutes);
        self
    }

    pub fn with_preferred_time(mut self, time: impl Into<String>) -> Self {
        self.preferred_time = Some(time.into());
        self
    }
}

/// Directed travel measurement between two distinct points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub origin_id: String,
    pub dest_id: String,
    pub duration_seconds: u32,
    pub distance_meters: u32,
}

/// Cache identity of a directed pair under one travel mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub origin_id: String,
    pub dest_id: String,
    pub travel_mode: TravelMode,
}

impl CacheKey {
    pub fn new(origin_id: impl Into<String>, dest_id: impl Into<String>, travel_mode: TravelMode) -> Self {
        Self {
            origin_id: origin_id.into(),
            dest_id: dest_id.into(),
            travel_mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceCacheRecord {
    pub entry: DistanceEntry,
    pub travel_mode: TravelMode,
    pub expires_at: SystemTime,
}

impl DistanceCacheRecord {
    pub fn key(&self) -> CacheKey {
        CacheKey::new(
            self.entry.origin_id.clone(),
            self.entry.dest_id.clone(),
            self.travel_mode,
        )
    }

    /// A record is servable only strictly before its expiry.
    pub fn is_fresh(&self, now: SystemTime) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteType {
    Efficient,
    Relaxed,
    Custom,
}

/// One timed stop of an itinerary. Minutes are counted from midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopPlan {
    pub candidate_id: String,
    pub point_id: String,
    pub stop_order: usize,
    pub stay_duration_minutes: u32,
    pub travel_time_from_prev_seconds: u32,
    pub travel_dist_from_prev_meters: u32,
    pub arrival_minutes: u32,
    pub departure_minutes: u32,
}

impl StopPlan {
    pub fn arrival_time(&self) -> String {
        format_minutes(self.arrival_minutes)
    }

    pub fn departure_time(&self) -> String {
        format_minutes(self.departure_minutes)
    }
}

/// A complete itinerary variant. Built fresh by every optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub route_type: RouteType,
    pub stops: Vec<StopPlan>,
    pub total_duration_minutes: u32,
    pub total_distance_meters: u64,
    pub total_travel_time_minutes: u32,
    pub place_count: usize,
    pub score: f64,
}
