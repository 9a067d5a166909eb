//! itinerary-planner core
//!
//! Plans visiting orders for a day's stops and produces alternative
//! itineraries (efficient, relaxed, priority-weighted) with timed stops and
//! a comparable score.

pub mod traits;
pub mod model;
pub mod error;
pub mod haversine;
pub mod osrm;
pub mod google;
pub mod cache;
pub mod distance;
pub mod stay;
pub mod solver;
pub mod schedule;
pub mod optimizer;
