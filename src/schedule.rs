//! Turns a visiting order into timed stops against a daily window.

use tracing::debug;

use crate::distance::TravelTable;
use crate::model::{CandidateStop, RoutePlan, RouteType, StopPlan};
use crate::stay::stay_duration;

/// Stops always kept even when they overrun the window.
const MIN_COMMITTED_STOPS: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct ScheduleParams {
    /// Day start, minutes since midnight.
    pub day_start_minutes: u32,
    /// Length of the usable window in minutes.
    pub window_minutes: u32,
    /// Multiplier on every stay duration.
    pub buffer_factor: f64,
}

/// Walk `order` over `stops`, committing stops until the window is exceeded.
///
/// A stop whose departure would overrun the window ends the itinerary, unless
/// fewer than two stops have been committed so far. Travel totals only count
/// legs into committed stops.
pub fn build_schedule(
    route_type: RouteType,
    order: &[usize],
    stops: &[&CandidateStop],
    travel: &TravelTable,
    params: ScheduleParams,
) -> RoutePlan {
    let window_end = params.day_start_minutes + params.window_minutes;
    let mut clock = params.day_start_minutes;
    let mut total_travel_seconds: u64 = 0;
    let mut total_distance_meters: u64 = 0;
    let mut planned: Vec<StopPlan> = Vec::with_capacity(order.len());
    let mut priority_score = 0.0;
    let mut previous: Option<&CandidateStop> = None;

    for &index in order {
        let stop = stops[index];
        let stay = (f64::from(stay_duration(stop)) * params.buffer_factor).round() as u32;

        let (travel_seconds, travel_meters) = match previous {
            Some(prev) => travel
                .travel(&prev.point.id, &stop.point.id)
                .unwrap_or((0, 0)),
            None => (0, 0),
        };

        let arrival = clock + travel_seconds.div_ceil(60);
        let departure = arrival + stay;
        if departure > window_end && planned.len() >= MIN_COMMITTED_STOPS {
            debug!(
                route_type = ?route_type,
                dropped = order.len() - planned.len(),
                "daily window exceeded, trimming remaining stops"
            );
            break;
        }

        total_travel_seconds += u64::from(travel_seconds);
        total_distance_meters += u64::from(travel_meters);
        priority_score += stop.priority.score_points();
        planned.push(StopPlan {
            candidate_id: stop.id.clone(),
            point_id: stop.point.id.clone(),
            stop_order: planned.len(),
            stay_duration_minutes: stay,
            travel_time_from_prev_seconds: travel_seconds,
            travel_dist_from_prev_meters: travel_meters,
            arrival_minutes: arrival,
            departure_minutes: departure,
        });

        clock = departure;
        previous = Some(stop);
    }

    let total_duration = planned
        .last()
        .map_or(0, |last| last.departure_minutes - params.day_start_minutes);
    let total_travel_minutes = total_travel_seconds.div_ceil(60) as u32;
    let place_count = planned.len();

    let travel_efficiency = if total_duration > 0 {
        1.0 - f64::from(total_travel_minutes) / f64::from(total_duration)
    } else {
        0.0
    };
    let coverage = if stops.is_empty() {
        0.0
    } else {
        place_count as f64 / stops.len() as f64
    };
    let score = ((travel_efficiency * 30.0 + coverage * 30.0 + priority_score * 5.0) * 10.0).round() / 10.0;

    RoutePlan {
        route_type,
        stops: planned,
        total_duration_minutes: total_duration,
        total_distance_meters,
        total_travel_time_minutes: total_travel_minutes,
        place_count,
        score,
    }
}
