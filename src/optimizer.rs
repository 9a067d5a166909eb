//! Builds the three itinerary variants for one day.

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::distance::{DistanceProvider, TravelTable};
use crate::error::OptimizeError;
use crate::model::{CandidateStop, Point, Priority, RoutePlan, RouteType, TravelMode};
use crate::schedule::{ScheduleParams, build_schedule};
use crate::solver::solve;
use crate::stay::{daily_minutes, parse_time};
use crate::traits::{DistanceCache, DistanceSource};

/// Multipliers applied to a leg's cost by the priority of its destination.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub must: f64,
    pub want: f64,
    pub optional: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            must: 0.33,
            want: 0.67,
            optional: 1.5,
        }
    }
}

impl PriorityWeights {
    pub fn weight(&self, priority: Priority) -> f64 {
        match priority {
            Priority::Must => self.must,
            Priority::Want => self.want,
            Priority::Optional => self.optional,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OptimizerOptions {
    pub efficient_buffer: f64,
    /// Stay multiplier for the leisurely variant.
    pub relaxed_buffer: f64,
    pub custom_buffer: f64,
    pub weights: PriorityWeights,
    /// Ordering cost of a leg with no known travel entry.
    pub unreachable_cost: f64,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            efficient_buffer: 1.0,
            relaxed_buffer: 1.3,
            custom_buffer: 1.0,
            weights: PriorityWeights::default(),
            unreachable_cost: 99_999.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Variant {
    route_type: RouteType,
    buffer_factor: f64,
    priority_weighted: bool,
}

/// Plans EFFICIENT, RELAXED and CUSTOM itineraries from one distance matrix.
#[derive(Debug)]
pub struct RouteOptimizer<S, C> {
    distances: DistanceProvider<S, C>,
    options: OptimizerOptions,
}

impl<S, C> RouteOptimizer<S, C>
where
    S: DistanceSource,
    C: DistanceCache,
{
    pub fn new(distances: DistanceProvider<S, C>) -> Self {
        Self::with_options(distances, OptimizerOptions::default())
    }

    pub fn with_options(distances: DistanceProvider<S, C>, options: OptimizerOptions) -> Self {
        Self { distances, options }
    }

    pub fn distances(&self) -> &DistanceProvider<S, C> {
        &self.distances
    }

    /// Plan the day's variants, in the order EFFICIENT, RELAXED, CUSTOM.
    ///
    /// `daily_start` and `daily_end` are `"HH:mm"`. Fails before any
    /// distance lookup when fewer than two stops are given or a time is
    /// malformed. Distance source and cache failures are absorbed.
    pub fn optimize(
        &self,
        stops: &[CandidateStop],
        mode: TravelMode,
        daily_start: &str,
        daily_end: &str,
    ) -> Result<Vec<RoutePlan>, OptimizeError> {
        if stops.len() < 2 {
            warn!(found = stops.len(), "not enough stops to optimize");
            return Err(OptimizeError::InsufficientStops { found: stops.len() });
        }
        let day_start_minutes = parse_time(daily_start)?;
        let window_minutes = daily_minutes(daily_start, daily_end)?;

        let points: Vec<Point> = stops.iter().map(|stop| stop.point.clone()).collect();
        let travel = TravelTable::new(self.distances.get_matrix(&points, mode));

        let variants = [
            Variant {
                route_type: RouteType::Efficient,
                buffer_factor: self.options.efficient_buffer,
                priority_weighted: false,
            },
            Variant {
                route_type: RouteType::Relaxed,
                buffer_factor: self.options.relaxed_buffer,
                priority_weighted: false,
            },
            Variant {
                route_type: RouteType::Custom,
                buffer_factor: self.options.custom_buffer,
                priority_weighted: true,
            },
        ];

        let options = &self.options;
        let plans: Vec<RoutePlan> = variants
            .par_iter()
            .map(|variant| {
                let selected = match variant.route_type {
                    RouteType::Relaxed => relaxed_selection(stops),
                    RouteType::Efficient | RouteType::Custom => stops.iter().collect(),
                };
                let params = ScheduleParams {
                    day_start_minutes,
                    window_minutes,
                    buffer_factor: variant.buffer_factor,
                };
                plan_variant(options, *variant, &selected, &travel, params)
            })
            .collect();

        info!(
            stop_count = stops.len(),
            mode = mode.as_str(),
            scores = ?plans.iter().map(|p| p.score).collect::<Vec<_>>(),
            "route variants planned"
        );

        Ok(plans)
    }
}

fn plan_variant(
    options: &OptimizerOptions,
    variant: Variant,
    stops: &[&CandidateStop],
    travel: &TravelTable,
    params: ScheduleParams,
) -> RoutePlan {
    let weights = variant.priority_weighted.then_some(&options.weights);
    let matrix = cost_matrix(stops, travel, weights, options.unreachable_cost);
    let tour = solve(&matrix, 0);
    let plan = build_schedule(variant.route_type, &tour.order, stops, travel, params);

    debug!(
        route_type = ?variant.route_type,
        candidates = stops.len(),
        place_count = plan.place_count,
        tour_cost = tour.total_cost,
        score = plan.score,
        "variant planned"
    );

    plan
}

/// MUST stops; else MUST and WANT; else everything. Each tier needs two stops.
pub fn relaxed_selection(stops: &[CandidateStop]) -> Vec<&CandidateStop> {
    let must: Vec<&CandidateStop> = stops.iter().filter(|s| s.priority == Priority::Must).collect();
    if must.len() >= 2 {
        return must;
    }

    let must_or_want: Vec<&CandidateStop> = stops
        .iter()
        .filter(|s| matches!(s.priority, Priority::Must | Priority::Want))
        .collect();
    if must_or_want.len() >= 2 {
        return must_or_want;
    }

    stops.iter().collect()
}

/// Travel seconds between every ordered pair, optionally scaled by the
/// destination's priority weight.
pub fn cost_matrix(
    stops: &[&CandidateStop],
    travel: &TravelTable,
    weights: Option<&PriorityWeights>,
    unreachable_cost: f64,
) -> Vec<Vec<f64>> {
    stops
        .iter()
        .enumerate()
        .map(|(i, origin)| {
            stops
                .iter()
                .enumerate()
                .map(|(j, dest)| {
                    if i == j {
                        return 0.0;
                    }
                    let cost = travel
                        .travel(&origin.point.id, &dest.point.id)
                        .map_or(unreachable_cost, |(seconds, _)| f64::from(seconds));
                    match weights {
                        Some(weights) => cost * weights.weight(dest.priority),
                        None => cost,
                    }
                })
                .collect()
        })
        .collect()
}
