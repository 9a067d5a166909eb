//! Stay durations and `"HH:mm"` arithmetic.

use crate::error::OptimizeError;
use crate::model::{CandidateStop, Category};

/// Default stay in minutes when nothing better is known.
pub fn default_stay_minutes(category: Category) -> u32 {
    match category {
        Category::Restaurant => 60,
        Category::Cafe => 45,
        Category::Bar => 60,
        Category::Attraction => 90,
        Category::Shopping => 60,
        Category::SpaMassage => 90,
        Category::Entertainment => 120,
        Category::Accommodation => 0,
        Category::TransportHub => 15,
        Category::Other => 60,
    }
}

/// Minutes a stop is occupied: explicit override, then observed average,
/// then the category default. Zero overrides count as unset.
pub fn stay_duration(stop: &CandidateStop) -> u32 {
    stop.custom_duration
        .filter(|minutes| *minutes > 0)
        .or(stop.average_duration.filter(|minutes| *minutes > 0))
        .unwrap_or_else(|| default_stay_minutes(stop.point.category))
}

/// Latest accepted hour; `"24:00"` marks the end of the day.
const MAX_HOURS: u32 = 24;

/// Parse `"HH:mm"` into minutes since midnight, up to `"24:00"`.
pub fn parse_time(value: &str) -> Result<u32, OptimizeError> {
    let invalid = || OptimizeError::InvalidTime {
        value: value.to_string(),
    };

    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 || hours > MAX_HOURS || (hours == MAX_HOURS && minutes > 0) {
        return Err(invalid());
    }

    hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .ok_or_else(invalid)
}

/// Format minutes since midnight as `"HH:mm"`. Hours are not wrapped at 24.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Minutes between two `"HH:mm"` strings; zero when `end` is not after `start`.
pub fn daily_minutes(start: &str, end: &str) -> Result<u32, OptimizeError> {
    Ok(parse_time(end)?.saturating_sub(parse_time(start)?))
}
