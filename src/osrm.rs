//! OSRM HTTP adapter for distance tables.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::model::{Point, TravelMode};
use crate::traits::{DistanceSource, PairStatus};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub driving_profile: String,
    pub walking_profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            driving_profile: "car".to_string(),
            walking_profile: "foot".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// OSRM has no transit profile; those requests are never sent.
    pub fn profile_for(&self, mode: TravelMode) -> Option<&str> {
        match mode {
            TravelMode::Driving | TravelMode::Taxi => Some(self.driving_profile.as_str()),
            TravelMode::Walking => Some(self.walking_profile.as_str()),
            TravelMode::PublicTransit => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn table_url(&self, profile: &str, points: &[Point]) -> String {
        let coords = points
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.longitude, point.latitude))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url.trim_end_matches('/'),
            profile,
            coords
        )
    }
}

impl DistanceSource for OsrmClient {
    fn fetch(&self, points: &[Point], mode: TravelMode) -> Result<Vec<Vec<PairStatus>>, SourceError> {
        let n = points.len();
        let Some(profile) = self.config.profile_for(mode) else {
            debug!(mode = mode.as_str(), "no OSRM profile for travel mode");
            return Ok(vec![vec![PairStatus::Unusable; n]; n]);
        };
        if n == 0 {
            return Ok(Vec::new());
        }

        let body = self
            .client
            .get(self.table_url(profile, points))
            .send()
            .and_then(|resp| resp.error_for_status())?
            .json::<OsrmTableResponse>()?;

        convert_table(body, n)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

fn convert_table(body: OsrmTableResponse, n: usize) -> Result<Vec<Vec<PairStatus>>, SourceError> {
    if body.code != "Ok" {
        return Err(SourceError::Service {
            code: body.code,
            message: body.message.unwrap_or_default(),
        });
    }

    let durations = body.durations.ok_or_else(|| SourceError::Malformed {
        message: "OSRM response missing durations".to_string(),
    })?;
    if durations.len() != n {
        return Err(SourceError::Malformed {
            message: format!("expected {} duration rows, got {}", n, durations.len()),
        });
    }
    let distances = body.distances.unwrap_or_default();

    let table = durations
        .iter()
        .enumerate()
        .map(|(i, row)| {
            (0..n)
                .map(|j| {
                    let duration = row.get(j).copied().flatten();
                    let distance = distances.get(i).and_then(|r| r.get(j)).copied().flatten();
                    match (duration, distance) {
                        (Some(d), Some(m)) if is_measure(d) && is_measure(m) => PairStatus::Ok {
                            duration_seconds: d.round() as u32,
                            distance_meters: m.round() as u32,
                        },
                        _ => PairStatus::Unusable,
                    }
                })
                .collect()
        })
        .collect();

    Ok(table)
}

fn is_measure(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
