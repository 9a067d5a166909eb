//! Google Distance Matrix adapter.

use std::time::Duration;

use serde::Deserialize;

use crate::error::SourceError;
use crate::model::{Point, TravelMode};
use crate::traits::{DistanceSource, PairStatus};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/distancematrix/json".to_string(),
            api_key: String::new(),
            language: "ko".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleDistanceClient {
    config: GoogleConfig,
    client: reqwest::blocking::Client,
}

impl GoogleDistanceClient {
    pub fn new(config: GoogleConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn query(&self, points: &[Point], mode: TravelMode) -> Vec<(&'static str, String)> {
        let coords = points
            .iter()
            .map(|point| format!("{},{}", point.latitude, point.longitude))
            .collect::<Vec<_>>()
            .join("|");

        vec![
            ("origins", coords.clone()),
            ("destinations", coords),
            ("mode", google_mode(mode).to_string()),
            ("language", self.config.language.clone()),
            ("key", self.config.api_key.clone()),
        ]
    }
}

fn google_mode(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walking => "walking",
        TravelMode::PublicTransit => "transit",
        TravelMode::Driving | TravelMode::Taxi => "driving",
    }
}

impl DistanceSource for GoogleDistanceClient {
    fn fetch(&self, points: &[Point], mode: TravelMode) -> Result<Vec<Vec<PairStatus>>, SourceError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let body = self
            .client
            .get(&self.config.base_url)
            .query(&self.query(points, mode))
            .send()
            .and_then(|resp| resp.error_for_status())?
            .json::<MatrixResponse>()?;

        convert_matrix(body, points.len())
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    duration: Option<ValueField>,
    distance: Option<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: u32,
}

fn convert_matrix(body: MatrixResponse, n: usize) -> Result<Vec<Vec<PairStatus>>, SourceError> {
    if body.status != "OK" {
        return Err(SourceError::Service {
            code: body.status,
            message: body.error_message.unwrap_or_default(),
        });
    }

    let table = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    let element = body.rows.get(i).and_then(|row| row.elements.get(j));
                    match element {
                        Some(MatrixElement {
                            status,
                            duration: Some(duration),
                            distance: Some(distance),
                        }) if status == "OK" => PairStatus::Ok {
                            duration_seconds: duration.value,
                            distance_meters: distance.value,
                        },
                        _ => PairStatus::Unusable,
                    }
                })
                .collect()
        })
        .collect();

    Ok(table)
}
