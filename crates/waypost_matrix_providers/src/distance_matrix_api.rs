use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    cost_matrix::{CostEntry, CostMatrix},
    travel_mode::TravelMode,
};

#[derive(Debug, Error)]
pub enum DistanceMatrixError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Batch-level failure status.
    #[error("distance matrix API error: {status}")]
    Api { status: String },

    /// One origin-destination pair failed while the batch reported success.
    /// Fatal: no partial matrix is ever returned.
    #[error("matrix element {origin}->{destination} failed with status {status}")]
    Element {
        origin: usize,
        destination: usize,
        status: String,
    },

    /// Status-OK response whose row or element counts don't match the
    /// requested point count.
    #[error("matrix response shape mismatch: expected {expected}x{expected}")]
    Shape { expected: usize },
}

#[derive(Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}

#[derive(Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<WireValue>,
    duration: Option<WireValue>,
}

#[derive(Deserialize)]
struct WireValue {
    value: u64,
}

pub struct DistanceMatrixClientParams {
    pub api_key: String,
    /// Optional region bias passed through to the service.
    pub region: Option<String>,
}

pub const DISTANCE_MATRIX_API_URL: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

pub struct DistanceMatrixClient {
    params: DistanceMatrixClientParams,
    client: reqwest::Client,
}

impl DistanceMatrixClient {
    pub fn new(params: DistanceMatrixClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    /// Requests the full origins×destinations matrix for `points` (both
    /// lists are the same set) under `mode`.
    pub async fn fetch_matrix(
        &self,
        points: &[geo_types::Point],
        mode: TravelMode,
    ) -> Result<CostMatrix, DistanceMatrixError> {
        let coords = join_coords(points);
        let mut query: Vec<(&str, String)> = vec![
            ("key", self.params.api_key.clone()),
            ("origins", coords.clone()),
            ("destinations", coords),
            ("mode", mode.as_api_param().to_string()),
        ];
        if let Some(region) = &self.params.region {
            query.push(("region", region.clone()));
        }

        let response = self
            .client
            .get(DISTANCE_MATRIX_API_URL)
            .query(&query)
            .send()
            .await?;

        let response: MatrixResponse = response.json().await?;
        debug!(
            rows = response.rows.len(),
            "DistanceMatrixApi: received matrix response"
        );

        matrix_from_response(response, points.len())
    }
}

fn join_coords(points: &[geo_types::Point]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.y(), point.x()))
        .collect::<Vec<_>>()
        .join("|")
}

fn matrix_from_response(
    response: MatrixResponse,
    expected: usize,
) -> Result<CostMatrix, DistanceMatrixError> {
    if response.status != "OK" {
        return Err(DistanceMatrixError::Api {
            status: response.status,
        });
    }

    if response.rows.len() != expected {
        return Err(DistanceMatrixError::Shape { expected });
    }

    let mut rows = Vec::with_capacity(response.rows.len());
    for (origin, row) in response.rows.into_iter().enumerate() {
        if row.elements.len() != expected {
            return Err(DistanceMatrixError::Shape { expected });
        }

        let mut entries = Vec::with_capacity(row.elements.len());
        for (destination, element) in row.elements.into_iter().enumerate() {
            if element.status != "OK" {
                return Err(DistanceMatrixError::Element {
                    origin,
                    destination,
                    status: element.status,
                });
            }

            entries.push(CostEntry {
                distance: element.distance.map_or(0, |v| v.value),
                duration: element.duration.map_or(0, |v| v.value),
            });
        }
        rows.push(entries);
    }

    Ok(CostMatrix::from_rows(rows))
}
