use std::future::Future;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::travel_mode::TravelMode;

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("directions API error: {status}")]
    Api { status: String },

    #[error("directions response contained no route")]
    NoRoute,
}

/// One leg of the returned route, between two consecutive stops of the
/// optimized order.
#[derive(Debug, Clone, Copy)]
pub struct RouteLeg {
    /// Meters.
    pub distance: u64,
    /// Seconds.
    pub duration: u64,
}

/// Waypoint-optimized route as returned by the external solver: the chosen
/// permutation of the submitted interior waypoints (indices into the
/// submitted list) plus per-leg totals in visiting order.
#[derive(Debug, Clone)]
pub struct OptimizedRoute {
    pub waypoint_order: Vec<usize>,
    pub legs: Vec<RouteLeg>,
}

/// External waypoint-reordering seam. The production implementation is
/// [`DirectionsClient`]; tests inject fakes.
pub trait DirectionsApi {
    fn optimize_waypoints(
        &self,
        origin: geo_types::Point,
        destination: geo_types::Point,
        waypoints: &[geo_types::Point],
        mode: TravelMode,
    ) -> impl Future<Output = Result<OptimizedRoute, DirectionsError>>;
}

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Deserialize)]
struct WireRoute {
    #[serde(default)]
    waypoint_order: Vec<usize>,
    legs: Vec<WireLeg>,
}

#[derive(Deserialize)]
struct WireLeg {
    distance: WireValue,
    duration: WireValue,
}

#[derive(Deserialize)]
struct WireValue {
    value: u64,
}

pub struct DirectionsClientParams {
    pub api_key: String,
    /// Optional region bias passed through to the service.
    pub region: Option<String>,
}

pub const DIRECTIONS_API_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

pub struct DirectionsClient {
    params: DirectionsClientParams,
    client: reqwest::Client,
}

impl DirectionsClient {
    pub fn new(params: DirectionsClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }
}

impl DirectionsApi for DirectionsClient {
    async fn optimize_waypoints(
        &self,
        origin: geo_types::Point,
        destination: geo_types::Point,
        waypoints: &[geo_types::Point],
        mode: TravelMode,
    ) -> Result<OptimizedRoute, DirectionsError> {
        let mut query: Vec<(&str, String)> = vec![
            ("key", self.params.api_key.clone()),
            ("origin", format_coord(origin)),
            ("destination", format_coord(destination)),
            ("mode", mode.as_api_param().to_string()),
        ];

        if !waypoints.is_empty() {
            let joined = waypoints
                .iter()
                .map(|point| format_coord(*point))
                .collect::<Vec<_>>()
                .join("|");
            query.push(("waypoints", format!("optimize:true|{joined}")));
        }

        if let Some(region) = &self.params.region {
            query.push(("region", region.clone()));
        }

        let response = self
            .client
            .get(DIRECTIONS_API_URL)
            .query(&query)
            .send()
            .await?;

        let response: DirectionsResponse = response.json().await?;
        debug!(
            routes = response.routes.len(),
            "DirectionsApi: received directions response"
        );

        route_from_response(response)
    }
}

fn format_coord(point: geo_types::Point) -> String {
    format!("{},{}", point.y(), point.x())
}

fn route_from_response(response: DirectionsResponse) -> Result<OptimizedRoute, DirectionsError> {
    if response.status != "OK" {
        return Err(DirectionsError::Api {
            status: response.status,
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::NoRoute)?;

    Ok(OptimizedRoute {
        waypoint_order: route.waypoint_order,
        legs: route
            .legs
            .into_iter()
            .map(|leg| RouteLeg {
                distance: leg.distance.value,
                duration: leg.duration.value,
            })
            .collect(),
    })
}
