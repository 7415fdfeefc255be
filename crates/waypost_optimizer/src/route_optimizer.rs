use std::sync::Arc;

use anyhow::Context;
use tracing::debug;
use waypost_matrix_providers::{
    cache::{Clock, MatrixCache, MatrixCacheConfig, SystemClock},
    cost_matrix_provider::{CostMatrixProvider, MatrixApi},
    directions_api::{DirectionsApi, DirectionsClient, DirectionsClientParams},
    distance_matrix_api::{DistanceMatrixClient, DistanceMatrixClientParams},
    travel_mode::TravelMode,
};

use crate::{
    error::RouteError,
    problem::{point::Point, route::RouteResult},
    strategy::{
        DirectionsStrategy, MatrixHeuristicStrategy, OrderingStrategy, StrategyKind,
        StrategyOutcome, select_strategy,
    },
};

pub const API_KEY_ENV_VAR: &str = "WAYPOST_GOOGLE_API_KEY";
pub const REGION_ENV_VAR: &str = "WAYPOST_REGION";

/// Entry point for callers: validates the request, picks an ordering
/// strategy by point count, and maps the winning order back onto the
/// caller's points.
pub struct RouteOptimizer<D: DirectionsApi, M: MatrixApi, C: Clock = SystemClock> {
    directions: D,
    matrix_provider: CostMatrixProvider<M, C>,
}

impl RouteOptimizer<DirectionsClient, DistanceMatrixClient> {
    /// Production wiring: both external clients authenticated through
    /// `WAYPOST_GOOGLE_API_KEY`, fresh cache with default TTL and capacity.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var(API_KEY_ENV_VAR)
            .with_context(|| format!("{API_KEY_ENV_VAR} is not set"))?;
        let region = std::env::var(REGION_ENV_VAR).ok();

        Ok(Self::new(
            DirectionsClient::new(DirectionsClientParams {
                api_key: api_key.clone(),
                region: region.clone(),
            }),
            CostMatrixProvider::new(
                DistanceMatrixClient::new(DistanceMatrixClientParams { api_key, region }),
                Arc::new(MatrixCache::new(MatrixCacheConfig::default())),
            ),
        ))
    }
}

impl<D: DirectionsApi, M: MatrixApi, C: Clock> RouteOptimizer<D, M, C> {
    pub fn new(directions: D, matrix_provider: CostMatrixProvider<M, C>) -> Self {
        Self {
            directions,
            matrix_provider,
        }
    }

    /// Orders `points` into a single travel sequence under `mode`, optionally
    /// closing the loop back to the first point. Validation happens before
    /// any network or cache side effect.
    pub async fn optimize(
        &self,
        points: &[Point],
        mode: TravelMode,
        round_trip: bool,
    ) -> Result<RouteResult, RouteError> {
        if points.len() < 2 {
            return Err(RouteError::Validation(format!(
                "at least 2 points are required, got {}",
                points.len()
            )));
        }

        let kind = select_strategy(points.len());
        debug!(
            stops = points.len(),
            ?mode,
            round_trip,
            ?kind,
            "dispatching ordering strategy"
        );

        let outcome = match kind {
            StrategyKind::Directions => {
                DirectionsStrategy::new(&self.directions)
                    .order(points, mode, round_trip)
                    .await?
            }
            StrategyKind::MatrixHeuristic => {
                MatrixHeuristicStrategy::new(&self.matrix_provider)
                    .order(points, mode, round_trip)
                    .await?
            }
        };

        assemble(points, round_trip, outcome)
    }
}

fn assemble(
    points: &[Point],
    round_trip: bool,
    outcome: StrategyOutcome,
) -> Result<RouteResult, RouteError> {
    let StrategyOutcome {
        order,
        total_distance,
        total_duration,
    } = outcome;

    if !order.is_well_formed(points.len(), round_trip) {
        return Err(RouteError::NoSolution(format!(
            "strategy produced an ill-formed order {:?} for {} points",
            order.indices(),
            points.len()
        )));
    }

    let ordered_points = order
        .into_inner()
        .into_iter()
        .map(|index| points[index].clone())
        .collect();

    Ok(RouteResult {
        ordered_points,
        total_distance,
        total_duration,
    })
}
