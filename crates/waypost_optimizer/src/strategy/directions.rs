use tracing::debug;
use waypost_matrix_providers::{directions_api::DirectionsApi, travel_mode::TravelMode};

use super::{InteriorIndexMap, OrderingStrategy, StrategyOutcome};
use crate::{
    error::RouteError,
    problem::{point::Point, route::RouteOrder},
};

/// Small-set ordering: the external directions service explores interior
/// waypoint permutations while the origin (and, for one-way trips, the
/// destination) stays pinned. For a round trip the destination is forced
/// equal to the origin so every remaining point becomes a reorderable
/// interior waypoint.
pub struct DirectionsStrategy<'a, D: DirectionsApi> {
    client: &'a D,
}

impl<'a, D: DirectionsApi> DirectionsStrategy<'a, D> {
    pub fn new(client: &'a D) -> Self {
        Self { client }
    }
}

impl<D: DirectionsApi> OrderingStrategy for DirectionsStrategy<'_, D> {
    async fn order(
        &self,
        points: &[Point],
        mode: TravelMode,
        round_trip: bool,
    ) -> Result<StrategyOutcome, RouteError> {
        let coords: Vec<geo_types::Point> = points.iter().map(Into::into).collect();
        let origin = coords[0];
        let destination = if round_trip {
            origin
        } else {
            coords[coords.len() - 1]
        };

        let map = InteriorIndexMap::for_trip(points.len(), round_trip);
        let interior = &coords[1..1 + map.len()];

        let route = self
            .client
            .optimize_waypoints(origin, destination, interior, mode)
            .await?;

        if route.waypoint_order.len() != map.len() {
            return Err(RouteError::Upstream(format!(
                "directions service returned {} waypoints, expected {}",
                route.waypoint_order.len(),
                map.len()
            )));
        }

        // One leg per hop, interior count + 1.
        let expected_legs = map.len() + 1;
        if route.legs.len() != expected_legs {
            return Err(RouteError::Upstream(format!(
                "directions service returned {} legs, expected {expected_legs}",
                route.legs.len()
            )));
        }

        let mut indices = Vec::with_capacity(points.len() + usize::from(round_trip));
        indices.push(0);
        for &interior_index in &route.waypoint_order {
            let absolute = map.to_absolute(interior_index).ok_or_else(|| {
                RouteError::Upstream(format!(
                    "directions service returned out-of-range waypoint index {interior_index}"
                ))
            })?;
            indices.push(absolute);
        }
        if round_trip {
            indices.push(0);
        } else {
            indices.push(points.len() - 1);
        }

        // Legs already reflect the optimized order; totals are their sum.
        let total_distance = route.legs.iter().map(|leg| leg.distance).sum();
        let total_duration = route.legs.iter().map(|leg| leg.duration).sum();

        debug!(
            stops = points.len(),
            round_trip, total_distance, "directions solver ordered stops"
        );

        Ok(StrategyOutcome {
            order: RouteOrder::new(indices),
            total_distance,
            total_duration,
        })
    }
}
