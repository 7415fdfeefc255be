use tracing::debug;
use waypost_matrix_providers::{
    cache::Clock,
    cost_matrix::CostMatrix,
    cost_matrix_provider::{CostMatrixProvider, MatrixApi},
    travel_mode::TravelMode,
};

use super::{OrderingStrategy, StrategyOutcome};
use crate::{
    error::RouteError,
    problem::{point::Point, route::RouteOrder},
};

/// Large-set ordering: single-vehicle search over the cached cost matrix,
/// free of the external solver's waypoint cap. Matrix distance is the
/// objective; duration is tallied alongside but never optimized.
pub struct MatrixHeuristicStrategy<'a, M: MatrixApi, C: Clock> {
    provider: &'a CostMatrixProvider<M, C>,
}

impl<'a, M: MatrixApi, C: Clock> MatrixHeuristicStrategy<'a, M, C> {
    pub fn new(provider: &'a CostMatrixProvider<M, C>) -> Self {
        Self { provider }
    }
}

impl<M: MatrixApi, C: Clock> OrderingStrategy for MatrixHeuristicStrategy<'_, M, C> {
    async fn order(
        &self,
        points: &[Point],
        mode: TravelMode,
        round_trip: bool,
    ) -> Result<StrategyOutcome, RouteError> {
        let coords: Vec<geo_types::Point> = points.iter().map(Into::into).collect();
        let matrix = self.provider.get_matrix(&coords, mode).await?;

        if matrix.size() != points.len() {
            return Err(RouteError::Upstream(format!(
                "cost matrix is {0}x{0}, expected {1}x{1}",
                matrix.size(),
                points.len()
            )));
        }

        search_tour(&matrix, round_trip)
    }
}

/// Deterministic heuristic over a complete directed cost graph: cheapest-arc
/// construction from index 0, then single-stop relocate improvement. Falls
/// back to the identity order when the search lands above it, so the
/// reported total never exceeds the input-order traversal.
pub(crate) fn search_tour(
    matrix: &CostMatrix,
    round_trip: bool,
) -> Result<StrategyOutcome, RouteError> {
    let n = matrix.size();
    if n == 0 {
        return Err(RouteError::NoSolution("empty cost matrix".to_string()));
    }

    let mut tour = cheapest_arc_tour(matrix)?;
    relocate_improvement(matrix, &mut tour, round_trip);

    let identity: Vec<usize> = (0..n).collect();
    if tour_distance(matrix, &identity, round_trip) < tour_distance(matrix, &tour, round_trip) {
        tour = identity;
    }

    let total_distance = tour_distance(matrix, &tour, round_trip);
    let total_duration = tour_duration(matrix, &tour, round_trip);
    debug!(
        stops = n,
        round_trip, total_distance, "matrix heuristic ordered stops"
    );

    let mut indices = tour;
    if round_trip {
        indices.push(0);
    }

    Ok(StrategyOutcome {
        order: RouteOrder::new(indices),
        total_distance,
        total_duration,
    })
}

/// Start at 0 and repeatedly take the cheapest arc to an unvisited stop.
fn cheapest_arc_tour(matrix: &CostMatrix) -> Result<Vec<usize>, RouteError> {
    let n = matrix.size();
    let mut tour = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    tour.push(0);
    visited[0] = true;

    while tour.len() < n {
        let current = tour[tour.len() - 1];
        let next = (0..n)
            .filter(|&candidate| !visited[candidate])
            .min_by_key(|&candidate| matrix.distance(current, candidate));

        match next {
            Some(next) => {
                visited[next] = true;
                tour.push(next);
            }
            None => {
                return Err(RouteError::NoSolution(
                    "cheapest-arc construction ran out of candidates".to_string(),
                ));
            }
        }
    }

    Ok(tour)
}

/// First-improvement relocate passes: pop one stop and reinsert it wherever
/// the tour gets cheaper, keeping index 0 in place. No segment reversal, so
/// asymmetric matrices are evaluated exactly.
fn relocate_improvement(matrix: &CostMatrix, tour: &mut Vec<usize>, round_trip: bool) {
    let n = tour.len();
    if n < 3 {
        return;
    }

    let mut improved = true;
    while improved {
        improved = false;
        for from in 1..n {
            for to in 1..n {
                if to == from {
                    continue;
                }

                let mut candidate = tour.clone();
                let stop = candidate.remove(from);
                candidate.insert(to, stop);

                if tour_distance(matrix, &candidate, round_trip)
                    < tour_distance(matrix, tour, round_trip)
                {
                    *tour = candidate;
                    improved = true;
                }
            }
        }
    }
}

fn tour_distance(matrix: &CostMatrix, tour: &[usize], round_trip: bool) -> u64 {
    let mut total: u64 = tour
        .windows(2)
        .map(|pair| matrix.distance(pair[0], pair[1]))
        .sum();
    if round_trip && let Some(&last) = tour.last() {
        total += matrix.distance(last, 0);
    }
    total
}

fn tour_duration(matrix: &CostMatrix, tour: &[usize], round_trip: bool) -> u64 {
    let mut total: u64 = tour
        .windows(2)
        .map(|pair| matrix.duration(pair[0], pair[1]))
        .sum();
    if round_trip && let Some(&last) = tour.last() {
        total += matrix.duration(last, 0);
    }
    total
}
