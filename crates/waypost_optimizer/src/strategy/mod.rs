mod directions;
mod index_map;
mod matrix_heuristic;

use std::future::Future;

pub use directions::DirectionsStrategy;
pub use index_map::InteriorIndexMap;
pub use matrix_heuristic::MatrixHeuristicStrategy;

use waypost_matrix_providers::travel_mode::TravelMode;

use crate::{
    error::RouteError,
    problem::{point::Point, route::RouteOrder},
};

/// Point count below which ordering is delegated to the external waypoint
/// solver. At and above it the local matrix heuristic takes over.
pub const DIRECTIONS_WAYPOINT_LIMIT: usize = 10;

/// Which ordering capability handles a request of the given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// External waypoint-reordering solver (small sets).
    Directions,
    /// Local heuristic search over the cost matrix (large sets).
    MatrixHeuristic,
}

pub fn select_strategy(num_points: usize) -> StrategyKind {
    if num_points < DIRECTIONS_WAYPOINT_LIMIT {
        StrategyKind::Directions
    } else {
        StrategyKind::MatrixHeuristic
    }
}

/// An ordering produced by a strategy, before it is mapped back onto the
/// caller's points.
#[derive(Debug)]
pub struct StrategyOutcome {
    pub order: RouteOrder,
    pub total_distance: u64,
    pub total_duration: u64,
}

/// Ordering capability: both variants answer the same question, in which
/// sequence to visit the points of one request.
pub trait OrderingStrategy {
    fn order(
        &self,
        points: &[Point],
        mode: TravelMode,
        round_trip: bool,
    ) -> impl Future<Output = Result<StrategyOutcome, RouteError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_points_use_the_directions_solver() {
        assert_eq!(select_strategy(9), StrategyKind::Directions);
    }

    #[test]
    fn ten_points_use_the_matrix_heuristic() {
        assert_eq!(select_strategy(10), StrategyKind::MatrixHeuristic);
        assert_eq!(select_strategy(250), StrategyKind::MatrixHeuristic);
    }

    #[test]
    fn two_points_use_the_directions_solver() {
        assert_eq!(select_strategy(2), StrategyKind::Directions);
    }
}
