use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use waypost_matrix_providers::{
    cache::{MatrixCache, MatrixCacheConfig},
    cost_matrix::CostMatrix,
    cost_matrix_provider::{CostMatrixProvider, MatrixApi},
    directions_api::{DirectionsApi, DirectionsError, OptimizedRoute, RouteLeg},
    distance_matrix_api::DistanceMatrixError,
    travel_mode::TravelMode,
};
use waypost_optimizer::{
    error::RouteError, problem::point::Point, route_optimizer::RouteOptimizer,
};

/// Echoes the submitted waypoints back in identity order, one constant leg
/// per hop.
struct IdentityDirections {
    calls: Arc<AtomicUsize>,
}

impl DirectionsApi for IdentityDirections {
    async fn optimize_waypoints(
        &self,
        _origin: geo_types::Point,
        _destination: geo_types::Point,
        waypoints: &[geo_types::Point],
        _mode: TravelMode,
    ) -> Result<OptimizedRoute, DirectionsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        Ok(OptimizedRoute {
            waypoint_order: (0..waypoints.len()).collect(),
            legs: vec![
                RouteLeg {
                    distance: 1000,
                    duration: 100,
                };
                waypoints.len() + 1
            ],
        })
    }
}

/// Replays a fixed external response, whatever the request.
struct CannedDirections {
    route: OptimizedRoute,
}

impl DirectionsApi for CannedDirections {
    async fn optimize_waypoints(
        &self,
        _origin: geo_types::Point,
        _destination: geo_types::Point,
        _waypoints: &[geo_types::Point],
        _mode: TravelMode,
    ) -> Result<OptimizedRoute, DirectionsError> {
        Ok(self.route.clone())
    }
}

fn grid_meters(from: &Point, to: &Point) -> u64 {
    let dlat = (from.latitude - to.latitude).abs();
    let dlng = (from.longitude - to.longitude).abs();
    ((dlat + dlng) * 1000.0).round() as u64
}

/// Derives a deterministic matrix from the submitted coordinates.
struct GridMatrix {
    calls: Arc<AtomicUsize>,
}

impl MatrixApi for GridMatrix {
    async fn fetch_matrix(
        &self,
        points: &[geo_types::Point],
        _mode: TravelMode,
    ) -> Result<CostMatrix, DistanceMatrixError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let n = points.len();
        let mut distances = vec![0u64; n * n];
        let mut durations = vec![0u64; n * n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dlat = (points[i].y() - points[j].y()).abs();
                let dlng = (points[i].x() - points[j].x()).abs();
                let meters = ((dlat + dlng) * 1000.0).round() as u64;
                distances[i * n + j] = meters;
                durations[i * n + j] = meters / 10;
            }
        }

        Ok(CostMatrix::from_flat(distances, durations, n))
    }
}

/// Returns a matrix one stop smaller than the request, the way a truncated
/// upstream response would.
struct ShortMatrix;

impl MatrixApi for ShortMatrix {
    async fn fetch_matrix(
        &self,
        points: &[geo_types::Point],
        _mode: TravelMode,
    ) -> Result<CostMatrix, DistanceMatrixError> {
        let n = points.len() - 1;
        Ok(CostMatrix::from_flat(vec![100; n * n], vec![10; n * n], n))
    }
}

struct Counters {
    directions: Arc<AtomicUsize>,
    matrix: Arc<AtomicUsize>,
}

fn optimizer() -> (RouteOptimizer<IdentityDirections, GridMatrix>, Counters) {
    let directions = Arc::new(AtomicUsize::new(0));
    let matrix = Arc::new(AtomicUsize::new(0));

    let optimizer = RouteOptimizer::new(
        IdentityDirections {
            calls: Arc::clone(&directions),
        },
        CostMatrixProvider::new(
            GridMatrix {
                calls: Arc::clone(&matrix),
            },
            Arc::new(MatrixCache::new(MatrixCacheConfig::default())),
        ),
    );

    (optimizer, Counters { directions, matrix })
}

fn stops(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            Point::new(
                50.0 + 0.017 * i as f64,
                30.0 + 0.029 * (i * i) as f64,
                format!("stop {i}"),
            )
        })
        .collect()
}

#[tokio::test]
async fn fewer_than_two_points_fails_validation_with_no_external_calls() {
    let (optimizer, counters) = optimizer();

    let err = optimizer
        .optimize(&stops(1), TravelMode::Driving, false)
        .await
        .unwrap_err();

    assert!(matches!(err, RouteError::Validation(_)));
    assert_eq!(counters.directions.load(Ordering::SeqCst), 0);
    assert_eq!(counters.matrix.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_travel_modes_are_rejected_at_the_boundary() {
    let err = "FLYING".parse::<TravelMode>().unwrap_err();

    assert!(err.to_string().contains("FLYING"));
}

#[tokio::test]
async fn nine_points_go_to_the_directions_solver() {
    let (optimizer, counters) = optimizer();
    let points = stops(9);

    let result = optimizer
        .optimize(&points, TravelMode::Driving, false)
        .await
        .unwrap();

    assert_eq!(counters.directions.load(Ordering::SeqCst), 1);
    assert_eq!(counters.matrix.load(Ordering::SeqCst), 0);
    assert_eq!(result.ordered_points, points);
    assert_eq!(result.total_distance, 8 * 1000);
    assert_eq!(result.total_duration, 8 * 100);
}

#[tokio::test]
async fn ten_points_go_to_the_matrix_heuristic() {
    let (optimizer, counters) = optimizer();
    let points = stops(10);

    let result = optimizer
        .optimize(&points, TravelMode::Driving, false)
        .await
        .unwrap();

    assert_eq!(counters.directions.load(Ordering::SeqCst), 0);
    assert_eq!(counters.matrix.load(Ordering::SeqCst), 1);

    // Exactly a permutation of the input.
    assert_eq!(result.ordered_points.len(), points.len());
    let mut labels: Vec<&str> = result
        .ordered_points
        .iter()
        .map(|p| p.label.as_str())
        .collect();
    labels.sort_unstable();
    let mut expected: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
    expected.sort_unstable();
    assert_eq!(labels, expected);
}

#[tokio::test]
async fn round_trip_appends_the_start_and_totals_match_the_matrix() {
    let (optimizer, _) = optimizer();
    let points = stops(10);

    let result = optimizer
        .optimize(&points, TravelMode::Walking, true)
        .await
        .unwrap();

    assert_eq!(result.ordered_points.len(), points.len() + 1);
    assert_eq!(result.ordered_points[0], points[0]);
    assert_eq!(result.ordered_points[points.len()], points[0]);

    let recomputed: u64 = result
        .ordered_points
        .windows(2)
        .map(|pair| grid_meters(&pair[0], &pair[1]))
        .sum();
    assert_eq!(result.total_distance, recomputed);

    let identity: u64 = points
        .windows(2)
        .map(|pair| grid_meters(&pair[0], &pair[1]))
        .sum::<u64>()
        + grid_meters(&points[points.len() - 1], &points[0]);
    assert!(result.total_distance <= identity);
}

#[tokio::test]
async fn undersized_matrix_is_an_upstream_error() {
    let optimizer = RouteOptimizer::new(
        IdentityDirections {
            calls: Arc::new(AtomicUsize::new(0)),
        },
        CostMatrixProvider::new(
            ShortMatrix,
            Arc::new(MatrixCache::new(MatrixCacheConfig::default())),
        ),
    );

    let err = optimizer
        .optimize(&stops(10), TravelMode::Driving, false)
        .await
        .unwrap_err();

    assert!(matches!(err, RouteError::Upstream(_)));
}

#[tokio::test]
async fn permuted_point_sets_share_one_matrix_fetch() {
    let (optimizer, counters) = optimizer();
    let points = stops(10);
    let mut permuted = points.clone();
    permuted.rotate_left(3);

    optimizer
        .optimize(&points, TravelMode::Driving, false)
        .await
        .unwrap();
    optimizer
        .optimize(&permuted, TravelMode::Driving, false)
        .await
        .unwrap();

    assert_eq!(counters.matrix.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn small_set_totals_come_from_the_returned_legs() {
    // Three stops, one interior waypoint: the solver keeps it in place and
    // reports legs of 3000m and 5000m.
    let directions = CannedDirections {
        route: OptimizedRoute {
            waypoint_order: vec![0],
            legs: vec![
                RouteLeg {
                    distance: 3000,
                    duration: 420,
                },
                RouteLeg {
                    distance: 5000,
                    duration: 700,
                },
            ],
        },
    };
    let optimizer = RouteOptimizer::new(
        directions,
        CostMatrixProvider::new(
            GridMatrix {
                calls: Arc::new(AtomicUsize::new(0)),
            },
            Arc::new(MatrixCache::new(MatrixCacheConfig::default())),
        ),
    );

    let points = vec![
        Point::new(0.0, 0.0, "A"),
        Point::new(0.0, 3.0, "B"),
        Point::new(4.0, 0.0, "C"),
    ];

    let result = optimizer
        .optimize(&points, TravelMode::Driving, false)
        .await
        .unwrap();

    let labels: Vec<&str> = result
        .ordered_points
        .iter()
        .map(|p| p.label.as_str())
        .collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
    assert_eq!(result.total_distance, 8000);
    assert_eq!(result.total_duration, 1120);
}
