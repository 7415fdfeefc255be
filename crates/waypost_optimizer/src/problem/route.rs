use serde::{Deserialize, Serialize};

use crate::problem::point::Point;

/// Visiting order as indices into the input point slice: a permutation of
/// `0..n` starting at 0, with 0 appended again for round trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOrder(Vec<usize>);

impl RouteOrder {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }

    /// True when the order visits each of `0..num_points` exactly once,
    /// starts at 0, and (for round trips) closes back on 0.
    pub fn is_well_formed(&self, num_points: usize, round_trip: bool) -> bool {
        let expected_len = if round_trip {
            num_points + 1
        } else {
            num_points
        };
        if self.0.len() != expected_len {
            return false;
        }
        if self.0.first() != Some(&0) {
            return false;
        }
        if round_trip && self.0.last() != Some(&0) {
            return false;
        }

        let mut seen = vec![false; num_points];
        for &index in &self.0[..num_points] {
            if index >= num_points || seen[index] {
                return false;
            }
            seen[index] = true;
        }

        true
    }
}

/// Final ordering with aggregated totals, as handed to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResult {
    pub ordered_points: Vec<Point>,
    /// Meters.
    pub total_distance: u64,
    /// Seconds.
    pub total_duration: u64,
}
