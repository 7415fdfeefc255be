/// Bidirectional mapping between the external solver's 0-based interior
/// waypoint indices and absolute indices into the input point slice. The
/// origin is always pinned at absolute index 0, so interior waypoint `i`
/// sits at absolute index `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteriorIndexMap {
    interior_len: usize,
}

impl InteriorIndexMap {
    /// Interior span of a trip over `num_points` stops: everything after the
    /// origin for a round trip, everything strictly between origin and
    /// destination for a one-way trip.
    pub fn for_trip(num_points: usize, round_trip: bool) -> Self {
        let interior_len = if round_trip {
            num_points.saturating_sub(1)
        } else {
            num_points.saturating_sub(2)
        };

        Self { interior_len }
    }

    pub fn len(&self) -> usize {
        self.interior_len
    }

    pub fn is_empty(&self) -> bool {
        self.interior_len == 0
    }

    /// Absolute input index of interior waypoint `interior`.
    pub fn to_absolute(&self, interior: usize) -> Option<usize> {
        (interior < self.interior_len).then_some(interior + 1)
    }

    /// Interior position of absolute input index `absolute`, if that index
    /// is an interior waypoint at all.
    pub fn to_interior(&self, absolute: usize) -> Option<usize> {
        absolute
            .checked_sub(1)
            .filter(|&interior| interior < self.interior_len)
    }
}
