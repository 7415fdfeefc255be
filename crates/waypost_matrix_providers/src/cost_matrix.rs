use std::sync::Arc;

/// Distance and duration of one origin-destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostEntry {
    /// Meters.
    pub distance: u64,
    /// Seconds.
    pub duration: u64,
}

/// Pairwise travel costs between all points of a set under one travel mode.
///
/// Flat row-major storage: the entry for a pair of indices sits at
/// `index = from * size + to`. The matrix is square with a zero diagonal and
/// is not assumed symmetric.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    distances: Arc<Vec<u64>>,
    durations: Arc<Vec<u64>>,
    size: usize,
}

impl CostMatrix {
    pub fn from_rows(rows: Vec<Vec<CostEntry>>) -> Self {
        let size = rows.len();
        let mut distances = Vec::with_capacity(size * size);
        let mut durations = Vec::with_capacity(size * size);

        for row in rows {
            for entry in row {
                distances.push(entry.distance);
                durations.push(entry.duration);
            }
        }

        CostMatrix {
            distances: Arc::new(distances),
            durations: Arc::new(durations),
            size,
        }
    }

    pub fn from_flat(distances: Vec<u64>, durations: Vec<u64>, size: usize) -> Self {
        CostMatrix {
            distances: Arc::new(distances),
            durations: Arc::new(durations),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.size + to
    }

    #[inline(always)]
    pub fn distance(&self, from: usize, to: usize) -> u64 {
        if from == to {
            return 0;
        }

        self.distances[self.index(from, to)]
    }

    #[inline(always)]
    pub fn duration(&self, from: usize, to: usize) -> u64 {
        if from == to {
            return 0;
        }

        self.durations[self.index(from, to)]
    }
}
