use std::{
    collections::{HashMap, VecDeque},
    hash::Hasher,
    time::{Duration, Instant},
};

use fxhash::FxHasher64;
use parking_lot::Mutex;
use tracing::debug;

use crate::{cost_matrix::CostMatrix, travel_mode::TravelMode};

/// Time source for cache expiry, injected so expiry is testable with a
/// manual clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Canonical signature of a (travel mode, point set) pair. Coordinates are
/// sorted by bit pattern before hashing, so permutations of the same point
/// set collide on the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(u64);

impl CacheKey {
    pub fn for_points(mode: TravelMode, points: &[geo_types::Point]) -> Self {
        let mut coords: Vec<(u64, u64)> = points
            .iter()
            .map(|point| (point.y().to_bits(), point.x().to_bits()))
            .collect();
        coords.sort_unstable();

        let mut hasher = FxHasher64::default();
        hasher.write_u8(mode.cache_tag());
        hasher.write_usize(coords.len());
        for (lat, lng) in coords {
            hasher.write_u64(lat);
            hasher.write_u64(lng);
        }

        CacheKey(hasher.finish())
    }
}

pub struct MatrixCacheConfig {
    pub capacity: usize,
    pub ttl: Duration,
}

impl Default for MatrixCacheConfig {
    fn default() -> Self {
        MatrixCacheConfig {
            capacity: 100,
            ttl: Duration::from_secs(3600),
        }
    }
}

struct CacheSlot {
    matrix: CostMatrix,
    inserted_at: Instant,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<CacheKey, CacheSlot>,
    insertion_order: VecDeque<CacheKey>,
}

/// Process-wide, TTL- and capacity-bounded store of cost matrices, shared by
/// concurrently executing requests. Expired entries are dropped before the
/// oldest resident ones when space is needed.
pub struct MatrixCache<C: Clock = SystemClock> {
    config: MatrixCacheConfig,
    clock: C,
    inner: Mutex<CacheInner>,
}

impl MatrixCache<SystemClock> {
    pub fn new(config: MatrixCacheConfig) -> Self {
        MatrixCache::with_clock(config, SystemClock)
    }
}

impl<C: Clock> MatrixCache<C> {
    pub fn with_clock(config: MatrixCacheConfig, clock: C) -> Self {
        MatrixCache {
            config,
            clock,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Returns the stored matrix for `key` if it is still within its TTL.
    /// An expired entry is removed on the spot.
    pub fn get(&self, key: &CacheKey) -> Option<CostMatrix> {
        let mut inner = self.inner.lock();
        let now = self.clock.now();

        let expired = match inner.entries.get(key) {
            Some(slot) => now.duration_since(slot.inserted_at) >= self.config.ttl,
            None => return None,
        };

        if expired {
            debug!(?key, "evicting expired cost matrix");
            inner.entries.remove(key);
            inner.insertion_order.retain(|k| k != key);
            return None;
        }

        inner.entries.get(key).map(|slot| slot.matrix.clone())
    }

    pub fn insert(&self, key: CacheKey, matrix: CostMatrix) {
        if self.config.capacity == 0 {
            return;
        }

        let mut inner = self.inner.lock();
        let now = self.clock.now();
        let ttl = self.config.ttl;

        let CacheInner {
            entries,
            insertion_order,
        } = &mut *inner;

        // Expired entries go first, then the oldest resident ones.
        insertion_order.retain(|k| {
            let keep = k != &key
                && entries
                    .get(k)
                    .is_some_and(|slot| now.duration_since(slot.inserted_at) < ttl);
            if !keep {
                entries.remove(k);
            }
            keep
        });

        while entries.len() >= self.config.capacity {
            let Some(oldest) = insertion_order.pop_front() else {
                break;
            };
            entries.remove(&oldest);
        }

        entries.insert(key, CacheSlot { matrix, inserted_at: now });
        insertion_order.push_back(key);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}
