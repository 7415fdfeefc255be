use std::{future::Future, sync::Arc};

use tracing::debug;

use crate::{
    cache::{CacheKey, Clock, MatrixCache, SystemClock},
    cost_matrix::CostMatrix,
    distance_matrix_api::{DistanceMatrixClient, DistanceMatrixError},
    travel_mode::TravelMode,
};

/// External cost-matrix seam. The production implementation is
/// [`DistanceMatrixClient`]; tests inject counting fakes.
pub trait MatrixApi {
    fn fetch_matrix(
        &self,
        points: &[geo_types::Point],
        mode: TravelMode,
    ) -> impl Future<Output = Result<CostMatrix, DistanceMatrixError>>;
}

impl MatrixApi for DistanceMatrixClient {
    fn fetch_matrix(
        &self,
        points: &[geo_types::Point],
        mode: TravelMode,
    ) -> impl Future<Output = Result<CostMatrix, DistanceMatrixError>> {
        DistanceMatrixClient::fetch_matrix(self, points, mode)
    }
}

/// Builds and caches pairwise cost matrices. At most one external call is
/// made per distinct (mode, point set) within the cache TTL; a failed fetch
/// inserts nothing.
pub struct CostMatrixProvider<M: MatrixApi, C: Clock = SystemClock> {
    api: M,
    cache: Arc<MatrixCache<C>>,
}

impl<M: MatrixApi, C: Clock> CostMatrixProvider<M, C> {
    pub fn new(api: M, cache: Arc<MatrixCache<C>>) -> Self {
        Self { api, cache }
    }

    pub async fn get_matrix(
        &self,
        points: &[geo_types::Point],
        mode: TravelMode,
    ) -> Result<CostMatrix, DistanceMatrixError> {
        let key = CacheKey::for_points(mode, points);

        if let Some(matrix) = self.cache.get(&key) {
            debug!(?mode, points = points.len(), "cost matrix cache hit");
            return Ok(matrix);
        }

        debug!(?mode, points = points.len(), "cost matrix cache miss, fetching");
        let matrix = self.api.fetch_matrix(points, mode).await?;
        self.cache.insert(key, matrix.clone());

        Ok(matrix)
    }
}
