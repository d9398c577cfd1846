//! Cache-backed travel metrics with estimate fallback.

use tracing::{debug, trace};

use crate::error::CacheError;
use crate::haversine::HaversineEstimator;
use crate::model::Coordinate;
use crate::traits::{CachedTravel, TravelCache, TravelMetric, TravelMetricProvider};

/// Canonical cache key for a directed coordinate pair.
///
/// Five decimals, longitude first: `lng,lat->lng,lat`.
pub fn cache_key(from: Coordinate, to: Coordinate) -> String {
    format!(
        "{:.5},{:.5}->{:.5},{:.5}",
        from.lng, from.lat, to.lng, to.lat
    )
}

/// Travel cache that never has an entry; every lookup falls back to the estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTravelCache;

impl TravelCache for NoTravelCache {
    fn lookup(&self, _key: &str) -> Result<Option<CachedTravel>, CacheError> {
        Ok(None)
    }
}

/// Travel metric provider reading the travel cache first.
///
/// Cache misses and cache failures both fall back to the haversine estimate;
/// failures are logged and never reach the caller.
#[derive(Debug, Clone, Default)]
pub struct CachedTravelMetrics<C> {
    cache: C,
    estimator: HaversineEstimator,
}

impl<C: TravelCache> CachedTravelMetrics<C> {
    pub fn new(cache: C) -> Self {
        Self::with_estimator(cache, HaversineEstimator::default())
    }

    pub fn with_estimator(cache: C, estimator: HaversineEstimator) -> Self {
        Self { cache, estimator }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<C: TravelCache> TravelMetricProvider for CachedTravelMetrics<C> {
    fn metric(&self, from: Coordinate, to: Coordinate) -> TravelMetric {
        if from == to {
            return TravelMetric::ZERO;
        }

        let key = cache_key(from, to);
        match self.cache.lookup(&key) {
            Ok(Some(hit)) if hit.minutes.is_finite() && hit.minutes >= 0.0 => TravelMetric {
                duration_minutes: hit.minutes,
                distance_km: hit
                    .km
                    .filter(|km| km.is_finite() && *km >= 0.0)
                    .unwrap_or_else(|| self.estimator.road_km(from, to)),
            },
            Ok(Some(hit)) => {
                debug!(%key, minutes = hit.minutes, "ignoring unusable travel cache entry");
                self.estimator.metric(from, to)
            }
            Ok(None) => {
                trace!(%key, "travel cache miss");
                self.estimator.metric(from, to)
            }
            Err(err) => {
                debug!(%key, error = %err, "travel cache lookup failed, using estimate");
                self.estimator.metric(from, to)
            }
        }
    }

    /// Straight-line distance; tour comparison never hits the cache.
    fn tour_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        self.estimator.tour_km(from, to)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;
    use crate::haversine::haversine_km;

    const HOME: Coordinate = Coordinate::new(55.6761, 12.5683);
    const SITE: Coordinate = Coordinate::new(55.7058, 12.5547);

    #[derive(Default)]
    struct MapCache {
        entries: HashMap<String, CachedTravel>,
        lookups: Cell<usize>,
    }

    impl MapCache {
        fn with(mut self, key: String, minutes: f64, km: Option<f64>) -> Self {
            self.entries.insert(key, CachedTravel { minutes, km });
            self
        }
    }

    impl TravelCache for MapCache {
        fn lookup(&self, key: &str) -> Result<Option<CachedTravel>, CacheError> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(self.entries.get(key).copied())
        }
    }

    struct FailingCache;

    impl TravelCache for FailingCache {
        fn lookup(&self, _key: &str) -> Result<Option<CachedTravel>, CacheError> {
            Err(CacheError::Backend("connection reset".to_string()))
        }
    }

    #[test]
    fn test_cache_key_format() {
        let key = cache_key(Coordinate::new(55.676098, 12.568337), Coordinate::new(55.7, 12.5));
        assert_eq!(key, "12.56834,55.67610->12.50000,55.70000");
    }

    #[test]
    fn test_same_point_skips_cache() {
        let provider = CachedTravelMetrics::new(MapCache::default());
        assert_eq!(provider.metric(HOME, HOME), TravelMetric::ZERO);
        assert_eq!(provider.cache().lookups.get(), 0);
    }

    #[test]
    fn test_cache_hit_with_distance() {
        let cache = MapCache::default().with(cache_key(HOME, SITE), 12.0, Some(4.2));
        let provider = CachedTravelMetrics::new(cache);
        let metric = provider.metric(HOME, SITE);
        assert_eq!(metric.duration_minutes, 12.0);
        assert_eq!(metric.distance_km, 4.2);
    }

    #[test]
    fn test_cache_hit_without_distance_uses_road_factor() {
        let cache = MapCache::default().with(cache_key(HOME, SITE), 9.5, None);
        let provider = CachedTravelMetrics::new(cache);
        let metric = provider.metric(HOME, SITE);
        assert_eq!(metric.duration_minutes, 9.5);
        assert!((metric.distance_km - haversine_km(HOME, SITE) * 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_cache_is_directional() {
        let cache = MapCache::default().with(cache_key(HOME, SITE), 30.0, Some(9.0));
        let provider = CachedTravelMetrics::new(cache);
        let reverse = provider.metric(SITE, HOME);
        assert_eq!(reverse, HaversineEstimator::default().metric(SITE, HOME));
    }

    #[test]
    fn test_failure_falls_back_to_estimate() {
        let provider = CachedTravelMetrics::new(FailingCache);
        assert_eq!(
            provider.metric(HOME, SITE),
            HaversineEstimator::default().metric(HOME, SITE)
        );
    }

    #[test]
    fn test_tour_km_skips_cache() {
        let cache = MapCache::default().with(cache_key(HOME, SITE), 12.0, Some(4.2));
        let provider = CachedTravelMetrics::new(cache);
        assert_eq!(provider.tour_km(HOME, SITE), haversine_km(HOME, SITE));
        assert_eq!(provider.cache().lookups.get(), 0);
    }

    #[test]
    fn test_unusable_entry_treated_as_miss() {
        let cache = MapCache::default().with(cache_key(HOME, SITE), f64::NAN, Some(3.0));
        let provider = CachedTravelMetrics::new(cache);
        assert_eq!(
            provider.metric(HOME, SITE),
            HaversineEstimator::default().metric(HOME, SITE)
        );
    }
}
