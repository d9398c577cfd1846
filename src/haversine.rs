//! Haversine travel estimate (fallback when the travel cache has no entry).
//!
//! Uses great-circle distance and a distance-dependent speed to estimate
//! travel time. Less accurate than cached road figures but always available.

use crate::model::Coordinate;
use crate::policy::EstimatePolicy;
use crate::traits::{TravelMetric, TravelMetricProvider};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine-based travel estimator.
///
/// Travel time is the great-circle distance at a tiered speed (slower for
/// short urban hops), floored at the minimum travel time. Distance is the
/// great-circle distance scaled by the road factor.
#[derive(Debug, Clone, Default)]
pub struct HaversineEstimator {
    pub policy: EstimatePolicy,
}

impl HaversineEstimator {
    pub fn new(policy: EstimatePolicy) -> Self {
        Self { policy }
    }

    /// Estimated road distance in kilometers.
    pub fn road_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        haversine_km(from, to) * self.policy.road_factor
    }

    /// Convert a great-circle distance into travel minutes.
    fn km_to_minutes(&self, km: f64) -> f64 {
        let minutes = km / self.policy.speed_for(km) * 60.0;
        minutes.max(self.policy.min_travel_minutes)
    }
}

impl TravelMetricProvider for HaversineEstimator {
    fn metric(&self, from: Coordinate, to: Coordinate) -> TravelMetric {
        if from == to {
            return TravelMetric::ZERO;
        }

        let km = haversine_km(from, to);
        TravelMetric {
            duration_minutes: self.km_to_minutes(km),
            distance_km: km * self.policy.road_factor,
        }
    }

    /// Tours are compared on straight-line distance.
    fn tour_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        haversine_km(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COPENHAGEN: Coordinate = Coordinate::new(55.6761, 12.5683);
    const AARHUS: Coordinate = Coordinate::new(56.1629, 10.2039);

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_km(COPENHAGEN, COPENHAGEN);
        assert!(dist < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Copenhagen to Aarhus is ~157 km as the crow flies
        let dist = haversine_km(COPENHAGEN, AARHUS);
        assert!(dist > 150.0 && dist < 165.0, "CPH to AAR should be ~157km, got {}", dist);
    }

    #[test]
    fn test_zero_metric_for_identical_points() {
        let estimator = HaversineEstimator::default();
        assert_eq!(estimator.metric(COPENHAGEN, COPENHAGEN), TravelMetric::ZERO);
        assert_eq!(estimator.metric(AARHUS, AARHUS), TravelMetric::ZERO);
    }

    #[test]
    fn test_minimum_travel_floor() {
        let estimator = HaversineEstimator::default();
        // ~1 meter apart
        let nearby = Coordinate::new(COPENHAGEN.lat + 0.00001, COPENHAGEN.lng);
        let metric = estimator.metric(COPENHAGEN, nearby);
        assert_eq!(metric.duration_minutes, 5.0);
        assert!(metric.distance_km > 0.0);
    }

    #[test]
    fn test_speed_tier_minutes() {
        let estimator = HaversineEstimator::default();
        // 10 km at 35 km/h
        assert!((estimator.km_to_minutes(10.0) - 10.0 / 35.0 * 60.0).abs() < 1e-9);
        // 4 km at 25 km/h
        assert!((estimator.km_to_minutes(4.0) - 9.6).abs() < 1e-9);
        // 130 km at 65 km/h
        assert!((estimator.km_to_minutes(130.0) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_road_factor_applied() {
        let estimator = HaversineEstimator::default();
        let metric = estimator.metric(COPENHAGEN, AARHUS);
        let expected = haversine_km(COPENHAGEN, AARHUS) * 1.3;
        assert!((metric.distance_km - expected).abs() < 1e-9);
    }

    #[test]
    fn test_tour_km_is_straight_line() {
        let estimator = HaversineEstimator::default();
        assert_eq!(estimator.tour_km(COPENHAGEN, AARHUS), haversine_km(COPENHAGEN, AARHUS));
        assert_eq!(estimator.tour_km(AARHUS, AARHUS), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let estimator = HaversineEstimator::default();
        let there = estimator.metric(COPENHAGEN, AARHUS);
        let back = estimator.metric(AARHUS, COPENHAGEN);
        assert!((there.distance_km - back.distance_km).abs() < 1e-9);
        assert!((there.duration_minutes - back.duration_minutes).abs() < 1e-9);
    }
}
