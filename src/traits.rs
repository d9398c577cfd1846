//! Capabilities the routing engine consumes.
//!
//! The engine never talks to a database or HTTP service directly: worker and
//! task lookups and the travel cache are injected through these traits so
//! applications plug in their own backends and tests plug in fakes.

use chrono::NaiveDate;

use crate::error::{CacheError, LookupError};
use crate::model::{Coordinate, TaskId, TaskRecord, WorkerRecord};

/// Looks up workers for a service date.
pub trait WorkerDirectory {
    /// Returns `Ok(None)` when no such worker exists.
    ///
    /// `available_from` and `latest_shift_end` should reflect the worker's
    /// availability and existing commitments on `date`.
    fn worker(&self, id: &str, date: NaiveDate) -> Result<Option<WorkerRecord>, LookupError>;
}

/// Looks up tasks by identity. Unknown ids are simply absent from the result.
pub trait TaskDirectory {
    fn tasks(&self, ids: &[TaskId]) -> Result<Vec<TaskRecord>, LookupError>;
}

/// Cached travel figures for one directed coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedTravel {
    pub minutes: f64,
    pub km: Option<f64>,
}

/// Read-only view of the travel cache, keyed by
/// [`cache_key`](crate::travel::cache_key). Populating it is someone else's job.
pub trait TravelCache {
    fn lookup(&self, key: &str) -> Result<Option<CachedTravel>, CacheError>;
}

/// Travel duration and road distance between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelMetric {
    pub duration_minutes: f64,
    pub distance_km: f64,
}

impl TravelMetric {
    pub const ZERO: TravelMetric = TravelMetric {
        duration_minutes: 0.0,
        distance_km: 0.0,
    };
}

/// Provides travel estimates between coordinates.
///
/// Implementations must return [`TravelMetric::ZERO`] when `from == to` and
/// must not fail: lookup problems degrade to an estimate.
pub trait TravelMetricProvider {
    fn metric(&self, from: Coordinate, to: Coordinate) -> TravelMetric;

    /// Distance used to compare and total visiting orders.
    ///
    /// Defaults to the road distance of [`metric`](Self::metric).
    fn tour_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        self.metric(from, to).distance_km
    }
}

impl<T: TravelMetricProvider + ?Sized> TravelMetricProvider for &T {
    fn metric(&self, from: Coordinate, to: Coordinate) -> TravelMetric {
        (**self).metric(from, to)
    }

    fn tour_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        (**self).tour_km(from, to)
    }
}
