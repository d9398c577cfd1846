//! Batch result and fleet-wide totals.

use std::fmt::Display;
use std::time::Duration;

use serde::Serialize;

use crate::model::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every worker was routed without error.
    Success,
    /// At least one worker was skipped with an error.
    Partial,
}

/// Totals across all routes of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub total_scheduled: usize,
    pub total_workers: usize,
    pub total_km: f64,
    pub total_travel_minutes: u32,
    pub execution_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizeResult {
    pub status: RunStatus,
    pub routes: Vec<Route>,
    pub metrics: Metrics,
    /// Per-worker errors; `None` when there were none.
    pub errors: Option<Vec<String>>,
    /// Informational messages, e.g. flexible tasks that fit no gap.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl OptimizeResult {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

/// Collects routes and errors while a batch runs.
#[derive(Debug, Default)]
pub struct RunReport {
    routes: Vec<Route>,
    errors: Vec<String>,
    notes: Vec<String>,
    metrics: Metrics,
}

impl RunReport {
    pub fn add_route(&mut self, route: Route) {
        self.metrics.total_scheduled += route.stops.len();
        self.metrics.total_km += route.total_distance_km;
        self.metrics.total_travel_minutes += route.total_travel_minutes;

        self.notes.extend(route.unplaced.iter().map(|task_id| {
            format!(
                "Task {} for worker {} did not fit any free interval",
                task_id, route.worker_id
            )
        }));

        self.routes.push(route);
    }

    pub fn add_error(&mut self, error: impl Display) {
        self.errors.push(error.to_string());
    }

    pub fn finish(self, elapsed: Duration) -> OptimizeResult {
        let status = if self.errors.is_empty() {
            RunStatus::Success
        } else {
            RunStatus::Partial
        };

        OptimizeResult {
            status,
            metrics: Metrics {
                total_workers: self.routes.len(),
                execution_seconds: elapsed.as_secs_f64(),
                ..self.metrics
            },
            routes: self.routes,
            errors: (!self.errors.is_empty()).then_some(self.errors),
            notes: self.notes,
        }
    }
}
