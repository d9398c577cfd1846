//! inspection-router
//!
//! Orders and times each worker's pre-assigned inspection tasks: a small
//! TSP per worker, clock-time scheduling from the worker's earliest start,
//! and greedy insertion of flexible tasks around locked appointments.

pub mod error;
pub mod model;
pub mod policy;
pub mod traits;
pub mod haversine;
pub mod travel;
pub mod rest_cache;
pub mod tsp;
pub mod schedule;
pub mod gaps;
pub mod report;
pub mod optimizer;
