//! Single-window scheduling: turns a visiting order into clock times.

use crate::model::{ClockTime, Route, Stop, Task, Worker};
use crate::policy::SchedulingPolicy;
use crate::traits::{TravelMetric, TravelMetricProvider};
use crate::tsp;

/// Whole travel minutes for a leg, as charged to the running clock.
/// Halves round to even.
pub(crate) fn travel_minutes(metric: TravelMetric) -> u32 {
    metric.duration_minutes.max(0.0).round_ties_even() as u32
}

/// Lays out `ordered` back to back from `start`.
///
/// The first stop is charged no travel: the worker begins there at `start`.
/// Every later stop adds the travel time from its predecessor, then rounds
/// the start up to the policy's step. Waiting time is never subtracted.
pub fn schedule_sequence<M>(
    ordered: &[&Task],
    start: ClockTime,
    metric: &M,
    policy: &SchedulingPolicy,
) -> Vec<Stop>
where
    M: TravelMetricProvider + ?Sized,
{
    let mut clock = start;
    let mut previous: Option<&Task> = None;
    let mut stops = Vec::with_capacity(ordered.len());

    for &task in ordered {
        let leg = match previous {
            Some(prev) => metric.metric(prev.location, task.location),
            None => TravelMetric::ZERO,
        };
        let travel = travel_minutes(leg);

        let start_time = clock.add_minutes(travel).round_up(policy.rounding_step_minutes);
        let end_time = start_time.add_minutes(task.duration_minutes);

        stops.push(Stop {
            travel_from_previous_minutes: travel,
            distance_from_previous_km: leg.distance_km,
            ..Stop::new(task, start_time, end_time)
        });

        clock = end_time;
        previous = Some(task);
    }

    stops
}

/// Routes a worker whose tasks are all flexible: best tour order, then a
/// contiguous schedule from the worker's earliest available time.
pub fn plan_flexible<M>(worker: &Worker, tasks: &[&Task], metric: &M, policy: &SchedulingPolicy) -> Route
where
    M: TravelMetricProvider + ?Sized,
{
    let candidates: Vec<(usize, _)> = tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| (idx, task.location))
        .collect();
    let tour = tsp::solve(worker.home, &candidates, metric, policy.brute_force_limit);

    let ordered: Vec<&Task> = tour.order.iter().map(|&idx| tasks[idx]).collect();
    let stops = schedule_sequence(&ordered, worker.earliest_available(policy), metric, policy);

    Route::new(worker, stops, tour.total_distance_km, Vec::new())
}
