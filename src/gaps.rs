//! Scheduling around locked stops.
//!
//! Locked stops keep their fixed times. The rest of the worker's day is cut
//! into free intervals (gaps) and flexible tasks are inserted greedily, gap
//! by gap in chronological order, always taking the feasible task with the
//! smallest detour towards the next fixed point.

use crate::model::{ClockTime, Coordinate, LockedSlot, Route, Stop, Task, Worker};
use crate::policy::SchedulingPolicy;
use crate::schedule::travel_minutes;
use crate::traits::{TravelMetric, TravelMetricProvider};

/// Where a gap sits relative to the locked stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKind {
    BeforeFirstLocked,
    BetweenLocked,
    AfterLastLocked,
    /// No locked stops at all.
    WholeDay,
}

/// Free interval `[start, end)` with the fixed points around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub kind: GapKind,
    pub start: ClockTime,
    pub end: ClockTime,
    /// Where the worker is when the gap opens (home or a locked stop).
    pub previous: Coordinate,
    /// Where the worker must go when the gap closes.
    pub next: Coordinate,
}

impl Gap {
    pub fn minutes(&self) -> u32 {
        self.start.minutes_until(self.end)
    }
}

/// Locked tasks ordered by fixed start. Equal starts keep input order.
pub fn locked_in_time_order<'a>(tasks: &[&'a Task]) -> Vec<(&'a Task, LockedSlot)> {
    let mut locked: Vec<(&'a Task, LockedSlot)> = tasks
        .iter()
        .filter_map(|&task| task.locked_slot().map(|slot| (task, slot)))
        .collect();
    locked.sort_by_key(|(_, slot)| slot.start);
    locked
}

/// Cuts the worker's day into gaps around `locked` (already in time order).
///
/// Gaps between two locked stops must be longer than the policy's minimum;
/// the gaps at either end of the day only need to be non-empty.
pub fn find_gaps(
    home: Coordinate,
    earliest: ClockTime,
    locked: &[(&Task, LockedSlot)],
    policy: &SchedulingPolicy,
) -> Vec<Gap> {
    let day_end = policy.day_end;

    let Some(&(first, first_slot)) = locked.first() else {
        return non_empty(Gap {
            kind: GapKind::WholeDay,
            start: earliest,
            end: day_end,
            previous: home,
            next: home,
        })
        .into_iter()
        .collect();
    };

    let mut gaps = Vec::new();
    gaps.extend(non_empty(Gap {
        kind: GapKind::BeforeFirstLocked,
        start: earliest,
        end: first_slot.start,
        previous: home,
        next: first.location,
    }));

    // Latest end seen so far; a locked stop nested inside an earlier one
    // must not open a gap that overlaps it.
    let mut boundary = (first_slot.end, first.location);
    for &(task, slot) in &locked[1..] {
        let (boundary_end, boundary_location) = boundary;
        if boundary_end.minutes_until(slot.start) > policy.min_gap_minutes {
            gaps.push(Gap {
                kind: GapKind::BetweenLocked,
                start: boundary_end,
                end: slot.start,
                previous: boundary_location,
                next: task.location,
            });
        }
        if slot.end >= boundary_end {
            boundary = (slot.end, task.location);
        }
    }

    let (last_end, last_location) = boundary;
    gaps.extend(non_empty(Gap {
        kind: GapKind::AfterLastLocked,
        start: last_end,
        end: day_end,
        previous: last_location,
        next: home,
    }));

    gaps
}

fn non_empty(gap: Gap) -> Option<Gap> {
    (gap.start < gap.end).then_some(gap)
}

/// Outcome of inserting flexible tasks into gaps.
#[derive(Debug, Clone)]
pub struct GapFill<'a> {
    /// Placed stops in placement order.
    pub placed: Vec<Stop>,
    /// Tasks that fit no gap, in input order.
    pub unplaced: Vec<&'a Task>,
}

struct Insertion {
    index: usize,
    leg: TravelMetric,
    start: ClockTime,
    end: ClockTime,
    score: f64,
}

/// Greedily fills `gaps` (chronological) with `flexible` tasks.
///
/// Within a gap every remaining task is checked each round; a task is
/// feasible when its rounded start plus duration ends by the gap's end. The
/// feasible task with the lowest `travel(here -> task) + travel(task -> next)`
/// wins, ties going to the earlier task. The gap is done when nothing fits.
pub fn fill_gaps<'a, M>(
    gaps: &[Gap],
    flexible: &[&'a Task],
    metric: &M,
    policy: &SchedulingPolicy,
) -> GapFill<'a>
where
    M: TravelMetricProvider + ?Sized,
{
    let mut taken = vec![false; flexible.len()];
    let mut placed = Vec::new();

    for gap in gaps {
        let mut clock = gap.start;
        let mut position = gap.previous;

        while let Some(insertion) = best_insertion(gap, clock, position, flexible, &taken, metric, policy) {
            let task = flexible[insertion.index];
            taken[insertion.index] = true;
            placed.push(Stop {
                travel_from_previous_minutes: travel_minutes(insertion.leg),
                distance_from_previous_km: insertion.leg.distance_km,
                ..Stop::new(task, insertion.start, insertion.end)
            });
            clock = insertion.end;
            position = task.location;
        }
    }

    let unplaced = flexible
        .iter()
        .zip(&taken)
        .filter(|(_, taken)| !**taken)
        .map(|(&task, _)| task)
        .collect();

    GapFill { placed, unplaced }
}

fn best_insertion<M>(
    gap: &Gap,
    clock: ClockTime,
    position: Coordinate,
    flexible: &[&Task],
    taken: &[bool],
    metric: &M,
    policy: &SchedulingPolicy,
) -> Option<Insertion>
where
    M: TravelMetricProvider + ?Sized,
{
    let mut best: Option<Insertion> = None;

    for (index, &task) in flexible.iter().enumerate() {
        if taken[index] {
            continue;
        }

        let leg = metric.metric(position, task.location);
        let start = clock
            .add_minutes(travel_minutes(leg))
            .round_up(policy.rounding_step_minutes);
        let end = start.add_minutes(task.duration_minutes);
        if end > gap.end {
            continue;
        }

        let score = leg.duration_minutes + metric.metric(task.location, gap.next).duration_minutes;
        let better = match &best {
            Some(current) => score < current.score,
            None => true,
        };
        if better {
            best = Some(Insertion {
                index,
                leg,
                start,
                end,
                score,
            });
        }
    }

    best
}

/// Recomputes each stop's travel figures against its predecessor, the first
/// one against home. Times are left untouched.
fn relink<M>(home: Coordinate, stops: Vec<Stop>, metric: &M) -> Vec<Stop>
where
    M: TravelMetricProvider + ?Sized,
{
    let mut previous = home;
    stops
        .into_iter()
        .map(|stop| {
            let leg = metric.metric(previous, stop.location);
            previous = stop.location;
            Stop {
                travel_from_previous_minutes: travel_minutes(leg),
                distance_from_previous_km: leg.distance_km,
                ..stop
            }
        })
        .collect()
}

fn leg_distance(stops: &[Stop]) -> f64 {
    stops.iter().map(|stop| stop.distance_from_previous_km).sum()
}

/// Routes a worker whose tasks are all locked: fixed times in order, travel
/// charged from home to the first stop.
pub fn plan_locked<M>(worker: &Worker, tasks: &[&Task], metric: &M) -> Route
where
    M: TravelMetricProvider + ?Sized,
{
    let stops = locked_in_time_order(tasks)
        .into_iter()
        .map(|(task, slot)| Stop::new(task, slot.start, slot.end))
        .collect();
    let stops = relink(worker.home, stops, metric);

    let total_distance_km = leg_distance(&stops);
    Route::new(worker, stops, total_distance_km, Vec::new())
}

/// Routes a worker with locked and flexible tasks.
///
/// Flexible tasks are inserted into the gaps around the locked ones; tasks
/// that fit nowhere are listed on the route as unplaced.
pub fn plan_mixed<M>(worker: &Worker, tasks: &[&Task], metric: &M, policy: &SchedulingPolicy) -> Route
where
    M: TravelMetricProvider + ?Sized,
{
    let locked = locked_in_time_order(tasks);
    let flexible: Vec<&Task> = tasks.iter().copied().filter(|task| !task.is_locked()).collect();

    let gaps = find_gaps(worker.home, worker.earliest_available(policy), &locked, policy);
    let fill = fill_gaps(&gaps, &flexible, metric, policy);

    let mut stops: Vec<Stop> = locked
        .iter()
        .map(|&(task, slot)| Stop::new(task, slot.start, slot.end))
        .chain(fill.placed)
        .collect();
    stops.sort_by_key(|stop| stop.start_time);
    let stops = relink(worker.home, stops, metric);

    let total_distance_km = leg_distance(&stops);
    let unplaced = fill.unplaced.iter().map(|task| task.id).collect();
    Route::new(worker, stops, total_distance_km, unplaced)
}
