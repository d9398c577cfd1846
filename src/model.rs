//! Typed records for workers, tasks and the routes built from them.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseClockError;
use crate::policy::SchedulingPolicy;

/// WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Time of day in whole minutes since midnight.
///
/// Rendered as `HH:MM` in text and in serialized output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Self(hours * 60 + minutes)
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }

    pub fn add_minutes(self, minutes: u32) -> Self {
        Self(self.0.saturating_add(minutes))
    }

    /// Minutes from `self` until `later`, zero if `later` is not after `self`.
    pub fn minutes_until(self, later: ClockTime) -> u32 {
        later.0.saturating_sub(self.0)
    }

    /// Rounds up to the next multiple of `step` minutes.
    ///
    /// A time already on a boundary is returned unchanged; the result is
    /// never earlier than `self`.
    pub fn round_up(self, step: u32) -> Self {
        if step == 0 {
            return self;
        }
        match self.0 % step {
            0 => self,
            rem => Self(self.0.saturating_add(step - rem)),
        }
    }

    /// Wall-clock time, `None` once past midnight.
    pub fn to_naive_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.0 / 60, self.0 % 60, 0)
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self::from_hm(time.hour(), time.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive_time() {
            Some(time) => write!(f, "{}", time.format("%H:%M")),
            // ran past midnight
            None => write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60),
        }
    }
}

impl FromStr for ClockTime {
    type Err = ParseClockError;

    /// Accepts `HH:MM` and `HH:MM:SS`; seconds are dropped.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(text, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .map(Self::from)
            .map_err(|_| ParseClockError(text.to_string()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Numeric task identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.trim().parse().map(Self)
    }
}

/// Worker as returned by the worker directory; any field may be unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerRecord {
    pub id: String,
    pub name: Option<String>,
    pub home: Option<Coordinate>,
    /// Start of the worker's availability for the day.
    pub available_from: Option<ClockTime>,
    /// End of the latest shift the worker already has that day.
    pub latest_shift_end: Option<ClockTime>,
}

impl WorkerRecord {
    /// Resolves the record into a routable worker. A record without home
    /// coordinates cannot be routed and yields `None`.
    pub fn into_worker(self, policy: &SchedulingPolicy) -> Option<Worker> {
        let home = self.home?;
        Some(Worker {
            id: self.id,
            name: self.name,
            home,
            available_from: self.available_from.unwrap_or(policy.day_start),
            latest_shift_end: self.latest_shift_end,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    pub id: String,
    pub name: Option<String>,
    pub home: Coordinate,
    pub available_from: ClockTime,
    pub latest_shift_end: Option<ClockTime>,
}

impl Worker {
    /// First clock time the worker can start a visit.
    ///
    /// An existing shift ending after `available_from` pushes the start to
    /// its end plus the shift buffer. Never earlier than the day start.
    pub fn earliest_available(&self, policy: &SchedulingPolicy) -> ClockTime {
        let start = match self.latest_shift_end {
            Some(shift_end) if shift_end > self.available_from => {
                shift_end.add_minutes(policy.shift_buffer_minutes)
            }
            _ => self.available_from,
        };
        start.max(policy.day_start)
    }
}

/// Fixed interval of a locked task. Taken as given, never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedSlot {
    pub start: ClockTime,
    pub end: ClockTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduling {
    Flexible,
    Locked(LockedSlot),
}

/// Task as returned by the task directory.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    pub id: TaskId,
    pub label: Option<String>,
    pub location: Option<Coordinate>,
    pub duration_minutes: Option<u32>,
    pub locked: Option<LockedSlot>,
}

impl TaskRecord {
    /// Resolves the record into a routable task. Tasks without a location
    /// yield `None`; a missing or zero duration falls back to `default_minutes`.
    pub fn into_task(self, default_minutes: u32) -> Option<Task> {
        let location = self.location?;
        Some(Task {
            id: self.id,
            label: self.label,
            location,
            duration_minutes: self
                .duration_minutes
                .filter(|minutes| *minutes > 0)
                .unwrap_or(default_minutes),
            scheduling: self.locked.map_or(Scheduling::Flexible, Scheduling::Locked),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub label: Option<String>,
    pub location: Coordinate,
    pub duration_minutes: u32,
    pub scheduling: Scheduling,
}

impl Task {
    pub fn locked_slot(&self) -> Option<LockedSlot> {
        match self.scheduling {
            Scheduling::Locked(slot) => Some(slot),
            Scheduling::Flexible => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked_slot().is_some()
    }
}

/// A task placed into a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// 1-based position in the route.
    pub sequence: usize,
    pub task_id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub location: Coordinate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub duration_minutes: u32,
    pub travel_from_previous_minutes: u32,
    pub distance_from_previous_km: f64,
    pub locked: bool,
}

impl Stop {
    pub(crate) fn new(task: &Task, start_time: ClockTime, end_time: ClockTime) -> Self {
        Self {
            sequence: 0,
            task_id: task.id,
            label: task.label.clone(),
            location: task.location,
            start_time,
            end_time,
            duration_minutes: task.duration_minutes,
            travel_from_previous_minutes: 0,
            distance_from_previous_km: 0.0,
            locked: task.is_locked(),
        }
    }
}

/// One worker's scheduled day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub worker_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    pub stops: Vec<Stop>,
    pub total_distance_km: f64,
    pub total_travel_minutes: u32,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    /// Flexible tasks that fit no free interval.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unplaced: Vec<TaskId>,
}

impl Route {
    /// Builds the route, numbering stops in the given order.
    pub fn new(worker: &Worker, stops: Vec<Stop>, total_distance_km: f64, unplaced: Vec<TaskId>) -> Self {
        let stops: Vec<Stop> = stops
            .into_iter()
            .enumerate()
            .map(|(index, stop)| Stop { sequence: index + 1, ..stop })
            .collect();

        Self {
            worker_id: worker.id.clone(),
            worker_name: worker.name.clone(),
            total_travel_minutes: stops.iter().map(|stop| stop.travel_from_previous_minutes).sum(),
            start_time: stops.first().map(|stop| stop.start_time),
            end_time: stops.last().map(|stop| stop.end_time),
            stops,
            total_distance_km,
            unplaced,
        }
    }
}
