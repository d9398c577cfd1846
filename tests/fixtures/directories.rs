//! In-memory worker and task directories with record builders.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::NaiveDate;

use inspection_router::error::{CacheError, LookupError};
use inspection_router::model::{ClockTime, Coordinate, LockedSlot, TaskId, TaskRecord, WorkerRecord};
use inspection_router::traits::{CachedTravel, TaskDirectory, TravelCache, WorkerDirectory};

use super::Location;

pub fn hm(hours: u32, minutes: u32) -> ClockTime {
    ClockTime::from_hm(hours, minutes)
}

pub fn service_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
}

// ============================================================================
// Record builders
// ============================================================================

/// Builder for worker records with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestWorker {
    record: WorkerRecord,
}

impl TestWorker {
    pub fn new(id: &str, home: &Location) -> Self {
        Self {
            record: WorkerRecord {
                id: id.to_string(),
                name: Some(format!("Inspector {id}")),
                home: Some(home.coords()),
                available_from: Some(hm(9, 0)),
                latest_shift_end: None,
            },
        }
    }

    pub fn available_from(mut self, time: ClockTime) -> Self {
        self.record.available_from = Some(time);
        self
    }

    pub fn busy_until(mut self, time: ClockTime) -> Self {
        self.record.latest_shift_end = Some(time);
        self
    }

    pub fn without_home(mut self) -> Self {
        self.record.home = None;
        self
    }

    pub fn build(self) -> WorkerRecord {
        self.record
    }
}

/// Builder for task records with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestTask {
    record: TaskRecord,
}

impl TestTask {
    pub fn new(id: u64, location: &Location) -> Self {
        Self {
            record: TaskRecord {
                id: TaskId(id),
                label: Some(location.name.to_string()),
                location: Some(location.coords()),
                duration_minutes: Some(45),
                locked: None,
            },
        }
    }

    pub fn at(mut self, location: Coordinate) -> Self {
        self.record.location = Some(location);
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.record.duration_minutes = Some(minutes);
        self
    }

    pub fn no_duration(mut self) -> Self {
        self.record.duration_minutes = None;
        self
    }

    pub fn locked(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.record.locked = Some(LockedSlot { start, end });
        self
    }

    pub fn without_location(mut self) -> Self {
        self.record.location = None;
        self
    }

    pub fn build(self) -> TaskRecord {
        self.record
    }
}

// ============================================================================
// Directories
// ============================================================================

#[derive(Default)]
pub struct MemoryWorkers {
    workers: HashMap<String, WorkerRecord>,
    failing: bool,
}

impl MemoryWorkers {
    pub fn with(mut self, worker: TestWorker) -> Self {
        let record = worker.build();
        self.workers.insert(record.id.clone(), record);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }
}

impl WorkerDirectory for MemoryWorkers {
    fn worker(&self, id: &str, _date: NaiveDate) -> Result<Option<WorkerRecord>, LookupError> {
        if self.failing {
            return Err(LookupError::Backend("connection refused".to_string()));
        }
        Ok(self.workers.get(id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryTasks {
    tasks: HashMap<TaskId, TaskRecord>,
}

impl MemoryTasks {
    pub fn with(mut self, task: TestTask) -> Self {
        let record = task.build();
        self.tasks.insert(record.id, record);
        self
    }
}

impl TaskDirectory for MemoryTasks {
    fn tasks(&self, ids: &[TaskId]) -> Result<Vec<TaskRecord>, LookupError> {
        Ok(ids.iter().filter_map(|id| self.tasks.get(id).cloned()).collect())
    }
}

// ============================================================================
// Travel caches
// ============================================================================

/// Cache backed by a map; counts lookups.
#[derive(Default)]
pub struct MemoryCache {
    entries: HashMap<String, CachedTravel>,
    pub lookups: Cell<usize>,
}

impl MemoryCache {
    pub fn with(mut self, key: String, minutes: f64, km: Option<f64>) -> Self {
        self.entries.insert(key, CachedTravel { minutes, km });
        self
    }
}

impl TravelCache for MemoryCache {
    fn lookup(&self, key: &str) -> Result<Option<CachedTravel>, CacheError> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.entries.get(key).copied())
    }
}

/// Cache whose backend is always down.
pub struct BrokenCache;

impl TravelCache for BrokenCache {
    fn lookup(&self, _key: &str) -> Result<Option<CachedTravel>, CacheError> {
        Err(CacheError::Backend("timeout".to_string()))
    }
}
