//! Batch entry point: routes every worker's pre-assigned tasks.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::error::WorkerError;
use crate::gaps;
use crate::model::{Route, Task, TaskId, TaskRecord, Worker};
use crate::policy::SchedulingPolicy;
use crate::report::{OptimizeResult, RunReport};
use crate::schedule;
use crate::traits::{TaskDirectory, TravelMetricProvider, WorkerDirectory};

/// Tasks already allocated to one worker, as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub task_ids: Vec<String>,
}

impl Assignment {
    pub fn new<I, S>(worker_id: impl Into<String>, task_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            worker_id: Some(worker_id.into()),
            task_ids: task_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// How a worker's tasks are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKind {
    AllLocked,
    AllFlexible,
    Mixed,
}

pub fn classify(tasks: &[&Task]) -> AssignmentKind {
    let locked = tasks.iter().filter(|task| task.is_locked()).count();
    match locked {
        0 => AssignmentKind::AllFlexible,
        n if n == tasks.len() => AssignmentKind::AllLocked,
        _ => AssignmentKind::Mixed,
    }
}

/// Routing engine with its data sources injected.
///
/// Workers are processed one at a time; a failing worker is recorded in the
/// result and does not stop the batch.
#[derive(Debug, Clone)]
pub struct RouteOptimizer<W, T, M> {
    workers: W,
    tasks: T,
    metric: M,
    policy: SchedulingPolicy,
}

impl<W, T, M> RouteOptimizer<W, T, M>
where
    W: WorkerDirectory,
    T: TaskDirectory,
    M: TravelMetricProvider,
{
    pub fn new(workers: W, tasks: T, metric: M) -> Self {
        Self {
            workers,
            tasks,
            metric,
            policy: SchedulingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }

    /// Routes every assignment for `date`.
    pub fn optimize(&self, date: NaiveDate, assignments: &[Assignment]) -> OptimizeResult {
        let started = Instant::now();
        info!(
            %date,
            workers = assignments.len(),
            tasks = assignments.iter().map(|a| a.task_ids.len()).sum::<usize>(),
            "optimizing routes"
        );

        let mut report = RunReport::default();
        for assignment in assignments {
            match self.plan_assignment(date, assignment) {
                Ok(Some(route)) => {
                    info!(
                        worker_id = %route.worker_id,
                        stops = route.stops.len(),
                        unplaced = route.unplaced.len(),
                        km = route.total_distance_km,
                        travel_minutes = route.total_travel_minutes,
                        "route planned"
                    );
                    report.add_route(route);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, "skipping worker");
                    report.add_error(err);
                }
            }
        }

        let result = report.finish(started.elapsed());
        info!(
            status = ?result.status,
            scheduled = result.metrics.total_scheduled,
            routes = result.metrics.total_workers,
            km = result.metrics.total_km,
            seconds = result.metrics.execution_seconds,
            "route optimization complete"
        );
        result
    }

    /// Plans one worker. `Ok(None)` means there was nothing to route.
    fn plan_assignment(&self, date: NaiveDate, assignment: &Assignment) -> Result<Option<Route>, WorkerError> {
        let worker_id = assignment
            .worker_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(WorkerError::MissingWorkerId)?;

        let _span = info_span!("worker", worker_id).entered();

        if assignment.task_ids.is_empty() {
            warn!("no tasks assigned, skipping");
            return Ok(None);
        }

        let worker = self.load_worker(worker_id, date)?;
        debug!(earliest = %worker.earliest_available(&self.policy), "worker resolved");

        let task_ids = parse_task_ids(worker_id, &assignment.task_ids)?;
        let tasks = self.load_tasks(worker_id, &task_ids)?;
        let tasks: Vec<&Task> = tasks.iter().collect();

        let kind = classify(&tasks);
        debug!(?kind, tasks = tasks.len(), "scheduling");

        let route = match kind {
            AssignmentKind::AllLocked => gaps::plan_locked(&worker, &tasks, &self.metric),
            AssignmentKind::AllFlexible => schedule::plan_flexible(&worker, &tasks, &self.metric, &self.policy),
            AssignmentKind::Mixed => gaps::plan_mixed(&worker, &tasks, &self.metric, &self.policy),
        };

        Ok(Some(route))
    }

    fn load_worker(&self, worker_id: &str, date: NaiveDate) -> Result<Worker, WorkerError> {
        self.workers
            .worker(worker_id, date)
            .map_err(|err| WorkerError::Lookup {
                worker_id: worker_id.to_string(),
                reason: err.to_string(),
            })?
            .and_then(|record| record.into_worker(&self.policy))
            .ok_or_else(|| WorkerError::WorkerNotFound(worker_id.to_string()))
    }

    /// Fetches tasks in the requested order. Tasks without coordinates are
    /// dropped; having none left is an error.
    fn load_tasks(&self, worker_id: &str, ids: &[TaskId]) -> Result<Vec<Task>, WorkerError> {
        let records = self.tasks.tasks(ids).map_err(|err| WorkerError::Lookup {
            worker_id: worker_id.to_string(),
            reason: err.to_string(),
        })?;

        let mut by_id: HashMap<TaskId, TaskRecord> = HashMap::new();
        for record in records {
            by_id.entry(record.id).or_insert(record);
        }

        let tasks: Vec<Task> = ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .filter_map(|record| {
                let id = record.id;
                let task = record.into_task(self.policy.default_task_minutes);
                if task.is_none() {
                    debug!(task_id = %id, "skipping task without coordinates");
                }
                task
            })
            .collect();

        if tasks.is_empty() {
            return Err(WorkerError::NoValidTasks(worker_id.to_string()));
        }
        Ok(tasks)
    }
}

/// Parses task ids, dropping repeats after their first occurrence.
fn parse_task_ids(worker_id: &str, raw: &[String]) -> Result<Vec<TaskId>, WorkerError> {
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(raw.len());

    for text in raw {
        let id: TaskId = text.parse().map_err(|_| WorkerError::MalformedTaskId {
            worker_id: worker_id.to_string(),
            task_id: text.clone(),
        })?;
        if seen.insert(id) {
            ids.push(id);
        }
    }

    Ok(ids)
}
