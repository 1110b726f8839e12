//! Flexible job shop instance data.

use super::error::{FjspError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Machine identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineId(pub usize);

impl From<usize> for MachineId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// One way of executing a task: a machine and the time it takes there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Alternative {
    /// Processing time on `machine`.
    pub duration: i64,
    /// Machine executing this alternative.
    pub machine: MachineId,
}

impl Alternative {
    pub fn new(duration: i64, machine: impl Into<MachineId>) -> Self {
        Self {
            duration,
            machine: machine.into(),
        }
    }
}

/// A task: exactly one of its alternatives is realized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    /// Alternatives in index order.
    pub alternatives: Vec<Alternative>,
}

impl Task {
    /// Creates a task with no alternatives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an alternative.
    pub fn with_alternative(mut self, duration: i64, machine: impl Into<MachineId>) -> Self {
        self.alternatives.push(Alternative::new(duration, machine));
        self
    }

    /// Shortest alternative duration (0 if there are none).
    pub fn min_duration(&self) -> i64 {
        self.alternatives
            .iter()
            .map(|a| a.duration)
            .min()
            .unwrap_or(0)
    }

    /// Longest alternative duration (0 if there are none).
    pub fn max_duration(&self) -> i64 {
        self.alternatives
            .iter()
            .map(|a| a.duration)
            .max()
            .unwrap_or(0)
    }
}

/// A job: tasks executed strictly in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Job {
    /// Tasks in precedence order.
    pub tasks: Vec<Task>,
}

impl Job {
    /// Creates a job with no tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }
}

/// A flexible job shop instance.
///
/// # Examples
///
/// ```
/// use u_fjsp::fjsp::{Instance, Job, Task};
///
/// let instance = Instance::new()
///     .with_job(Job::new().with_task(Task::new().with_alternative(5, 0).with_alternative(2, 1)))
///     .with_capacity(0, 1)
///     .with_capacity(1, 1);
/// assert!(instance.validate().is_ok());
/// assert_eq!(instance.task_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Instance {
    /// Jobs in index order.
    pub jobs: Vec<Job>,
    /// Capacity of each machine.
    pub capacities: BTreeMap<MachineId, i64>,
}

impl Instance {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an instance from nested `(duration, machine)` lists.
    ///
    /// `jobs[j][t]` lists the alternatives of task `t` of job `j`.
    pub fn from_raw(
        jobs: &[Vec<Vec<(i64, usize)>>],
        capacities: impl IntoIterator<Item = (usize, i64)>,
    ) -> Self {
        let jobs = jobs
            .iter()
            .map(|job| Job {
                tasks: job
                    .iter()
                    .map(|task| Task {
                        alternatives: task
                            .iter()
                            .map(|&(duration, machine)| Alternative::new(duration, machine))
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        let capacities = capacities
            .into_iter()
            .map(|(m, c)| (MachineId(m), c))
            .collect();
        Self { jobs, capacities }
    }

    /// Appends a job.
    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    /// Sets the capacity of a machine.
    pub fn with_capacity(mut self, machine: impl Into<MachineId>, capacity: i64) -> Self {
        self.capacities.insert(machine.into(), capacity);
        self
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Total number of tasks across all jobs.
    pub fn task_count(&self) -> usize {
        self.jobs.iter().map(|j| j.tasks.len()).sum()
    }

    /// Length of the longest job, i.e. the number of phases.
    pub fn max_job_length(&self) -> usize {
        self.jobs.iter().map(|j| j.tasks.len()).max().unwrap_or(0)
    }

    /// Capacity of a machine, if declared.
    pub fn capacity(&self, machine: MachineId) -> Option<i64> {
        self.capacities.get(&machine).copied()
    }

    /// Machines referenced by at least one alternative, in id order.
    pub fn machines(&self) -> BTreeSet<MachineId> {
        self.alternatives().map(|(_, _, _, alt)| alt.machine).collect()
    }

    /// Iterates `(job, task, alternative, &Alternative)` in index order.
    pub fn alternatives(&self) -> impl Iterator<Item = (usize, usize, usize, &Alternative)> {
        self.jobs.iter().enumerate().flat_map(|(j, job)| {
            job.tasks.iter().enumerate().flat_map(move |(t, task)| {
                task.alternatives
                    .iter()
                    .enumerate()
                    .map(move |(a, alt)| (j, t, a, alt))
            })
        })
    }

    /// Upper bound obtained by running every task on its slowest
    /// alternative, one after another.
    pub fn serial_horizon(&self) -> i64 {
        self.jobs
            .iter()
            .flat_map(|j| &j.tasks)
            .map(Task::max_duration)
            .sum()
    }

    /// Sum over jobs of the largest per-task minimum duration.
    ///
    /// Cheaper than [`serial_horizon`](Self::serial_horizon) but not an
    /// upper bound once a job has several tasks.
    pub fn reference_horizon(&self) -> i64 {
        self.jobs
            .iter()
            .map(|j| j.tasks.iter().map(Task::min_duration).max().unwrap_or(0))
            .sum()
    }

    /// Rejects malformed instances, reporting the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            return Err(FjspError::NoJobs);
        }

        for (&machine, &capacity) in &self.capacities {
            if capacity < 1 {
                return Err(FjspError::InvalidCapacity { machine, capacity });
            }
        }

        for (j, job) in self.jobs.iter().enumerate() {
            if job.tasks.is_empty() {
                return Err(FjspError::EmptyJob { job: j });
            }
            for (t, task) in job.tasks.iter().enumerate() {
                if task.alternatives.is_empty() {
                    return Err(FjspError::EmptyTask { job: j, task: t });
                }
                for (a, alt) in task.alternatives.iter().enumerate() {
                    if alt.duration < 0 {
                        return Err(FjspError::NegativeDuration {
                            job: j,
                            task: t,
                            alternative: a,
                            duration: alt.duration,
                        });
                    }
                    if !self.capacities.contains_key(&alt.machine) {
                        return Err(FjspError::UnknownMachine {
                            job: j,
                            task: t,
                            alternative: a,
                            machine: alt.machine,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
