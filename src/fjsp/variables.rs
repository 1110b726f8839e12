//! Variable factory: time variables per task, presence literals per alternative.

use super::instance::Instance;
use crate::cp::{BoolVarId, CpModel, IntVarId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Start, duration and end of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskVars {
    pub start: IntVarId,
    pub duration: IntVarId,
    pub end: IntVarId,
}

/// Every variable allocated for an instance.
#[derive(Debug, Clone)]
pub(crate) struct Variables {
    /// `[job][task]`.
    pub(crate) tasks: Vec<Vec<TaskVars>>,
    /// `[job][task][alternative]`.
    pub(crate) presences: Vec<Vec<Vec<BoolVarId>>>,
}

impl Variables {
    /// Registers the variables of a validated instance.
    ///
    /// Start and end range over `[0, horizon]`; duration over
    /// `[0, longest alternative]`.
    pub(crate) fn create(model: &mut CpModel, instance: &Instance, horizon: i64) -> Self {
        let mut tasks = Vec::with_capacity(instance.jobs.len());
        let mut presences = Vec::with_capacity(instance.jobs.len());

        for (j, job) in instance.jobs.iter().enumerate() {
            let mut job_tasks = Vec::with_capacity(job.tasks.len());
            let mut job_presences = Vec::with_capacity(job.tasks.len());

            for (t, task) in job.tasks.iter().enumerate() {
                let suffix = format!("_j{j}_t{t}");
                job_tasks.push(TaskVars {
                    start: model.new_int_var(format!("start{suffix}"), 0, horizon),
                    duration: model.new_int_var(
                        format!("duration{suffix}"),
                        0,
                        task.max_duration(),
                    ),
                    end: model.new_int_var(format!("end{suffix}"), 0, horizon),
                });

                job_presences.push(
                    (0..task.alternatives.len())
                        .map(|a| model.new_bool_var(format!("presence{suffix}_a{a}")))
                        .collect(),
                );
            }

            tasks.push(job_tasks);
            presences.push(job_presences);
        }

        Self { tasks, presences }
    }

    /// Start variables in job-major order.
    pub(crate) fn starts(&self) -> Vec<IntVarId> {
        self.tasks.iter().flatten().map(|tv| tv.start).collect()
    }

    /// End variable of each job's last task.
    pub(crate) fn job_ends(&self) -> Vec<IntVarId> {
        self.tasks
            .iter()
            .filter_map(|job| job.last().map(|tv| tv.end))
            .collect()
    }
}
