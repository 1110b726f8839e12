//! Decoding a solver assignment back into task placements.

use super::builder::FjspModel;
use super::error::{FjspError, Result};
use super::instance::MachineId;
use crate::cp::CpSolution;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One task placed on the machine of its chosen alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduledOperation {
    pub job: usize,
    pub task: usize,
    /// Index of the realized alternative.
    pub alternative: usize,
    pub machine: MachineId,
    pub start: i64,
    pub end: i64,
}

/// A decoded solution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    /// Operations in job-major order.
    pub operations: Vec<ScheduledOperation>,
    /// Value of the makespan variable.
    pub makespan: i64,
}

impl Schedule {
    /// Operation of task `task` of job `job`.
    pub fn operation(&self, job: usize, task: usize) -> Option<&ScheduledOperation> {
        self.operations
            .iter()
            .find(|op| op.job == job && op.task == task)
    }

    /// Operations placed on `machine`, ordered by start time.
    pub fn operations_on(&self, machine: MachineId) -> Vec<&ScheduledOperation> {
        let mut ops: Vec<_> = self
            .operations
            .iter()
            .filter(|op| op.machine == machine)
            .collect();
        ops.sort_by_key(|op| (op.start, op.job, op.task));
        ops
    }
}

impl FjspModel {
    /// Turns a solver assignment into a [`Schedule`].
    ///
    /// The assignment must come with a solution status and satisfy every
    /// constraint of the model; anything else is reported, never patched.
    pub fn decode(&self, solution: &CpSolution) -> Result<Schedule> {
        if !solution.is_solution_found() {
            return Err(FjspError::NoSolution(solution.status));
        }
        self.cp_model().check(solution)?;

        let mut operations = Vec::new();
        for ((j, t), start) in self.starts() {
            let (Some(tv), Some(alternative)) = (self.task_vars(j, t), self.chosen(solution, j, t))
            else {
                continue;
            };
            operations.push(ScheduledOperation {
                job: j,
                task: t,
                alternative,
                machine: self.machines[j][t][alternative],
                start: solution.int_value(start).unwrap_or_default(),
                end: solution.int_value(tv.end).unwrap_or_default(),
            });
        }

        Ok(Schedule {
            operations,
            makespan: solution.int_value(self.makespan()).unwrap_or_default(),
        })
    }

    fn chosen(&self, solution: &CpSolution, job: usize, task: usize) -> Option<usize> {
        (0..self.alternative_count(job, task)).find(|&a| {
            self.presence(job, task, a)
                .and_then(|lit| solution.bool_value(lit))
                .unwrap_or(false)
        })
    }
}
