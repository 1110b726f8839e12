//! CP solver interface and solution container.

use super::model::CpModel;
use super::variables::{BoolVarId, IntVarId};
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exceeded time limit.
    Timeout,
    /// No solution found for unknown reasons.
    Unknown,
}

/// Solution from a CP solver.
///
/// Holds one value per variable of the solved model. Interval placement
/// follows from the start/end/presence values.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value (if any).
    pub objective_value: Option<i64>,
    /// Integer variable assignments.
    pub int_values: HashMap<IntVarId, i64>,
    /// Boolean variable assignments.
    pub bool_values: HashMap<BoolVarId, bool>,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
}

impl CpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            int_values: HashMap::new(),
            bool_values: HashMap::new(),
            solve_time_ms: 0,
        }
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value of an integer variable.
    pub fn int_value(&self, id: IntVarId) -> Option<i64> {
        self.int_values.get(&id).copied()
    }

    /// Value of a boolean variable.
    pub fn bool_value(&self, id: BoolVarId) -> Option<bool> {
        self.bool_values.get(&id).copied()
    }

    /// Records an integer value.
    pub fn set_int(&mut self, id: IntVarId, value: i64) {
        self.int_values.insert(id, value);
    }

    /// Records a boolean value.
    pub fn set_bool(&mut self, id: BoolVarId, value: bool) {
        self.bool_values.insert(id, value);
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds.
    pub time_limit_ms: i64,
    /// Number of parallel workers.
    pub num_workers: usize,
    /// Stop after finding the first feasible solution.
    pub stop_after_first: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            num_workers: 1,
            stop_after_first: false,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: i64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn with_stop_after_first(mut self, stop: bool) -> Self {
        self.stop_after_first = stop;
        self
    }
}

/// Trait for CP solver implementations.
///
/// The crate only builds models. Implementors wrap an actual engine
/// (e.g., OR-Tools CP-SAT) and translate its answer into a [`CpSolution`]
/// keyed by the model's variable handles.
pub trait CpSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}
