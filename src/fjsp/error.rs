//! Error types for model building.

use super::instance::MachineId;
use crate::cp::{ModelError, SolverStatus, Violation};
use thiserror::Error;

/// Everything that can stop a build or a decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FjspError {
    /// The instance has no jobs at all.
    #[error("instance has no jobs")]
    NoJobs,

    #[error("job {job} has no tasks")]
    EmptyJob { job: usize },

    #[error("task {task} of job {job} has no alternatives")]
    EmptyTask { job: usize, task: usize },

    #[error("alternative {alternative} of job {job} task {task} has negative duration {duration}")]
    NegativeDuration {
        job: usize,
        task: usize,
        alternative: usize,
        duration: i64,
    },

    #[error("alternative {alternative} of job {job} task {task} has negative demand {demand}")]
    NegativeDemand {
        job: usize,
        task: usize,
        alternative: usize,
        demand: i64,
    },

    #[error("alternative {alternative} of job {job} task {task} uses {machine}, which has no capacity")]
    UnknownMachine {
        job: usize,
        task: usize,
        alternative: usize,
        machine: MachineId,
    },

    #[error("{machine} has capacity {capacity}; at least 1 is required")]
    InvalidCapacity { machine: MachineId, capacity: i64 },

    #[error("horizon {0} is negative")]
    InvalidHorizon(i64),

    /// A phase has nowhere to run; guards the energetic division.
    #[error("phase {phase} has no eligible machine")]
    NoEligibleMachine { phase: usize },

    #[error("assembled model is inconsistent: {0}")]
    Model(#[from] ModelError),

    #[error("solver returned no solution (status {0:?})")]
    NoSolution(SolverStatus),

    #[error("solution violates the model: {0}")]
    InvalidSolution(#[from] Violation),
}

/// Result type alias for model building.
pub type Result<T> = std::result::Result<T, FjspError>;
