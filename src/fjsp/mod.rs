//! Flexible job shop formulation.
//!
//! Turns an [`Instance`] into a [`CpModel`](crate::cp::CpModel) that a
//! [`CpSolver`](crate::cp::CpSolver) minimizes the makespan of.
//!
//! # Pipeline
//!
//! 1. **Instance**: [`Instance`], [`Job`], [`Task`], [`Alternative`]
//! 2. **Variables**: start/duration/end per task, a presence literal per
//!    alternative ([`TaskVars`])
//! 3. **Encoding**: job precedence, exactly one alternative per task,
//!    optional intervals, per-machine no-overlap/cumulative
//!    ([`ResourcePolicy`])
//! 4. **Objective**: `makespan = max(job ends)`, minimized
//! 5. **Energetic bounds**: per-phase makespan cuts ([`LowerBoundMode`])
//! 6. **Search hint**: branch on task starts, lowest minimum first
//!
//! # Reference
//! Brandimarte (1993), "Routing and scheduling in a flexible job shop by tabu search"

mod bounds;
mod builder;
mod config;
mod demand;
mod encoder;
mod error;
mod generator;
mod instance;
mod objective;
mod schedule;
mod search;
#[cfg(test)]
mod testing;
mod variables;

pub use bounds::{energetic_bounds, phase_stats, PhaseBound, PhaseStats};
pub use builder::{build_batch, build_model, FjspModel, FjspModelBuilder};
pub use config::{BuildConfig, HorizonPolicy, LowerBoundMode, ResourcePolicy, SearchHint};
pub use demand::{DemandLookup, DemandTable, UnitDemand};
pub use encoder::MachineLoad;
pub use error::{FjspError, Result};
pub use generator::InstanceGenerator;
pub use instance::{Alternative, Instance, Job, MachineId, Task};
pub use schedule::{Schedule, ScheduledOperation};
pub use variables::TaskVars;
