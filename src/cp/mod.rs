//! Constraint Programming (CP) modeling layer.
//!
//! Provides a domain-agnostic model for expressing constrained optimization
//! problems using integer, boolean and interval variables with constraints.
//!
//! # Key Components
//!
//! - **Variables**: [`IntVar`], [`BoolVar`], [`IntervalVar`], addressed by
//!   the typed handles [`IntVarId`], [`BoolVarId`], [`IntervalId`]
//! - **Constraints**: [`Constraint`]: Precedence, NoOverlap, Cumulative, etc.
//! - **Model**: [`CpModel`]: container for variables, constraints, objective
//!   and [`DecisionStrategy`] hints
//! - **Solver**: [`CpSolver`] trait: interface for solver implementations
//! - **Check**: [`CpModel::check`]: verifies a [`CpSolution`] against the model
//!
//! # Design
//!
//! This module defines the modeling layer only. It does NOT include a
//! constraint propagation engine. The [`CpSolver`] trait allows plugging in
//! external solvers (OR-Tools, CPLEX) or custom heuristics.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod check;
mod model;
mod solver;
mod variables;

pub use check::Violation;
pub use model::{
    Constraint, CpModel, DecisionStrategy, ModelError, Objective, ValueSelection,
    VariableSelection,
};
pub use solver::{CpSolution, CpSolver, SolverConfig, SolverStatus};
pub use variables::{BoolVar, BoolVarId, IntVar, IntVarId, IntervalId, IntervalVar};
