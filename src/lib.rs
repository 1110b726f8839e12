//! Constraint-programming formulation of the flexible job shop.
//!
//! Builds the declarative model a CP solver needs to minimize the makespan
//! of a flexible job shop: jobs are ordered task sequences, each task runs
//! on one of several alternative machines, and machines have a finite
//! capacity. Solving itself is delegated to an external engine.
//!
//! # Modules
//!
//! - **`cp`**: Domain-agnostic modeling layer: integer, boolean and
//!   interval variables, constraints, objective, search hints, a checker
//!   for complete assignments and the [`cp::CpSolver`] seam.
//! - **`fjsp`**: The flexible job shop formulation: instance types,
//!   variable factory, constraint encoder, makespan objective, energetic
//!   lower bounds, search hint, decoding of solver answers.
//!
//! # Example
//!
//! ```
//! use u_fjsp::fjsp::{build_model, Instance, UnitDemand};
//!
//! // Two jobs on one single-slot machine.
//! let instance = Instance::from_raw(&[vec![vec![(2, 0)]], vec![vec![(3, 0)]]], [(0, 1)]);
//! let model = build_model(&instance, &UnitDemand).unwrap();
//! assert_eq!(model.lower_bound(), 5);
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for instances, configuration and
//!   CP model types.
//! - `parallel`: [`fjsp::build_batch`] builds models on the rayon pool.

pub mod cp;
pub mod fjsp;
