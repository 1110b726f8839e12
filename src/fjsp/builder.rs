//! Model assembly: the single entry point from instance to CP model.

use super::bounds::{self, energetic_bounds, PhaseBound, PhaseStats};
use super::config::BuildConfig;
use super::demand::{DemandLookup, Demands};
use super::encoder::{self, MachineLoad};
use super::error::Result;
use super::instance::{Instance, MachineId};
use super::objective;
use super::schedule::Schedule;
use super::search;
use super::variables::{TaskVars, Variables};
use crate::cp::{BoolVarId, CpModel, CpSolver, IntVarId, IntervalId, SolverConfig};
use std::collections::BTreeMap;
use tracing::info;

/// Builds a CP model from a flexible job shop instance.
///
/// Runs, in order: instance and demand validation, phase analysis,
/// variable creation, constraint encoding, the makespan objective,
/// energetic cuts and the search hint. Malformed input is rejected before
/// any variable exists.
///
/// # Example
/// ```
/// use u_fjsp::fjsp::{FjspModelBuilder, Instance, UnitDemand};
///
/// let instance = Instance::from_raw(&[vec![vec![(3, 0)]]], [(0, 1)]);
/// let model = FjspModelBuilder::new(&instance, &UnitDemand).build().unwrap();
/// assert_eq!(model.horizon(), 3);
/// assert!(model.start(0, 0).is_some());
/// ```
pub struct FjspModelBuilder<'a, D: ?Sized> {
    instance: &'a Instance,
    demand: &'a D,
    config: BuildConfig,
}

impl<'a, D> FjspModelBuilder<'a, D>
where
    D: DemandLookup + ?Sized,
{
    /// Creates a builder with the default configuration.
    pub fn new(instance: &'a Instance, demand: &'a D) -> Self {
        Self {
            instance,
            demand,
            config: BuildConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the model.
    pub fn build(&self) -> Result<FjspModel> {
        let instance = self.instance;
        let config = &self.config;

        instance.validate()?;
        let demands = Demands::resolve(instance, self.demand)?;
        let horizon = config.horizon.resolve(instance)?;
        let phase_stats = bounds::collect(instance, &demands, config.resources)?;

        let mut model = CpModel::new(config.name.clone(), horizon);
        let vars = Variables::create(&mut model, instance, horizon);
        let encoding = encoder::encode(&mut model, instance, &vars, &demands, config.resources);
        let (makespan, job_ends) = objective::minimize_makespan(&mut model, &vars, horizon);

        let phase_bounds = energetic_bounds(&phase_stats, config.lower_bounds)?;
        bounds::add_cuts(&mut model, makespan, &phase_bounds);

        if let Some(hint) = config.search {
            search::attach(&mut model, &vars, hint);
        }

        model.validate()?;

        info!(
            model = %model.name(),
            jobs = instance.job_count(),
            tasks = instance.task_count(),
            machines = encoding.loads.len(),
            horizon,
            int_vars = model.int_var_count(),
            bool_vars = model.bool_var_count(),
            intervals = model.interval_count(),
            constraints = model.constraint_count(),
            "fjsp model built"
        );

        let machines = instance
            .jobs
            .iter()
            .map(|job| {
                job.tasks
                    .iter()
                    .map(|task| task.alternatives.iter().map(|a| a.machine).collect())
                    .collect()
            })
            .collect();

        Ok(FjspModel {
            model,
            horizon,
            tasks: vars.tasks,
            presences: vars.presences,
            intervals: encoding.intervals,
            machines,
            loads: encoding.loads,
            job_ends,
            makespan,
            phase_stats,
            phase_bounds,
        })
    }
}

/// Builds a model with the default configuration.
pub fn build_model<D>(instance: &Instance, demand: &D) -> Result<FjspModel>
where
    D: DemandLookup + ?Sized,
{
    FjspModelBuilder::new(instance, demand).build()
}

/// Builds one model per instance, sharing `demand` and `config`.
///
/// Builds are independent of one another; with the `parallel` feature they
/// run on the rayon thread pool.
#[cfg(feature = "parallel")]
pub fn build_batch<D>(
    instances: &[Instance],
    demand: &D,
    config: &BuildConfig,
) -> Vec<Result<FjspModel>>
where
    D: DemandLookup + Sync + ?Sized,
{
    use rayon::prelude::*;

    instances
        .par_iter()
        .map(|instance| {
            FjspModelBuilder::new(instance, demand)
                .with_config(config.clone())
                .build()
        })
        .collect()
}

/// Builds one model per instance, sharing `demand` and `config`.
#[cfg(not(feature = "parallel"))]
pub fn build_batch<D>(
    instances: &[Instance],
    demand: &D,
    config: &BuildConfig,
) -> Vec<Result<FjspModel>>
where
    D: DemandLookup + ?Sized,
{
    instances
        .iter()
        .map(|instance| {
            FjspModelBuilder::new(instance, demand)
                .with_config(config.clone())
                .build()
        })
        .collect()
}

/// An assembled flexible job shop model.
///
/// Read-only once built: values are bound by a [`CpSolver`], never here.
#[derive(Debug, Clone)]
pub struct FjspModel {
    model: CpModel,
    horizon: i64,
    tasks: Vec<Vec<TaskVars>>,
    presences: Vec<Vec<Vec<BoolVarId>>>,
    intervals: Vec<Vec<Vec<IntervalId>>>,
    pub(crate) machines: Vec<Vec<Vec<MachineId>>>,
    loads: BTreeMap<MachineId, MachineLoad>,
    job_ends: Vec<IntVarId>,
    makespan: IntVarId,
    phase_stats: Vec<PhaseStats>,
    phase_bounds: Vec<PhaseBound>,
}

impl FjspModel {
    /// The underlying CP model.
    pub fn cp_model(&self) -> &CpModel {
        &self.model
    }

    /// Upper bound of every time domain.
    pub fn horizon(&self) -> i64 {
        self.horizon
    }

    /// The makespan variable.
    pub fn makespan(&self) -> IntVarId {
        self.makespan
    }

    /// End variable of each job's last task, in job order.
    pub fn job_ends(&self) -> &[IntVarId] {
        &self.job_ends
    }

    /// Start/duration/end of task `task` of job `job`.
    pub fn task_vars(&self, job: usize, task: usize) -> Option<TaskVars> {
        self.tasks.get(job)?.get(task).copied()
    }

    /// Start variable of task `task` of job `job`.
    pub fn start(&self, job: usize, task: usize) -> Option<IntVarId> {
        self.task_vars(job, task).map(|tv| tv.start)
    }

    /// `((job, task), start)` for every task, in job-major order.
    pub fn starts(&self) -> impl Iterator<Item = ((usize, usize), IntVarId)> + '_ {
        self.tasks.iter().enumerate().flat_map(|(j, job)| {
            job.iter()
                .enumerate()
                .map(move |(t, tv)| ((j, t), tv.start))
        })
    }

    /// Presence literal of one alternative.
    pub fn presence(&self, job: usize, task: usize, alternative: usize) -> Option<BoolVarId> {
        self.presences.get(job)?.get(task)?.get(alternative).copied()
    }

    /// `((job, task, alternative), presence)` for every alternative.
    pub fn presences(&self) -> impl Iterator<Item = ((usize, usize, usize), BoolVarId)> + '_ {
        self.presences.iter().enumerate().flat_map(|(j, job)| {
            job.iter().enumerate().flat_map(move |(t, task)| {
                task.iter()
                    .enumerate()
                    .map(move |(a, &lit)| ((j, t, a), lit))
            })
        })
    }

    /// Optional interval of one alternative.
    pub fn interval(&self, job: usize, task: usize, alternative: usize) -> Option<IntervalId> {
        self.intervals.get(job)?.get(task)?.get(alternative).copied()
    }

    /// Intervals and demands gathered per machine.
    pub fn machine_loads(&self) -> &BTreeMap<MachineId, MachineLoad> {
        &self.loads
    }

    /// Workload statistics per phase.
    pub fn phase_stats(&self) -> &[PhaseStats] {
        &self.phase_stats
    }

    /// Energetic cuts asserted on the makespan.
    pub fn phase_bounds(&self) -> &[PhaseBound] {
        &self.phase_bounds
    }

    /// Largest energetic cut, 0 without cuts.
    pub fn lower_bound(&self) -> i64 {
        self.phase_bounds.iter().map(|b| b.bound).max().unwrap_or(0)
    }

    pub fn job_count(&self) -> usize {
        self.tasks.len()
    }

    /// Number of tasks of job `job` (0 for an unknown job).
    pub fn task_count(&self, job: usize) -> usize {
        self.tasks.get(job).map_or(0, Vec::len)
    }

    /// Number of alternatives of a task (0 for an unknown task).
    pub fn alternative_count(&self, job: usize, task: usize) -> usize {
        self.presences
            .get(job)
            .and_then(|j| j.get(task))
            .map_or(0, Vec::len)
    }

    /// Hands the model to `solver` and decodes its answer.
    pub fn solve<S>(&self, solver: &S, config: &SolverConfig) -> Result<Schedule>
    where
        S: CpSolver + ?Sized,
    {
        let solution = solver.solve(&self.model, config);
        self.decode(&solution)
    }
}
