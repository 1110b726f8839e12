//! Resource demand lookup.
//!
//! The demand an alternative places on its machine's capacity is supplied
//! from outside the instance. Any `Fn(job, task, alternative) -> i64`
//! works; [`UnitDemand`] and [`DemandTable`] cover the common cases.

use super::error::{FjspError, Result};
use super::instance::Instance;
use std::collections::HashMap;

/// Supplies the cumulative-resource consumption of one alternative.
pub trait DemandLookup {
    /// Demand of alternative `alternative` of task `task` of job `job`.
    fn demand(&self, job: usize, task: usize, alternative: usize) -> i64;
}

impl<F> DemandLookup for F
where
    F: Fn(usize, usize, usize) -> i64,
{
    fn demand(&self, job: usize, task: usize, alternative: usize) -> i64 {
        self(job, task, alternative)
    }
}

/// Every alternative consumes one unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitDemand;

impl DemandLookup for UnitDemand {
    fn demand(&self, _job: usize, _task: usize, _alternative: usize) -> i64 {
        1
    }
}

/// Explicit per-alternative demands with a fallback value.
///
/// # Examples
///
/// ```
/// use u_fjsp::fjsp::{DemandLookup, DemandTable};
///
/// let table = DemandTable::new(1).with_demand(2, 0, 1, 3);
/// assert_eq!(table.demand(2, 0, 1), 3);
/// assert_eq!(table.demand(0, 0, 0), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DemandTable {
    demands: HashMap<(usize, usize, usize), i64>,
    default: i64,
}

impl DemandTable {
    /// Creates a table answering `default` for every missing entry.
    pub fn new(default: i64) -> Self {
        Self {
            demands: HashMap::new(),
            default,
        }
    }

    /// Sets the demand of one alternative.
    pub fn with_demand(mut self, job: usize, task: usize, alternative: usize, demand: i64) -> Self {
        self.demands.insert((job, task, alternative), demand);
        self
    }
}

impl DemandLookup for DemandTable {
    fn demand(&self, job: usize, task: usize, alternative: usize) -> i64 {
        self.demands
            .get(&(job, task, alternative))
            .copied()
            .unwrap_or(self.default)
    }
}

/// Demands resolved for every alternative, indexed `[job][task][alternative]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Demands(Vec<Vec<Vec<i64>>>);

impl Demands {
    /// Queries `lookup` once per alternative, rejecting negative values.
    pub(crate) fn resolve<D>(instance: &Instance, lookup: &D) -> Result<Self>
    where
        D: DemandLookup + ?Sized,
    {
        let mut table = Vec::with_capacity(instance.jobs.len());
        for (j, job) in instance.jobs.iter().enumerate() {
            let mut tasks = Vec::with_capacity(job.tasks.len());
            for (t, task) in job.tasks.iter().enumerate() {
                let mut alts = Vec::with_capacity(task.alternatives.len());
                for a in 0..task.alternatives.len() {
                    let demand = lookup.demand(j, t, a);
                    if demand < 0 {
                        return Err(FjspError::NegativeDemand {
                            job: j,
                            task: t,
                            alternative: a,
                            demand,
                        });
                    }
                    alts.push(demand);
                }
                tasks.push(alts);
            }
            table.push(tasks);
        }
        Ok(Self(table))
    }

    pub(crate) fn get(&self, job: usize, task: usize, alternative: usize) -> i64 {
        self.0[job][task][alternative]
    }
}
