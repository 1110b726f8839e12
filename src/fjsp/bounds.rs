//! Energetic lower bounds on the makespan.
//!
//! A phase is a task position within its job. For every phase the analyzer
//! aggregates the tasks occupying that position across all jobs and derives
//! a bound that holds for every feasible schedule, without looking at any
//! particular schedule.
//!
//! # Reference
//! Baptiste, Le Pape & Nuijten (2001), "Constraint-Based Scheduling", Ch. 3

use super::config::{LowerBoundMode, ResourcePolicy};
use super::demand::{DemandLookup, Demands};
use super::error::{FjspError, Result};
use super::instance::{Instance, MachineId};
use crate::cp::{CpModel, IntVarId};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate workload of one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseStats {
    /// Task position within a job, 0-based.
    pub phase: usize,
    /// Shortest alternative of any task at this phase.
    pub min_duration: i64,
    /// Sum of every alternative's duration at this phase.
    pub total_energy: i64,
    /// Distinct machines able to run some alternative at this phase.
    pub machine_count: usize,
    /// Sum over the tasks at this phase of their shortest alternative.
    pub min_work: i64,
    /// Tasks at this phase that can run simultaneously.
    pub slots: i64,
    /// Σ `min_duration` over earlier phases.
    pub head: i64,
    /// Least work any job still has after this phase.
    pub tail: i64,
}

impl PhaseStats {
    /// `⌊total_energy / machine_count⌋`, `None` without machines.
    pub fn min_energetic_duration(&self) -> Option<i64> {
        i64::try_from(self.machine_count)
            .ok()
            .and_then(|count| self.total_energy.checked_div(count))
    }

    /// Bound of this phase under `mode`; `sum_min_durations` is Σ
    /// `min_duration` over all phases. `Ok(None)` when cuts are disabled.
    ///
    /// Stats without an eligible machine or parallel slot are rejected.
    pub fn bound(&self, mode: LowerBoundMode, sum_min_durations: i64) -> Result<Option<i64>> {
        let degenerate = FjspError::NoEligibleMachine { phase: self.phase };
        match mode {
            LowerBoundMode::Disabled => Ok(None),
            _ if self.machine_count == 0 || self.slots <= 0 => Err(degenerate),
            LowerBoundMode::Reference => self
                .min_energetic_duration()
                .map(|energetic| Some(sum_min_durations - self.min_duration + energetic))
                .ok_or(degenerate),
            LowerBoundMode::Sound => {
                let energetic = (self.min_work + self.slots - 1) / self.slots;
                Ok(Some(self.head + energetic.max(self.min_duration) + self.tail))
            }
        }
    }
}

/// A makespan cut: `makespan >= bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseBound {
    pub phase: usize,
    pub bound: i64,
}

/// Per-phase workload statistics of an instance.
///
/// `policy` decides how many tasks a machine can run at once: one when it
/// receives a no-overlap constraint, otherwise as many as its capacity
/// admits given the smallest demand placed on it.
pub fn phase_stats<D>(
    instance: &Instance,
    demand: &D,
    policy: ResourcePolicy,
) -> Result<Vec<PhaseStats>>
where
    D: DemandLookup + ?Sized,
{
    instance.validate()?;
    let demands = Demands::resolve(instance, demand)?;
    collect(instance, &demands, policy)
}

/// Cuts of every phase under `mode`, in phase order.
///
/// Fails with [`FjspError::NoEligibleMachine`] on the first phase whose
/// stats leave nothing to divide the work by.
pub fn energetic_bounds(stats: &[PhaseStats], mode: LowerBoundMode) -> Result<Vec<PhaseBound>> {
    let sum_min_durations: i64 = stats.iter().map(|s| s.min_duration).sum();
    let mut bounds = Vec::with_capacity(stats.len());
    for s in stats {
        if let Some(bound) = s.bound(mode, sum_min_durations)? {
            bounds.push(PhaseBound {
                phase: s.phase,
                bound,
            });
        }
    }
    Ok(bounds)
}

/// Per-machine usage at one phase.
#[derive(Debug, Clone, Copy)]
struct PhaseMachine {
    tasks: i64,
    min_demand: i64,
}

pub(crate) fn collect(
    instance: &Instance,
    demands: &Demands,
    policy: ResourcePolicy,
) -> Result<Vec<PhaseStats>> {
    let phases = instance.max_job_length();
    let mut stats = Vec::with_capacity(phases);
    let mut head = 0;

    for p in 0..phases {
        let mut min_duration = i64::MAX;
        let mut total_energy = 0;
        let mut min_work = 0;
        let mut tail = i64::MAX;
        let mut machines: BTreeMap<MachineId, PhaseMachine> = BTreeMap::new();

        for (j, job) in instance.jobs.iter().enumerate() {
            let Some(task) = job.tasks.get(p) else {
                continue;
            };
            min_duration = min_duration.min(task.min_duration());
            min_work += task.min_duration();
            tail = tail.min(job.tasks[p + 1..].iter().map(|t| t.min_duration()).sum::<i64>());

            let mut seen: Vec<MachineId> = Vec::with_capacity(task.alternatives.len());
            for (a, alt) in task.alternatives.iter().enumerate() {
                total_energy += alt.duration;
                let demand = demands.get(j, p, a);
                let entry = machines.entry(alt.machine).or_insert(PhaseMachine {
                    tasks: 0,
                    min_demand: demand,
                });
                entry.min_demand = entry.min_demand.min(demand);
                if !seen.contains(&alt.machine) {
                    seen.push(alt.machine);
                    entry.tasks += 1;
                }
            }
        }

        if machines.is_empty() {
            return Err(FjspError::NoEligibleMachine { phase: p });
        }

        let slots: i64 = machines
            .iter()
            .map(|(&machine, usage)| {
                let capacity = instance.capacity(machine).unwrap_or(1);
                if policy.no_overlap(capacity) {
                    1
                } else if usage.min_demand == 0 {
                    usage.tasks
                } else {
                    (capacity / usage.min_demand).clamp(1, usage.tasks.max(1))
                }
            })
            .sum();

        stats.push(PhaseStats {
            phase: p,
            min_duration,
            total_energy,
            machine_count: machines.len(),
            min_work,
            slots,
            head,
            tail,
        });
        head += min_duration;
    }

    Ok(stats)
}

/// Asserts `makespan >= bound` for every cut.
pub(crate) fn add_cuts(model: &mut CpModel, makespan: IntVarId, bounds: &[PhaseBound]) {
    let horizon = model.horizon();
    for cut in bounds {
        debug!(phase = cut.phase, bound = cut.bound, "adding energetic lower bound");
        if cut.bound > horizon {
            warn!(
                phase = cut.phase,
                bound = cut.bound,
                horizon,
                "energetic lower bound exceeds the horizon; model is infeasible"
            );
        }
        model.add_greater_or_equal(makespan, cut.bound);
    }
}
