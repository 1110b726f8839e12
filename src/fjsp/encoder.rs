//! Constraint encoder: precedence, alternative selection, optional
//! intervals and per-machine resource constraints.

use super::config::ResourcePolicy;
use super::demand::Demands;
use super::instance::{Instance, MachineId};
use super::variables::Variables;
use crate::cp::{CpModel, IntervalId, IntervalVar};
use std::collections::BTreeMap;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Optional intervals that may run on one machine, with their demands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineLoad {
    /// Intervals in job/task/alternative order.
    pub intervals: Vec<IntervalId>,
    /// Demand of each interval (parallel to `intervals`).
    pub demands: Vec<i64>,
}

impl MachineLoad {
    fn push(&mut self, interval: IntervalId, demand: i64) {
        self.intervals.push(interval);
        self.demands.push(demand);
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Largest demand on the machine, 0 when empty.
    pub fn max_demand(&self) -> i64 {
        self.demands.iter().copied().max().unwrap_or(0)
    }
}

/// Result of encoding: interval handles and the per-machine aggregation.
#[derive(Debug, Clone)]
pub(crate) struct Encoding {
    /// `[job][task][alternative]`.
    pub(crate) intervals: Vec<Vec<Vec<IntervalId>>>,
    pub(crate) loads: BTreeMap<MachineId, MachineLoad>,
}

/// Adds every structural constraint of the instance to `model`.
pub(crate) fn encode(
    model: &mut CpModel,
    instance: &Instance,
    vars: &Variables,
    demands: &Demands,
    policy: ResourcePolicy,
) -> Encoding {
    let mut intervals = Vec::with_capacity(instance.jobs.len());
    let mut loads: BTreeMap<MachineId, MachineLoad> = BTreeMap::new();

    for (j, job) in instance.jobs.iter().enumerate() {
        let mut job_intervals = Vec::with_capacity(job.tasks.len());

        for (t, task) in job.tasks.iter().enumerate() {
            let tv = vars.tasks[j][t];

            if t > 0 {
                model.add_precedence(vars.tasks[j][t - 1].end, tv.start);
            }
            model.add_span(tv.start, tv.duration, tv.end);

            let mut task_intervals = Vec::with_capacity(task.alternatives.len());
            for (a, alt) in task.alternatives.iter().enumerate() {
                let presence = vars.presences[j][t][a];
                let interval = model.add_interval(
                    IntervalVar::new(
                        format!("interval_j{j}_t{t}_a{a}"),
                        tv.start,
                        alt.duration,
                        tv.end,
                    )
                    .as_optional(presence),
                );
                loads
                    .entry(alt.machine)
                    .or_default()
                    .push(interval, demands.get(j, t, a));
                task_intervals.push(interval);
            }

            model.add_exactly_one(vars.presences[j][t].clone());
            job_intervals.push(task_intervals);
        }

        intervals.push(job_intervals);
    }

    for (&machine, load) in &loads {
        // Machines are validated before encoding.
        let capacity = instance.capacity(machine).unwrap_or(1);
        let max_demand = load.max_demand();
        if load.len() < 2 && max_demand <= capacity {
            continue;
        }

        let no_overlap = load.len() >= 2 && policy.no_overlap(capacity);
        let cumulative = policy.cumulative(capacity, max_demand);
        if no_overlap {
            model.add_no_overlap(load.intervals.clone());
        }
        if cumulative {
            model.add_cumulative(load.intervals.clone(), load.demands.clone(), capacity);
        }
        debug!(
            machine = %machine,
            intervals = load.len(),
            capacity,
            max_demand,
            no_overlap,
            cumulative,
            "resource constraints added"
        );
    }

    Encoding { intervals, loads }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::Constraint;
    use crate::fjsp::demand::DemandTable;

    fn encode_with(instance: &Instance, policy: ResourcePolicy) -> (CpModel, Variables, Encoding) {
        let mut model = CpModel::new("enc", 50);
        let vars = Variables::create(&mut model, instance, 50);
        let demands = Demands::resolve(instance, &DemandTable::new(1)).unwrap();
        let enc = encode(&mut model, instance, &vars, &demands, policy);
        (model, vars, enc)
    }

    fn count(model: &CpModel, pred: impl Fn(&Constraint) -> bool) -> usize {
        model.constraints().iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn test_precedence_chain() {
        let inst = Instance::from_raw(&[vec![vec![(1, 0)], vec![(2, 0)], vec![(3, 0)]]], [(0, 1)]);
        let (model, vars, _) = encode_with(&inst, ResourcePolicy::ByCapacity);

        let precedences: Vec<_> = model
            .constraints()
            .iter()
            .filter_map(|c| match c {
                Constraint::Precedence { before, after } => Some((*before, *after)),
                _ => None,
            })
            .collect();
        let tasks = &vars.tasks[0];
        assert_eq!(
            precedences,
            vec![(tasks[0].end, tasks[1].start), (tasks[1].end, tasks[2].start)]
        );
    }

    #[test]
    fn test_first_task_unconstrained() {
        let inst = Instance::from_raw(&[vec![vec![(1, 0)]], vec![vec![(1, 1)]]], [(0, 1), (1, 1)]);
        let (model, _, _) = encode_with(&inst, ResourcePolicy::ByCapacity);
        assert_eq!(count(&model, |c| matches!(c, Constraint::Precedence { .. })), 0);
    }

    #[test]
    fn test_exactly_one_per_task() {
        let inst = Instance::from_raw(&[vec![vec![(1, 0), (2, 1), (3, 2)], vec![(1, 1)]]], [(0, 1), (1, 1), (2, 1)]);
        let (model, vars, _) = encode_with(&inst, ResourcePolicy::ByCapacity);

        let groups: Vec<_> = model
            .constraints()
            .iter()
            .filter_map(|c| match c {
                Constraint::ExactlyOne { literals } => Some(literals.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(groups, vec![vars.presences[0][0].clone(), vars.presences[0][1].clone()]);
    }

    #[test]
    fn test_optional_intervals() {
        let inst = Instance::from_raw(&[vec![vec![(5, 0), (2, 1)]]], [(0, 1), (1, 1)]);
        let (model, vars, enc) = encode_with(&inst, ResourcePolicy::ByCapacity);

        assert_eq!(model.interval_count(), 2);
        let fast = model.interval(enc.intervals[0][0][1]).unwrap();
        assert_eq!(fast.name, "interval_j0_t0_a1");
        assert_eq!(fast.size, 2);
        assert_eq!(fast.start, vars.tasks[0][0].start);
        assert_eq!(fast.end, vars.tasks[0][0].end);
        assert_eq!(fast.presence, Some(vars.presences[0][0][1]));
    }

    #[test]
    fn test_single_interval_machines_skipped() {
        let inst = Instance::from_raw(&[vec![vec![(5, 0), (2, 1)]]], [(0, 1), (1, 1)]);
        let (model, _, enc) = encode_with(&inst, ResourcePolicy::Redundant);

        assert_eq!(enc.loads.len(), 2);
        assert_eq!(count(&model, |c| matches!(c, Constraint::NoOverlap { .. })), 0);
        assert_eq!(count(&model, |c| matches!(c, Constraint::Cumulative { .. })), 0);
    }

    fn shared_machines() -> Instance {
        // Machine 0 is single-slot, machine 1 holds two units.
        Instance::from_raw(
            &[
                vec![vec![(2, 0)], vec![(3, 1)]],
                vec![vec![(4, 0), (1, 1)]],
            ],
            [(0, 1), (1, 2)],
        )
    }

    #[test]
    fn test_by_capacity_policy() {
        let (model, _, enc) = encode_with(&shared_machines(), ResourcePolicy::ByCapacity);

        let load0 = &enc.loads[&MachineId(0)];
        let load1 = &enc.loads[&MachineId(1)];
        assert_eq!(load0.len(), 2);
        assert_eq!(load1.len(), 2);

        assert!(model
            .constraints()
            .contains(&Constraint::NoOverlap { intervals: load0.intervals.clone() }));
        assert!(model.constraints().contains(&Constraint::Cumulative {
            intervals: load1.intervals.clone(),
            demands: vec![1, 1],
            capacity: 2,
        }));
        assert_eq!(count(&model, |c| matches!(c, Constraint::NoOverlap { .. })), 1);
        assert_eq!(count(&model, |c| matches!(c, Constraint::Cumulative { .. })), 1);
    }

    #[test]
    fn test_heavy_demand_on_single_slot_machine() {
        let inst = Instance::from_raw(&[vec![vec![(2, 0)]], vec![vec![(3, 0)]]], [(0, 1)]);
        let mut model = CpModel::new("enc", 50);
        let vars = Variables::create(&mut model, &inst, 50);
        let demands = Demands::resolve(&inst, &DemandTable::new(2)).unwrap();
        let enc = encode(&mut model, &inst, &vars, &demands, ResourcePolicy::ByCapacity);

        assert!(model.constraints().contains(&Constraint::Cumulative {
            intervals: enc.loads[&MachineId(0)].intervals.clone(),
            demands: vec![2, 2],
            capacity: 1,
        }));
        assert_eq!(count(&model, |c| matches!(c, Constraint::NoOverlap { .. })), 1);
    }

    #[test]
    fn test_oversized_single_interval_constrained() {
        let inst = Instance::from_raw(&[vec![vec![(2, 0), (4, 1)]]], [(0, 1), (1, 1)]);
        let mut model = CpModel::new("enc", 50);
        let vars = Variables::create(&mut model, &inst, 50);
        let demands = Demands::resolve(&inst, &DemandTable::new(1).with_demand(0, 0, 0, 3)).unwrap();
        encode(&mut model, &inst, &vars, &demands, ResourcePolicy::Redundant);

        // Only machine 0 sees a demand above its capacity.
        assert_eq!(count(&model, |c| matches!(c, Constraint::Cumulative { .. })), 1);
        assert_eq!(count(&model, |c| matches!(c, Constraint::NoOverlap { .. })), 0);
    }

    #[test]
    fn test_redundant_policy() {
        let (model, _, _) = encode_with(&shared_machines(), ResourcePolicy::Redundant);
        assert_eq!(count(&model, |c| matches!(c, Constraint::NoOverlap { .. })), 2);
        assert_eq!(count(&model, |c| matches!(c, Constraint::Cumulative { .. })), 2);
    }

    #[test]
    fn test_cumulative_only_policy() {
        let (model, _, _) = encode_with(&shared_machines(), ResourcePolicy::CumulativeOnly);
        assert_eq!(count(&model, |c| matches!(c, Constraint::NoOverlap { .. })), 0);
        assert_eq!(count(&model, |c| matches!(c, Constraint::Cumulative { .. })), 2);
    }

    #[test]
    fn test_encoded_model_is_valid() {
        let (model, _, _) = encode_with(&shared_machines(), ResourcePolicy::Redundant);
        assert!(model.validate().is_ok());
    }
}
