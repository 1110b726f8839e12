//! Exhaustive search over tiny models, used to cross-check the formulation.
//!
//! Every task start is enumerated from its job predecessor's end up to the
//! horizon, every alternative is tried, and each complete assignment is
//! checked against the CP model itself. Exponential; keep instances small.

use super::builder::FjspModel;
use crate::cp::{CpSolution, SolverStatus};

/// Smallest makespan over all assignments the model accepts, with one
/// assignment reaching it.
pub(crate) fn optimum(fjsp: &FjspModel) -> Option<(i64, CpSolution)> {
    let tasks: Vec<(usize, usize)> = (0..fjsp.job_count())
        .flat_map(|j| (0..fjsp.task_count(j)).map(move |t| (j, t)))
        .collect();
    let mut search = Search {
        fjsp,
        chosen: vec![(0, 0, 0); tasks.len()],
        tasks,
        best: None,
    };
    search.descend(0);
    search.best.map(|(makespan, mut solution)| {
        solution.status = SolverStatus::Optimal;
        (makespan, solution)
    })
}

struct Search<'a> {
    fjsp: &'a FjspModel,
    /// `(job, task)` in job-major order.
    tasks: Vec<(usize, usize)>,
    /// `(alternative, start, end)` per entry of `tasks`.
    chosen: Vec<(usize, i64, i64)>,
    best: Option<(i64, CpSolution)>,
}

impl Search<'_> {
    fn best_makespan(&self) -> i64 {
        self.best.as_ref().map_or(i64::MAX, |(m, _)| *m)
    }

    fn descend(&mut self, depth: usize) {
        if depth == self.tasks.len() {
            self.evaluate();
            return;
        }

        let (j, t) = self.tasks[depth];
        let earliest = if t == 0 { 0 } else { self.chosen[depth - 1].2 };
        let horizon = self.fjsp.horizon();

        for a in 0..self.fjsp.alternative_count(j, t) {
            let Some(size) = self
                .fjsp
                .interval(j, t, a)
                .and_then(|id| self.fjsp.cp_model().interval(id))
                .map(|iv| iv.size)
            else {
                continue;
            };
            for start in earliest..=horizon - size {
                let end = start + size;
                if end >= self.best_makespan() {
                    break;
                }
                self.chosen[depth] = (a, start, end);
                self.descend(depth + 1);
            }
        }
    }

    fn evaluate(&mut self) {
        let mut solution = CpSolution::empty(SolverStatus::Feasible);
        let mut makespan = 0;

        for (&(j, t), &(choice, start, end)) in self.tasks.iter().zip(&self.chosen) {
            let Some(tv) = self.fjsp.task_vars(j, t) else {
                return;
            };
            solution.set_int(tv.start, start);
            solution.set_int(tv.duration, end - start);
            solution.set_int(tv.end, end);
            for a in 0..self.fjsp.alternative_count(j, t) {
                if let Some(lit) = self.fjsp.presence(j, t, a) {
                    solution.set_bool(lit, a == choice);
                }
            }
            if t + 1 == self.fjsp.task_count(j) {
                makespan = makespan.max(end);
            }
        }
        solution.set_int(self.fjsp.makespan(), makespan);
        solution.objective_value = Some(makespan);

        if makespan < self.best_makespan() && self.fjsp.cp_model().check(&solution).is_ok() {
            self.best = Some((makespan, solution));
        }
    }
}

mod tests {
    use super::*;
    use crate::fjsp::builder::{build_model, FjspModelBuilder};
    use crate::fjsp::config::{BuildConfig, LowerBoundMode, ResourcePolicy};
    use crate::fjsp::demand::UnitDemand;
    use crate::fjsp::generator::InstanceGenerator;
    use proptest::prelude::*;

    fn tiny(seed: u64) -> InstanceGenerator {
        InstanceGenerator::default()
            .with_jobs(2)
            .with_machines(2)
            .with_tasks_per_job(1, 2)
            .with_alternatives_per_task(1, 2)
            .with_durations(1, 3)
            .with_capacities(1, 2)
            .with_seed(seed)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(12))]

        #[test]
        fn sound_bounds_never_exceed_optimum(seed in any::<u64>()) {
            let instance = tiny(seed).generate();
            let unbounded = FjspModelBuilder::new(&instance, &UnitDemand)
                .with_config(BuildConfig::default().with_lower_bounds(LowerBoundMode::Disabled))
                .build()
                .unwrap();
            let bounded = build_model(&instance, &UnitDemand).unwrap();

            let (free, _) = optimum(&unbounded).unwrap();
            prop_assert!(bounded.lower_bound() <= free);
            // The cuts remove no optimal schedule.
            prop_assert_eq!(optimum(&bounded).map(|(m, _)| m), Some(free));
        }

        #[test]
        fn sound_bounds_hold_under_random_demands(
            seed in any::<u64>(),
            table in proptest::collection::vec(0i64..=3, 8),
            policy in prop_oneof![
                Just(ResourcePolicy::ByCapacity),
                Just(ResourcePolicy::Redundant),
                Just(ResourcePolicy::CumulativeOnly),
            ],
        ) {
            let instance = tiny(seed).with_capacities(1, 3).generate();
            // At most 2 jobs x 2 tasks x 2 alternatives.
            let demand = |j: usize, t: usize, a: usize| table[j * 4 + t * 2 + a];
            let config = BuildConfig::default().with_resource_policy(policy);
            let unbounded = FjspModelBuilder::new(&instance, &demand)
                .with_config(config.clone().with_lower_bounds(LowerBoundMode::Disabled))
                .build()
                .unwrap();
            let bounded = FjspModelBuilder::new(&instance, &demand)
                .with_config(config)
                .build()
                .unwrap();

            let free = optimum(&unbounded);
            prop_assert_eq!(
                optimum(&bounded).map(|(m, _)| m),
                free.as_ref().map(|(m, _)| *m)
            );

            if let Some((makespan, solution)) = free {
                prop_assert!(bounded.lower_bound() <= makespan);

                let model = unbounded.cp_model();
                for (&machine, load) in unbounded.machine_loads() {
                    let capacity = instance.capacity(machine).unwrap();
                    let mut placed = Vec::new();
                    for (&id, &d) in load.intervals.iter().zip(&load.demands) {
                        let iv = model.interval(id).unwrap();
                        if solution.bool_value(iv.presence.unwrap()) != Some(true) {
                            continue;
                        }
                        let start = solution.int_value(iv.start).unwrap();
                        let end = solution.int_value(iv.end).unwrap();
                        if end > start {
                            placed.push((start, end, d));
                        }
                    }
                    for &(at, _, _) in &placed {
                        let used: i64 = placed
                            .iter()
                            .filter(|&&(s, e, _)| s <= at && at < e)
                            .map(|&(_, _, d)| d)
                            .sum();
                        prop_assert!(used <= capacity, "{} loaded {} > {}", machine, used, capacity);
                    }
                }
            }
        }

        #[test]
        fn optimal_assignment_satisfies_invariants(seed in any::<u64>()) {
            let instance = tiny(seed).generate();
            let fjsp = build_model(&instance, &UnitDemand).unwrap();
            let (makespan, solution) = optimum(&fjsp).unwrap();

            let mut last_ends = Vec::new();
            for j in 0..fjsp.job_count() {
                for t in 0..fjsp.task_count(j) {
                    let chosen = (0..fjsp.alternative_count(j, t))
                        .filter(|&a| solution.bool_value(fjsp.presence(j, t, a).unwrap()) == Some(true))
                        .count();
                    prop_assert_eq!(chosen, 1);
                    if t > 0 {
                        let prev = fjsp.task_vars(j, t - 1).unwrap();
                        let next = fjsp.task_vars(j, t).unwrap();
                        prop_assert!(solution.int_value(next.start) >= solution.int_value(prev.end));
                    }
                }
                let last = fjsp.task_vars(j, fjsp.task_count(j) - 1).unwrap();
                last_ends.push(solution.int_value(last.end).unwrap());
            }
            prop_assert_eq!(last_ends.into_iter().max(), Some(makespan));
            prop_assert!(makespan <= fjsp.horizon());
        }

        #[test]
        fn generated_models_are_consistent(seed in any::<u64>(), redundant in any::<bool>()) {
            let instance = InstanceGenerator::default()
                .with_capacities(1, 3)
                .with_seed(seed)
                .generate();
            let policy = if redundant { ResourcePolicy::Redundant } else { ResourcePolicy::ByCapacity };
            let fjsp = FjspModelBuilder::new(&instance, &UnitDemand)
                .with_config(BuildConfig::default().with_resource_policy(policy))
                .build()
                .unwrap();

            let tasks = instance.task_count();
            let alternatives = instance.alternatives().count();
            let model = fjsp.cp_model();
            prop_assert_eq!(model.int_var_count(), 3 * tasks + 1);
            prop_assert_eq!(model.bool_var_count(), alternatives);
            prop_assert_eq!(model.interval_count(), alternatives);
            prop_assert_eq!(fjsp.phase_bounds().len(), instance.max_job_length());
            prop_assert!(model.validate().is_ok());
        }
    }
}
