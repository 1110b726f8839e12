//! Seeded random instances for benchmarks and property tests.

use super::instance::{Alternative, Instance, Job, MachineId, Task};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of a random flexible job shop.
///
/// Every `(min, max)` pair is an inclusive range. Alternatives of one task
/// always use distinct machines.
///
/// # Examples
///
/// ```
/// use u_fjsp::fjsp::InstanceGenerator;
///
/// let gen = InstanceGenerator::default()
///     .with_jobs(4)
///     .with_machines(3)
///     .with_seed(7);
/// let instance = gen.generate();
/// assert_eq!(instance.job_count(), 4);
/// assert!(instance.validate().is_ok());
/// assert_eq!(instance, gen.generate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InstanceGenerator {
    pub jobs: usize,
    pub machines: usize,
    pub tasks_per_job: (usize, usize),
    pub alternatives_per_task: (usize, usize),
    pub durations: (i64, i64),
    pub capacities: (i64, i64),
    pub seed: u64,
}

impl Default for InstanceGenerator {
    fn default() -> Self {
        Self {
            jobs: 10,
            machines: 5,
            tasks_per_job: (3, 6),
            alternatives_per_task: (1, 3),
            durations: (1, 20),
            capacities: (1, 1),
            seed: 42,
        }
    }
}

impl InstanceGenerator {
    pub fn with_jobs(mut self, n: usize) -> Self {
        self.jobs = n;
        self
    }

    pub fn with_machines(mut self, n: usize) -> Self {
        self.machines = n;
        self
    }

    pub fn with_tasks_per_job(mut self, min: usize, max: usize) -> Self {
        self.tasks_per_job = (min, max);
        self
    }

    pub fn with_alternatives_per_task(mut self, min: usize, max: usize) -> Self {
        self.alternatives_per_task = (min, max);
        self
    }

    pub fn with_durations(mut self, min: i64, max: i64) -> Self {
        self.durations = (min, max);
        self
    }

    pub fn with_capacities(mut self, min: i64, max: i64) -> Self {
        self.capacities = (min, max);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Draws an instance. The same parameters always give the same instance.
    ///
    /// Ranges are normalized first: bounds are swapped when reversed, at
    /// least one machine, task and alternative is drawn, and capacities
    /// start at 1.
    pub fn generate(&self) -> Instance {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let machines = self.machines.max(1);
        let tasks = ordered(self.tasks_per_job, 1);
        let alternatives = ordered(self.alternatives_per_task, 1);
        let alternatives = (alternatives.0.min(machines), alternatives.1.min(machines));
        let durations = ordered(self.durations, 0);
        let capacities = ordered(self.capacities, 1);

        let mut instance = Instance::new();
        for m in 0..machines {
            instance
                .capacities
                .insert(MachineId(m), rng.random_range(capacities.0..=capacities.1));
        }

        for _ in 0..self.jobs {
            let mut job = Job::new();
            for _ in 0..rng.random_range(tasks.0..=tasks.1) {
                let count = rng.random_range(alternatives.0..=alternatives.1);
                let alternatives = rand::seq::index::sample(&mut rng, machines, count)
                    .iter()
                    .map(|m| Alternative::new(rng.random_range(durations.0..=durations.1), m))
                    .collect::<Vec<_>>();
                job = job.with_task(Task { alternatives });
            }
            instance = instance.with_job(job);
        }

        instance
    }
}

/// `(lo, hi)` with `lo <= hi` and `lo >= floor`.
fn ordered<T: Ord + Copy>(range: (T, T), floor: T) -> (T, T) {
    let lo = range.0.min(range.1).max(floor);
    let hi = range.0.max(range.1).max(lo);
    (lo, hi)
}
