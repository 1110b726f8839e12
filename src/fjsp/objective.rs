//! Makespan variable and objective.

use super::variables::Variables;
use crate::cp::{CpModel, IntVarId};

/// Registers `makespan = max(job ends)` and minimizes it.
///
/// Returns the makespan handle and the job-end handles in job order.
pub(crate) fn minimize_makespan(
    model: &mut CpModel,
    vars: &Variables,
    horizon: i64,
) -> (IntVarId, Vec<IntVarId>) {
    let job_ends = vars.job_ends();
    let makespan = model.new_int_var("makespan", 0, horizon);
    model.add_max_equality(makespan, job_ends.clone());
    model.minimize(makespan);
    (makespan, job_ends)
}
