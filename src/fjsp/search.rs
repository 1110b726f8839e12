//! Branching hint over task start times.

use super::config::SearchHint;
use super::variables::Variables;
use crate::cp::CpModel;

/// Attaches `hint` to every task start, in job-major order.
pub(crate) fn attach(model: &mut CpModel, vars: &Variables, hint: SearchHint) {
    model.add_decision_strategy(vars.starts(), hint.variable_selection, hint.value_selection);
}
