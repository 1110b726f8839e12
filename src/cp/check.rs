//! Verification of a complete assignment against a model.
//!
//! Cumulative usage is evaluated per time point: the resource profile only
//! changes where an active interval starts, so the load is summed at each
//! such point.

use super::model::{Constraint, CpModel, Objective};
use super::solver::CpSolution;
use super::variables::{BoolVarId, IntVarId, IntervalId};
use thiserror::Error;

/// The first broken condition found in an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("integer variable {0} has no value")]
    UnassignedInt(IntVarId),

    #[error("boolean variable {0} has no value")]
    UnassignedBool(BoolVarId),

    #[error("{var} = {value} lies outside [{min}, {max}]")]
    OutOfDomain {
        var: IntVarId,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{interval} is present but spans [{start}, {end}) instead of size {size}")]
    IntervalSize {
        interval: IntervalId,
        start: i64,
        end: i64,
        size: i64,
    },

    #[error("precedence {before} = {before_value} > {after} = {after_value}")]
    Precedence {
        before: IntVarId,
        before_value: i64,
        after: IntVarId,
        after_value: i64,
    },

    #[error("span: {end} = {end_value} but start + duration = {expected}")]
    Span {
        end: IntVarId,
        end_value: i64,
        expected: i64,
    },

    #[error("exactly-one: {count} literals are true")]
    ExactlyOne { count: usize },

    #[error("{first} and {second} overlap")]
    Overlap { first: IntervalId, second: IntervalId },

    #[error("load {load} exceeds capacity {capacity} at time {time}")]
    CapacityExceeded { time: i64, load: i64, capacity: i64 },

    #[error("{target} = {actual} but the maximum of its operands is {expected}")]
    MaxEquality {
        target: IntVarId,
        actual: i64,
        expected: i64,
    },

    #[error("{var} = {value} is below the bound {bound}")]
    BelowBound { var: IntVarId, value: i64, bound: i64 },
}

/// Placement of one active interval.
#[derive(Debug, Clone, Copy)]
struct Placement {
    id: IntervalId,
    start: i64,
    end: i64,
}

impl CpModel {
    /// Verifies that `solution` assigns every variable and satisfies every
    /// domain, interval and constraint of this model.
    ///
    /// The solution status is not consulted.
    pub fn check(&self, solution: &CpSolution) -> Result<(), Violation> {
        for (id, var) in self.int_vars() {
            let value = int(solution, id)?;
            if !var.contains(value) {
                return Err(Violation::OutOfDomain {
                    var: id,
                    value,
                    min: var.min,
                    max: var.max,
                });
            }
        }
        for (id, _) in self.bool_vars() {
            boolean(solution, id)?;
        }

        for (id, _) in self.intervals() {
            if let Some(p) = self.placement(solution, id)? {
                let size = p.end - p.start;
                let expected = self.interval(id).map_or(size, |iv| iv.size);
                if size != expected {
                    return Err(Violation::IntervalSize {
                        interval: id,
                        start: p.start,
                        end: p.end,
                        size: expected,
                    });
                }
            }
        }

        for constraint in self.constraints() {
            self.check_constraint(constraint, solution)?;
        }

        Ok(())
    }

    /// Evaluates the objective under `solution`.
    pub fn objective_value(&self, solution: &CpSolution) -> Option<i64> {
        match self.objective()? {
            Objective::Minimize(var) | Objective::Maximize(var) => solution.int_value(var),
        }
    }

    fn check_constraint(
        &self,
        constraint: &Constraint,
        solution: &CpSolution,
    ) -> Result<(), Violation> {
        match constraint {
            Constraint::Precedence { before, after } => {
                let before_value = int(solution, *before)?;
                let after_value = int(solution, *after)?;
                if after_value < before_value {
                    return Err(Violation::Precedence {
                        before: *before,
                        before_value,
                        after: *after,
                        after_value,
                    });
                }
            }
            Constraint::Span {
                start,
                duration,
                end,
            } => {
                let expected = int(solution, *start)? + int(solution, *duration)?;
                let end_value = int(solution, *end)?;
                if end_value != expected {
                    return Err(Violation::Span {
                        end: *end,
                        end_value,
                        expected,
                    });
                }
            }
            Constraint::ExactlyOne { literals } => {
                let mut count = 0;
                for &lit in literals {
                    if boolean(solution, lit)? {
                        count += 1;
                    }
                }
                if count != 1 {
                    return Err(Violation::ExactlyOne { count });
                }
            }
            Constraint::NoOverlap { intervals } => {
                let mut active = Vec::with_capacity(intervals.len());
                for &id in intervals {
                    if let Some(p) = self.placement(solution, id)? {
                        // Zero-length intervals occupy no time.
                        if p.end > p.start {
                            active.push(p);
                        }
                    }
                }
                for (i, a) in active.iter().enumerate() {
                    for b in &active[i + 1..] {
                        if a.start < b.end && b.start < a.end {
                            return Err(Violation::Overlap {
                                first: a.id,
                                second: b.id,
                            });
                        }
                    }
                }
            }
            Constraint::Cumulative {
                intervals,
                demands,
                capacity,
            } => {
                let mut active = Vec::with_capacity(intervals.len());
                for (&id, &demand) in intervals.iter().zip(demands) {
                    if let Some(p) = self.placement(solution, id)? {
                        if p.end > p.start {
                            active.push((p, demand));
                        }
                    }
                }
                for &(at, _) in &active {
                    let time = at.start;
                    let load: i64 = active
                        .iter()
                        .filter(|(p, _)| p.start <= time && time < p.end)
                        .map(|&(_, d)| d)
                        .sum();
                    if load > *capacity {
                        return Err(Violation::CapacityExceeded {
                            time,
                            load,
                            capacity: *capacity,
                        });
                    }
                }
            }
            Constraint::MaxEquality { target, operands } => {
                let actual = int(solution, *target)?;
                let mut expected = i64::MIN;
                for &op in operands {
                    expected = expected.max(int(solution, op)?);
                }
                if !operands.is_empty() && actual != expected {
                    return Err(Violation::MaxEquality {
                        target: *target,
                        actual,
                        expected,
                    });
                }
            }
            Constraint::GreaterOrEqual { var, bound } => {
                let value = int(solution, *var)?;
                if value < *bound {
                    return Err(Violation::BelowBound {
                        var: *var,
                        value,
                        bound: *bound,
                    });
                }
            }
        }
        Ok(())
    }

    /// Start/end of an interval, or `None` when it is absent.
    fn placement(
        &self,
        solution: &CpSolution,
        id: IntervalId,
    ) -> Result<Option<Placement>, Violation> {
        let Some(interval) = self.interval(id) else {
            return Ok(None);
        };
        if let Some(presence) = interval.presence {
            if !boolean(solution, presence)? {
                return Ok(None);
            }
        }
        Ok(Some(Placement {
            id,
            start: int(solution, interval.start)?,
            end: int(solution, interval.end)?,
        }))
    }
}

fn int(solution: &CpSolution, id: IntVarId) -> Result<i64, Violation> {
    solution.int_value(id).ok_or(Violation::UnassignedInt(id))
}

fn boolean(solution: &CpSolution, id: BoolVarId) -> Result<bool, Violation> {
    solution.bool_value(id).ok_or(Violation::UnassignedBool(id))
}
