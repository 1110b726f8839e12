//! CP model definition.

use super::variables::{BoolVar, BoolVarId, IntVar, IntVarId, IntervalId, IntervalVar};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A constraint in the CP model.
///
/// Constraints reference variables through the handles returned when the
/// variables were registered.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constraint {
    /// `after >= before`.
    Precedence {
        /// Variable that must not exceed `after`.
        before: IntVarId,
        /// Variable that must be at least `before`.
        after: IntVarId,
    },

    /// `end = start + duration`.
    Span {
        start: IntVarId,
        duration: IntVarId,
        end: IntVarId,
    },

    /// Exactly one of the literals is true.
    ExactlyOne {
        /// Literals of which exactly one holds.
        literals: Vec<BoolVarId>,
    },

    /// Non-overlapping intervals on a shared resource.
    ///
    /// No two active intervals in the set may overlap in time. Absent
    /// optional intervals are ignored.
    NoOverlap {
        /// Intervals that must not overlap.
        intervals: Vec<IntervalId>,
    },

    /// Cumulative resource constraint.
    ///
    /// At any point in time, the sum of demands of active intervals
    /// must not exceed the capacity.
    Cumulative {
        /// Intervals sharing the resource.
        intervals: Vec<IntervalId>,
        /// Demand of each interval (parallel to `intervals`).
        demands: Vec<i64>,
        /// Maximum capacity.
        capacity: i64,
    },

    /// `target = max(operands)`.
    MaxEquality {
        target: IntVarId,
        operands: Vec<IntVarId>,
    },

    /// `var >= bound`.
    GreaterOrEqual { var: IntVarId, bound: i64 },
}

/// Objective function for the CP model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Objective {
    /// Minimize a single integer variable.
    Minimize(IntVarId),
    /// Maximize a single integer variable.
    Maximize(IntVarId),
}

/// Which unassigned variable a solver should branch on next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VariableSelection {
    /// First unassigned variable in the listed order.
    InputOrder,
    /// Variable with the smallest lower bound.
    #[default]
    ChooseLowestMin,
    /// Variable with the largest upper bound.
    ChooseHighestMax,
    /// Variable with the smallest remaining domain.
    ChooseMinDomainSize,
}

/// Which value a solver should try first for the selected variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueSelection {
    /// Smallest value in the domain.
    #[default]
    SelectMinValue,
    /// Largest value in the domain.
    SelectMaxValue,
}

/// Advisory branching order for a solver.
///
/// A solver may ignore it; it never changes the set of feasible
/// solutions, only the order in which they are explored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecisionStrategy {
    /// Variables covered by this strategy.
    pub variables: Vec<IntVarId>,
    /// Variable ordering.
    pub variable_selection: VariableSelection,
    /// Value ordering.
    pub value_selection: ValueSelection,
}

/// Structural defect in a [`CpModel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("undefined integer variable: {0}")]
    UndefinedIntVar(IntVarId),

    #[error("undefined boolean variable: {0}")]
    UndefinedBoolVar(BoolVarId),

    #[error("undefined interval: {0}")]
    UndefinedInterval(IntervalId),

    #[error("variable '{name}' has an empty domain [{min}, {max}]")]
    EmptyDomain { name: String, min: i64, max: i64 },

    #[error("interval '{name}' has negative size {size}")]
    NegativeSize { name: String, size: i64 },

    #[error("cumulative: {intervals} intervals but {demands} demands")]
    CumulativeLengthMismatch { intervals: usize, demands: usize },

    #[error("cumulative: negative demand {0}")]
    NegativeDemand(i64),

    #[error("cumulative: negative capacity {0}")]
    NegativeCapacity(i64),
}

/// A constraint programming model.
///
/// Contains variables, constraints, an optional objective function and
/// search hints. Variables are registered through the `new_*` methods,
/// which hand back typed handles used by constraints.
///
/// # Examples
///
/// ```
/// use u_fjsp::cp::{CpModel, IntervalVar};
///
/// let mut model = CpModel::new("example", 100);
/// let s1 = model.new_int_var("s1", 0, 100);
/// let e1 = model.new_int_var("e1", 0, 100);
/// let s2 = model.new_int_var("s2", 0, 100);
/// let e2 = model.new_int_var("e2", 0, 100);
/// let op1 = model.add_interval(IntervalVar::new("op1", s1, 50, e1));
/// let op2 = model.add_interval(IntervalVar::new("op2", s2, 30, e2));
/// model.add_no_overlap(vec![op1, op2]);
/// model.minimize(e2);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CpModel {
    name: String,
    horizon: i64,
    int_vars: Vec<IntVar>,
    bool_vars: Vec<BoolVar>,
    intervals: Vec<IntervalVar>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
    decision_strategies: Vec<DecisionStrategy>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>, horizon: i64) -> Self {
        Self {
            name: name.into(),
            horizon,
            int_vars: Vec::new(),
            bool_vars: Vec::new(),
            intervals: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            decision_strategies: Vec::new(),
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Planning horizon (maximum time).
    pub fn horizon(&self) -> i64 {
        self.horizon
    }

    /// Registers an integer variable with domain [min, max].
    pub fn new_int_var(&mut self, name: impl Into<String>, min: i64, max: i64) -> IntVarId {
        self.int_vars.push(IntVar::new(name, min, max));
        IntVarId(self.int_vars.len() - 1)
    }

    /// Registers a boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> BoolVarId {
        self.bool_vars.push(BoolVar::new(name));
        BoolVarId(self.bool_vars.len() - 1)
    }

    /// Registers an interval variable.
    pub fn add_interval(&mut self, interval: IntervalVar) -> IntervalId {
        self.intervals.push(interval);
        IntervalId(self.intervals.len() - 1)
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: `after >= before`.
    pub fn add_precedence(&mut self, before: IntVarId, after: IntVarId) {
        self.add_constraint(Constraint::Precedence { before, after });
    }

    /// Convenience: `end = start + duration`.
    pub fn add_span(&mut self, start: IntVarId, duration: IntVarId, end: IntVarId) {
        self.add_constraint(Constraint::Span {
            start,
            duration,
            end,
        });
    }

    /// Convenience: exactly one literal holds.
    pub fn add_exactly_one(&mut self, literals: Vec<BoolVarId>) {
        self.add_constraint(Constraint::ExactlyOne { literals });
    }

    /// Convenience: add a no-overlap constraint.
    pub fn add_no_overlap(&mut self, intervals: Vec<IntervalId>) {
        self.add_constraint(Constraint::NoOverlap { intervals });
    }

    /// Convenience: add a cumulative constraint.
    pub fn add_cumulative(&mut self, intervals: Vec<IntervalId>, demands: Vec<i64>, capacity: i64) {
        self.add_constraint(Constraint::Cumulative {
            intervals,
            demands,
            capacity,
        });
    }

    /// Convenience: `target = max(operands)`.
    pub fn add_max_equality(&mut self, target: IntVarId, operands: Vec<IntVarId>) {
        self.add_constraint(Constraint::MaxEquality { target, operands });
    }

    /// Convenience: `var >= bound`.
    pub fn add_greater_or_equal(&mut self, var: IntVarId, bound: i64) {
        self.add_constraint(Constraint::GreaterOrEqual { var, bound });
    }

    /// Sets the objective to minimizing `var`.
    pub fn minimize(&mut self, var: IntVarId) {
        self.objective = Some(Objective::Minimize(var));
    }

    /// Sets the objective to maximizing `var`.
    pub fn maximize(&mut self, var: IntVarId) {
        self.objective = Some(Objective::Maximize(var));
    }

    /// Appends an advisory branching strategy.
    pub fn add_decision_strategy(
        &mut self,
        variables: Vec<IntVarId>,
        variable_selection: VariableSelection,
        value_selection: ValueSelection,
    ) {
        self.decision_strategies.push(DecisionStrategy {
            variables,
            variable_selection,
            value_selection,
        });
    }

    /// Returns an integer variable by handle.
    pub fn int_var(&self, id: IntVarId) -> Option<&IntVar> {
        self.int_vars.get(id.0)
    }

    /// Returns a boolean variable by handle.
    pub fn bool_var(&self, id: BoolVarId) -> Option<&BoolVar> {
        self.bool_vars.get(id.0)
    }

    /// Returns an interval by handle.
    pub fn interval(&self, id: IntervalId) -> Option<&IntervalVar> {
        self.intervals.get(id.0)
    }

    /// All integer variables with their handles.
    pub fn int_vars(&self) -> impl Iterator<Item = (IntVarId, &IntVar)> {
        self.int_vars.iter().enumerate().map(|(i, v)| (IntVarId(i), v))
    }

    /// All boolean variables with their handles.
    pub fn bool_vars(&self) -> impl Iterator<Item = (BoolVarId, &BoolVar)> {
        self.bool_vars.iter().enumerate().map(|(i, v)| (BoolVarId(i), v))
    }

    /// All intervals with their handles.
    pub fn intervals(&self) -> impl Iterator<Item = (IntervalId, &IntervalVar)> {
        self.intervals
            .iter()
            .enumerate()
            .map(|(i, v)| (IntervalId(i), v))
    }

    /// Constraints in insertion order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Objective function, if set.
    pub fn objective(&self) -> Option<Objective> {
        self.objective
    }

    /// Branching hints in insertion order.
    pub fn decision_strategies(&self) -> &[DecisionStrategy] {
        &self.decision_strategies
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced handle exists, that domains are
    /// non-empty and that interval sizes and cumulative data make sense.
    pub fn validate(&self) -> Result<(), ModelError> {
        for var in &self.int_vars {
            if var.min > var.max {
                return Err(ModelError::EmptyDomain {
                    name: var.name.clone(),
                    min: var.min,
                    max: var.max,
                });
            }
        }

        for interval in &self.intervals {
            self.require_int(interval.start)?;
            self.require_int(interval.end)?;
            if let Some(presence) = interval.presence {
                self.require_bool(presence)?;
            }
            if interval.size < 0 {
                return Err(ModelError::NegativeSize {
                    name: interval.name.clone(),
                    size: interval.size,
                });
            }
        }

        for constraint in &self.constraints {
            match constraint {
                Constraint::Precedence { before, after } => {
                    self.require_int(*before)?;
                    self.require_int(*after)?;
                }
                Constraint::Span {
                    start,
                    duration,
                    end,
                } => {
                    self.require_int(*start)?;
                    self.require_int(*duration)?;
                    self.require_int(*end)?;
                }
                Constraint::ExactlyOne { literals } => {
                    for &lit in literals {
                        self.require_bool(lit)?;
                    }
                }
                Constraint::NoOverlap { intervals } => {
                    for &id in intervals {
                        self.require_interval(id)?;
                    }
                }
                Constraint::Cumulative {
                    intervals,
                    demands,
                    capacity,
                } => {
                    if intervals.len() != demands.len() {
                        return Err(ModelError::CumulativeLengthMismatch {
                            intervals: intervals.len(),
                            demands: demands.len(),
                        });
                    }
                    for &id in intervals {
                        self.require_interval(id)?;
                    }
                    if let Some(&d) = demands.iter().find(|&&d| d < 0) {
                        return Err(ModelError::NegativeDemand(d));
                    }
                    if *capacity < 0 {
                        return Err(ModelError::NegativeCapacity(*capacity));
                    }
                }
                Constraint::MaxEquality { target, operands } => {
                    self.require_int(*target)?;
                    for &id in operands {
                        self.require_int(id)?;
                    }
                }
                Constraint::GreaterOrEqual { var, .. } => self.require_int(*var)?,
            }
        }

        match self.objective {
            Some(Objective::Minimize(var)) | Some(Objective::Maximize(var)) => {
                self.require_int(var)?
            }
            None => {}
        }

        for strategy in &self.decision_strategies {
            for &id in &strategy.variables {
                self.require_int(id)?;
            }
        }

        Ok(())
    }

    fn require_int(&self, id: IntVarId) -> Result<(), ModelError> {
        match self.int_vars.get(id.0) {
            Some(_) => Ok(()),
            None => Err(ModelError::UndefinedIntVar(id)),
        }
    }

    fn require_bool(&self, id: BoolVarId) -> Result<(), ModelError> {
        match self.bool_vars.get(id.0) {
            Some(_) => Ok(()),
            None => Err(ModelError::UndefinedBoolVar(id)),
        }
    }

    fn require_interval(&self, id: IntervalId) -> Result<(), ModelError> {
        match self.intervals.get(id.0) {
            Some(_) => Ok(()),
            None => Err(ModelError::UndefinedInterval(id)),
        }
    }

    /// Returns the number of integer variables.
    pub fn int_var_count(&self) -> usize {
        self.int_vars.len()
    }

    /// Returns the number of boolean variables.
    pub fn bool_var_count(&self) -> usize {
        self.bool_vars.len()
    }

    /// Returns the number of interval variables.
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
