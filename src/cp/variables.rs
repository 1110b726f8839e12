//! CP variable types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle to an integer variable registered in a [`CpModel`](super::CpModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntVarId(pub(crate) usize);

/// Handle to a boolean variable registered in a [`CpModel`](super::CpModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoolVarId(pub(crate) usize);

/// Handle to an interval variable registered in a [`CpModel`](super::CpModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntervalId(pub(crate) usize);

impl IntVarId {
    /// Position of the variable in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl BoolVarId {
    /// Position of the variable in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl IntervalId {
    /// Position of the interval in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for IntVarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "int#{}", self.0)
    }
}

impl fmt::Display for BoolVarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bool#{}", self.0)
    }
}

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "interval#{}", self.0)
    }
}

/// An integer variable with a domain [min, max].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntVar {
    /// Variable name (unique identifier within a model).
    pub name: String,
    /// Minimum value.
    pub min: i64,
    /// Maximum value.
    pub max: i64,
}

impl IntVar {
    /// Creates a new integer variable with the given bounds.
    pub fn new(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// Creates an integer variable fixed to a single value.
    pub fn fixed(name: impl Into<String>, value: i64) -> Self {
        Self::new(name, value, value)
    }

    /// Whether this variable is fixed to a single value.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// Domain size (max - min + 1). Zero for an empty domain.
    pub fn domain_size(&self) -> i64 {
        (self.max - self.min + 1).max(0)
    }

    /// Whether `value` lies in the domain.
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// A boolean variable (true/false decision).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoolVar {
    /// Variable name.
    pub name: String,
}

impl BoolVar {
    /// Creates a new boolean variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An interval over existing start/end variables with a fixed size.
///
/// When present, `end = start + size` holds. An optional interval is
/// controlled by a presence literal: while the literal is false the
/// interval imposes no timing or resource constraint at all.
///
/// # Examples
///
/// ```
/// use u_fjsp::cp::{CpModel, IntervalVar};
///
/// let mut model = CpModel::new("example", 100);
/// let start = model.new_int_var("start", 0, 100);
/// let end = model.new_int_var("end", 0, 100);
/// let present = model.new_bool_var("present");
///
/// let op = IntervalVar::new("op", start, 30, end).as_optional(present);
/// assert!(op.is_optional());
/// assert_eq!(op.size, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntervalVar {
    /// Variable name.
    pub name: String,
    /// Start time variable.
    pub start: IntVarId,
    /// End time variable.
    pub end: IntVarId,
    /// Fixed size.
    pub size: i64,
    /// Presence literal (for optional intervals).
    pub presence: Option<BoolVarId>,
}

impl IntervalVar {
    /// Creates a mandatory fixed-size interval.
    pub fn new(name: impl Into<String>, start: IntVarId, size: i64, end: IntVarId) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            size,
            presence: None,
        }
    }

    /// Makes this interval optional with a presence literal.
    pub fn as_optional(mut self, presence: BoolVarId) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Whether this interval is optional.
    pub fn is_optional(&self) -> bool {
        self.presence.is_some()
    }
}
