//! Build configuration.

use super::error::{FjspError, Result};
use super::instance::Instance;
use crate::cp::{ValueSelection, VariableSelection};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the upper bound of every time variable is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HorizonPolicy {
    /// Sum over all tasks of their slowest alternative.
    #[default]
    Serial,
    /// Sum over jobs of the largest per-task minimum duration.
    ///
    /// Can cut off every feasible schedule when jobs have several tasks.
    Reference,
    /// A caller-supplied horizon.
    Fixed(i64),
}

impl HorizonPolicy {
    /// Computes the horizon for `instance`.
    pub fn resolve(self, instance: &Instance) -> Result<i64> {
        match self {
            HorizonPolicy::Serial => Ok(instance.serial_horizon()),
            HorizonPolicy::Reference => Ok(instance.reference_horizon()),
            HorizonPolicy::Fixed(h) if h < 0 => Err(FjspError::InvalidHorizon(h)),
            HorizonPolicy::Fixed(h) => Ok(h),
        }
    }
}

/// Which resource constraints a machine with two or more intervals receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResourcePolicy {
    /// Capacity 1: no-overlap, plus cumulative when some demand exceeds 1.
    /// Capacity above 1: cumulative.
    #[default]
    ByCapacity,
    /// Both no-overlap and cumulative on every machine.
    ///
    /// No-overlap then serializes machines whose capacity is above 1.
    Redundant,
    /// Cumulative only, whatever the capacity.
    CumulativeOnly,
}

impl ResourcePolicy {
    /// Whether a machine of `capacity` gets a no-overlap constraint.
    pub fn no_overlap(self, capacity: i64) -> bool {
        match self {
            ResourcePolicy::ByCapacity => capacity <= 1,
            ResourcePolicy::Redundant => true,
            ResourcePolicy::CumulativeOnly => false,
        }
    }

    /// Whether a machine of `capacity` whose largest demand is
    /// `max_demand` gets a cumulative constraint.
    ///
    /// A demand above the capacity always needs one, whatever the policy.
    pub fn cumulative(self, capacity: i64, max_demand: i64) -> bool {
        match self {
            ResourcePolicy::ByCapacity => capacity > 1 || max_demand > capacity,
            ResourcePolicy::Redundant | ResourcePolicy::CumulativeOnly => true,
        }
    }
}

/// Which energetic makespan cuts are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LowerBoundMode {
    /// No cuts.
    Disabled,
    /// `Σ min_duration − min_duration[p] + ⌊total_energy[p] / machine_count[p]⌋`.
    ///
    /// Counts every alternative's duration as work, so the cut can exceed
    /// the optimum when tasks have several alternatives.
    Reference,
    /// `head[p] + max(min_duration[p], ⌈min_work[p] / slots[p]⌉) + tail[p]`,
    /// never above the optimum.
    #[default]
    Sound,
}

/// Branching hint attached to the task start variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchHint {
    pub variable_selection: VariableSelection,
    pub value_selection: ValueSelection,
}

/// Configuration for building a flexible job shop model.
///
/// # Examples
///
/// ```
/// use u_fjsp::fjsp::{BuildConfig, LowerBoundMode, ResourcePolicy};
///
/// let config = BuildConfig::default()
///     .with_name("line-3")
///     .with_resource_policy(ResourcePolicy::Redundant)
///     .with_lower_bounds(LowerBoundMode::Reference)
///     .without_search_hint();
/// assert!(config.search.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuildConfig {
    /// Name given to the CP model.
    pub name: String,

    /// Horizon used for every start, end and makespan domain.
    pub horizon: HorizonPolicy,

    /// Per-machine resource constraints.
    pub resources: ResourcePolicy,

    /// Energetic makespan cuts.
    pub lower_bounds: LowerBoundMode,

    /// Branching hint over task starts. `None` leaves the solver's default.
    pub search: Option<SearchHint>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            name: "fjsp".into(),
            horizon: HorizonPolicy::default(),
            resources: ResourcePolicy::default(),
            lower_bounds: LowerBoundMode::default(),
            search: Some(SearchHint::default()),
        }
    }
}

impl BuildConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_horizon(mut self, horizon: HorizonPolicy) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_resource_policy(mut self, policy: ResourcePolicy) -> Self {
        self.resources = policy;
        self
    }

    pub fn with_lower_bounds(mut self, mode: LowerBoundMode) -> Self {
        self.lower_bounds = mode;
        self
    }

    pub fn with_search_hint(mut self, hint: SearchHint) -> Self {
        self.search = Some(hint);
        self
    }

    pub fn without_search_hint(mut self) -> Self {
        self.search = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuildConfig::default();
        assert_eq!(config.name, "fjsp");
        assert_eq!(config.horizon, HorizonPolicy::Serial);
        assert_eq!(config.resources, ResourcePolicy::ByCapacity);
        assert_eq!(config.lower_bounds, LowerBoundMode::Sound);
        assert_eq!(
            config.search,
            Some(SearchHint {
                variable_selection: VariableSelection::ChooseLowestMin,
                value_selection: ValueSelection::SelectMinValue,
            })
        );
    }

    #[test]
    fn test_resource_policy() {
        assert!(ResourcePolicy::ByCapacity.no_overlap(1));
        assert!(!ResourcePolicy::ByCapacity.cumulative(1, 1));
        assert!(ResourcePolicy::ByCapacity.cumulative(1, 2));
        assert!(!ResourcePolicy::ByCapacity.no_overlap(2));
        assert!(ResourcePolicy::ByCapacity.cumulative(2, 1));

        assert!(ResourcePolicy::Redundant.no_overlap(3));
        assert!(ResourcePolicy::Redundant.cumulative(3, 0));

        assert!(!ResourcePolicy::CumulativeOnly.no_overlap(1));
        assert!(ResourcePolicy::CumulativeOnly.cumulative(1, 1));
    }

    #[test]
    fn test_fixed_horizon() {
        let inst = Instance::from_raw(&[vec![vec![(3, 0)]]], [(0, 1)]);
        assert_eq!(HorizonPolicy::Fixed(40).resolve(&inst), Ok(40));
        assert_eq!(
            HorizonPolicy::Fixed(-1).resolve(&inst),
            Err(FjspError::InvalidHorizon(-1))
        );
        assert_eq!(HorizonPolicy::Serial.resolve(&inst), Ok(3));
    }
}
