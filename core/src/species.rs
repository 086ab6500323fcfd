use serde::{Deserialize, Serialize};

/// How a single trait dimension combines across the robots in a coalition.
///
/// Spec glossary "Trait reduction": min for capability traits (every member
/// must individually qualify), sum for capacity traits (members pool their
/// contribution). The policy is per-trait and supplied by the problem input,
/// not inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitAggregation {
    Capability,
    Capacity,
}

impl TraitAggregation {
    pub fn identity(self) -> f64 {
        match self {
            TraitAggregation::Capability => f64::INFINITY,
            TraitAggregation::Capacity => 0.0,
        }
    }

    pub fn combine(self, acc: f64, value: f64) -> f64 {
        match self {
            TraitAggregation::Capability => acc.min(value),
            TraitAggregation::Capacity => acc + value,
        }
    }

    /// Folds `values` under this policy, with an empty coalition reducing to
    /// `0.0` rather than the fold's own mathematical identity. `Capability`'s
    /// identity is `+inf` so a min-fold composes correctly over a non-empty
    /// coalition, but read standalone against zero robots it would vacuously
    /// satisfy any finite desired-trait threshold; a coalition of no robots
    /// has demonstrated no capability and must reduce to the same "nothing
    /// yet" value as `Capacity`'s empty sum.
    pub fn reduce(self, values: impl Iterator<Item = f64>) -> f64 {
        let mut seen_any = false;
        let folded = values.fold(self.identity(), |acc, v| {
            seen_any = true;
            self.combine(acc, v)
        });
        if seen_any {
            folded
        } else {
            0.0
        }
    }
}

/// A class of robot: shared traits, footprint, speed and motion planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub traits: Vec<f64>,
    pub bounding_radius: f64,
    pub speed: f64,
    pub motion_planner_index: usize,
}

impl Species {
    pub fn trait_value(&self, index: usize) -> f64 {
        self.traits.get(index).copied().unwrap_or(0.0)
    }
}
