//! Sampled scenarios of uncertain travel time (spec §4.4, glossary
//! "Scenario"): static task durations are shared across scenarios, only the
//! motion-duration oracle's travel-time queries vary.

use itags_core::{Configuration, Robot, Species, Task};
use itags_oracle::{is_infeasible, MotionDurationOracle};

/// One sampled realization: every travel-duration query the oracle answers
/// is scaled by `travel_time_multiplier`; `taskDuration`'s static component
/// passes through unscaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub index: usize,
    pub travel_time_multiplier: f64,
}

impl Scenario {
    pub fn new(index: usize, travel_time_multiplier: f64) -> Self {
        Self {
            index,
            travel_time_multiplier,
        }
    }

    /// Draws `count` scenarios from a seeded RNG, multipliers uniform over
    /// `[1-spread, 1+spread]`. A seeded, reproducible stand-in for sampling
    /// against the external motion planner's own uncertainty model, which
    /// this core does not have access to.
    pub fn sample(count: u32, spread: f64, seed: u64) -> Vec<Scenario> {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
        (0..count)
            .map(|i| Scenario::new(i as usize, rng.random_range((1.0 - spread)..=(1.0 + spread))))
            .collect()
    }
}

/// Wraps a base oracle, scaling its travel-duration queries for one
/// scenario realization.
pub struct ScenarioOracle<'a, O> {
    base: &'a O,
    scenario: Scenario,
}

impl<'a, O: MotionDurationOracle> ScenarioOracle<'a, O> {
    pub fn new(base: &'a O, scenario: Scenario) -> Self {
        Self { base, scenario }
    }

    fn scale(&self, duration: f64) -> f64 {
        if is_infeasible(duration) {
            duration
        } else {
            duration * self.scenario.travel_time_multiplier
        }
    }
}

impl<O: MotionDurationOracle> MotionDurationOracle for ScenarioOracle<'_, O> {
    fn is_initial_memoized(&self, cfg: &Configuration, robot: &Robot) -> bool {
        self.base.is_initial_memoized(cfg, robot)
    }

    fn initial_transition_duration(&self, cfg: &Configuration, robot: &Robot) -> f64 {
        self.scale(self.base.initial_transition_duration(cfg, robot))
    }

    fn initial_transition_duration_heuristic(&self, cfg: &Configuration, robot: &Robot, species: &Species) -> f64 {
        self.scale(self.base.initial_transition_duration_heuristic(cfg, robot, species))
    }

    fn is_transition_memoized(&self, a: &Configuration, b: &Configuration, robot: &Robot) -> bool {
        self.base.is_transition_memoized(a, b, robot)
    }

    fn transition_duration(&self, a: &Configuration, b: &Configuration, robot: &Robot) -> f64 {
        self.scale(self.base.transition_duration(a, b, robot))
    }

    fn transition_duration_heuristic(&self, a: &Configuration, b: &Configuration, robot: &Robot, species: &Species) -> f64 {
        self.scale(self.base.transition_duration_heuristic(a, b, robot, species))
    }

    fn task_duration(&self, task: &Task, coalition: &[&Robot]) -> f64 {
        self.base.task_duration(task, coalition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_is_reproducible_for_a_fixed_seed() {
        let a = Scenario::sample(5, 0.2, 42);
        let b = Scenario::sample(5, 0.2, 42);
        assert_eq!(a, b);
        assert!(a.iter().all(|s| (0.8..=1.2).contains(&s.travel_time_multiplier)));
    }
}
