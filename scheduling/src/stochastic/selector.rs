//! Scenario selection (spec §4.4 "Scenario selection", §9 "Scenario
//! selector"): choose which of the sampled scenarios the master must
//! dominate. Kept behind a trait so a learned selector can be substituted
//! without the scheduler depending on any particular numerical framework.

use itertools::Itertools;

/// Picks a boolean mask of length `severities.len()` marking which
/// scenarios enter the master/subscheduler model.
pub trait ScenarioSelector {
    /// `severities` is any per-scenario monotone proxy for how demanding
    /// the scenario is (e.g. its travel-time multiplier); `beta` is the
    /// number of scenarios to select.
    fn select(&self, severities: &[f64], beta: usize) -> Vec<bool>;
}

/// Selects the `beta` scenarios with the highest severity score — the
/// "uniform selection is acceptable" default of spec §4.4.
pub struct UniformSelector;

impl ScenarioSelector for UniformSelector {
    fn select(&self, severities: &[f64], beta: usize) -> Vec<bool> {
        let beta = beta.min(severities.len());
        let mut mask = vec![false; severities.len()];
        for (i, _) in severities
            .iter()
            .enumerate()
            .sorted_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap())
            .take(beta)
        {
            mask[i] = true;
        }
        mask
    }
}

pub fn uniform_selector() -> UniformSelector {
    UniformSelector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_highest_severity_scenarios() {
        let mask = uniform_selector().select(&[1.0, 3.0, 2.0, 0.5], 2);
        assert_eq!(mask, vec![false, true, true, false]);
    }

    #[test]
    fn beta_larger_than_population_selects_all() {
        let mask = uniform_selector().select(&[1.0, 2.0], 5);
        assert_eq!(mask, vec![true, true]);
    }
}
