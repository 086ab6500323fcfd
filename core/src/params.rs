//! Typed, validated parameter objects for the scheduler and the allocation
//! search (spec §6 "itags_parameters, scheduler_parameters").
//!
//! The original system resolves these through a parent/child "config_type"
//! tree (e.g. `deterministic_milp_scheduler_parameters` inherits the fields
//! of `milp_scheduler_parameters`, which inherits `scheduler_parameters`).
//! Serde's tagged-enum + `#[serde(flatten)]` combination reproduces that
//! tree directly as Rust types instead of a runtime required/optional/
//! default table, so a malformed `config_type` or a missing required field
//! is rejected by `serde_json` itself and surfaces as a
//! [`crate::error::ConfigError`]-shaped message at the CLI boundary.

use serde::{Deserialize, Serialize};

fn default_neg_one() -> f64 {
    -1.0
}

fn default_zero_threads() -> u32 {
    0
}

/// Fields shared by every MILP scheduler variant (spec §6 "Scheduler
/// parameters (enumerated)").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonMilpParameters {
    pub timeout: f64,
    pub milp_timeout: f64,
    #[serde(default = "default_zero_threads")]
    pub threads: u32,
    #[serde(default = "default_neg_one")]
    pub mip_gap: f64,
    #[serde(default = "default_neg_one")]
    pub heuristic_time: f64,
    #[serde(default = "default_neg_one")]
    pub method: i32,
    #[serde(default)]
    pub return_feasible_on_timeout: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeterministicMilpSchedulerParameters {
    #[serde(flatten)]
    pub common: CommonMilpParameters,
    #[serde(default)]
    pub use_hierarchical_objective: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StochasticMilpSchedulerParameters {
    #[serde(flatten)]
    pub common: CommonMilpParameters,
    /// Tail fraction used by the CVaR-like aggregation (spec §4.4 "Monolithic
    /// variant").
    pub gamma: f64,
    pub num_scenarios: u32,
    pub use_sprt: bool,
    pub delta_percentage: bool,
    pub delta: f64,
    pub indifference_tolerance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicApproximationStochasticSchedulerParameters {
    #[serde(flatten)]
    pub stochastic: StochasticMilpSchedulerParameters,
    /// Scenario-selection budget (spec §4.4 "Scenario selection").
    pub beta: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GnnHeuristicApproximationStochasticSchedulerParameters {
    #[serde(flatten)]
    pub heuristic_approximation: HeuristicApproximationStochasticSchedulerParameters,
    pub model_filepath: String,
    pub model_parameters_filepath: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "config_type", rename_all = "snake_case")]
pub enum SchedulerParameters {
    DeterministicMilpScheduler(DeterministicMilpSchedulerParameters),
    StochasticMilpScheduler(StochasticMilpSchedulerParameters),
    HeuristicApproximationStochasticScheduler(HeuristicApproximationStochasticSchedulerParameters),
    GnnHeuristicApproximationStochasticScheduler(GnnHeuristicApproximationStochasticSchedulerParameters),
}

impl SchedulerParameters {
    pub fn common(&self) -> &CommonMilpParameters {
        match self {
            SchedulerParameters::DeterministicMilpScheduler(p) => &p.common,
            SchedulerParameters::StochasticMilpScheduler(p) => &p.common,
            SchedulerParameters::HeuristicApproximationStochasticScheduler(p) => &p.stochastic.common,
            SchedulerParameters::GnnHeuristicApproximationStochasticScheduler(p) => {
                &p.heuristic_approximation.stochastic.common
            }
        }
    }
}

/// Rejects `config_type`s that parse against the documented schema but name
/// a scheduler variant this build has no implementation for (spec §1
/// Non-goals: no learned-heuristic core). Called once, at problem-input
/// validation time (`ProblemInputs::from_json`), so no evaluated search node
/// can ever reach the scheduler dispatch with an unsupported variant.
pub fn validate_scheduler_parameters(params: &SchedulerParameters) -> Result<(), crate::error::ConfigError> {
    match params {
        SchedulerParameters::GnnHeuristicApproximationStochasticScheduler(_) => {
            Err(crate::error::ConfigError::UnsupportedConfigType("gnn_heuristic_approximation_stochastic_scheduler".into()))
        }
        _ => Ok(()),
    }
}

/// Fields shared by every search variant (spec §6 "Search parameters
/// (enumerated)").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommonSearchParameters {
    pub has_timeout: bool,
    pub timeout: f64,
    pub timer_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestFirstSearchParameters {
    #[serde(flatten)]
    pub common: CommonSearchParameters,
    #[serde(default)]
    pub save_pruned_nodes: bool,
    #[serde(default)]
    pub save_closed_nodes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocalAStarParameters {
    #[serde(flatten)]
    pub best_first: BestFirstSearchParameters,
    pub w: f64,
    pub rebuild: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "config_type", rename_all = "snake_case")]
pub enum SearchParameters {
    BestFirstSearch(BestFirstSearchParameters),
    FocalAStar(FocalAStarParameters),
}

impl SearchParameters {
    pub fn common(&self) -> &CommonSearchParameters {
        match self {
            SearchParameters::BestFirstSearch(p) => &p.common,
            SearchParameters::FocalAStar(p) => &p.best_first.common,
        }
    }

    pub fn best_first(&self) -> &BestFirstSearchParameters {
        match self {
            SearchParameters::BestFirstSearch(p) => p,
            SearchParameters::FocalAStar(p) => &p.best_first,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_scheduler_parameters_round_trip() {
        let json = serde_json::json!({
            "config_type": "deterministic_milp_scheduler",
            "timeout": 30.0,
            "milp_timeout": 10.0,
        });
        let params: SchedulerParameters = serde_json::from_value(json).unwrap();
        assert_eq!(params.common().threads, 0);
        assert_eq!(params.common().mip_gap, -1.0);
        match params {
            SchedulerParameters::DeterministicMilpScheduler(p) => assert!(!p.use_hierarchical_objective),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn search_parameters_focal_a_star_inherits_best_first_defaults() {
        let json = serde_json::json!({
            "config_type": "focal_a_star",
            "has_timeout": true,
            "timeout": 60.0,
            "timer_name": "itags",
            "w": 1.5,
            "rebuild": false,
        });
        let params: SearchParameters = serde_json::from_value(json).unwrap();
        assert!(!params.best_first().save_pruned_nodes);
    }
}
