use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProblemInputError;
use crate::params::{SchedulerParameters, SearchParameters};
use crate::plan::Plan;
use crate::robot::Robot;
use crate::species::{Species, TraitAggregation};
use crate::task::Task;

/// The wire shape of the single JSON problem document (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemInputsJson {
    pub tasks: Vec<Task>,
    pub robots: Vec<Robot>,
    pub species: Vec<Species>,
    #[serde(default)]
    pub motion_planners: Vec<Value>,
    pub precedence_constraints: Vec<(usize, usize)>,
    pub itags_parameters: SearchParameters,
    pub scheduler_parameters: SchedulerParameters,
    #[serde(default)]
    pub plan_task_indices: Option<Vec<usize>>,
    #[serde(default)]
    pub use_reverse: bool,
    #[serde(default)]
    pub best_schedule: Option<f64>,
    #[serde(default)]
    pub worst_schedule: Option<f64>,
    /// Per-trait aggregation policy (glossary "Trait reduction"). Not part of
    /// the distilled JSON schema in spec §6; defaults to `Capability`
    /// (element-wise min) for every trait dimension when absent.
    #[serde(default)]
    pub trait_aggregation: Option<Vec<TraitAggregation>>,
}

/// The fully validated, internally-consistent form of a problem instance.
///
/// Construction is the single place that enforces the cross-field
/// invariants the wire format cannot express on its own: index bounds,
/// precedence acyclicity (via [`Plan`]), and a uniform `desired_traits`
/// width across all tasks.
#[derive(Debug, Clone)]
pub struct ProblemInputs {
    pub tasks: Vec<Task>,
    pub robots: Vec<Robot>,
    pub species: Vec<Species>,
    pub motion_planners: Vec<Value>,
    pub plan: Plan,
    pub use_reverse: bool,
    pub best_schedule: Option<f64>,
    pub worst_schedule: Option<f64>,
    pub itags_parameters: SearchParameters,
    pub scheduler_parameters: SchedulerParameters,
    pub trait_aggregation: Vec<TraitAggregation>,
}

impl ProblemInputs {
    pub fn from_json(doc: ProblemInputsJson) -> Result<Self, ProblemInputError> {
        crate::params::validate_scheduler_parameters(&doc.scheduler_parameters)?;
        for robot in &doc.robots {
            if robot.species >= doc.species.len() {
                return Err(ProblemInputError::SpeciesIndexOutOfRange(robot.species));
            }
        }
        if !doc.motion_planners.is_empty() {
            for species in &doc.species {
                if species.motion_planner_index >= doc.motion_planners.len() {
                    return Err(ProblemInputError::RobotIndexOutOfRange(species.motion_planner_index));
                }
            }
        }
        let num_tasks = doc.tasks.len();
        let plan = Plan::new(num_tasks, doc.plan_task_indices, &doc.precedence_constraints)?;

        let num_traits = doc.tasks.iter().map(|t| t.desired_traits.len()).max().unwrap_or(0);
        let trait_aggregation = doc
            .trait_aggregation
            .unwrap_or_else(|| vec![TraitAggregation::Capability; num_traits]);

        Ok(Self {
            tasks: doc.tasks,
            robots: doc.robots,
            species: doc.species,
            motion_planners: doc.motion_planners,
            plan,
            use_reverse: doc.use_reverse,
            best_schedule: doc.best_schedule,
            worst_schedule: doc.worst_schedule,
            itags_parameters: doc.itags_parameters,
            scheduler_parameters: doc.scheduler_parameters,
            trait_aggregation,
        })
    }

    pub fn num_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn num_robots(&self) -> usize {
        self.robots.len()
    }

    pub fn robot_species(&self, robot: usize) -> &Species {
        &self.species[self.robots[robot].species]
    }

    /// Aggregates the coalition's per-trait values against task `task`'s
    /// desired-trait vector, returning `true` iff every dimension is
    /// satisfied (glossary "Trait reduction").
    pub fn coalition_satisfies_traits(&self, task: usize, coalition: &[usize]) -> bool {
        let desired = &self.tasks[task].desired_traits;
        (0..desired.len()).all(|trait_index| {
            let policy = self
                .trait_aggregation
                .get(trait_index)
                .copied()
                .unwrap_or(TraitAggregation::Capability);
            let reduced = policy.reduce(coalition.iter().map(|&r| self.robot_species(r).trait_value(trait_index)));
            reduced >= desired[trait_index]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::Configuration;
    use crate::error::ConfigError;

    fn sample_species() -> Species {
        Species {
            name: "default".into(),
            traits: vec![1.0],
            bounding_radius: 0.2,
            speed: 0.2,
            motion_planner_index: 0,
        }
    }

    fn sample_task(desired: f64) -> Task {
        Task {
            name: "t".into(),
            duration: 1.0,
            desired_traits: vec![desired],
            linear_quality_coefficients: vec![1.0],
            initial_configuration: Configuration::new(0.0, 0.0, 0.0),
            terminal_configuration: Configuration::new(1.0, 0.0, 0.0),
        }
    }

    #[test]
    fn trait_satisfaction_uses_capability_min_by_default() {
        let doc = ProblemInputsJson {
            tasks: vec![sample_task(1.0)],
            robots: vec![Robot {
                name: "r0".into(),
                species: 0,
                initial_configuration: Configuration::new(0.0, 0.0, 0.0),
            }],
            species: vec![sample_species()],
            motion_planners: vec![],
            precedence_constraints: vec![],
            itags_parameters: serde_json::from_value(serde_json::json!({
                "config_type": "best_first_search",
                "has_timeout": false,
                "timeout": 0.0,
                "timer_name": "itags",
            }))
            .unwrap(),
            scheduler_parameters: serde_json::from_value(serde_json::json!({
                "config_type": "deterministic_milp_scheduler",
                "timeout": 10.0,
                "milp_timeout": 10.0,
            }))
            .unwrap(),
            plan_task_indices: None,
            use_reverse: false,
            best_schedule: None,
            worst_schedule: None,
            trait_aggregation: None,
        };
        let problem = ProblemInputs::from_json(doc).unwrap();
        assert!(problem.coalition_satisfies_traits(0, &[0]));
        assert!(!problem.coalition_satisfies_traits(0, &[]));
    }

    #[test]
    fn gnn_scheduler_config_type_is_rejected_at_validation_time() {
        let doc = ProblemInputsJson {
            tasks: vec![sample_task(0.0)],
            robots: vec![Robot {
                name: "r0".into(),
                species: 0,
                initial_configuration: Configuration::new(0.0, 0.0, 0.0),
            }],
            species: vec![sample_species()],
            motion_planners: vec![],
            precedence_constraints: vec![],
            itags_parameters: serde_json::from_value(serde_json::json!({
                "config_type": "best_first_search",
                "has_timeout": false,
                "timeout": 0.0,
                "timer_name": "itags",
            }))
            .unwrap(),
            scheduler_parameters: serde_json::from_value(serde_json::json!({
                "config_type": "gnn_heuristic_approximation_stochastic_scheduler",
                "timeout": 10.0,
                "milp_timeout": 10.0,
                "gamma": 0.1,
                "num_scenarios": 4,
                "use_sprt": false,
                "delta_percentage": false,
                "delta": 0.1,
                "indifference_tolerance": 0.01,
                "beta": 2,
                "model_filepath": "model.onnx",
                "model_parameters_filepath": "model.json",
            }))
            .unwrap(),
            plan_task_indices: None,
            use_reverse: false,
            best_schedule: None,
            worst_schedule: None,
            trait_aggregation: None,
        };
        let err = ProblemInputs::from_json(doc).unwrap_err();
        assert!(matches!(err, ProblemInputError::Config(ConfigError::UnsupportedConfigType(_))));
    }
}
