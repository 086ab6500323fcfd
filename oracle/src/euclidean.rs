use std::sync::Mutex;

use hashbrown::{HashMap, HashSet};
use itags_core::{Configuration, ProblemInputs, Robot, Species, Task};

use crate::{MotionDurationOracle, INFEASIBLE};

/// The default oracle: authoritative durations are Euclidean distance over
/// the robot's species speed (spec §4.1 "default: euclidean_distance /
/// species.speed"), exact on the first query and thereafter reported as
/// memoized. Infeasible pairs are injected explicitly, which is how spec §8
/// scenario 6 ("a single robot's initial transition ... is infeasible") is
/// realized in tests without a real motion planner.
pub struct EuclideanOracle {
    speed_by_robot: HashMap<String, f64>,
    infeasible_initial: HashSet<(String, Configuration)>,
    infeasible_transition: HashSet<(String, Configuration, Configuration)>,
    infeasible_task: HashSet<String>,
    memoized_initial: Mutex<HashSet<(String, Configuration)>>,
    memoized_transition: Mutex<HashSet<(String, Configuration, Configuration)>>,
}

impl EuclideanOracle {
    pub fn from_problem(problem: &ProblemInputs) -> Self {
        let speed_by_robot = problem
            .robots
            .iter()
            .map(|r| (r.name.clone(), problem.species[r.species].speed))
            .collect();
        Self {
            speed_by_robot,
            infeasible_initial: HashSet::new(),
            infeasible_transition: HashSet::new(),
            infeasible_task: HashSet::new(),
            memoized_initial: Mutex::new(HashSet::new()),
            memoized_transition: Mutex::new(HashSet::new()),
        }
    }

    pub fn mark_initial_infeasible(&mut self, robot_name: impl Into<String>, cfg: Configuration) {
        self.infeasible_initial.insert((robot_name.into(), cfg));
    }

    pub fn mark_transition_infeasible(&mut self, robot_name: impl Into<String>, a: Configuration, b: Configuration) {
        self.infeasible_transition.insert((robot_name.into(), a, b));
    }

    pub fn mark_task_infeasible(&mut self, task_name: impl Into<String>) {
        self.infeasible_task.insert(task_name.into());
    }

    fn speed(&self, robot: &Robot) -> f64 {
        self.speed_by_robot.get(&robot.name).copied().unwrap_or(1.0)
    }
}

impl MotionDurationOracle for EuclideanOracle {
    fn is_initial_memoized(&self, cfg: &Configuration, robot: &Robot) -> bool {
        self.memoized_initial.lock().unwrap().contains(&(robot.name.clone(), *cfg))
    }

    fn initial_transition_duration(&self, cfg: &Configuration, robot: &Robot) -> f64 {
        self.memoized_initial.lock().unwrap().insert((robot.name.clone(), *cfg));
        if self.infeasible_initial.contains(&(robot.name.clone(), *cfg)) {
            return INFEASIBLE;
        }
        let speed = self.speed(robot);
        if speed <= 0.0 {
            return INFEASIBLE;
        }
        robot.initial_configuration.euclidean_distance(cfg) / speed
    }

    fn is_transition_memoized(&self, a: &Configuration, b: &Configuration, robot: &Robot) -> bool {
        self.memoized_transition
            .lock()
            .unwrap()
            .contains(&(robot.name.clone(), *a, *b))
    }

    fn transition_duration(&self, a: &Configuration, b: &Configuration, robot: &Robot) -> f64 {
        self.memoized_transition
            .lock()
            .unwrap()
            .insert((robot.name.clone(), *a, *b));
        if self.infeasible_transition.contains(&(robot.name.clone(), *a, *b)) {
            return INFEASIBLE;
        }
        let speed = self.speed(robot);
        if speed <= 0.0 {
            return INFEASIBLE;
        }
        a.euclidean_distance(b) / speed
    }

    /// Static `task.duration` plus the time to travel from the task's
    /// initial to terminal configuration at the coalition's pace (the
    /// "coalition-dependent component" spec §4.1 names): the slowest member
    /// sets the pace, since every assigned robot must remain present for
    /// the full on-site span.
    fn task_duration(&self, task: &Task, coalition: &[&Robot]) -> f64 {
        if self.infeasible_task.contains(&task.name) {
            return INFEASIBLE;
        }
        if coalition.is_empty() {
            return task.duration;
        }
        let slowest_speed = coalition.iter().map(|r| self.speed(r)).fold(f64::INFINITY, f64::min);
        if slowest_speed <= 0.0 {
            return INFEASIBLE;
        }
        let travel = task.initial_configuration.euclidean_distance(&task.terminal_configuration) / slowest_speed;
        task.duration + travel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itags_core::{params::SchedulerParameters, params::SearchParameters, ProblemInputsJson};

    fn problem() -> ProblemInputs {
        let doc = ProblemInputsJson {
            tasks: vec![],
            robots: vec![Robot {
                name: "r0".into(),
                species: 0,
                initial_configuration: Configuration::new(0.0, 0.0, 0.0),
            }],
            species: vec![Species {
                name: "s0".into(),
                traits: vec![],
                bounding_radius: 0.2,
                speed: 0.2,
                motion_planner_index: 0,
            }],
            motion_planners: vec![],
            precedence_constraints: vec![],
            itags_parameters: serde_json::from_value::<SearchParameters>(serde_json::json!({
                "config_type": "best_first_search", "has_timeout": false, "timeout": 0.0, "timer_name": "t"
            }))
            .unwrap(),
            scheduler_parameters: serde_json::from_value::<SchedulerParameters>(serde_json::json!({
                "config_type": "deterministic_milp_scheduler", "timeout": 1.0, "milp_timeout": 1.0
            }))
            .unwrap(),
            plan_task_indices: None,
            use_reverse: false,
            best_schedule: None,
            worst_schedule: None,
            trait_aggregation: None,
        };
        ProblemInputs::from_json(doc).unwrap()
    }

    #[test]
    fn becomes_memoized_after_first_query() {
        let problem = problem();
        let oracle = EuclideanOracle::from_problem(&problem);
        let robot = &problem.robots[0];
        let cfg = Configuration::new(5.0, 0.0, 0.0);
        assert!(!oracle.is_initial_memoized(&cfg, robot));
        let duration = oracle.initial_transition_duration(&cfg, robot);
        assert!((duration - 25.0).abs() < 1e-9);
        assert!(oracle.is_initial_memoized(&cfg, robot));
    }

    #[test]
    fn infeasible_pair_returns_sentinel() {
        let problem = problem();
        let mut oracle = EuclideanOracle::from_problem(&problem);
        let robot = problem.robots[0].clone();
        let cfg = Configuration::new(5.0, 0.0, 0.0);
        oracle.mark_initial_infeasible(robot.name.clone(), cfg);
        assert!(crate::is_infeasible(oracle.initial_transition_duration(&cfg, &robot)));
    }
}
