use std::sync::Mutex;

use hashbrown::{HashMap, HashSet};
use itags_core::{Configuration, Robot, Task};

use crate::{MotionDurationOracle, INFEASIBLE};

/// A fully explicit oracle for unit tests: every queryable value is set by
/// the test, nothing is derived geometrically. Mirrors the role of
/// `tests/include/mock_dms_task_info.hpp` in the original system.
#[derive(Default)]
pub struct MockOracle {
    initial: HashMap<(String, String), f64>,
    transition: HashMap<(String, String, String), f64>,
    task_duration: HashMap<String, f64>,
    memoized_initial: Mutex<HashSet<(String, String)>>,
    memoized_transition: Mutex<HashSet<(String, String, String)>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_initial(&mut self, robot: &str, cfg: &Configuration, duration: f64) {
        self.initial.insert((robot.to_string(), Self::key(cfg)), duration);
    }

    pub fn set_transition(&mut self, robot: &str, from: &Configuration, to: &Configuration, duration: f64) {
        self.transition.insert((robot.to_string(), Self::key(from), Self::key(to)), duration);
    }

    pub fn set_task_duration(&mut self, task: &str, duration: f64) {
        self.task_duration.insert(task.to_string(), duration);
    }

    /// Configurations carry no name of their own, so both the setters above
    /// and the queries below key off this formatted form rather than float
    /// bit patterns.
    fn key(cfg: &Configuration) -> String {
        format!("{:.6},{:.6},{:.6}", cfg.x, cfg.y, cfg.yaw)
    }
}

impl MotionDurationOracle for MockOracle {
    fn is_initial_memoized(&self, cfg: &Configuration, robot: &Robot) -> bool {
        self.memoized_initial
            .lock()
            .unwrap()
            .contains(&(robot.name.clone(), Self::key(cfg)))
    }

    fn initial_transition_duration(&self, cfg: &Configuration, robot: &Robot) -> f64 {
        let key = (robot.name.clone(), Self::key(cfg));
        self.memoized_initial.lock().unwrap().insert(key.clone());
        self.initial.get(&key).copied().unwrap_or(INFEASIBLE)
    }

    fn is_transition_memoized(&self, a: &Configuration, b: &Configuration, robot: &Robot) -> bool {
        self.memoized_transition
            .lock()
            .unwrap()
            .contains(&(robot.name.clone(), Self::key(a), Self::key(b)))
    }

    fn transition_duration(&self, a: &Configuration, b: &Configuration, robot: &Robot) -> f64 {
        let key = (robot.name.clone(), Self::key(a), Self::key(b));
        self.memoized_transition.lock().unwrap().insert(key.clone());
        self.transition.get(&key).copied().unwrap_or(INFEASIBLE)
    }

    fn task_duration(&self, task: &Task, coalition: &[&Robot]) -> f64 {
        let _ = coalition;
        self.task_duration.get(&task.name).copied().unwrap_or(task.duration)
    }
}
