use hashbrown::HashMap;
use itags_core::{FailureReason, ProblemInputs};
use itags_oracle::{is_infeasible, MotionDurationOracle};

use crate::status::{TransitionStatus, UpdateOutcome};

/// Per-task duration and lower-bound data for one allocation (spec §3 "Task
/// info"). `lower_bound` is `L_i = max over r in coalition of
/// oracle.initialTransitionDuration(...)`; `duration` is `d_i =
/// oracle.taskDuration(...)`.
pub struct TaskInfo {
    pub local_index: usize,
    pub global_index: usize,
    pub coalition: Vec<usize>,
    pub duration: f64,
    pub lower_bound: f64,
    per_robot: HashMap<usize, (TransitionStatus, f64)>,
}

impl TaskInfo {
    pub fn setup(
        local_index: usize,
        global_index: usize,
        coalition: Vec<usize>,
        problem: &ProblemInputs,
        oracle: &impl MotionDurationOracle,
    ) -> Result<Self, FailureReason> {
        let task = &problem.tasks[global_index];
        let mut lower_bound = 0.0f64;
        let mut per_robot = HashMap::with_capacity(coalition.len());
        let mut robots = Vec::with_capacity(coalition.len());
        for &robot_index in &coalition {
            let robot = &problem.robots[robot_index];
            let species = problem.robot_species(robot_index);
            robots.push(robot);
            let (status, value) = if oracle.is_initial_memoized(&task.initial_configuration, robot) {
                let duration = oracle.initial_transition_duration(&task.initial_configuration, robot);
                if is_infeasible(duration) {
                    return Err(FailureReason::InitialTransitionFailure {
                        robot: robot_index,
                        task: global_index,
                    });
                }
                (TransitionStatus::Authoritative, duration)
            } else {
                let duration = oracle.initial_transition_duration_heuristic(&task.initial_configuration, robot, species);
                (TransitionStatus::Heuristic, duration)
            };
            lower_bound = lower_bound.max(value);
            per_robot.insert(robot_index, (status, value));
        }

        let duration = if coalition.is_empty() {
            task.duration
        } else {
            let computed = oracle.task_duration(task, &robots);
            if is_infeasible(computed) {
                let reasons = coalition
                    .iter()
                    .map(|&robot_index| FailureReason::SpeciesTaskFailure {
                        species: problem.robots[robot_index].species,
                        task: global_index,
                    })
                    .collect();
                return Err(FailureReason::Compound(reasons));
            }
            computed
        };

        Ok(Self {
            local_index,
            global_index,
            coalition,
            duration,
            lower_bound,
            per_robot,
        })
    }

    /// Queries the authoritative initial-transition duration for `robot` if
    /// its contribution is not already authoritative (spec §4.3 step 2,
    /// grounded on `DmsTaskInfo::updateLowerBound`).
    pub fn update_lower_bound(
        &mut self,
        robot_index: usize,
        problem: &ProblemInputs,
        oracle: &impl MotionDurationOracle,
    ) -> Result<UpdateOutcome, FailureReason> {
        let (status, _) = self.per_robot[&robot_index];
        if status.is_authoritative() {
            return Ok(UpdateOutcome::NoUpdate);
        }
        let task = &problem.tasks[self.global_index];
        let robot = &problem.robots[robot_index];
        let duration = oracle.initial_transition_duration(&task.initial_configuration, robot);
        if is_infeasible(duration) {
            return Err(FailureReason::InitialTransitionFailure {
                robot: robot_index,
                task: self.global_index,
            });
        }
        self.per_robot.insert(robot_index, (TransitionStatus::Authoritative, duration));
        if duration > self.lower_bound {
            self.lower_bound = duration;
            Ok(UpdateOutcome::Updated)
        } else {
            Ok(UpdateOutcome::NoUpdate)
        }
    }
}
