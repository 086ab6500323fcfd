use hashbrown::HashMap;
use itags_core::{FailureReason, ProblemInputs};
use itags_oracle::{is_infeasible, MotionDurationOracle};

use crate::status::{TransitionStatus, UpdateOutcome};

/// Per-robot lower bound for one precedence or mutex transition edge
/// (predecessor task -> successor task), mirroring `DmsTransitionInfo`.
/// `predecessor`/`successor` are global task indices (for oracle/task
/// lookups); `local_predecessor`/`local_successor` are the matching
/// plan-local indices used to key schedule/mutex bookkeeping.
pub struct TransitionInfo {
    pub predecessor: usize,
    pub successor: usize,
    pub local_predecessor: usize,
    pub local_successor: usize,
    pub lower_bound: f64,
    per_robot: HashMap<usize, (TransitionStatus, f64)>,
}

impl TransitionInfo {
    /// `shared` is the set of robots present in both the predecessor's and
    /// successor's coalitions: only they can physically execute the
    /// transition, so only they contribute a lower bound (spec §3
    /// "Transition info").
    #[allow(clippy::too_many_arguments)]
    pub fn setup(
        predecessor: usize,
        successor: usize,
        local_predecessor: usize,
        local_successor: usize,
        shared: &[usize],
        problem: &ProblemInputs,
        oracle: &impl MotionDurationOracle,
    ) -> Result<Self, FailureReason> {
        let from = &problem.tasks[predecessor];
        let to = &problem.tasks[successor];
        let mut lower_bound = 0.0f64;
        let mut per_robot = HashMap::with_capacity(shared.len());
        for &robot_index in shared {
            let robot = &problem.robots[robot_index];
            let species = problem.robot_species(robot_index);
            let (status, value) = if oracle.is_transition_memoized(&from.terminal_configuration, &to.initial_configuration, robot) {
                let duration = oracle.transition_duration(&from.terminal_configuration, &to.initial_configuration, robot);
                if is_infeasible(duration) {
                    return Err(FailureReason::TransitionFailure {
                        species: robot.species,
                        predecessor,
                        successor,
                    });
                }
                (TransitionStatus::Authoritative, duration)
            } else {
                let duration =
                    oracle.transition_duration_heuristic(&from.terminal_configuration, &to.initial_configuration, robot, species);
                (TransitionStatus::Heuristic, duration)
            };
            lower_bound = lower_bound.max(value);
            per_robot.insert(robot_index, (status, value));
        }
        Ok(Self {
            predecessor,
            successor,
            local_predecessor,
            local_successor,
            lower_bound,
            per_robot,
        })
    }

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
        let from = &problem.tasks[self.predecessor];
        let to = &problem.tasks[self.successor];
        let robot = &problem.robots[robot_index];
        let duration = oracle.transition_duration(&from.terminal_configuration, &to.initial_configuration, robot);
        if is_infeasible(duration) {
            return Err(FailureReason::TransitionFailure {
                species: robot.species,
                predecessor: self.predecessor,
                successor: self.successor,
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
