//! Dispatches a search node's allocation to the scheduler variant named by
//! the problem's `scheduler_parameters` (spec §4.5 "Evaluation": "each
//! evaluated node invokes the scheduler on the (tasks, allocation) pair").

use itags_core::params::SchedulerParameters;
use itags_core::{Allocation, FailureReason, ProblemInputs};
use itags_oracle::MotionDurationOracle;
use itags_scheduling::{Schedule, StochasticSchedule};

/// The result of invoking whichever scheduler variant the problem names.
#[derive(Debug, Clone)]
pub enum EvaluatedSchedule {
    Deterministic(Schedule),
    Stochastic(StochasticSchedule),
}

impl EvaluatedSchedule {
    /// The scalar makespan used by `NormalizedScheduleQuality` (spec §4.5):
    /// the deterministic makespan, or the stochastic aggregate value.
    pub fn makespan(&self) -> f64 {
        match self {
            EvaluatedSchedule::Deterministic(schedule) => schedule.makespan,
            EvaluatedSchedule::Stochastic(schedule) => schedule.aggregated_value,
        }
    }
}

/// Invokes the deterministic or stochastic subscheduler according to
/// `problem.scheduler_parameters`. The learned-heuristic variant
/// (`GnnHeuristicApproximationStochasticScheduler`) has no learned-heuristic
/// core in this crate (a documented Non-goal); `ProblemInputs::from_json`
/// rejects that `config_type` as a parameter-validation failure (spec §7)
/// before a problem ever reaches the search, so this arm is unreachable for
/// any `ProblemInputs` built through the validated entry point.
pub fn evaluate(
    problem: &ProblemInputs,
    allocation: &Allocation,
    oracle: &impl MotionDurationOracle,
) -> Result<EvaluatedSchedule, FailureReason> {
    match &problem.scheduler_parameters {
        SchedulerParameters::DeterministicMilpScheduler(_) => {
            itags_scheduling::solve_deterministic(problem, allocation, oracle).map(EvaluatedSchedule::Deterministic)
        }
        SchedulerParameters::StochasticMilpScheduler(_) | SchedulerParameters::HeuristicApproximationStochasticScheduler(_) => {
            itags_scheduling::solve_stochastic(problem, allocation, oracle).map(EvaluatedSchedule::Stochastic)
        }
        SchedulerParameters::GnnHeuristicApproximationStochasticScheduler(_) => {
            unreachable!("rejected by itags_core::params::validate_scheduler_parameters during ProblemInputs::from_json")
        }
    }
}
