//! JSON result shape (spec §6 "Outputs"): `allocation`, `schedule`,
//! `statistics`, `success`, and (on failure) a `failure` object carrying the
//! typed reason.

use itags_core::FailureReason;
use itags_scheduling::MutexOrder;
use itags_search::{EvaluatedSchedule, SearchOutcome, SearchResult, SearchStatistics};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct ScheduleJson {
    pub makespan: f64,
    pub timepoints: Vec<(f64, f64)>,
    pub precedence_set_by_mutex: Vec<(usize, usize)>,
}

impl ScheduleJson {
    fn from_evaluated(schedule: &EvaluatedSchedule) -> Self {
        match schedule {
            EvaluatedSchedule::Deterministic(schedule) => Self {
                makespan: schedule.makespan,
                timepoints: schedule.timepoints.iter().map(|t| (t.start, t.finish)).collect(),
                precedence_set_by_mutex: schedule.mutex_orders.iter().map(|&(i, j, order)| mutex_precedence(i, j, order)).collect(),
            },
            // The stochastic variants have no single realized timepoint
            // vector; the first (highest-severity) scenario stands in for
            // the documented per-task timepoints, and the aggregated value
            // stands in for `makespan`.
            EvaluatedSchedule::Stochastic(schedule) => Self {
                makespan: schedule.aggregated_value,
                timepoints: schedule
                    .per_scenario_timepoints
                    .first()
                    .map(|points| points.iter().map(|t| (t.start, t.finish)).collect())
                    .unwrap_or_default(),
                precedence_set_by_mutex: schedule.mutex_orders.iter().map(|&(i, j, order)| mutex_precedence(i, j, order)).collect(),
            },
        }
    }
}

fn mutex_precedence(i: usize, j: usize, order: MutexOrder) -> (usize, usize) {
    match order {
        MutexOrder::FirstThenSecond => (i, j),
        MutexOrder::SecondThenFirst => (j, i),
    }
}

#[derive(Debug, Serialize)]
pub struct StatisticsJson {
    pub nodes_generated: u64,
    pub nodes_evaluated: u64,
    pub nodes_expanded: u64,
    pub nodes_pruned: u64,
    pub nodes_deadend: u64,
}

impl From<SearchStatistics> for StatisticsJson {
    fn from(stats: SearchStatistics) -> Self {
        Self {
            nodes_generated: stats.nodes_generated,
            nodes_evaluated: stats.nodes_evaluated,
            nodes_expanded: stats.nodes_expanded,
            nodes_pruned: stats.nodes_pruned,
            nodes_deadend: stats.nodes_deadend,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultJson {
    pub allocation: Option<Vec<Vec<f64>>>,
    pub schedule: Option<ScheduleJson>,
    pub statistics: StatisticsJson,
    pub success: bool,
    pub failure: Option<Value>,
}

/// `FailureReason` carries no `Serialize` impl (it lives in `itags-core`,
/// which has no JSON-output concerns of its own); this renders each variant
/// into the same `{kind, ...fields}` shape by hand instead of deriving one
/// onto a type whose job is error propagation, not wire format.
fn failure_json(reason: &FailureReason) -> Value {
    match reason {
        FailureReason::InitialTransitionFailure { robot, task } => json!({"kind": "initial_transition_failure", "robot": robot, "task": task}),
        FailureReason::TransitionFailure { species, predecessor, successor } => {
            json!({"kind": "transition_failure", "species": species, "predecessor": predecessor, "successor": successor})
        }
        FailureReason::TaskDurationFailure { species, task } => json!({"kind": "task_duration_failure", "species": species, "task": task}),
        FailureReason::RobotTaskFailure { robot, task } => json!({"kind": "robot_task_failure", "robot": robot, "task": task}),
        FailureReason::RobotTaskPairFailure { robot, predecessor, successor } => {
            json!({"kind": "robot_task_pair_failure", "robot": robot, "predecessor": predecessor, "successor": successor})
        }
        FailureReason::SpeciesTaskFailure { species, task } => json!({"kind": "species_task_failure", "species": species, "task": task}),
        FailureReason::SpeciesTaskPairFailure { species, predecessor, successor } => {
            json!({"kind": "species_task_pair_failure", "species": species, "predecessor": predecessor, "successor": successor})
        }
        FailureReason::MilpInfeasible => json!({"kind": "milp_infeasible"}),
        FailureReason::MilpTimeout { has_incumbent } => json!({"kind": "milp_timeout", "has_incumbent": has_incumbent}),
        FailureReason::Compound(reasons) => json!({"kind": "compound", "reasons": reasons.iter().map(failure_json).collect::<Vec<_>>()}),
    }
}

/// Renders one [`SearchOutcome`] into the documented result shape.
pub fn render(outcome: SearchOutcome) -> ResultJson {
    let statistics = StatisticsJson::from(outcome.statistics);
    match outcome.result {
        SearchResult::Goal(goal) => ResultJson {
            allocation: Some(goal.allocation.to_float_matrix()),
            schedule: Some(ScheduleJson::from_evaluated(&goal.schedule)),
            statistics,
            success: true,
            failure: None,
        },
        SearchResult::Timeout { incumbent } => render_non_goal(incumbent, statistics, "search timed out before a goal allocation was found"),
        SearchResult::Exhausted { incumbent } => render_non_goal(incumbent, statistics, "the allocation search space was exhausted without a goal"),
    }
}

fn render_non_goal(incumbent: Option<itags_search::Incumbent>, statistics: StatisticsJson, reason: &str) -> ResultJson {
    match incumbent {
        Some(incumbent) => ResultJson {
            allocation: Some(incumbent.allocation.to_float_matrix()),
            schedule: Some(ScheduleJson::from_evaluated(&incumbent.schedule)),
            statistics,
            // An incumbent is a real, feasible (non-goal) schedule; it is
            // surfaced as success with no goal guarantee, mirroring the
            // scheduler's own "feasible_on_timeout" convention (spec §6).
            success: false,
            failure: Some(json!({"kind": "search_incomplete", "reason": reason})),
        },
        None => ResultJson {
            allocation: None,
            schedule: None,
            statistics,
            success: false,
            failure: Some(json!({"kind": "search_incomplete", "reason": reason})),
        },
    }
}

pub fn render_failure(statistics: StatisticsJson, reason: &FailureReason) -> ResultJson {
    ResultJson {
        allocation: None,
        schedule: None,
        statistics,
        success: false,
        failure: Some(failure_json(reason)),
    }
}
