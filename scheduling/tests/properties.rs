//! Property tests (spec §8 "Invariants (property tests)"): schedule
//! validity holds for every allocation the deterministic scheduler accepts,
//! independent of the specific chain length or task durations drawn.

use itags_core::params::{SchedulerParameters, SearchParameters};
use itags_core::{Allocation, Configuration, Plan, ProblemInputs, Robot, Species, Task};
use itags_oracle::EuclideanOracle;
use itags_scheduling::solve_deterministic;
use proptest::prelude::*;

fn deterministic_params() -> SchedulerParameters {
    serde_json::from_value(serde_json::json!({
        "config_type": "deterministic_milp_scheduler",
        "timeout": 10.0,
        "milp_timeout": 10.0,
    }))
    .unwrap()
}

fn search_params() -> SearchParameters {
    serde_json::from_value(serde_json::json!({
        "config_type": "best_first_search", "has_timeout": false, "timeout": 0.0, "timer_name": "t"
    }))
    .unwrap()
}

/// Builds a strict chain `t0 -> t1 -> ... -> t(n-1)`, one robot assigned to
/// every task in turn, with every configuration pinned to the origin so the
/// only thing driving the schedule is `durations` and the precedence edges
/// (spec §8 "Boundary behaviors": identity allocation on a total order).
fn chain_problem(durations: &[f64]) -> (ProblemInputs, Allocation) {
    let n = durations.len();
    let origin = Configuration::new(0.0, 0.0, 0.0);
    let tasks = durations
        .iter()
        .enumerate()
        .map(|(i, &d)| Task {
            name: format!("t{i}"),
            duration: d,
            desired_traits: vec![],
            linear_quality_coefficients: vec![],
            initial_configuration: origin,
            terminal_configuration: origin,
        })
        .collect();
    let species = Species {
        name: "s".into(),
        traits: vec![],
        bounding_radius: 0.1,
        speed: 1.0,
        motion_planner_index: 0,
    };
    let robots = vec![Robot {
        name: "r0".into(),
        species: 0,
        initial_configuration: origin,
    }];
    let edges: Vec<(usize, usize)> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
    let plan = Plan::new(n, None, &edges).unwrap();
    let problem = ProblemInputs {
        tasks,
        robots,
        species: vec![species],
        motion_planners: vec![],
        plan,
        use_reverse: false,
        best_schedule: None,
        worst_schedule: None,
        itags_parameters: search_params(),
        scheduler_parameters: deterministic_params(),
        trait_aggregation: vec![],
    };
    let mut allocation = Allocation::zeros(n, 1);
    for i in 0..n {
        allocation.set(i, 0, true);
    }
    (problem, allocation)
}

proptest! {
    /// Every finish time equals its start plus the task's own duration, every
    /// precedence edge is respected (`start(succ) >= finish(pred)`), and the
    /// reported makespan equals the maximum finish time (spec §8 "Schedule
    /// validity").
    #[test]
    fn schedule_validity_holds_over_random_chains(durations in prop::collection::vec(0.1f64..20.0, 1..8)) {
        let (problem, allocation) = chain_problem(&durations);
        let oracle = EuclideanOracle::from_problem(&problem);
        let schedule = solve_deterministic(&problem, &allocation, &oracle).unwrap();

        for (i, &d) in durations.iter().enumerate() {
            prop_assert!((schedule.finish(i) - (schedule.start(i) + d)).abs() < 1e-6);
        }
        for i in 0..durations.len().saturating_sub(1) {
            prop_assert!(schedule.start(i + 1) + 1e-6 >= schedule.finish(i));
        }
        let max_finish = (0..durations.len()).map(|i| schedule.finish(i)).fold(0.0f64, f64::max);
        prop_assert!((schedule.makespan - max_finish).abs() < 1e-6);
    }

    /// The identity allocation's makespan on a total order is exactly the
    /// sum of task durations when every configuration coincides (no travel
    /// component at all), matching the chain's critical path (spec §8
    /// "Boundary behaviors").
    #[test]
    fn chain_makespan_is_sum_of_durations_with_no_travel(durations in prop::collection::vec(0.1f64..20.0, 1..8)) {
        let (problem, allocation) = chain_problem(&durations);
        let oracle = EuclideanOracle::from_problem(&problem);
        let schedule = solve_deterministic(&problem, &allocation, &oracle).unwrap();
        let total: f64 = durations.iter().sum();
        prop_assert!((schedule.makespan - total).abs() < 1e-4);
    }
}
