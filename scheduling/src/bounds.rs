use itags_core::{Plan, ProblemInputs};

/// The schedule quality an empty allocation (no robots assigned anywhere)
/// would realize: the critical path of task durations under precedence
/// alone, with no motion transitions at all (spec §8 "Boundary
/// behaviors"). Used as the `makespan_best` anchor for
/// `NormalizedScheduleQuality` (spec §4.5).
pub fn empty_allocation_makespan(problem: &ProblemInputs, plan: &Plan) -> f64 {
    let n = plan.len();
    let mut finish = vec![0.0f64; n];
    // `direct_edges` alone is not a topological order; walk local indices
    // in increasing order, which is a valid topological order here because
    // `Plan` rejects any precedence edge that would make it one.
    for i in 0..n {
        let duration = problem.tasks[plan.global_index(i)].duration;
        let mut start = 0.0f64;
        for &(pred, succ) in plan.direct_edges() {
            if succ == i {
                start = start.max(finish[pred]);
            }
        }
        finish[i] = start + duration;
    }
    finish.into_iter().fold(0.0, f64::max)
}

/// The configuration diameter: the largest pairwise Euclidean distance among
/// every configuration the instance mentions (robot starts, task initial and
/// terminal configurations). Geometry is opaque to the core (spec §3), so
/// this is the only instance-derived quantity available for a coarse
/// worst-case transition bound.
fn configuration_diameter(problem: &ProblemInputs) -> f64 {
    let mut points = Vec::with_capacity(problem.robots.len() + problem.tasks.len() * 2);
    for robot in &problem.robots {
        points.push(robot.initial_configuration);
    }
    for task in &problem.tasks {
        points.push(task.initial_configuration);
        points.push(task.terminal_configuration);
    }
    let mut diameter = 0.0f64;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            diameter = diameter.max(points[i].euclidean_distance(&points[j]));
        }
    }
    diameter
}

/// The slowest (smallest positive) species speed in the instance, used as
/// the denominator of the worst-case transition-time bound. A species with
/// non-positive speed cannot move at all and is excluded, matching the
/// oracle's own infeasibility convention for `speed <= 0`.
fn slowest_positive_speed(problem: &ProblemInputs) -> Option<f64> {
    problem.species.iter().map(|s| s.speed).filter(|&s| s > 0.0).fold(None, |acc, s| {
        Some(acc.map_or(s, |a: f64| a.min(s)))
    })
}

/// An upper bound on any feasible makespan for this instance: every task's
/// static duration plus, for every possible transition, the slowest robot
/// crossing the instance's configuration diameter (spec §4.3 "big-M =
/// worst-case-makespan of the instance"). Safe to use as the Big-M constant
/// in the mutex disjunction and as the `makespan_worst` anchor for
/// `NormalizedScheduleQuality`.
pub fn worst_case_makespan(problem: &ProblemInputs, plan: &Plan) -> f64 {
    let n = plan.len();
    let total_duration: f64 = (0..n).map(|i| problem.tasks[plan.global_index(i)].duration).sum();
    let diameter = configuration_diameter(problem);
    let max_transition = match slowest_positive_speed(problem) {
        Some(speed) => diameter / speed,
        None => return f64::INFINITY,
    };
    // Each of the n tasks contributes at most one incoming transition (its
    // initial approach or a predecessor hop); (n + 1) is a deliberately
    // loose bound rather than a tight count of precedence/mutex edges.
    total_duration + (n as f64 + 1.0) * max_transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use itags_core::{Configuration, Robot, Species, Task};

    fn task(duration: f64) -> Task {
        Task {
            name: "t".into(),
            duration,
            desired_traits: vec![],
            linear_quality_coefficients: vec![],
            initial_configuration: Configuration::new(0.0, 0.0, 0.0),
            terminal_configuration: Configuration::new(0.0, 0.0, 0.0),
        }
    }

    fn problem_with_tasks(tasks: Vec<Task>, edges: &[(usize, usize)]) -> (ProblemInputs, Plan) {
        let n = tasks.len();
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
            initial_configuration: Configuration::new(0.0, 0.0, 0.0),
        }];
        let plan = Plan::new(n, None, edges).unwrap();
        let problem = ProblemInputs {
            tasks,
            robots,
            species: vec![species],
            motion_planners: vec![],
            plan: plan.clone(),
            use_reverse: false,
            best_schedule: None,
            worst_schedule: None,
            itags_parameters: test_search_params(),
            scheduler_parameters: test_scheduler_params(),
            trait_aggregation: vec![],
        };
        (problem, plan)
    }

    fn test_search_params() -> itags_core::params::SearchParameters {
        serde_json::from_value(serde_json::json!({
            "config_type": "best_first_search", "has_timeout": false, "timeout": 0.0, "timer_name": "t"
        }))
        .unwrap()
    }

    fn test_scheduler_params() -> itags_core::params::SchedulerParameters {
        serde_json::from_value(serde_json::json!({
            "config_type": "deterministic_milp_scheduler", "timeout": 1.0, "milp_timeout": 1.0
        }))
        .unwrap()
    }

    #[test]
    fn empty_allocation_is_critical_path() {
        let (problem, plan) = problem_with_tasks(vec![task(3.0), task(4.0), task(2.0)], &[(0, 1), (1, 2)]);
        assert!((empty_allocation_makespan(&problem, &plan) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn empty_allocation_takes_max_over_branches() {
        let (problem, plan) = problem_with_tasks(vec![task(3.0), task(10.0), task(1.0)], &[(0, 1), (0, 2)]);
        assert!((empty_allocation_makespan(&problem, &plan) - 13.0).abs() < 1e-9);
    }

    #[test]
    fn worst_case_is_at_least_total_duration() {
        let (problem, plan) = problem_with_tasks(vec![task(3.0), task(4.0)], &[(0, 1)]);
        assert!(worst_case_makespan(&problem, &plan) >= 7.0);
    }
}
