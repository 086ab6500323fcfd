//! Node evaluation (spec §4.5 "Evaluation"): `f(n) = α·NAQ + (1−α)·NSQ`.

use itags_core::{Allocation, ProblemInputs};

use crate::schedule::EvaluatedSchedule;

/// Weight given to allocation quality over schedule quality in `f(n)`. Not
/// part of the documented schema (spec §6 lists no such knob under either
/// search variant), so it is a solver-internal tunable like the MILP ones in
/// `itags-scheduling::milp_common`.
static ALPHA: env_param::EnvParam<f64> = env_param::EnvParam::new("ITAGS_SEARCH_ALPHA", "0.5");

pub fn alpha() -> f64 {
    ALPHA.get()
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// `NormalizedScheduleQuality` (spec §4.5): `0` at `makespan_best`, `1` at
/// `makespan_worst`, clamped in between.
pub fn normalized_schedule_quality(makespan: f64, makespan_best: f64, makespan_worst: f64) -> f64 {
    let span = makespan_worst - makespan_best;
    if span <= 0.0 {
        return 0.0;
    }
    clamp01((makespan - makespan_best) / span)
}

/// `NormalizedAllocationQuality`: how far the allocation is from satisfying
/// every task's desired traits, weighted by that task's
/// `linear_quality_coefficients` (the only other per-task quality-relevant
/// field the schema carries — spec §3 "Task"). `0` when every task's
/// coalition fully dominates its desired-trait vector on every weighted
/// dimension (best), `1` when no task has any coalition at all (worst),
/// matching the same best=0/worst=1 convention as NSQ. Tasks with no desired
/// traits do not constrain the allocation and are excluded from the average.
///
/// The schema does not pin down this formula (spec §4.5 names only the
/// convex combination, not NAQ's internals); this is an explicit Open
/// Question decision, recorded in DESIGN.md.
pub fn normalized_allocation_quality(problem: &ProblemInputs, allocation: &Allocation) -> f64 {
    let mut weighted_total = 0.0;
    let mut considered_tasks = 0usize;

    for (task_index, task) in problem.tasks.iter().enumerate() {
        if task.desired_traits.is_empty() {
            continue;
        }
        considered_tasks += 1;
        let coalition = allocation.coalition(task_index);

        let mut task_weighted = 0.0;
        let mut weight_total = 0.0;
        for (trait_index, &desired) in task.desired_traits.iter().enumerate() {
            let policy = problem
                .trait_aggregation
                .get(trait_index)
                .copied()
                .unwrap_or(itags_core::TraitAggregation::Capability);
            let reduced = policy.reduce(coalition.iter().map(|&r| problem.robot_species(r).trait_value(trait_index)));
            let ratio = if desired <= 0.0 { 1.0 } else { clamp01(reduced / desired) };
            let weight = task.linear_quality_coefficients.get(trait_index).copied().unwrap_or(1.0).max(0.0);
            task_weighted += weight * ratio;
            weight_total += weight;
        }
        let task_quality = if weight_total > 0.0 { task_weighted / weight_total } else { 1.0 };
        weighted_total += task_quality;
    }

    let satisfaction = if considered_tasks == 0 { 1.0 } else { weighted_total / considered_tasks as f64 };
    clamp01(1.0 - satisfaction)
}

/// `f(n)`: the convex combination driving the open-set priority.
pub fn node_value(problem: &ProblemInputs, allocation: &Allocation, schedule: &EvaluatedSchedule, makespan_best: f64, makespan_worst: f64) -> f64 {
    let naq = normalized_allocation_quality(problem, allocation);
    let nsq = normalized_schedule_quality(schedule.makespan(), makespan_best, makespan_worst);
    let a = alpha();
    a * naq + (1.0 - a) * nsq
}

#[cfg(test)]
mod tests {
    use super::*;
    use itags_core::{Allocation, Configuration, ProblemInputs, Robot, Species, Task, TraitAggregation};

    fn problem() -> ProblemInputs {
        let species = Species {
            name: "s".into(),
            traits: vec![1.0],
            bounding_radius: 0.1,
            speed: 1.0,
            motion_planner_index: 0,
        };
        let robots = vec![Robot {
            name: "r0".into(),
            species: 0,
            initial_configuration: Configuration::new(0.0, 0.0, 0.0),
        }];
        let task = Task {
            name: "t0".into(),
            duration: 1.0,
            desired_traits: vec![1.0],
            linear_quality_coefficients: vec![1.0],
            initial_configuration: Configuration::new(0.0, 0.0, 0.0),
            terminal_configuration: Configuration::new(1.0, 0.0, 0.0),
        };
        let plan = itags_core::Plan::new(1, None, &[]).unwrap();
        ProblemInputs {
            tasks: vec![task],
            robots,
            species: vec![species],
            motion_planners: vec![],
            plan,
            use_reverse: false,
            best_schedule: None,
            worst_schedule: None,
            itags_parameters: serde_json::from_value(serde_json::json!({
                "config_type": "best_first_search", "has_timeout": false, "timeout": 0.0, "timer_name": "t"
            }))
            .unwrap(),
            scheduler_parameters: serde_json::from_value(serde_json::json!({
                "config_type": "deterministic_milp_scheduler", "timeout": 1.0, "milp_timeout": 1.0
            }))
            .unwrap(),
            trait_aggregation: vec![TraitAggregation::Capability],
        }
    }

    #[test]
    fn empty_allocation_is_worst_quality() {
        let problem = problem();
        let allocation = Allocation::zeros(1, 1);
        assert_eq!(normalized_allocation_quality(&problem, &allocation), 1.0);
    }

    #[test]
    fn fully_assigned_task_is_best_quality() {
        let problem = problem();
        let mut allocation = Allocation::zeros(1, 1);
        allocation.set(0, 0, true);
        assert!(normalized_allocation_quality(&problem, &allocation) < 1e-9);
    }

    #[test]
    fn schedule_quality_clamps_at_bounds() {
        assert_eq!(normalized_schedule_quality(5.0, 10.0, 20.0), 0.0);
        assert_eq!(normalized_schedule_quality(25.0, 10.0, 20.0), 1.0);
        assert!((normalized_schedule_quality(15.0, 10.0, 20.0) - 0.5).abs() < 1e-9);
    }
}
