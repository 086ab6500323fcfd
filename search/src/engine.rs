//! The allocation search driver (spec §4.5): best-first search over
//! allocation matrices, expanding one flipped cell at a time, pruning before
//! the scheduler is invoked where possible, and honoring timeouts at every
//! pop and before every child evaluation (spec §5 "Suspension points").

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::Duration;

use hashbrown::HashSet;
use itags_core::params::{FocalAStarParameters, SearchParameters};
use itags_core::{Allocation, ProblemInputs, Timekeeper};
use itags_oracle::MotionDurationOracle;
use itags_scheduling::{empty_allocation_makespan, worst_case_makespan};
use tracing::trace;

use crate::heuristic::{node_value, normalized_allocation_quality, normalized_schedule_quality};
use crate::node::{Flip, QueuedNode, SearchNode};
use crate::pruning::{prunes_for_no_trait_improvement, FailureMemory};
use crate::schedule::EvaluatedSchedule;
use crate::statistics::SearchStatistics;

/// An optional ceiling on how far a node's `NormalizedScheduleQuality` may
/// trail the best seen so far before it is dropped from the open set (spec
/// §4.5 "Post-evaluation pruning"). Not part of the documented schema; a
/// negative value (the default) disables the ceiling.
static NSQ_CEILING_MARGIN: env_param::EnvParam<f64> = env_param::EnvParam::new("ITAGS_SEARCH_NSQ_CEILING_MARGIN", "-1");

/// A found goal: its allocation and the schedule that proved it one.
#[derive(Debug, Clone)]
pub struct GoalResult {
    pub allocation: Allocation,
    pub schedule: EvaluatedSchedule,
}

/// The best non-goal node evaluated before a timeout or search-space
/// exhaustion, surfaced per spec §5 "Cancellation": "the best incumbent is
/// returned if permitted; otherwise a typed timeout is returned."
#[derive(Debug, Clone)]
pub struct Incumbent {
    pub allocation: Allocation,
    pub schedule: EvaluatedSchedule,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub enum SearchResult {
    Goal(GoalResult),
    /// The search timer exceeded its budget before a goal was found.
    Timeout { incumbent: Option<Incumbent> },
    /// The open set emptied without ever finding a goal (the instance is
    /// infeasible under this allocation search, independent of any timeout).
    Exhausted { incumbent: Option<Incumbent> },
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub result: SearchResult,
    pub statistics: SearchStatistics,
}

fn is_goal(problem: &ProblemInputs, allocation: &Allocation) -> bool {
    (0..problem.num_tasks()).all(|task| {
        let coalition = allocation.coalition(task);
        !coalition.is_empty() && problem.coalition_satisfies_traits(task, &coalition)
    })
}

fn successors(problem: &ProblemInputs, allocation: &Allocation) -> Vec<Flip> {
    let mut flips = Vec::new();
    for task in 0..allocation.num_tasks() {
        for robot in 0..allocation.num_robots() {
            let assigned = allocation.get(task, robot);
            if problem.use_reverse == assigned {
                flips.push((task, robot));
            }
        }
    }
    flips
}

/// Runs the allocation search to completion, a timeout, or exhaustion,
/// dispatching on the `config_type` named by `problem.itags_parameters`
/// (spec §6 "Search parameters (enumerated)").
pub fn search(problem: &ProblemInputs, oracle: &impl MotionDurationOracle, timekeeper: &Timekeeper) -> SearchOutcome {
    match &problem.itags_parameters {
        SearchParameters::BestFirstSearch(_) => search_best_first(problem, oracle, timekeeper),
        SearchParameters::FocalAStar(params) => search_focal(problem, oracle, timekeeper, params),
    }
}

fn search_best_first(problem: &ProblemInputs, oracle: &impl MotionDurationOracle, timekeeper: &Timekeeper) -> SearchOutcome {
    let common = problem.itags_parameters.common();
    let timer_name = common.timer_name.as_str();
    let budget = Duration::from_secs_f64(common.timeout.max(0.0));
    let timed_out = |tk: &Timekeeper| common.has_timeout && tk.exceeded(timer_name, budget);

    let robot_species: Vec<usize> = problem.robots.iter().map(|r| r.species).collect();
    let makespan_best = empty_allocation_makespan(problem, &problem.plan);
    let makespan_worst = worst_case_makespan(problem, &problem.plan);
    let ceiling_margin = NSQ_CEILING_MARGIN.get();

    let mut stats = SearchStatistics::default();
    let mut next_id: u64 = 0;
    let mut open: BinaryHeap<QueuedNode> = BinaryHeap::new();
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    let mut memory = FailureMemory::new();
    let mut incumbent: Option<Incumbent> = None;
    let mut best_nsq_seen = 1.0f64;

    timekeeper.start(timer_name);

    macro_rules! finish {
        ($result:expr) => {{
            timekeeper.stop(timer_name);
            return SearchOutcome {
                result: $result,
                statistics: stats,
            };
        }};
    }

    let root = SearchNode::root(problem, next_id);
    next_id += 1;
    stats.nodes_generated += 1;
    seen.insert(root.allocation.canonical_bytes());

    match evaluate_and_classify(problem, oracle, &root, makespan_best, makespan_worst, &mut stats, &mut memory, &robot_species) {
        Some((schedule, value)) => {
            if is_goal(problem, &root.allocation) {
                finish!(SearchResult::Goal(GoalResult {
                    allocation: root.allocation.clone(),
                    schedule,
                }));
            }
            root.set_value(value);
            incumbent = Some(Incumbent {
                allocation: root.allocation.clone(),
                schedule,
                value,
            });
            open.push(QueuedNode { node: root, priority: value });
        }
        None => finish!(SearchResult::Exhausted { incumbent }),
    }

    while let Some(QueuedNode { node, .. }) = open.pop() {
        if timed_out(timekeeper) {
            finish!(SearchResult::Timeout { incumbent });
        }

        stats.nodes_expanded += 1;
        trace!(node_id = node.id, value = node.value(), "expanding search node");

        for flip in successors(problem, &node.allocation) {
            if timed_out(timekeeper) {
                finish!(SearchResult::Timeout { incumbent });
            }

            let candidate_allocation = node.allocation.with_flipped(flip.0, flip.1);
            let key = candidate_allocation.canonical_bytes();
            if !seen.insert(key) {
                continue;
            }
            stats.nodes_generated += 1;

            let (task, robot) = flip;
            let species = problem.robots[robot].species;
            if memory.should_prune(task, robot, species, &node.allocation) {
                stats.nodes_pruned += 1;
                continue;
            }
            if prunes_for_no_trait_improvement(problem, &node.allocation, &candidate_allocation, task, !problem.use_reverse) {
                stats.nodes_pruned += 1;
                continue;
            }

            let child = SearchNode::child(&node, flip, next_id);
            next_id += 1;

            match evaluate_and_classify(problem, oracle, &child, makespan_best, makespan_worst, &mut stats, &mut memory, &robot_species) {
                None => continue,
                Some((schedule, value)) => {
                    if is_goal(problem, &child.allocation) {
                        finish!(SearchResult::Goal(GoalResult {
                            allocation: child.allocation.clone(),
                            schedule,
                        }));
                    }

                    let nsq = normalized_schedule_quality(schedule.makespan(), makespan_best, makespan_worst);
                    best_nsq_seen = best_nsq_seen.min(nsq);
                    if ceiling_margin >= 0.0 && nsq > best_nsq_seen + ceiling_margin {
                        stats.nodes_pruned += 1;
                        continue;
                    }

                    child.set_value(value);
                    if incumbent.as_ref().map_or(true, |i| value < i.value) {
                        incumbent = Some(Incumbent {
                            allocation: child.allocation.clone(),
                            schedule: schedule.clone(),
                            value,
                        });
                    }
                    open.push(QueuedNode { node: child, priority: value });
                }
            }
        }
    }

    finish!(SearchResult::Exhausted { incumbent });
}

/// Focal search (spec §6 "Focal-A*"). Like best-first search, the node
/// expanded each iteration is not necessarily the open set's lowest-`f(n)`
/// node: every node whose `f(n)` falls within `w` times the open set's
/// current minimum forms the *focal list*, and the focal list is searched by
/// a secondary criterion instead of raw `f`. This domain has no MAPF-style
/// "conflict count" to break focal ties with, so the secondary criterion
/// here is the node's own `NormalizedAllocationQuality` (ties broken by node
/// id for determinism) — the project's existing measure of how close a
/// coalition assignment is to satisfying every task's desired traits. This
/// choice of secondary key is recorded as an Open Question decision.
///
/// `rebuild` governs how the focal list tracks the moving bound: `true`
/// recomputes it from scratch every iteration, so it always matches the
/// current bound exactly; `false` only grows it as newly eligible nodes
/// appear, never evicting a member whose `f(n)` has drifted back out of
/// bound, trading exactness for not re-scanning the open set on every pop.
fn search_focal(
    problem: &ProblemInputs,
    oracle: &impl MotionDurationOracle,
    timekeeper: &Timekeeper,
    params: &FocalAStarParameters,
) -> SearchOutcome {
    let common = &params.best_first.common;
    let timer_name = common.timer_name.as_str();
    let budget = Duration::from_secs_f64(common.timeout.max(0.0));
    let timed_out = |tk: &Timekeeper| common.has_timeout && tk.exceeded(timer_name, budget);
    // A sub-unity bound would make the focal list narrower than the open
    // set's own minimum, which is never well-formed.
    let w = params.w.max(1.0);

    let robot_species: Vec<usize> = problem.robots.iter().map(|r| r.species).collect();
    let makespan_best = empty_allocation_makespan(problem, &problem.plan);
    let makespan_worst = worst_case_makespan(problem, &problem.plan);

    let mut stats = SearchStatistics::default();
    let mut next_id: u64 = 0;
    let mut open: Vec<Rc<SearchNode>> = Vec::new();
    let mut focal_ids: HashSet<u64> = HashSet::new();
    let mut seen: HashSet<Vec<u8>> = HashSet::new();
    let mut memory = FailureMemory::new();
    let mut incumbent: Option<Incumbent> = None;

    timekeeper.start(timer_name);

    macro_rules! finish {
        ($result:expr) => {{
            timekeeper.stop(timer_name);
            return SearchOutcome {
                result: $result,
                statistics: stats,
            };
        }};
    }

    let root = SearchNode::root(problem, next_id);
    next_id += 1;
    stats.nodes_generated += 1;
    seen.insert(root.allocation.canonical_bytes());

    match evaluate_and_classify(problem, oracle, &root, makespan_best, makespan_worst, &mut stats, &mut memory, &robot_species) {
        Some((schedule, value)) => {
            if is_goal(problem, &root.allocation) {
                finish!(SearchResult::Goal(GoalResult {
                    allocation: root.allocation.clone(),
                    schedule,
                }));
            }
            root.set_value(value);
            incumbent = Some(Incumbent {
                allocation: root.allocation.clone(),
                schedule,
                value,
            });
            open.push(root);
        }
        None => finish!(SearchResult::Exhausted { incumbent }),
    }

    let mut first_iteration = true;
    while !open.is_empty() {
        if timed_out(timekeeper) {
            finish!(SearchResult::Timeout { incumbent });
        }

        let f_min = open.iter().filter_map(|n| n.value()).fold(f64::INFINITY, f64::min);
        let bound = f_min * w;

        // `rebuild` (or the very first pass, which must populate the focal
        // list from nothing) recomputes the focal set exactly; otherwise we
        // only ever add newly-eligible members.
        if params.rebuild || first_iteration {
            focal_ids.clear();
        }
        for n in &open {
            if n.value().map_or(false, |v| v <= bound) {
                focal_ids.insert(n.id);
            }
        }
        first_iteration = false;

        // `f_min`'s own node always satisfies `value <= bound` since
        // `bound = f_min * w` with `w >= 1.0`, so this is always populated.
        let chosen_index = open
            .iter()
            .enumerate()
            .filter(|(_, n)| focal_ids.contains(&n.id))
            .min_by(|(_, a), (_, b)| {
                let qa = normalized_allocation_quality(problem, &a.allocation);
                let qb = normalized_allocation_quality(problem, &b.allocation);
                qa.partial_cmp(&qb).unwrap_or(Ordering::Equal).then_with(|| a.id.cmp(&b.id))
            })
            .map(|(i, _)| i)
            .expect("focal list always contains at least the open set's own minimum-f node");

        let node = open.remove(chosen_index);
        focal_ids.remove(&node.id);

        stats.nodes_expanded += 1;
        trace!(node_id = node.id, value = node.value(), "expanding focal search node");

        for flip in successors(problem, &node.allocation) {
            if timed_out(timekeeper) {
                finish!(SearchResult::Timeout { incumbent });
            }

            let candidate_allocation = node.allocation.with_flipped(flip.0, flip.1);
            let key = candidate_allocation.canonical_bytes();
            if !seen.insert(key) {
                continue;
            }
            stats.nodes_generated += 1;

            let (task, robot) = flip;
            let species = problem.robots[robot].species;
            if memory.should_prune(task, robot, species, &node.allocation) {
                stats.nodes_pruned += 1;
                continue;
            }
            if prunes_for_no_trait_improvement(problem, &node.allocation, &candidate_allocation, task, !problem.use_reverse) {
                stats.nodes_pruned += 1;
                continue;
            }

            let child = SearchNode::child(&node, flip, next_id);
            next_id += 1;

            match evaluate_and_classify(problem, oracle, &child, makespan_best, makespan_worst, &mut stats, &mut memory, &robot_species) {
                None => continue,
                Some((schedule, value)) => {
                    if is_goal(problem, &child.allocation) {
                        finish!(SearchResult::Goal(GoalResult {
                            allocation: child.allocation.clone(),
                            schedule,
                        }));
                    }

                    child.set_value(value);
                    if incumbent.as_ref().map_or(true, |i| value < i.value) {
                        incumbent = Some(Incumbent {
                            allocation: child.allocation.clone(),
                            schedule: schedule.clone(),
                            value,
                        });
                    }
                    open.push(child);
                }
            }
        }
    }

    finish!(SearchResult::Exhausted { incumbent });
}

#[cfg(test)]
mod tests {
    use super::*;
    use itags_core::params::{CommonSearchParameters, DeterministicMilpSchedulerParameters, SchedulerParameters, SearchParameters};
    use itags_core::{Configuration, Robot, Species, Task, TraitAggregation};
    use itags_oracle::MockOracle;

    fn search_params() -> SearchParameters {
        SearchParameters::BestFirstSearch(itags_core::params::BestFirstSearchParameters {
            common: CommonSearchParameters {
                has_timeout: false,
                timeout: 0.0,
                timer_name: "t".into(),
            },
            save_pruned_nodes: false,
            save_closed_nodes: false,
        })
    }

    fn scheduler_params(timeout: f64, return_feasible_on_timeout: bool) -> SchedulerParameters {
        SchedulerParameters::DeterministicMilpScheduler(DeterministicMilpSchedulerParameters {
            common: itags_core::params::CommonMilpParameters {
                timeout,
                milp_timeout: timeout,
                threads: 0,
                mip_gap: -1.0,
                heuristic_time: -1.0,
                method: -1,
                return_feasible_on_timeout,
            },
            use_hierarchical_objective: false,
        })
    }

    fn origin() -> Configuration {
        Configuration::new(0.0, 0.0, 0.0)
    }

    /// Spec §8 scenario 6: a single robot's initial transition to a task is
    /// infeasible, so the scheduler must report `InitialTransitionFailure`
    /// and the search must thereafter prune any allocation that assigns
    /// that robot to that task instead of re-invoking the scheduler on it.
    ///
    /// The task needs a capacity of 2.0, each robot contributes 1.0, so
    /// neither robot alone is a goal: the search is forced to explore
    /// adding r0 on top of an already-assigned r1, which is exactly the
    /// allocation that must hit the pruned (robot 0, task 0) pair a second
    /// time instead of re-invoking the scheduler.
    #[test]
    fn infeasible_initial_transition_is_pruned_on_every_later_occurrence() {
        let species = Species {
            name: "s".into(),
            traits: vec![1.0],
            bounding_radius: 0.2,
            speed: 0.2,
            motion_planner_index: 0,
        };
        let task = Task {
            name: "t0".into(),
            duration: 1.0,
            desired_traits: vec![2.0],
            linear_quality_coefficients: vec![],
            initial_configuration: origin(),
            terminal_configuration: origin(),
        };
        let robots = vec![
            Robot {
                name: "r0".into(),
                species: 0,
                initial_configuration: origin(),
            },
            Robot {
                name: "r1".into(),
                species: 0,
                initial_configuration: origin(),
            },
        ];
        let problem = ProblemInputs {
            tasks: vec![task],
            robots,
            species: vec![species],
            motion_planners: vec![],
            plan: itags_core::Plan::new(1, None, &[]).unwrap(),
            use_reverse: false,
            best_schedule: None,
            worst_schedule: None,
            itags_parameters: search_params(),
            scheduler_parameters: scheduler_params(30.0, false),
            trait_aggregation: vec![TraitAggregation::Capacity],
        };

        let mut oracle = MockOracle::new();
        // r0's initial transition is left unset (infeasible by default); r1's
        // is authoritatively feasible, and r1 alone still falls short of the
        // 2.0 capacity target, so the search must go on to retry r0.
        oracle.set_initial("r1", &origin(), 0.0);
        oracle.set_task_duration("t0", 1.0);

        let timekeeper = itags_core::Timekeeper::new();
        let outcome = search(&problem, &oracle, &timekeeper);

        assert!(matches!(outcome.result, SearchResult::Exhausted { .. }));
        assert_eq!(outcome.statistics.nodes_deadend, 1);
        assert_eq!(outcome.statistics.nodes_pruned, 1);
    }

    /// Spec §8 scenario 5: with `return_feasible_on_timeout=false` a search
    /// that exceeds its own budget before finding a goal reports a typed
    /// timeout carrying the best incumbent found so far, rather than success.
    #[test]
    fn exceeded_timeout_surfaces_as_timeout_with_incumbent() {
        let species = Species {
            name: "s".into(),
            traits: vec![],
            bounding_radius: 0.2,
            speed: 0.2,
            motion_planner_index: 0,
        };
        // An unsatisfiable desired trait (no species reaches 2.0) means the
        // search can never find a goal node and must run until its own
        // timer trips.
        let task = Task {
            name: "t0".into(),
            duration: 1.0,
            desired_traits: vec![2.0],
            linear_quality_coefficients: vec![],
            initial_configuration: origin(),
            terminal_configuration: origin(),
        };
        let robot = Robot {
            name: "r0".into(),
            species: 0,
            initial_configuration: origin(),
        };
        let mut search_params = search_params();
        if let SearchParameters::BestFirstSearch(p) = &mut search_params {
            p.common.has_timeout = true;
            p.common.timeout = 0.0;
        }
        let problem = ProblemInputs {
            tasks: vec![task],
            robots: vec![robot],
            species: vec![species],
            motion_planners: vec![],
            plan: itags_core::Plan::new(1, None, &[]).unwrap(),
            use_reverse: false,
            best_schedule: None,
            worst_schedule: None,
            itags_parameters: search_params,
            scheduler_parameters: scheduler_params(30.0, false),
            trait_aggregation: vec![TraitAggregation::Capability],
        };

        let mut oracle = MockOracle::new();
        oracle.set_initial("r0", &origin(), 0.0);
        oracle.set_task_duration("t0", 1.0);

        let timekeeper = itags_core::Timekeeper::new();
        let outcome = search(&problem, &oracle, &timekeeper);

        match outcome.result {
            SearchResult::Timeout { incumbent } => assert!(incumbent.is_some()),
            other => panic!("expected a timeout with an incumbent, got {other:?}"),
        }
    }

    /// A `focal_a_star` problem document must actually run the focal-list
    /// loop, not silently fall back to plain best-first search: this instance
    /// has two tasks each satisfiable by either of two robots, so more than
    /// one allocation reaches the goal, and the search must still find one.
    #[test]
    fn focal_a_star_config_type_finds_a_goal() {
        let species = Species {
            name: "s".into(),
            traits: vec![1.0],
            bounding_radius: 0.2,
            speed: 0.2,
            motion_planner_index: 0,
        };
        let tasks = vec![
            Task {
                name: "t0".into(),
                duration: 1.0,
                desired_traits: vec![1.0],
                linear_quality_coefficients: vec![],
                initial_configuration: origin(),
                terminal_configuration: origin(),
            },
            Task {
                name: "t1".into(),
                duration: 1.0,
                desired_traits: vec![1.0],
                linear_quality_coefficients: vec![],
                initial_configuration: origin(),
                terminal_configuration: origin(),
            },
        ];
        let robots = vec![
            Robot {
                name: "r0".into(),
                species: 0,
                initial_configuration: origin(),
            },
            Robot {
                name: "r1".into(),
                species: 0,
                initial_configuration: origin(),
            },
        ];
        let focal_params = SearchParameters::FocalAStar(itags_core::params::FocalAStarParameters {
            best_first: itags_core::params::BestFirstSearchParameters {
                common: CommonSearchParameters {
                    has_timeout: false,
                    timeout: 0.0,
                    timer_name: "t".into(),
                },
                save_pruned_nodes: false,
                save_closed_nodes: false,
            },
            w: 1.5,
            rebuild: true,
        });
        let problem = ProblemInputs {
            tasks,
            robots,
            species: vec![species],
            motion_planners: vec![],
            plan: itags_core::Plan::new(2, None, &[]).unwrap(),
            use_reverse: false,
            best_schedule: None,
            worst_schedule: None,
            itags_parameters: focal_params,
            scheduler_parameters: scheduler_params(30.0, false),
            trait_aggregation: vec![TraitAggregation::Capability],
        };

        let mut oracle = MockOracle::new();
        oracle.set_initial("r0", &origin(), 0.0);
        oracle.set_initial("r1", &origin(), 0.0);
        oracle.set_task_duration("t0", 1.0);
        oracle.set_task_duration("t1", 1.0);
        oracle.set_transition("r0", &origin(), &origin(), 0.0);
        oracle.set_transition("r1", &origin(), &origin(), 0.0);

        let timekeeper = itags_core::Timekeeper::new();
        let outcome = search(&problem, &oracle, &timekeeper);

        assert!(matches!(outcome.result, SearchResult::Goal(_)));
    }

    /// `rebuild=false` must still reach a goal: the focal list is allowed to
    /// lag the bound between rebuilds, but it can never starve the search.
    #[test]
    fn focal_a_star_without_rebuild_still_finds_a_goal() {
        let species = Species {
            name: "s".into(),
            traits: vec![1.0],
            bounding_radius: 0.2,
            speed: 0.2,
            motion_planner_index: 0,
        };
        let task = Task {
            name: "t0".into(),
            duration: 1.0,
            desired_traits: vec![1.0],
            linear_quality_coefficients: vec![],
            initial_configuration: origin(),
            terminal_configuration: origin(),
        };
        let robot = Robot {
            name: "r0".into(),
            species: 0,
            initial_configuration: origin(),
        };
        let focal_params = SearchParameters::FocalAStar(itags_core::params::FocalAStarParameters {
            best_first: itags_core::params::BestFirstSearchParameters {
                common: CommonSearchParameters {
                    has_timeout: false,
                    timeout: 0.0,
                    timer_name: "t".into(),
                },
                save_pruned_nodes: false,
                save_closed_nodes: false,
            },
            w: 2.0,
            rebuild: false,
        });
        let problem = ProblemInputs {
            tasks: vec![task],
            robots: vec![robot],
            species: vec![species],
            motion_planners: vec![],
            plan: itags_core::Plan::new(1, None, &[]).unwrap(),
            use_reverse: false,
            best_schedule: None,
            worst_schedule: None,
            itags_parameters: focal_params,
            scheduler_parameters: scheduler_params(30.0, false),
            trait_aggregation: vec![TraitAggregation::Capability],
        };

        let mut oracle = MockOracle::new();
        oracle.set_initial("r0", &origin(), 0.0);
        oracle.set_task_duration("t0", 1.0);

        let timekeeper = itags_core::Timekeeper::new();
        let outcome = search(&problem, &oracle, &timekeeper);

        assert!(matches!(outcome.result, SearchResult::Goal(_)));
    }
}

/// Evaluates `node` (invoking the scheduler), folding a failure into
/// `memory`/`stats` and returning `None`, or returning its schedule and
/// `f(n)` value on success.
#[allow(clippy::too_many_arguments)]
fn evaluate_and_classify(
    problem: &ProblemInputs,
    oracle: &impl MotionDurationOracle,
    node: &Rc<SearchNode>,
    makespan_best: f64,
    makespan_worst: f64,
    stats: &mut SearchStatistics,
    memory: &mut FailureMemory,
    robot_species: &[usize],
) -> Option<(EvaluatedSchedule, f64)> {
    stats.nodes_evaluated += 1;
    match node.schedule(problem, oracle) {
        Err(reason) => {
            stats.nodes_deadend += 1;
            memory.record(reason, robot_species);
            None
        }
        Ok(schedule) => {
            let schedule = schedule.clone();
            let value = node_value(problem, &node.allocation, &schedule, makespan_best, makespan_worst);
            Some((schedule, value))
        }
    }
}
