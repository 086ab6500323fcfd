//! The Benders-decomposed stochastic variant (spec §4.4 "Benders variant"):
//! a master over mutex orientations plus a worst-case-makespan variable,
//! and closed-form per-scenario subproblems solved as a longest-path
//! recursion rather than an LP, since `good_lp`/CBC exposes no lazy-
//! constraint callback to hang a textbook Benders loop off of.

use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::{constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};
use hashbrown::HashMap;
use itags_core::params::CommonMilpParameters;
use itags_core::{Allocation, FailureReason, ProblemInputs};
use itags_oracle::MotionDurationOracle;
use rayon::prelude::*;
use tracing::trace;

use super::StochasticSchedule;
use crate::bounds::worst_case_makespan;
use crate::milp_common::{apply_common_parameters, big_m_margin, TransitionTable};
use crate::mutex::{MutexOrder, MutexSet};
use crate::schedule::Timepoint;
use crate::scenario::{Scenario, ScenarioOracle};
use crate::task_info::TaskInfo;

static MAX_ITERATIONS: env_param::EnvParam<u32> = env_param::EnvParam::new("ITAGS_BENDERS_MAX_ITERATIONS", "200");

const CUT_TOLERANCE: f64 = 1e-6;

/// One linear Benders cut over the master's `p_ij` variables: `theta >=
/// constant + sum(coefficient * p_ij)`, derived from a scenario's critical
/// path under a fixed mutex orientation.
struct Cut {
    terms: Vec<(usize, usize, f64)>,
    constant: f64,
}

#[derive(Clone, Copy)]
enum Incoming {
    Source,
    Precedence { from: usize },
    /// `i -> j` if `forward`, else `j -> i`; `pair` is always `(i, j)` with
    /// `i < j` to match the mutex indicator's sign convention.
    Mutex { pair: (usize, usize), forward: bool },
}

struct CriticalPath {
    finish: Vec<f64>,
    incoming: Vec<Incoming>,
}

/// Longest-path recursion over the DAG formed by precedence edges plus the
/// mutex edges resolved by `assignment` (spec §4.4 "subproblem... solved in
/// closed form via the critical path"). `n + 1` relaxation passes bound the
/// longest simple path in an acyclic graph on `n` nodes.
fn critical_path(
    n: usize,
    task_infos: &[TaskInfo],
    precedence: &[(usize, usize)],
    transitions: &TransitionTable,
    mutexes: &MutexSet,
    assignment: &HashMap<(usize, usize), bool>,
) -> CriticalPath {
    let mut arrival: Vec<f64> = (0..n).map(|i| task_infos[i].lower_bound).collect();
    let mut incoming = vec![Incoming::Source; n];

    let mut edges: Vec<(usize, usize, f64, Incoming)> = Vec::with_capacity(precedence.len() + mutexes.len());
    for &(pred, succ) in precedence {
        edges.push((pred, succ, transitions.lower_bound(pred, succ), Incoming::Precedence { from: pred }));
    }
    for pair in mutexes.pairs() {
        let forward = assignment.get(&(pair.i, pair.j)).copied().unwrap_or(true);
        if forward {
            let kind = Incoming::Mutex {
                pair: (pair.i, pair.j),
                forward: true,
            };
            edges.push((pair.i, pair.j, transitions.lower_bound(pair.i, pair.j), kind));
        } else {
            let kind = Incoming::Mutex {
                pair: (pair.i, pair.j),
                forward: false,
            };
            edges.push((pair.j, pair.i, transitions.lower_bound(pair.j, pair.i), kind));
        }
    }

    for _ in 0..=n {
        let mut changed = false;
        for &(from, to, weight, kind) in &edges {
            let candidate = arrival[from] + task_infos[from].duration + weight;
            if candidate > arrival[to] + 1e-9 {
                arrival[to] = candidate;
                incoming[to] = kind;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let finish: Vec<f64> = (0..n).map(|i| arrival[i] + task_infos[i].duration).collect();
    CriticalPath { finish, incoming }
}

/// Walks the critical path backward from the makespan-realizing task,
/// building the big-M disjunctive terms that justify its length (spec §4.4
/// "dual values... approximated by critical-path membership"). Each mutex
/// edge on the path contributes a term valid for every `p_ij`, not just the
/// one the subproblem was solved against, so the resulting cut remains a
/// sound lower bound on `theta` everywhere, not only at the current master
/// solution.
fn build_cut(path: &CriticalPath, task_infos: &[TaskInfo], transitions: &TransitionTable, big_m: f64) -> Cut {
    let mut node = (0..path.finish.len()).max_by(|&a, &b| path.finish[a].partial_cmp(&path.finish[b]).unwrap()).unwrap();
    let mut terms: HashMap<(usize, usize), f64> = HashMap::new();
    let mut constant = 0.0f64;

    loop {
        match path.incoming[node] {
            Incoming::Source => {
                constant += task_infos[node].lower_bound;
                break;
            }
            Incoming::Precedence { from } => {
                constant += task_infos[from].duration + transitions.lower_bound(from, node);
                node = from;
            }
            Incoming::Mutex { pair, forward } => {
                let (i, j) = pair;
                if forward {
                    // finish[j] >= finish[i] + d_i + x_ij - M*(1 - p_ij)
                    constant += task_infos[i].duration + transitions.lower_bound(i, j) - big_m;
                    *terms.entry(pair).or_insert(0.0) += big_m;
                    node = i;
                } else {
                    // finish[i] >= finish[j] + d_j + x_ji - M*p_ij
                    constant += task_infos[j].duration + transitions.lower_bound(j, i);
                    *terms.entry(pair).or_insert(0.0) -= big_m;
                    node = j;
                }
            }
        }
    }

    Cut {
        terms: terms.into_iter().map(|((i, j), coeff)| (i, j, coeff)).collect(),
        constant,
    }
}

fn cut_expression(cut: &Cut, p_vars: &HashMap<(usize, usize), Variable>) -> Expression {
    cut.terms
        .iter()
        .fold(Expression::from(cut.constant), |acc, &(i, j, coeff)| acc + coeff * p_vars[&(i, j)])
}

/// Builds and solves the Benders-decomposed stochastic scheduler (spec
/// §4.4 "Benders variant"): an outer loop alternating a master MILP over
/// mutex orientations against closed-form per-scenario longest-path
/// subproblems (dispatched across scenarios with `rayon`, spec §4.4
/// "parallel variant"; cut accumulation is serialized after each round),
/// since CBC exposes no lazy-constraint callback to hang a textbook Benders
/// loop off of.
pub fn solve_benders(
    problem: &ProblemInputs,
    allocation: &Allocation,
    base_oracle: &impl MotionDurationOracle,
    scenarios: &[Scenario],
    common: &CommonMilpParameters,
) -> Result<StochasticSchedule, FailureReason> {
    let plan = &problem.plan;
    let n = plan.len();
    let mutexes = MutexSet::build(allocation, plan);
    let precedence: Vec<(usize, usize)> = plan.direct_edges().to_vec();
    let max_multiplier = scenarios.iter().map(|s| s.travel_time_multiplier).fold(1.0, f64::max);
    let big_m = worst_case_makespan(problem, plan) * big_m_margin() * max_multiplier;

    let mut per_scenario: Vec<(Vec<TaskInfo>, TransitionTable)> = Vec::with_capacity(scenarios.len());
    for &scenario in scenarios {
        let oracle = ScenarioOracle::new(base_oracle, scenario);
        let task_infos: Vec<TaskInfo> = (0..n)
            .map(|i| TaskInfo::setup(i, plan.global_index(i), allocation.coalition(i), problem, &oracle))
            .collect::<Result<_, _>>()?;
        let transitions = TransitionTable::build(problem, plan, allocation, &mutexes, &oracle)?;
        per_scenario.push((task_infos, transitions));
    }

    let mut cuts: Vec<Cut> = Vec::new();
    let mut assignment: HashMap<(usize, usize), bool> = HashMap::new();

    for iteration in 0..MAX_ITERATIONS.get() {
        let mut vars = ProblemVariables::new();
        let p_vars: HashMap<(usize, usize), Variable> =
            mutexes.pairs().iter().map(|pair| ((pair.i, pair.j), vars.add(variable().binary()))).collect();
        let theta = vars.add(variable().min(0.0));

        let mut model = coin_cbc(vars.minimise(theta));
        apply_common_parameters(&mut model, common);
        for cut in &cuts {
            model.add_constraint(constraint!(theta >= cut_expression(cut, &p_vars)));
        }

        let solution = model.solve().map_err(|_| FailureReason::MilpInfeasible)?;
        let theta_hat = solution.value(theta);
        for (&pair, &var) in &p_vars {
            assignment.insert(pair, solution.value(var) >= 0.5);
        }

        let violations: Vec<(usize, f64, CriticalPath)> = per_scenario
            .par_iter()
            .enumerate()
            .map(|(idx, (task_infos, transitions))| {
                let path = critical_path(n, task_infos, &precedence, transitions, &mutexes, &assignment);
                let makespan = path.finish.iter().copied().fold(0.0, f64::max);
                (idx, makespan, path)
            })
            .collect();

        let mut added = false;
        for (idx, makespan, path) in &violations {
            if *makespan > theta_hat + CUT_TOLERANCE {
                let (_, transitions) = &per_scenario[*idx];
                let cut = build_cut(path, &per_scenario[*idx].0, transitions, big_m);
                cuts.push(cut);
                added = true;
            }
        }

        if !added {
            trace!(iteration, theta_hat, "benders master converged");
            let per_scenario_makespans: Vec<f64> = violations.iter().map(|(_, makespan, _)| *makespan).collect();
            let aggregated_value = per_scenario_makespans.iter().copied().fold(0.0, f64::max);
            let mutex_orders = mutexes
                .pairs()
                .iter()
                .map(|pair| {
                    let forward = assignment.get(&(pair.i, pair.j)).copied().unwrap_or(true);
                    let order = if forward {
                        MutexOrder::FirstThenSecond
                    } else {
                        MutexOrder::SecondThenFirst
                    };
                    (pair.i, pair.j, order)
                })
                .collect();
            let per_scenario_timepoints = violations
                .iter()
                .map(|(idx, _, path)| {
                    let (task_infos, _) = &per_scenario[*idx];
                    (0..n)
                        .map(|i| Timepoint {
                            start: path.finish[i] - task_infos[i].duration,
                            finish: path.finish[i],
                        })
                        .collect()
                })
                .collect();
            return Ok(StochasticSchedule {
                per_scenario_makespans,
                aggregated_value,
                mutex_orders,
                per_scenario_timepoints,
            });
        }
        trace!(iteration, cuts = cuts.len(), "benders cut added, re-solving master");
    }

    Err(FailureReason::MilpTimeout { has_incumbent: false })
}
