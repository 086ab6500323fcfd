//! The single-scenario MILP scheduler (spec §4.3): builds a makespan-
//! minimizing MILP over task start times, precedence and mutex big-M
//! constraints, interleaved with lazy oracle refinements.

use std::time::{Duration, Instant};

use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::{constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};
use hashbrown::HashMap;
use itags_core::params::{CommonMilpParameters, SchedulerParameters};
use itags_core::{Allocation, FailureReason, Plan, ProblemInputs};
use itags_oracle::MotionDurationOracle;
use tracing::trace;

use crate::bounds::worst_case_makespan;
use crate::milp_common::{apply_common_parameters, big_m_margin, pool, TransitionTable};
use crate::mutex::{MutexOrder, MutexSet};
use crate::schedule::{Schedule, Timepoint};
use crate::status::UpdateOutcome;
use crate::task_info::TaskInfo;

enum Objective {
    /// Minimize the makespan variable directly.
    Makespan,
    /// Minimize the sum of start times, capping the makespan variable at
    /// `cap` (the hierarchical secondary objective, spec §4.3).
    SumOfStarts { cap: f64 },
}

struct SolvedModel {
    starts: Vec<f64>,
    makespan: f64,
    mutex_directions: Vec<(usize, usize, MutexOrder)>,
    feasible_on_timeout: bool,
}

#[allow(clippy::too_many_arguments)]
fn build_and_solve(
    plan: &Plan,
    task_infos: &[TaskInfo],
    transitions: &TransitionTable,
    mutexes: &MutexSet,
    big_m: f64,
    common: &CommonMilpParameters,
    objective: Objective,
) -> Result<SolvedModel, FailureReason> {
    let n = plan.len();
    let mut vars = ProblemVariables::new();
    let start_vars: Vec<Variable> = (0..n).map(|i| vars.add(variable().min(task_infos[i].lower_bound))).collect();
    let makespan_var = vars.add(variable().min(0.0));
    let mutex_vars: HashMap<(usize, usize), Variable> =
        mutexes.pairs().iter().map(|pair| ((pair.i, pair.j), vars.add(variable().binary()))).collect();

    let objective_expr: Expression = match objective {
        Objective::Makespan => makespan_var.into(),
        Objective::SumOfStarts { .. } => start_vars.iter().fold(Expression::from(0.0), |acc, &v| acc + v),
    };

    let mut model = coin_cbc(vars.minimise(objective_expr));
    apply_common_parameters(&mut model, common);

    if let Objective::SumOfStarts { cap } = objective {
        model.add_constraint(constraint!(makespan_var <= cap));
    }

    for &(pred, succ) in plan.direct_edges() {
        let duration = task_infos[pred].duration;
        let transition = transitions.lower_bound(pred, succ);
        model.add_constraint(constraint!(start_vars[succ] - start_vars[pred] >= duration + transition));
    }

    for pair in mutexes.pairs() {
        let p = mutex_vars[&(pair.i, pair.j)];
        let d_i = task_infos[pair.i].duration;
        let d_j = task_infos[pair.j].duration;
        let x_ij = transitions.lower_bound(pair.i, pair.j);
        let x_ji = transitions.lower_bound(pair.j, pair.i);
        // s_j - s_i >= d_i + x_ij - M*(1-p)  <=>  s_j - s_i - M*p >= d_i + x_ij - M
        model.add_constraint(constraint!(start_vars[pair.j] - start_vars[pair.i] - big_m * p >= d_i + x_ij - big_m));
        // s_i - s_j >= d_j + x_ji - M*p
        model.add_constraint(constraint!(start_vars[pair.i] - start_vars[pair.j] + big_m * p >= d_j + x_ji));
    }

    for i in 0..n {
        model.add_constraint(constraint!(makespan_var >= start_vars[i] + task_infos[i].duration));
    }

    let start = Instant::now();
    let solution = model.solve();
    let elapsed = start.elapsed();
    let timeout = Duration::from_secs_f64(common.milp_timeout.max(0.0));
    let timed_out = common.milp_timeout > 0.0 && elapsed >= timeout;

    let solution = match solution {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) if !timed_out => return Err(FailureReason::MilpInfeasible),
        Err(_) => return Err(FailureReason::MilpTimeout { has_incumbent: false }),
    };

    if timed_out && !common.return_feasible_on_timeout {
        return Err(FailureReason::MilpTimeout { has_incumbent: true });
    }

    let starts: Vec<f64> = start_vars.iter().map(|&v| solution.value(v)).collect();
    let makespan = (0..n).map(|i| starts[i] + task_infos[i].duration).fold(0.0, f64::max);
    let mutex_directions = mutexes
        .pairs()
        .iter()
        .map(|pair| {
            let realized = solution.value(mutex_vars[&(pair.i, pair.j)]).round();
            let order = if realized >= 0.5 {
                MutexOrder::FirstThenSecond
            } else {
                MutexOrder::SecondThenFirst
            };
            (pair.i, pair.j, order)
        })
        .collect();

    Ok(SolvedModel {
        starts,
        makespan,
        mutex_directions,
        feasible_on_timeout: timed_out,
    })
}

/// Runs the deterministic scheduler's lazy-refinement loop (spec §4.3
/// "Iteration") to fixpoint, rebuilding and re-solving the MILP after any
/// pass that raises a lower bound, since `good_lp` has no incremental
/// constraint-RHS mutation.
pub(crate) fn solve_core(
    problem: &ProblemInputs,
    allocation: &Allocation,
    oracle: &impl MotionDurationOracle,
    common: &CommonMilpParameters,
    hierarchical: bool,
) -> Result<Schedule, FailureReason> {
    let plan = &problem.plan;
    let n = plan.len();
    let _guard = pool(common.threads).acquire();

    let mut task_infos: Vec<TaskInfo> = (0..n)
        .map(|i| {
            let global = plan.global_index(i);
            let coalition = allocation.coalition(i);
            TaskInfo::setup(i, global, coalition, problem, oracle)
        })
        .collect::<Result<_, _>>()?;

    let mutexes = MutexSet::build(allocation, plan);
    let mut transitions = TransitionTable::build(problem, plan, allocation, &mutexes, oracle)?;
    let big_m = worst_case_makespan(problem, plan) * big_m_margin();

    loop {
        let makespan_solve = build_and_solve(plan, &task_infos, &transitions, &mutexes, big_m, common, Objective::Makespan)?;
        let solved = if hierarchical {
            build_and_solve(
                plan,
                &task_infos,
                &transitions,
                &mutexes,
                big_m,
                common,
                Objective::SumOfStarts { cap: makespan_solve.makespan },
            )?
        } else {
            makespan_solve
        };

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| solved.starts[a].partial_cmp(&solved.starts[b]).unwrap());

        let mut changed = false;
        for robot in 0..problem.num_robots() {
            let assigned: Vec<usize> = order.iter().copied().filter(|&i| allocation.get(i, robot)).collect();
            if let Some(&first) = assigned.first() {
                if let UpdateOutcome::Updated = task_infos[first].update_lower_bound(robot, problem, oracle)? {
                    changed = true;
                }
            }
            for window in assigned.windows(2) {
                let (prev, next) = (window[0], window[1]);
                if let Some(info) = transitions.get_mut(prev, next) {
                    if let UpdateOutcome::Updated = info.update_lower_bound(robot, problem, oracle)? {
                        changed = true;
                    }
                }
            }
        }

        if !changed {
            trace!(makespan = solved.makespan, "deterministic scheduler reached fixpoint");
            let timepoints = (0..n)
                .map(|i| Timepoint {
                    start: solved.starts[i],
                    finish: solved.starts[i] + task_infos[i].duration,
                })
                .collect();
            return Ok(Schedule {
                timepoints,
                makespan: solved.makespan,
                mutex_orders: solved.mutex_directions,
                feasible_on_timeout: solved.feasible_on_timeout,
            });
        }
        trace!("lower bounds tightened, re-solving");
    }
}

pub fn solve(problem: &ProblemInputs, allocation: &Allocation, oracle: &impl MotionDurationOracle) -> Result<Schedule, FailureReason> {
    let params = match &problem.scheduler_parameters {
        SchedulerParameters::DeterministicMilpScheduler(p) => p,
        other => panic!("deterministic scheduler invoked with mismatched parameters: {other:?}"),
    };
    solve_core(problem, allocation, oracle, &params.common, params.use_hierarchical_objective)
}
