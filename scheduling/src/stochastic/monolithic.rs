//! The monolithic stochastic variant (spec §4.4 "Monolithic variant"): one
//! MILP replicating the deterministic constraints per scenario, sharing a
//! single set of mutex indicators, with a CVaR-style tail-aggregation
//! objective.

use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::{constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable};
use hashbrown::HashMap;
use itags_core::params::CommonMilpParameters;
use itags_core::{Allocation, FailureReason, ProblemInputs};
use itags_oracle::MotionDurationOracle;

use super::StochasticSchedule;
use crate::bounds::worst_case_makespan;
use crate::milp_common::{apply_common_parameters, big_m_margin, TransitionTable};
use crate::mutex::{MutexOrder, MutexSet};
use crate::schedule::Timepoint;
use crate::scenario::{Scenario, ScenarioOracle};
use crate::task_info::TaskInfo;

/// Builds and solves the monolithic stochastic MILP over `scenarios`
/// (already filtered down to the chosen scenario set by a
/// [`crate::stochastic::selector::ScenarioSelector`]), minimizing a CVaR-
/// style tail aggregate of the per-scenario makespans: the standard LP
/// linearization `min η + (1/(gamma·Q)) Σ u_q` s.t. `u_q ≥ M^q − η, u_q ≥
/// 0`, which at optimality equals the mean of the worst `gamma` fraction of
/// scenario makespans.
pub fn solve_monolithic(
    problem: &ProblemInputs,
    allocation: &Allocation,
    base_oracle: &impl MotionDurationOracle,
    scenarios: &[Scenario],
    common: &CommonMilpParameters,
    gamma: f64,
) -> Result<StochasticSchedule, FailureReason> {
    let plan = &problem.plan;
    let n = plan.len();
    let q = scenarios.len();
    let mutexes = MutexSet::build(allocation, plan);
    let big_m = worst_case_makespan(problem, plan) * big_m_margin();

    let mut per_scenario: Vec<(Vec<TaskInfo>, TransitionTable)> = Vec::with_capacity(q);
    for &scenario in scenarios {
        let oracle = ScenarioOracle::new(base_oracle, scenario);
        let task_infos: Vec<TaskInfo> = (0..n)
            .map(|i| TaskInfo::setup(i, plan.global_index(i), allocation.coalition(i), problem, &oracle))
            .collect::<Result<_, _>>()?;
        let transitions = TransitionTable::build(problem, plan, allocation, &mutexes, &oracle)?;
        per_scenario.push((task_infos, transitions));
    }

    let mut vars = ProblemVariables::new();
    let mutex_vars: HashMap<(usize, usize), Variable> =
        mutexes.pairs().iter().map(|pair| ((pair.i, pair.j), vars.add(variable().binary()))).collect();
    let start_vars: Vec<Vec<Variable>> = per_scenario
        .iter()
        .map(|(task_infos, _)| (0..n).map(|i| vars.add(variable().min(task_infos[i].lower_bound))).collect())
        .collect();
    let makespan_vars: Vec<Variable> = (0..q).map(|_| vars.add(variable().min(0.0))).collect();
    let eta = vars.add(variable());
    let tail_vars: Vec<Variable> = (0..q).map(|_| vars.add(variable().min(0.0))).collect();

    let tail_weight = 1.0 / (gamma.max(1e-6) * q.max(1) as f64);
    let objective: Expression = Expression::from(eta) + tail_vars.iter().fold(Expression::from(0.0), |acc, &u| acc + tail_weight * u);

    let mut model = coin_cbc(vars.minimise(objective));
    apply_common_parameters(&mut model, common);

    for scenario_idx in 0..q {
        let (task_infos, transitions) = &per_scenario[scenario_idx];
        let starts = &start_vars[scenario_idx];
        let makespan_var = makespan_vars[scenario_idx];

        for &(pred, succ) in plan.direct_edges() {
            let duration = task_infos[pred].duration;
            let transition = transitions.lower_bound(pred, succ);
            model.add_constraint(constraint!(starts[succ] - starts[pred] >= duration + transition));
        }
        for pair in mutexes.pairs() {
            let p = mutex_vars[&(pair.i, pair.j)];
            let d_i = task_infos[pair.i].duration;
            let d_j = task_infos[pair.j].duration;
            let x_ij = transitions.lower_bound(pair.i, pair.j);
            let x_ji = transitions.lower_bound(pair.j, pair.i);
            model.add_constraint(constraint!(starts[pair.j] - starts[pair.i] - big_m * p >= d_i + x_ij - big_m));
            model.add_constraint(constraint!(starts[pair.i] - starts[pair.j] + big_m * p >= d_j + x_ji));
        }
        for i in 0..n {
            model.add_constraint(constraint!(makespan_var >= starts[i] + task_infos[i].duration));
        }
        model.add_constraint(constraint!(tail_vars[scenario_idx] >= makespan_var - eta));
    }

    let solution = model.solve().map_err(|_| FailureReason::MilpInfeasible)?;

    let per_scenario_makespans: Vec<f64> = makespan_vars.iter().map(|&v| solution.value(v)).collect();
    let aggregated_value = solution.value(eta) + tail_weight * tail_vars.iter().map(|&v| solution.value(v)).sum::<f64>();
    let mutex_orders = mutexes
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
    let per_scenario_timepoints = (0..q)
        .map(|scenario_idx| {
            let (task_infos, _) = &per_scenario[scenario_idx];
            (0..n)
                .map(|i| {
                    let start = solution.value(start_vars[scenario_idx][i]);
                    Timepoint {
                        start,
                        finish: start + task_infos[i].duration,
                    }
                })
                .collect()
        })
        .collect();

    Ok(StochasticSchedule {
        per_scenario_makespans,
        aggregated_value,
        mutex_orders,
        per_scenario_timepoints,
    })
}
