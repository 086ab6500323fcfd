//! Building blocks shared by the deterministic scheduler and both
//! stochastic variants: the directed transition-lookup table, common
//! `good_lp`/CBC parameter wiring, the big-M safety margin, and the MILP
//! environment pool.

use good_lp::solvers::coin_cbc::CoinCbcProblem;
use good_lp::SolverModel;
use hashbrown::HashMap;
use itags_core::params::CommonMilpParameters;
use itags_core::{Allocation, FailureReason, Plan, ProblemInputs};
use itags_oracle::MotionDurationOracle;

use crate::mutex::MutexSet;
use crate::pool::MilpEnvironmentPool;
use crate::transition_info::TransitionInfo;

/// Safety multiplier applied to the instance-derived worst-case makespan
/// before using it as the big-M constant.
static BIG_M_MARGIN: env_param::EnvParam<f64> = env_param::EnvParam::new("ITAGS_BIG_M_MARGIN", "1.1");
static DEFAULT_POOL_SIZE: env_param::EnvParam<usize> = env_param::EnvParam::new("ITAGS_MILP_POOL_SIZE", "4");

static POOL: once_cell::sync::OnceCell<MilpEnvironmentPool> = once_cell::sync::OnceCell::new();

pub(crate) fn big_m_margin() -> f64 {
    BIG_M_MARGIN.get()
}

pub(crate) fn pool(threads: u32) -> &'static MilpEnvironmentPool {
    POOL.get_or_init(|| {
        let size = if threads == 0 { DEFAULT_POOL_SIZE.get() } else { threads as usize };
        MilpEnvironmentPool::new(size)
    })
}

/// Directed per-robot transition lower bounds, keyed by `(from, to)` plan-
/// local task indices. Covers both directions of every mutex pair (the
/// realized direction is not yet known before solving) plus every
/// precedence edge.
pub(crate) struct TransitionTable {
    entries: HashMap<(usize, usize), TransitionInfo>,
}

impl TransitionTable {
    pub(crate) fn build(
        problem: &ProblemInputs,
        plan: &Plan,
        allocation: &Allocation,
        mutexes: &MutexSet,
        oracle: &impl MotionDurationOracle,
    ) -> Result<Self, FailureReason> {
        let mut entries = HashMap::new();
        for &(pred, succ) in plan.direct_edges() {
            let shared = allocation.transition_coalition(pred, succ);
            let info = TransitionInfo::setup(plan.global_index(pred), plan.global_index(succ), pred, succ, &shared, problem, oracle)?;
            entries.insert((pred, succ), info);
        }
        for pair in mutexes.pairs() {
            let shared = allocation.transition_coalition(pair.i, pair.j);
            let forward = TransitionInfo::setup(plan.global_index(pair.i), plan.global_index(pair.j), pair.i, pair.j, &shared, problem, oracle)?;
            let backward = TransitionInfo::setup(plan.global_index(pair.j), plan.global_index(pair.i), pair.j, pair.i, &shared, problem, oracle)?;
            entries.insert((pair.i, pair.j), forward);
            entries.insert((pair.j, pair.i), backward);
        }
        Ok(Self { entries })
    }

    pub(crate) fn lower_bound(&self, from: usize, to: usize) -> f64 {
        self.entries.get(&(from, to)).map(|info| info.lower_bound).unwrap_or(0.0)
    }

    pub(crate) fn get_mut(&mut self, from: usize, to: usize) -> Option<&mut TransitionInfo> {
        self.entries.get_mut(&(from, to))
    }
}

/// Applies `scheduler_parameters`' solver knobs to a freshly created CBC
/// model. CBC's CLI parameter names (`sec`, `threads`, `ratio`) are used
/// directly since `good_lp`'s `coin_cbc` backend passes parameters through
/// verbatim.
pub(crate) fn apply_common_parameters(model: &mut CoinCbcProblem, common: &CommonMilpParameters) {
    if common.milp_timeout > 0.0 {
        model.set_parameter("sec", &common.milp_timeout.to_string());
    }
    if common.threads > 0 {
        model.set_parameter("threads", &common.threads.to_string());
    }
    if common.mip_gap >= 0.0 {
        model.set_parameter("ratio", &common.mip_gap.to_string());
    }
    model.set_parameter("logLevel", "0");
}
