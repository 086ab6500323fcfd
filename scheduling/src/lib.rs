//! The scheduling layer (spec §4.2–§4.4): per-allocation task/transition
//! duration bookkeeping, the mutex indicator set, the deterministic MILP
//! scheduler, and the stochastic master + Benders subschedulers.

mod bounds;
mod deterministic;
mod milp_common;
mod mutex;
mod pool;
mod schedule;
mod scenario;
mod status;
mod stochastic;
mod task_info;
mod transition_info;

pub use bounds::{empty_allocation_makespan, worst_case_makespan};
pub use deterministic::solve as solve_deterministic;
pub use mutex::{MutexOrder, MutexPair, MutexSet};
pub use schedule::{Schedule, Timepoint};
pub use scenario::Scenario;
pub use status::{TransitionStatus, UpdateOutcome};
pub use stochastic::{
    benders::solve_benders,
    monolithic::solve_monolithic,
    selector::{uniform_selector, ScenarioSelector},
    solve as solve_stochastic,
    StochasticSchedule,
};
