use crate::mutex::MutexOrder;

/// A per-task (start, finish) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timepoint {
    pub start: f64,
    pub finish: f64,
}

/// The materialized result of scheduling one allocation (spec §3
/// "Schedule"). Indices are plan-local, matching [`itags_core::Allocation`]
/// and [`itags_core::Plan`].
#[derive(Debug, Clone)]
pub struct Schedule {
    pub timepoints: Vec<Timepoint>,
    pub makespan: f64,
    /// Realized mutex orientation for each mutex pair (local indices, `i <
    /// j`), in the order produced by [`crate::mutex::MutexSet::pairs`].
    pub mutex_orders: Vec<(usize, usize, MutexOrder)>,
    /// `true` iff this schedule is an incumbent returned because
    /// `milp_timeout` elapsed before the solver could prove optimality and
    /// `return_feasible_on_timeout` permitted surfacing it anyway (spec §6
    /// "surfaced as success with a flag").
    pub feasible_on_timeout: bool,
}

impl Schedule {
    pub fn start(&self, task: usize) -> f64 {
        self.timepoints[task].start
    }

    pub fn finish(&self, task: usize) -> f64 {
        self.timepoints[task].finish
    }
}
