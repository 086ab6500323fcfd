//! The motion-duration oracle contract (spec §4.1) and a default
//! Euclidean-distance implementation used by the end-to-end scenarios of
//! spec §8.
//!
//! The core treats "memoized" as "authoritative": a duration obtained from
//! a memoized query is an exact lower bound, while a non-memoized query
//! returns an optimistic heuristic that may later be refined once the
//! (expensive) authoritative query has actually been made. A negative
//! return from `initial_transition_duration`/`transition_duration`/
//! `task_duration` is the documented infeasibility sentinel.

mod euclidean;
mod mock;

pub use euclidean::EuclideanOracle;
pub use mock::MockOracle;

use itags_core::{Configuration, Robot, Species, Task};

/// Sentinel returned by the authoritative queries to signal "no feasible
/// motion plan exists for this pair" (spec §4.1).
pub const INFEASIBLE: f64 = -1.0;

pub fn is_infeasible(duration: f64) -> bool {
    duration < 0.0
}

/// A duration/lower-bound source for robot motion, consumed by the
/// scheduling layer (spec §4.1).
pub trait MotionDurationOracle {
    fn is_initial_memoized(&self, cfg: &Configuration, robot: &Robot) -> bool;

    /// Authoritative travel duration from `robot`'s starting configuration to
    /// `cfg`, or [`INFEASIBLE`] if no plan exists.
    fn initial_transition_duration(&self, cfg: &Configuration, robot: &Robot) -> f64;

    /// Cheap admissible lower bound for the same query (default:
    /// `euclidean_distance / species.speed`).
    fn initial_transition_duration_heuristic(&self, cfg: &Configuration, robot: &Robot, species: &Species) -> f64 {
        let distance = robot.initial_configuration.euclidean_distance(cfg);
        if species.speed <= 0.0 {
            f64::INFINITY
        } else {
            distance / species.speed
        }
    }

    fn is_transition_memoized(&self, a: &Configuration, b: &Configuration, robot: &Robot) -> bool;

    /// Authoritative travel duration from `a` to `b` for `robot`, or
    /// [`INFEASIBLE`].
    fn transition_duration(&self, a: &Configuration, b: &Configuration, robot: &Robot) -> f64;

    fn transition_duration_heuristic(&self, a: &Configuration, b: &Configuration, robot: &Robot, species: &Species) -> f64 {
        let distance = a.euclidean_distance(b);
        if species.speed <= 0.0 {
            f64::INFINITY
        } else {
            distance / species.speed
        }
    }

    /// Static duration plus any coalition-dependent component, or
    /// [`INFEASIBLE`] if no member of `coalition` can execute `task` at all.
    fn task_duration(&self, task: &Task, coalition: &[&Robot]) -> f64;
}
