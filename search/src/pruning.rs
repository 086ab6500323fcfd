//! Pruning (spec §4.5 "Pruning", §4.6 "Failure Taxonomy and Memory").

use hashbrown::HashSet;
use itags_core::{Allocation, FailureReason, ProblemInputs, TraitAggregation};

/// An index of previously-observed scheduling failures, keyed at both the
/// robot and species granularity (spec §4.6: "record it; later prune any
/// node whose allocation instantiates the same infeasible structure").
///
/// `*_pair` entries are keyed `(predecessor, successor)` exactly as the
/// scheduler reports them; [`FailureMemory::should_prune`] checks both
/// orders against the candidate robot's other assigned tasks since either
/// order of (candidate, other) could instantiate the recorded structure.
#[derive(Debug, Default)]
pub struct FailureMemory {
    robot_task: HashSet<(usize, usize)>,
    robot_task_pair: HashSet<(usize, usize, usize)>,
    species_task: HashSet<(usize, usize)>,
    species_task_pair: HashSet<(usize, usize, usize)>,
}

impl FailureMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `reason`, aggregating robot-level entries up to their species
    /// via [`FailureReason::aggregate_by_species`] so the pruner catches
    /// every robot of that species, not just the one the scheduler happened
    /// to report (spec SPEC_FULL §3 "Species-level failure aggregation").
    pub fn record(&mut self, reason: &FailureReason, robot_species: &[usize]) {
        match reason {
            FailureReason::InitialTransitionFailure { robot, task } => {
                self.robot_task.insert((*robot, *task));
            }
            FailureReason::RobotTaskFailure { robot, task } => {
                self.robot_task.insert((*robot, *task));
            }
            FailureReason::RobotTaskPairFailure {
                robot,
                predecessor,
                successor,
            } => {
                self.robot_task_pair.insert((*robot, *predecessor, *successor));
            }
            FailureReason::TaskDurationFailure { species, task } => {
                self.species_task.insert((*species, *task));
            }
            FailureReason::SpeciesTaskFailure { species, task } => {
                self.species_task.insert((*species, *task));
            }
            FailureReason::TransitionFailure {
                species,
                predecessor,
                successor,
            } => {
                self.species_task_pair.insert((*species, *predecessor, *successor));
            }
            FailureReason::SpeciesTaskPairFailure {
                species,
                predecessor,
                successor,
            } => {
                self.species_task_pair.insert((*species, *predecessor, *successor));
            }
            FailureReason::MilpInfeasible | FailureReason::MilpTimeout { .. } => {}
            FailureReason::Compound(reasons) => {
                for r in reasons {
                    self.record(r, robot_species);
                }
            }
        }
        if let Some(aggregated) = reason.aggregate_by_species(robot_species) {
            self.record(&aggregated, robot_species);
        }
    }

    /// `true` iff assigning `robot` (of `species`) to `task`, given the
    /// allocation it would join, instantiates a previously-recorded failure.
    pub fn should_prune(&self, task: usize, robot: usize, species: usize, allocation: &Allocation) -> bool {
        if self.robot_task.contains(&(robot, task)) || self.species_task.contains(&(species, task)) {
            return true;
        }
        for other in 0..allocation.num_tasks() {
            if other == task || !allocation.get(other, robot) {
                continue;
            }
            if self.robot_task_pair.contains(&(robot, other, task)) || self.robot_task_pair.contains(&(robot, task, other)) {
                return true;
            }
            if self.species_task_pair.contains(&(species, other, task)) || self.species_task_pair.contains(&(species, task, other)) {
                return true;
            }
        }
        false
    }
}

/// Reduces `coalition`'s value on trait dimension `trait_index`.
fn reduce_trait(problem: &ProblemInputs, coalition: &[usize], trait_index: usize) -> f64 {
    let policy = problem.trait_aggregation.get(trait_index).copied().unwrap_or(TraitAggregation::Capability);
    policy.reduce(coalition.iter().map(|&r| problem.robot_species(r).trait_value(trait_index)))
}

/// *No-trait-improvement* (spec §4.5): `true` iff flipping `(task, robot)`
/// from `before` to `after` does not move `task`'s coalition strictly
/// closer to satisfying its desired-trait vector on any dimension still
/// deficient in `before`. A task with no desired traits is never pruned by
/// this rule (its coalition size is unconstrained).
///
/// For a reverse-search removal, "closer" is inverted: removing a robot
/// must not push a dimension that was satisfied in `before` below its
/// target, since a reverse search starts from the goal and only wants to
/// shed robots the goal does not need.
pub fn prunes_for_no_trait_improvement(problem: &ProblemInputs, before: &Allocation, after: &Allocation, task: usize, forward: bool) -> bool {
    let desired = &problem.tasks[task].desired_traits;
    if desired.is_empty() {
        return false;
    }
    let before_coalition = before.coalition(task);
    let after_coalition = after.coalition(task);

    let mut improves_or_holds = false;
    for (trait_index, &target) in desired.iter().enumerate() {
        let before_value = reduce_trait(problem, &before_coalition, trait_index);
        let after_value = reduce_trait(problem, &after_coalition, trait_index);
        if forward {
            if after_value > before_value && before_value < target {
                improves_or_holds = true;
            }
        } else if before_value >= target && after_value < target {
            // removing the robot broke a previously-satisfied dimension: this
            // is the one case reverse pruning must catch, independent of the
            // other dimensions' state.
            return true;
        }
    }
    forward && !improves_or_holds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_robot_task_and_aggregates_species() {
        let mut memory = FailureMemory::new();
        memory.record(&FailureReason::RobotTaskFailure { robot: 2, task: 5 }, &[0, 0, 1]);
        assert!(memory.robot_task.contains(&(2, 5)));
        assert!(memory.species_task.contains(&(1, 5)));
    }

    #[test]
    fn initial_transition_failure_prunes_the_reported_robot_task_pair() {
        let mut memory = FailureMemory::new();
        memory.record(&FailureReason::InitialTransitionFailure { robot: 1, task: 2 }, &[0, 0]);
        let allocation = Allocation::zeros(3, 2);
        assert!(memory.should_prune(2, 1, 0, &allocation));
        assert!(!memory.should_prune(2, 0, 0, &allocation));
    }

    #[test]
    fn should_prune_flags_known_pair_regardless_of_order() {
        let mut memory = FailureMemory::new();
        memory.record(
            &FailureReason::RobotTaskPairFailure {
                robot: 0,
                predecessor: 3,
                successor: 4,
            },
            &[0],
        );
        let mut allocation = Allocation::zeros(5, 1);
        allocation.set(3, 0, true);
        assert!(memory.should_prune(4, 0, 0, &allocation));
    }
}
