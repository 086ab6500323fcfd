//! Pruning soundness (spec §8 "Invariants (property tests)"): once a
//! robot/task (or species/task) failure is recorded, `should_prune` must
//! flag that exact pair under every allocation it is asked about, since the
//! granularity `FailureMemory` records at does not depend on the rest of
//! the allocation.

use itags_core::{Allocation, FailureReason};
use itags_search::FailureMemory;
use proptest::prelude::*;

proptest! {
    /// A recorded `RobotTaskFailure` prunes `(task, robot)` under any
    /// allocation shape, and its species-level aggregate prunes every other
    /// robot sharing that species too.
    #[test]
    fn robot_task_failure_prunes_regardless_of_allocation_shape(
        robot in 0usize..4,
        other_robot in 0usize..4,
        task in 0usize..4,
        num_tasks in 1usize..6,
        num_robots in 1usize..6,
    ) {
        let robot = robot % num_robots.max(1);
        let other_robot = other_robot % num_robots.max(1);
        let task = task % num_tasks.max(1);
        let species_of = vec![0usize; num_robots.max(1).max(robot + 1).max(other_robot + 1)];

        let mut memory = FailureMemory::new();
        memory.record(&FailureReason::RobotTaskFailure { robot, task }, &species_of);

        let allocation = Allocation::zeros(num_tasks.max(task + 1), num_robots.max(robot + 1).max(other_robot + 1));
        prop_assert!(memory.should_prune(task, robot, species_of[robot], &allocation));
        // every robot of the same species is pruned too, via the aggregate.
        prop_assert!(memory.should_prune(task, other_robot, species_of[other_robot], &allocation));
    }

    /// A recorded `RobotTaskPairFailure` only fires once the candidate robot
    /// already has the paired task assigned; it must never fire for an
    /// allocation that lacks that task.
    #[test]
    fn robot_task_pair_failure_requires_the_paired_task_to_be_assigned(
        robot in 0usize..3,
        predecessor in 0usize..3,
        successor in 0usize..3,
    ) {
        prop_assume!(predecessor != successor);
        let mut memory = FailureMemory::new();
        memory.record(
            &FailureReason::RobotTaskPairFailure { robot, predecessor, successor },
            &vec![0usize; robot + 1],
        );

        let n = predecessor.max(successor) + 1;
        let empty_allocation = Allocation::zeros(n, robot + 1);
        prop_assert!(!memory.should_prune(successor, robot, 0, &empty_allocation));

        let mut with_predecessor = empty_allocation.clone();
        with_predecessor.set(predecessor, robot, true);
        prop_assert!(memory.should_prune(successor, robot, 0, &with_predecessor));
    }
}
