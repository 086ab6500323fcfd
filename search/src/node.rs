//! Allocation search nodes (spec §4.5 "State"): a parent-linked tree where a
//! child differs from its parent by exactly one flipped allocation cell,
//! mirroring the `Rc<Node>`-parent-chain idiom the scheduler's own search
//! layer in the source repository uses for its classical planning search.

use std::cmp::Ordering;
use std::rc::Rc;

use itags_core::{Allocation, FailureReason, ProblemInputs};
use itags_oracle::MotionDurationOracle;
use once_cell::unsync::OnceCell;

use crate::schedule::EvaluatedSchedule;

/// A single flipped cell: `(task, robot)`.
pub type Flip = (usize, usize);

/// A node in the allocation search tree.
///
/// `allocation` is materialized eagerly (one `with_flipped` call, cheap
/// relative to a MILP solve) since both pruning and the closed-set hash need
/// it before a node is ever evaluated. `schedule` and `value` are the
/// expensive parts and stay behind `OnceCell`s, computed only for nodes the
/// open-set actually pops (spec §4.5 "Evaluation").
pub struct SearchNode {
    pub id: u64,
    pub parent: Option<Rc<SearchNode>>,
    pub flip: Option<Flip>,
    pub depth: u32,
    pub allocation: Allocation,
    schedule: OnceCell<Result<EvaluatedSchedule, FailureReason>>,
    value: OnceCell<f64>,
}

impl SearchNode {
    pub fn root(problem: &ProblemInputs, id: u64) -> Rc<Self> {
        let allocation = if problem.use_reverse {
            Allocation::ones(problem.num_tasks(), problem.num_robots())
        } else {
            Allocation::zeros(problem.num_tasks(), problem.num_robots())
        };
        Rc::new(Self {
            id,
            parent: None,
            flip: None,
            depth: 0,
            allocation,
            schedule: OnceCell::new(),
            value: OnceCell::new(),
        })
    }

    pub fn child(parent: &Rc<Self>, flip: Flip, id: u64) -> Rc<Self> {
        let allocation = parent.allocation.with_flipped(flip.0, flip.1);
        Rc::new(Self {
            id,
            parent: Some(Rc::clone(parent)),
            flip: Some(flip),
            depth: parent.depth + 1,
            allocation,
            schedule: OnceCell::new(),
            value: OnceCell::new(),
        })
    }

    /// The schedule for this node's allocation, computed (and cached) on
    /// first access.
    pub fn schedule(
        &self,
        problem: &ProblemInputs,
        oracle: &impl MotionDurationOracle,
    ) -> &Result<EvaluatedSchedule, FailureReason> {
        self.schedule.get_or_init(|| crate::schedule::evaluate(problem, &self.allocation, oracle))
    }

    /// The cached node value, if already computed by [`SearchNode::set_value`].
    pub fn value(&self) -> Option<f64> {
        self.value.get().copied()
    }

    /// Installs the node value once it has been computed by the evaluation
    /// step. Idempotent: a node is evaluated at most once.
    pub fn set_value(&self, value: f64) {
        let _ = self.value.set(value);
    }

    /// Reconstructs the ancestry path from the root to `self` as a sequence
    /// of flips, oldest first.
    pub fn flip_path(self: &Rc<Self>) -> Vec<Flip> {
        let mut path = Vec::with_capacity(self.depth as usize);
        let mut current = Rc::clone(self);
        while let Some(flip) = current.flip {
            path.push(flip);
            let parent = current.parent.clone().expect("a node with a flip always has a parent");
            current = parent;
        }
        path.reverse();
        path
    }
}

/// Open-set ordering: a min-heap over `f(n)` built on top of
/// [`std::collections::BinaryHeap`] (a max-heap), by reversing the natural
/// `f64` comparison — the same inversion trick the source repository's
/// classical-planning search uses for its own cost-ordered `Node`.
pub struct QueuedNode {
    pub node: Rc<SearchNode>,
    pub priority: f64,
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.node.id == other.node.id
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.id.cmp(&self.node.id))
    }
}
