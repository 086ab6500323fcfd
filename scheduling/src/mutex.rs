use hashbrown::HashMap;
use itags_core::{Allocation, Plan};

/// Realized ordering of a mutex pair once the MILP has been solved (spec
/// §4.2 "precedence set by mutex resolution").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutexOrder {
    /// `i` precedes `j` (`p_ij = 1`).
    FirstThenSecond,
    /// `j` precedes `i` (`p_ij = 0`).
    SecondThenFirst,
}

/// One mutex pair, in plan-local task indices (`i < j`), and its MILP
/// indicator, materialized lazily ("only when the mutex scheduling model is
/// built", spec §4.2).
#[derive(Debug, Clone, Copy)]
pub struct MutexPair {
    pub i: usize,
    pub j: usize,
}

/// All mutex pairs for one allocation, keyed by `(i, j)` with `i < j` for
/// O(1) lookup from either task of the pair. Indices throughout are
/// plan-local; callers convert to global task indices via
/// [`itags_core::Plan::global_index`] when they need to consult
/// [`itags_core::ProblemInputs`].
pub struct MutexSet {
    pairs: Vec<MutexPair>,
    index: HashMap<(usize, usize), usize>,
}

impl MutexSet {
    /// Enumerates unordered task pairs whose coalitions overlap and which
    /// are not already ordered by precedence (spec §4.2, glossary "Mutex
    /// pair"). `allocation` is shaped `(plan.len(), num_robots)`.
    pub fn build(allocation: &Allocation, plan: &Plan) -> Self {
        let n = plan.len();
        let mut pairs = Vec::new();
        let mut index = HashMap::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if plan.ordered(i, j) {
                    continue;
                }
                if !allocation.coalitions_overlap(i, j) {
                    continue;
                }
                index.insert((i, j), pairs.len());
                pairs.push(MutexPair { i, j });
            }
        }
        Self { pairs, index }
    }

    pub fn pairs(&self) -> &[MutexPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Looks up the pair containing both `i` and `j`, if any, returning it in
    /// canonical `(smaller, larger)` order.
    pub fn get(&self, i: usize, j: usize) -> Option<MutexPair> {
        let key = if i < j { (i, j) } else { (j, i) };
        self.index.get(&key).map(|&idx| self.pairs[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_precedence_ordered_pairs() {
        let plan = Plan::new(3, None, &[(0, 1)]).unwrap();
        let mut allocation = Allocation::zeros(3, 1);
        allocation.set(0, 0, true);
        allocation.set(1, 0, true);
        allocation.set(2, 0, true);
        let mutexes = MutexSet::build(&allocation, &plan);
        // (0,1) is precedence-ordered; (0,2) and (1,2) share robot 0 and are unordered.
        assert!(mutexes.get(0, 1).is_none());
        assert!(mutexes.get(0, 2).is_some());
        assert!(mutexes.get(1, 2).is_some());
        assert_eq!(mutexes.len(), 2);
    }

    #[test]
    fn no_overlap_no_mutex() {
        let plan = Plan::new(2, None, &[]).unwrap();
        let mut allocation = Allocation::zeros(2, 2);
        allocation.set(0, 0, true);
        allocation.set(1, 1, true);
        let mutexes = MutexSet::build(&allocation, &plan);
        assert!(mutexes.is_empty());
    }
}
