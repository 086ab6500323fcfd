use hashbrown::HashMap;

use crate::error::ProblemInputError;

/// An ordered subset of tasks together with a precedence relation over them.
///
/// The relation is materialized as its transitive closure at construction
/// time (spec §3 "Plan"): downstream code never needs to walk edges to
/// answer "does `i` precede `j`", and a cycle in the input is rejected here
/// rather than discovered later as a modeling bug (spec §9 "Cycles").
///
/// Indices used by [`Plan`] methods are *local* (position within the plan's
/// task list), distinct from the global task indices used by
/// [`crate::problem::ProblemInputs`]. Use [`Plan::global_index`] /
/// [`Plan::local_index`] to convert.
#[derive(Debug, Clone)]
pub struct Plan {
    task_indices: Vec<usize>,
    local_of_global: HashMap<usize, usize>,
    direct_edges: Vec<(usize, usize)>,
    /// `closure[i][j]` is true iff local task `i` transitively precedes `j`.
    closure: Vec<Vec<bool>>,
}

impl Plan {
    /// Builds a plan over `task_indices` (defaulting to `0..num_total_tasks`
    /// when `None`, matching the optional `plan_task_indices` JSON field),
    /// restricting `precedence_constraints` (given in global task indices) to
    /// the pairs whose endpoints both lie in the plan.
    pub fn new(
        num_total_tasks: usize,
        task_indices: Option<Vec<usize>>,
        precedence_constraints: &[(usize, usize)],
    ) -> Result<Self, ProblemInputError> {
        let task_indices = task_indices.unwrap_or_else(|| (0..num_total_tasks).collect());
        for &g in &task_indices {
            if g >= num_total_tasks {
                return Err(ProblemInputError::TaskIndexOutOfRange(g));
            }
        }
        let mut local_of_global = HashMap::with_capacity(task_indices.len());
        for (local, &global) in task_indices.iter().enumerate() {
            local_of_global.insert(global, local);
        }

        let n = task_indices.len();
        let mut closure = vec![vec![false; n]; n];
        let mut direct_edges = Vec::new();
        for &(pred, succ) in precedence_constraints {
            let (Some(&lp), Some(&ls)) = (local_of_global.get(&pred), local_of_global.get(&succ)) else {
                continue;
            };
            if !closure[lp][ls] {
                direct_edges.push((lp, ls));
            }
            closure[lp][ls] = true;
        }

        // Floyd-Warshall transitive closure over plain boolean reachability.
        for k in 0..n {
            for i in 0..n {
                if !closure[i][k] {
                    continue;
                }
                for j in 0..n {
                    if closure[k][j] {
                        closure[i][j] = true;
                    }
                }
            }
        }
        for i in 0..n {
            if closure[i][i] {
                return Err(ProblemInputError::PrecedenceCycle(task_indices[i]));
            }
        }

        Ok(Self {
            task_indices,
            local_of_global,
            direct_edges,
            closure,
        })
    }

    pub fn len(&self) -> usize {
        self.task_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_indices.is_empty()
    }

    pub fn global_index(&self, local: usize) -> usize {
        self.task_indices[local]
    }

    pub fn local_index(&self, global: usize) -> Option<usize> {
        self.local_of_global.get(&global).copied()
    }

    /// Direct precedence edges, in local indices.
    pub fn direct_edges(&self) -> &[(usize, usize)] {
        &self.direct_edges
    }

    /// `true` iff local task `i` transitively precedes local task `j`.
    pub fn precedes(&self, i: usize, j: usize) -> bool {
        self.closure[i][j]
    }

    /// `true` iff `i` and `j` are ordered in either direction by precedence.
    pub fn ordered(&self, i: usize, j: usize) -> bool {
        self.precedes(i, j) || self.precedes(j, i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_is_transitive() {
        let plan = Plan::new(4, None, &[(0, 1), (1, 2)]).unwrap();
        assert!(plan.precedes(0, 2));
        assert!(!plan.precedes(2, 0));
        assert!(!plan.ordered(0, 3));
    }

    #[test]
    fn cycle_is_rejected() {
        let err = Plan::new(3, None, &[(0, 1), (1, 2), (2, 0)]).unwrap_err();
        assert!(matches!(err, ProblemInputError::PrecedenceCycle(_)));
    }

    #[test]
    fn subset_of_tasks_remaps_indices() {
        let plan = Plan::new(5, Some(vec![4, 1, 2]), &[(1, 2), (4, 1)]).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.global_index(0), 4);
        assert!(plan.precedes(0, 1)); // 4 -> 1 locally (0 -> 1)
        assert!(plan.precedes(1, 2)); // 1 -> 2 locally (1 -> 2)
        assert!(plan.precedes(0, 2)); // transitively 4 -> 2
    }
}
