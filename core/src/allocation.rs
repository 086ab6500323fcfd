use crate::error::ProblemInputError;

/// A binary (task × robot) assignment matrix (spec §3 "Allocation").
///
/// Stored densely and row-major: `cells[t * num_robots + r]`. Dense storage
/// is deliberate — allocation search nodes hash and compare whole matrices
/// (spec §4.5 "memoization"), and problem sizes in this domain (tens of
/// tasks, tens of robots) make a bitset-per-row no better than a flat `Vec`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Allocation {
    num_tasks: usize,
    num_robots: usize,
    cells: Vec<bool>,
}

impl Allocation {
    pub fn zeros(num_tasks: usize, num_robots: usize) -> Self {
        Self {
            num_tasks,
            num_robots,
            cells: vec![false; num_tasks * num_robots],
        }
    }

    pub fn ones(num_tasks: usize, num_robots: usize) -> Self {
        Self {
            num_tasks,
            num_robots,
            cells: vec![true; num_tasks * num_robots],
        }
    }

    pub fn from_dense(num_tasks: usize, num_robots: usize, cells: Vec<bool>) -> Result<Self, ProblemInputError> {
        if cells.len() != num_tasks * num_robots {
            return Err(ProblemInputError::AllocationShapeMismatch {
                found: (cells.len(), 1),
                expected: (num_tasks, num_robots),
            });
        }
        Ok(Self {
            num_tasks,
            num_robots,
            cells,
        })
    }

    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    pub fn num_robots(&self) -> usize {
        self.num_robots
    }

    #[inline]
    fn index(&self, task: usize, robot: usize) -> usize {
        task * self.num_robots + robot
    }

    pub fn get(&self, task: usize, robot: usize) -> bool {
        self.cells[self.index(task, robot)]
    }

    pub fn set(&mut self, task: usize, robot: usize, value: bool) {
        let idx = self.index(task, robot);
        self.cells[idx] = value;
    }

    /// A copy of `self` with one cell flipped — the sole operation search
    /// nodes use to derive a child allocation from a parent (spec §4.5).
    pub fn with_flipped(&self, task: usize, robot: usize) -> Self {
        let mut next = self.clone();
        let idx = next.index(task, robot);
        next.cells[idx] = !next.cells[idx];
        next
    }

    /// The coalition of task `t`: robots assigned to it.
    pub fn coalition(&self, task: usize) -> Vec<usize> {
        (0..self.num_robots).filter(|&r| self.get(task, r)).collect()
    }

    /// The transition coalition from `i` to `j`: robots assigned to both.
    pub fn transition_coalition(&self, i: usize, j: usize) -> Vec<usize> {
        (0..self.num_robots).filter(|&r| self.get(i, r) && self.get(j, r)).collect()
    }

    /// `true` iff tasks `i` and `j` share at least one robot.
    pub fn coalitions_overlap(&self, i: usize, j: usize) -> bool {
        (0..self.num_robots).any(|r| self.get(i, r) && self.get(j, r))
    }

    /// A canonical byte form used to hash/compare allocations for search-node
    /// memoization (spec §9 "hashing uses a canonical byte form").
    pub fn canonical_bytes(&self) -> Vec<u8> {
        self.cells.chunks(8).map(|chunk| chunk.iter().enumerate().fold(0u8, |acc, (i, &b)| acc | ((b as u8) << i))).collect()
    }

    pub fn dense(&self) -> &[bool] {
        &self.cells
    }

    /// The allocation rendered as a 2-D float matrix for the JSON output
    /// (spec §6 "`allocation` (2-D float)").
    pub fn to_float_matrix(&self) -> Vec<Vec<f64>> {
        (0..self.num_tasks)
            .map(|t| (0..self.num_robots).map(|r| if self.get(t, r) { 1.0 } else { 0.0 }).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalition_and_transition_coalition() {
        let mut a = Allocation::zeros(3, 2);
        a.set(0, 0, true);
        a.set(1, 0, true);
        a.set(1, 1, true);
        assert_eq!(a.coalition(0), vec![0]);
        assert_eq!(a.coalition(1), vec![0, 1]);
        assert_eq!(a.transition_coalition(0, 1), vec![0]);
        assert!(a.coalitions_overlap(0, 1));
        assert!(!a.coalitions_overlap(0, 2));
    }

    #[test]
    fn flip_is_pure() {
        let a = Allocation::zeros(2, 2);
        let b = a.with_flipped(0, 1);
        assert!(!a.get(0, 1));
        assert!(b.get(0, 1));
    }
}
