use std::sync::{Condvar, Mutex};

/// A process-wide bound on concurrently running MILP solves, standing in
/// for the source's MILP-environment pool: acquired blocking on scheduler
/// construction, released on `Drop`, sized explicitly rather than
/// short-circuiting to a single shared environment (the bug this replaces,
/// spec §9.v).
pub struct MilpEnvironmentPool {
    available: Mutex<usize>,
    condvar: Condvar,
}

impl MilpEnvironmentPool {
    pub fn new(size: usize) -> Self {
        Self {
            available: Mutex::new(size.max(1)),
            condvar: Condvar::new(),
        }
    }

    pub fn acquire(&self) -> MilpEnvironmentGuard<'_> {
        let mut available = self.available.lock().unwrap();
        while *available == 0 {
            available = self.condvar.wait(available).unwrap();
        }
        *available -= 1;
        MilpEnvironmentGuard { pool: self }
    }
}

pub struct MilpEnvironmentGuard<'a> {
    pool: &'a MilpEnvironmentPool,
}

impl Drop for MilpEnvironmentGuard<'_> {
    fn drop(&mut self) {
        let mut available = self.pool.available.lock().unwrap();
        *available += 1;
        self.pool.condvar.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_returns_slot_on_drop() {
        let pool = MilpEnvironmentPool::new(1);
        {
            let _guard = pool.acquire();
            assert_eq!(*pool.available.lock().unwrap(), 0);
        }
        assert_eq!(*pool.available.lock().unwrap(), 1);
    }
}
