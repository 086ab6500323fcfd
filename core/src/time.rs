use std::sync::Mutex;
use std::time::{Duration, Instant};

use hashbrown::HashMap;

/// A process-wide clock that partitions wall time into named buckets (spec
/// §4.7, §5 "A process-wide timekeeper is mutex-guarded").
///
/// Each bucket tracks an accumulated [`Duration`] plus, while a timer for
/// that bucket is running, the [`Instant`] it started. Timeouts are checked
/// by comparing the accumulated value against a caller-supplied budget —
/// the timekeeper itself holds no notion of "budget", only elapsed time.
pub struct Timekeeper {
    buckets: Mutex<HashMap<String, BucketState>>,
}

#[derive(Default, Clone, Copy)]
struct BucketState {
    accumulated: Duration,
    started: Option<Instant>,
}

impl Default for Timekeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Timekeeper {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Starts (or resumes) accounting time against `bucket`. Idempotent if
    /// already running.
    pub fn start(&self, bucket: &str) {
        let mut buckets = self.buckets.lock().unwrap();
        let state = buckets.entry(bucket.to_string()).or_default();
        if state.started.is_none() {
            state.started = Some(Instant::now());
        }
    }

    /// Stops accounting time against `bucket`, folding the elapsed time since
    /// the matching [`Timekeeper::start`] into its accumulated total.
    pub fn stop(&self, bucket: &str) {
        let mut buckets = self.buckets.lock().unwrap();
        if let Some(state) = buckets.get_mut(bucket) {
            if let Some(started) = state.started.take() {
                state.accumulated += started.elapsed();
            }
        }
    }

    /// The accumulated time in `bucket`, including any in-flight interval.
    pub fn elapsed(&self, bucket: &str) -> Duration {
        let buckets = self.buckets.lock().unwrap();
        match buckets.get(bucket) {
            Some(state) => state.accumulated + state.started.map(|s| s.elapsed()).unwrap_or_default(),
            None => Duration::ZERO,
        }
    }

    /// `true` iff `bucket`'s accumulated time exceeds `budget`.
    pub fn exceeded(&self, bucket: &str, budget: Duration) -> bool {
        self.elapsed(bucket) > budget
    }

    /// "Pure" time in `primary` once `subtract` has been removed, used to
    /// report scheduling cost net of motion-planning time (spec §4.7).
    pub fn net_of(&self, primary: &str, subtract: &str) -> Duration {
        self.elapsed(primary).saturating_sub(self.elapsed(subtract))
    }

    /// Runs `f` while a named bucket is running, stopping it (and folding
    /// elapsed time) regardless of how `f` returns. This is the safe-point
    /// idiom used throughout scheduling and search (spec §5 "Suspension
    /// points").
    pub fn time<T>(&self, bucket: &str, f: impl FnOnce() -> T) -> T {
        self.start(bucket);
        let result = f();
        self.stop(bucket);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn accumulates_across_multiple_runs() {
        let tk = Timekeeper::new();
        tk.time("scheduling", || sleep(Duration::from_millis(5)));
        tk.time("scheduling", || sleep(Duration::from_millis(5)));
        assert!(tk.elapsed("scheduling") >= Duration::from_millis(10));
    }

    #[test]
    fn net_of_subtracts_nested_bucket() {
        let tk = Timekeeper::new();
        tk.start("scheduling");
        tk.time("motion_planning", || sleep(Duration::from_millis(5)));
        tk.stop("scheduling");
        let net = tk.net_of("scheduling", "motion_planning");
        assert!(net < tk.elapsed("scheduling"));
    }
}
