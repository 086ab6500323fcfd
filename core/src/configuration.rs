use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A geometric configuration of a robot or task end-point.
///
/// The coordination core never inspects these fields itself: configurations
/// are opaque values compared only through a duration-oracle implementation
/// (see the `itags-oracle` crate). `x`/`y`/`yaw` are exposed because every
/// oracle implementation in this workspace (and every problem instance in
/// spec §8) is planar, but nothing outside the oracle crate is allowed to
/// branch on them.
///
/// `Eq`/`Hash` are implemented bitwise (via `to_bits`) rather than derived,
/// purely so an oracle can memoize per-configuration queries in a hash map;
/// it is not a claim that floating-point equality is meaningful elsewhere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Configuration {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub yaw: f64,
}

impl Configuration {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    pub fn euclidean_distance(&self, other: &Configuration) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits() && self.yaw.to_bits() == other.yaw.to_bits()
    }
}

impl Eq for Configuration {}

impl Hash for Configuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
        self.yaw.to_bits().hash(state);
    }
}
