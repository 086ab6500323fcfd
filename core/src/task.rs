use serde::{Deserialize, Serialize};

use crate::configuration::Configuration;

/// An atomic, already-grounded unit of work.
///
/// `duration` is the static "on-site" cost; any coalition-dependent
/// component is added on top of it by the oracle (spec §4.1 `taskDuration`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub duration: f64,
    pub desired_traits: Vec<f64>,
    pub linear_quality_coefficients: Vec<f64>,
    pub initial_configuration: Configuration,
    pub terminal_configuration: Configuration,
}
