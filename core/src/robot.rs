use serde::{Deserialize, Serialize};

use crate::configuration::Configuration;

/// A single physical robot: identity, species membership, and starting pose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub name: String,
    pub species: usize,
    pub initial_configuration: Configuration,
}
