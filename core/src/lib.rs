//! Shared data model for the multi-robot task allocation and scheduling
//! coordination engine: tasks, robots, species, plans, allocations, the
//! scheduling failure taxonomy, process-wide time accounting, and the typed
//! parameter objects exchanged with the outside world.

pub mod allocation;
pub mod configuration;
pub mod error;
pub mod failure;
pub mod params;
pub mod plan;
pub mod problem;
pub mod robot;
pub mod species;
pub mod task;
pub mod time;

pub use allocation::Allocation;
pub use configuration::Configuration;
pub use error::{ConfigError, ProblemInputError};
pub use failure::FailureReason;
pub use plan::Plan;
pub use problem::{ProblemInputs, ProblemInputsJson};
pub use robot::Robot;
pub use species::{Species, TraitAggregation};
pub use task::Task;
pub use time::Timekeeper;
