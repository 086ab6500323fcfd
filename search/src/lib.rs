//! The allocation search layer (spec §4.5–§4.6): a best-first search over
//! allocation matrices that invokes the scheduling layer per candidate
//! allocation, prunes branches known to be infeasible or not improving, and
//! reports search statistics alongside its result.

mod engine;
mod heuristic;
mod node;
mod pruning;
mod schedule;
mod statistics;

pub use engine::{search, GoalResult, Incumbent, SearchOutcome, SearchResult};
pub use heuristic::{normalized_allocation_quality, normalized_schedule_quality};
pub use node::{Flip, SearchNode};
pub use pruning::FailureMemory;
pub use schedule::{evaluate, EvaluatedSchedule};
pub use statistics::SearchStatistics;
