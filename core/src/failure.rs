use thiserror::Error;

/// Why a scheduling attempt for one allocation could not produce a schedule.
///
/// Every scheduling entry point returns either a schedule or one of these
/// (spec §4.6, §7) — never a panic. The aggregated forms
/// (`RobotTaskFailure`/.../`SpeciesTaskPairFailure`) exist only so the
/// pruner (search crate) can index failures without re-deriving species
/// membership from the robot list every time.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FailureReason {
    #[error("robot {robot} cannot reach task {task}'s initial configuration")]
    InitialTransitionFailure { robot: usize, task: usize },
    #[error("species {species} cannot traverse from task {predecessor} to task {successor}")]
    TransitionFailure {
        species: usize,
        predecessor: usize,
        successor: usize,
    },
    #[error("species {species} cannot execute task {task}")]
    TaskDurationFailure { species: usize, task: usize },
    #[error("robot {robot} cannot be assigned to task {task}")]
    RobotTaskFailure { robot: usize, task: usize },
    #[error("robot {robot} cannot perform tasks {predecessor} and {successor} in sequence")]
    RobotTaskPairFailure {
        robot: usize,
        predecessor: usize,
        successor: usize,
    },
    #[error("species {species} cannot be assigned to task {task}")]
    SpeciesTaskFailure { species: usize, task: usize },
    #[error("species {species} cannot perform tasks {predecessor} and {successor} in sequence")]
    SpeciesTaskPairFailure {
        species: usize,
        predecessor: usize,
        successor: usize,
    },
    #[error("MILP solver reported the model as infeasible")]
    MilpInfeasible,
    #[error("MILP solver timed out with{} an incumbent", if *.has_incumbent { "" } else { "out" })]
    MilpTimeout { has_incumbent: bool },
    #[error("{0:?}")]
    Compound(Vec<FailureReason>),
}

impl FailureReason {
    /// Folds `RobotTaskFailure`/`RobotTaskPairFailure` instances that share a
    /// species into the corresponding species-level aggregate (spec
    /// SPEC_FULL §3 "Species-level failure aggregation", grounded on
    /// `species_task_failure.cpp`/`species_task_pair_failure.cpp`).
    pub fn aggregate_by_species(&self, robot_species: &[usize]) -> Option<FailureReason> {
        match self {
            FailureReason::RobotTaskFailure { robot, task } => Some(FailureReason::SpeciesTaskFailure {
                species: robot_species[*robot],
                task: *task,
            }),
            FailureReason::RobotTaskPairFailure {
                robot,
                predecessor,
                successor,
            } => Some(FailureReason::SpeciesTaskPairFailure {
                species: robot_species[*robot],
                predecessor: *predecessor,
                successor: *successor,
            }),
            _ => None,
        }
    }
}
