//! CLI-boundary errors and their process exit codes (spec §6 "Process
//! exit": "0 on success; non-zero on parameter validation failure; non-zero
//! on solver environment fault").

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read problem file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed problem JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    ProblemInput(#[from] itags_core::ProblemInputError),
    #[error(transparent)]
    Config(#[from] itags_core::ConfigError),
}

impl CliError {
    /// `2` for anything traceable to the problem document itself (malformed
    /// JSON, out-of-range indices, an unvalidatable `config_type`); `3` for
    /// faults in the surrounding environment (the file could not even be
    /// read). Exact values are this crate's own convention — spec §6 only
    /// requires "non-zero", not a specific code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Json(_) | CliError::ProblemInput(_) | CliError::Config(_) => 2,
            CliError::Io { .. } => 3,
        }
    }
}
