//! Errors in the library.
use std::path::PathBuf;
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum SactraceError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The discount factor must lie in `[0, 1)`.
    #[error("Invalid discount factor: {0}")]
    InvalidGamma(f64),

    /// The evaluator needs at least one step to define a running return.
    #[error("The number of evaluation steps must be positive")]
    ZeroSteps,

    /// A multi-objective signal changed its number of components mid-run.
    #[error("Multi-objective length changed from {expected} to {found}")]
    MultiObjectiveLength {
        /// Length seen at the first multi-objective step.
        expected: usize,
        /// Length seen now.
        found: usize,
    },

    /// A row of a log table could not be parsed.
    #[error("Malformed log row {line} in {path:?}: {reason}")]
    MalformedLog {
        /// Log file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        reason: String,
    },

    /// A log table holds no rows where at least one is needed.
    #[error("Empty log: {0:?}")]
    EmptyLog(PathBuf),

    /// None of the reward, loss or action logs exists.
    #[error("No files to count lines")]
    NoFilesToCountLines,

    /// A row of the parameter file lacks the `:\t` delimiter.
    #[error("Malformed parameter row {line} in {path:?}")]
    MalformedParams {
        /// Parameter file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
    },

    /// Parameter key error.
    #[error("Parameter key error: {0}")]
    ParamKeyError(String),

    /// Neither the compressed nor the uncompressed state file exists.
    #[error("State file not found: {compressed:?} (uncompressed: {uncompressed:?})")]
    StateNotFound {
        /// Compressed state file.
        compressed: PathBuf,
        /// Uncompressed fallback, if any was given.
        uncompressed: Option<PathBuf>,
    },
}
