//! Structured error types for stage execution.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal stage-execution failures. Anything recoverable (malformed records,
/// join-arity mismatches) is handled inside the jobs and never surfaces here.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("input path {path} is not readable")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output path {path} already exists")]
    OutputExists { path: PathBuf },

    #[error("failed to read {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{phase} task for job '{job}' failed")]
    TaskFailed {
        job: &'static str,
        phase: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

pub type ExecResult<T> = std::result::Result<T, ExecError>;
