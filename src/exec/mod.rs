//! Grouped-aggregation substrate: the job contract and a local executor.
//!
//! Pipelines in [`crate::pipeline`] are written purely against the
//! [`MapReduceJob`] trait; the executor owns partitioning, shuffling, grouping,
//! bounded-parallel task scheduling, and part-file output.

mod error;
mod job;
mod local;

pub use error::{ExecError, ExecResult};
pub use job::{Emitter, JobStats, MapReduceJob, ReduceOutput, SourceId};
pub use local::{ExecOptions, InputGroup, LocalExecutor, PART_FILE};
