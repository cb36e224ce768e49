//! Pipeline drivers: stage chaining over the filesystem.
//!
//! Each driver validates its inputs, then submits stages to the executor one
//! at a time; a stage must complete before the next is submitted, and the
//! later stage reads the earlier stage's part files. Any stage failure aborts
//! the pipeline.

pub mod common_followers;
pub mod iolog;
pub mod mutual;
pub mod recommend;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::exec::{ExecOptions, InputGroup, JobStats, LocalExecutor};

/// Run-level options shared by all pipelines.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub exec: ExecOptions,
}

/// Mutual-edge detection: adjacency lists in, `pair\t` lines out.
pub async fn run_mutual(input: &Path, output: &Path, opts: &RunOptions) -> Result<JobStats> {
    ensure_readable(&[input])?;
    let executor = LocalExecutor::new(opts.exec.clone());
    let stats = executor
        .run(
            Arc::new(mutual::MutualEdgeJob),
            &[InputGroup::new(mutual::ADJACENCY, input)],
            output,
        )
        .await?;
    log_stage(&stats, None);
    Ok(stats)
}

/// Per-namespace operation-count totals: trace logs in, `ns,total` lines out.
pub async fn run_iolog(input: &Path, output: &Path, opts: &RunOptions) -> Result<JobStats> {
    ensure_readable(&[input])?;
    let executor = LocalExecutor::new(opts.exec.clone());
    let stats = executor
        .run(
            Arc::new(iolog::OpCountSumJob),
            &[InputGroup::new(iolog::LOGS, input)],
            output,
        )
        .await?;
    log_stage(&stats, None);
    Ok(stats)
}

/// Common-follower intersection with threshold routing.
///
/// Stage 1 writes the pair/list join to `intermediate`; stage 2 reads it back
/// and routes each intersection into `output/small` or `output/large`.
pub async fn run_common_followers(
    pairs: &Path,
    lists: &Path,
    threshold: usize,
    intermediate: &Path,
    output: &Path,
    opts: &RunOptions,
) -> Result<(JobStats, JobStats)> {
    ensure_readable(&[pairs, lists])?;
    let executor = LocalExecutor::new(opts.exec.clone());

    let started = Instant::now();
    let join_stats = executor
        .run(
            Arc::new(common_followers::PairListJoinJob),
            &[
                InputGroup::new(common_followers::PAIRS, pairs),
                InputGroup::new(common_followers::LISTS, lists),
            ],
            intermediate,
        )
        .await?;
    log_stage(&join_stats, Some(started.elapsed().as_millis()));

    let started = Instant::now();
    let route_stats = executor
        .run(
            Arc::new(common_followers::IntersectRouteJob { threshold }),
            &[InputGroup::new(common_followers::JOINED, intermediate)],
            output,
        )
        .await?;
    log_stage(&route_stats, Some(started.elapsed().as_millis()));

    Ok((join_stats, route_stats))
}

/// Friend-of-friend recommendation.
///
/// Stage 1 writes the two-hop candidate pairs to `candidates`; stage 2 joins
/// them against the follow lists and writes the capped recommendations.
pub async fn run_recommend(
    pairs: &Path,
    lists: &Path,
    candidates: &Path,
    output: &Path,
    opts: &RunOptions,
) -> Result<(JobStats, JobStats)> {
    ensure_readable(&[pairs, lists])?;
    let executor = LocalExecutor::new(opts.exec.clone());

    let started = Instant::now();
    let expand_stats = executor
        .run(
            Arc::new(recommend::CandidateExpansionJob),
            &[InputGroup::new(recommend::PAIRS, pairs)],
            candidates,
        )
        .await?;
    log_stage(&expand_stats, Some(started.elapsed().as_millis()));

    let started = Instant::now();
    let filter_stats = executor
        .run(
            Arc::new(recommend::FilterCapJob),
            &[
                InputGroup::new(recommend::CANDIDATES, candidates),
                InputGroup::new(recommend::LISTS, lists),
            ],
            output,
        )
        .await?;
    log_stage(&filter_stats, Some(started.elapsed().as_millis()));

    Ok((expand_stats, filter_stats))
}

/// All inputs must be readable before the first stage is submitted; an
/// unreadable path is a configuration error, not a stage failure.
fn ensure_readable(paths: &[&Path]) -> Result<()> {
    for path in paths {
        if std::fs::metadata(path).is_err() {
            return Err(Error::Config(format!(
                "input path {} is not readable",
                path.display()
            )));
        }
    }
    Ok(())
}

fn log_stage(stats: &JobStats, elapsed_ms: Option<u128>) {
    match elapsed_ms {
        Some(ms) => info!(job = stats.job, elapsed_ms = ms, "stage finished"),
        None => info!(job = stats.job, "stage finished"),
    }
    debug!(
        "stage stats: {}",
        serde_json::to_string(stats).unwrap_or_default()
    );
}
