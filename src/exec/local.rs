//! Local in-process executor for map/reduce stages.
//!
//! Execution follows the classic three-phase shape: map tasks run in parallel
//! over per-file input splits with bounded concurrency, a full shuffle barrier
//! groups every emission by key, and reduce tasks each own a disjoint range of
//! keys, reducing serially within the range. Map emissions are concatenated in
//! split-submission order and keys are grouped in a `BTreeMap`, so both value
//! delivery order and output order are deterministic for a given input.
//!
//! Stage output mirrors the usual part-file layout: the default stream goes to
//! `<out>/part-00000`, each named stream to `<out>/<name>/part-00000`. The
//! output directory must not already exist.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, info};

use super::error::{ExecError, ExecResult};
use super::job::{Emitter, JobStats, MapReduceJob, ReduceOutput, SourceId};

/// Name of the single part file each output stream is written to.
pub const PART_FILE: &str = "part-00000";

const DEFAULT_MAX_PARALLEL: usize = 8;

/// Executor tuning knobs.
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Upper bound on concurrently running map or reduce tasks.
    pub max_parallel: usize,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }
}

/// One input group: a source tag plus the paths feeding it. A directory path
/// expands to its regular files in name order; entries starting with `.` or
/// `_` and nested directories (named-output buckets of an earlier stage) are
/// skipped.
#[derive(Debug, Clone)]
pub struct InputGroup {
    pub source: SourceId,
    pub paths: Vec<PathBuf>,
}

impl InputGroup {
    pub fn new(source: SourceId, path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            paths: vec![path.into()],
        }
    }
}

/// Runs one [`MapReduceJob`] to completion on the local machine.
pub struct LocalExecutor {
    opts: ExecOptions,
}

impl LocalExecutor {
    pub fn new(opts: ExecOptions) -> Self {
        Self { opts }
    }

    pub async fn run<J: MapReduceJob>(
        &self,
        job: Arc<J>,
        inputs: &[InputGroup],
        out_dir: &Path,
    ) -> ExecResult<JobStats> {
        if tokio::fs::metadata(out_dir).await.is_ok() {
            return Err(ExecError::OutputExists {
                path: out_dir.to_path_buf(),
            });
        }

        let splits = expand_splits(inputs).await?;
        debug!(
            job = job.name(),
            splits = splits.len(),
            "starting map phase"
        );

        let max_parallel = self.opts.max_parallel.max(1);
        let semaphore = Arc::new(Semaphore::new(max_parallel));

        // Map phase: one bounded-parallel task per input split.
        let mut tasks = FuturesUnordered::new();
        for (index, (source, path)) in splits.into_iter().enumerate() {
            let job = Arc::clone(&job);
            let permit = semaphore.clone().acquire_owned().await.unwrap();
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let content = tokio::fs::read_to_string(&path).await.map_err(|source| {
                    ExecError::ReadFailed {
                        path: path.clone(),
                        source,
                    }
                })?;
                let mut emitter = Emitter::new();
                let mut lines = 0usize;
                for line in content.lines() {
                    lines += 1;
                    job.map(source, line, &mut emitter);
                }
                let (pairs, rejected) = emitter.into_parts();
                Ok::<_, ExecError>((index, pairs, lines, rejected))
            }));
        }

        let mut map_slots: Vec<Option<Vec<(J::Key, J::Value)>>> = Vec::new();
        let mut input_lines = 0usize;
        let mut rejected_lines = 0usize;
        let mut map_emits = 0usize;
        while let Some(joined) = tasks.next().await {
            let (index, pairs, lines, rejected) =
                joined.map_err(|source| ExecError::TaskFailed {
                    job: job.name(),
                    phase: "map",
                    source,
                })??;
            input_lines += lines;
            rejected_lines += rejected;
            map_emits += pairs.len();
            if map_slots.len() <= index {
                map_slots.resize_with(index + 1, || None);
            }
            map_slots[index] = Some(pairs);
        }

        // Shuffle barrier: group by key, concatenating emissions in split order
        // so value delivery within a group is deterministic.
        let mut groups: BTreeMap<J::Key, Vec<J::Value>> = BTreeMap::new();
        for slot in map_slots {
            for (key, value) in slot.unwrap_or_default() {
                groups.entry(key).or_default().push(value);
            }
        }
        let group_count = groups.len();
        debug!(
            job = job.name(),
            groups = group_count,
            "shuffle complete, starting reduce phase"
        );

        // Reduce phase: contiguous key ranges per task, serial within a range.
        let entries: Vec<(J::Key, Vec<J::Value>)> = groups.into_iter().collect();
        let chunk_size = entries.len().div_ceil(max_parallel).max(1);
        let mut chunks = Vec::new();
        let mut remaining = entries;
        while !remaining.is_empty() {
            let tail = remaining.split_off(chunk_size.min(remaining.len()));
            chunks.push(std::mem::replace(&mut remaining, tail));
        }

        let mut tasks = FuturesUnordered::new();
        for (index, chunk) in chunks.into_iter().enumerate() {
            let job = Arc::clone(&job);
            let permit = semaphore.clone().acquire_owned().await.unwrap();
            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let mut out = ReduceOutput::new();
                for (key, values) in chunk {
                    job.reduce(&key, values, &mut out);
                }
                (index, out.into_parts())
            }));
        }

        let mut reduce_slots: Vec<Option<(Vec<String>, Vec<(&'static str, String)>)>> = Vec::new();
        while let Some(joined) = tasks.next().await {
            let (index, parts) = joined.map_err(|source| ExecError::TaskFailed {
                job: job.name(),
                phase: "reduce",
                source,
            })?;
            if reduce_slots.len() <= index {
                reduce_slots.resize_with(index + 1, || None);
            }
            reduce_slots[index] = Some(parts);
        }

        let mut default_lines = Vec::new();
        let mut named: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for slot in reduce_slots {
            let (lines, named_lines) = slot.unwrap_or_default();
            default_lines.extend(lines);
            for (name, line) in named_lines {
                named.entry(name).or_default().push(line);
            }
        }
        let output_lines = default_lines.len() + named.values().map(Vec::len).sum::<usize>();

        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|source| ExecError::WriteFailed {
                path: out_dir.to_path_buf(),
                source,
            })?;
        write_part(out_dir, &default_lines).await?;
        for (name, lines) in &named {
            let bucket = out_dir.join(name);
            tokio::fs::create_dir_all(&bucket)
                .await
                .map_err(|source| ExecError::WriteFailed {
                    path: bucket.clone(),
                    source,
                })?;
            write_part(&bucket, lines).await?;
        }

        let stats = JobStats {
            job: job.name(),
            input_lines,
            rejected_lines,
            map_emits,
            groups: group_count,
            output_lines,
        };
        info!(
            job = stats.job,
            input_lines = stats.input_lines,
            rejected_lines = stats.rejected_lines,
            groups = stats.groups,
            output_lines = stats.output_lines,
            "job complete"
        );
        Ok(stats)
    }
}

async fn expand_splits(inputs: &[InputGroup]) -> ExecResult<Vec<(SourceId, PathBuf)>> {
    let mut splits = Vec::new();
    for group in inputs {
        for path in &group.paths {
            let meta =
                tokio::fs::metadata(path)
                    .await
                    .map_err(|source| ExecError::InputUnreadable {
                        path: path.clone(),
                        source,
                    })?;
            if meta.is_dir() {
                let mut files = Vec::new();
                let mut entries =
                    tokio::fs::read_dir(path)
                        .await
                        .map_err(|source| ExecError::ReadFailed {
                            path: path.clone(),
                            source,
                        })?;
                while let Some(entry) =
                    entries
                        .next_entry()
                        .await
                        .map_err(|source| ExecError::ReadFailed {
                            path: path.clone(),
                            source,
                        })?
                {
                    let entry_path = entry.path();
                    let hidden = entry_path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_none_or(|n| n.starts_with('.') || n.starts_with('_'));
                    if hidden {
                        continue;
                    }
                    let file_type =
                        entry
                            .file_type()
                            .await
                            .map_err(|source| ExecError::ReadFailed {
                                path: entry_path.clone(),
                                source,
                            })?;
                    if file_type.is_file() {
                        files.push(entry_path);
                    }
                }
                files.sort();
                splits.extend(files.into_iter().map(|f| (group.source, f)));
            } else {
                splits.push((group.source, path.clone()));
            }
        }
    }
    Ok(splits)
}

async fn write_part(dir: &Path, lines: &[String]) -> ExecResult<()> {
    let path = dir.join(PART_FILE);
    let mut body = lines.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    tokio::fs::write(&path, body)
        .await
        .map_err(|source| ExecError::WriteFailed { path, source })
}
