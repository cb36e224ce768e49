//! The grouped-aggregation job contract.
//!
//! A job is a pair of pure, synchronous functions: `map` turns one input line
//! into zero or more `(key, value)` emissions, and `reduce` consumes the full
//! value group of one key after the shuffle barrier. Everything else —
//! partitioning, shuffling, grouping, task scheduling — belongs to the
//! executor behind [`crate::exec::LocalExecutor`].

use serde::Serialize;

/// Identifies which configured input group a line was read from.
///
/// Jobs that join decoupled sources (pair lines vs. adjacency lists) declare
/// one `SourceId` constant per source and dispatch on it in `map`, rather
/// than sniffing the line shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub usize);

/// Collects the emissions of one map invocation.
#[derive(Debug)]
pub struct Emitter<K, V> {
    pairs: Vec<(K, V)>,
    rejected: usize,
}

impl<K, V> Emitter<K, V> {
    pub fn new() -> Self {
        Self {
            pairs: Vec::new(),
            rejected: 0,
        }
    }

    pub fn emit(&mut self, key: K, value: V) {
        self.pairs.push((key, value));
    }

    /// Records a malformed input line. Rejection is silent per line; the
    /// executor surfaces only an aggregate count in [`JobStats`].
    pub fn reject(&mut self) {
        self.rejected += 1;
    }

    pub(crate) fn into_parts(self) -> (Vec<(K, V)>, usize) {
        (self.pairs, self.rejected)
    }

    #[cfg(test)]
    pub(crate) fn pairs(&self) -> &[(K, V)] {
        &self.pairs
    }
}

impl<K, V> Default for Emitter<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects the output lines of one reduce invocation.
///
/// A job may write to the default stream or to named streams; named streams
/// land in per-name subdirectories of the stage output directory, which is
/// how threshold routing produces its "small" and "large" buckets.
#[derive(Debug, Default)]
pub struct ReduceOutput {
    lines: Vec<String>,
    named: Vec<(&'static str, String)>,
}

impl ReduceOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a raw line to the default output stream.
    pub fn emit(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Emits a `key\tvalue` line to the default output stream.
    pub fn emit_keyed(&mut self, key: &str, value: &str) {
        self.lines.push(format!("{key}\t{value}"));
    }

    /// Emits a raw line to the named output stream `name`.
    pub fn emit_named(&mut self, name: &'static str, line: String) {
        self.named.push((name, line));
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<(&'static str, String)>) {
        (self.lines, self.named)
    }

    #[cfg(test)]
    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }

    #[cfg(test)]
    pub(crate) fn named(&self) -> &[(&'static str, String)] {
        &self.named
    }
}

/// One map/shuffle/reduce stage.
///
/// Both operations must be order-independent over their inputs except where a
/// job deliberately depends on delivery order (first-seen deduplication); the
/// local executor delivers values in a deterministic order — source order,
/// then file order, then line order — so such jobs are at least reproducible.
pub trait MapReduceJob: Send + Sync + 'static {
    type Key: Ord + Send + 'static;
    type Value: Send + 'static;

    fn name(&self) -> &'static str;

    /// Maps one input line to zero or more keyed emissions. Malformed lines
    /// are rejected via [`Emitter::reject`], never by failing the stage.
    fn map(&self, source: SourceId, line: &str, out: &mut Emitter<Self::Key, Self::Value>);

    /// Reduces the full value group of one key. Runs serially per key.
    fn reduce(&self, key: &Self::Key, values: Vec<Self::Value>, out: &mut ReduceOutput);
}

/// Per-stage counters, logged when a stage completes.
#[derive(Debug, Clone, Serialize)]
pub struct JobStats {
    pub job: &'static str,
    pub input_lines: usize,
    pub rejected_lines: usize,
    pub map_emits: usize,
    pub groups: usize,
    pub output_lines: usize,
}
