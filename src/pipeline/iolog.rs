//! Per-namespace operation-count totals from IO trace logs.
//!
//! Single stage over counter-style log lines. Only records for one operation
//! kind are kept; their counts are summed per user namespace. Output is
//! comma-separated (`namespace,total`), unlike the tab-keyed relationship
//! outputs.

use crate::exec::{Emitter, MapReduceJob, ReduceOutput, SourceId};
use crate::record::parse_counter;

/// The single input group: counter-style trace log lines.
pub const LOGS: SourceId = SourceId(0);

/// Operation name selecting the records that are tallied.
const TARGET_OP: &str = "2";

pub struct OpCountSumJob;

impl MapReduceJob for OpCountSumJob {
    type Key = String;
    type Value = u64;

    fn name(&self) -> &'static str {
        "iolog-opcount"
    }

    fn map(&self, _source: SourceId, line: &str, out: &mut Emitter<String, u64>) {
        if line.trim().is_empty() {
            return;
        }
        let Some(record) = parse_counter(line) else {
            out.reject();
            return;
        };
        if record.op_name == TARGET_OP {
            out.emit(record.namespace, record.count);
        }
    }

    fn reduce(&self, namespace: &String, counts: Vec<u64>, out: &mut ReduceOutput) {
        let total: u64 = counts.iter().sum();
        out.emit(format!("{namespace},{total}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_line(line: &str) -> Vec<(String, u64)> {
        let mut out = Emitter::new();
        OpCountSumJob.map(LOGS, line, &mut out);
        out.pairs().to_vec()
    }

    #[test]
    fn map_keeps_only_target_operation() {
        let pairs = map_line("t0 t1 dev proc 2 ns0 a b 42");
        assert_eq!(pairs, vec![("ns0".to_string(), 42)]);

        // Other operation kinds are filtered, not rejected.
        assert!(map_line("t0 t1 dev proc 3 ns0 a b 42").is_empty());
    }

    #[test]
    fn map_drops_short_and_non_numeric_lines() {
        let mut out = Emitter::new();
        OpCountSumJob.map(LOGS, "too few fields", &mut out);
        OpCountSumJob.map(LOGS, "t0 t1 dev proc 2 ns0 a b NaN", &mut out);
        let (pairs, rejected) = out.into_parts();
        assert!(pairs.is_empty());
        assert_eq!(rejected, 2);
    }

    #[test]
    fn reduce_sums_counts_with_comma_separator() {
        let mut out = ReduceOutput::new();
        OpCountSumJob.reduce(&"ns0".to_string(), vec![10, 5, 27], &mut out);
        assert_eq!(out.lines(), &["ns0,42".to_string()]);
    }
}
