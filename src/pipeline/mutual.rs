//! Mutual-edge detection: which pairs of users follow each other.
//!
//! Single stage. Each adjacency record asserts "I follow the other side" for
//! every pair it participates in; a pair is mutual exactly when both sides
//! assert it.

use crate::exec::{Emitter, MapReduceJob, ReduceOutput, SourceId};
use crate::pair::PairKey;
use crate::record::parse_adjacency;
use std::collections::HashSet;

/// The single input group: adjacency-list lines.
pub const ADJACENCY: SourceId = SourceId(0);

pub struct MutualEdgeJob;

impl MapReduceJob for MutualEdgeJob {
    type Key = PairKey;
    type Value = String;

    fn name(&self) -> &'static str {
        "mutual-edges"
    }

    fn map(&self, _source: SourceId, line: &str, out: &mut Emitter<PairKey, String>) {
        if line.trim().is_empty() {
            return;
        }
        let Some(record) = parse_adjacency(line) else {
            out.reject();
            return;
        };
        for followee in &record.followees {
            // Self-follows cannot form a pair key.
            if followee == &record.owner {
                continue;
            }
            out.emit(PairKey::new(&record.owner, followee), record.owner.clone());
        }
    }

    fn reduce(&self, key: &PairKey, values: Vec<String>, out: &mut ReduceOutput) {
        let asserters: HashSet<&str> = values.iter().map(String::as_str).collect();
        // Exactly two distinct asserters means both directions are confirmed.
        // One means one-directional; more than two means a key collision or
        // malformed input and is treated as inconclusive, not mutual.
        if asserters.len() == 2 {
            out.emit_keyed(key.as_str(), "");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_line(line: &str) -> Vec<(PairKey, String)> {
        let mut out = Emitter::new();
        MutualEdgeJob.map(ADJACENCY, line, &mut out);
        out.pairs().to_vec()
    }

    fn reduce_values(key: PairKey, values: &[&str]) -> Vec<String> {
        let mut out = ReduceOutput::new();
        MutualEdgeJob.reduce(
            &key,
            values.iter().map(|v| v.to_string()).collect(),
            &mut out,
        );
        out.lines().to_vec()
    }

    #[test]
    fn map_asserts_ownership_of_each_pair() {
        let pairs = map_line("alice: bob carol");
        assert_eq!(
            pairs,
            vec![
                (PairKey::new("alice", "bob"), "alice".to_string()),
                (PairKey::new("alice", "carol"), "alice".to_string()),
            ]
        );
    }

    #[test]
    fn map_skips_self_follow() {
        assert!(map_line("alice: alice").is_empty());
    }

    #[test]
    fn reduce_confirms_two_distinct_asserters() {
        let lines = reduce_values(PairKey::new("alice", "bob"), &["alice", "bob"]);
        assert_eq!(lines, vec!["alice-bob\t"]);
    }

    #[test]
    fn reduce_rejects_one_direction() {
        assert!(reduce_values(PairKey::new("alice", "bob"), &["alice"]).is_empty());
        // Duplicate assertions from the same side collapse to one member.
        assert!(reduce_values(PairKey::new("alice", "bob"), &["alice", "alice"]).is_empty());
    }

    #[test]
    fn reduce_treats_more_than_two_as_inconclusive() {
        let lines = reduce_values(PairKey::new("alice", "bob"), &["alice", "bob", "mallory"]);
        assert!(lines.is_empty());
    }

    #[test]
    fn duplicate_assertions_with_both_sides_still_confirm() {
        let lines = reduce_values(PairKey::new("alice", "bob"), &["alice", "alice", "bob"]);
        assert_eq!(lines, vec!["alice-bob\t"]);
    }
}
