//! Friend-of-friend recommendation.
//!
//! Two stages. Stage 1 expands every user's mutual-friend set into all
//! ordered two-hop candidate pairs: if A is mutual with both B and C, then B
//! and C each become a candidate for the other. Quadratic in friend count per
//! user, by design. Stage 2 joins the candidate stream against each user's
//! follow list, drops self and already-followed users, deduplicates keeping
//! first-seen order, and caps the result at five.

use crate::exec::{Emitter, MapReduceJob, ReduceOutput, SourceId};
use crate::record::{parse_adjacency, parse_keyed, parse_pair};
use std::collections::HashSet;

/// Stage-1 input group: mutual-pair lines.
pub const PAIRS: SourceId = SourceId(0);

/// Stage-2 input groups.
pub const CANDIDATES: SourceId = SourceId(0);
pub const LISTS: SourceId = SourceId(1);

/// Maximum recommendations emitted per user.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Stage 1: two-hop candidate expansion over mutual pairs.
pub struct CandidateExpansionJob;

impl MapReduceJob for CandidateExpansionJob {
    type Key = String;
    type Value = String;

    fn name(&self) -> &'static str {
        "recommend/expand"
    }

    fn map(&self, _source: SourceId, line: &str, out: &mut Emitter<String, String>) {
        if line.trim().is_empty() {
            return;
        }
        let Some(pair) = parse_pair(line) else {
            out.reject();
            return;
        };
        // Materialize the mutual pair as a bidirectional adjacency.
        out.emit(pair.a.clone(), pair.b.clone());
        out.emit(pair.b, pair.a);
    }

    fn reduce(&self, _user: &String, friends: Vec<String>, out: &mut ReduceOutput) {
        for (i, target) in friends.iter().enumerate() {
            for (j, candidate) in friends.iter().enumerate() {
                // Comparing by value as well as index keeps a duplicated pair
                // line from producing a self-candidate downstream.
                if i == j || target == candidate {
                    continue;
                }
                out.emit_keyed(target, candidate);
            }
        }
    }
}

/// Values multiplexed under one user key in stage 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendValue {
    /// A two-hop candidate proposed for this user.
    Candidate(String),
    /// Users this user already follows.
    Followed(Vec<String>),
}

/// Stage 2: filter against the follow list, dedup, cap.
pub struct FilterCapJob;

impl MapReduceJob for FilterCapJob {
    type Key = String;
    type Value = RecommendValue;

    fn name(&self) -> &'static str {
        "recommend/filter"
    }

    fn map(&self, source: SourceId, line: &str, out: &mut Emitter<String, RecommendValue>) {
        if line.trim().is_empty() {
            return;
        }
        match source {
            CANDIDATES => {
                let Some((target, candidate)) = parse_keyed(line) else {
                    out.reject();
                    return;
                };
                if candidate.is_empty() {
                    out.reject();
                    return;
                }
                out.emit(
                    target.to_string(),
                    RecommendValue::Candidate(candidate.to_string()),
                );
            }
            LISTS => {
                let Some(record) = parse_adjacency(line) else {
                    out.reject();
                    return;
                };
                out.emit(record.owner, RecommendValue::Followed(record.followees));
            }
            _ => out.reject(),
        }
    }

    fn reduce(&self, user: &String, values: Vec<RecommendValue>, out: &mut ReduceOutput) {
        let mut followed: HashSet<String> = HashSet::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut ordered: Vec<String> = Vec::new();
        for value in values {
            match value {
                RecommendValue::Candidate(c) => {
                    // First occurrence fixes the position; later duplicates
                    // are discarded, never promoted.
                    if seen.insert(c.clone()) {
                        ordered.push(c);
                    }
                }
                RecommendValue::Followed(list) => followed.extend(list),
            }
        }
        let picks: Vec<String> = ordered
            .into_iter()
            .filter(|c| c != user && !followed.contains(c))
            .take(MAX_RECOMMENDATIONS)
            .collect();
        if !picks.is_empty() {
            out.emit_keyed(user, &picks.join(","));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(friends: &[&str]) -> Vec<String> {
        let mut out = ReduceOutput::new();
        CandidateExpansionJob.reduce(
            &"anchor".to_string(),
            friends.iter().map(|f| f.to_string()).collect(),
            &mut out,
        );
        out.lines().to_vec()
    }

    fn filter(user: &str, values: Vec<RecommendValue>) -> Vec<String> {
        let mut out = ReduceOutput::new();
        FilterCapJob.reduce(&user.to_string(), values, &mut out);
        out.lines().to_vec()
    }

    fn candidate(c: &str) -> RecommendValue {
        RecommendValue::Candidate(c.to_string())
    }

    fn followed(list: &[&str]) -> RecommendValue {
        RecommendValue::Followed(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn expansion_emits_all_ordered_pairs() {
        assert_eq!(expand(&["b", "c"]), vec!["b\tc", "c\tb"]);
        assert_eq!(
            expand(&["b", "c", "d"]),
            vec!["b\tc", "b\td", "c\tb", "c\td", "d\tb", "d\tc"]
        );
    }

    #[test]
    fn expansion_skips_equal_values_from_duplicate_pairs() {
        // The same pair line twice yields a duplicated friend entry; the
        // expansion must not turn it into a self-candidate.
        assert_eq!(expand(&["b", "b"]), Vec::<String>::new());
        assert_eq!(expand(&["b", "b", "c"]), vec!["b\tc", "b\tc", "c\tb", "c\tb"]);
    }

    #[test]
    fn filter_removes_followed_and_self() {
        let lines = filter(
            "b",
            vec![
                candidate("a"),
                candidate("c"),
                candidate("b"),
                followed(&["a"]),
            ],
        );
        assert_eq!(lines, vec!["b\tc"]);
    }

    #[test]
    fn filter_dedups_keeping_first_seen_order() {
        let lines = filter(
            "u",
            vec![candidate("x"), candidate("y"), candidate("x"), candidate("z")],
        );
        assert_eq!(lines, vec!["u\tx,y,z"]);
    }

    #[test]
    fn filter_caps_at_five_in_relative_order() {
        let values = ["c1", "c2", "c3", "c4", "c5", "c6", "c7"]
            .into_iter()
            .map(candidate)
            .collect();
        let lines = filter("u", values);
        assert_eq!(lines, vec!["u\tc1,c2,c3,c4,c5"]);
    }

    #[test]
    fn filter_cap_applies_after_filtering() {
        // Followed candidates do not consume cap slots.
        let mut values: Vec<RecommendValue> = ["f1", "f2", "c1", "c2", "c3", "c4", "c5"]
            .into_iter()
            .map(candidate)
            .collect();
        values.push(followed(&["f1", "f2"]));
        let lines = filter("u", values);
        assert_eq!(lines, vec!["u\tc1,c2,c3,c4,c5"]);
    }

    #[test]
    fn filter_emits_nothing_when_no_candidate_survives() {
        assert!(filter("u", vec![candidate("a"), followed(&["a"])]).is_empty());
        assert!(filter("u", vec![followed(&["a", "b"])]).is_empty());
    }

    #[test]
    fn followed_sets_union_across_payloads() {
        let lines = filter(
            "u",
            vec![
                candidate("a"),
                candidate("b"),
                followed(&["a"]),
                followed(&["b"]),
            ],
        );
        assert!(lines.is_empty());
    }
}
