//! Common-follower computation for mutual pairs, with threshold routing.
//!
//! Two stages joined by the filesystem. Stage 1 attaches each user's follow
//! list to every mutual pair that user participates in, re-keying by the
//! canonical pair key. Stage 2 intersects the two attached lists and routes
//! each non-empty intersection to the "small" or "large" bucket by size.

use crate::exec::{Emitter, MapReduceJob, ReduceOutput, SourceId};
use crate::pair::PairKey;
use crate::record::{parse_adjacency, parse_keyed, parse_pair, split_list};
use std::collections::BTreeSet;

/// Stage-1 input groups.
pub const PAIRS: SourceId = SourceId(0);
pub const LISTS: SourceId = SourceId(1);

/// Stage-2 input group: stage 1's part files.
pub const JOINED: SourceId = SourceId(0);

/// Named output buckets for stage 2.
pub const SMALL: &str = "small";
pub const LARGE: &str = "large";

/// Values multiplexed under one user key in stage 1. Two decoupled sources
/// feed the same key, so the value itself says which one produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinValue {
    /// The other side of a mutual pair containing this user.
    Partner(String),
    /// This user's own follow list.
    FollowList(Vec<String>),
}

/// Stage 1: pair/list join keyed by user, re-keyed by pair on output.
pub struct PairListJoinJob;

impl MapReduceJob for PairListJoinJob {
    type Key = String;
    type Value = JoinValue;

    fn name(&self) -> &'static str {
        "common-followers/join"
    }

    fn map(&self, source: SourceId, line: &str, out: &mut Emitter<String, JoinValue>) {
        if line.trim().is_empty() {
            return;
        }
        match source {
            PAIRS => {
                let Some(pair) = parse_pair(line) else {
                    out.reject();
                    return;
                };
                out.emit(pair.a.clone(), JoinValue::Partner(pair.b.clone()));
                out.emit(pair.b, JoinValue::Partner(pair.a));
            }
            LISTS => {
                let Some(record) = parse_adjacency(line) else {
                    out.reject();
                    return;
                };
                out.emit(record.owner, JoinValue::FollowList(record.followees));
            }
            _ => out.reject(),
        }
    }

    fn reduce(&self, user: &String, values: Vec<JoinValue>, out: &mut ReduceOutput) {
        let mut partners = Vec::new();
        let mut follow_list: Option<Vec<String>> = None;
        for value in values {
            match value {
                JoinValue::Partner(p) => {
                    if p != *user {
                        partners.push(p);
                    }
                }
                JoinValue::FollowList(list) => {
                    // At most one list is honored; first delivered wins.
                    follow_list.get_or_insert(list);
                }
            }
        }
        let payload = follow_list.unwrap_or_default().join(",");
        for partner in partners {
            out.emit_keyed(PairKey::new(user, &partner).as_str(), &payload);
        }
    }
}

/// Stage 2: per-pair intersection and size-based routing.
pub struct IntersectRouteJob {
    /// Inclusive upper bound for the "small" bucket.
    pub threshold: usize,
}

impl MapReduceJob for IntersectRouteJob {
    type Key = String;
    type Value = Vec<String>;

    fn name(&self) -> &'static str {
        "common-followers/route"
    }

    fn map(&self, _source: SourceId, line: &str, out: &mut Emitter<String, Vec<String>>) {
        if line.trim().is_empty() {
            return;
        }
        let Some((pair_key, payload)) = parse_keyed(line) else {
            out.reject();
            return;
        };
        out.emit(pair_key.to_string(), split_list(payload));
    }

    fn reduce(&self, pair_key: &String, values: Vec<Vec<String>>, out: &mut ReduceOutput) {
        // A well-formed pair receives exactly one list per side. Anything else
        // is asymmetric or duplicated data and the pair is suppressed.
        let [left, right]: [Vec<String>; 2] = match values.try_into() {
            Ok(sides) => sides,
            Err(_) => return,
        };
        let left: BTreeSet<&str> = left.iter().map(String::as_str).collect();
        let right: BTreeSet<&str> = right.iter().map(String::as_str).collect();
        let common: Vec<&str> = left.intersection(&right).copied().collect();
        if common.is_empty() {
            return;
        }
        let line = format!("{pair_key}: {}", common.join(" "));
        let bucket = if common.len() <= self.threshold {
            SMALL
        } else {
            LARGE
        };
        out.emit_named(bucket, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join_reduce(user: &str, values: Vec<JoinValue>) -> Vec<String> {
        let mut out = ReduceOutput::new();
        PairListJoinJob.reduce(&user.to_string(), values, &mut out);
        out.lines().to_vec()
    }

    fn route_reduce(threshold: usize, pair: &str, values: Vec<Vec<String>>) -> Vec<(&'static str, String)> {
        let mut out = ReduceOutput::new();
        IntersectRouteJob { threshold }.reduce(&pair.to_string(), values, &mut out);
        out.named().to_vec()
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn join_map_emits_both_pair_sides() {
        let mut out = Emitter::new();
        PairListJoinJob.map(PAIRS, "alice-bob", &mut out);
        assert_eq!(
            out.pairs(),
            &[
                ("alice".to_string(), JoinValue::Partner("bob".to_string())),
                ("bob".to_string(), JoinValue::Partner("alice".to_string())),
            ]
        );
    }

    #[test]
    fn join_map_emits_follow_list_payload() {
        let mut out = Emitter::new();
        PairListJoinJob.map(LISTS, "alice: x y", &mut out);
        assert_eq!(
            out.pairs(),
            &[(
                "alice".to_string(),
                JoinValue::FollowList(list(&["x", "y"]))
            )]
        );
    }

    #[test]
    fn join_reduce_rekeys_by_pair() {
        let lines = join_reduce(
            "bob",
            vec![
                JoinValue::Partner("alice".to_string()),
                JoinValue::FollowList(list(&["x", "y"])),
                JoinValue::Partner("carol".to_string()),
            ],
        );
        assert_eq!(lines, vec!["alice-bob\tx,y", "bob-carol\tx,y"]);
    }

    #[test]
    fn join_reduce_without_list_emits_empty_payload() {
        let lines = join_reduce("bob", vec![JoinValue::Partner("alice".to_string())]);
        assert_eq!(lines, vec!["alice-bob\t"]);
    }

    #[test]
    fn route_requires_exactly_two_payloads() {
        assert!(route_reduce(2, "a-b", vec![list(&["x"])]).is_empty());
        assert!(route_reduce(2, "a-b", vec![list(&["x"]), list(&["x"]), list(&["x"])]).is_empty());
    }

    #[test]
    fn route_suppresses_empty_intersection() {
        assert!(route_reduce(2, "a-b", vec![list(&["x"]), list(&["y"])]).is_empty());
    }

    #[test]
    fn route_is_symmetric_in_payload_order() {
        let forward = route_reduce(2, "a-b", vec![list(&["x", "y", "z"]), list(&["y", "z", "w"])]);
        let backward = route_reduce(2, "a-b", vec![list(&["y", "z", "w"]), list(&["x", "y", "z"])]);
        assert_eq!(forward, backward);
        assert_eq!(forward, vec![(SMALL, "a-b: y z".to_string())]);
    }

    #[test]
    fn route_boundary_lands_in_small() {
        // Intersection size equal to the threshold is inclusive.
        let out = route_reduce(2, "a-b", vec![list(&["x", "y"]), list(&["x", "y"])]);
        assert_eq!(out, vec![(SMALL, "a-b: x y".to_string())]);

        let out = route_reduce(1, "a-b", vec![list(&["x", "y"]), list(&["x", "y"])]);
        assert_eq!(out, vec![(LARGE, "a-b: x y".to_string())]);
    }
}
