//! Parsing and normalization of input line formats.
//!
//! Three line shapes flow through the pipelines:
//!
//! - adjacency lists: `user: f1 f2 f3` (colon-delimited, whitespace-separated
//!   followees)
//! - mutual-pair lines: `userA-userB` (hyphen-delimited, exactly two fields)
//! - stage intermediates: `key\tvalue` (tab-separated)
//!
//! Every parser returns `Option`: a malformed line reduces the output, it
//! never aborts the run. Mappers count the drops but emit no per-line
//! diagnostics, so corrupt records in a large input cannot flood the log.

/// One user's follow list, parsed from `user: f1 f2 f3`.
///
/// Duplicate followees are preserved; the mutual-edge detector wants the raw
/// sequence, and recommendation filtering collapses it into a set on its own
/// side of the join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRecord {
    pub owner: String,
    pub followees: Vec<String>,
}

/// A mutual-pair line `userA-userB`. Sides are distinct and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRecord {
    pub a: String,
    pub b: String,
}

/// Parses an adjacency-list line. Exactly one colon is required; the owner
/// must be non-empty. An empty follow list (`user:`) is a valid record.
pub fn parse_adjacency(line: &str) -> Option<AdjacencyRecord> {
    let line = line.trim();
    if line.matches(':').count() != 1 {
        return None;
    }
    let (owner, rest) = line.split_once(':')?;
    let owner = owner.trim();
    if owner.is_empty() {
        return None;
    }
    let followees = rest.split_whitespace().map(str::to_string).collect();
    Some(AdjacencyRecord {
        owner: owner.to_string(),
        followees,
    })
}

/// Parses a mutual-pair line. Exactly one hyphen, both sides non-empty, and
/// the sides must differ: self-pairs are rejected here so that no caller ever
/// hands one to [`crate::pair::PairKey::new`].
pub fn parse_pair(line: &str) -> Option<PairRecord> {
    let line = line.trim();
    if line.matches('-').count() != 1 {
        return None;
    }
    let (a, b) = line.split_once('-')?;
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() || a == b {
        return None;
    }
    Some(PairRecord {
        a: a.to_string(),
        b: b.to_string(),
    })
}

/// One counter-style log record, extracted from fixed positional offsets of a
/// space-separated trace line: operation name at field 5, user namespace at
/// field 6, operation count at field 9.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRecord {
    pub op_name: String,
    pub namespace: String,
    pub count: u64,
}

/// Parses a counter-style log line. Fields are split on single spaces and
/// addressed by fixed offset; a line with fewer fields than required, an
/// empty namespace, or a non-numeric count is dropped.
pub fn parse_counter(line: &str) -> Option<CounterRecord> {
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() < 9 {
        return None;
    }
    let op_name = fields[4].trim();
    let namespace = fields[5].trim();
    if namespace.is_empty() {
        return None;
    }
    let count = fields[8].trim().parse().ok()?;
    Some(CounterRecord {
        op_name: op_name.to_string(),
        namespace: namespace.to_string(),
        count,
    })
}

/// Splits a stage-intermediate `key\tvalue` line. The value may be empty.
pub fn parse_keyed(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('\t')?;
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Splits a comma-joined list payload, dropping empty entries so that an
/// empty payload round-trips to an empty list.
pub fn split_list(payload: &str) -> Vec<String> {
    payload
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
