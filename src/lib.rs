//! # followgraph
//!
//! Batch relationship analytics over a social-follow graph, expressed as
//! key-grouped map/reduce pipelines instead of in-memory graph traversal.
//!
//! ## Pipelines
//!
//! ```bash
//! followgraph mutual <lists> <out>
//! followgraph common-followers <pairs> <lists> <threshold> <intermediate> <out>
//! followgraph recommend <pairs> <lists> <candidates> <out>
//! followgraph iolog <trace-logs> <out>
//! ```
//!
//! ## Modules
//!
//! - `record` - Input line parsing and normalization
//! - `pair` - Canonical order-independent keys for unordered user pairs
//! - `exec` - The grouped-aggregation job contract and a local executor
//! - `pipeline` - The three relationship pipelines and their stage drivers
//! - `cli` - Command-line argument structures

pub mod cli;
pub mod error;
pub mod exec;
pub mod pair;
pub mod pipeline;
pub mod record;
