//! CLI argument structures.
//!
//! Positional arguments mirror the pipeline drivers' input/output ordering;
//! clap rejects a wrong argument count before any stage is submitted.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Batch relationship analytics over a social-follow graph
#[derive(Parser)]
#[command(name = "followgraph")]
#[command(about = "Compute mutual edges, common followers, and friend recommendations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Maximum number of parallel map/reduce tasks
    #[arg(long, default_value = "8", global = true)]
    pub max_parallel: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect mutually-following pairs from adjacency lists
    Mutual {
        /// Adjacency-list input (file or directory of part files)
        input: PathBuf,
        /// Output directory (must not exist)
        output: PathBuf,
    },
    /// Intersect the follow lists of each mutual pair, routing by size
    CommonFollowers {
        /// Mutual-pair input (`userA-userB` lines)
        pairs: PathBuf,
        /// Adjacency-list input
        lists: PathBuf,
        /// Inclusive size bound for the "small" bucket
        threshold: usize,
        /// Stage-1 output directory (must not exist)
        intermediate: PathBuf,
        /// Final output directory with small/ and large/ buckets (must not exist)
        output: PathBuf,
    },
    /// Sum per-namespace operation counts from IO trace logs
    Iolog {
        /// Counter-style trace log input (file or directory of part files)
        input: PathBuf,
        /// Output directory (must not exist)
        output: PathBuf,
    },
    /// Recommend not-yet-followed friends of friends
    Recommend {
        /// Mutual-pair input (`userA-userB` lines)
        pairs: PathBuf,
        /// Adjacency-list input
        lists: PathBuf,
        /// Stage-1 candidate output directory (must not exist)
        candidates: PathBuf,
        /// Final output directory (must not exist)
        output: PathBuf,
    },
}
