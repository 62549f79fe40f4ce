//! `rowcol-clustering` - Row-column proxy clustering for clean-clean entity resolution.
//!
//! Pure engine crate: receives pre-loaded candidate pairs, returns clusters.
//! The assignment is approximate: two greedy scans over a cost matrix, the
//! cheaper one wins. No CLI dependencies.

pub mod config;
pub mod emit;
pub mod engine;
pub mod error;
pub mod graph;
pub mod input;
pub mod matrix;
pub mod model;
pub mod scan;
pub mod selector;

pub use config::{ClusteringConfig, DuplicatePolicy, MatchingMode};
pub use engine::{run, RowColumnClustering};
pub use error::ClusterError;
pub use input::load_csv_pairs;
pub use model::{CandidatePair, ClusteringResult, EquivalenceCluster};
