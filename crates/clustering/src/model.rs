use serde::Serialize;

use crate::config::DuplicatePolicy;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One scored comparison between an entity of the left collection and an
/// entity of the right collection.
///
/// `right` is local to the right collection (`0..right_entities`); the
/// engine shifts it into the shared id space when it emits edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePair {
    pub left: usize,
    pub right: usize,
    pub similarity: f64,
}

impl CandidatePair {
    pub fn new(left: usize, right: usize, similarity: f64) -> Self {
        Self {
            left,
            right,
            similarity,
        }
    }
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Which greedy pass produced a row→column mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    Row,
    Column,
}

impl std::fmt::Display for ScanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Column => write!(f, "column"),
        }
    }
}

/// Row→column mapping from one greedy pass plus the total cost it paid.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub kind: ScanKind,
    pub columns: Vec<usize>,
    pub total_cost: f64,
}

// ---------------------------------------------------------------------------
// Emission
// ---------------------------------------------------------------------------

/// An accepted match in the shared id space (right ids offset by the left
/// collection size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge {
    pub left: usize,
    pub right: usize,
}

/// An accepted pair that touched an id already consumed by an earlier edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateConflict {
    pub row: usize,
    pub column: usize,
    pub edge: Edge,
    /// Shared-space ids that were already matched.
    pub already_matched: Vec<usize>,
    pub policy: DuplicatePolicy,
    pub inserted: bool,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One connected component of accepted edges, split back into the two
/// collections' local id spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquivalenceCluster {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterSummary {
    pub input_comparisons: usize,
    pub accepted_edges: usize,
    pub rejected_below_threshold: usize,
    pub duplicate_conflicts: usize,
    pub clusters: usize,
    pub unmatched_left: usize,
    pub unmatched_right: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chosen_scan: Option<ScanKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_scan_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_scan_cost: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusteringMeta {
    pub config_name: String,
    pub method: String,
    pub method_info: String,
    pub engine_version: String,
    pub run_at: String,
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusteringResult {
    pub meta: ClusteringMeta,
    pub summary: ClusterSummary,
    pub clusters: Vec<EquivalenceCluster>,
    /// Accepted edges in emission order.
    pub edges: Vec<Edge>,
    pub conflicts: Vec<DuplicateConflict>,
}
