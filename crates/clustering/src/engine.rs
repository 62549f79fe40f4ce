use log::{debug, info, warn};

use crate::config::{validate_threshold, ClusteringConfig, DuplicatePolicy, MatchingMode, DEFAULT_THRESHOLD};
use crate::emit::{emit_edges, EmitReport, MatchedIdSet};
use crate::error::ClusterError;
use crate::graph::SimilarityGraph;
use crate::matrix::{build_matrices, CostMatrix, SimilarityMatrix};
use crate::model::{
    CandidatePair, ClusterSummary, ClusteringMeta, ClusteringResult, DuplicateConflict, Edge,
    EquivalenceCluster,
};
use crate::selector::{run_scans, select, ScanPair, Selection};

pub const METHOD_NAME: &str = "Row-Column Proxy Clustering";
pub const METHOD_INFO: &str =
    "Row-Column Proxy Clustering: it creates clusters after approximately solving the assignment problem.";

/// Run one clustering pass per config on pre-loaded candidate pairs.
pub fn run(config: &ClusteringConfig, pairs: &[CandidatePair]) -> Result<ClusteringResult, ClusterError> {
    let mut clustering = RowColumnClustering::from_config(config)?;
    clustering.cluster(&config.mode, pairs)
}

// ---------------------------------------------------------------------------
// Clustering instance
// ---------------------------------------------------------------------------

/// Clean-clean clustering by approximate assignment.
///
/// Holds the threshold and the set of ids matched so far. The set survives
/// between [`cluster`](Self::cluster) calls on purpose: a second call
/// without [`reset`](Self::reset) or [`reconfigure`](Self::reconfigure)
/// sees every id it emitted before and reports the overlap as conflicts.
#[derive(Debug)]
pub struct RowColumnClustering {
    name: String,
    threshold: f64,
    duplicate_policy: DuplicatePolicy,
    parallel_scans: bool,
    matched: MatchedIdSet,
}

impl Default for RowColumnClustering {
    fn default() -> Self {
        Self {
            name: "row-column".into(),
            threshold: DEFAULT_THRESHOLD,
            duplicate_policy: DuplicatePolicy::default(),
            parallel_scans: false,
            matched: MatchedIdSet::new(),
        }
    }
}

impl RowColumnClustering {
    pub fn new(threshold: f64) -> Result<Self, ClusterError> {
        validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            ..Self::default()
        })
    }

    pub fn from_config(config: &ClusteringConfig) -> Result<Self, ClusterError> {
        config.validate()?;
        Ok(Self {
            name: config.name.clone(),
            threshold: config.threshold,
            duplicate_policy: DuplicatePolicy::default(),
            parallel_scans: config.parallel_scans,
            matched: MatchedIdSet::new(),
        })
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_parallel_scans(mut self, parallel: bool) -> Self {
        self.parallel_scans = parallel;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn matched_ids(&self) -> &MatchedIdSet {
        &self.matched
    }

    pub fn method_name(&self) -> &'static str {
        METHOD_NAME
    }

    pub fn method_info(&self) -> &'static str {
        METHOD_INFO
    }

    /// Switch to a new threshold. Clears the matched-id set so the next run
    /// starts clean.
    pub fn reconfigure(&mut self, threshold: f64) -> Result<(), ClusterError> {
        validate_threshold(threshold)?;
        self.threshold = threshold;
        self.matched.clear();
        Ok(())
    }

    /// Forget every matched id without changing the threshold.
    pub fn reset(&mut self) {
        self.matched.clear();
    }

    /// Cluster `pairs` into one-to-one matches between the two collections.
    ///
    /// Returns [`ClusterError::Unsupported`] for anything but clean-clean
    /// mode, before touching the pairs. An empty pair list yields an empty
    /// result.
    pub fn cluster(
        &mut self,
        mode: &MatchingMode,
        pairs: &[CandidatePair],
    ) -> Result<ClusteringResult, ClusterError> {
        let (left_entities, right_entities) = match *mode {
            MatchingMode::CleanClean {
                left_entities,
                right_entities,
            } => (left_entities, right_entities),
            MatchingMode::Dirty { .. } => {
                return Err(ClusterError::Unsupported {
                    mode: mode.to_string(),
                })
            }
        };

        info!("input comparisons: {}", pairs.len());

        if pairs.is_empty() {
            warn!("no comparisons to cluster, skipping run");
            return Ok(self.result(ClustersReady::empty(left_entities, right_entities)));
        }

        let ready = MatrixBuilt::build(pairs, self.threshold, left_entities, right_entities)?
            .scan(self.parallel_scans)
            .select()
            .emit(self.threshold, self.duplicate_policy, &mut self.matched)
            .extract();

        info!(
            "{}: {} edges, {} clusters, {} conflicts",
            METHOD_NAME,
            ready.edges.len(),
            ready.clusters.len(),
            ready.conflicts.len()
        );

        Ok(self.result(ready))
    }

    fn result(&self, ready: ClustersReady) -> ClusteringResult {
        ClusteringResult {
            meta: ClusteringMeta {
                config_name: self.name.clone(),
                method: METHOD_NAME.to_string(),
                method_info: METHOD_INFO.to_string(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
                threshold: self.threshold,
            },
            summary: ready.summary,
            clusters: ready.clusters,
            edges: ready.edges,
            conflicts: ready.conflicts,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline stages
//
// Uninitialized -> MatrixBuilt -> ScansComplete -> SolutionChosen
//   -> EdgesEmitted -> ClustersReady
//
// Each stage is its own type and each transition consumes the previous one,
// so no stage can be skipped or revisited.
// ---------------------------------------------------------------------------

struct MatrixBuilt {
    input_comparisons: usize,
    left_entities: usize,
    right_entities: usize,
    similarity: SimilarityMatrix,
    cost: CostMatrix,
}

impl MatrixBuilt {
    fn build(
        pairs: &[CandidatePair],
        threshold: f64,
        left_entities: usize,
        right_entities: usize,
    ) -> Result<Self, ClusterError> {
        let (similarity, cost) = build_matrices(pairs, threshold, left_entities, right_entities)?;
        debug!("matrix built: {0}x{0} for {left_entities}+{right_entities} entities", cost.size());
        Ok(Self {
            input_comparisons: pairs.len(),
            left_entities,
            right_entities,
            similarity,
            cost,
        })
    }

    fn scan(self, parallel: bool) -> ScansComplete {
        let scans = run_scans(&self.cost, parallel);
        debug!(
            "scans complete: row cost {:.6}, column cost {:.6}",
            scans.row.total_cost, scans.column.total_cost
        );
        ScansComplete { built: self, scans }
    }
}

struct ScansComplete {
    built: MatrixBuilt,
    scans: ScanPair,
}

impl ScansComplete {
    fn select(self) -> SolutionChosen {
        let selection = select(self.scans);
        debug!("solution chosen: {} scan", selection.kind());
        SolutionChosen {
            built: self.built,
            selection,
        }
    }
}

struct SolutionChosen {
    built: MatrixBuilt,
    selection: Selection,
}

impl SolutionChosen {
    fn emit(self, threshold: f64, policy: DuplicatePolicy, matched: &mut MatchedIdSet) -> EdgesEmitted {
        let MatrixBuilt {
            input_comparisons,
            left_entities,
            right_entities,
            similarity,
            cost,
        } = self.built;
        // Only the similarity values are needed from here on.
        drop(cost);

        let mut graph = SimilarityGraph::new(left_entities + right_entities);
        let report = emit_edges(
            &similarity,
            &self.selection.chosen,
            threshold,
            left_entities,
            policy,
            matched,
            &mut graph,
        );
        debug!(
            "edges emitted: {} accepted, {} below threshold",
            report.accepted.len(),
            report.rejected_below_threshold
        );
        EdgesEmitted {
            input_comparisons,
            left_entities,
            right_entities,
            selection: self.selection,
            graph,
            report,
        }
    }
}

struct EdgesEmitted {
    input_comparisons: usize,
    left_entities: usize,
    right_entities: usize,
    selection: Selection,
    graph: SimilarityGraph,
    report: EmitReport,
}

impl EdgesEmitted {
    fn extract(mut self) -> ClustersReady {
        let clusters = self.graph.clusters(self.left_entities);
        let matched_left: usize = clusters.iter().map(|c| c.left.len()).sum();
        let matched_right: usize = clusters.iter().map(|c| c.right.len()).sum();
        debug!("clusters ready: {}", clusters.len());

        let summary = ClusterSummary {
            input_comparisons: self.input_comparisons,
            accepted_edges: self.report.accepted.len(),
            rejected_below_threshold: self.report.rejected_below_threshold,
            duplicate_conflicts: self.report.conflicts.len(),
            clusters: clusters.len(),
            unmatched_left: self.left_entities - matched_left,
            unmatched_right: self.right_entities - matched_right,
            chosen_scan: Some(self.selection.kind()),
            row_scan_cost: Some(self.selection.row_cost),
            column_scan_cost: Some(self.selection.column_cost),
        };

        ClustersReady {
            summary,
            clusters,
            edges: self.report.accepted,
            conflicts: self.report.conflicts,
        }
    }
}

struct ClustersReady {
    summary: ClusterSummary,
    clusters: Vec<EquivalenceCluster>,
    edges: Vec<Edge>,
    conflicts: Vec<DuplicateConflict>,
}

impl ClustersReady {
    fn empty(left_entities: usize, right_entities: usize) -> Self {
        Self {
            summary: ClusterSummary {
                unmatched_left: left_entities,
                unmatched_right: right_entities,
                ..ClusterSummary::default()
            },
            clusters: Vec::new(),
            edges: Vec::new(),
            conflicts: Vec::new(),
        }
    }
}
