use std::collections::HashSet;

use log::warn;

use crate::config::DuplicatePolicy;
use crate::graph::SimilarityGraph;
use crate::matrix::SimilarityMatrix;
use crate::model::{Assignment, DuplicateConflict, Edge};

/// Shared-space ids already consumed by an accepted edge.
///
/// Lives as long as the clustering instance. Only emission adds to it; only
/// an explicit reset or reconfiguration clears it.
#[derive(Debug, Clone, Default)]
pub struct MatchedIdSet {
    ids: HashSet<usize>,
}

impl MatchedIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    fn insert(&mut self, edge: Edge) {
        self.ids.insert(edge.left);
        self.ids.insert(edge.right);
    }
}

/// What one emission pass did.
#[derive(Debug, Clone, Default)]
pub struct EmitReport {
    pub accepted: Vec<Edge>,
    pub rejected_below_threshold: usize,
    pub conflicts: Vec<DuplicateConflict>,
}

/// Turn the chosen row→column mapping into graph edges.
///
/// A pick is dropped when the stored similarity at that cell is not above
/// `threshold`; this is what filters out padding cells and rows the greedy
/// scan had to fill with a cost-1.0 column. Accepted right ids are shifted
/// by `left_entities` into the shared id space.
pub fn emit_edges(
    similarity: &SimilarityMatrix,
    assignment: &Assignment,
    threshold: f64,
    left_entities: usize,
    policy: DuplicatePolicy,
    matched: &mut MatchedIdSet,
    graph: &mut SimilarityGraph,
) -> EmitReport {
    let mut report = EmitReport::default();

    for (row, &column) in assignment.columns.iter().enumerate() {
        if similarity.get(row, column) <= threshold {
            report.rejected_below_threshold += 1;
            continue;
        }

        let edge = Edge {
            left: row,
            right: column + left_entities,
        };

        let already_matched: Vec<usize> = [edge.left, edge.right]
            .into_iter()
            .filter(|&id| matched.contains(id))
            .collect();
        if !already_matched.is_empty() {
            let inserted = policy == DuplicatePolicy::Report;
            warn!(
                "id already in the graph: edge ({}, {}) reuses {:?}, {}",
                edge.left,
                edge.right,
                already_matched,
                if inserted { "inserting anyway" } else { "edge rejected" }
            );
            report.conflicts.push(DuplicateConflict {
                row,
                column,
                edge,
                already_matched,
                policy,
                inserted,
            });
            if !inserted {
                continue;
            }
        }

        graph.add_edge(edge);
        matched.insert(edge);
        report.accepted.push(edge);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::build_matrices;
    use crate::model::{CandidatePair, ScanKind};

    fn assignment(columns: Vec<usize>) -> Assignment {
        Assignment {
            kind: ScanKind::Row,
            columns,
            total_cost: 0.0,
        }
    }

    fn sim(pairs: &[(usize, usize, f64)], threshold: f64, left: usize, right: usize) -> SimilarityMatrix {
        let pairs: Vec<CandidatePair> = pairs
            .iter()
            .map(|&(l, r, s)| CandidatePair::new(l, r, s))
            .collect();
        build_matrices(&pairs, threshold, left, right).unwrap().0
    }

    #[test]
    fn accepted_edges_are_offset_into_shared_space() {
        let s = sim(&[(0, 0, 0.9), (1, 1, 0.8)], 0.5, 2, 2);
        let mut matched = MatchedIdSet::new();
        let mut graph = SimilarityGraph::new(4);
        let report = emit_edges(&s, &assignment(vec![0, 1]), 0.5, 2, DuplicatePolicy::Report, &mut matched, &mut graph);
        assert_eq!(report.accepted, vec![Edge { left: 0, right: 2 }, Edge { left: 1, right: 3 }]);
        assert_eq!(report.rejected_below_threshold, 0);
        assert!(report.conflicts.is_empty());
        assert_eq!(matched.len(), 4);
        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn padding_and_low_cells_are_rejected() {
        // 1 left entity, 3 right: rows 1 and 2 are padding.
        let s = sim(&[(0, 1, 0.7), (0, 2, 0.4)], 0.5, 1, 3);
        let mut matched = MatchedIdSet::new();
        let mut graph = SimilarityGraph::new(4);
        let report = emit_edges(&s, &assignment(vec![1, 0, 2]), 0.5, 1, DuplicatePolicy::Report, &mut matched, &mut graph);
        assert_eq!(report.accepted, vec![Edge { left: 0, right: 2 }]);
        assert_eq!(report.rejected_below_threshold, 2);
    }

    #[test]
    fn rerun_without_reset_reports_but_inserts() {
        let s = sim(&[(0, 0, 0.9)], 0.5, 1, 1);
        let mut matched = MatchedIdSet::new();
        let mut graph = SimilarityGraph::new(2);
        emit_edges(&s, &assignment(vec![0]), 0.5, 1, DuplicatePolicy::Report, &mut matched, &mut graph);

        let mut second = SimilarityGraph::new(2);
        let report = emit_edges(&s, &assignment(vec![0]), 0.5, 1, DuplicatePolicy::Report, &mut matched, &mut second);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].already_matched, vec![0, 1]);
        assert!(report.conflicts[0].inserted);
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(second.edges().len(), 1);
    }

    #[test]
    fn reject_policy_drops_conflicting_edge() {
        let s = sim(&[(0, 0, 0.9)], 0.5, 1, 1);
        let mut matched = MatchedIdSet::new();
        let mut graph = SimilarityGraph::new(2);
        emit_edges(&s, &assignment(vec![0]), 0.5, 1, DuplicatePolicy::Reject, &mut matched, &mut graph);

        let mut second = SimilarityGraph::new(2);
        let report = emit_edges(&s, &assignment(vec![0]), 0.5, 1, DuplicatePolicy::Reject, &mut matched, &mut second);
        assert_eq!(report.conflicts.len(), 1);
        assert!(!report.conflicts[0].inserted);
        assert!(report.accepted.is_empty());
        assert!(second.edges().is_empty());
    }

    #[test]
    fn cleared_set_reproduces_edges() {
        let s = sim(&[(0, 1, 0.9), (1, 0, 0.6)], 0.5, 2, 2);
        let a = assignment(vec![1, 0]);
        let mut matched = MatchedIdSet::new();
        let first = emit_edges(&s, &a, 0.5, 2, DuplicatePolicy::Report, &mut matched, &mut SimilarityGraph::new(4));
        matched.clear();
        assert!(matched.is_empty());
        let second = emit_edges(&s, &a, 0.5, 2, DuplicatePolicy::Report, &mut matched, &mut SimilarityGraph::new(4));
        assert_eq!(first.accepted, second.accepted);
        assert!(second.conflicts.is_empty());
    }
}
