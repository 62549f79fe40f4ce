use std::collections::BTreeMap;

use crate::model::{Edge, EquivalenceCluster};

/// Undirected graph over the shared id space (`0..left + right`), kept as a
/// disjoint-set forest so components fall out of the edge inserts.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    parent: Vec<usize>,
    rank: Vec<u8>,
    edges: Vec<Edge>,
}

impl SimilarityGraph {
    pub fn new(vertices: usize) -> Self {
        Self {
            parent: (0..vertices).collect(),
            rank: vec![0; vertices],
            edges: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.parent.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.union(edge.left, edge.right);
        self.edges.push(edge);
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression.
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }

    /// Components with at least two vertices, each sorted, ordered by their
    /// smallest vertex.
    pub fn connected_components(&mut self) -> Vec<Vec<usize>> {
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for v in 0..self.parent.len() {
            let root = self.find(v);
            groups.entry(root).or_default().push(v);
        }
        let mut components: Vec<Vec<usize>> =
            groups.into_values().filter(|members| members.len() > 1).collect();
        components.sort_by_key(|members| members[0]);
        components
    }

    /// Connected components split into left ids and right ids local to their
    /// own collection. `left_entities` is where right ids start.
    pub fn clusters(&mut self, left_entities: usize) -> Vec<EquivalenceCluster> {
        self.connected_components()
            .into_iter()
            .map(|members| {
                let (left, right): (Vec<usize>, Vec<usize>) =
                    members.into_iter().partition(|&id| id < left_entities);
                EquivalenceCluster {
                    left,
                    right: right.into_iter().map(|id| id - left_entities).collect(),
                }
            })
            .collect()
    }
}
