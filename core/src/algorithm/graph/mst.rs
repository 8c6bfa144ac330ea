//! Minimum Spanning Tree (Kruskal)
//!
//! Kruskal's algorithm with a union-find forest. Each undirected edge is
//! considered once in its canonical `source < target` orientation; edges are
//! stably sorted by weight so that equal weights keep their encounter order
//! (ascending source, then adjacency insertion order).
//!
//! # Algorithmic Complexity
//!
//! - **Time Complexity**: O(E log E) for the sort, near-constant per union-find op
//! - **Space Complexity**: O(V + E)
//!
//! Copyright (c) 2025 Mohammad Atashi. All rights reserved.

use std::cmp::Ordering;
use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, Directedness, NodeId, Precondition};
use crate::data_structures::graph::{Edge, Graph, Weight};

/// Result of a spanning tree computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanningTree {
    /// Accepted edges in acceptance order
    pub edges: Vec<Edge>,
    pub total_weight: Weight,
}

impl SpanningTree {
    /// The tree as an undirected graph over the same vertex set
    pub fn to_graph(&self, vertices: impl IntoIterator<Item = NodeId>) -> Result<Graph, AlgorithmError> {
        let mut tree = Graph::undirected();
        for vertex in vertices {
            tree.add_vertex(vertex);
        }
        for edge in &self.edges {
            tree.add_edge(edge.source, edge.target, edge.weight)?;
        }
        Ok(tree)
    }
}

/// Union-Find data structure with path compression and union by rank
#[derive(Debug, Clone)]
pub struct UnionFind {
    /// Parent pointers for each element
    parent: Vec<usize>,
    /// Rank (approximate depth) of each tree
    rank: Vec<usize>,
    /// Number of disjoint sets
    num_components: usize,
}

impl UnionFind {
    /// Create a new Union-Find structure with n elements
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            num_components: n,
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Union two sets; returns false when x and y already share a root
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }

        self.num_components -= 1;
        true
    }

    /// Check if two elements are in the same connected component
    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Get the number of disjoint components
    pub fn components(&self) -> usize {
        self.num_components
    }
}

/// Kruskal's algorithm over an undirected graph with nonnegative weights.
///
/// Stops as soon as |V| - 1 edges are accepted. Fails with `NotConnected`
/// when the edges cannot span every vertex.
pub fn kruskal(graph: &Graph) -> Result<SpanningTree, AlgorithmError> {
    if graph.is_directed() {
        return Err(Precondition::WrongDirectedness {
            expected: Directedness::Undirected,
        }
        .into());
    }
    graph.ensure_nonnegative_weights()?;

    let index: HashMap<NodeId, usize> = graph.vertices().enumerate().map(|(i, v)| (v, i)).collect();
    let target_edges = graph.vertex_count().saturating_sub(1);

    let mut candidates: Vec<Edge> = graph.undirected_edges().copied().collect();
    // Stable: equal weights keep encounter order
    candidates.sort_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal));

    let mut forest = UnionFind::new(graph.vertex_count());
    let mut edges = Vec::with_capacity(target_edges);
    let mut total_weight = 0.0;

    for edge in candidates {
        if edges.len() == target_edges {
            break;
        }
        if forest.union(index[&edge.source], index[&edge.target]) {
            total_weight += edge.weight;
            edges.push(edge);
        }
    }

    if edges.len() < target_edges {
        debug!(
            "spanning forest has {} components; {} of {} edges accepted",
            forest.components(),
            edges.len(),
            target_edges
        );
        return Err(Precondition::NotConnected.into());
    }

    debug!("minimum spanning tree: {} edges, weight {}", edges.len(), total_weight);
    Ok(SpanningTree { edges, total_weight })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_union_find() {
        let mut uf = UnionFind::new(5);

        assert_eq!(uf.components(), 5);
        assert!(!uf.connected(0, 1));

        assert!(uf.union(0, 1));
        assert_eq!(uf.components(), 4);
        assert!(uf.connected(0, 1));

        // Union same elements should return false
        assert!(!uf.union(0, 1));
        assert_eq!(uf.components(), 4);

        assert!(uf.union(2, 3));
        assert!(uf.union(1, 2));
        assert_eq!(uf.components(), 2);
        assert!(uf.connected(0, 3));
    }

    #[test]
    fn test_kruskal_square_with_diagonal() {
        let graph = Graph::from_edges(
            false,
            [(1, 2, 1.0), (2, 3, 2.0), (3, 4, 1.0), (4, 1, 3.0), (1, 3, 5.0)],
        )
        .unwrap();

        let tree = graph.minimum_spanning_tree().unwrap();
        assert_eq!(tree.edges.len(), 3);
        assert_eq!(tree.total_weight, 4.0);
        let pairs: Vec<(usize, usize)> = tree.edges.iter().map(|e| (e.source.0, e.target.0)).collect();
        assert_eq!(pairs, vec![(1, 2), (3, 4), (2, 3)]);
    }

    #[test]
    fn test_equal_weight_ties_follow_encounter_order() {
        let graph = Graph::from_edges(false, [(1, 2, 1.0), (2, 3, 1.0), (1, 3, 1.0)]).unwrap();
        let tree = kruskal(&graph).unwrap();
        let pairs: Vec<(usize, usize)> = tree.edges.iter().map(|e| (e.source.0, e.target.0)).collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3)]);
    }

    #[test]
    fn test_cheaper_parallel_copy_is_accepted() {
        let graph = Graph::from_edges(false, [(1, 2, 5.0), (1, 2, 2.0), (2, 3, 1.0)]).unwrap();
        let tree = kruskal(&graph).unwrap();
        let accepted: Vec<(usize, usize, f64)> =
            tree.edges.iter().map(|e| (e.source.0, e.target.0, e.weight)).collect();
        assert_eq!(accepted, vec![(2, 3, 1.0), (1, 2, 2.0)]);
        assert_eq!(tree.total_weight, 3.0);
    }

    #[test]
    fn test_kruskal_preconditions() {
        let directed = Graph::from_edges(true, [(1, 2, 1.0)]).unwrap();
        assert_eq!(
            kruskal(&directed),
            Err(AlgorithmError::StructuralPrecondition(Precondition::WrongDirectedness {
                expected: Directedness::Undirected
            }))
        );

        let negative = Graph::from_edges(false, [(1, 2, -1.0)]).unwrap();
        assert!(matches!(
            kruskal(&negative),
            Err(AlgorithmError::StructuralPrecondition(Precondition::NegativeWeight { .. }))
        ));

        let split = Graph::from_edges(false, [(1, 2, 1.0), (3, 4, 1.0)]).unwrap();
        assert_eq!(
            kruskal(&split),
            Err(AlgorithmError::StructuralPrecondition(Precondition::NotConnected))
        );
    }

    #[test]
    fn test_single_vertex_tree_is_empty() {
        let mut graph = Graph::undirected();
        graph.add_vertex(NodeId(4));
        let tree = kruskal(&graph).unwrap();
        assert!(tree.edges.is_empty());
        assert_eq!(tree.total_weight, 0.0);
    }

    proptest! {
        #[test]
        fn test_tree_spans_without_cycles(
            n in 2usize..10,
            extra in prop::collection::vec((0usize..10, 0usize..10, 0u32..20), 0..30)
        ) {
            // A path guarantees connectivity; extra edges add cycles to reject
            let mut graph = Graph::undirected();
            for i in 1..n {
                graph.add_edge(NodeId(i - 1), NodeId(i), 10.0).unwrap();
            }
            for (u, v, w) in extra {
                if u < n && v < n && u != v {
                    graph.add_edge(NodeId(u), NodeId(v), w as f64).unwrap();
                }
            }

            let tree = kruskal(&graph).unwrap();
            prop_assert_eq!(tree.edges.len(), n - 1);

            let mut uf = UnionFind::new(n);
            for edge in &tree.edges {
                prop_assert!(uf.union(edge.source.0, edge.target.0));
            }
            prop_assert_eq!(uf.components(), 1);
        }
    }
}
