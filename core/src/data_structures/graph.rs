//! Adjacency-list graph shared by every GraphOpt solver
//!
//! Edges are always stored directed. A single logical-direction flag decides
//! whether `add_edge` mirrors each logical edge and how connectivity and
//! degree queries interpret the stored edges.
//!
//! # Invariants
//! - Undirected graphs: edge (u, v, w) is stored iff (v, u, w) is stored
//! - Vertices iterate in ascending id order; each adjacency list keeps
//!   insertion order. All tie-breaking in the crate derives from these two
//!   orders.
//! - Algorithms never mutate a caller's graph; destructive processing runs
//!   on a [`Graph::snapshot`].
//!
//! Copyright (c) 2025 Mohammad Atashi. All rights reserved.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::mst::{self, SpanningTree};
use crate::algorithm::traits::{AlgorithmError, NodeId, Precondition};

/// Edge weight; integer weights are carried exactly as whole floats
pub type Weight = f64;

/// Weight assigned when a caller does not supply one
pub const DEFAULT_WEIGHT: Weight = 1.0;

/// Directed edge as stored in an adjacency list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: Weight,
}

impl Edge {
    #[inline]
    pub fn new(source: NodeId, target: NodeId, weight: Weight) -> Self {
        Self { source, target, weight }
    }
}

/// Two-sided vertex split returned by the bipartiteness test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bipartition {
    /// Color-0 side; contains the lowest id of every component
    pub left: BTreeSet<NodeId>,
    /// Color-1 side
    pub right: BTreeSet<NodeId>,
}

impl Bipartition {
    pub fn side_of(&self, vertex: NodeId) -> Option<bool> {
        if self.left.contains(&vertex) {
            Some(true)
        } else if self.right.contains(&vertex) {
            Some(false)
        } else {
            None
        }
    }
}

/// Graph with a logical directed/undirected mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    directed: bool,
    adjacency: BTreeMap<NodeId, Vec<Edge>>,
}

impl Graph {
    /// Creates an empty graph in the given mode
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            adjacency: BTreeMap::new(),
        }
    }

    pub fn directed() -> Self {
        Self::new(true)
    }

    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// Builds a graph from `(from, to, weight)` triples
    pub fn from_edges<I>(directed: bool, edges: I) -> Result<Self, AlgorithmError>
    where
        I: IntoIterator<Item = (usize, usize, Weight)>,
    {
        let mut graph = Self::new(directed);
        for (from, to, weight) in edges {
            graph.add_edge(NodeId(from), NodeId(to), weight)?;
        }
        Ok(graph)
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Adds an isolated vertex; no-op if it already exists
    pub fn add_vertex(&mut self, id: NodeId) {
        self.adjacency.entry(id).or_default();
    }

    /// Appends a directed edge, or a mirrored pair for undirected graphs.
    ///
    /// Missing endpoints are created. Parallel edges are kept as separate
    /// entries; self-loops are rejected.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: Weight) -> Result<(), AlgorithmError> {
        if from == to {
            return Err(Precondition::SelfLoop(from).into());
        }

        self.adjacency.entry(from).or_default().push(Edge::new(from, to, weight));
        let reverse = self.adjacency.entry(to).or_default();
        if !self.directed {
            reverse.push(Edge::new(to, from, weight));
        }
        Ok(())
    }

    /// Adds an edge with the default weight of 1
    pub fn add_unit_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), AlgorithmError> {
        self.add_edge(from, to, DEFAULT_WEIGHT)
    }

    /// Vertices in ascending id order
    pub fn vertices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn contains_vertex(&self, id: NodeId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Number of logical edges (mirrored pairs count once)
    pub fn edge_count(&self) -> usize {
        let stored: usize = self.adjacency.values().map(Vec::len).sum();
        if self.directed {
            stored
        } else {
            stored / 2
        }
    }

    /// Every stored directed edge, grouped by ascending source
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.values().flatten()
    }

    /// Logical edges: each undirected pair once with `source < target`
    pub fn undirected_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        let directed = self.directed;
        self.edges().filter(move |e| directed || e.source < e.target)
    }

    /// Outgoing edges of a vertex in insertion order
    pub fn out_edges(&self, vertex: NodeId) -> &[Edge] {
        self.adjacency.get(&vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Outgoing neighbors in insertion order
    pub fn neighbors(&self, vertex: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(vertex).iter().map(|e| e.target)
    }

    /// Outgoing neighbors in first-insertion order, parallel edges reported once
    pub fn distinct_neighbors(&self, vertex: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let edges = self.out_edges(vertex);
        edges
            .iter()
            .enumerate()
            .filter(move |(i, e)| edges[..*i].iter().all(|earlier| earlier.target != e.target))
            .map(|(_, e)| e.target)
    }

    pub fn out_degree(&self, vertex: NodeId) -> usize {
        self.out_edges(vertex).len()
    }

    pub fn in_degree(&self, vertex: NodeId) -> usize {
        self.edges().filter(|e| e.target == vertex).count()
    }

    /// Total number of incident edge ends
    pub fn degree(&self, vertex: NodeId) -> usize {
        if self.directed {
            self.out_degree(vertex) + self.in_degree(vertex)
        } else {
            self.out_degree(vertex)
        }
    }

    fn in_degrees(&self) -> HashMap<NodeId, usize> {
        let mut degrees: HashMap<NodeId, usize> = self.vertices().map(|v| (v, 0)).collect();
        for edge in self.edges() {
            *degrees.entry(edge.target).or_insert(0) += 1;
        }
        degrees
    }

    /// Vertices with no incident edges, ascending
    pub fn isolated_vertices(&self) -> Vec<NodeId> {
        let in_degrees = self.in_degrees();
        self.vertices()
            .filter(|v| self.out_degree(*v) == 0 && in_degrees.get(v).copied().unwrap_or(0) == 0)
            .collect()
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.out_edges(from).iter().any(|e| e.target == to)
    }

    /// Weight of the first stored edge `from -> to`
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Result<Weight, AlgorithmError> {
        self.out_edges(from)
            .iter()
            .find(|e| e.target == to)
            .map(|e| e.weight)
            .ok_or(AlgorithmError::EdgeNotFound(from, to))
    }

    /// First edge carrying a negative weight, if any
    pub fn first_negative_edge(&self) -> Option<&Edge> {
        self.edges().find(|e| e.weight < 0.0)
    }

    pub fn has_negative_weight(&self) -> bool {
        self.first_negative_edge().is_some()
    }

    /// Fails with `NegativeWeight` naming the first offending edge
    pub fn ensure_nonnegative_weights(&self) -> Result<(), AlgorithmError> {
        match self.first_negative_edge() {
            Some(e) => Err(Precondition::NegativeWeight {
                from: e.source,
                to: e.target,
                weight: e.weight,
            }
            .into()),
            None => Ok(()),
        }
    }

    /// Sum of logical edge weights
    pub fn total_weight(&self) -> Weight {
        self.undirected_edges().map(|e| e.weight).sum()
    }

    /// Cost of walking `path` edge by edge
    pub fn path_cost(&self, path: &[NodeId]) -> Result<Weight, AlgorithmError> {
        path.windows(2)
            .map(|pair| self.edge_weight(pair[0], pair[1]))
            .sum()
    }

    /// Structural copy (vertices and edges only) for destructive processing
    pub fn snapshot(&self) -> Graph {
        self.clone()
    }

    /// Same vertices with every edge flipped
    pub fn reversed(&self) -> Graph {
        let mut reversed = Graph::new(self.directed);
        for vertex in self.vertices() {
            reversed.add_vertex(vertex);
        }
        for edge in self.edges() {
            reversed
                .adjacency
                .entry(edge.target)
                .or_default()
                .push(Edge::new(edge.target, edge.source, edge.weight));
        }
        reversed
    }

    /// Undirected view: each directed edge becomes a mirrored pair, with
    /// opposite edges between the same endpoints collapsed into one
    pub fn underlying_undirected(&self) -> Graph {
        if !self.directed {
            return self.clone();
        }
        let mut undirected = Graph::undirected();
        for vertex in self.vertices() {
            undirected.add_vertex(vertex);
        }
        for edge in self.edges() {
            if !undirected.has_edge(edge.source, edge.target) {
                undirected
                    .adjacency
                    .entry(edge.source)
                    .or_default()
                    .push(Edge::new(edge.source, edge.target, edge.weight));
                undirected
                    .adjacency
                    .entry(edge.target)
                    .or_default()
                    .push(Edge::new(edge.target, edge.source, edge.weight));
            }
        }
        undirected
    }

    pub(crate) fn undirected_view(&self) -> Cow<'_, Graph> {
        if self.directed {
            Cow::Owned(self.underlying_undirected())
        } else {
            Cow::Borrowed(self)
        }
    }

    /// Removes the first edge `from -> to` (and its mirror when undirected)
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> Option<Weight> {
        let weight = Self::remove_first(self.adjacency.get_mut(&from)?, to)?;
        if !self.directed {
            if let Some(list) = self.adjacency.get_mut(&to) {
                Self::remove_mirror(list, from, weight);
            }
        }
        Some(weight)
    }

    /// Removes and returns the first outgoing edge of `vertex`
    pub fn take_first_edge(&mut self, vertex: NodeId) -> Option<Edge> {
        let list = self.adjacency.get_mut(&vertex)?;
        if list.is_empty() {
            return None;
        }
        let edge = list.remove(0);
        if !self.directed {
            if let Some(mirror) = self.adjacency.get_mut(&edge.target) {
                Self::remove_mirror(mirror, vertex, edge.weight);
            }
        }
        Some(edge)
    }

    /// Drops every edge entering or leaving `vertex`; the vertex stays
    pub fn remove_incident_edges(&mut self, vertex: NodeId) {
        if let Some(list) = self.adjacency.get_mut(&vertex) {
            list.clear();
        }
        for list in self.adjacency.values_mut() {
            list.retain(|e| e.target != vertex);
        }
    }

    fn remove_first(list: &mut Vec<Edge>, target: NodeId) -> Option<Weight> {
        let index = list.iter().position(|e| e.target == target)?;
        Some(list.remove(index).weight)
    }

    /// Removes the mirror copy of a parallel edge, matching its weight
    fn remove_mirror(list: &mut Vec<Edge>, target: NodeId, weight: Weight) {
        let index = list
            .iter()
            .position(|e| e.target == target && e.weight == weight)
            .or_else(|| list.iter().position(|e| e.target == target));
        if let Some(index) = index {
            list.remove(index);
        }
    }

    /// Vertices reachable from `start` following stored edges
    fn reachable_from(&self, start: NodeId) -> BTreeSet<NodeId> {
        let mut visited = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(vertex) = stack.pop() {
            if !visited.insert(vertex) {
                continue;
            }
            for next in self.neighbors(vertex) {
                if !visited.contains(&next) {
                    stack.push(next);
                }
            }
        }
        visited
    }

    /// Connectivity ignoring isolated vertices.
    ///
    /// Directed graphs are tested on their underlying undirected view (weak
    /// connectivity). A graph without edges is trivially connected.
    pub fn is_connected(&self) -> bool {
        let view = self.undirected_view();
        let Some(start) = view.vertices().find(|v| view.out_degree(*v) > 0) else {
            return true;
        };
        let reached = view.reachable_from(start);
        let connected = view
            .vertices()
            .filter(|v| view.out_degree(*v) > 0)
            .all(|v| reached.contains(&v));
        trace!("connectivity from {}: reached {} vertices, connected={}", start, reached.len(), connected);
        connected
    }

    /// Strong connectivity ignoring isolated vertices (directed graphs only)
    pub fn is_strongly_connected(&self) -> Result<bool, AlgorithmError> {
        if !self.directed {
            return Err(AlgorithmError::NotSupported(
                "strong connectivity is defined for directed graphs only".into(),
            ));
        }
        let in_degrees = self.in_degrees();
        let non_isolated: Vec<NodeId> = self
            .vertices()
            .filter(|v| self.out_degree(*v) > 0 || in_degrees.get(v).copied().unwrap_or(0) > 0)
            .collect();
        let Some(&start) = non_isolated.first() else {
            return Ok(true);
        };

        let forward = self.reachable_from(start);
        let backward = self.reversed().reachable_from(start);
        Ok(non_isolated
            .iter()
            .all(|v| forward.contains(v) && backward.contains(v)))
    }

    /// Every vertex has even degree (undirected graphs only)
    pub fn all_vertices_have_even_degree(&self) -> Result<bool, AlgorithmError> {
        if self.directed {
            return Err(AlgorithmError::NotSupported(
                "even-degree check is defined for undirected graphs only".into(),
            ));
        }
        Ok(self.vertices().all(|v| self.out_degree(v) % 2 == 0))
    }

    /// In-degree equals out-degree at every vertex
    pub fn all_vertices_balanced(&self) -> bool {
        let in_degrees = self.in_degrees();
        self.vertices()
            .all(|v| in_degrees.get(&v).copied().unwrap_or(0) == self.out_degree(v))
    }

    /// BFS 2-coloring from every uncolored vertex in ascending order.
    ///
    /// Returns `None` as soon as an edge joins two same-colored vertices.
    /// Directed graphs are colored on their underlying undirected view.
    pub fn is_bipartite(&self) -> Option<Bipartition> {
        let view = self.undirected_view();
        let mut color: HashMap<NodeId, bool> = HashMap::with_capacity(view.vertex_count());

        for root in view.vertices() {
            if color.contains_key(&root) {
                continue;
            }
            color.insert(root, true);
            let mut queue = VecDeque::from([root]);

            while let Some(vertex) = queue.pop_front() {
                let side = color[&vertex];
                for next in view.neighbors(vertex) {
                    match color.get(&next) {
                        Some(&other) if other == side => {
                            trace!("odd cycle through edge {} - {}", vertex, next);
                            return None;
                        }
                        Some(_) => {}
                        None => {
                            color.insert(next, !side);
                            queue.push_back(next);
                        }
                    }
                }
            }
        }

        let mut partition = Bipartition {
            left: BTreeSet::new(),
            right: BTreeSet::new(),
        };
        for (vertex, side) in color {
            if side {
                partition.left.insert(vertex);
            } else {
                partition.right.insert(vertex);
            }
        }
        Some(partition)
    }

    /// Kruskal minimum spanning tree; see [`mst::kruskal`]
    pub fn minimum_spanning_tree(&self) -> Result<SpanningTree, AlgorithmError> {
        mst::kruskal(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn n(id: usize) -> NodeId {
        NodeId(id)
    }

    #[test]
    fn test_graph_creation_and_basic_operations() {
        let mut graph = Graph::undirected();
        graph.add_edge(n(0), n(1), 1.0).unwrap();
        graph.add_edge(n(1), n(2), 2.0).unwrap();
        graph.add_vertex(n(7));

        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge_weight(n(0), n(1)).unwrap(), 1.0);
        assert_eq!(graph.edge_weight(n(2), n(1)).unwrap(), 2.0);
        assert_eq!(graph.vertices().collect::<Vec<_>>(), vec![n(0), n(1), n(2), n(7)]);
        assert_eq!(graph.isolated_vertices(), vec![n(7)]);

        // Non-existent edge
        assert_eq!(
            graph.edge_weight(n(0), n(2)),
            Err(AlgorithmError::EdgeNotFound(n(0), n(2)))
        );
    }

    #[test]
    fn test_directed_edges_are_not_mirrored() {
        let graph = Graph::from_edges(true, [(1, 2, 3.0), (2, 3, 4.0)]).unwrap();
        assert!(graph.has_edge(n(1), n(2)));
        assert!(!graph.has_edge(n(2), n(1)));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.in_degree(n(2)), 1);
        assert_eq!(graph.degree(n(2)), 2);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut graph = Graph::undirected();
        assert_eq!(
            graph.add_edge(n(3), n(3), 1.0),
            Err(AlgorithmError::StructuralPrecondition(Precondition::SelfLoop(n(3))))
        );
        assert_eq!(graph.vertex_count(), 0);
    }

    #[test]
    fn test_unit_edge_uses_default_weight() {
        let mut graph = Graph::directed();
        graph.add_unit_edge(n(1), n(2)).unwrap();
        assert_eq!(graph.edge_weight(n(1), n(2)).unwrap(), DEFAULT_WEIGHT);
    }

    #[test]
    fn test_connectivity_ignores_isolated_vertices() {
        let mut graph = Graph::from_edges(false, [(1, 2, 1.0), (2, 3, 1.0)]).unwrap();
        graph.add_vertex(n(9));
        assert!(graph.is_connected());

        graph.add_edge(n(4), n(5), 1.0).unwrap();
        assert!(!graph.is_connected());

        assert!(Graph::undirected().is_connected());
    }

    #[test]
    fn test_strong_connectivity() {
        let cycle = Graph::from_edges(true, [(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0)]).unwrap();
        assert_eq!(cycle.is_strongly_connected(), Ok(true));
        assert!(cycle.is_connected());

        let chain = Graph::from_edges(true, [(1, 2, 1.0), (2, 3, 1.0)]).unwrap();
        assert_eq!(chain.is_strongly_connected(), Ok(false));
        assert!(chain.is_connected());

        let undirected = Graph::from_edges(false, [(1, 2, 1.0)]).unwrap();
        assert!(matches!(
            undirected.is_strongly_connected(),
            Err(AlgorithmError::NotSupported(_))
        ));
    }

    #[test]
    fn test_degree_predicates() {
        let triangle = Graph::from_edges(false, [(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0)]).unwrap();
        assert_eq!(triangle.all_vertices_have_even_degree(), Ok(true));
        assert!(triangle.all_vertices_balanced());

        let path = Graph::from_edges(false, [(1, 2, 1.0), (2, 3, 1.0)]).unwrap();
        assert_eq!(path.all_vertices_have_even_degree(), Ok(false));

        let directed = Graph::from_edges(true, [(1, 2, 1.0), (2, 3, 1.0)]).unwrap();
        assert!(directed.all_vertices_have_even_degree().is_err());
        assert!(!directed.all_vertices_balanced());
    }

    #[test]
    fn test_bipartite_detection() {
        let square = Graph::from_edges(false, [(1, 3, 1.0), (1, 4, 1.0), (2, 3, 1.0), (2, 4, 1.0)]).unwrap();
        let partition = square.is_bipartite().unwrap();
        assert_eq!(partition.left, BTreeSet::from([n(1), n(2)]));
        assert_eq!(partition.right, BTreeSet::from([n(3), n(4)]));
        assert_eq!(partition.side_of(n(2)), Some(true));
        assert_eq!(partition.side_of(n(8)), None);

        let triangle = Graph::from_edges(false, [(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0)]).unwrap();
        assert!(triangle.is_bipartite().is_none());
    }

    #[test]
    fn test_directed_bipartite_uses_undirected_view() {
        // Right-side vertex 0 has the lowest id but no outgoing edges
        let graph = Graph::from_edges(true, [(1, 0, 1.0), (2, 0, 1.0), (2, 3, 1.0)]).unwrap();
        let partition = graph.is_bipartite().unwrap();
        assert_eq!(partition.left, BTreeSet::from([n(0), n(3)]));
        assert_eq!(partition.right, BTreeSet::from([n(1), n(2)]));
    }

    #[test]
    fn test_snapshot_and_removal_leave_original_intact() {
        let graph = Graph::from_edges(false, [(1, 2, 1.0), (2, 3, 5.0)]).unwrap();
        let mut copy = graph.snapshot();

        assert_eq!(copy.remove_edge(n(2), n(3)), Some(5.0));
        assert!(!copy.has_edge(n(3), n(2)));
        assert_eq!(copy.remove_edge(n(2), n(3)), None);

        let first = copy.take_first_edge(n(1)).unwrap();
        assert_eq!((first.source, first.target), (n(1), n(2)));
        assert_eq!(copy.edge_count(), 0);

        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge(n(3), n(2)));
    }

    #[test]
    fn test_parallel_edges_are_kept_and_counted() {
        let mut graph = Graph::from_edges(false, [(1, 2, 4.0), (1, 2, 1.0), (2, 3, 1.0)]).unwrap();
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.degree(n(1)), 2);
        assert_eq!(graph.degree(n(2)), 3);
        assert_eq!(graph.edge_weight(n(1), n(2)), Ok(4.0));
        assert_eq!(graph.edge_weight(n(2), n(1)), Ok(4.0));

        // First copy goes, together with its own mirror
        assert_eq!(graph.remove_edge(n(2), n(1)), Some(4.0));
        assert_eq!(graph.edge_weight(n(1), n(2)), Ok(1.0));
        assert_eq!(graph.edge_weight(n(2), n(1)), Ok(1.0));
        assert_eq!(graph.degree(n(1)), 1);
        assert_eq!(graph.edge_count(), 2);

        assert_eq!(graph.remove_edge(n(1), n(2)), Some(1.0));
        assert!(!graph.has_edge(n(2), n(1)));
        assert_eq!(graph.edge_weight(n(1), n(2)), Err(AlgorithmError::EdgeNotFound(n(1), n(2))));
    }

    #[test]
    fn test_distinct_neighbors_skip_parallel_copies() {
        let graph = Graph::from_edges(false, [(1, 3, 1.0), (1, 2, 1.0), (1, 3, 2.0)]).unwrap();
        assert_eq!(graph.neighbors(n(1)).collect::<Vec<_>>(), vec![n(3), n(2), n(3)]);
        assert_eq!(graph.distinct_neighbors(n(1)).collect::<Vec<_>>(), vec![n(3), n(2)]);
        assert_eq!(graph.distinct_neighbors(n(9)).count(), 0);
    }

    #[test]
    fn test_directed_parallel_edges_count_in_both_degrees() {
        let graph = Graph::from_edges(true, [(1, 2, 3.0), (1, 2, 2.0), (2, 1, 1.0)]).unwrap();
        assert_eq!(graph.out_degree(n(1)), 2);
        assert_eq!(graph.in_degree(n(2)), 2);
        assert_eq!(graph.degree(n(2)), 3);
        assert_eq!(graph.edge_weight(n(1), n(2)), Ok(3.0));
    }

    #[test]
    fn test_remove_incident_edges() {
        let mut graph = Graph::from_edges(true, [(1, 2, 1.0), (2, 3, 1.0), (3, 2, 1.0)]).unwrap();
        graph.remove_incident_edges(n(2));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.contains_vertex(n(2)));
    }

    #[test]
    fn test_reversed_and_path_cost() {
        let graph = Graph::from_edges(true, [(1, 2, 2.0), (2, 3, 3.0)]).unwrap();
        let reversed = graph.reversed();
        assert!(reversed.has_edge(n(3), n(2)));
        assert!(!reversed.has_edge(n(2), n(3)));

        assert_eq!(graph.path_cost(&[n(1), n(2), n(3)]).unwrap(), 5.0);
        assert!(graph.path_cost(&[n(3), n(2)]).is_err());
        assert_eq!(graph.total_weight(), 5.0);
    }

    #[test]
    fn test_underlying_undirected_collapses_opposite_edges() {
        let graph = Graph::from_edges(true, [(1, 2, 1.0), (2, 1, 1.0), (2, 3, 1.0)]).unwrap();
        let undirected = graph.underlying_undirected();
        assert!(!undirected.is_directed());
        assert_eq!(undirected.edge_count(), 2);
        assert_eq!(undirected.out_degree(n(2)), 2);
    }

    #[test]
    fn test_negative_weight_reported() {
        let graph = Graph::from_edges(true, [(1, 2, 1.0), (2, 3, -4.0)]).unwrap();
        assert!(graph.has_negative_weight());
        assert_eq!(
            graph.ensure_nonnegative_weights(),
            Err(AlgorithmError::StructuralPrecondition(Precondition::NegativeWeight {
                from: n(2),
                to: n(3),
                weight: -4.0,
            }))
        );
    }

    proptest! {
        #[test]
        fn test_undirected_mirror_invariant(
            edges in prop::collection::vec((0usize..12, 0usize..12, 0u32..50), 0..40)
        ) {
            let mut graph = Graph::undirected();
            for (u, v, w) in edges {
                if u != v {
                    graph.add_edge(NodeId(u), NodeId(v), w as f64).unwrap();
                }
            }

            for edge in graph.edges() {
                let mirrored = graph
                    .out_edges(edge.target)
                    .iter()
                    .filter(|e| e.target == edge.source && e.weight == edge.weight)
                    .count();
                let forward = graph
                    .out_edges(edge.source)
                    .iter()
                    .filter(|e| e.target == edge.target && e.weight == edge.weight)
                    .count();
                prop_assert_eq!(mirrored, forward);
            }
            prop_assert!(graph.all_vertices_balanced());
        }
    }
}
