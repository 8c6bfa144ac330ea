//! Bipartite Maximum Matching (Kuhn's augmenting-path method)
//!
//! Repeated passes over the left partition try to grow the matching from
//! every unmatched left vertex. Each attempt runs a depth-first search for an
//! augmenting path with its own visited set; passes repeat until a full pass
//! makes no augmentation, at which point Berge's theorem guarantees the
//! matching is maximum.
//!
//! The search uses an explicit frame stack instead of recursion so that path
//! length is bounded by memory rather than by the call stack.
//!
//! # Algorithmic Complexity
//!
//! - **Time Complexity**: O(V · E)
//! - **Space Complexity**: O(V)

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmProfiler, NodeId, Precondition,
};
use crate::data_structures::graph::{Graph, Weight};

/// Symmetric partial pairing of vertices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matching {
    mates: BTreeMap<NodeId, NodeId>,
}

impl Matching {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partner of `vertex`, or `None` when unmatched
    #[inline]
    pub fn mate(&self, vertex: NodeId) -> Option<NodeId> {
        self.mates.get(&vertex).copied()
    }

    #[inline]
    pub fn is_matched(&self, vertex: NodeId) -> bool {
        self.mates.contains_key(&vertex)
    }

    /// Pairs `u` with `v`; callers keep the function injective
    pub(crate) fn link(&mut self, u: NodeId, v: NodeId) {
        self.mates.insert(u, v);
        self.mates.insert(v, u);
    }

    /// Each pair once as `(u, v)` with `u < v`, ascending
    pub fn pairs(&self) -> Vec<(NodeId, NodeId)> {
        self.mates
            .iter()
            .filter(|(u, v)| u < v)
            .map(|(&u, &v)| (u, v))
            .collect()
    }

    /// Number of matched pairs
    pub fn len(&self) -> usize {
        self.mates.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.mates.is_empty()
    }

    /// True when every vertex of `graph` is matched
    pub fn is_perfect(&self, graph: &Graph) -> bool {
        graph.vertices().all(|v| self.is_matched(v))
    }

    /// Sum of matched edge weights, taking each edge in whichever direction exists
    pub fn total_weight(&self, graph: &Graph) -> Result<Weight, AlgorithmError> {
        self.pairs()
            .into_iter()
            .map(|(u, v)| graph.edge_weight(u, v).or_else(|_| graph.edge_weight(v, u)))
            .sum()
    }
}

/// One level of the augmenting-path search
#[derive(Debug, Clone, Copy)]
struct SearchFrame {
    left: NodeId,
    next_edge: usize,
    /// Right vertex currently being routed through
    via: Option<NodeId>,
}

/// Per-invocation scratch state, reused across attempts
#[derive(Debug, Default)]
struct AugmentContext {
    visited: HashSet<NodeId>,
    stack: Vec<SearchFrame>,
}

/// Kuhn's maximum bipartite matching with optional seeds
#[derive(Debug, Default)]
pub struct BipartiteMatching {
    left_partition: Option<BTreeSet<NodeId>>,
    warm_start: Vec<(NodeId, NodeId)>,
    profiler: AlgorithmProfiler,
}

impl BipartiteMatching {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `left` instead of the auto-detected color-0 side
    pub fn with_left_partition(mut self, left: impl IntoIterator<Item = NodeId>) -> Self {
        self.left_partition = Some(left.into_iter().collect());
        self
    }

    /// Seed the matching; vertices not mentioned start unmatched
    pub fn with_warm_start(mut self, pairs: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        self.warm_start = pairs.into_iter().collect();
        self
    }

    /// Validates the graph and seeds, returning the left side to iterate
    fn resolve_left(&self, graph: &Graph) -> Result<BTreeSet<NodeId>, AlgorithmError> {
        let partition = graph.is_bipartite().ok_or(Precondition::NotBipartite)?;

        let left = match &self.left_partition {
            None => partition.left,
            Some(explicit) => {
                for edge in graph.undirected_edges() {
                    if explicit.contains(&edge.source) == explicit.contains(&edge.target) {
                        return Err(Precondition::InvalidPartition(edge.source, edge.target).into());
                    }
                }
                explicit.clone()
            }
        };
        Ok(left)
    }

    fn seed(&self, graph: &Graph, left: &BTreeSet<NodeId>) -> Result<Matching, AlgorithmError> {
        let mut matching = Matching::new();
        for &(u, v) in &self.warm_start {
            let crosses = left.contains(&u) != left.contains(&v);
            let adjacent = graph.has_edge(u, v) || graph.has_edge(v, u);
            if !crosses || !adjacent || matching.is_matched(u) || matching.is_matched(v) {
                return Err(Precondition::InvalidWarmStart(u, v).into());
            }
            matching.link(u, v);
        }
        Ok(matching)
    }

    /// Computes a maximum matching of `graph`
    pub fn maximum_matching(&mut self, graph: &Graph) -> Result<Matching, AlgorithmError> {
        let left = self.resolve_left(graph)?;
        let mut matching = self.seed(graph, &left)?;

        self.profiler.start();
        let view = graph.undirected_view();
        let mut context = AugmentContext::default();
        let mut passes = 0usize;

        loop {
            let mut augmented = 0usize;
            for &root in &left {
                if matching.is_matched(root) {
                    continue;
                }
                if self.augment_from(root, &view, &mut matching, &mut context) {
                    augmented += 1;
                    self.profiler.record_step();
                }
            }
            passes += 1;
            trace!("pass {}: {} augmentations", passes, augmented);
            if augmented == 0 {
                break;
            }
        }

        self.profiler.record_custom("passes", passes as f64);
        self.profiler.record_custom("matching_size", matching.len() as f64);
        self.profiler.stop();
        debug!(
            "maximum matching of size {} after {} passes (seeded with {})",
            matching.len(),
            passes,
            self.warm_start.len()
        );
        Ok(matching)
    }

    /// Searches for an augmenting path from `root` and flips it if found
    fn augment_from(
        &mut self,
        root: NodeId,
        view: &Graph,
        matching: &mut Matching,
        context: &mut AugmentContext,
    ) -> bool {
        context.visited.clear();
        context.stack.clear();
        context.stack.push(SearchFrame {
            left: root,
            next_edge: 0,
            via: None,
        });

        while let Some(frame) = context.stack.last_mut() {
            let edges = view.out_edges(frame.left);
            let Some(edge) = edges.get(frame.next_edge) else {
                context.stack.pop();
                continue;
            };
            frame.next_edge += 1;

            let right = edge.target;
            if !context.visited.insert(right) {
                continue;
            }
            self.profiler.record_node_exploration();
            frame.via = Some(right);

            match matching.mate(right) {
                None => {
                    for level in &context.stack {
                        if let Some(right) = level.via {
                            matching.link(level.left, right);
                        }
                    }
                    return true;
                }
                Some(partner) => context.stack.push(SearchFrame {
                    left: partner,
                    next_edge: 0,
                    via: None,
                }),
            }
        }
        false
    }
}

impl Algorithm for BipartiteMatching {
    type Output = Matching;

    fn name(&self) -> &'static str {
        "Bipartite Maximum Matching"
    }

    fn category(&self) -> &'static str {
        "matching"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V·E)", "O(V)")
    }

    fn is_compatible_with(&self, graph: &Graph) -> Result<(), AlgorithmError> {
        let left = self.resolve_left(graph)?;
        self.seed(graph, &left).map(|_| ())
    }

    fn execute(&mut self, graph: &Graph) -> Result<Matching, AlgorithmError> {
        self.maximum_matching(graph)
    }

    fn metrics(&self) -> &AlgorithmMetrics {
        self.profiler.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn n(id: usize) -> NodeId {
        NodeId(id)
    }

    /// Exhaustive maximum matching size for small graphs
    fn brute_force_size(graph: &Graph, left: &[NodeId], used: &mut HashSet<NodeId>) -> usize {
        let Some((&first, rest)) = left.split_first() else {
            return 0;
        };
        let mut best = brute_force_size(graph, rest, used);
        for right in graph.neighbors(first).collect::<Vec<_>>() {
            if used.insert(right) {
                best = best.max(1 + brute_force_size(graph, rest, used));
                used.remove(&right);
            }
        }
        best
    }

    #[test]
    fn test_reference_scenario() {
        let _ = env_logger::builder().is_test(true).try_init();
        let graph = Graph::from_edges(false, [(1, 3, 1.0), (1, 4, 1.0), (2, 3, 1.0)]).unwrap();

        let matching = BipartiteMatching::new().maximum_matching(&graph).unwrap();
        assert_eq!(matching.len(), 2);
        assert_eq!(matching.pairs(), vec![(n(1), n(4)), (n(2), n(3))]);
        assert_eq!(matching.mate(n(3)), Some(n(2)));
        assert!(matching.is_perfect(&graph));
    }

    #[test]
    fn test_warm_start_is_rerouted() {
        let graph = Graph::from_edges(false, [(1, 3, 1.0), (1, 4, 1.0), (2, 3, 1.0)]).unwrap();
        let mut engine = BipartiteMatching::new().with_warm_start([(n(1), n(3))]);

        let matching = engine.maximum_matching(&graph).unwrap();
        assert_eq!(matching.pairs(), vec![(n(1), n(4)), (n(2), n(3))]);
        assert_eq!(engine.metrics().steps_executed, 1);
    }

    #[test]
    fn test_explicit_left_partition() {
        // Auto-detection would put vertex 3 on the left; the caller flips it
        let graph = Graph::from_edges(false, [(3, 1, 1.0), (3, 2, 1.0), (4, 2, 1.0)]).unwrap();
        let matching = BipartiteMatching::new()
            .with_left_partition([n(3), n(4)])
            .maximum_matching(&graph)
            .unwrap();
        assert_eq!(matching.pairs(), vec![(n(1), n(3)), (n(2), n(4))]);

        let bad = BipartiteMatching::new()
            .with_left_partition([n(3), n(1)])
            .maximum_matching(&graph);
        assert_eq!(
            bad,
            Err(AlgorithmError::StructuralPrecondition(Precondition::InvalidPartition(n(1), n(3))))
        );
    }

    #[test]
    fn test_invalid_warm_start_rejected() {
        let graph = Graph::from_edges(false, [(1, 3, 1.0), (2, 4, 1.0)]).unwrap();

        let not_an_edge = BipartiteMatching::new()
            .with_warm_start([(n(1), n(4))])
            .maximum_matching(&graph);
        assert_eq!(
            not_an_edge,
            Err(AlgorithmError::StructuralPrecondition(Precondition::InvalidWarmStart(n(1), n(4))))
        );

        let reused = BipartiteMatching::new()
            .with_warm_start([(n(1), n(3)), (n(3), n(1))])
            .is_compatible_with(&graph);
        assert!(reused.is_err());
    }

    #[test]
    fn test_non_bipartite_rejected() {
        let triangle = Graph::from_edges(false, [(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0)]).unwrap();
        assert_eq!(
            BipartiteMatching::new().maximum_matching(&triangle),
            Err(AlgorithmError::StructuralPrecondition(Precondition::NotBipartite))
        );
    }

    #[test]
    fn test_directed_graph_and_total_weight() {
        let graph = Graph::from_edges(true, [(1, 10, 2.0), (2, 10, 3.0), (2, 11, 4.0)]).unwrap();
        let matching = BipartiteMatching::new().maximum_matching(&graph).unwrap();
        assert_eq!(matching.len(), 2);
        assert_eq!(matching.total_weight(&graph).unwrap(), 6.0);
    }

    #[test]
    fn test_long_augmenting_chain() {
        // Path 0-100-1-101-...; the greedy pass leaves one vertex needing a long reroute
        let mut graph = Graph::undirected();
        let len = 200;
        for i in 0..len {
            graph.add_edge(n(i), n(1000 + i), 1.0).unwrap();
            graph.add_edge(n(i + 1), n(1000 + i), 1.0).unwrap();
        }
        let matching = BipartiteMatching::new().maximum_matching(&graph).unwrap();
        assert_eq!(matching.len(), len);
    }

    proptest! {
        #[test]
        fn test_matching_is_valid_and_maximum(
            edges in prop::collection::vec((0usize..5, 0usize..5), 0..15)
        ) {
            let mut graph = Graph::undirected();
            for (l, r) in &edges {
                graph.add_edge(NodeId(*l), NodeId(10 + *r), 1.0).unwrap();
            }
            let left: Vec<NodeId> = (0..5).map(NodeId).filter(|v| graph.contains_vertex(*v)).collect();

            let matching = BipartiteMatching::new()
                .with_left_partition(left.clone())
                .maximum_matching(&graph)
                .unwrap();

            let mut seen = HashSet::new();
            for (u, v) in matching.pairs() {
                prop_assert!(graph.has_edge(u, v));
                prop_assert!(seen.insert(u));
                prop_assert!(seen.insert(v));
            }
            prop_assert_eq!(matching.len(), brute_force_size(&graph, &left, &mut HashSet::new()));
        }
    }
}
