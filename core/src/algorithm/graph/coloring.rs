//! Graph Coloring
//!
//! Bipartite graphs receive their exact 2-coloring straight from the
//! bipartition. Every other graph is colored greedily: isolated vertices
//! share one color, then each round extracts an approximate maximum
//! independent set (repeatedly taking the candidate with the fewest
//! neighbors left in the candidate pool) and gives it a fresh color. Colored
//! vertices lose their edges in a private working copy so later rounds see a
//! smaller graph.
//!
//! The greedy branch is a heuristic upper bound on the chromatic number; it
//! carries no minimality guarantee.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmProfiler, NodeId};
use crate::data_structures::graph::Graph;

/// Total vertex → color assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coloring {
    pub colors: BTreeMap<NodeId, usize>,
    /// Number of distinct colors in use
    pub color_count: usize,
}

impl Coloring {
    fn from_colors(colors: BTreeMap<NodeId, usize>) -> Self {
        let color_count = colors.values().collect::<BTreeSet<_>>().len();
        Self { colors, color_count }
    }

    pub fn color_of(&self, vertex: NodeId) -> Option<usize> {
        self.colors.get(&vertex).copied()
    }

    /// No edge joins two vertices of the same color, and every vertex is colored
    pub fn is_proper(&self, graph: &Graph) -> bool {
        graph.vertices().all(|v| self.colors.contains_key(&v))
            && graph
                .edges()
                .all(|e| self.color_of(e.source) != self.color_of(e.target))
    }

    /// Vertices grouped by color index
    pub fn classes(&self) -> BTreeMap<usize, Vec<NodeId>> {
        let mut classes: BTreeMap<usize, Vec<NodeId>> = BTreeMap::new();
        for (&vertex, &color) in &self.colors {
            classes.entry(color).or_default().push(vertex);
        }
        classes
    }
}

#[derive(Debug, Default)]
pub struct GraphColoring {
    profiler: AlgorithmProfiler,
}

impl GraphColoring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colors every vertex of `graph`
    pub fn color(&mut self, graph: &Graph) -> Result<Coloring, AlgorithmError> {
        self.profiler.start();

        let coloring = match graph.is_bipartite() {
            Some(partition) => {
                let colors = partition
                    .left
                    .iter()
                    .map(|&v| (v, 0))
                    .chain(partition.right.iter().map(|&v| (v, 1)))
                    .collect();
                Coloring::from_colors(colors)
            }
            None => self.greedy(graph),
        };

        self.profiler.record_custom("colors", coloring.color_count as f64);
        self.profiler.stop();
        debug!("colored {} vertices with {} colors", coloring.colors.len(), coloring.color_count);
        Ok(coloring)
    }

    fn greedy(&mut self, graph: &Graph) -> Coloring {
        let mut working = graph.underlying_undirected();
        let mut colors = BTreeMap::new();
        let mut next_color = 0;

        let isolated = working.isolated_vertices();
        if !isolated.is_empty() {
            for &vertex in &isolated {
                colors.insert(vertex, next_color);
            }
            next_color += 1;
        }

        let mut remaining: BTreeSet<NodeId> = working.vertices().filter(|v| !colors.contains_key(v)).collect();

        while !remaining.is_empty() {
            let independent = self.extract_independent_set(&working, &remaining);
            trace!("color {}: independent set of {} vertices", next_color, independent.len());

            for vertex in independent {
                colors.insert(vertex, next_color);
                remaining.remove(&vertex);
                working.remove_incident_edges(vertex);
            }
            self.profiler.record_step();
            next_color += 1;
        }

        Coloring::from_colors(colors)
    }

    /// Min-degree greedy independent set within `pool`; ties go to the lowest id
    fn extract_independent_set(&mut self, working: &Graph, pool: &BTreeSet<NodeId>) -> Vec<NodeId> {
        let mut candidates = pool.clone();
        let mut independent = Vec::new();

        while !candidates.is_empty() {
            let mut best: Option<(NodeId, usize)> = None;
            for &vertex in &candidates {
                let degree = working
                    .distinct_neighbors(vertex)
                    .filter(|n| candidates.contains(n))
                    .count();
                if best.map_or(true, |(_, d)| degree < d) {
                    best = Some((vertex, degree));
                }
            }

            let Some((chosen, _)) = best else { break };
            self.profiler.record_node_exploration();
            independent.push(chosen);
            candidates.remove(&chosen);
            for neighbor in working.neighbors(chosen) {
                candidates.remove(&neighbor);
            }
        }
        independent
    }
}

impl Algorithm for GraphColoring {
    type Output = Coloring;

    fn name(&self) -> &'static str {
        "Independent Set Graph Coloring"
    }

    fn category(&self) -> &'static str {
        "coloring"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V³)", "O(V + E)")
    }

    fn is_compatible_with(&self, _graph: &Graph) -> Result<(), AlgorithmError> {
        Ok(())
    }

    fn execute(&mut self, graph: &Graph) -> Result<Coloring, AlgorithmError> {
        self.color(graph)
    }

    fn metrics(&self) -> &AlgorithmMetrics {
        self.profiler.metrics()
    }
}
