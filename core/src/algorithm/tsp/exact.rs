//! Exact TSP by depth-first branch and bound
//!
//! The search extends a partial path one edge at a time, in the order the
//! graph exposes each vertex's edges, starting from the lowest vertex id.
//! Any extension whose accumulated cost already reaches the best complete
//! tour is discarded. This is a cost-only bound, not an admissible lower
//! bound, so the worst case stays exponential.
//!
//! All search state lives in a [`SearchContext`] owned by a single call.

use std::collections::HashSet;

use log::{debug, trace};

use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmProfiler, NodeId, Precondition,
};
use crate::algorithm::tsp::{validate_tour_graph, Tour};
use crate::data_structures::graph::{Graph, Weight};

/// One level of the explicit search stack
#[derive(Debug, Clone, Copy)]
struct Frame {
    vertex: NodeId,
    next_edge: usize,
    /// Accumulated cost on arrival at `vertex`
    cost: Weight,
}

/// Per-invocation search state
#[derive(Debug)]
struct SearchContext {
    path: Vec<NodeId>,
    visited: HashSet<NodeId>,
    best_path: Option<Vec<NodeId>>,
    best_cost: Weight,
}

impl SearchContext {
    fn new(start: NodeId, capacity: usize) -> Self {
        let mut path = Vec::with_capacity(capacity + 1);
        path.push(start);
        Self {
            path,
            visited: HashSet::from([start]),
            best_path: None,
            best_cost: Weight::INFINITY,
        }
    }

    fn backtrack(&mut self, stack: &mut Vec<Frame>) {
        if let Some(frame) = stack.pop() {
            self.path.pop();
            self.visited.remove(&frame.vertex);
        }
    }
}

#[derive(Debug, Default)]
pub struct BranchAndBound {
    profiler: AlgorithmProfiler,
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solve(&mut self, graph: &Graph) -> Result<Tour, AlgorithmError> {
        validate_tour_graph(graph)?;
        self.profiler.start();

        let n = graph.vertex_count();
        let start = graph
            .vertices()
            .next()
            .ok_or(Precondition::TooFewVertices { required: 1, found: 0 })?;
        let mut context = SearchContext::new(start, n);
        let mut stack = vec![Frame {
            vertex: start,
            next_edge: 0,
            cost: 0.0,
        }];

        while let Some(frame) = stack.last_mut() {
            if context.path.len() == n {
                if let Ok(closing) = graph.edge_weight(frame.vertex, start) {
                    let total = frame.cost + closing;
                    if total < context.best_cost {
                        let mut tour = context.path.clone();
                        tour.push(start);
                        trace!("improved tour cost {} -> {}", context.best_cost, total);
                        context.best_cost = total;
                        context.best_path = Some(tour);
                        self.profiler.increment_custom("improvements");
                    }
                }
                context.backtrack(&mut stack);
                continue;
            }

            let Some(edge) = graph.out_edges(frame.vertex).get(frame.next_edge) else {
                context.backtrack(&mut stack);
                continue;
            };
            frame.next_edge += 1;

            if context.visited.contains(&edge.target) {
                continue;
            }
            let cost = frame.cost + edge.weight;
            if cost >= context.best_cost {
                self.profiler.increment_custom("pruned");
                continue;
            }

            self.profiler.record_node_exploration();
            context.path.push(edge.target);
            context.visited.insert(edge.target);
            stack.push(Frame {
                vertex: edge.target,
                next_edge: 0,
                cost,
            });
        }

        self.profiler.stop();
        let vertices = context.best_path.ok_or(Precondition::NoHamiltonianCycle)?;
        debug!(
            "exact tour cost {} after exploring {} partial paths",
            context.best_cost,
            self.profiler.metrics().nodes_explored
        );
        Ok(Tour {
            vertices,
            cost: context.best_cost,
        })
    }
}

impl Algorithm for BranchAndBound {
    type Output = Tour;

    fn name(&self) -> &'static str {
        "Branch and Bound TSP"
    }

    fn category(&self) -> &'static str {
        "routing"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V!)", "O(V)")
    }

    fn is_compatible_with(&self, graph: &Graph) -> Result<(), AlgorithmError> {
        validate_tour_graph(graph)
    }

    fn execute(&mut self, graph: &Graph) -> Result<Tour, AlgorithmError> {
        self.solve(graph)
    }

    fn metrics(&self) -> &AlgorithmMetrics {
        self.profiler.metrics()
    }
}
