//! Eulerian Circuit Construction (Hierholzer)
//!
//! Builds a closed walk that uses every edge exactly once. The traversal runs
//! on a private snapshot of the graph and consumes edges as it goes; an
//! explicit stack replaces recursion, so arbitrarily long circuits never
//! touch the call stack.
//!
//! Existence conditions:
//! - undirected: connected (isolated vertices ignored) and every degree even
//! - directed: strongly connected and in-degree == out-degree everywhere

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmProfiler, NodeId, Precondition,
};
use crate::data_structures::graph::{Graph, Weight};

/// Outcome of the existence check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EulerianStatus {
    Eulerian,
    NotEulerian { reason: String },
}

impl EulerianStatus {
    pub fn is_eulerian(&self) -> bool {
        matches!(self, EulerianStatus::Eulerian)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            EulerianStatus::Eulerian => None,
            EulerianStatus::NotEulerian { reason } => Some(reason),
        }
    }
}

/// Closed walk through every edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Vertex sequence; first and last entries coincide
    pub vertices: Vec<NodeId>,
    pub total_weight: Weight,
}

impl Circuit {
    /// Number of edges traversed
    pub fn edge_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn is_closed(&self) -> bool {
        self.vertices.first() == self.vertices.last()
    }
}

#[derive(Debug, Default)]
pub struct EulerianCircuit {
    profiler: AlgorithmProfiler,
}

impl EulerianCircuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the existence conditions for the graph's mode
    pub fn check(graph: &Graph) -> Result<EulerianStatus, AlgorithmError> {
        let not_eulerian = |reason: &str| EulerianStatus::NotEulerian { reason: reason.to_owned() };

        let status = if graph.is_directed() {
            if !graph.is_strongly_connected()? {
                not_eulerian("graph is not strongly connected")
            } else if !graph.all_vertices_balanced() {
                not_eulerian("some vertex has in-degree different from out-degree")
            } else {
                EulerianStatus::Eulerian
            }
        } else if !graph.is_connected() {
            not_eulerian("graph is not connected")
        } else if !graph.all_vertices_have_even_degree()? {
            not_eulerian("some vertex has odd degree")
        } else {
            EulerianStatus::Eulerian
        };
        Ok(status)
    }

    /// Builds an Eulerian circuit or reports why none exists
    pub fn build(&mut self, graph: &Graph) -> Result<Circuit, AlgorithmError> {
        self.is_compatible_with(graph)?;
        self.profiler.start();

        let start = graph
            .vertices()
            .find(|v| graph.out_degree(*v) > 0)
            .or_else(|| graph.vertices().next())
            .ok_or(Precondition::TooFewVertices { required: 1, found: 0 })?;

        let mut remaining = graph.snapshot();
        let mut stack = vec![start];
        let mut popped = Vec::with_capacity(graph.edge_count() + 1);
        let mut total_weight = 0.0;

        while let Some(&top) = stack.last() {
            match remaining.take_first_edge(top) {
                Some(edge) => {
                    total_weight += edge.weight;
                    stack.push(edge.target);
                    self.profiler.record_step();
                }
                None => {
                    stack.pop();
                    popped.push(top);
                }
            }
        }

        // Pop order walks edges backwards; reverse so directed circuits follow edge direction
        popped.reverse();
        self.profiler.stop();
        debug!("eulerian circuit over {} edges starting at {}", popped.len() - 1, start);
        Ok(Circuit {
            vertices: popped,
            total_weight,
        })
    }
}

impl Algorithm for EulerianCircuit {
    type Output = Circuit;

    fn name(&self) -> &'static str {
        "Hierholzer Eulerian Circuit"
    }

    fn category(&self) -> &'static str {
        "traversal"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V + E·d)", "O(V + E)")
    }

    fn is_compatible_with(&self, graph: &Graph) -> Result<(), AlgorithmError> {
        match Self::check(graph)? {
            EulerianStatus::Eulerian => Ok(()),
            EulerianStatus::NotEulerian { reason } => Err(Precondition::NotEulerian(reason).into()),
        }
    }

    fn execute(&mut self, graph: &Graph) -> Result<Circuit, AlgorithmError> {
        self.build(graph)
    }

    fn metrics(&self) -> &AlgorithmMetrics {
        self.profiler.metrics()
    }
}
