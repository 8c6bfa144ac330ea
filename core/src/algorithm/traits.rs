//! Core algorithm trait definitions for GraphOpt
//!
//! This module establishes the shared vocabulary of every solver in the
//! crate: vertex identifiers, the error taxonomy, string-keyed parameter
//! handling, execution metrics, and the `Algorithm` trait itself.
//!
//! # Key Design Principles
//! - Every precondition is validated before any search state is touched
//! - Solvers own their per-invocation state; nothing lives at process scope
//! - Deterministic behavior for given inputs (ascending vertex order)

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::data_structures::graph::{Graph, Weight};

/// Vertex identifier ensuring type safety and preventing mixing with other numeric types
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(id: usize) -> Self {
        NodeId(id)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Algorithm parameter with strongly typed values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub constraints: Option<ParameterConstraints>,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterType {
    Integer,
    Float,
    Boolean,
    Enum(Vec<String>),
}

/// Parameter constraints for validating algorithm parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allowed_values: Option<Vec<String>>,
}

impl AlgorithmParameter {
    pub fn new(name: &str, value: impl ToString, value_type: ParameterType) -> Self {
        Self {
            name: name.to_owned(),
            value: value.to_string(),
            value_type,
            constraints: None,
        }
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.constraints = Some(ParameterConstraints {
            min,
            max,
            allowed_values: None,
        });
        self
    }

    /// Restricts the value to `values`; enum parameters list their variants here
    pub fn with_allowed_values(mut self, values: Vec<String>) -> Self {
        self.constraints = Some(ParameterConstraints {
            min: None,
            max: None,
            allowed_values: Some(values),
        });
        self
    }

    /// Checks `value` against the allowed values, when any are listed
    pub fn allows(&self, value: &str) -> bool {
        match self.constraints.as_ref().and_then(|c| c.allowed_values.as_ref()) {
            Some(values) => values.iter().any(|v| v == value),
            None => true,
        }
    }
}

/// Which side of the directed/undirected split an operation expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directedness {
    Directed,
    Undirected,
}

impl Display for Directedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directedness::Directed => write!(f, "directed"),
            Directedness::Undirected => write!(f, "undirected"),
        }
    }
}

/// Structural conditions a graph must satisfy before a solver will run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Precondition {
    #[error("graph is not bipartite")]
    NotBipartite,

    #[error("graph is not connected")]
    NotConnected,

    #[error("graph is not strongly connected")]
    NotStronglyConnected,

    #[error("expected a {expected} graph")]
    WrongDirectedness { expected: Directedness },

    #[error("bipartite partitions differ in size: {left} left vs {right} right")]
    UnequalPartitions { left: usize, right: usize },

    #[error("bipartite graph is not complete: missing edge {0} -> {1}")]
    IncompleteBipartite(NodeId, NodeId),

    #[error("edge {0} -> {1} does not cross the given partition")]
    InvalidPartition(NodeId, NodeId),

    #[error("warm-start pair ({0}, {1}) is not a valid matching edge")]
    InvalidWarmStart(NodeId, NodeId),

    #[error("edge {from} -> {to} has negative weight {weight}")]
    NegativeWeight { from: NodeId, to: NodeId, weight: Weight },

    #[error("at least {required} vertices required, found {found}")]
    TooFewVertices { required: usize, found: usize },

    #[error("graph has no Eulerian circuit: {0}")]
    NotEulerian(String),

    #[error("no Hamiltonian cycle exists through the graph's edges")]
    NoHamiltonianCycle,

    #[error("self-loop on vertex {0} is not supported")]
    SelfLoop(NodeId),

    #[error("edge {0} -> {1} runs against the left-to-right orientation")]
    EdgeAgainstOrientation(NodeId, NodeId),
}

/// Comprehensive error types for algorithm operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Structural precondition violated: {0}")]
    StructuralPrecondition(#[from] Precondition),

    #[error("Edge not found: {0} -> {1}")]
    EdgeNotFound(NodeId, NodeId),

    #[error("Algorithm not supported on given input: {0}")]
    NotSupported(String),

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl AlgorithmError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        AlgorithmError::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Algorithm execution metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    pub steps_executed: usize,
    pub nodes_explored: usize,
    pub execution_time: Duration,
    pub custom_metrics: HashMap<String, f64>,
}

/// Algorithm complexity information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
}

impl AlgorithmComplexity {
    pub fn new(time: &str, space: &str) -> Self {
        Self {
            time_complexity: time.to_owned(),
            space_complexity: space.to_owned(),
        }
    }
}

/// Main algorithm trait
///
/// # Invariants
/// - State isolation between runs: `execute` never reuses search state
///   from a previous invocation
/// - The caller's graph is never mutated
/// - Deterministic behavior for given inputs and parameters
pub trait Algorithm: Debug {
    /// Structured result produced by a successful run
    type Output;

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., matching, routing)
    fn category(&self) -> &'static str;

    /// Returns the algorithm's asymptotic complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with type information
    fn parameters(&self) -> Vec<AlgorithmParameter> {
        Vec::new()
    }

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, _value: &str) -> Result<(), AlgorithmError> {
        Err(AlgorithmError::invalid_parameter(name, "unknown parameter"))
    }

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters()
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }

    /// Verifies algorithm can operate on given graph, reporting the first violation
    fn is_compatible_with(&self, graph: &Graph) -> Result<(), AlgorithmError>;

    /// Runs the algorithm to completion
    fn execute(&mut self, graph: &Graph) -> Result<Self::Output, AlgorithmError>;

    /// Metrics of the most recent run
    fn metrics(&self) -> &AlgorithmMetrics;
}

/// Performance profiling integration
#[derive(Debug, Default)]
pub struct AlgorithmProfiler {
    metrics: AlgorithmMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.metrics = AlgorithmMetrics::default();
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_node_exploration(&mut self) {
        self.metrics.nodes_explored += 1;
    }

    pub fn record_step(&mut self) {
        self.metrics.steps_executed += 1;
    }

    pub fn record_custom(&mut self, key: &str, value: f64) {
        self.metrics.custom_metrics.insert(key.to_owned(), value);
    }

    pub fn increment_custom(&mut self, key: &str) {
        *self.metrics.custom_metrics.entry(key.to_owned()).or_insert(0.0) += 1.0;
    }

    pub fn get_metrics(&self) -> AlgorithmMetrics {
        self.metrics.clone()
    }

    pub fn metrics(&self) -> &AlgorithmMetrics {
        &self.metrics
    }
}

/// Parses a typed parameter value, mapping failures to `InvalidParameter`
pub(crate) fn parse_parameter<T: std::str::FromStr>(
    name: &str,
    value: &str,
) -> Result<T, AlgorithmError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AlgorithmError::invalid_parameter(name, format!("cannot parse '{}'", value)))
}
