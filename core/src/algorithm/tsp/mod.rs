//! Traveling Salesman Problem
//!
//! Three independent strategies over the shared [`Graph`]:
//!
//! - [`BranchAndBound`]: exact depth-first search with cost pruning
//! - [`MstApproximation`]: spanning-tree preorder walk with shortcutting,
//!   within twice the optimum on metric instances
//! - [`GeneticSolver`]: permutation-encoded genetic metaheuristic
//!
//! Every strategy validates the same structural preconditions up front and
//! returns a closed [`Tour`]. [`TravelingSalesman`] selects a strategy by
//! name so callers can configure the solver through string parameters.
//!
//! Copyright (c) 2025 Mohammad Atashi. All rights reserved.

pub mod approximation;
pub mod exact;
pub mod genetic;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmParameter, NodeId, ParameterType,
    Precondition,
};
use crate::data_structures::graph::{Graph, Weight};

pub use self::approximation::MstApproximation;
pub use self::exact::BranchAndBound;
pub use self::genetic::{GeneticConfig, GeneticSolver};

/// Minimum number of vertices for a meaningful tour
pub const MIN_TOUR_VERTICES: usize = 3;

/// Closed tour through every vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    /// Visit order; the start vertex is repeated at the end
    pub vertices: Vec<NodeId>,
    pub cost: Weight,
}

impl Tour {
    pub fn is_closed(&self) -> bool {
        self.vertices.len() > 1 && self.vertices.first() == self.vertices.last()
    }

    /// Number of distinct vertices visited
    pub fn city_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<NodeId> {
        self.vertices.first().copied()
    }
}

/// Preconditions shared by every strategy: enough vertices, connectivity
/// (strong connectivity for directed graphs, no isolated vertices) and
/// nonnegative weights
pub fn validate_tour_graph(graph: &Graph) -> Result<(), AlgorithmError> {
    if graph.vertex_count() < MIN_TOUR_VERTICES {
        return Err(Precondition::TooFewVertices {
            required: MIN_TOUR_VERTICES,
            found: graph.vertex_count(),
        }
        .into());
    }

    if graph.is_directed() {
        if !graph.is_strongly_connected()? || !graph.isolated_vertices().is_empty() {
            return Err(Precondition::NotStronglyConnected.into());
        }
    } else if !graph.is_connected() || !graph.isolated_vertices().is_empty() {
        return Err(Precondition::NotConnected.into());
    }

    graph.ensure_nonnegative_weights()
}

/// Strategy selector for [`TravelingSalesman`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TspStrategy {
    #[default]
    Exact,
    MstApproximation,
    Genetic,
}

impl TspStrategy {
    pub const ALL: [TspStrategy; 3] = [TspStrategy::Exact, TspStrategy::MstApproximation, TspStrategy::Genetic];

    pub fn as_str(&self) -> &'static str {
        match self {
            TspStrategy::Exact => "exact",
            TspStrategy::MstApproximation => "mst_approximation",
            TspStrategy::Genetic => "genetic",
        }
    }
}

impl fmt::Display for TspStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TspStrategy {
    type Err = AlgorithmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TspStrategy::ALL
            .into_iter()
            .find(|s| s.as_str() == value.trim())
            .ok_or_else(|| {
                AlgorithmError::invalid_parameter(
                    "strategy",
                    format!("invalid strategy: {}. Valid options: exact, mst_approximation, genetic", value),
                )
            })
    }
}

/// Strategy-dispatching TSP solver
#[derive(Debug, Default)]
pub struct TravelingSalesman {
    strategy: TspStrategy,
    exact: BranchAndBound,
    approximation: MstApproximation,
    genetic: GeneticSolver,
}

impl TravelingSalesman {
    pub fn new(strategy: TspStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_genetic_config(mut self, config: GeneticConfig) -> Self {
        self.genetic = GeneticSolver::new(config);
        self
    }

    pub fn strategy(&self) -> TspStrategy {
        self.strategy
    }

    fn active(&self) -> &dyn Algorithm<Output = Tour> {
        match self.strategy {
            TspStrategy::Exact => &self.exact,
            TspStrategy::MstApproximation => &self.approximation,
            TspStrategy::Genetic => &self.genetic,
        }
    }

    fn active_mut(&mut self) -> &mut dyn Algorithm<Output = Tour> {
        match self.strategy {
            TspStrategy::Exact => &mut self.exact,
            TspStrategy::MstApproximation => &mut self.approximation,
            TspStrategy::Genetic => &mut self.genetic,
        }
    }

    /// Solves with the configured strategy
    pub fn solve(&mut self, graph: &Graph) -> Result<Tour, AlgorithmError> {
        self.active_mut().execute(graph)
    }
}

impl Algorithm for TravelingSalesman {
    type Output = Tour;

    fn name(&self) -> &'static str {
        self.active().name()
    }

    fn category(&self) -> &'static str {
        "routing"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        self.active().complexity()
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        let strategies: Vec<String> = TspStrategy::ALL.iter().map(|s| s.as_str().to_owned()).collect();
        let mut parameters = vec![
            AlgorithmParameter::new("strategy", self.strategy, ParameterType::Enum(strategies.clone()))
                .with_allowed_values(strategies),
        ];
        parameters.extend(self.genetic.parameters());
        parameters
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "strategy" => {
                self.strategy = value.parse()?;
                Ok(())
            }
            _ => self.genetic.set_parameter(name, value),
        }
    }

    fn is_compatible_with(&self, graph: &Graph) -> Result<(), AlgorithmError> {
        self.active().is_compatible_with(graph)
    }

    fn execute(&mut self, graph: &Graph) -> Result<Tour, AlgorithmError> {
        self.solve(graph)
    }

    fn metrics(&self) -> &AlgorithmMetrics {
        self.active().metrics()
    }
}
