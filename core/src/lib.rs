//! graphopt: combinatorial optimization over weighted graphs
//!
//! A single [`Graph`] model (directed or undirected, weighted, integer
//! vertex ids) shared by a family of solvers:
//!
//! - maximum bipartite matching (Kuhn's augmenting paths)
//! - minimum-cost perfect assignment (Hungarian method)
//! - Eulerian circuits (Hierholzer)
//! - traveling salesman tours (exact, MST approximation, genetic)
//! - vertex coloring (independent-set greedy, exact on bipartite graphs)
//!
//! Every solver implements [`Algorithm`], validates its structural
//! preconditions before doing any work, and never mutates the caller's graph.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;

pub use crate::algorithm::traits::{Algorithm, AlgorithmError, NodeId, Precondition};
pub use crate::data_structures::graph::{Graph, Weight};
