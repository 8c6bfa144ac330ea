//! Core data structures
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod graph;

pub use self::graph::{Bipartition, Edge, Graph, Weight, DEFAULT_WEIGHT};
