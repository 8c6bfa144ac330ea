//! Combinatorial graph algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod assignment;
pub mod coloring;
pub mod euler;
pub mod matching;
pub mod mst;

pub use self::assignment::{Assignment, HungarianAssignment};
pub use self::coloring::{Coloring, GraphColoring};
pub use self::euler::{Circuit, EulerianCircuit, EulerianStatus};
pub use self::matching::{BipartiteMatching, Matching};
pub use self::mst::{kruskal, SpanningTree, UnionFind};
