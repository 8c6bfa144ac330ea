//! Graph optimization algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod traits;
pub mod graph;
pub mod tsp;

pub use self::traits::*;
pub use self::graph::*;
pub use self::tsp::{Tour, TravelingSalesman, TspStrategy};
