//! Minimum-Cost Assignment (Hungarian / Kuhn–Munkres)
//!
//! Solves the assignment problem on a directed complete bipartite graph whose
//! edges run from the left side (vertices with outgoing edges) to the right
//! side. The method keeps one label per vertex and only ever walks edges that
//! are tight under the current labels; the equality subgraph is never built,
//! tightness is re-evaluated from the labels whenever an edge is inspected.
//!
//! # Dual Feasibility
//!
//! Labels are kept in minimization form: for every edge (x, y),
//! `label[x] + label[y] <= cost(x, y)`, with equality on tight edges. Left
//! labels start at the cheapest incident cost and right labels at zero.
//! When the alternating tree rooted at an unmatched left vertex cannot grow,
//! the minimum slack α between the tree's left set S and the right vertices
//! outside T is added to every label in S and subtracted from every label in
//! T, which keeps all tree edges tight and creates at least one new tight
//! edge leaving the tree.
//!
//! # Algorithmic Complexity
//!
//! - **Time Complexity**: O(V³)
//! - **Space Complexity**: O(V²) for the dense cost table
//!
//! Copyright (c) 2025 Mohammad Atashi. All rights reserved.

use std::collections::BTreeMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::matching::Matching;
use crate::algorithm::traits::{
    parse_parameter, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmParameter,
    AlgorithmProfiler, Directedness, NodeId, ParameterType, Precondition,
};
use crate::data_structures::graph::{Graph, Weight};

/// Default tolerance when comparing label sums against edge costs
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Result of a minimum-cost assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Final dual labels for every vertex
    pub labels: BTreeMap<NodeId, Weight>,
    /// Perfect matching between the left and right sides
    pub matching: Matching,
    pub total_cost: Weight,
}

impl Assignment {
    /// Right-side partner of a left vertex
    pub fn assigned_to(&self, left: NodeId) -> Option<NodeId> {
        self.matching.mate(left)
    }
}

/// Validated dense view of the bipartite instance
#[derive(Debug)]
struct CostTable {
    left: Vec<NodeId>,
    right: Vec<NodeId>,
    cost: Vec<Vec<Weight>>,
}

/// Per-invocation solver state
#[derive(Debug)]
struct HungarianState {
    label_left: Vec<Weight>,
    label_right: Vec<Weight>,
    mate_left: Vec<Option<usize>>,
    mate_right: Vec<Option<usize>>,
}

/// Hungarian method for the minimum-cost perfect matching
#[derive(Debug)]
pub struct HungarianAssignment {
    tolerance: f64,
    profiler: AlgorithmProfiler,
}

impl Default for HungarianAssignment {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            profiler: AlgorithmProfiler::new(),
        }
    }
}

impl HungarianAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Checks every precondition in order and reports the first violation
    fn validate(&self, graph: &Graph) -> Result<CostTable, AlgorithmError> {
        if !graph.is_directed() {
            return Err(Precondition::WrongDirectedness {
                expected: Directedness::Directed,
            }
            .into());
        }
        if graph.is_bipartite().is_none() {
            return Err(Precondition::NotBipartite.into());
        }

        let (left, right): (Vec<NodeId>, Vec<NodeId>) = graph.vertices().partition(|v| graph.out_degree(*v) > 0);
        if let Some(edge) = graph.edges().find(|e| graph.out_degree(e.target) > 0) {
            return Err(Precondition::EdgeAgainstOrientation(edge.source, edge.target).into());
        }
        if left.len() != right.len() {
            return Err(Precondition::UnequalPartitions {
                left: left.len(),
                right: right.len(),
            }
            .into());
        }
        graph.ensure_nonnegative_weights()?;

        let column: BTreeMap<NodeId, usize> = right.iter().enumerate().map(|(j, &v)| (v, j)).collect();
        let mut cost = vec![vec![Weight::INFINITY; right.len()]; left.len()];
        for (i, &x) in left.iter().enumerate() {
            for edge in graph.out_edges(x) {
                let j = column[&edge.target];
                // Parallel edges: the cheapest one counts
                cost[i][j] = cost[i][j].min(edge.weight);
            }
            if let Some(j) = cost[i].iter().position(|c| c.is_infinite()) {
                return Err(Precondition::IncompleteBipartite(x, right[j]).into());
            }
        }

        Ok(CostTable { left, right, cost })
    }

    /// Computes a minimum-cost perfect matching
    pub fn solve(&mut self, graph: &Graph) -> Result<Assignment, AlgorithmError> {
        let table = self.validate(graph)?;
        self.profiler.start();

        let n = table.left.len();
        let mut state = HungarianState {
            label_left: table
                .cost
                .iter()
                .map(|row| row.iter().copied().fold(Weight::INFINITY, Weight::min))
                .collect(),
            label_right: vec![0.0; n],
            mate_left: vec![None; n],
            mate_right: vec![None; n],
        };

        for root in 0..n {
            self.grow_and_augment(root, &table, &mut state);
            self.profiler.increment_custom("augmentations");
        }

        let mut matching = Matching::new();
        let mut total_cost = 0.0;
        for (i, mate) in state.mate_left.iter().enumerate() {
            if let Some(j) = *mate {
                matching.link(table.left[i], table.right[j]);
                total_cost += table.cost[i][j];
            }
        }

        let labels = table
            .left
            .iter()
            .zip(&state.label_left)
            .chain(table.right.iter().zip(&state.label_right))
            .map(|(&v, &l)| (v, l))
            .collect();

        self.profiler.stop();
        debug!("assignment of {} pairs with total cost {}", matching.len(), total_cost);
        Ok(Assignment {
            labels,
            matching,
            total_cost,
        })
    }

    #[inline]
    fn slack(table: &CostTable, state: &HungarianState, i: usize, j: usize) -> Weight {
        table.cost[i][j] - state.label_left[i] - state.label_right[j]
    }

    /// Grows the alternating tree from `root` over tight edges, adjusting
    /// labels whenever it stalls, until an augmenting path is found
    fn grow_and_augment(&mut self, root: usize, table: &CostTable, state: &mut HungarianState) {
        let n = table.left.len();
        let mut in_s = vec![false; n];
        let mut in_t = vec![false; n];
        let mut parent: Vec<Option<usize>> = vec![None; n];

        in_s[root] = true;
        let mut stack = vec![root];

        loop {
            if let Some(free) = self.search_tight(table, state, &mut stack, &mut in_s, &mut in_t, &mut parent) {
                Self::augment(free, &parent, state);
                return;
            }

            let mut alpha = Weight::INFINITY;
            for i in (0..n).filter(|&i| in_s[i]) {
                for j in (0..n).filter(|&j| !in_t[j]) {
                    alpha = alpha.min(Self::slack(table, state, i, j));
                }
            }
            trace!("root {}: label update by {}", root, alpha);
            self.profiler.record_step();

            for i in 0..n {
                if in_s[i] {
                    state.label_left[i] += alpha;
                }
                if in_t[i] {
                    state.label_right[i] -= alpha;
                }
            }

            // S and T persist; rescan S for edges that just became tight
            stack.extend((0..n).filter(|&i| in_s[i]));
        }
    }

    /// Depth-first expansion over tight edges; returns a free right vertex
    fn search_tight(
        &mut self,
        table: &CostTable,
        state: &HungarianState,
        stack: &mut Vec<usize>,
        in_s: &mut [bool],
        in_t: &mut [bool],
        parent: &mut [Option<usize>],
    ) -> Option<usize> {
        let n = table.left.len();
        while let Some(i) = stack.pop() {
            self.profiler.record_node_exploration();
            for j in 0..n {
                if in_t[j] || Self::slack(table, state, i, j).abs() > self.tolerance {
                    continue;
                }
                in_t[j] = true;
                parent[j] = Some(i);
                match state.mate_right[j] {
                    None => return Some(j),
                    Some(next) if !in_s[next] => {
                        in_s[next] = true;
                        stack.push(next);
                    }
                    Some(_) => {}
                }
            }
        }
        None
    }

    /// Flips matched and unmatched edges along the parent chain ending at `free`
    fn augment(free: usize, parent: &[Option<usize>], state: &mut HungarianState) {
        let mut j = free;
        while let Some(i) = parent[j] {
            let previous = state.mate_left[i];
            state.mate_left[i] = Some(j);
            state.mate_right[j] = Some(i);
            match previous {
                Some(p) => j = p,
                None => break,
            }
        }
    }
}

impl Algorithm for HungarianAssignment {
    type Output = Assignment;

    fn name(&self) -> &'static str {
        "Hungarian Assignment"
    }

    fn category(&self) -> &'static str {
        "matching"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(V³)", "O(V²)")
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter::new("tolerance", self.tolerance, ParameterType::Float).with_range(Some(0.0), None)]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "tolerance" => {
                let tolerance: f64 = parse_parameter(name, value)?;
                if !(tolerance >= 0.0) {
                    return Err(AlgorithmError::invalid_parameter(name, "must be nonnegative"));
                }
                self.tolerance = tolerance;
                Ok(())
            }
            _ => Err(AlgorithmError::invalid_parameter(name, "unknown parameter; valid: tolerance")),
        }
    }

    fn is_compatible_with(&self, graph: &Graph) -> Result<(), AlgorithmError> {
        self.validate(graph).map(|_| ())
    }

    fn execute(&mut self, graph: &Graph) -> Result<Assignment, AlgorithmError> {
        self.solve(graph)
    }

    fn metrics(&self) -> &AlgorithmMetrics {
        self.profiler.metrics()
    }
}
