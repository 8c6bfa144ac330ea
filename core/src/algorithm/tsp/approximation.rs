//! MST-based 2-approximation for the TSP
//!
//! Builds a minimum spanning tree, walks it in preorder from the lowest
//! vertex id and closes the walk back to the start, skipping vertices that
//! were already visited. On metric instances the tour costs at most twice
//! the optimum. On non-metric or incomplete graphs the shortcut edges may
//! not exist, in which case no tour is produced.
//!
//! # Algorithmic Complexity
//!
//! - **Time Complexity**: O(E log E) dominated by the spanning tree
//! - **Space Complexity**: O(V + E)

use std::collections::HashSet;

use log::debug;

use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmProfiler, Directedness, NodeId,
    Precondition,
};
use crate::algorithm::tsp::{validate_tour_graph, Tour};
use crate::data_structures::graph::Graph;

#[derive(Debug, Default)]
pub struct MstApproximation {
    profiler: AlgorithmProfiler,
}

impl MstApproximation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solve(&mut self, graph: &Graph) -> Result<Tour, AlgorithmError> {
        self.is_compatible_with(graph)?;
        self.profiler.start();

        let tree = graph.minimum_spanning_tree()?;
        self.profiler.record_custom("tree_weight", tree.total_weight);
        let tree = tree.to_graph(graph.vertices())?;

        let mut vertices = self.preorder(&tree);
        if let Some(&start) = vertices.first() {
            vertices.push(start);
        }

        let cost = graph.path_cost(&vertices).map_err(|err| match err {
            AlgorithmError::EdgeNotFound(from, to) => {
                debug!("shortcut {} -> {} missing from input graph", from, to);
                AlgorithmError::from(Precondition::NoHamiltonianCycle)
            }
            other => other,
        })?;

        self.profiler.stop();
        debug!("approximate tour cost {} over {} vertices", cost, graph.vertex_count());
        Ok(Tour { vertices, cost })
    }

    /// Preorder of the tree rooted at its lowest vertex; children are visited
    /// in adjacency order
    fn preorder(&mut self, tree: &Graph) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(tree.vertex_count() + 1);
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeId> = tree.vertices().take(1).collect();

        while let Some(vertex) = stack.pop() {
            if !visited.insert(vertex) {
                continue;
            }
            self.profiler.record_node_exploration();
            order.push(vertex);
            let children: Vec<NodeId> = tree.neighbors(vertex).filter(|n| !visited.contains(n)).collect();
            stack.extend(children.into_iter().rev());
        }
        order
    }
}

impl Algorithm for MstApproximation {
    type Output = Tour;

    fn name(&self) -> &'static str {
        "MST 2-Approximation TSP"
    }

    fn category(&self) -> &'static str {
        "routing"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(E log E)", "O(V + E)")
    }

    fn is_compatible_with(&self, graph: &Graph) -> Result<(), AlgorithmError> {
        validate_tour_graph(graph)?;
        if graph.is_directed() {
            return Err(Precondition::WrongDirectedness {
                expected: Directedness::Undirected,
            }
            .into());
        }
        Ok(())
    }

    fn execute(&mut self, graph: &Graph) -> Result<Tour, AlgorithmError> {
        self.solve(graph)
    }

    fn metrics(&self) -> &AlgorithmMetrics {
        self.profiler.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::tsp::{fixtures, BranchAndBound};
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn test_chain_tree_gives_optimal_tour() {
        let graph = fixtures::square_with_diagonals();
        let mut solver = MstApproximation::new();
        let tour = solver.solve(&graph).unwrap();

        assert_eq!(tour.vertices, ids(&[1, 2, 3, 4, 1]));
        assert_eq!(tour.cost, 10.0);
        assert_eq!(solver.metrics().custom_metrics["tree_weight"], 6.0);
    }

    #[test]
    fn test_within_twice_optimum_on_metric_instances() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);

        for _ in 0..5 {
            let points: Vec<(f64, f64)> = (0..7)
                .map(|_| (rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
                .collect();
            let graph = fixtures::euclidean(&points);

            let approximate = MstApproximation::new().solve(&graph).unwrap();
            let optimal = BranchAndBound::new().solve(&graph).unwrap();

            assert_eq!(approximate.city_count(), 7);
            assert!(approximate.is_closed());
            assert!(approximate.cost >= optimal.cost - 1e-9);
            assert!(approximate.cost <= 2.0 * optimal.cost + 1e-9);
        }
    }

    #[test]
    fn test_missing_shortcut_reports_no_cycle() {
        // Star MST around 1 forces the shortcut 2 -> 3, which does not exist
        let graph = Graph::from_edges(
            false,
            [(1, 2, 1.0), (1, 3, 1.0), (1, 4, 1.0), (2, 4, 5.0), (3, 4, 5.0)],
        )
        .unwrap();
        assert_eq!(
            MstApproximation::new().solve(&graph),
            Err(AlgorithmError::StructuralPrecondition(Precondition::NoHamiltonianCycle))
        );
        assert!(BranchAndBound::new().solve(&graph).is_ok());
    }

    #[test]
    fn test_directed_graph_rejected() {
        let graph = Graph::from_edges(true, [(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0)]).unwrap();
        assert_eq!(
            MstApproximation::new().solve(&graph),
            Err(AlgorithmError::StructuralPrecondition(Precondition::WrongDirectedness {
                expected: Directedness::Undirected
            }))
        );
    }
}
