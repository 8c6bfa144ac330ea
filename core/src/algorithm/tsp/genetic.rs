//! Genetic Algorithm for the TSP
//!
//! Individuals are permutations of city indices evaluated as closed tours
//! over a dense cost table in which missing edges cost infinity. Each
//! generation keeps its best individual unchanged, then fills the rest of
//! the population with children of tournament-selected parents produced by
//! partially mapped crossover (PMX); each child then undergoes a single
//! random pairwise swap with probability `mutation_rate`.
//!
//! A seeded `Xoshiro256PlusPlus` generator drives every random choice, so a
//! given configuration always yields the same tour.
//!
//! Copyright (c) 2025 Mohammad Atashi. All rights reserved.

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    parse_parameter, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmParameter,
    AlgorithmProfiler, NodeId, ParameterType, Precondition,
};
use crate::algorithm::tsp::{validate_tour_graph, Tour};
use crate::data_structures::graph::{Graph, Weight};

/// Tuning knobs for [`GeneticSolver`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Contestants drawn per parent selection
    pub tournament_size: usize,
    /// Probability that a child receives one random pairwise swap
    pub mutation_rate: f64,
    /// When false, children are copies of their first parent
    pub crossover: bool,
    pub seed: u64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            tournament_size: 5,
            mutation_rate: 0.02,
            crossover: true,
            seed: 42,
        }
    }
}

impl GeneticConfig {
    /// Parses a JSON object; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, AlgorithmError> {
        let config: GeneticConfig =
            serde_json::from_str(json).map_err(|e| AlgorithmError::invalid_parameter("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AlgorithmError> {
        if self.population_size < 2 {
            return Err(AlgorithmError::invalid_parameter(
                "population_size",
                "population must hold at least 2 individuals",
            ));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(AlgorithmError::invalid_parameter(
                "tournament_size",
                format!("must be between 1 and population_size ({})", self.population_size),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(AlgorithmError::invalid_parameter(
                "mutation_rate",
                "must be a probability in [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Dense cost table indexed by city position
#[derive(Debug)]
struct CostTable {
    cities: Vec<NodeId>,
    costs: Vec<Weight>,
}

impl CostTable {
    /// First stored edge wins for parallel edges, matching `Graph::edge_weight`
    fn from_graph(graph: &Graph) -> Self {
        let cities: Vec<NodeId> = graph.vertices().collect();
        let n = cities.len();
        let mut costs = vec![Weight::INFINITY; n * n];

        for (i, &city) in cities.iter().enumerate() {
            for edge in graph.out_edges(city) {
                if let Ok(j) = cities.binary_search(&edge.target) {
                    let slot = &mut costs[i * n + j];
                    if slot.is_infinite() {
                        *slot = edge.weight;
                    }
                }
            }
        }
        Self { cities, costs }
    }

    fn len(&self) -> usize {
        self.cities.len()
    }

    fn cost(&self, from: usize, to: usize) -> Weight {
        self.costs[from * self.len() + to]
    }

    /// Closed tour cost; infinite when any hop is missing
    fn tour_cost(&self, order: &[usize]) -> Weight {
        let closing = match (order.last(), order.first()) {
            (Some(&last), Some(&first)) => self.cost(last, first),
            _ => return 0.0,
        };
        order.windows(2).map(|w| self.cost(w[0], w[1])).sum::<Weight>() + closing
    }
}

#[derive(Debug, Clone)]
struct Individual {
    order: Vec<usize>,
    cost: Weight,
}

#[derive(Debug, Default)]
pub struct GeneticSolver {
    config: GeneticConfig,
    profiler: AlgorithmProfiler,
}

impl GeneticSolver {
    pub fn new(config: GeneticConfig) -> Self {
        Self {
            config,
            profiler: AlgorithmProfiler::new(),
        }
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    pub fn solve(&mut self, graph: &Graph) -> Result<Tour, AlgorithmError> {
        self.is_compatible_with(graph)?;
        self.profiler.start();

        let table = CostTable::from_graph(graph);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed);
        let mut population = self.initial_population(&table, &mut rng);
        let mut best = fittest(&population).clone();

        for generation in 0..self.config.generations {
            population = self.next_generation(&table, &population, &mut rng);

            let champion = fittest(&population);
            if champion.cost < best.cost {
                trace!("generation {}: best cost {} -> {}", generation, best.cost, champion.cost);
                best = champion.clone();
                self.profiler.increment_custom("improvements");
            }
            self.profiler.record_step();
        }

        self.profiler.stop();
        if !best.cost.is_finite() {
            return Err(Precondition::NoHamiltonianCycle.into());
        }

        // Rotate so the tour starts at the lowest vertex id
        if let Some(offset) = best.order.iter().position(|&c| c == 0) {
            best.order.rotate_left(offset);
        }
        let cost = table.tour_cost(&best.order);
        let mut vertices: Vec<NodeId> = best.order.iter().map(|&c| table.cities[c]).collect();
        vertices.push(table.cities[best.order[0]]);

        debug!(
            "genetic tour cost {} after {} generations of {}",
            cost, self.config.generations, self.config.population_size
        );
        Ok(Tour { vertices, cost })
    }

    fn initial_population(&mut self, table: &CostTable, rng: &mut Xoshiro256PlusPlus) -> Vec<Individual> {
        let base: Vec<usize> = (0..table.len()).collect();
        let mut population = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            let mut order = base.clone();
            order.shuffle(rng);
            population.push(self.evaluate(table, order));
        }
        population
    }

    /// Elitism of one followed by selection, crossover and mutation
    fn next_generation(
        &mut self,
        table: &CostTable,
        population: &[Individual],
        rng: &mut Xoshiro256PlusPlus,
    ) -> Vec<Individual> {
        let mut next = Vec::with_capacity(self.config.population_size);
        next.push(fittest(population).clone());

        while next.len() < self.config.population_size {
            let first = self.tournament(population, rng);
            let mut child = if self.config.crossover {
                let second = self.tournament(population, rng);
                pmx(&first.order, &second.order, rng)
            } else {
                first.order.clone()
            };
            mutate(&mut child, self.config.mutation_rate, rng);
            next.push(self.evaluate(table, child));
        }
        next
    }

    /// Best of `tournament_size` uniformly drawn individuals; ties keep the first draw
    fn tournament<'a>(&self, population: &'a [Individual], rng: &mut Xoshiro256PlusPlus) -> &'a Individual {
        let mut winner = &population[rng.gen_range(0..population.len())];
        for _ in 1..self.config.tournament_size {
            let contender = &population[rng.gen_range(0..population.len())];
            if contender.cost < winner.cost {
                winner = contender;
            }
        }
        winner
    }

    fn evaluate(&mut self, table: &CostTable, order: Vec<usize>) -> Individual {
        self.profiler.record_node_exploration();
        let cost = table.tour_cost(&order);
        Individual { order, cost }
    }
}

/// Lowest-cost individual; the earliest wins ties
fn fittest(population: &[Individual]) -> &Individual {
    let mut best = &population[0];
    for individual in &population[1..] {
        if individual.cost < best.cost {
            best = individual;
        }
    }
    best
}

/// Partially mapped crossover
///
/// The child inherits `first[a..=b]` in place; remaining genes come from
/// `second`, relocated through the segment mapping when they would collide.
fn pmx(first: &[usize], second: &[usize], rng: &mut impl Rng) -> Vec<usize> {
    let n = first.len();
    if n < 2 {
        return first.to_vec();
    }

    let (mut a, mut b) = (rng.gen_range(0..n), rng.gen_range(0..n));
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }

    let mut position_in_second = vec![0; n];
    for (i, &gene) in second.iter().enumerate() {
        position_in_second[gene] = i;
    }

    let mut child: Vec<Option<usize>> = vec![None; n];
    let mut placed = vec![false; n];
    for i in a..=b {
        child[i] = Some(first[i]);
        placed[first[i]] = true;
    }

    for i in a..=b {
        let gene = second[i];
        if placed[gene] {
            continue;
        }
        let mut slot = i;
        while (a..=b).contains(&slot) {
            slot = position_in_second[first[slot]];
        }
        child[slot] = Some(gene);
        placed[gene] = true;
    }

    child
        .into_iter()
        .zip(second)
        .map(|(gene, &fallback)| gene.unwrap_or(fallback))
        .collect()
}

/// With probability `rate`, swaps one uniformly drawn pair of positions
fn mutate(order: &mut [usize], rate: f64, rng: &mut impl Rng) {
    let n = order.len();
    if n < 2 {
        return;
    }
    if rng.gen::<f64>() < rate {
        let (i, j) = (rng.gen_range(0..n), rng.gen_range(0..n));
        order.swap(i, j);
    }
}

impl Algorithm for GeneticSolver {
    type Output = Tour;

    fn name(&self) -> &'static str {
        "Genetic Algorithm TSP"
    }

    fn category(&self) -> &'static str {
        "routing"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity::new("O(G·P·V)", "O(P·V + V²)")
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        let config = &self.config;
        vec![
            AlgorithmParameter::new("population_size", config.population_size, ParameterType::Integer)
                .with_range(Some(2.0), None),
            AlgorithmParameter::new("generations", config.generations, ParameterType::Integer)
                .with_range(Some(0.0), None),
            AlgorithmParameter::new("tournament_size", config.tournament_size, ParameterType::Integer)
                .with_range(Some(1.0), Some(config.population_size as f64)),
            AlgorithmParameter::new("mutation_rate", config.mutation_rate, ParameterType::Float)
                .with_range(Some(0.0), Some(1.0)),
            AlgorithmParameter::new("crossover", config.crossover, ParameterType::Boolean),
            AlgorithmParameter::new("seed", config.seed, ParameterType::Integer),
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        let mut candidate = self.config.clone();
        match name {
            "population_size" => candidate.population_size = parse_parameter(name, value)?,
            "generations" => candidate.generations = parse_parameter(name, value)?,
            "tournament_size" => candidate.tournament_size = parse_parameter(name, value)?,
            "mutation_rate" => candidate.mutation_rate = parse_parameter(name, value)?,
            "crossover" => candidate.crossover = parse_parameter(name, value)?,
            "seed" => candidate.seed = parse_parameter(name, value)?,
            _ => return Err(AlgorithmError::invalid_parameter(name, "unknown parameter")),
        }
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }

    fn is_compatible_with(&self, graph: &Graph) -> Result<(), AlgorithmError> {
        self.config.validate()?;
        validate_tour_graph(graph)
    }

    fn execute(&mut self, graph: &Graph) -> Result<Tour, AlgorithmError> {
        self.solve(graph)
    }

    fn metrics(&self) -> &AlgorithmMetrics {
        self.profiler.metrics()
    }
}
