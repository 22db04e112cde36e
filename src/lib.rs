//! Ant Colony TSP Solver Library
//!
//! An approximate Traveling Salesman Problem solver built on an Ant Colony
//! Optimization metaheuristic: a fixed swarm of ants stochastically
//! constructs tours over a complete graph, advanced in lock-step epochs,
//! while a pheromone trail accumulates on the edges of short tours and
//! biases future selection.
//!
//! # Features
//!
//! - Epoch-stepped multi-agent simulation with in-flight travel times
//! - Pheromone- and distance-weighted roulette selection
//! - Multi-criteria termination (wall clock, round trips, swarm usage,
//!   stagnation)
//! - TSP-LIB and JSON city-map instance loading
//! - SVG visualization of tours and pheromone trails
//! - Benchmarking harness with parameter profiles and CSV export
//!
//! # Example
//!
//! ```no_run
//! use aco_tsp_solver::colony::{AntColonySolver, ColonyConfig};
//! use aco_tsp_solver::instance::TspInstance;
//!
//! // Load an instance
//! let instance = TspInstance::from_file("cities.json").unwrap();
//!
//! // Run the colony with default parameters
//! let config = ColonyConfig::default();
//! let mut solver = AntColonySolver::new(instance, config).unwrap();
//! let solution = solver.solve();
//!
//! if solution.found() {
//!     println!("Best tour cost: {:.2}", solution.cost);
//! }
//! ```

pub mod benchmark;
pub mod colony;
pub mod instance;
pub mod solution;
pub mod visualization;

pub use colony::{AntColonySolver, ColonyConfig};
pub use instance::TspInstance;
pub use solution::Solution;
