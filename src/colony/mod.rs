//! Ant colony optimization core.
//!
//! A fixed swarm of ants walks the complete graph in lock-step epochs.
//! Each epoch every in-flight ant advances by `ant_speed`; ants whose
//! countdown has run out arrive, pick their next node by a pheromone- and
//! distance-weighted roulette draw, and on returning home with every node
//! visited deposit reward along their tour. The run stops once the
//! termination policy fires.

pub mod ant;
pub mod config;
pub mod graph;
pub mod pheromone;
pub mod termination;

pub use ant::{Ant, AntStatus};
pub use config::ColonyConfig;
pub use graph::GraphCache;
pub use pheromone::PheromoneField;
pub use termination::{TerminationPolicy, Verdict};

use crate::instance::TspInstance;
use crate::solution::Solution;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

const ALGORITHM_NAME: &str = "ACO";

/// Ant colony solver for a single TSP instance.
///
/// The distance and attractiveness caches are built once at construction;
/// the pheromone field persists across `solve` calls (as do the usage
/// counters) until [`restart`](Self::restart) reinitializes them.
pub struct AntColonySolver {
    config: ColonyConfig,
    instance: TspInstance,
    graph: GraphCache,
    pheromones: PheromoneField,
    termination: TerminationPolicy,
    start_smell: f64,
    ant_count: usize,
    ant_speed: f64,
    rng: ChaCha8Rng,
    /// Total completed tours across the swarm
    pub ants_used: usize,
    /// Epochs consumed by the most recent `solve`
    pub epochs_used: usize,
    /// Maximum completed-tour count over the individual ants
    pub round_trips: usize,
}

impl AntColonySolver {
    /// Build a solver for an instance. Calls the cost oracle once per
    /// ordered node pair; an oracle returning a negative or non-finite
    /// value is rejected here rather than inside the simulation loop.
    pub fn new(instance: TspInstance, config: ColonyConfig) -> Result<Self, String> {
        let dimension = instance.dimension();
        let graph = GraphCache::build(
            dimension,
            |i, j| instance.cost(i, j),
            config.distance_power,
        )?;

        let start_smell = config.initial_smell();
        let pheromones = PheromoneField::new(dimension, start_smell);

        let ant_count = if config.ant_count > 0 {
            config.ant_count
        } else {
            dimension
        };
        let ant_speed = if config.ant_speed > 0.0 {
            config.ant_speed
        } else {
            (graph.median_distance() / 5.0).floor().max(1.0)
        };

        let termination = TerminationPolicy::from_config(&config);
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(AntColonySolver {
            config,
            instance,
            graph,
            pheromones,
            termination,
            start_smell,
            ant_count,
            ant_speed,
            rng,
            ants_used: 0,
            epochs_used: 0,
            round_trips: 0,
        })
    }

    /// The instance this solver was built for
    pub fn instance(&self) -> &TspInstance {
        &self.instance
    }

    /// Current pheromone trail state
    pub fn pheromones(&self) -> &PheromoneField {
        &self.pheromones
    }

    /// Reinitialize the pheromone field and usage counters. The distance
    /// caches are derived deterministically from the instance and stay.
    pub fn restart(&mut self) {
        self.pheromones = PheromoneField::new(self.graph.dimension(), self.start_smell);
        self.ants_used = 0;
        self.epochs_used = 0;
        self.round_trips = 0;
    }

    /// Run the simulation until the termination policy fires, keeping the
    /// pheromone state accumulated by earlier calls
    pub fn solve(&mut self) -> Solution {
        self.solve_with(false)
    }

    /// Run the simulation, optionally restarting the pheromone state first
    pub fn solve_with(&mut self, restart: bool) -> Solution {
        if restart {
            self.restart();
        }

        let started = Instant::now();
        let dimension = self.instance.dimension();

        // With fewer than two nodes no tour can exist; report the empty
        // outcome rather than erroring.
        if dimension < 2 {
            let mut solution = Solution::new();
            solution.algorithm = ALGORITHM_NAME.to_string();
            solution.computation_time = started.elapsed().as_secs_f64();
            return solution;
        }

        let home = 0;
        let mut ants: Vec<Ant> = (0..self.ant_count).map(|_| Ant::new(home, dimension)).collect();

        let mut best_path: Option<Vec<usize>> = None;
        let mut best_cost = f64::INFINITY;
        let mut best_epochs: Vec<usize> = Vec::new();
        let mut arrivals: Vec<usize> = Vec::with_capacity(self.ant_count);
        let mut epoch = 0usize;

        loop {
            epoch += 1;

            // One vectorized pass: advance travellers, collect arrivals.
            arrivals.clear();
            for (index, ant) in ants.iter_mut().enumerate() {
                match ant.status(self.ant_speed) {
                    AntStatus::Travelling => ant.in_transit -= self.ant_speed,
                    AntStatus::Arriving => arrivals.push(index),
                }
            }
            // Every ant still in flight: skip straight to the next epoch,
            // termination checks included (keeps epoch numbering stable).
            if arrivals.is_empty() {
                continue;
            }

            for &index in &arrivals {
                let this_node = ants[index].current();
                ants[index].mark_visited(this_node);

                let next = self.next_node(&ants[index]);
                let leg = self.graph.distance(this_node, next);
                {
                    let ant = &mut ants[index];
                    ant.in_transit = leg;
                    ant.path_cost += leg;
                    ant.path.push(next);
                }

                // The ant is back at the colony with every node visited.
                if !ants[index].has_remaining() && ants[index].home() == next {
                    self.ants_used += 1;
                    self.round_trips = self.round_trips.max(ants[index].round_trips + 1);

                    let mut was_best = false;
                    if ants[index].path_cost < best_cost {
                        was_best = true;
                        best_cost = ants[index].path_cost;
                        best_path = Some(ants[index].path.clone());
                        best_epochs.push(epoch);
                        if self.config.verbose {
                            log::info!(
                                "new best tour: cost={:.2} ants_used={} epoch={} round_trips={} clock={:.1}s",
                                best_cost,
                                self.ants_used,
                                epoch,
                                ants[index].round_trips + 1,
                                started.elapsed().as_secs_f64()
                            );
                        }
                    }

                    // Depositing only after the ant returns home improves
                    // initial exploration. Scaling by the round-trip count
                    // acts as relative decay of older trails.
                    let mut reward = 1.0;
                    if self.config.reward_power != 0.0 {
                        reward *= (best_cost / ants[index].path_cost).powf(self.config.reward_power);
                    }
                    if self.config.decay_power != 0.0 {
                        reward *= (self.round_trips as f64).powf(self.config.decay_power);
                    }

                    for leg_index in 0..ants[index].path.len() - 1 {
                        let a = ants[index].path[leg_index];
                        let b = ants[index].path[leg_index + 1];
                        self.pheromones.reinforce(a, b, reward);
                        if was_best {
                            self.pheromones.boost(a, b, self.config.best_path_smell);
                        }
                    }

                    ants[index].reset(home);
                }
            }

            // Always wait for at least one complete tour.
            if best_epochs.is_empty() {
                continue;
            }
            let last_best_epoch = best_epochs[best_epochs.len() - 1];
            let verdict = self.termination.verdict(
                started.elapsed().as_secs_f64(),
                self.round_trips,
                self.ants_used,
                epoch,
                last_best_epoch,
            );
            if verdict == Verdict::Stop {
                break;
            }
        }

        self.epochs_used = epoch;
        self.round_trips = ants.iter().map(|ant| ant.round_trips).max().unwrap_or(0);

        let mut solution = match best_path {
            Some(mut path) => {
                // Drop the duplicate closing node; the return edge stays
                // implicit in the reported cost.
                path.pop();
                Solution::from_tour(&self.instance, path, ALGORITHM_NAME)
            }
            None => {
                let mut empty = Solution::new();
                empty.algorithm = ALGORITHM_NAME.to_string();
                empty
            }
        };
        solution.computation_time = started.elapsed().as_secs_f64();
        solution.epochs = Some(self.epochs_used);
        solution.ants_used = self.ants_used;
        solution.round_trips = self.round_trips;
        solution
    }

    /// Pick the ant's next node: home once nothing remains, otherwise a
    /// roulette draw weighted by trail strength and edge attractiveness
    fn next_node(&mut self, ant: &Ant) -> usize {
        if !ant.has_remaining() {
            return ant.home();
        }

        let this_node = ant.current();
        let mut candidates: Vec<(usize, f64)> = Vec::new();
        let mut total = 0.0;
        for next in ant.remaining_nodes() {
            let weight = self
                .pheromones
                .get(this_node, next)
                .powf(self.config.pheromone_power)
                * self.graph.attractiveness(this_node, next);
            candidates.push((next, weight));
            total += weight;
        }

        // Degenerate trail state: fall back to a uniform draw rather than
        // sampling from a zero or non-finite mass.
        if !total.is_finite() || total <= 0.0 {
            return candidates
                .choose(&mut self.rng)
                .map(|&(next, _)| next)
                .unwrap_or_else(|| ant.home());
        }

        let mut pick = self.rng.gen::<f64>() * total;
        for &(next, weight) in &candidates {
            pick -= weight;
            if pick <= 0.0 {
                return next;
            }
        }
        candidates[candidates.len() - 1].0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::TspInstance;

    fn seeded(config: ColonyConfig) -> ColonyConfig {
        ColonyConfig { seed: Some(42), ..config }
    }

    #[test]
    fn test_unit_square_finds_perimeter() {
        let instance = TspInstance::from_points(
            "square",
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        );
        let config = seeded(ColonyConfig {
            ant_count: 8,
            stop_factor: 2.0,
            ..Default::default()
        });

        let mut solver = AntColonySolver::new(instance, config).unwrap();
        let solution = solver.solve();

        assert!(solution.found());
        assert!(solution.complete);
        // The optimal perimeter tour has length 4.
        assert!((solution.cost - 4.0).abs() < 1e-9, "cost was {}", solution.cost);

        let mut sorted = solution.tour.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        assert_eq!(solution.tour[0], 0);

        assert!(solver.ants_used > 0);
        assert!(solver.epochs_used > 0);
        assert!(solver.round_trips >= 10);
        assert_eq!(solution.ants_used, solver.ants_used);
    }

    #[test]
    fn test_two_nodes() {
        let instance = TspInstance::from_points("pair", &[(0.0, 0.0), (3.0, 4.0)]);
        let mut solver = AntColonySolver::new(instance, seeded(ColonyConfig::default())).unwrap();
        let solution = solver.solve();

        assert_eq!(solution.tour, vec![0, 1]);
        assert!((solution.cost - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_single_node_return_no_tour() {
        for points in [&[][..], &[(1.0, 2.0)][..]] {
            let instance = TspInstance::from_points("tiny", points);
            let mut solver =
                AntColonySolver::new(instance, seeded(ColonyConfig::default())).unwrap();
            let solution = solver.solve();

            assert!(!solution.found());
            assert!(!solution.complete);
        }
    }

    #[test]
    fn test_pheromones_stay_positive() {
        let instance = TspInstance::from_points(
            "square",
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        );
        let mut solver =
            AntColonySolver::new(instance, seeded(ColonyConfig::default())).unwrap();
        solver.solve();

        assert!(solver.pheromones().min_value() > 0.0);
    }

    #[test]
    fn test_restart_resets_state() {
        let instance = TspInstance::from_points(
            "square",
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        );
        let config = seeded(ColonyConfig::default());
        let initial_smell = config.initial_smell();
        let mut solver = AntColonySolver::new(instance, config).unwrap();

        solver.solve();
        assert!(solver.ants_used > 0);
        assert!(solver.pheromones().max_value() > initial_smell);

        solver.restart();
        assert_eq!(solver.ants_used, 0);
        assert_eq!(solver.epochs_used, 0);
        assert_eq!(solver.round_trips, 0);
        assert_eq!(solver.pheromones().min_value(), initial_smell);
        assert_eq!(solver.pheromones().max_value(), initial_smell);
    }

    #[test]
    fn test_solve_accumulates_without_restart() {
        let instance = TspInstance::from_points(
            "square",
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        );
        let mut solver =
            AntColonySolver::new(instance, seeded(ColonyConfig::default())).unwrap();

        solver.solve();
        let after_first = solver.ants_used;
        solver.solve();
        let after_second = solver.ants_used;
        assert!(after_second > after_first);

        // A restarted run counts from zero again.
        solver.solve_with(true);
        assert!(solver.ants_used < after_second);
    }

    #[test]
    fn test_selection_returns_home_when_nothing_remains() {
        let instance = TspInstance::from_points("pair", &[(0.0, 0.0), (1.0, 0.0)]);
        let mut solver =
            AntColonySolver::new(instance, seeded(ColonyConfig::default())).unwrap();

        let mut ant = Ant::new(0, 2);
        ant.mark_visited(1);
        assert_eq!(solver.next_node(&ant), 0);
    }

    #[test]
    fn test_selection_probability_law() {
        // Candidate 1 sits at distance 1 (attractiveness 1/2), candidate 2
        // at distance 3 (attractiveness 1/4); with a uniform trail the
        // weights are 2:1, so candidate 1 should win about 2/3 of draws.
        let instance =
            TspInstance::from_points("line", &[(0.0, 0.0), (1.0, 0.0), (3.0, 0.0)]);
        let mut solver =
            AntColonySolver::new(instance, seeded(ColonyConfig::default())).unwrap();

        let ant = Ant::new(0, 3);
        let samples = 20_000;
        let mut first = 0usize;
        for _ in 0..samples {
            match solver.next_node(&ant) {
                1 => first += 1,
                2 => {}
                other => panic!("unexpected candidate {}", other),
            }
        }

        let ratio = first as f64 / samples as f64;
        assert!((ratio - 2.0 / 3.0).abs() < 0.02, "ratio was {}", ratio);
    }

    #[test]
    fn test_selection_degenerate_weights_fall_back_to_uniform() {
        // An absurd pheromone power overflows the weights to infinity; the
        // draw must still return a valid candidate instead of panicking.
        let instance =
            TspInstance::from_points("line", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let config = seeded(ColonyConfig {
            pheromone_power: 1e6,
            ..Default::default()
        });
        let mut solver = AntColonySolver::new(instance, config).unwrap();

        let ant = Ant::new(0, 3);
        for _ in 0..100 {
            let next = solver.next_node(&ant);
            assert!(next == 1 || next == 2);
        }
    }

    #[test]
    fn test_ant_speed_derived_from_median_distance() {
        // Distances around 20: median / 5 floors to a speed of 4.
        let instance = TspInstance::from_points(
            "spread",
            &[(0.0, 0.0), (20.0, 0.0), (0.0, 20.0), (20.0, 20.0)],
        );
        let config = seeded(ColonyConfig {
            ant_speed: 0.0,
            ..Default::default()
        });
        let solver = AntColonySolver::new(instance, config).unwrap();
        assert!((solver.ant_speed - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_ant_count_defaults_to_problem_size() {
        let instance =
            TspInstance::from_points("line", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let config = seeded(ColonyConfig {
            ant_count: 0,
            ..Default::default()
        });
        let solver = AntColonySolver::new(instance, config).unwrap();
        assert_eq!(solver.ant_count, 3);
    }
}
