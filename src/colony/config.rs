//! Colony configuration parameters.

/// Ant colony configuration. Numeric bounds of 0 mean "unset".
#[derive(Debug, Clone)]
pub struct ColonyConfig {
    /// Run for a fixed amount of time in seconds; overrides every other
    /// stop condition while it is set
    pub time: f64,
    /// Minimum runtime in seconds
    pub min_time: f64,
    /// Maximum time in seconds to run for
    pub timeout: f64,
    /// Stagnation multiplier: stop once the epoch counter exceeds
    /// `stop_factor` times the epoch of the last improvement
    pub stop_factor: f64,
    /// Minimum number of round trips before stopping
    pub min_round_trips: usize,
    /// Maximum number of round trips before stopping
    pub max_round_trips: usize,
    /// Minimum total number of completed tours across the swarm
    pub min_ants: usize,
    /// Maximum total number of completed tours across the swarm
    pub max_ants: usize,
    /// Number of ants in the swarm (0 defaults to the problem size)
    pub ant_count: usize,
    /// Distance an ant travels per epoch (0 derives it from the median
    /// inter-node distance)
    pub ant_speed: f64,
    /// Power to which distance affects edge attractiveness
    pub distance_power: f64,
    /// Power to which differences in pheromones are noticed
    pub pheromone_power: f64,
    /// How fast old pheromone trails lose relative weight
    pub decay_power: f64,
    /// Relative pheromone reward based on best cost / tour cost
    pub reward_power: f64,
    /// Multiplier applied to every edge of a newly found best tour
    pub best_path_smell: f64,
    /// Initial pheromone level (0 defaults to `10^distance_power`)
    pub start_smell: f64,
    /// Report progress on each new best tour
    pub verbose: bool,
    /// Seed for the random generator; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        ColonyConfig {
            time: 0.0,
            min_time: 0.0,
            timeout: 0.0,
            stop_factor: 2.0,
            min_round_trips: 10,
            max_round_trips: 0,
            min_ants: 0,
            max_ants: 0,
            ant_count: 64,
            ant_speed: 1.0,
            distance_power: 1.0,
            pheromone_power: 1.25,
            decay_power: 0.0,
            reward_power: 0.0,
            best_path_smell: 2.0,
            start_smell: 0.0,
            verbose: false,
            seed: None,
        }
    }
}

impl ColonyConfig {
    /// Initial pheromone level with the `0 -> 10^distance_power` default
    /// applied
    pub fn initial_smell(&self) -> f64 {
        if self.start_smell > 0.0 {
            self.start_smell
        } else {
            10f64.powf(self.distance_power)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ColonyConfig::default();
        assert_eq!(config.ant_count, 64);
        assert_eq!(config.min_round_trips, 10);
        assert!((config.pheromone_power - 1.25).abs() < 1e-10);
        assert!((config.stop_factor - 2.0).abs() < 1e-10);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_initial_smell_default() {
        let config = ColonyConfig { distance_power: 2.0, ..Default::default() };
        assert!((config.initial_smell() - 100.0).abs() < 1e-10);

        let explicit = ColonyConfig { start_smell: 5.0, ..Default::default() };
        assert!((explicit.initial_smell() - 5.0).abs() < 1e-10);
    }
}
