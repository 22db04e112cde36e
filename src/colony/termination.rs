//! Stop-condition evaluation for the epoch loop.
//!
//! The conditions form a strict precedence chain and the first match wins.
//! A fixed `time` budget, when set, overrides every other stop/continue
//! decision: other bounds become unreachable until it elapses. All numeric
//! bounds of 0 mean "unset".

use super::config::ColonyConfig;

/// Outcome of a termination check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Stop,
}

/// Prioritized stop rules, fixed for the duration of a run
#[derive(Debug, Clone)]
pub struct TerminationPolicy {
    time: f64,
    min_time: f64,
    timeout: f64,
    stop_factor: f64,
    min_round_trips: usize,
    max_round_trips: usize,
    min_ants: usize,
    max_ants: usize,
}

impl TerminationPolicy {
    /// Capture the bounds from a configuration, clamping each minimum to
    /// its maximum when both are set
    pub fn from_config(config: &ColonyConfig) -> Self {
        let mut min_round_trips = config.min_round_trips;
        if min_round_trips > 0 && config.max_round_trips > 0 {
            min_round_trips = min_round_trips.min(config.max_round_trips);
        }

        let mut min_ants = config.min_ants;
        if min_ants > 0 && config.max_ants > 0 {
            min_ants = min_ants.min(config.max_ants);
        }

        TerminationPolicy {
            time: config.time,
            min_time: config.min_time,
            timeout: config.timeout,
            stop_factor: config.stop_factor,
            min_round_trips,
            max_round_trips: config.max_round_trips,
            min_ants,
            max_ants: config.max_ants,
        }
    }

    /// Evaluate the stop conditions. Callers must only invoke this once at
    /// least one complete tour exists; before that the run always
    /// continues.
    pub fn verdict(
        &self,
        elapsed: f64,
        round_trips: usize,
        ants_used: usize,
        epoch: usize,
        last_best_epoch: usize,
    ) -> Verdict {
        // The timer family takes priority over every other constraint.
        if self.time > 0.0 || self.min_time > 0.0 || self.timeout > 0.0 {
            if self.time > 0.0 {
                return if elapsed > self.time {
                    Verdict::Stop
                } else {
                    Verdict::Continue
                };
            }
            if self.min_time > 0.0 && elapsed < self.min_time {
                return Verdict::Continue;
            }
            if self.timeout > 0.0 && elapsed > self.timeout {
                return Verdict::Stop;
            }
        }

        if self.min_round_trips > 0 && round_trips < self.min_round_trips {
            return Verdict::Continue;
        }
        if self.max_round_trips > 0 && round_trips >= self.max_round_trips {
            return Verdict::Stop;
        }

        if self.min_ants > 0 && ants_used < self.min_ants {
            return Verdict::Continue;
        }
        if self.max_ants > 0 && ants_used >= self.max_ants {
            return Verdict::Stop;
        }

        // Keep redoubling the effort until nothing better turns up.
        if self.stop_factor > 0.0 && (epoch as f64) > (last_best_epoch as f64) * self.stop_factor {
            return Verdict::Stop;
        }

        Verdict::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(config: ColonyConfig) -> TerminationPolicy {
        TerminationPolicy::from_config(&config)
    }

    fn unconstrained() -> ColonyConfig {
        ColonyConfig {
            stop_factor: 0.0,
            min_round_trips: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_time_overrides_everything() {
        let p = policy(ColonyConfig {
            time: 10.0,
            max_round_trips: 1,
            max_ants: 1,
            ..unconstrained()
        });

        // Below budget: continue even though both maxima are exceeded.
        assert_eq!(p.verdict(5.0, 100, 100, 1000, 1), Verdict::Continue);
        // Above budget: stop even though no other bound is met.
        let p = policy(ColonyConfig {
            time: 10.0,
            min_round_trips: 1000,
            ..unconstrained()
        });
        assert_eq!(p.verdict(11.0, 1, 1, 10, 1), Verdict::Stop);
    }

    #[test]
    fn test_min_time_continues() {
        let p = policy(ColonyConfig {
            min_time: 5.0,
            stop_factor: 2.0,
            ..unconstrained()
        });

        // Stagnation would stop, but the minimum runtime is unmet.
        assert_eq!(p.verdict(2.0, 50, 50, 1000, 1), Verdict::Continue);
        // Once past it, stagnation applies again.
        assert_eq!(p.verdict(6.0, 50, 50, 1000, 1), Verdict::Stop);
    }

    #[test]
    fn test_timeout_stops() {
        let p = policy(ColonyConfig {
            timeout: 10.0,
            ..unconstrained()
        });

        assert_eq!(p.verdict(5.0, 1, 1, 5, 1), Verdict::Continue);
        assert_eq!(p.verdict(11.0, 1, 1, 5, 1), Verdict::Stop);
    }

    #[test]
    fn test_round_trip_bounds() {
        let p = policy(ColonyConfig {
            min_round_trips: 5,
            max_round_trips: 20,
            ..unconstrained()
        });

        assert_eq!(p.verdict(1.0, 3, 100, 1000, 1), Verdict::Continue);
        assert_eq!(p.verdict(1.0, 20, 1, 1, 1), Verdict::Stop);
        // Between the bounds nothing else constrains this policy.
        assert_eq!(p.verdict(1.0, 10, 1, 1, 1), Verdict::Continue);
    }

    #[test]
    fn test_ant_bounds() {
        let p = policy(ColonyConfig {
            min_ants: 10,
            max_ants: 50,
            ..unconstrained()
        });

        assert_eq!(p.verdict(1.0, 100, 5, 1000, 1), Verdict::Continue);
        assert_eq!(p.verdict(1.0, 1, 50, 1, 1), Verdict::Stop);
    }

    #[test]
    fn test_stagnation_factor() {
        let p = policy(ColonyConfig {
            stop_factor: 2.0,
            ..unconstrained()
        });

        // Last improvement at epoch 10: continue through epoch 20.
        assert_eq!(p.verdict(1.0, 1, 1, 20, 10), Verdict::Continue);
        assert_eq!(p.verdict(1.0, 1, 1, 21, 10), Verdict::Stop);
    }

    #[test]
    fn test_all_unset_continues() {
        let p = policy(unconstrained());
        assert_eq!(p.verdict(1e6, 1000, 1000, 100000, 1), Verdict::Continue);
    }

    #[test]
    fn test_min_clamped_to_max() {
        let p = policy(ColonyConfig {
            min_round_trips: 100,
            max_round_trips: 10,
            ..unconstrained()
        });

        // The effective minimum is 10, so 10 trips stop the run instead of
        // continuing toward an unreachable minimum.
        assert_eq!(p.verdict(1.0, 10, 1, 1, 1), Verdict::Stop);
    }
}
