//! Benchmarking and experimentation module for the ant colony solver.
//!
//! Runs named parameter profiles over instances with seeded repetitions,
//! collects per-run records and aggregated statistics, and exports CSV
//! files and a text report. Runs are independent, so they execute in
//! parallel; the solver itself stays single-threaded.

use crate::colony::{AntColonySolver, ColonyConfig};
use crate::instance::TspInstance;

use indicatif::{ProgressBar, ProgressStyle};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Result of a single solver run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Parameter profile name
    pub profile: String,
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Seed used for the run
    pub seed: u64,
    /// Best tour cost
    pub cost: f64,
    /// Whether any tour was completed
    pub found: bool,
    /// Computation time in seconds
    pub time: f64,
    /// Epochs the simulation ran
    pub epochs: usize,
    /// Completed tours across the swarm
    pub ants_used: usize,
    /// Maximum round trips over the individual ants
    pub round_trips: usize,
    /// Gap to best known cost in percent (if available)
    pub gap_to_best: Option<f64>,
}

/// Aggregated statistics for a parameter profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStatistics {
    /// Parameter profile name
    pub profile: String,
    /// Number of runs recorded
    pub num_runs: usize,
    /// Number of runs that completed a tour
    pub num_found: usize,
    /// Average cost
    pub avg_cost: f64,
    /// Best cost
    pub best_cost: f64,
    /// Worst cost
    pub worst_cost: f64,
    /// Sample standard deviation of cost
    pub std_cost: f64,
    /// Average time
    pub avg_time: f64,
    /// Total time
    pub total_time: f64,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of seeded runs per profile
    pub num_runs: usize,
    /// Timeout applied to every run in seconds (0 = none)
    pub time_limit: f64,
    /// Run the independent runs in parallel
    pub parallel: bool,
    /// Output directory
    pub output_dir: String,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 5,
            time_limit: 60.0,
            parallel: true,
            output_dir: "results".to_string(),
        }
    }
}

/// Named colony configurations worth comparing against each other. The
/// explorer profile rewards longer routes relative to the best, which
/// together with the best-path boost keeps the swarm from converging too
/// early.
pub fn parameter_profiles() -> Vec<(String, ColonyConfig)> {
    vec![
        ("default".to_string(), ColonyConfig::default()),
        (
            "distance-greedy".to_string(),
            ColonyConfig {
                distance_power: 2.0,
                ..Default::default()
            },
        ),
        (
            "strong-pheromone".to_string(),
            ColonyConfig {
                pheromone_power: 2.0,
                ..Default::default()
            },
        ),
        (
            "decaying-trail".to_string(),
            ColonyConfig {
                decay_power: 1.0,
                ..Default::default()
            },
        ),
        (
            "long-route-explorer".to_string(),
            ColonyConfig {
                reward_power: -3.0,
                ..Default::default()
            },
        ),
    ]
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunRecord>,
    best_known: HashMap<String, f64>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
            best_known: HashMap::new(),
        }
    }

    /// Set the best known cost for an instance (enables gap reporting)
    pub fn set_best_known(&mut self, instance_name: &str, cost: f64) {
        self.best_known.insert(instance_name.to_string(), cost);
    }

    /// Recorded runs so far
    pub fn results(&self) -> &[RunRecord] {
        &self.results
    }

    /// Run every parameter profile on an instance, `num_runs` seeds each
    pub fn run_instance(&mut self, instance: &TspInstance) {
        log::info!(
            "Benchmarking instance: {} (n={})",
            instance.name,
            instance.dimension()
        );

        let mut jobs: Vec<(String, ColonyConfig)> = Vec::new();
        for (profile, base) in parameter_profiles() {
            for run in 0..self.config.num_runs {
                let mut config = base.clone();
                config.seed = Some(run as u64);
                if self.config.time_limit > 0.0 {
                    config.timeout = self.config.time_limit;
                }
                jobs.push((profile.clone(), config));
            }
        }

        let bar = ProgressBar::new(jobs.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(instance.name.clone());

        let records: Vec<Option<RunRecord>> = if self.config.parallel {
            jobs.par_iter()
                .map(|(profile, config)| {
                    let record = run_single(instance, profile, config);
                    bar.inc(1);
                    record
                })
                .collect()
        } else {
            jobs.iter()
                .map(|(profile, config)| {
                    let record = run_single(instance, profile, config);
                    bar.inc(1);
                    record
                })
                .collect()
        };
        bar.finish_and_clear();

        for record in records.into_iter().flatten() {
            self.record(record);
        }
    }

    fn record(&mut self, mut record: RunRecord) {
        if let Some(&best) = self.best_known.get(&record.instance) {
            if record.found && best > 0.0 {
                record.gap_to_best = Some((record.cost - best) / best * 100.0);
            }
        }
        self.results.push(record);
    }

    /// Aggregate per-profile statistics over all recorded runs
    pub fn compute_statistics(&self) -> Vec<ProfileStatistics> {
        let mut by_profile: HashMap<String, Vec<&RunRecord>> = HashMap::new();
        for record in &self.results {
            by_profile
                .entry(record.profile.clone())
                .or_default()
                .push(record);
        }

        let mut statistics = Vec::new();
        for (profile, records) in by_profile {
            let found: Vec<&&RunRecord> = records.iter().filter(|r| r.found).collect();
            if found.is_empty() {
                continue;
            }

            let costs: Vec<f64> = found.iter().map(|r| r.cost).collect();
            let times: Vec<f64> = found.iter().map(|r| r.time).collect();

            let avg_cost = Statistics::mean(&costs);
            let std_cost = if costs.len() > 1 {
                Statistics::std_dev(&costs)
            } else {
                0.0
            };
            let best_cost = costs.iter().cloned().fold(f64::INFINITY, f64::min);
            let worst_cost = costs.iter().cloned().fold(0.0, f64::max);
            let avg_time = Statistics::mean(&times);
            let total_time = times.iter().sum::<f64>();

            statistics.push(ProfileStatistics {
                profile,
                num_runs: records.len(),
                num_found: found.len(),
                avg_cost,
                best_cost,
                worst_cost,
                std_cost,
                avg_time,
                total_time,
            });
        }

        statistics.sort_by_key(|s| OrderedFloat(s.avg_cost));
        statistics
    }

    /// Export per-run records to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for record in &self.results {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export profile statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate a summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("    Ant Colony Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        report.push_str("Profile performance summary:\n");
        report.push_str(&"-".repeat(86));
        report.push('\n');
        report.push_str(&format!(
            "{:<22} {:>8} {:>12} {:>12} {:>12} {:>10}\n",
            "Profile", "Found", "Avg Cost", "Best Cost", "Std Cost", "Avg Time"
        ));
        report.push_str(&"-".repeat(86));
        report.push('\n');

        for stat in self.compute_statistics() {
            report.push_str(&format!(
                "{:<22} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>10.4}\n",
                stat.profile,
                format!("{}/{}", stat.num_found, stat.num_runs),
                stat.avg_cost,
                stat.best_cost,
                stat.std_cost,
                stat.avg_time
            ));
        }

        if let Some(best) = self
            .results
            .iter()
            .filter(|r| r.found)
            .min_by_key(|r| OrderedFloat(r.cost))
        {
            report.push_str(&format!(
                "\nBest run: {} on {} (seed {}) with cost {:.2} in {:.4}s\n",
                best.profile, best.instance, best.seed, best.cost, best.time
            ));
        }

        report
    }
}

fn run_single(instance: &TspInstance, profile: &str, config: &ColonyConfig) -> Option<RunRecord> {
    let seed = config.seed.unwrap_or_default();
    match AntColonySolver::new(instance.clone(), config.clone()) {
        Ok(mut solver) => {
            let solution = solver.solve();
            Some(RunRecord {
                profile: profile.to_string(),
                instance: instance.name.clone(),
                dimension: instance.dimension(),
                seed,
                cost: solution.cost,
                found: solution.found(),
                time: solution.computation_time,
                epochs: solution.epochs.unwrap_or(0),
                ants_used: solution.ants_used,
                round_trips: solution.round_trips,
                gap_to_best: None,
            })
        }
        Err(e) => {
            log::error!("Solver construction failed on {}: {}", instance.name, e);
            None
        }
    }
}

/// Load every `.tsp` and `.json` instance in a directory
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Vec<TspInstance> {
    let mut instances = Vec::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Cannot read instance directory: {}", e);
            return instances;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let extension = path.extension().and_then(|e| e.to_str());
        if !matches!(extension, Some("tsp") | Some("json")) {
            continue;
        }
        match TspInstance::from_file(&path) {
            Ok(instance) => instances.push(instance),
            Err(e) => log::error!("Skipping {:?}: {}", path, e),
        }
    }

    instances.sort_by(|a, b| a.name.cmp(&b.name));
    instances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(profile: &str, cost: f64) -> RunRecord {
        RunRecord {
            profile: profile.to_string(),
            instance: "test".to_string(),
            dimension: 4,
            seed: 0,
            cost,
            found: true,
            time: 0.5,
            epochs: 100,
            ants_used: 50,
            round_trips: 10,
            gap_to_best: None,
        }
    }

    #[test]
    fn test_profiles_start_with_default() {
        let profiles = parameter_profiles();
        assert!(profiles.len() >= 2);
        assert_eq!(profiles[0].0, "default");
    }

    #[test]
    fn test_statistics_aggregation() {
        let mut benchmark = Benchmark::new(BenchmarkConfig::default());
        benchmark.results.push(record("default", 10.0));
        benchmark.results.push(record("default", 14.0));
        benchmark.results.push(record("distance-greedy", 8.0));

        let stats = benchmark.compute_statistics();
        assert_eq!(stats.len(), 2);
        // sorted by average cost: distance-greedy first
        assert_eq!(stats[0].profile, "distance-greedy");
        assert_eq!(stats[1].num_runs, 2);
        assert!((stats[1].avg_cost - 12.0).abs() < 1e-10);
        assert!((stats[1].best_cost - 10.0).abs() < 1e-10);
        assert!((stats[1].worst_cost - 14.0).abs() < 1e-10);
    }

    #[test]
    fn test_gap_to_best() {
        let mut benchmark = Benchmark::new(BenchmarkConfig::default());
        benchmark.set_best_known("test", 10.0);
        benchmark.record(record("default", 12.0));

        let gap = benchmark.results()[0].gap_to_best;
        assert!((gap.unwrap() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_run_instance_records_every_profile() {
        let instance = TspInstance::from_points(
            "square",
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
        );
        let mut benchmark = Benchmark::new(BenchmarkConfig {
            num_runs: 1,
            time_limit: 30.0,
            parallel: false,
            ..Default::default()
        });

        benchmark.run_instance(&instance);

        assert_eq!(benchmark.results().len(), parameter_profiles().len());
        assert!(benchmark.results().iter().all(|r| r.found));

        let report = benchmark.generate_report();
        assert!(report.contains("Benchmark Report"));
        assert!(report.contains("default"));
    }
}
