//! Ant colony TSP solver - command line interface.

use clap::{Parser, Subcommand};

use aco_tsp_solver::benchmark::{load_instances_from_dir, Benchmark, BenchmarkConfig};
use aco_tsp_solver::colony::{AntColonySolver, ColonyConfig};
use aco_tsp_solver::instance::TspInstance;
use aco_tsp_solver::visualization::Visualizer;

use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "aco-tsp-solver")]
#[command(version = "0.1")]
#[command(about = "An Ant Colony Optimization solver for the Traveling Salesman Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single instance
    Solve {
        /// Path to the instance file (.tsp or .json city map)
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of ants (0 defaults to the problem size)
        #[arg(long, default_value = "64")]
        ants: usize,

        /// Distance travelled per epoch (0 derives it from the median
        /// inter-node distance)
        #[arg(long, default_value = "1")]
        ant_speed: f64,

        /// Fixed time budget in seconds; overrides all other stop rules
        #[arg(long, default_value = "0")]
        time: f64,

        /// Minimum runtime in seconds
        #[arg(long, default_value = "0")]
        min_time: f64,

        /// Maximum runtime in seconds
        #[arg(short, long, default_value = "0")]
        timeout: f64,

        /// Stagnation multiplier (0 disables the stagnation stop)
        #[arg(long, default_value = "2")]
        stop_factor: f64,

        /// Minimum round trips before stopping
        #[arg(long, default_value = "10")]
        min_round_trips: usize,

        /// Maximum round trips before stopping (0 = unset)
        #[arg(long, default_value = "0")]
        max_round_trips: usize,

        /// Minimum completed tours across the swarm (0 = unset)
        #[arg(long, default_value = "0")]
        min_ants: usize,

        /// Maximum completed tours across the swarm (0 = unset)
        #[arg(long, default_value = "0")]
        max_ants: usize,

        /// Power to which distance affects edge attractiveness
        #[arg(long, default_value = "1")]
        distance_power: f64,

        /// Power to which pheromone differences are noticed
        #[arg(long, default_value = "1.25")]
        pheromone_power: f64,

        /// Relative decay of old trails via the round-trip counter
        #[arg(long, default_value = "0")]
        decay_power: f64,

        /// Relative reward based on best cost / tour cost
        #[arg(long, default_value = "0")]
        reward_power: f64,

        /// Pheromone multiplier on edges of a new best tour
        #[arg(long, default_value = "2")]
        best_path_smell: f64,

        /// Initial pheromone level (0 defaults to 10^distance_power)
        #[arg(long, default_value = "0")]
        start_smell: f64,

        /// Random seed (omit for a nondeterministic run)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render the tour and pheromone trail
        #[arg(long)]
        visualize: bool,

        /// Report progress on each new best tour
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Compare parameter profiles on an instance
    Compare {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of seeded runs per profile
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Timeout per run in seconds
        #[arg(short, long, default_value = "60")]
        time_limit: f64,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run benchmarks on a directory of instances
    Benchmark {
        /// Directory containing instance files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Number of seeded runs per profile
        #[arg(short, long, default_value = "5")]
        runs: usize,

        /// Timeout per run in seconds
        #[arg(short, long, default_value = "60")]
        time_limit: f64,

        /// Maximum instance size
        #[arg(long)]
        max_size: Option<usize>,

        /// Disable parallel execution of the runs
        #[arg(long)]
        sequential: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            instance,
            ants,
            ant_speed,
            time,
            min_time,
            timeout,
            stop_factor,
            min_round_trips,
            max_round_trips,
            min_ants,
            max_ants,
            distance_power,
            pheromone_power,
            decay_power,
            reward_power,
            best_path_smell,
            start_smell,
            seed,
            output,
            visualize,
            verbose,
        } => {
            let config = ColonyConfig {
                time,
                min_time,
                timeout,
                stop_factor,
                min_round_trips,
                max_round_trips,
                min_ants,
                max_ants,
                ant_count: ants,
                ant_speed,
                distance_power,
                pheromone_power,
                decay_power,
                reward_power,
                best_path_smell,
                start_smell,
                verbose,
                seed,
            };
            solve_instance(&instance, config, output, visualize, verbose);
        }

        Commands::Analyze { instance } => {
            analyze_instance(&instance);
        }

        Commands::Compare {
            instance,
            runs,
            time_limit,
            output,
        } => {
            compare_profiles(&instance, runs, time_limit, output);
        }

        Commands::Benchmark {
            dir,
            output,
            runs,
            time_limit,
            max_size,
            sequential,
        } => {
            run_benchmark(&dir, &output, runs, time_limit, max_size, !sequential);
        }
    }
}

fn load_instance(path: &PathBuf) -> TspInstance {
    match TspInstance::from_file(path) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("Error loading instance: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_instance(
    path: &PathBuf,
    config: ColonyConfig,
    output: Option<PathBuf>,
    visualize: bool,
    verbose: bool,
) {
    println!("Loading instance from {:?}...", path);
    let instance = load_instance(path);

    if verbose {
        println!("{}", instance.statistics());
    }

    println!("Releasing the ants...");
    let start = Instant::now();

    let mut solver = match AntColonySolver::new(instance.clone(), config) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("Error building solver: {}", e);
            std::process::exit(1);
        }
    };
    let solution = solver.solve();

    let elapsed = start.elapsed();

    println!("\n========== Results ==========");
    println!("Algorithm: {}", solution.algorithm);
    if solution.found() {
        println!("Cost: {:.2}", solution.cost);
        println!("Complete: {}", solution.complete);
    } else {
        println!("No tour completed");
    }
    println!("Time: {:.4}s", elapsed.as_secs_f64());
    if let Some(epochs) = solution.epochs {
        println!("Epochs: {}", epochs);
    }
    println!("Ants used: {}", solution.ants_used);
    println!("Round trips: {}", solution.round_trips);

    if verbose && solution.found() {
        let names: Vec<&str> = solution
            .tour
            .iter()
            .map(|&i| instance.nodes[i].name.as_str())
            .collect();
        println!("\nTour: {}", names.join(" -> "));
    }

    if let Some(out_path) = output {
        match serde_json::to_string_pretty(&solution) {
            Ok(json) => match std::fs::write(&out_path, json) {
                Ok(()) => println!("\nSolution saved to {:?}", out_path),
                Err(e) => eprintln!("Failed to write output: {}", e),
            },
            Err(e) => eprintln!("Failed to serialize solution: {}", e),
        }
    }

    if visualize {
        let viz = Visualizer::new();

        let tour_svg = viz.generate_svg(&instance, &solution);
        let png_path = path.with_extension("png");
        match viz.save_png(&tour_svg, &png_path) {
            Ok(()) => println!("Visualization saved to {:?}", png_path),
            Err(e) => {
                let svg_path = path.with_extension("svg");
                match viz.save_svg(&tour_svg, &svg_path) {
                    Ok(()) => println!(
                        "PNG conversion failed ({}). Saved SVG to {:?}",
                        e, svg_path
                    ),
                    Err(e) => eprintln!("Failed to save visualization: {}", e),
                }
            }
        }

        let trail_svg = viz.generate_pheromone_svg(&instance, solver.pheromones());
        let trail_path = path.with_extension("trail.svg");
        match viz.save_svg(&trail_svg, &trail_path) {
            Ok(()) => println!("Pheromone trail saved to {:?}", trail_path),
            Err(e) => eprintln!("Failed to save pheromone trail: {}", e),
        }
    }
}

fn analyze_instance(path: &PathBuf) {
    let instance = load_instance(path);

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    if instance.dimension() < 2 {
        println!("Too few nodes for a tour.");
        return;
    }

    // A short seeded run gives a quick cost estimate.
    let config = ColonyConfig {
        min_round_trips: 3,
        stop_factor: 1.5,
        seed: Some(0),
        ..Default::default()
    };
    match AntColonySolver::new(instance.clone(), config) {
        Ok(mut solver) => {
            let solution = solver.solve();
            if solution.found() {
                println!("Quick estimate: {:.2} ({} epochs)", solution.cost, solution.epochs.unwrap_or(0));
            } else {
                println!("Quick estimate: no tour completed");
            }
        }
        Err(e) => eprintln!("Estimation failed: {}", e),
    }
}

fn compare_profiles(path: &PathBuf, runs: usize, time_limit: f64, output: Option<PathBuf>) {
    let instance = load_instance(path);

    println!(
        "Comparing parameter profiles on {} (n={}), {} runs each...\n",
        instance.name,
        instance.dimension(),
        runs
    );

    let mut benchmark = Benchmark::new(BenchmarkConfig {
        num_runs: runs,
        time_limit,
        ..Default::default()
    });
    benchmark.run_instance(&instance);

    println!("{}", benchmark.generate_report());

    if let Some(out_path) = output {
        match benchmark.export_to_csv(&out_path) {
            Ok(()) => println!("Results exported to {:?}", out_path),
            Err(e) => eprintln!("Failed to export results: {}", e),
        }
    }
}

fn run_benchmark(
    dir: &PathBuf,
    output: &PathBuf,
    runs: usize,
    time_limit: f64,
    max_size: Option<usize>,
    parallel: bool,
) {
    println!("Loading instances from {:?}...", dir);

    let mut instances = load_instances_from_dir(dir);
    if let Some(max) = max_size {
        instances.retain(|i| i.dimension() <= max);
    }

    println!("Found {} instances", instances.len());
    if instances.is_empty() {
        eprintln!("No instances found!");
        return;
    }

    if let Err(e) = std::fs::create_dir_all(output) {
        eprintln!("Failed to create output directory: {}", e);
        return;
    }

    let config = BenchmarkConfig {
        num_runs: runs,
        time_limit,
        parallel,
        output_dir: output.to_string_lossy().to_string(),
    };
    let mut benchmark = Benchmark::new(config);

    for (i, instance) in instances.iter().enumerate() {
        println!(
            "\n[{}/{}] Processing {} (n={})...",
            i + 1,
            instances.len(),
            instance.name,
            instance.dimension()
        );
        benchmark.run_instance(instance);
    }

    let results_path = output.join("results.csv");
    match benchmark.export_to_csv(&results_path) {
        Ok(()) => println!("\nResults exported to {:?}", results_path),
        Err(e) => eprintln!("Failed to export results: {}", e),
    }

    let stats_path = output.join("statistics.csv");
    match benchmark.export_statistics_csv(&stats_path) {
        Ok(()) => println!("Statistics exported to {:?}", stats_path),
        Err(e) => eprintln!("Failed to export statistics: {}", e),
    }

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    match std::fs::write(&report_path, &report) {
        Ok(()) => println!("Report saved to {:?}", report_path),
        Err(e) => eprintln!("Failed to save report: {}", e),
    }
}
