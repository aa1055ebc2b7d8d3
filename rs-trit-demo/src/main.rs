use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use rs_trit_core::analysis::SequenceAnalysis;
use rs_trit_core::bench::{run_benchmark, BenchmarkResult};
use rs_trit_core::model::digit::parse_digits;
use rs_trit_core::model::stats::StatsReport;
use rs_trit_core::simulation::{SimulationConfig, SimulationReport, SimulationRunner};
use rs_trit_core::{Digit, RemapStrategy, SequenceGenerator};

/// Generates digits 0, 1, 2 with no consecutive repeats and reports statistics
#[derive(Parser)]
#[command(name = "rs-trit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a few digits and print them with their statistics
    Demo {
        /// Number of digits to generate
        #[arg(short, long, default_value_t = 20)]
        count: usize,

        /// Seed for a reproducible sequence
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Measure generation throughput
    Bench {
        /// Number of generations to time
        #[arg(short, long, default_value_t = 10_000)]
        iterations: u64,

        /// Seed for a reproducible sequence
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Run one generator per seed in parallel and compare them
    Simulate {
        /// TOML configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Generations per seed (overrides the config file)
        #[arg(short, long)]
        iterations: Option<u64>,

        /// Comma-separated seeds (overrides the config file)
        #[arg(long, value_delimiter = ',')]
        seeds: Option<Vec<u64>>,

        /// Redraw repeated candidates instead of using the remap table
        #[arg(long)]
        rejection: bool,

        /// Save the report (.json or .bin)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Analyze a digit string such as 0121020
    Analyze {
        /// Digits to analyze (whitespace and commas are ignored)
        digits: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Demo { count, seed, json } => demo(count, seed, json)?,
        Commands::Bench { iterations, seed } => print_benchmark(&run_benchmark(iterations, seed)?),
        Commands::Simulate { config, iterations, seeds, rejection, output } => {
            let mut config = match config {
                Some(path) => SimulationConfig::from_file(path)?,
                None => SimulationConfig::default(),
            };
            if let Some(iterations) = iterations {
                config.set_iterations(iterations)?;
            }
            if let Some(seeds) = seeds {
                config.set_seeds(seeds)?;
            }
            if rejection {
                config.strategy = RemapStrategy::Rejection;
            }
            if output.is_some() {
                config.output = output;
            }

            let report = SimulationRunner::new(config)?.run()?;
            print_simulation(&report);
        }
        Commands::Analyze { digits } => {
            let sequence = parse_digits(&digits)?;
            print_analysis(&SequenceAnalysis::from_sequence(&sequence));
        }
    }

    Ok(())
}

fn demo(count: usize, seed: Option<u64>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut generator = match seed {
        Some(seed) => SequenceGenerator::with_seed(seed),
        None => SequenceGenerator::new(),
    };
    info!("Generating {} digits", count);

    if !json {
        println!("Numbers: 0, 1, 2");
        println!("Constraint: No consecutive identical numbers");
        println!("{}", "-".repeat(50));
    }

    let mut sequence = Vec::with_capacity(count);
    for _ in 0..count {
        let previous = generator.current();
        let number = generator.generate_number();
        sequence.push(number);
        if !json {
            println!("Generated: {} (Previous: {})", number, display_digit(previous));
        }
    }

    let stats = generator.statistics();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    print_statistics(&stats);
    let values: Vec<String> = sequence.iter().map(Digit::to_string).collect();
    println!("\nGenerated sequence: [{}]", values.join(", "));
    Ok(())
}

fn display_digit(digit: Option<Digit>) -> String {
    digit.map_or_else(|| "none".to_owned(), |d| d.to_string())
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(50));
    println!("{}", title);
    println!("{}", "=".repeat(50));
}

fn print_statistics(stats: &StatsReport) {
    banner("PERFORMANCE STATISTICS");
    println!("Total generated: {}", stats.total_generated);
    println!("Elapsed time: {:.6} seconds", stats.elapsed_time_seconds);
    println!("Generation rate: {:.2} numbers/second", stats.generation_rate);
    println!("Average time per generation: {:.3} milliseconds", stats.average_time_per_generation * 1000.0);

    println!("\nFREQUENCY ANALYSIS:");
    for entry in &stats.frequency_analysis {
        println!("  Number {}: {} times ({:.1}%)", entry.digit, entry.count, entry.percentage);
    }

    println!("\nTRANSITION ANALYSIS:");
    for (transition, count) in &stats.transition_analysis {
        println!("  {}: {} times", transition, count);
    }
    println!("\nCurrent number: {}", display_digit(stats.current_number));
}

fn print_benchmark(result: &BenchmarkResult) {
    banner("PERFORMANCE BENCHMARK");
    println!("Iterations: {}", result.iterations);
    println!("Total time: {:.6} seconds", result.total_time_seconds);
    println!("Time per iteration: {:.2} microseconds", result.time_per_iteration_seconds * 1_000_000.0);
    println!("Iterations per second: {:.0}", result.iterations_per_second);
}

fn print_analysis(analysis: &SequenceAnalysis) {
    banner("SEQUENCE ANALYSIS");
    println!("Total: {}", analysis.total_count);
    for digit in Digit::ALL {
        let i = digit.index();
        println!(
            "  Number {}: {} ({:.3})",
            digit, analysis.frequencies[i], analysis.frequency_ratios[i]
        );
    }

    println!("\nCONDITIONAL PROBABILITIES P(next | previous):");
    for previous in Digit::ALL {
        let row = analysis.conditional_probabilities[previous.index()];
        println!("  after {}: [{:.3}, {:.3}, {:.3}]", previous, row[0], row[1], row[2]);
    }

    println!("\nBIAS:");
    for row in &analysis.bias {
        println!(
            "  after {}: {:?} ({:.3}:{:.3}, ratio {:.2})",
            row.previous, row.kind, row.probabilities[0], row.probabilities[1], row.ratio
        );
    }

    println!("\nConstraint violations: {}", analysis.violations);
    println!("Chi-square (uniform): {:.3}", analysis.chi_square);
}

fn print_simulation(report: &SimulationReport) {
    banner("SIMULATION RESULTS");
    println!("Strategy: {:?}", report.strategy);
    println!("Iterations per seed: {}", report.iterations);
    println!("Total generated: {}", report.total_generated());
    println!("Total time: {:.3} seconds", report.total_time_seconds);

    println!("\nPer-seed results:");
    for result in &report.results {
        println!(
            "  Seed {}: {:.0} gen/sec, violations: {}",
            result.seed, result.statistics.generation_rate, result.analysis.violations
        );
    }

    println!("\nDistribution consistency:");
    for entry in &report.consistency {
        println!(
            "  Number {}: avg={:.1}%, range={:.1}%-{:.1}%, variance={:.3}",
            entry.digit, entry.mean, entry.min, entry.max, entry.variance
        );
    }

    print_analysis(&report.combined);
}
