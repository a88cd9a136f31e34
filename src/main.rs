//! KNN seed search CLI
//!
//! # Commands
//!
//! - `run`: classify one seeded train/test split and print accuracy plus confusion matrix
//! - `search`: sweep many seeds in parallel and report the best-scoring split
//!
//! Both take `<train_percent> <test_percent> <input_file> <vector_size>`; the test
//! percentage and vector size are accepted for compatibility and otherwise ignored.
//! Argument and runtime errors exit with code 1.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use knn_seed_search::config::{DEFAULT_K, DEFAULT_SEED_COUNT};
use knn_seed_search::dataset::load_dataset;
use knn_seed_search::{run_single, ConfusionMatrix, KnnConfig, KnnSeedEvaluator, Result, SeedSearch};

/// K-nearest-neighbors classification and parallel shuffle-seed search
#[derive(Parser)]
#[command(name = "knn_seed_search")]
#[command(version)]
#[command(about = "K-nearest-neighbors classification and parallel shuffle-seed search")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single seeded split
    Run(RunArgs),
    /// Search many seeds for the split with the highest accuracy
    Search(SearchArgs),
}

#[derive(Args)]
struct DatasetArgs {
    /// Percentage of samples used for training (0-100)
    #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
    train_percent: u8,
    /// Test percentage (unused; the test set is whatever training leaves)
    test_percent: String,
    /// Whitespace-delimited dataset, label in the first column
    input_file: PathBuf,
    /// Feature vector size (unused; inferred from the file)
    vector_size: String,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    data: DatasetArgs,
    /// Neighbors consulted per prediction
    #[arg(long, default_value_t = DEFAULT_K)]
    k: usize,
    /// Confusion matrix dimension
    #[arg(long, default_value_t = ConfusionMatrix::DEFAULT_NUM_CLASSES)]
    num_classes: usize,
    /// Shuffle seed; a random one is drawn and logged when omitted
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    data: DatasetArgs,
    /// Neighbors consulted per prediction
    #[arg(long, default_value_t = DEFAULT_K)]
    k: usize,
    /// Number of consecutive seeds to try
    #[arg(long, default_value_t = DEFAULT_SEED_COUNT)]
    seeds: u64,
    /// First seed of the sweep
    #[arg(long, default_value_t = 0)]
    seed_start: u64,
    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_logging(cli.verbose);

    let outcome = match cli.command {
        Commands::Run(args) => handle_run(args),
        Commands::Search(args) => handle_search(args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.report());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_run(args: RunArgs) -> Result<()> {
    let dataset = load_dataset(&args.data.input_file)?;
    let config = KnnConfig {
        train_percent: args.data.train_percent,
        k: args.k,
        num_classes: args.num_classes,
        ..KnnConfig::default()
    };
    config.validate()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "shuffling with seed");
    let report = run_single(&dataset, &config, seed)?;

    println!("Total samples: {}", report.total);
    println!("Training set size: {}", report.train_len);
    println!("Test set size: {}", report.test_len);
    println!("Seed: {}", report.seed);
    println!("\nClassifier accuracy: {:.2}%", report.accuracy);
    println!("\nConfusion matrix:");
    println!("{}", report.confusion);
    Ok(())
}

fn handle_search(args: SearchArgs) -> Result<()> {
    let dataset = load_dataset(&args.data.input_file)?;
    let seeds: Vec<u64> = (args.seed_start..args.seed_start.saturating_add(args.seeds)).collect();
    let config = KnnConfig {
        train_percent: args.data.train_percent,
        k: args.k,
        seeds,
        workers: args.workers,
        ..KnnConfig::default()
    };
    config.validate()?;

    let evaluator = KnnSeedEvaluator {
        dataset: &dataset,
        train_percent: config.train_percent,
        k: config.k,
        metric: config.metric,
    };
    let search = SeedSearch::new(config.workers)?;

    println!("Starting parallel search over {} seeds...", config.seeds.len());
    let outcome = search.run(&evaluator, &config.seeds, |result| {
        println!("Seed: {:3} tested, accuracy: {:.2}%", result.seed, result.accuracy);
    })?;

    println!("\n--- Final result ---");
    println!("Search finished after testing {} seeds.", outcome.results.len());
    println!("Best seed: {}", outcome.best.seed);
    println!("Best accuracy: {:.2}%", outcome.best.accuracy);
    Ok(())
}
