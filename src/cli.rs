// src/cli.rs
use crate::config::AppConfig;
use crate::indicators::support_resistance::calculate_fibonacci;
use crate::indicators::{IndicatorCalculator, IndicatorKind};
use crate::models::Candle;
use crate::processor::{CalculationJob, Worker, WorkerConfig};
use crate::utils::utils::truncate_string;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "indicator-engine")]
#[command(about = "Technical indicator calculator", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute indicators over a JSON array of candles
    Compute {
        /// Candle file, or "-" for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Comma separated indicator names (e.g. "RSI,MACD,SAR")
        #[arg(long, value_delimiter = ',')]
        indicators: Vec<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Run a JSON array of jobs on the worker pool
    Batch {
        /// Job file, or "-" for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Worker threads (overrides configuration)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print Fibonacci retracement levels for a price range
    Fibonacci {
        #[arg(long)]
        high: f64,

        #[arg(long)]
        low: f64,
    },

    /// List supported indicators and their configured parameters
    List,
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read stdin")?;
        return Ok(raw);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_json<T: DeserializeOwned>(raw: &str, path: &Path) -> Result<T> {
    serde_json::from_str(raw).with_context(|| {
        format!(
            "Invalid JSON in {} (starts with: {})",
            path.display(),
            truncate_string(raw.trim(), 60)
        )
    })
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;

    println!("{}", output);
    Ok(())
}

pub fn execute_command(command: Commands, config: &AppConfig) -> Result<()> {
    let calculator = IndicatorCalculator::new(config.indicators.clone());

    match command {
        Commands::Compute { input, indicators, pretty } => {
            let candles: Vec<Candle> = parse_json(&read_input(&input)?, &input)?;
            info!("Loaded {} candles from {}", candles.len(), input.display());

            let report = calculator
                .process_named(&candles, &indicators)
                .context("Indicator calculation failed")?;
            print_json(&report, pretty)?;
        }

        Commands::Batch { input, threads, pretty } => {
            let jobs: Vec<CalculationJob> = parse_json(&read_input(&input)?, &input)?;

            let worker_config = WorkerConfig {
                threads: threads.unwrap_or(config.worker.threads),
            };
            if worker_config.threads == 0 {
                bail!("--threads must be at least 1");
            }

            let worker = Worker::new(calculator, worker_config).context("Failed to build worker pool")?;
            info!(
                "Loaded {} jobs from {}, running on {} threads",
                jobs.len(),
                input.display(),
                worker.config().threads
            );
            let outcomes = worker.run(&jobs);
            print_json(&outcomes, pretty)?;
        }

        Commands::Fibonacci { high, low } => {
            if !(high.is_finite() && low.is_finite()) {
                bail!("high and low must be finite numbers");
            }
            let levels = calculate_fibonacci(high, low);
            for (ratio, price) in levels.levels() {
                println!("{:>6.1}% | {:.4}", ratio * 100.0, price);
            }
        }

        Commands::List => {
            println!("{:<20} | {:<18} | {}", "Name", "Result key", "Parameters");
            println!("{:-<20}-+-{:-<18}-+-{:-<30}", "", "", "");
            for kind in IndicatorKind::ALL {
                let key = serde_json::to_value(kind)?;
                println!(
                    "{:<20} | {:<18} | {}",
                    kind.name(),
                    key.as_str().unwrap_or_default(),
                    calculator.params().describe(kind)
                );
            }
        }
    }

    Ok(())
}
