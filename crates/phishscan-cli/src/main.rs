//! Phishing URL detector CLI - classifies URLs with an ONNX model.
//!
//! Usage:
//!   phishscan check https://example.com http://192.168.1.1/login
//!   phishscan --model model.onnx --config model.json check https://bit.ly/abc --format json
//!   phishscan interactive
//!   phishscan batch --input urls.txt
//!   phishscan features https://example.com --aligned
//!   phishscan evaluate --data dataset_phishing.csv

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use phishscan_core::config::{load_model_config, resolve_model_path, MODEL_PATH_ENV};
use phishscan_core::dataset::{evaluate, Dataset};
use phishscan_core::report::print_results;
use phishscan_core::scan::{load_url_list, run_scan, ScanProgress};
use phishscan_core::{
    load_detector, try_extract_features, CheckResult, Detector, FeatureLayout,
    ModelConfig, OnnxClassifier, Outcome, OutputFormat,
};

#[derive(Parser)]
#[command(name = "phishscan")]
#[command(about = "Flags likely phishing URLs from their lexical features")]
struct Cli {
    /// Path to the ONNX model file [default: models/xgb_phish.onnx]
    #[arg(short, long, global = true, env = MODEL_PATH_ENV)]
    model: Option<PathBuf>,

    /// Path to the model's JSON config sidecar
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify one or more URLs
    Check {
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Prompt for URLs one at a time
    Interactive,

    /// Classify every URL in a file (one per line)
    Batch {
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the features extracted from a URL
    Features {
        url: String,

        /// Print the full classifier row instead of the extracted features
        #[arg(long)]
        aligned: bool,
    },

    /// Score the model against a labelled dataset
    Evaluate {
        #[arg(short, long)]
        data: PathBuf,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("phishscan=info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn model_config(path: Option<&Path>) -> Result<ModelConfig> {
    match path {
        Some(p) => load_model_config(p)
            .with_context(|| format!("failed to read model config {}", p.display())),
        None => Ok(ModelConfig::default()),
    }
}

fn open_detector(cli: &Cli) -> Result<Detector<OnnxClassifier>> {
    let config = model_config(cli.config.as_deref())?;
    let model_path = resolve_model_path(cli.model.clone());

    tracing::info!("Loading model from {}...", model_path.display());
    let detector = load_detector(&model_path, &config)?;
    Ok(detector)
}

fn interactive(detector: &Detector<OnnxClassifier>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "Enter Website URL: ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            return Ok(());
        }
        let input = line.trim_end_matches(['\n', '\r']);
        if matches!(input.trim(), "quit" | "exit") {
            return Ok(());
        }

        let outcome = detector.submit(input);
        let tag = match &outcome {
            Outcome::Warning(_) => "[!]",
            Outcome::Error(_) => "[ERR]",
            Outcome::Verdict(p) if p.is_phishing() => "[PHISH]",
            Outcome::Verdict(_) => "[OK]",
        };
        writeln!(stdout, "{tag} {outcome}")?;
    }
}

fn print_features(url: &str, aligned: bool, config: &ModelConfig) -> Result<()> {
    let features = try_extract_features(url).context("failed to extract features")?;

    let json = if aligned {
        let layout: FeatureLayout = config.layout()?;
        let row: serde_json::Map<String, serde_json::Value> = layout
            .names()
            .iter()
            .cloned()
            .zip(layout.align(&features).into_iter().map(serde_json::Value::from))
            .collect();
        serde_json::to_string_pretty(&row)?
    } else {
        serde_json::to_string_pretty(&features)?
    };
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Command::Features { url, aligned } => {
            let config = model_config(cli.config.as_deref())?;
            print_features(url, *aligned, &config)?;
        }

        Command::Check { urls, format } => {
            let detector = open_detector(&cli)?;
            let results: Vec<CheckResult> = urls
                .iter()
                .map(|url| CheckResult::new(url.as_str(), detector.check(url)))
                .collect();
            print_results(&results, *format)?;
        }

        Command::Interactive => {
            let detector = open_detector(&cli)?;
            interactive(&detector)?;
        }

        Command::Batch { input, format } => {
            let urls = load_url_list(input)
                .with_context(|| format!("failed to read URL list {}", input.display()))?;
            if urls.is_empty() {
                tracing::info!("No URLs to check.");
                return Ok(());
            }

            let detector = open_detector(&cli)?;
            let progress = ScanProgress::new();

            tracing::info!("Checking {} URLs...", urls.len());
            let results = run_scan(&detector, &urls, &progress);
            tracing::info!(
                "Checked {} URLs: {} phishing, {} errors",
                progress.checked_urls.load(Ordering::Relaxed),
                progress.phishing_count.load(Ordering::Relaxed),
                progress.error_count.load(Ordering::Relaxed)
            );

            print_results(&results, *format)?;
        }

        Command::Evaluate { data } => {
            let dataset = Dataset::from_path(data)
                .with_context(|| format!("failed to load dataset {}", data.display()))?;
            tracing::info!(
                "Loaded {} rows with {} feature columns",
                dataset.len(),
                dataset.feature_names().len()
            );

            let detector = open_detector(&cli)?;
            let evaluation = evaluate(&detector, &dataset)?;
            println!("{evaluation}");
        }
    }

    Ok(())
}
