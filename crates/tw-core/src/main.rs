//! TrafficWatch - Traffic Anomaly Detection Engine
//!
//! The main entry point for tw, handling:
//! - Anomaly analysis over a stored observation window
//! - Synthetic dataset generation for demos and tests
//! - Configuration validation
//!
//! stdout carries exactly one JSON (or summary) payload per invocation;
//! all logging goes to stderr.

use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tw_common::{Error, OutputFormat, Period, StructuredError};
use tw_core::analyze::{run_analysis, run_analysis_with_suggestions, AnalysisRequest};
use tw_core::config::load_config;
use tw_core::exit_codes::ExitCode;
use tw_core::logging::{init_logging, LogFormat};
use tw_core::output::AnalysisReport;
use tw_core::store::{jsonl, JsonlStore};
use tw_core::suggest::TemplateSuggester;
use tw_core::synth::{generate, SynthConfig};

/// TrafficWatch - statistical anomaly detection for traffic sensor data
#[derive(Parser)]
#[command(name = "tw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Override config file path
    #[arg(long, global = true, env = "TW_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Log format (human or jsonl)
    #[arg(long, global = true, env = "TW_LOG_FORMAT", default_value = "human")]
    log_format: LogFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run anomaly detection over a stored observation window
    Analyze(AnalyzeArgs),

    /// Generate a synthetic observation dataset
    Synth(SynthArgs),

    /// Validate configuration and report resolved parameters
    Check,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Period start (RFC 3339 or naive UTC timestamp)
    #[arg(long)]
    start: Option<String>,

    /// Period end (RFC 3339 or naive UTC timestamp)
    #[arg(long)]
    end: Option<String>,

    /// Detection methods (comma separated); default: zscore,iqr,isolation_forest
    #[arg(long, value_delimiter = ',')]
    methods: Vec<String>,

    /// Data directory holding observations.jsonl
    #[arg(long, env = "TW_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// RNG seed override for the ensemble detectors
    #[arg(long)]
    seed: Option<u64>,

    /// Generate a narrative suggestion alongside the anomaly list
    #[arg(long)]
    suggest: bool,
}

#[derive(Args, Debug)]
struct SynthArgs {
    /// Number of observations to generate
    #[arg(long, default_value_t = 288)]
    count: usize,

    /// Minutes between readings
    #[arg(long, default_value_t = 5)]
    interval: i64,

    /// Extreme readings to inject
    #[arg(long, default_value_t = 0)]
    outliers: usize,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Timestamp of the first reading (default: series ends at the current time)
    #[arg(long)]
    start: Option<String>,

    /// Data directory to write observations.jsonl into
    #[arg(long, env = "TW_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.log_format, cli.global.verbose, cli.global.quiet);

    let outcome = match &cli.command {
        Commands::Analyze(args) => cmd_analyze(&cli.global, args),
        Commands::Synth(args) => cmd_synth(&cli.global, args),
        Commands::Check => cmd_check(&cli.global),
        Commands::Version => cmd_version(&cli.global),
    };

    let code = match outcome {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(code = err.code(), "{}", err);
            eprintln!("{}", StructuredError::from(&err).to_json());
            ExitCode::from_error(&err)
        }
    };
    std::process::exit(code.code());
}

fn cmd_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> Result<ExitCode, Error> {
    let config = load_config(global.config.as_deref())?;
    let period = Period::parse(args.start.as_deref(), args.end.as_deref())?;
    let request = AnalysisRequest {
        period,
        methods: if args.methods.is_empty() {
            None
        } else {
            Some(args.methods.clone())
        },
        seed: args.seed,
    };

    let store = JsonlStore::at_dir(&args.data_dir);
    let (result, suggestions) = if args.suggest {
        run_analysis_with_suggestions(&store, &TemplateSuggester, &request, &config)?
    } else {
        (run_analysis(&store, &request, &config)?, Vec::new())
    };

    let found = result.anomalies_detected > 0;
    let report = AnalysisReport::new(result, suggestions);
    println!("{}", report.render(global.format)?);

    Ok(if found {
        ExitCode::AnomaliesFound
    } else {
        ExitCode::Clean
    })
}

fn cmd_synth(global: &GlobalOpts, args: &SynthArgs) -> Result<ExitCode, Error> {
    // Without an explicit start, end the series at roughly "now" so default
    // analyses have data.
    let start = match Period::parse(args.start.as_deref(), None)?.start {
        Some(start) => start,
        None => Utc::now() - Duration::minutes(args.interval * args.count as i64),
    };
    let observations = generate(&SynthConfig {
        count: args.count,
        interval_minutes: args.interval,
        start,
        outliers: args.outliers,
        seed: args.seed,
    });
    let path = jsonl::write_observations(&args.data_dir, &observations)?;
    tracing::info!(count = observations.len(), path = %path.display(), "dataset written");

    let payload = serde_json::json!({
        "generated": observations.len(),
        "outliers_injected": args.outliers.min(observations.len()),
        "path": path.display().to_string(),
    });
    match global.format {
        OutputFormat::Json => println!("{}", payload),
        OutputFormat::Summary => {
            println!("{} observations written to {}", observations.len(), path.display())
        }
    }
    Ok(ExitCode::Clean)
}

fn cmd_version(global: &GlobalOpts) -> Result<ExitCode, Error> {
    match global.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            })
        ),
        OutputFormat::Summary => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        }
    }
    Ok(ExitCode::Clean)
}

fn cmd_check(global: &GlobalOpts) -> Result<ExitCode, Error> {
    let config = load_config(global.config.as_deref())?;
    let payload = serde_json::json!({
        "status": "ok",
        "config": config,
    });
    match global.format {
        OutputFormat::Json => println!("{}", payload),
        OutputFormat::Summary => println!("config ok"),
    }
    Ok(ExitCode::Clean)
}
