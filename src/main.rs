//! ORBIT - Financial Detective System
//!
//! A CLI dashboard that generates a synthetic per-jurisdiction income and
//! tax dataset for a company, renders it as one of four views, and can
//! put a free-text question to a local language model through Ollama.
//!
//! Exit codes:
//!   0 - Success (including an unavailable AI detective)
//!   1 - Runtime error (invalid arguments, config, missing coordinates, I/O)

mod cli;
mod config;
mod detective;
mod indicators;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat, View};
use config::{Config, CONFIG_FILE_NAME};
use detective::{DetectiveConfig, OllamaDetective, TextGenerator};
use models::{default_coordinates, Dashboard, ReportMetadata};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so `general.verbose` can raise the level
    let config = match prepare_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(args.log_level(config.general.verbose));

    info!("ORBIT v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .orbit.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the company, model, countries and seed.");
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(level: tracing::Level) {

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Generate, render and emit one view. Returns the exit code.
async fn run(args: Args, config: Config) -> Result<i32> {
    let seed = config.dataset.seed.unwrap_or_else(rand::random);
    info!("Using dataset seed {}", seed);

    let mut dashboard = build_dashboard(&config, args.view, seed)?;

    if args.view == View::AiDetective {
        let query = args.effective_query(&config.general.company);
        let client = OllamaDetective::new(DetectiveConfig::from(&config.model))?;

        let outcome = detective::consult(&client, &query, !args.quiet).await;

        dashboard.metadata.model_used = Some(client.model_name().to_string());
        dashboard.query = Some(query);
        dashboard.detective = Some(outcome);
    }

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(args.view, &dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(args.view, &dashboard),
    };

    if config.general.output.is_empty() {
        println!("{}", output);
    } else {
        let path = Path::new(&config.general.output);
        std::fs::write(path, &output)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report saved to {}", path.display());
    }

    Ok(0)
}

/// Generate the dataset for one run and derive everything the views read.
fn build_dashboard(config: &Config, view: View, seed: u64) -> Result<Dashboard> {
    let mut rng = StdRng::seed_from_u64(seed);

    let records = indicators::generate(
        &config.dataset.countries,
        &default_coordinates(),
        &mut rng,
    )?;
    let aggregates = indicators::aggregate(&records);

    let headline_estimate = config
        .report
        .include_headline_estimate
        .then(|| indicators::headline_avoidance_estimate(&mut rng));

    info!(
        "Generated {} records: income ${} B, tax paid ${} B",
        records.len(),
        aggregates.total_income,
        aggregates.total_tax_paid
    );

    Ok(Dashboard {
        metadata: ReportMetadata {
            company: config.general.company.clone(),
            view: view.title().to_string(),
            seed,
            generated_at: Utc::now(),
            model_used: None,
        },
        records,
        aggregates,
        headline_estimate,
        query: None,
        detective: None,
        include_disclaimer: config.report.include_disclaimer,
    })
}

/// Load the config file, apply CLI overrides and validate the result.
fn prepare_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Load configuration from file or use defaults.
///
/// Runs before the subscriber is installed, so problems with the default
/// file are reported on stderr directly.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!(
                "⚠️  Ignoring {}: {:#}. Using defaults.",
                CONFIG_FILE_NAME, e
            );
            Ok(Config::default())
        }
    }
}
