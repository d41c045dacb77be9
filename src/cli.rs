//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Country;
use clap::Parser;
use std::fmt;
use std::path::PathBuf;

/// ORBIT - Financial Detective System
///
/// Unmasking global corporate truths. Generates a synthetic
/// per-jurisdiction income and tax dataset for a company and renders
/// it as one of four dashboard views.
///
/// Examples:
///   orbit --company Tesla
///   orbit --company Google --view financial-insights --seed 42
///   orbit --view global-presence --format json --output map.json
///   orbit --view ai-detective --query "Analyze Apple's tax strategy in Ireland"
///   orbit --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Company name to investigate
    ///
    /// Defaults to the config file value, or "Apple".
    #[arg(long, value_name = "NAME")]
    pub company: Option<String>,

    /// Dashboard view to render
    #[arg(long, default_value = "overview", value_name = "VIEW")]
    pub view: View,

    /// Question for the AI detective
    ///
    /// Only used by the ai-detective view. Defaults to
    /// "Analyze <company>'s tax strategy in Ireland". Pass an empty
    /// string to skip the model call.
    #[arg(long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Seed for the synthetic dataset
    ///
    /// The same seed always produces the same figures. A random seed is
    /// chosen and reported when omitted.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Countries to include (comma-separated)
    ///
    /// Example: --countries USA,Ireland,Singapore
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub countries: Option<Vec<Country>>,

    /// Output file path for the report
    ///
    /// Printed to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Ollama model used by the AI detective
    ///
    /// Default: from config or "distilgpt2".
    #[arg(short, long, env = "ORBIT_MODEL")]
    pub model: Option<String>,

    /// Ollama API endpoint URL
    ///
    /// Default: from config or http://localhost:11434.
    #[arg(long, value_name = "URL", env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Sampling temperature for the AI detective (0.0 - 2.0)
    ///
    /// Default: from config or 0.8.
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum number of tokens the AI detective may generate
    ///
    /// Default: from config or 120.
    #[arg(long, value_name = "TOKENS")]
    pub max_length: Option<u32>,

    /// Decode greedily instead of sampling
    #[arg(long)]
    pub no_sample: bool,

    /// Request timeout in seconds for the AI detective
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .orbit.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .orbit.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Dashboard page to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum View {
    /// Headline metrics for the company
    #[default]
    Overview,
    /// Income and tax comparison tables
    FinancialInsights,
    /// Operations and tax map layers
    GlobalPresence,
    /// Free-text question answered by a language model
    AiDetective,
}

impl View {
    /// Page title as shown in the navigation.
    pub fn title(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::FinancialInsights => "Financial Insights",
            View::GlobalPresence => "Global Presence",
            View::AiDetective => "AI Detective",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref company) = self.company {
            if company.trim().is_empty() {
                return Err("Company name must not be empty".to_string());
            }
        }

        if let Some(ref url) = self.ollama_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if self.max_length == Some(0) {
            return Err("Max length must be at least 1".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref countries) = self.countries {
            if countries.is_empty() {
                return Err("At least one country is required".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the config file's `general.verbose`; `--quiet`
    /// overrides it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The detective query, falling back to the stock question for `company`.
    pub fn effective_query(&self, company: &str) -> String {
        self.query
            .clone()
            .unwrap_or_else(|| format!("Analyze {}'s tax strategy in Ireland", company))
    }
}
