//! Configuration file handling.
//!
//! This module handles loading, validating and merging configuration
//! from `.orbit.toml` files.

use crate::models::Country;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".orbit.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Text model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Company shown when none is given on the command line.
    #[serde(default = "default_company")]
    pub company: String,

    /// Output file path. Empty means stdout.
    #[serde(default)]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            company: default_company(),
            output: String::new(),
            verbose: false,
        }
    }
}

fn default_company() -> String {
    "Apple".to_string()
}

/// Text-generation model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name as known to Ollama.
    #[serde(default = "default_model")]
    pub name: String,

    /// Ollama API URL.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of tokens to generate.
    #[serde(default = "default_max_length")]
    pub max_length: u32,

    /// Sample instead of decoding greedily.
    #[serde(default = "default_true")]
    pub sampling: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            ollama_url: default_ollama_url(),
            temperature: default_temperature(),
            max_length: default_max_length(),
            sampling: true,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "distilgpt2".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_length() -> u32 {
    120
}

fn default_timeout() -> u64 {
    120
}

/// Synthetic dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Countries to generate records for, in display order.
    #[serde(default = "default_countries")]
    pub countries: Vec<Country>,

    /// Fixed seed for reproducible datasets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            countries: default_countries(),
            seed: None,
        }
    }
}

fn default_countries() -> Vec<Country> {
    Country::ALL.to_vec()
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Show the illustrative headline avoidance figure on the overview.
    #[serde(default = "default_true")]
    pub include_headline_estimate: bool,

    /// Show the research disclaimer on the detective page.
    #[serde(default = "default_true")]
    pub include_disclaimer: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_headline_estimate: true,
            include_disclaimer: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.orbit.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check settings that serde alone cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.general.company.trim().is_empty() {
            bail!("general.company must not be empty");
        }

        if self.dataset.countries.is_empty() {
            bail!("dataset.countries must list at least one country");
        }

        let mut seen = HashSet::new();
        for country in &self.dataset.countries {
            if !seen.insert(country) {
                bail!("dataset.countries lists {} more than once", country);
            }
        }

        if self.model.max_length == 0 {
            bail!("model.max_length must be at least 1");
        }

        if self.model.timeout_seconds == 0 {
            bail!("model.timeout_seconds must be at least 1");
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            bail!("model.temperature must be between 0.0 and 2.0");
        }

        if !self.model.ollama_url.starts_with("http://")
            && !self.model.ollama_url.starts_with("https://")
        {
            bail!("model.ollama_url must start with 'http://' or 'https://'");
        }

        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref company) = args.company {
            self.general.company = company.clone();
        }
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(ref url) = args.ollama_url {
            self.model.ollama_url = url.clone();
        }
        if let Some(temperature) = args.temperature {
            self.model.temperature = temperature;
        }
        if let Some(max_length) = args.max_length {
            self.model.max_length = max_length;
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }
        if args.no_sample {
            self.model.sampling = false;
        }

        if let Some(ref countries) = args.countries {
            self.dataset.countries = countries.clone();
        }
        if args.seed.is_some() {
            self.dataset.seed = args.seed;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
