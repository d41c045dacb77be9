//! Ollama client for the AI detective.
//!
//! The query is forwarded verbatim to `/api/generate`. The returned text is
//! the query followed by the model's continuation, with no other
//! post-processing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the detective client.
#[derive(Debug, Clone)]
pub struct DetectiveConfig {
    pub ollama_url: String,
    pub model_name: String,
    pub temperature: f32,
    /// Maximum number of tokens to generate.
    pub max_length: u32,
    /// Greedy decoding when false.
    pub sampling: bool,
    pub timeout_seconds: u64,
}

impl Default for DetectiveConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: "distilgpt2".to_string(),
            temperature: 0.8,
            max_length: 120,
            sampling: true,
            timeout_seconds: 120,
        }
    }
}

impl From<&crate::config::ModelConfig> for DetectiveConfig {
    fn from(config: &crate::config::ModelConfig) -> Self {
        Self {
            ollama_url: config.ollama_url.clone(),
            model_name: config.name.clone(),
            temperature: config.temperature,
            max_length: config.max_length,
            sampling: config.sampling,
            timeout_seconds: config.timeout_seconds,
        }
    }
}

/// Something that turns a free-text query into generated text.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    /// Name of the underlying model, for report metadata.
    fn model_name(&self) -> &str;

    /// Generate text for `query`: the query itself, then its continuation.
    async fn generate(&self, query: &str) -> Result<String>;
}

/// Ollama generate API request.
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama generate API response.
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[serde(default)]
    #[allow(dead_code)] // Response field, only meaningful when streaming
    done: bool,
}

/// Text generator backed by a local Ollama server.
pub struct OllamaDetective {
    config: DetectiveConfig,
    http_client: reqwest::Client,
}

impl OllamaDetective {
    /// Create a new client.
    pub fn new(config: DetectiveConfig) -> Result<Self> {
        info!(
            "Initializing detective with model {} at {}",
            config.model_name, config.ollama_url
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn build_request(&self, query: &str) -> OllamaGenerateRequest {
        OllamaGenerateRequest {
            model: self.config.model_name.clone(),
            prompt: query.to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: if self.config.sampling {
                    self.config.temperature
                } else {
                    0.0
                },
                num_predict: self.config.max_length,
            },
        }
    }
}

impl TextGenerator for OllamaDetective {
    fn model_name(&self) -> &str {
        &self.config.model_name
    }

    async fn generate(&self, query: &str) -> Result<String> {
        let url = format!(
            "{}/api/generate",
            self.config.ollama_url.trim_end_matches('/')
        );
        let request = self.build_request(query);

        debug!("Sending generate request to {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow::anyhow!("Request timed out after {}s", self.config.timeout_seconds)
                } else if e.is_connect() {
                    anyhow::anyhow!(
                        "Cannot connect to Ollama at {}. Is Ollama running?",
                        self.config.ollama_url
                    )
                } else {
                    anyhow::anyhow!("Failed to send request: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Ollama API error {}: {}", status, body));
        }

        let generated: OllamaGenerateResponse = response
            .json()
            .await
            .context("Failed to parse Ollama response")?;

        Ok(with_prompt(query, &generated.response))
    }
}

/// Ollama's `response` holds only the continuation; put the prompt back in front.
fn with_prompt(query: &str, continuation: &str) -> String {
    format!("{}{}", query, continuation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;

    #[test]
    fn test_detective_config_default() {
        let config = DetectiveConfig::default();
        assert_eq!(config.model_name, "distilgpt2");
        assert_eq!(config.max_length, 120);
        assert!(config.sampling);
    }

    #[test]
    fn test_config_from_model_config() {
        let model = ModelConfig {
            name: "llama3.2:latest".to_string(),
            sampling: false,
            ..ModelConfig::default()
        };

        let config = DetectiveConfig::from(&model);
        assert_eq!(config.model_name, "llama3.2:latest");
        assert!(!config.sampling);
    }

    #[test]
    fn test_request_passes_query_verbatim() {
        let detective = OllamaDetective::new(DetectiveConfig::default()).unwrap();
        let request = detective.build_request("Analyze Apple's tax strategy in Ireland");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "distilgpt2");
        assert_eq!(json["prompt"], "Analyze Apple's tax strategy in Ireland");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 120);
    }

    #[test]
    fn test_request_without_sampling_is_greedy() {
        let detective = OllamaDetective::new(DetectiveConfig {
            sampling: false,
            ..DetectiveConfig::default()
        })
        .unwrap();

        let request = detective.build_request("q");
        assert_eq!(request.options.temperature, 0.0);
    }

    #[test]
    fn test_parse_generate_response() {
        let body = r#"{"model":"distilgpt2","response":"Shell companies in Dublin.","done":true}"#;
        let parsed: OllamaGenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "Shell companies in Dublin.");
    }

    #[test]
    fn test_generated_text_starts_with_query() {
        let body = r#"{"response":" relies on Irish subsidiaries.","done":true}"#;
        let parsed: OllamaGenerateResponse = serde_json::from_str(body).unwrap();

        let text = with_prompt("Analyze Apple's tax strategy in Ireland", &parsed.response);
        assert_eq!(
            text,
            "Analyze Apple's tax strategy in Ireland relies on Irish subsidiaries."
        );
        assert_eq!(with_prompt("q", ""), "q");
    }

    #[test]
    fn test_generate_unreachable_server_fails() {
        let detective = OllamaDetective::new(DetectiveConfig {
            ollama_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
            ..DetectiveConfig::default()
        })
        .unwrap();

        let result = tokio_test::block_on(detective.generate("hello"));
        assert!(result.is_err());
    }
}
