//! Single-shot consultation of the text generator.

use crate::detective::client::TextGenerator;
use crate::models::DetectiveOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

/// Ask `generator` about `query` once.
///
/// Never fails: errors become [`DetectiveOutcome::Unavailable`] and an
/// empty query becomes [`DetectiveOutcome::Skipped`] without a call.
pub async fn consult<G: TextGenerator>(
    generator: &G,
    query: &str,
    show_progress: bool,
) -> DetectiveOutcome {
    if query.trim().is_empty() {
        info!("Empty detective query, skipping model call");
        return DetectiveOutcome::Skipped;
    }

    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Analyzing corporate data...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = generator.generate(query).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(text) => {
            info!(
                "Detective model {} returned {} characters",
                generator.model_name(),
                text.len()
            );
            DetectiveOutcome::Insight(text)
        }
        Err(e) => {
            warn!("Detective model {} failed: {:#}", generator.model_name(), e);
            DetectiveOutcome::Unavailable(format!("The AI detective is unavailable: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::cell::Cell;

    struct EchoGenerator {
        calls: Cell<usize>,
    }

    impl TextGenerator for EchoGenerator {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, query: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(format!("{} ... and the money went to Dublin.", query))
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        fn model_name(&self) -> &str {
            "offline"
        }

        async fn generate(&self, _query: &str) -> Result<String> {
            Err(anyhow!("Cannot connect to Ollama at http://localhost:11434"))
        }
    }

    #[test]
    fn test_consult_returns_text_unmodified() {
        let generator = EchoGenerator {
            calls: Cell::new(0),
        };

        let outcome = tokio_test::block_on(consult(&generator, "Follow the money", false));

        assert_eq!(
            outcome,
            DetectiveOutcome::Insight("Follow the money ... and the money went to Dublin.".to_string())
        );
        assert_eq!(generator.calls.get(), 1);
    }

    #[test]
    fn test_consult_failure_is_unavailable() {
        let outcome = tokio_test::block_on(consult(&FailingGenerator, "Follow the money", false));

        match outcome {
            DetectiveOutcome::Unavailable(message) => {
                assert!(message.contains("unavailable"));
                assert!(message.contains("Cannot connect"));
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_consult_empty_query_skips_call() {
        let generator = EchoGenerator {
            calls: Cell::new(0),
        };

        let outcome = tokio_test::block_on(consult(&generator, "   ", false));

        assert_eq!(outcome, DetectiveOutcome::Skipped);
        assert_eq!(generator.calls.get(), 0);
    }
}
