//! Title and description generation for ingested documents

use crate::config::ExtractorConfig;
use crate::parser::parse_metadata;
use crate::prompt::DescribePrompt;
use crate::types::DocumentMetadata;
use credence_domain::traits::LlmProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Asks the generation service to name and describe a document
pub struct DocumentDescriber<L: LlmProvider> {
    llm: Arc<L>,
    prefix_chars: usize,
    timeout: Duration,
}

impl<L: LlmProvider> DocumentDescriber<L> {
    /// Create a describer using the extractor's prefix and timeout settings
    pub fn new(llm: Arc<L>, config: &ExtractorConfig) -> Self {
        Self {
            llm,
            prefix_chars: config.describe_prefix_chars,
            timeout: config.extraction_timeout(),
        }
    }

    /// Describe `text`, falling back to `fallback_title` on any failure
    ///
    /// Never fails: a service error, a timeout or unreadable output all yield
    /// the fallback title with an empty description.
    pub async fn describe(&self, text: &str, fallback_title: &str) -> DocumentMetadata {
        let prompt = DescribePrompt::new(text, self.prefix_chars).build();
        debug!("Describe prompt: {} chars", prompt.len());

        let response = match timeout(self.timeout, self.llm.generate(&prompt)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Describer failed, using '{}' as title: {}", fallback_title, e);
                return fallback(fallback_title);
            }
            Err(_) => {
                warn!(
                    "Describer timed out after {:?}, using '{}' as title",
                    self.timeout, fallback_title
                );
                return fallback(fallback_title);
            }
        };

        match parse_metadata(&response) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Unreadable describer output, using '{}' as title: {}", fallback_title, e);
                fallback(fallback_title)
            }
        }
    }
}

fn fallback(title: &str) -> DocumentMetadata {
    DocumentMetadata {
        title: title.to_string(),
        description: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_llm::MockProvider;

    fn describer(llm: MockProvider) -> DocumentDescriber<MockProvider> {
        DocumentDescriber::new(Arc::new(llm), &ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_describe_uses_generated_title() {
        let llm = MockProvider::new(r#"{"title": "Boiling Points", "description": "Water facts"}"#);
        let metadata = describer(llm).describe("Water boils at 100°C.", "notes").await;

        assert_eq!(metadata.title, "Boiling Points");
        assert_eq!(metadata.description, "Water facts");
    }

    #[tokio::test]
    async fn test_describe_falls_back_on_garbage() {
        let llm = MockProvider::new("I would call this document 'Notes'.");
        let metadata = describer(llm).describe("text", "notes").await;

        assert_eq!(metadata.title, "notes");
        assert!(metadata.description.is_empty());
    }

    #[tokio::test]
    async fn test_describe_falls_back_on_service_error() {
        let llm = MockProvider::default();
        llm.push_error("connection refused");
        let metadata = describer(llm).describe("text", "physics").await;

        assert_eq!(metadata.title, "physics");
    }

    #[tokio::test(start_paused = true)]
    async fn test_describe_falls_back_on_timeout() {
        let llm = MockProvider::new(r#"{"title": "Late"}"#).with_delay(Duration::from_secs(600));
        let metadata = describer(llm).describe("text", "physics").await;

        assert_eq!(metadata.title, "physics");
    }

    #[tokio::test]
    async fn test_describe_prompt_is_truncated() {
        let llm = Arc::new(MockProvider::new(r#"{"title": "T"}"#));
        let config = ExtractorConfig {
            describe_prefix_chars: 10,
            ..ExtractorConfig::default()
        };
        let describer = DocumentDescriber::new(Arc::clone(&llm), &config);

        describer.describe(&"x".repeat(50), "fallback").await;

        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains(&"x".repeat(10)));
        assert!(!prompt.contains(&"x".repeat(11)));
    }
}
