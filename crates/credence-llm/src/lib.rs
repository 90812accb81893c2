//! Credence LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `credence-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted provider for testing
//! - `ChatCompletionProvider`: OpenAI-compatible chat-completion endpoint
//!
//! # Examples
//!
//! ```
//! use credence_llm::MockProvider;
//! use credence_domain::traits::LlmProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod chat;

use credence_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use chat::ChatCompletionProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The service did not answer in time
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider could not be configured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// One scripted reply
#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, Scripted>,
    queue: VecDeque<Scripted>,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen in this order: an exact-prompt response, then the next
/// queued reply, then the default response. Every prompt is recorded.
///
/// # Examples
///
/// ```
/// use credence_llm::MockProvider;
/// use credence_domain::traits::LlmProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.push_error("first call fails");
/// provider.push_response("second call succeeds");
///
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert!(provider.generate("other").await.is_err());
/// assert_eq!(provider.generate("other").await.unwrap(), "second call succeeds");
/// assert_eq!(provider.call_count(), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            delay: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Sleep for `delay` before answering every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.state)
            .responses
            .insert(prompt.into(), Scripted::Reply(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&self, prompt: impl Into<String>) {
        lock(&self.state)
            .responses
            .insert(prompt.into(), Scripted::Fail("Mock error".to_string()));
    }

    /// Queue a reply for the next unmatched call
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.state)
            .queue
            .push_back(Scripted::Reply(response.into()));
    }

    /// Queue a failure for the next unmatched call
    pub fn push_error(&self, message: impl Into<String>) {
        lock(&self.state)
            .queue
            .push_back(Scripted::Fail(message.into()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.state).prompts.len()
    }

    /// Every prompt received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.state).prompts.clone()
    }

    /// The most recent prompt
    pub fn last_prompt(&self) -> Option<String> {
        lock(&self.state).prompts.last().cloned()
    }

    /// Forget recorded prompts
    pub fn reset_call_count(&self) {
        lock(&self.state).prompts.clear();
    }

    fn next_reply(&self, prompt: &str) -> Scripted {
        let mut state = lock(&self.state);
        state.prompts.push(prompt.to_string());

        if let Some(scripted) = state.responses.get(prompt) {
            return scripted.clone();
        }
        state
            .queue
            .pop_front()
            .unwrap_or_else(|| Scripted::Reply(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let reply = self.next_reply(prompt);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Scripted::Reply(text) => Ok(text),
            Scripted::Fail(message) => Err(LlmError::Other(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello").await.unwrap(), "world");
        assert_eq!(provider.generate("foo").await.unwrap(), "bar");
        assert_eq!(
            provider.generate("unknown").await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_queue_then_default() {
        let provider = MockProvider::new("fallback");
        provider.push_response("one");
        provider.push_response("two");

        assert_eq!(provider.generate("a").await.unwrap(), "one");
        assert_eq!(provider.generate("b").await.unwrap(), "two");
        assert_eq!(provider.generate("c").await.unwrap(), "fallback");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count_and_prompts() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").await.unwrap();
        provider.generate("prompt2").await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);
        assert_eq!(provider.last_prompt().as_deref(), Some("prompt2"));

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate("bad prompt").await;
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").await.unwrap();
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_provider_delay() {
        let provider = MockProvider::new("slow").with_delay(Duration::from_secs(10));
        let start = tokio::time::Instant::now();

        assert_eq!(provider.generate("x").await.unwrap(), "slow");
        assert!(start.elapsed() >= Duration::from_secs(10));
    }
}
