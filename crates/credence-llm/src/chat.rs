//! Chat-completion provider
//!
//! Talks to any OpenAI-compatible `POST {endpoint}/v1/chat/completions` API
//! (the Hugging Face router, vLLM, llama.cpp server, ...). Each prompt is sent
//! as a single user message.
//!
//! The provider makes exactly one request per call. Retry policy belongs to
//! the caller.
//!
//! # Examples
//!
//! ```no_run
//! use credence_llm::ChatCompletionProvider;
//!
//! let provider = ChatCompletionProvider::new(
//!     "https://router.huggingface.co",
//!     "meta-llama/Meta-Llama-3-8B-Instruct",
//! )
//! .unwrap()
//! .with_api_token_from_env("HUGGINGFACEHUB_API_TOKEN");
//! ```

use crate::LlmError;
use credence_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default chat-completion endpoint
pub const DEFAULT_ENDPOINT: &str = "https://router.huggingface.co";

/// Default model
pub const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3-8B-Instruct";

/// Default timeout for generation requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// OpenAI-compatible chat-completion provider
pub struct ChatCompletionProvider {
    endpoint: String,
    model: String,
    api_token: Option<String>,
    max_tokens: u32,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionProvider {
    /// Create a provider with the default timeout
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a provider with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_token: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs,
            client,
        })
    }

    /// Set the bearer token
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Read the bearer token from an environment variable, if set
    pub fn with_api_token_from_env(mut self, var: &str) -> Self {
        self.api_token = std::env::var(var).ok().filter(|t| !t.trim().is_empty());
        self
    }

    /// Set the completion budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model name sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint)
    }

    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let mut request = self.client.post(self.url()).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        debug!("Chat completion request to {} ({} chars)", self.endpoint, prompt.len());

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::Communication(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        extract_content(parsed)
    }
}

fn extract_content(response: ChatResponse) -> Result<String, LlmError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response carried no choices".to_string()))?;

    if content.trim().is_empty() {
        return Err(LlmError::InvalidResponse("Empty completion".to_string()));
    }
    Ok(content)
}

impl LlmProviderTrait for ChatCompletionProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.complete(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = ChatCompletionProvider::new("http://localhost:8080/", "tiny").unwrap();
        assert_eq!(provider.endpoint, "http://localhost:8080");
        assert_eq!(provider.model(), "tiny");
        assert_eq!(provider.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(provider.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(provider.url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_builder_options() {
        let provider = ChatCompletionProvider::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
            .unwrap()
            .with_api_token("secret")
            .with_max_tokens(64)
            .with_temperature(0.0);
        assert_eq!(provider.api_token.as_deref(), Some("secret"));
        assert_eq!(provider.max_tokens, 64);
        assert_eq!(provider.temperature, 0.0);
    }

    #[test]
    fn test_missing_env_token() {
        let provider = ChatCompletionProvider::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
            .unwrap()
            .with_api_token_from_env("CREDENCE_TEST_TOKEN_THAT_IS_NEVER_SET");
        assert!(provider.api_token.is_none());
    }

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 500,
            temperature: 0.3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn test_extract_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Answer"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(response).unwrap(), "Answer");
    }

    #[test]
    fn test_extract_content_rejects_empty() {
        let empty: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(matches!(
            extract_content(empty),
            Err(LlmError::InvalidResponse(_))
        ));

        let none: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_content(none),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let provider = ChatCompletionProvider::with_timeout("http://127.0.0.1:1", "m", 2).unwrap();
        let result = provider.generate("test").await;
        assert!(matches!(
            result,
            Err(LlmError::Communication(_)) | Err(LlmError::Timeout(_))
        ));
    }
}
