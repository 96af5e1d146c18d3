//! OpenAI-compatible chat completion provider
//!
//! Speaks the `/chat/completions` wire format, which is shared by OpenAI,
//! Groq and most local inference servers.
//! See: https://platform.openai.com/docs/api-reference/chat
//!
//! # Examples
//!
//! ## Groq with the default Llama 3 model
//!
//! ```no_run
//! use agent_llm::{CompletionRequest, Message, LLMProvider};
//! use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAIProvider::with_config(OpenAIConfig::groq("gsk-..."))?;
//!
//!     let request = CompletionRequest::builder("llama3-8b-8192")
//!         .add_message(Message::user("Classify AAPL"))
//!         .max_tokens(512)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.message.text().unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Local deployments
//!
//! ```no_run
//! use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OpenAIConfig::new("not-needed").with_api_base("http://localhost:8000/v1");
//! let provider = OpenAIProvider::with_config(config)?;
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, StopReason,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
/// Groq's OpenAI-compatible endpoint
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL of the API, without the trailing `/chat/completions`
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,

    /// Optional list of supported models
    /// If None, any model string is accepted
    pub supported_models: Option<Vec<String>>,
}

impl OpenAIConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Config pointed at Groq's OpenAI-compatible API
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new(api_key).with_api_base(GROQ_API_BASE)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set supported models list
    ///
    /// When set, the provider rejects requests for any other model.
    pub fn with_supported_models(mut self, models: Vec<String>) -> Self {
        self.supported_models = Some(models);
        self
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            supported_models: None,
        }
    }
}

/// Provider for any endpoint speaking the OpenAI chat completions protocol
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LLMError::ConfigurationError(
                "API key must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider against the default OpenAI endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn validate_model(&self, model: &str) -> Result<()> {
        match &self.config.supported_models {
            Some(supported) if !supported.iter().any(|m| m == model) => {
                Err(LLMError::InvalidRequest(format!(
                    "Model '{model}' is not in the supported models list: {supported:?}"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.validate_model(&request.model)?;

        let wire_request = ChatRequest {
            messages: build_messages(request.system.as_deref(), &request.messages),
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stop: request.stop_sequences,
        };

        debug!(messages = wire_request.messages.len(), "sending chat completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&wire_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(request.model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let body: ChatResponse = serde_json::from_str(&response.text().await?)?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

        let usage = body.usage.unwrap_or_default();
        debug!(
            finish_reason = %choice.finish_reason.as_deref().unwrap_or("unknown"),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "received chat completion"
        );

        Ok(CompletionResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            stop_reason: map_stop_reason(choice.finish_reason.as_deref()),
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

/// The system prompt travels as the first entry of the messages array
fn build_messages(system: Option<&str>, messages: &[Message]) -> Vec<ChatMessage> {
    system
        .map(|sys| ChatMessage {
            role: "system",
            content: sys.to_string(),
        })
        .into_iter()
        .chain(messages.iter().map(|msg| ChatMessage {
            role: msg.role.as_str(),
            content: msg.content.clone(),
        }))
        .collect()
}

fn map_stop_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("length") => StopReason::MaxTokens,
        Some("stop_sequence") => StopReason::StopSequence,
        _ => StopReason::EndTurn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAIProvider {
        OpenAIProvider::with_config(OpenAIConfig::new("test-key").with_api_base(server.uri()))
            .unwrap()
    }

    fn request(model: &str) -> CompletionRequest {
        CompletionRequest::builder(model)
            .system("You are Stock Classifier.")
            .add_message(Message::user("Classify the stock based on the data: AAPL"))
            .max_tokens(256)
            .build()
    }

    #[test]
    fn test_groq_config() {
        let config = OpenAIConfig::groq("gsk-test");
        assert_eq!(config.api_base, GROQ_API_BASE);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = OpenAIConfig::new("k").with_api_base("http://localhost:8000/v1/");
        assert_eq!(config.api_base, "http://localhost:8000/v1");
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = OpenAIProvider::with_config(OpenAIConfig::new(""));
        assert!(matches!(result, Err(LLMError::ConfigurationError(_))));
    }

    #[test]
    fn test_system_message_goes_first() {
        let messages = build_messages(Some("sys"), &[Message::user("hi")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "hi");
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(map_stop_reason(Some("stop")), StopReason::EndTurn);
        assert_eq!(map_stop_reason(Some("length")), StopReason::MaxTokens);
        assert_eq!(map_stop_reason(None), StopReason::EndTurn);
    }

    #[tokio::test]
    async fn test_model_validation() {
        let server = MockServer::start().await;
        let provider = OpenAIProvider::with_config(
            OpenAIConfig::new("test-key")
                .with_api_base(server.uri())
                .with_supported_models(vec!["llama3-8b-8192".to_string()]),
        )
        .unwrap();

        let result = provider.complete(request("gpt-4")).await;
        assert!(matches!(result, Err(LLMError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("test-key"))
            .and(body_partial_json(json!({
                "model": "llama3-8b-8192",
                "messages": [{"role": "system", "content": "You are Stock Classifier."}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "Bullish"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 42, "completion_tokens": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider_for(&server)
            .complete(request("llama3-8b-8192"))
            .await
            .unwrap();

        assert_eq!(response.message.text(), Some("Bullish"));
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total(), 45);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(request("llama3-8b-8192"))
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::RateLimitExceeded(ref body) if body == "slow down"));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(request("llama3-8b-8192"))
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_empty_choices_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(request("llama3-8b-8192"))
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(request("llama3-8b-8192"))
            .await
            .unwrap_err();

        assert!(matches!(err, LLMError::Decode(_)));
        assert!(err.to_string().starts_with("Malformed response body"));
    }
}
