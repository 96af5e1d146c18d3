//! Runtime for creating agents with shared dependencies
//!
//! The AgentRuntime owns the LLM provider and the model defaults, and hands
//! out agents that share them.

use agent_core::Result;
use agent_llm::LLMProvider;
use std::sync::Arc;
use tracing::debug;

use crate::agents::{RoleAgent, RoleConfig, RoleProfile};

/// Configuration for the agent runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Default model to use
    pub default_model: String,

    /// Default max tokens per completion
    pub max_tokens: usize,

    /// Default sampling temperature
    pub temperature: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let role = RoleConfig::default();
        Self {
            default_model: role.model,
            max_tokens: role.max_tokens,
            temperature: role.temperature,
        }
    }
}

/// Runtime for creating agents with dependency injection
///
/// # Example
///
/// ```no_run
/// use agent_runtime::{AgentRuntime, RoleProfile};
///
/// # fn example(provider: std::sync::Arc<dyn agent_llm::LLMProvider>) -> agent_core::Result<()> {
/// let runtime = AgentRuntime::builder()
///     .provider(provider)
///     .default_model("llama3-8b-8192")
///     .build()?;
///
/// let classifier = runtime.create_role_agent(RoleProfile::new(
///     "Stock Classifier",
///     "Classify stocks as Bullish, Bearish, or Neutral",
///     "Expert in stock classification.",
/// ));
/// # Ok(())
/// # }
/// ```
pub struct AgentRuntime {
    provider: Arc<dyn LLMProvider>,
    config: RuntimeConfig,
}

impl AgentRuntime {
    /// Create a new agent runtime
    pub fn new(provider: Arc<dyn LLMProvider>, config: RuntimeConfig) -> Self {
        Self { provider, config }
    }

    /// Create a new runtime builder
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// Get a reference to the LLM provider
    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Get a reference to the runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Create a role agent using the runtime's model defaults
    pub fn create_role_agent(&self, profile: RoleProfile) -> RoleAgent {
        let config = RoleConfig {
            model: self.config.default_model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        debug!(role = %profile.role, model = %config.model, "creating role agent");
        RoleAgent::new(self.provider.clone(), profile, config)
    }
}

/// Builder for AgentRuntime
pub struct AgentRuntimeBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    config: RuntimeConfig,
}

impl AgentRuntimeBuilder {
    /// Create a new runtime builder
    pub fn new() -> Self {
        Self {
            provider: None,
            config: RuntimeConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default model
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = model.into();
        self
    }

    /// Set the default max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set the default temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Build the runtime
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is not set
    pub fn build(self) -> Result<AgentRuntime> {
        let provider = self.provider.ok_or_else(|| {
            agent_core::Error::InitializationFailed("Provider not set".to_string())
        })?;

        Ok(AgentRuntime::new(provider, self.config))
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::{CompletionRequest, CompletionResponse};

    struct NoopProvider;

    #[async_trait::async_trait]
    impl LLMProvider for NoopProvider {
        async fn complete(&self, _request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
            Err(agent_llm::LLMError::RequestFailed("noop".to_string()))
        }

        fn name(&self) -> &str {
            "noop"
        }
    }

    #[test]
    fn test_runtime_config_default() {
        let config = RuntimeConfig::default();
        assert_eq!(config.default_model, "llama3-8b-8192");
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn test_build_without_provider_fails() {
        let result = AgentRuntimeBuilder::new().build();
        assert!(matches!(
            result,
            Err(agent_core::Error::InitializationFailed(_))
        ));
    }

    #[test]
    fn test_role_agent_inherits_defaults() {
        let runtime = AgentRuntime::builder()
            .provider(Arc::new(NoopProvider))
            .default_model("test-model")
            .max_tokens(64)
            .temperature(0.1)
            .build()
            .unwrap();

        let agent = runtime.create_role_agent(RoleProfile::new("Analyst", "goal", "story"));

        assert_eq!(agent.config().model, "test-model");
        assert_eq!(agent.config().max_tokens, 64);
        assert_eq!(agent.profile().role, "Analyst");
        assert_eq!(runtime.provider().name(), "noop");
    }
}
