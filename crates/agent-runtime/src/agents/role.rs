//! Role-playing agent (LLM only, no tools)

use agent_core::{Agent, Context, Result};
use agent_llm::{CompletionRequest, LLMProvider, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Who the agent is: a role, the goal it pursues and a backstory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl RoleProfile {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }

    /// System prompt that puts the model in character
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}

/// Model settings for a role agent
#[derive(Debug, Clone)]
pub struct RoleConfig {
    /// Model to use
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            model: "llama3-8b-8192".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// An agent that answers each input in character
///
/// Every call is a single completion: the profile becomes the system prompt
/// and the input becomes the only user message. No memory is kept between
/// calls.
///
/// # Example
///
/// ```no_run
/// use agent_runtime::{RoleAgent, RoleConfig, RoleProfile};
/// use agent_core::{Agent, Context};
///
/// # async fn example(provider: std::sync::Arc<dyn agent_llm::LLMProvider>) -> agent_core::Result<()> {
/// let profile = RoleProfile::new(
///     "Stock Classifier",
///     "Classify stocks as Bullish, Bearish, or Neutral",
///     "Expert in stock classification.",
/// );
/// let agent = RoleAgent::new(provider, profile, RoleConfig::default());
/// let mut context = Context::new();
/// let answer = agent.process("Classify AAPL".to_string(), &mut context).await?;
/// # Ok(())
/// # }
/// ```
pub struct RoleAgent {
    provider: Arc<dyn LLMProvider>,
    profile: RoleProfile,
    config: RoleConfig,
}

impl RoleAgent {
    pub fn new(provider: Arc<dyn LLMProvider>, profile: RoleProfile, config: RoleConfig) -> Self {
        Self {
            provider,
            profile,
            config,
        }
    }

    pub fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    pub fn config(&self) -> &RoleConfig {
        &self.config
    }
}

#[async_trait]
impl Agent for RoleAgent {
    #[instrument(skip_all, fields(role = %self.profile.role, task = context.task_name().unwrap_or("-")))]
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let request = CompletionRequest::builder(&self.config.model)
            .add_message(Message::user(input))
            .system(self.profile.system_prompt())
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build();

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| agent_core::Error::ProcessingFailed(e.to_string()))?;

        debug!(
            tokens = response.usage.total(),
            stop_reason = ?response.stop_reason,
            "agent answered"
        );

        response
            .message
            .text()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                agent_core::Error::ProcessingFailed(format!(
                    "{} returned an empty response",
                    self.profile.role
                ))
            })
    }

    fn name(&self) -> &str {
        &self.profile.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::{CompletionResponse, LLMError, StopReason, TokenUsage};
    use mockall::mock;

    mock! {
        Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse>;
            fn name(&self) -> &str;
        }
    }

    fn profile() -> RoleProfile {
        RoleProfile::new(
            "Stock Recommender",
            "Provide buy, sell, or hold recommendations",
            "Expert in stock recommendations.",
        )
    }

    fn reply(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    #[test]
    fn test_system_prompt() {
        assert_eq!(
            profile().system_prompt(),
            "You are Stock Recommender. Expert in stock recommendations.\n\
             Your personal goal is: Provide buy, sell, or hold recommendations"
        );
    }

    #[tokio::test]
    async fn test_process_sends_profile_and_input() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|req| {
                req.model == "llama3-8b-8192"
                    && req
                        .system
                        .as_deref()
                        .is_some_and(|s| s.starts_with("You are Stock Recommender."))
                    && req.messages.len() == 1
                    && req.messages[0].content == "Recommend AAPL"
            })
            .times(1)
            .returning(|_| Ok(reply("  Buy, strong momentum.\n")));

        let agent = RoleAgent::new(Arc::new(provider), profile(), RoleConfig::default());
        let mut ctx = Context::new();
        let answer = agent
            .process("Recommend AAPL".to_string(), &mut ctx)
            .await
            .unwrap();

        assert_eq!(answer, "Buy, strong momentum.");
        assert_eq!(agent.name(), "Stock Recommender");
    }

    #[tokio::test]
    async fn test_provider_error_becomes_processing_failure() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(LLMError::AuthenticationFailed));

        let agent = RoleAgent::new(Arc::new(provider), profile(), RoleConfig::default());
        let err = agent
            .process("Recommend AAPL".to_string(), &mut Context::new())
            .await
            .unwrap_err();

        assert!(matches!(err, agent_core::Error::ProcessingFailed(ref m) if m.contains("authentication")));
    }

    #[tokio::test]
    async fn test_empty_answer_is_an_error() {
        for answer in ["", "  \n ", "\t"] {
            let mut provider = MockProvider::new();
            provider
                .expect_complete()
                .returning(move |_| Ok(reply(answer)));

            let agent = RoleAgent::new(Arc::new(provider), profile(), RoleConfig::default());
            let err = agent
                .process("Recommend AAPL".to_string(), &mut Context::new())
                .await
                .unwrap_err();

            assert!(
                matches!(err, agent_core::Error::ProcessingFailed(ref m) if m.contains("empty response")),
                "answer {answer:?} gave {err:?}"
            );
        }
    }
}
