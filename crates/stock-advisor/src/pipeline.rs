//! Three-agent advice pipeline: classify, recommend, research

use agent_core::{Agent, Context};
use agent_llm::LLMProvider;
use agent_runtime::{AgentRuntime, RoleProfile, RuntimeConfig};
use agent_workflow::{Crew, CrewOutput, Process, Task};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

pub const CLASSIFY_TASK: &str = "classify";
pub const RECOMMEND_TASK: &str = "recommend";
pub const RESEARCH_TASK: &str = "research";

/// What the agents are told about a stock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockContext {
    pub symbol: String,
    pub price: f64,
    /// One annotation line per news article
    #[serde(rename = "news")]
    pub articles: Vec<String>,
}

impl fmt::Display for StockContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Raw answers of the three agents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub classification: String,
    pub recommendation: String,
    pub insights: String,
}

impl PipelineOutput {
    /// Text shown to the user: the answer of the last task
    pub fn narrative(&self) -> &str {
        &self.insights
    }

    fn from_crew(output: CrewOutput) -> Result<Self, PipelineError> {
        let answer = |name: &str| {
            output
                .task(name)
                .map(str::to_string)
                .ok_or_else(|| PipelineError::Upstream(format!("task '{name}' produced no output")))
        };
        Ok(Self {
            classification: answer(CLASSIFY_TASK)?,
            recommendation: answer(RECOMMEND_TASK)?,
            insights: answer(RESEARCH_TASK)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// An agent or the language model failed; carries the underlying message
    #[error("{0}")]
    Upstream(String),
}

impl From<agent_core::Error> for PipelineError {
    fn from(err: agent_core::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}

/// Produces a narrative for one stock
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdvicePipeline: Send + Sync {
    async fn run(&self, context: &StockContext, request_id: &str)
    -> Result<PipelineOutput, PipelineError>;
}

pub fn classifier_profile() -> RoleProfile {
    RoleProfile::new(
        "stock classifier",
        "Accurately classify the stock based on its performance and market news",
        "Classify stocks as Bullish, Bearish, or Neutral based on market data and news.",
    )
}

pub fn recommender_profile() -> RoleProfile {
    RoleProfile::new(
        "stock recommender",
        "Provide a buy, sell, or hold recommendation based on stock classification.",
        "Provide a clear recommendation. If sentiment is negative, suggest 'Sell'.",
    )
}

pub fn researcher_profile() -> RoleProfile {
    RoleProfile::new(
        "stock news researcher",
        "Research and analyze stock news to provide insights.",
        "Analyze news and extract insights in 10 detailed points without sharing links.",
    )
}

pub fn classify_task(context: &StockContext, agent: Arc<dyn Agent>) -> Task {
    Task::new(
        CLASSIFY_TASK,
        format!("Classify the stock based on the data: {context}"),
        "Bullish, Bearish, or Neutral",
        agent,
    )
}

pub fn recommend_task(context: &StockContext, agent: Arc<dyn Agent>) -> Task {
    Task::new(
        RECOMMEND_TASK,
        format!("Provide a recommendation for the stock: {context}"),
        "Buy, Sell, or Hold with explanation",
        agent,
    )
}

pub fn research_task(articles: &[String], agent: Arc<dyn Agent>) -> Task {
    let articles = serde_json::to_string(articles).unwrap_or_default();
    Task::new(
        RESEARCH_TASK,
        format!("Research and analyze these news articles: {articles}"),
        "Insights from the news articles",
        agent,
    )
}

/// Sequential crew of role agents backed by one LLM provider
///
/// Agents are built fresh for every run.
pub struct CrewPipeline {
    runtime: AgentRuntime,
}

impl CrewPipeline {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> crate::Result<Self> {
        let runtime = AgentRuntime::builder()
            .provider(provider)
            .config(RuntimeConfig {
                default_model: model.into(),
                ..RuntimeConfig::default()
            })
            .build()?;
        Ok(Self { runtime })
    }

    /// Assemble the crew for one stock
    pub fn crew(&self, context: &StockContext) -> agent_core::Result<Crew> {
        let classifier: Arc<dyn Agent> =
            Arc::new(self.runtime.create_role_agent(classifier_profile()));
        let recommender: Arc<dyn Agent> =
            Arc::new(self.runtime.create_role_agent(recommender_profile()));
        let researcher: Arc<dyn Agent> =
            Arc::new(self.runtime.create_role_agent(researcher_profile()));

        Crew::builder()
            .task(classify_task(context, classifier))
            .task(recommend_task(context, recommender))
            .task(research_task(&context.articles, researcher))
            .process(Process::Sequential)
            .build()
    }
}

#[async_trait]
impl AdvicePipeline for CrewPipeline {
    #[instrument(skip(self, context), fields(symbol = %context.symbol))]
    async fn run(
        &self,
        context: &StockContext,
        request_id: &str,
    ) -> Result<PipelineOutput, PipelineError> {
        let crew = self.crew(context)?;
        let output = crew
            .kickoff(Context::new().with_request_id(request_id))
            .await?;
        info!(tasks = output.tasks_output.len(), "pipeline finished");
        PipelineOutput::from_crew(output)
    }
}
