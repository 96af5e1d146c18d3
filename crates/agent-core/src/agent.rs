//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// Agents exchange plain strings: the caller renders whatever structured
/// input it has into a prompt, and interprets the returned text itself.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UppercaseAgent;

    #[async_trait]
    impl Agent for UppercaseAgent {
        async fn process(&self, input: String, _context: &mut Context) -> Result<String> {
            Ok(input.to_uppercase())
        }

        fn name(&self) -> &str {
            "uppercase"
        }
    }

    #[tokio::test]
    async fn test_agent_is_object_safe() {
        let agent: Box<dyn Agent> = Box::new(UppercaseAgent);
        let mut ctx = Context::new();

        let output = agent.process("bullish".to_string(), &mut ctx).await.unwrap();
        assert_eq!(output, "BULLISH");
        assert_eq!(agent.name(), "uppercase");
    }
}
