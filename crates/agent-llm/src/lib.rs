//! LLM provider abstraction layer
//!
//! This crate provides provider-agnostic abstractions for chat-style
//! language model calls:
//!
//! - Message types for LLM communication
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - An OpenAI-compatible provider (OpenAI, Groq, local servers)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
