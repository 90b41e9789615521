//! LLM provider abstraction layer for lunar-agent
//!
//! This crate provides provider-agnostic abstractions for prompt-in/text-out
//! completions. It includes:
//!
//! - Message types for LLM communication
//! - Completion request/response types with sampling parameters
//! - Provider trait for LLM implementations
//! - Concrete provider implementations (behind feature flags)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "anthropic", feature = "openai"))]
pub mod providers;
