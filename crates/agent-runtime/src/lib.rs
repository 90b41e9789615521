//! Agent runtime for dispatching actions
//!
//! This crate provides the concrete host runtime: an [`AgentRuntime`] that
//! owns the LLM provider, the agent character, an [`ActionRegistry`] and a
//! TTL cache, and implements the [`agent_core::Runtime`] capability trait
//! handed to every action.

pub mod registry;
pub mod runtime;

// Re-export key types
pub use registry::ActionRegistry;
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
