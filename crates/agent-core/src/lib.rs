//! Core abstractions for lunar-agent
//!
//! This crate defines the traits and types shared between the host runtime
//! and the actions it dispatches: [`Action`], the [`Runtime`] capability
//! object handed to every action, [`Memory`] messages, per-call [`State`],
//! and the agent [`Character`].

pub mod action;
pub mod character;
pub mod error;
pub mod memory;
pub mod runtime;
pub mod state;

pub use action::{
    Action, ActionOutput, BufferedCallback, HandlerCallback, HandlerOptions,
};
pub use character::Character;
pub use error::{Error, Result};
pub use memory::{Content, Memory};
pub use runtime::{GenerationOptions, Runtime};
pub use state::State;
