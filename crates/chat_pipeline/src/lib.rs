//! chat_pipeline - The conversation pipeline
//!
//! Ties the pieces together for every turn of a plant conversation:
//! - `context` - folds catalog records into one context block
//! - `prompt` - persona framing around context and utterance
//! - `coordinator` - streams the LLM answer into a placeholder turn
//! - `cascade` - edit/delete invalidation of causally later turns
//! - `service` - the submit/edit/delete facade the HTTP surface calls
//!
//! The pipeline is stateless per request; the turn store is the only
//! shared state. Two concurrent generations on one thread are not
//! mutually excluded and may interleave their patches.

pub mod cascade;
pub mod context;
pub mod coordinator;
mod error;
pub mod prompt;
mod service;

pub use context::ContextAssembler;
pub use coordinator::{GenerationState, StreamingCoordinator};
pub use error::{PipelineError, Result};
pub use service::ChatService;
