//! chat_core - Core types for the plant chat pipeline
//!
//! This crate provides the foundational types used across all chat-related crates:
//! - `turn` - Turn, Role, ThreadKey and the reserved content strings
//! - `config` - Runtime configuration for the LLM provider

pub mod config;
pub mod turn;

// Re-export commonly used types
pub use config::Config;
pub use turn::{Role, ThreadKey, Turn, FALLBACK_REPLY, SENTINEL};
