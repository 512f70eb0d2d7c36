//! chat_llm - Streaming LLM provider abstraction
//!
//! One provider call per generation cycle: a chat-style completion in
//! streaming mode, consumed as incremental text fragments terminated by
//! an explicit end-of-stream marker. Fragments that fail to decode are
//! skipped, never fatal; transport failures surface as stream errors.

mod openai;
mod provider;
mod sse;
mod types;

pub use openai::OpenAiCompatProvider;
pub use provider::{LlmError, LlmProvider, LlmStream, Result};
pub use sse::llm_stream_from_sse;
pub use types::LlmChunk;
