//! Stream item types.

/// One item of a streaming completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmChunk {
    /// An incremental text fragment of the answer.
    Token(String),
    /// Explicit end-of-stream marker from the provider.
    Done,
}
