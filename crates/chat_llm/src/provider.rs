use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use thiserror::Error;

use crate::types::LlmChunk;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;

pub type LlmStream = Pin<Box<dyn Stream<Item = Result<LlmChunk>> + Send>>;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Open one streaming completion for the given prompt.
    ///
    /// The prompt already carries persona framing, context and the user
    /// utterance as a single payload. Sampling and output-length settings
    /// are fixed per provider instance.
    async fn complete_stream(&self, prompt: &str) -> Result<LlmStream>;
}
