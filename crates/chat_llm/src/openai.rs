//! OpenAI-compatible streaming completion provider.
//!
//! Many hosted providers accept the OpenAI chat-completions request and
//! stream shape, so one provider covers them all behind a base URL.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::provider::{LlmError, LlmProvider, LlmStream, Result};
use crate::sse::llm_stream_from_sse;
use crate::types::LlmChunk;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub struct OpenAiCompatProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_output_tokens: u32,
    temperature: f32,
}

impl OpenAiCompatProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: 512,
            temperature: 0.7,
        }
    }

    pub fn from_config(config: &chat_core::Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| LlmError::Auth("no API key configured".to_string()))?;

        let mut provider = Self::new(api_key);
        if let Some(base_url) = &config.api_base {
            provider.base_url = base_url.clone();
        }
        if let Some(model) = &config.model {
            provider.model = model.clone();
        }
        provider.max_output_tokens = config.max_output_tokens;
        provider.temperature = config.temperature;
        Ok(provider)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Deserialize, Default)]
struct StreamDelta {
    content: Option<String>,
}

/// Parse one SSE data payload. `None` means skip: keep-alives, role-only
/// deltas and fragments that fail to decode all fall through here.
fn parse_sse_data(data: &str) -> Option<LlmChunk> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }
    if data == "[DONE]" {
        return Some(LlmChunk::Done);
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .first()
            .and_then(|c| c.delta.content.clone())
            .filter(|content| !content.is_empty())
            .map(LlmChunk::Token),
        Err(e) => {
            debug!("skipping undecodable stream fragment: {e}");
            None
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn complete_stream(&self, prompt: &str) -> Result<LlmStream> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "stream": true,
            "max_tokens": self.max_output_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(LlmError::Api(format!("HTTP {status}: {text}")));
        }

        Ok(llm_stream_from_sse(response, parse_sse_data))
    }
}
