//! Streaming response coordination.
//!
//! Owns one generation cycle: append the placeholder assistant turn,
//! stream the answer into it patch by patch, finalize on end-of-stream,
//! fall back to the fixed apology on any provider failure. By the time
//! [`StreamingCoordinator::generate`] returns, the turn's content is
//! never the sentinel.

use std::sync::Arc;

use chat_core::{ThreadKey, Turn, FALLBACK_REPLY};
use chat_llm::{LlmChunk, LlmProvider};
use futures_util::StreamExt;
use turn_store::{TurnPatch, TurnStore};

use crate::error::Result;

/// Lifecycle of one generation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    /// Placeholder turn appended, provider not yet contacted.
    Created,
    /// Fragments are arriving and being patched into the turn.
    Streaming,
    /// End-of-stream reached, full answer persisted.
    Finalized,
    /// Provider failed; the fallback reply was persisted instead.
    Failed,
}

impl GenerationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Failed)
    }
}

pub struct StreamingCoordinator {
    store: Arc<dyn TurnStore>,
    provider: Arc<dyn LlmProvider>,
}

impl StreamingCoordinator {
    pub fn new(store: Arc<dyn TurnStore>, provider: Arc<dyn LlmProvider>) -> Self {
        Self { store, provider }
    }

    /// Run one full generation cycle and return the assistant turn id.
    ///
    /// Provider failures are recovered locally by writing the fallback
    /// reply; only store failures propagate as errors.
    pub async fn generate(
        &self,
        thread: ThreadKey,
        parent_id: &str,
        prompt: &str,
    ) -> Result<String> {
        let placeholder = Turn::assistant_placeholder(thread, parent_id);
        let turn_id = placeholder.id.clone();
        self.store.append(placeholder).await?;

        tracing::debug!(
            turn_id = %turn_id,
            parent_id = %parent_id,
            state = ?GenerationState::Created,
            "generation cycle started"
        );

        let mut accumulator = String::new();
        let state = match self.provider.complete_stream(prompt).await {
            Ok(mut stream) => {
                tracing::debug!(turn_id = %turn_id, state = ?GenerationState::Streaming, "stream opened");
                loop {
                    match stream.next().await {
                        Some(Ok(LlmChunk::Token(fragment))) => {
                            if fragment.is_empty() {
                                continue;
                            }
                            accumulator.push_str(&fragment);
                            // One patch per fragment; a concurrently
                            // cascaded-away turn makes this a no-op.
                            self.store
                                .patch(&turn_id, TurnPatch::content(&accumulator))
                                .await?;
                        }
                        Some(Ok(LlmChunk::Done)) => {
                            break self.finalize(&turn_id, &accumulator).await?;
                        }
                        None => {
                            // Exhaustion without the end-of-stream marker
                            // means the provider truncated the answer.
                            tracing::warn!(turn_id = %turn_id, "stream ended without end-of-stream marker");
                            break self.fail(&turn_id).await?;
                        }
                        Some(Err(err)) => {
                            tracing::warn!(turn_id = %turn_id, error = %err, "stream failed mid-generation");
                            break self.fail(&turn_id).await?;
                        }
                    }
                }
            }
            Err(err) => {
                tracing::warn!(turn_id = %turn_id, error = %err, "provider request failed");
                self.fail(&turn_id).await?
            }
        };

        debug_assert!(state.is_terminal());
        tracing::info!(
            turn_id = %turn_id,
            state = ?state,
            answer_chars = accumulator.len(),
            "generation cycle finished"
        );

        Ok(turn_id)
    }

    async fn finalize(&self, turn_id: &str, accumulator: &str) -> Result<GenerationState> {
        // A stream that ended without producing any text counts as a
        // failure: the poller must never be left with the sentinel.
        if accumulator.is_empty() {
            return self.fail(turn_id).await;
        }
        // Idempotent if the last streamed patch already matches.
        self.store
            .patch(turn_id, TurnPatch::content(accumulator))
            .await?;
        Ok(GenerationState::Finalized)
    }

    async fn fail(&self, turn_id: &str) -> Result<GenerationState> {
        self.store
            .patch(turn_id, TurnPatch::content(FALLBACK_REPLY))
            .await?;
        Ok(GenerationState::Failed)
    }
}
