//! Chat service facade - the inbound interface of the pipeline.
//!
//! Stateless per request: every submit, edit or delete builds its own
//! context, drives its own generation cycle, and shares nothing with
//! other invocations except the turn store.

use std::sync::Arc;

use chat_core::{Role, ThreadKey, Turn};
use chat_llm::LlmProvider;
use chrono::Utc;
use plant_catalog::CatalogReader;
use turn_store::{TurnPatch, TurnStore};

use crate::cascade::CascadeController;
use crate::context::ContextAssembler;
use crate::coordinator::StreamingCoordinator;
use crate::error::{PipelineError, Result};
use crate::prompt::build_prompt;

pub struct ChatService {
    store: Arc<dyn TurnStore>,
    assembler: ContextAssembler,
    coordinator: StreamingCoordinator,
    cascade: CascadeController,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn TurnStore>,
        catalog: Arc<dyn CatalogReader>,
        provider: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            store: store.clone(),
            assembler: ContextAssembler::new(catalog),
            coordinator: StreamingCoordinator::new(store.clone(), provider),
            cascade: CascadeController::new(store),
        }
    }

    /// Submit a new user utterance and generate the answer.
    ///
    /// `client_id` is the client-generated id of the new user turn.
    /// Returns the assistant turn id so the caller knows what to poll.
    pub async fn submit(
        &self,
        plant_id: &str,
        sighting_id: Option<&str>,
        text: &str,
        client_id: &str,
    ) -> Result<String> {
        let thread = match sighting_id {
            Some(sighting_id) => ThreadKey::sighting(plant_id, sighting_id),
            None => ThreadKey::plant(plant_id),
        };

        self.store
            .append(Turn::user(client_id, thread.clone(), text))
            .await?;

        self.generate_reply(thread, client_id, text).await
    }

    /// Edit a turn in place and invalidate everything after it.
    ///
    /// Returns the new assistant turn id when the edit hit a user turn
    /// and triggered a regeneration, `None` otherwise.
    pub async fn edit(
        &self,
        plant_id: &str,
        turn_id: &str,
        new_text: &str,
    ) -> Result<Option<String>> {
        let turns = self.store.list_by_thread(plant_id, None).await?;
        let target = turns
            .iter()
            .find(|t| t.id == turn_id)
            .cloned()
            .ok_or_else(|| PipelineError::TurnNotFound(turn_id.to_string()))?;

        // The edited flag is only meaningful on user turns.
        let patch = match target.role {
            Role::User => TurnPatch::edit(new_text, Utc::now()),
            Role::Assistant => TurnPatch::content(new_text),
        };
        self.store.patch(turn_id, patch).await?;
        self.cascade.prune_after(&turns, &target).await?;

        if target.role != Role::User {
            return Ok(None);
        }

        // The fresh answer gets the largest created_at in the thread,
        // restoring linear order behind the edited turn.
        let reply_id = self
            .generate_reply(target.thread.clone(), turn_id, new_text)
            .await?;
        Ok(Some(reply_id))
    }

    /// Delete a turn and everything at or after it in its thread.
    pub async fn delete(&self, plant_id: &str, turn_id: &str) -> Result<()> {
        let turns = self.store.list_by_thread(plant_id, None).await?;
        let target = turns
            .iter()
            .find(|t| t.id == turn_id)
            .cloned()
            .ok_or_else(|| PipelineError::TurnNotFound(turn_id.to_string()))?;

        self.cascade.remove_from(&turns, &target).await?;
        Ok(())
    }

    /// The poll surface: all turns of a thread in creation order.
    pub async fn thread(&self, plant_id: &str, sighting_id: Option<&str>) -> Result<Vec<Turn>> {
        Ok(self.store.list_by_thread(plant_id, sighting_id).await?)
    }

    async fn generate_reply(
        &self,
        thread: ThreadKey,
        parent_id: &str,
        utterance: &str,
    ) -> Result<String> {
        let context = self
            .assembler
            .assemble(&thread.plant_id, thread.sighting_id.as_deref())
            .await?;
        let prompt = build_prompt(&context, utterance);
        self.coordinator.generate(thread, parent_id, &prompt).await
    }
}
