//! In-memory turn store for tests and demo wiring.

use std::collections::HashMap;

use async_trait::async_trait;
use chat_core::Turn;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::store::{sort_by_created_at, thread_matches, TurnPatch, TurnStore};

#[derive(Default)]
pub struct MemoryTurnStore {
    turns: RwLock<HashMap<String, Turn>>,
}

impl MemoryTurnStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TurnStore for MemoryTurnStore {
    async fn append(&self, turn: Turn) -> Result<()> {
        let mut turns = self.turns.write().await;
        if turns.contains_key(&turn.id) {
            return Err(StoreError::DuplicateId(turn.id));
        }
        turns.insert(turn.id.clone(), turn);
        Ok(())
    }

    async fn patch(&self, id: &str, patch: TurnPatch) -> Result<()> {
        let mut turns = self.turns.write().await;
        if let Some(turn) = turns.get_mut(id) {
            patch.apply(turn);
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.turns.write().await.remove(id);
        Ok(())
    }

    async fn list_by_thread(
        &self,
        plant_id: &str,
        sighting_filter: Option<&str>,
    ) -> Result<Vec<Turn>> {
        let turns = self.turns.read().await;
        let mut matching: Vec<Turn> = turns
            .values()
            .filter(|t| thread_matches(t, plant_id, sighting_filter))
            .cloned()
            .collect();
        sort_by_created_at(&mut matching);
        Ok(matching)
    }
}
