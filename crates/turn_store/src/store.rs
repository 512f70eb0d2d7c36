//! Turn storage trait

use async_trait::async_trait;
use chat_core::Turn;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// Partial update of a turn.
///
/// Only fields set to `Some` are written; everything else is left as
/// stored. `id`, `thread`, `role` and `created_at` are immutable by
/// construction.
#[derive(Debug, Clone, Default)]
pub struct TurnPatch {
    pub content: Option<String>,
    pub edited: Option<bool>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl TurnPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn edit(content: impl Into<String>, edited_at: DateTime<Utc>) -> Self {
        Self {
            content: Some(content.into()),
            edited: Some(true),
            edited_at: Some(edited_at),
        }
    }

    pub(crate) fn apply(&self, turn: &mut Turn) {
        if let Some(content) = &self.content {
            turn.content = content.clone();
        }
        if let Some(edited) = self.edited {
            turn.edited = edited;
        }
        if let Some(edited_at) = self.edited_at {
            turn.edited_at = Some(edited_at);
        }
    }
}

/// Durable turn storage.
#[async_trait]
pub trait TurnStore: Send + Sync {
    /// Insert a new turn. Fails with [`StoreError::DuplicateId`] if the id
    /// already exists anywhere in the store, not just in the same thread.
    ///
    /// [`StoreError::DuplicateId`]: crate::StoreError::DuplicateId
    async fn append(&self, turn: Turn) -> Result<()>;

    /// Update only the fields set in `patch`.
    ///
    /// A missing id is a silent no-op: the turn may have been deleted by a
    /// concurrent cascade, and callers must tolerate that.
    async fn patch(&self, id: &str, patch: TurnPatch) -> Result<()>;

    /// Delete the turn with that id. A missing id is a silent no-op.
    async fn remove(&self, id: &str) -> Result<()>;

    /// All turns for the plant's thread in `created_at` order.
    ///
    /// `sighting_filter` narrows to one sub-context when the thread is
    /// further partitioned per sighting.
    async fn list_by_thread(
        &self,
        plant_id: &str,
        sighting_filter: Option<&str>,
    ) -> Result<Vec<Turn>>;
}

pub(crate) fn thread_matches(turn: &Turn, plant_id: &str, sighting_filter: Option<&str>) -> bool {
    if turn.thread.plant_id != plant_id {
        return false;
    }
    match sighting_filter {
        Some(sighting_id) => turn.thread.sighting_id.as_deref() == Some(sighting_id),
        None => true,
    }
}

pub(crate) fn sort_by_created_at(turns: &mut [Turn]) {
    turns.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}
