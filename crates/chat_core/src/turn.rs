//! Turn types - one message in a plant conversation thread.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder content of an assistant turn while its answer is still
/// being generated. Reserved: a turn whose content equals this string is
/// never a finished answer, and pollers must keep re-reading until the
/// content differs.
pub const SENTINEL: &str = "Thinking...";

/// Content written into an assistant turn when the upstream LLM call
/// fails. Pollers treat it like any other finished answer.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't think of an answer right now. Please ask me again in a moment.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Scope of one conversation thread: a plant, optionally narrowed to a
/// single sighting of that plant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ThreadKey {
    pub plant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sighting_id: Option<String>,
}

impl ThreadKey {
    pub fn plant(plant_id: impl Into<String>) -> Self {
        Self {
            plant_id: plant_id.into(),
            sighting_id: None,
        }
    }

    pub fn sighting(plant_id: impl Into<String>, sighting_id: impl Into<String>) -> Self {
        Self {
            plant_id: plant_id.into(),
            sighting_id: Some(sighting_id.into()),
        }
    }
}

/// One message in a conversation thread.
///
/// `id` is the stable external handle, distinct from whatever row key the
/// backing store uses. `created_at` is the sole ordering key within a
/// thread; insertion order is otherwise guaranteed by append semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    pub thread: ThreadKey,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// For assistant turns, the id of the user turn that triggered this
    /// answer. Establishes causal order for the cascade.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
}

impl Turn {
    pub fn user(id: impl Into<String>, thread: ThreadKey, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            thread,
            role: Role::User,
            content: content.into(),
            created_at: Utc::now(),
            parent_id: None,
            edited: false,
            edited_at: None,
        }
    }

    /// A fresh assistant turn, born as the sentinel placeholder.
    pub fn assistant_placeholder(thread: ThreadKey, parent_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            thread,
            role: Role::Assistant,
            content: SENTINEL.to_string(),
            created_at: Utc::now(),
            parent_id: Some(parent_id.into()),
            edited: false,
            edited_at: None,
        }
    }

    /// True while the answer is still being generated.
    pub fn is_pending(&self) -> bool {
        self.role == Role::Assistant && self.content == SENTINEL
    }
}
