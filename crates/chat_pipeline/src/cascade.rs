//! Cascade control - invalidation of causally later turns.
//!
//! Within a thread, `created_at` order is causal order. Editing a turn
//! invalidates everything strictly after it; deleting a turn removes it
//! and everything after it. Removal happens one turn at a time in listing
//! order, there is no multi-turn transaction: a crash mid-cascade leaves
//! a partially pruned thread, which is an accepted open risk.

use std::sync::Arc;

use chat_core::Turn;
use turn_store::TurnStore;

use crate::error::Result;

pub struct CascadeController {
    store: Arc<dyn TurnStore>,
}

impl CascadeController {
    pub fn new(store: Arc<dyn TurnStore>) -> Self {
        Self { store }
    }

    /// Remove every turn of the target's thread with a strictly later
    /// `created_at` (edit semantics: the target itself survives).
    /// Returns the number of turns removed.
    pub async fn prune_after(&self, turns: &[Turn], target: &Turn) -> Result<usize> {
        self.remove_matching(turns, target, |t| t.created_at > target.created_at)
            .await
    }

    /// Remove the target and every turn of its thread at or after its
    /// `created_at` (delete semantics: inclusive).
    pub async fn remove_from(&self, turns: &[Turn], target: &Turn) -> Result<usize> {
        self.remove_matching(turns, target, |t| t.created_at >= target.created_at)
            .await
    }

    async fn remove_matching<F>(
        &self,
        turns: &[Turn],
        target: &Turn,
        should_remove: F,
    ) -> Result<usize>
    where
        F: Fn(&Turn) -> bool,
    {
        let mut removed = 0;
        for turn in turns {
            if turn.thread != target.thread || !should_remove(turn) {
                continue;
            }
            self.store.remove(&turn.id).await?;
            removed += 1;
        }
        if removed > 0 {
            tracing::debug!(
                target_id = %target.id,
                removed = removed,
                "cascade removed later turns"
            );
        }
        Ok(removed)
    }
}
