//! File-based turn store: one JSON document per turn.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chat_core::Turn;
use tokio::fs;

use crate::error::{Result, StoreError};
use crate::store::{sort_by_created_at, thread_matches, TurnPatch, TurnStore};

/// Stores each turn as `{id}.json` under a base directory.
///
/// Listing scans the directory and filters in memory, which is adequate
/// for human-paced chat threads. Each operation touches exactly one file,
/// matching the single-document contract of the trait.
#[derive(Clone)]
pub struct FileTurnStore {
    base_path: PathBuf,
}

impl FileTurnStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn turn_path(&self, id: &str) -> PathBuf {
        // Ids are uuids or client-generated opaque strings; strip path
        // separators so a hostile id cannot escape the base directory.
        let safe: String = id
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.base_path.join(format!("{safe}.json"))
    }

    async fn read_turn(&self, path: &Path) -> Result<Turn> {
        let contents = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    async fn write_turn(&self, turn: &Turn) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        let contents = serde_json::to_string_pretty(turn)?;
        fs::write(self.turn_path(&turn.id), contents).await?;
        Ok(())
    }
}

#[async_trait]
impl TurnStore for FileTurnStore {
    async fn append(&self, turn: Turn) -> Result<()> {
        if self.turn_path(&turn.id).exists() {
            return Err(StoreError::DuplicateId(turn.id));
        }
        self.write_turn(&turn).await
    }

    async fn patch(&self, id: &str, patch: TurnPatch) -> Result<()> {
        let path = self.turn_path(id);
        // No pre-check: the turn can disappear under a concurrent
        // cascade at any point, so a missing file is discovered on the
        // read itself and tolerated.
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };
        let mut turn: Turn = serde_json::from_str(&contents)?;
        patch.apply(&mut turn);
        self.write_turn(&turn).await
    }

    async fn remove(&self, id: &str) -> Result<()> {
        match fs::remove_file(self.turn_path(id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn list_by_thread(
        &self,
        plant_id: &str,
        sighting_filter: Option<&str>,
    ) -> Result<Vec<Turn>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut matching = Vec::new();
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.read_turn(&path).await {
                Ok(turn) => {
                    if thread_matches(&turn, plant_id, sighting_filter) {
                        matching.push(turn);
                    }
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable turn document");
                }
            }
        }

        sort_by_created_at(&mut matching);
        Ok(matching)
    }
}
