//! File-backed catalog: one JSON collection document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{CatalogError, Result};
use crate::memory::summarize;
use crate::reader::CatalogReader;
use crate::records::{
    CatalogStats, FeedbackRecord, PlantRecord, PlantSummary, RejectionRecord, SightingRecord,
};

/// On-disk layout of the collection document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionDocument {
    #[serde(default)]
    pub plants: Vec<PlantRecord>,
    #[serde(default)]
    pub sightings: Vec<SightingRecord>,
    #[serde(default)]
    pub feedback: Vec<FeedbackRecord>,
    #[serde(default)]
    pub rejections: Vec<RejectionRecord>,
}

/// Reads the collection from a single JSON document on every call.
///
/// The UI side owns and rewrites that document; re-reading per call keeps
/// this process stateless, in line with the rest of the pipeline.
#[derive(Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn load(&self) -> Result<CollectionDocument> {
        if !self.path.exists() {
            return Ok(CollectionDocument::default());
        }
        let contents = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl CatalogReader for FileCatalog {
    async fn plant(&self, plant_id: &str) -> Result<PlantRecord> {
        self.load()
            .await?
            .plants
            .into_iter()
            .find(|p| p.id == plant_id)
            .ok_or_else(|| CatalogError::PlantNotFound(plant_id.to_string()))
    }

    async fn sightings(&self, plant_id: &str) -> Result<Vec<SightingRecord>> {
        let mut doc = self.load().await?;
        doc.sightings.retain(|s| s.plant_id == plant_id);
        Ok(doc.sightings)
    }

    async fn feedback(&self, plant_id: &str) -> Result<Vec<FeedbackRecord>> {
        let mut doc = self.load().await?;
        doc.feedback.retain(|f| f.plant_id == plant_id);
        Ok(doc.feedback)
    }

    async fn rejections(&self) -> Result<Vec<RejectionRecord>> {
        Ok(self.load().await?.rejections)
    }

    async fn stats(&self) -> Result<CatalogStats> {
        let doc = self.load().await?;
        Ok(CatalogStats {
            plant_count: doc.plants.len(),
            sighting_count: doc.sightings.len(),
            feedback_count: doc.feedback.len(),
            rejection_count: doc.rejections.len(),
        })
    }

    async fn plant_summaries(&self) -> Result<Vec<PlantSummary>> {
        Ok(self.load().await?.plants.iter().map(summarize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_document_is_empty_collection() {
        let dir = tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path().join("collection.json"));

        assert_eq!(catalog.stats().await.unwrap(), CatalogStats::default());
        assert!(matches!(
            catalog.plant("p1").await,
            Err(CatalogError::PlantNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_reads_collection_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("collection.json");

        let doc = CollectionDocument {
            plants: vec![PlantRecord {
                id: "p1".into(),
                name: Some("Yarrow".into()),
                ..Default::default()
            }],
            sightings: vec![
                SightingRecord {
                    id: "s1".into(),
                    plant_id: "p1".into(),
                    ..Default::default()
                },
                SightingRecord {
                    id: "s2".into(),
                    plant_id: "p2".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let catalog = FileCatalog::new(&path);
        assert_eq!(
            catalog.plant("p1").await.unwrap().name.as_deref(),
            Some("Yarrow")
        );
        assert_eq!(catalog.sightings("p1").await.unwrap().len(), 1);
        assert_eq!(catalog.stats().await.unwrap().sighting_count, 2);
    }
}
