//! In-memory catalog, for tests and demo wiring.

use async_trait::async_trait;

use crate::error::{CatalogError, Result};
use crate::reader::CatalogReader;
use crate::records::{
    CatalogStats, FeedbackRecord, PlantRecord, PlantSummary, RejectionRecord, SightingRecord,
};

const TOP_TAG_LIMIT: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    plants: Vec<PlantRecord>,
    sightings: Vec<SightingRecord>,
    feedback: Vec<FeedbackRecord>,
    rejections: Vec<RejectionRecord>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plant(mut self, plant: PlantRecord) -> Self {
        self.plants.push(plant);
        self
    }

    pub fn with_sighting(mut self, sighting: SightingRecord) -> Self {
        self.sightings.push(sighting);
        self
    }

    pub fn with_feedback(mut self, feedback: FeedbackRecord) -> Self {
        self.feedback.push(feedback);
        self
    }

    pub fn with_rejection(mut self, rejection: RejectionRecord) -> Self {
        self.rejections.push(rejection);
        self
    }
}

pub(crate) fn summarize(plant: &PlantRecord) -> PlantSummary {
    PlantSummary {
        id: plant.id.clone(),
        name: plant
            .name
            .clone()
            .unwrap_or_else(|| format!("(unnamed plant {})", plant.id)),
        top_tags: plant.tags.iter().take(TOP_TAG_LIMIT).cloned().collect(),
    }
}

#[async_trait]
impl CatalogReader for MemoryCatalog {
    async fn plant(&self, plant_id: &str) -> Result<PlantRecord> {
        self.plants
            .iter()
            .find(|p| p.id == plant_id)
            .cloned()
            .ok_or_else(|| CatalogError::PlantNotFound(plant_id.to_string()))
    }

    async fn sightings(&self, plant_id: &str) -> Result<Vec<SightingRecord>> {
        Ok(self
            .sightings
            .iter()
            .filter(|s| s.plant_id == plant_id)
            .cloned()
            .collect())
    }

    async fn feedback(&self, plant_id: &str) -> Result<Vec<FeedbackRecord>> {
        Ok(self
            .feedback
            .iter()
            .filter(|f| f.plant_id == plant_id)
            .cloned()
            .collect())
    }

    async fn rejections(&self) -> Result<Vec<RejectionRecord>> {
        Ok(self.rejections.clone())
    }

    async fn stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats {
            plant_count: self.plants.len(),
            sighting_count: self.sightings.len(),
            feedback_count: self.feedback.len(),
            rejection_count: self.rejections.len(),
        })
    }

    async fn plant_summaries(&self) -> Result<Vec<PlantSummary>> {
        Ok(self.plants.iter().map(summarize).collect())
    }
}
