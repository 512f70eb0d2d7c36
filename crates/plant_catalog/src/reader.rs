//! Catalog reader trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::records::{
    CatalogStats, FeedbackRecord, PlantRecord, PlantSummary, RejectionRecord, SightingRecord,
};

/// Read-only view of the plant collection.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// The plant record, or [`CatalogError::PlantNotFound`].
    ///
    /// [`CatalogError::PlantNotFound`]: crate::CatalogError::PlantNotFound
    async fn plant(&self, plant_id: &str) -> Result<PlantRecord>;

    /// All sightings of the plant, in insertion order.
    async fn sightings(&self, plant_id: &str) -> Result<Vec<SightingRecord>>;

    /// All community feedback for the plant, in insertion order.
    async fn feedback(&self, plant_id: &str) -> Result<Vec<FeedbackRecord>>;

    /// Every rejection record in the collection. Name matching against a
    /// specific plant is the caller's concern.
    async fn rejections(&self) -> Result<Vec<RejectionRecord>>;

    /// Collection-wide counts.
    async fn stats(&self) -> Result<CatalogStats>;

    /// Name and top tags of every plant in the collection, including the
    /// one currently under discussion.
    async fn plant_summaries(&self) -> Result<Vec<PlantSummary>>;
}
