//! plant_catalog - Read-only access to the plant collection
//!
//! The chat pipeline never writes here. The UI side of the app owns
//! these records; the pipeline only needs enough of them to assemble
//! conversation context: the plant itself, its sightings, community
//! feedback, rejected identifications, and collection-wide statistics.

mod error;
mod file_catalog;
mod memory;
mod reader;
mod records;

pub use error::{CatalogError, Result};
pub use file_catalog::{CollectionDocument, FileCatalog};
pub use memory::MemoryCatalog;
pub use reader::CatalogReader;
pub use records::{
    CatalogStats, FeedbackRecord, PlantRecord, PlantSummary, RejectionRecord, SightingRecord,
};
