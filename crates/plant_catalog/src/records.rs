//! Catalog record types.
//!
//! Every descriptive field is optional: these records come from the
//! UI-side database, where most fields are free-form and frequently
//! absent. The context assembler validates presence at its boundary
//! instead of trusting the records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A previously identified plant in the user's collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantRecord {
    pub id: String,
    /// Canonical display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Alternate or regional names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aka: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Long-form usage notes (preparation, cautions, lore).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_notes: Option<String>,
    /// Optional structured fields, e.g. "family" or "season".
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl PlantRecord {
    /// Canonical name plus all alternates, in display order.
    pub fn all_names(&self) -> Vec<&str> {
        self.name
            .as_deref()
            .into_iter()
            .chain(self.aka.iter().map(String::as_str))
            .collect()
    }
}

/// One recorded sighting of a plant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SightingRecord {
    pub id: String,
    pub plant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Attributes extracted from the sighting photo (color, height, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SightingRecord {
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

/// A community feedback entry attached to a plant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub plant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub comment: String,
}

/// An identification the user rejected. The recorded name is free text
/// and is matched to plants only fuzzily.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub id: String,
    pub rejected_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Collection-wide counts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogStats {
    pub plant_count: usize,
    pub sighting_count: usize,
    pub feedback_count: usize,
    pub rejection_count: usize,
}

/// Name and leading tags of one plant, for the collection enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantSummary {
    pub id: String,
    pub name: String,
    pub top_tags: Vec<String>,
}
