//! Context assembly - folds catalog records into one text block.
//!
//! Fixed section order: plant attributes, sighting details, sighting
//! roll-up, community feedback, matching rejected identifications,
//! collection overview. Each optional line appears only when the field
//! is non-empty. Read-only; catalog failures propagate unchanged.

use std::sync::Arc;

use plant_catalog::{CatalogReader, PlantRecord, SightingRecord};

use crate::error::Result;

pub struct ContextAssembler {
    catalog: Arc<dyn CatalogReader>,
}

/// Bidirectional case-insensitive substring match.
///
/// Rejection records carry free-text names while plant names are
/// canonical, so the match is deliberately lenient in both directions.
/// False positives are fine: the LLM uses this context for color, not
/// ground truth.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ContextAssembler {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self { catalog }
    }

    /// Build the full context block for one thread.
    pub async fn assemble(&self, plant_id: &str, sighting_id: Option<&str>) -> Result<String> {
        let plant = self.catalog.plant(plant_id).await?;
        let sightings = self.catalog.sightings(plant_id).await?;
        let feedback = self.catalog.feedback(plant_id).await?;
        let rejections = self.catalog.rejections().await?;
        let stats = self.catalog.stats().await?;
        let summaries = self.catalog.plant_summaries().await?;

        let mut out = String::new();

        self.write_plant_section(&mut out, &plant);

        if let Some(sighting_id) = sighting_id {
            if let Some(sighting) = sightings.iter().find(|s| s.id == sighting_id) {
                self.write_sighting_section(&mut out, sighting);
            }
        }

        out.push_str("## All sightings of this plant\n");
        out.push_str(&format!("Recorded sightings: {}\n", sightings.len()));
        out.push_str(&format!(
            "With notes: {}\n",
            sightings.iter().filter(|s| s.has_notes()).count()
        ));
        out.push_str(&format!(
            "With coordinates: {}\n\n",
            sightings.iter().filter(|s| s.has_coordinates()).count()
        ));

        out.push_str("## Community feedback\n");
        if feedback.is_empty() {
            out.push_str("(none)\n");
        }
        for (i, entry) in feedback.iter().enumerate() {
            match non_empty(&entry.author) {
                Some(author) => {
                    out.push_str(&format!("{}. {}: {}\n", i + 1, author, entry.comment))
                }
                None => out.push_str(&format!("{}. {}\n", i + 1, entry.comment)),
            }
        }
        out.push('\n');

        let names = plant.all_names();
        let matching: Vec<_> = rejections
            .iter()
            .filter(|r| names.iter().any(|n| names_match(n, &r.rejected_name)))
            .collect();
        out.push_str("## Rejected identifications for this plant\n");
        if matching.is_empty() {
            out.push_str("(none)\n");
        }
        for (i, rejection) in matching.iter().enumerate() {
            match non_empty(&rejection.reason) {
                Some(reason) => out.push_str(&format!(
                    "{}. {} (rejected: {})\n",
                    i + 1,
                    rejection.rejected_name,
                    reason
                )),
                None => out.push_str(&format!("{}. {}\n", i + 1, rejection.rejected_name)),
            }
        }
        out.push('\n');

        out.push_str("## Collection overview\n");
        out.push_str(&format!(
            "Plants: {}, sightings: {}, feedback entries: {}, rejected identifications: {}\n",
            stats.plant_count, stats.sighting_count, stats.feedback_count, stats.rejection_count
        ));
        out.push_str("Other plants in this collection:\n");
        let others: Vec<_> = summaries.iter().filter(|s| s.id != plant_id).collect();
        if others.is_empty() {
            out.push_str("(none)\n");
        }
        for other in others {
            if other.top_tags.is_empty() {
                out.push_str(&format!("- {}\n", other.name));
            } else {
                out.push_str(&format!(
                    "- {} (tags: {})\n",
                    other.name,
                    other.top_tags.join(", ")
                ));
            }
        }

        Ok(out)
    }

    fn write_plant_section(&self, out: &mut String, plant: &PlantRecord) {
        out.push_str("## Plant\n");
        if let Some(name) = non_empty(&plant.name) {
            out.push_str(&format!("Name: {name}\n"));
        }
        if !plant.aka.is_empty() {
            out.push_str(&format!("Also known as: {}\n", plant.aka.join(", ")));
        }
        if !plant.tags.is_empty() {
            out.push_str(&format!("Tags: {}\n", plant.tags.join(", ")));
        }
        for (key, value) in &plant.attributes {
            out.push_str(&format!("{key}: {value}\n"));
        }
        if let Some(notes) = non_empty(&plant.usage_notes) {
            out.push_str(&format!("Usage notes: {notes}\n"));
        }
        out.push('\n');
    }

    fn write_sighting_section(&self, out: &mut String, sighting: &SightingRecord) {
        out.push_str("## This sighting\n");
        if let (Some(lat), Some(lon)) = (sighting.latitude, sighting.longitude) {
            out.push_str(&format!("Location: {lat:.4}, {lon:.4}\n"));
        }
        for (key, value) in &sighting.attributes {
            out.push_str(&format!("{key}: {value}\n"));
        }
        if let Some(notes) = non_empty(&sighting.notes) {
            out.push_str(&format!("Notes: {notes}\n"));
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plant_catalog::{
        FeedbackRecord, MemoryCatalog, PlantRecord, RejectionRecord, SightingRecord,
    };

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_plant(PlantRecord {
                id: "p1".into(),
                name: Some("Yarrow".into()),
                aka: vec!["Milfoil".into()],
                tags: vec!["medicinal".into(), "meadow".into()],
                usage_notes: Some("Dry the leaves for tea.".into()),
                ..Default::default()
            })
            .with_plant(PlantRecord {
                id: "p2".into(),
                name: Some("Stinging Nettle".into()),
                tags: vec!["edible".into()],
                ..Default::default()
            })
            .with_sighting(SightingRecord {
                id: "s1".into(),
                plant_id: "p1".into(),
                latitude: Some(52.1),
                longitude: Some(4.3),
                notes: Some("near the creek".into()),
                ..Default::default()
            })
            .with_sighting(SightingRecord {
                id: "s2".into(),
                plant_id: "p1".into(),
                ..Default::default()
            })
            .with_feedback(FeedbackRecord {
                id: "f1".into(),
                plant_id: "p1".into(),
                author: Some("mira".into()),
                comment: "Classic yarrow, nice find".into(),
            })
            .with_feedback(FeedbackRecord {
                id: "f2".into(),
                plant_id: "p1".into(),
                author: None,
                comment: "The flower heads confirm it".into(),
            })
            .with_rejection(RejectionRecord {
                id: "r1".into(),
                rejected_name: "common yarrow".into(),
                reason: Some("leaves too coarse".into()),
            })
            .with_rejection(RejectionRecord {
                id: "r2".into(),
                rejected_name: "Poison Hemlock".into(),
                ..Default::default()
            })
    }

    #[test]
    fn test_names_match_is_bidirectional_and_case_insensitive() {
        assert!(names_match("Yarrow", "common yarrow"));
        assert!(names_match("common yarrow", "Yarrow"));
        assert!(names_match("YARROW", "yarrow"));
        assert!(!names_match("Yarrow", "Hemlock"));
        assert!(!names_match("", "Yarrow"));
    }

    #[tokio::test]
    async fn test_sections_appear_in_fixed_order() {
        let assembler = ContextAssembler::new(Arc::new(catalog()));
        let block = assembler.assemble("p1", Some("s1")).await.unwrap();

        let positions: Vec<_> = [
            "## Plant",
            "## This sighting",
            "## All sightings of this plant",
            "## Community feedback",
            "## Rejected identifications for this plant",
            "## Collection overview",
        ]
        .iter()
        .map(|h| block.find(h).unwrap_or_else(|| panic!("missing {h}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_enumerations_are_exact() {
        let assembler = ContextAssembler::new(Arc::new(catalog()));
        let block = assembler.assemble("p1", None).await.unwrap();

        // 2 feedback entries, 1 matching rejection, 1 other plant
        assert!(block.contains("1. mira: Classic yarrow, nice find"));
        assert!(block.contains("2. The flower heads confirm it"));
        assert!(block.contains("1. common yarrow (rejected: leaves too coarse)"));
        assert!(!block.contains("Poison Hemlock"));
        assert!(block.contains("- Stinging Nettle (tags: edible)"));
        assert!(!block.contains("- Yarrow"));
    }

    #[tokio::test]
    async fn test_sighting_rollup_counts() {
        let assembler = ContextAssembler::new(Arc::new(catalog()));
        let block = assembler.assemble("p1", None).await.unwrap();

        assert!(block.contains("Recorded sightings: 2"));
        assert!(block.contains("With notes: 1"));
        assert!(block.contains("With coordinates: 1"));
    }

    #[tokio::test]
    async fn test_unknown_sighting_id_omits_sighting_section() {
        let assembler = ContextAssembler::new(Arc::new(catalog()));
        let block = assembler.assemble("p1", Some("missing")).await.unwrap();
        assert!(!block.contains("## This sighting"));
    }

    #[tokio::test]
    async fn test_unknown_plant_propagates_catalog_error() {
        let assembler = ContextAssembler::new(Arc::new(catalog()));
        assert!(assembler.assemble("nope", None).await.is_err());
    }
}
