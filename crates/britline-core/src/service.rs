//! Catalog service records.
//!
//! A record has no durable identity of its own: it is addressed by its
//! containing path (brand, model, year, category) plus its index within the
//! category array. Titles are only a best-effort matching key during
//! duplicate cleanup. Wire field names stay camelCase to match blobs
//! persisted by earlier versions of the system.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    InStock,
    Unavailable,
    ComingSoon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    /// Lazily assigned on load for records persisted before ids existed;
    /// becomes durable with the next whole-blob write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub price: String,
    /// "Yes" or "No" in legacy data; kept as free text for tolerance.
    #[serde(default)]
    pub requirements: String,
    /// Legacy single-language description, superseded by the En/Ru pair.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ru: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceStatus>,
}

/// The fields a caller supplies when creating or replacing a record.
///
/// Updates are wholesale replacement: any field absent here is absent in the
/// stored record afterwards, even if the previous record carried a value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDraft {
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_en: Option<String>,
    #[serde(default)]
    pub description_ru: Option<String>,
    #[serde(default)]
    pub status: Option<ServiceStatus>,
}

impl ServiceDraft {
    /// Materialize the draft into a stored record with a fresh id.
    #[must_use]
    pub fn into_record(self) -> ServiceRecord {
        ServiceRecord {
            id: Some(uuid::Uuid::new_v4().to_string()),
            title: self.title,
            image: self.image,
            price: self.price,
            requirements: self.requirements,
            description: self.description,
            description_en: self.description_en,
            description_ru: self.description_ru,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&ServiceStatus::ComingSoon).unwrap();
        assert_eq!(json, "\"coming-soon\"");
    }

    #[test]
    fn record_round_trips_camel_case_fields() {
        let raw = serde_json::json!({
            "title": "Stage 1",
            "image": "/images/stage1.jpg",
            "price": "£400",
            "requirements": "No",
            "descriptionEn": "Power upgrade",
            "descriptionRu": "Увеличение мощности",
            "status": "in-stock"
        });
        let record: ServiceRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.description_en.as_deref(), Some("Power upgrade"));
        assert_eq!(record.status, Some(ServiceStatus::InStock));
        assert!(record.id.is_none());

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["descriptionRu"], "Увеличение мощности");
        assert!(back.get("description").is_none());
    }

    #[test]
    fn draft_materializes_with_fresh_id() {
        let draft: ServiceDraft = serde_json::from_value(serde_json::json!({
            "title": "Stage 1",
            "price": "£400"
        }))
        .unwrap();
        let record = draft.into_record();
        assert!(record.id.is_some());
        assert_eq!(record.title, "Stage 1");
        assert!(record.description_ru.is_none());
    }
}
