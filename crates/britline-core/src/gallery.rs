//! Portfolio works and car-project gallery entries.
//!
//! Both stores share the same lifecycle (generated id, creation timestamp,
//! dense ordering, legacy `image` → `images` migration); works additionally
//! carry bilingual titles and descriptions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Legacy single-image field; migrated into `images` on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub title_ru: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ru: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDraft {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub title_ru: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_ru: String,
}

impl From<WorkDraft> for Work {
    fn from(draft: WorkDraft) -> Self {
        Work {
            id: String::new(),
            images: draft.images,
            image: None,
            title_en: draft.title_en,
            title_ru: draft.title_ru,
            description_en: draft.description_en,
            description_ru: draft.description_ru,
            order: 0,
            created_at: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarProject {
    pub id: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Legacy single-image field; migrated into `images` on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarProjectDraft {
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<CarProjectDraft> for CarProject {
    fn from(draft: CarProjectDraft) -> Self {
        CarProject {
            id: String::new(),
            images: draft.images,
            image: None,
            order: 0,
            created_at: String::new(),
        }
    }
}
