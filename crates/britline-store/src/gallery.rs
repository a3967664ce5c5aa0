//! Shared engine for the two gallery stores (portfolio works and car
//! projects). The stores are structurally identical: a flat, densely
//! ordered array of entities with generated ids and creation timestamps,
//! persisted whole under their blob key.
//!
//! Entities persisted by old versions carry a singular `image` field; the
//! read path wraps it into `images` in memory on every load without
//! persisting the migration.

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use britline_core::gallery::{CarProject, Work};

use crate::backend::Storage;
use crate::ordered::{self, MoveDirection, Ordered};
use crate::{StoreError, CAR_PROJECTS_KEY, WORKS_KEY};

pub trait GalleryEntity: Ordered + Serialize + DeserializeOwned + Clone {
    const STORE_KEY: &'static str;
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;
    fn set_identity(&mut self, id: String, created_at: String);
    fn migrate_legacy_image(&mut self);
}

impl Ordered for Work {
    fn order(&self) -> u32 {
        self.order
    }
    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

impl GalleryEntity for Work {
    const STORE_KEY: &'static str = WORKS_KEY;
    const ID_PREFIX: &'static str = "work";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_identity(&mut self, id: String, created_at: String) {
        self.id = id;
        self.created_at = created_at;
    }

    fn migrate_legacy_image(&mut self) {
        if let Some(image) = self.image.take() {
            if self.images.is_empty() {
                self.images = vec![image];
            }
        }
    }
}

impl Ordered for CarProject {
    fn order(&self) -> u32 {
        self.order
    }
    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

impl GalleryEntity for CarProject {
    const STORE_KEY: &'static str = CAR_PROJECTS_KEY;
    const ID_PREFIX: &'static str = "car-project";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_identity(&mut self, id: String, created_at: String) {
        self.id = id;
        self.created_at = created_at;
    }

    fn migrate_legacy_image(&mut self) {
        if let Some(image) = self.image.take() {
            if self.images.is_empty() {
                self.images = vec![image];
            }
        }
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn generate_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| {
            let digit = rng.random_range(0..36u32);
            char::from_digit(digit, 36).unwrap_or('0')
        })
        .collect();
    format!("{prefix}-{millis}-{suffix}")
}

/// Load a gallery store, migrating legacy image fields in memory and
/// returning entries sorted by `order`. An absent or invalid blob yields an
/// empty list.
///
/// # Errors
///
/// Propagates storage read failures per the active storage mode.
pub async fn load<T: GalleryEntity>(storage: &Storage) -> Result<Vec<T>, StoreError> {
    let mut entries: Vec<T> = match storage.get(T::STORE_KEY).await? {
        Some(Value::Array(items)) if !items.is_empty() => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<T>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(store = T::STORE_KEY, error = %e,
                        "skipping malformed gallery entry");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    };

    for entry in &mut entries {
        entry.migrate_legacy_image();
    }
    ordered::sort_by_order(&mut entries);
    Ok(entries)
}

async fn save<T: GalleryEntity>(storage: &Storage, entries: &[T]) -> Result<(), StoreError> {
    let value = serde_json::to_value(entries)?;
    storage.set(T::STORE_KEY, &value).await
}

/// Append an entity, assigning its generated id, creation timestamp, and
/// `order = max(order) + 1`.
///
/// # Errors
///
/// Propagates storage failures.
pub async fn create<T: GalleryEntity>(storage: &Storage, mut entity: T) -> Result<T, StoreError> {
    let mut entries = load::<T>(storage).await?;
    let next_order = entries
        .iter()
        .map(Ordered::order)
        .max()
        .map_or(0, |max| max + 1);

    entity.set_identity(generate_id(T::ID_PREFIX), now_iso());
    entity.set_order(next_order);
    entries.push(entity.clone());

    save(storage, &entries).await?;
    Ok(entity)
}

/// Apply `apply` to the entity with the given id and persist.
///
/// The callback replaces whichever fields the caller supplies; id,
/// `createdAt`, and `order` stay untouched unless the caller changes them.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when no entity has the id.
pub async fn update<T: GalleryEntity>(
    storage: &Storage,
    id: &str,
    apply: impl FnOnce(&mut T),
) -> Result<T, StoreError> {
    let mut entries = load::<T>(storage).await?;
    let Some(index) = entries.iter().position(|e| e.id() == id) else {
        return Err(StoreError::NotFound(format!(
            "{} '{id}' not found",
            T::ID_PREFIX
        )));
    };

    apply(&mut entries[index]);
    save(storage, &entries).await?;
    Ok(entries[index].clone())
}

/// Remove the entity with the given id and reindex the remainder densely.
/// Deleting an unknown id is a silent no-op.
///
/// # Errors
///
/// Propagates storage failures.
pub async fn delete<T: GalleryEntity>(storage: &Storage, id: &str) -> Result<(), StoreError> {
    let mut entries = load::<T>(storage).await?;
    entries.retain(|e| e.id() != id);
    ordered::reindex(&mut entries);
    save(storage, &entries).await
}

/// Swap the entity with its neighbour in `direction`. A boundary move is a
/// no-op that skips the write.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when no entity has the id.
pub async fn move_entry<T: GalleryEntity>(
    storage: &Storage,
    id: &str,
    direction: MoveDirection,
) -> Result<(), StoreError> {
    let mut entries = load::<T>(storage).await?;
    let Some(index) = entries.iter().position(|e| e.id() == id) else {
        return Err(StoreError::NotFound(format!(
            "{} '{id}' not found",
            T::ID_PREFIX
        )));
    };

    if ordered::swap_adjacent(&mut entries, index, direction) {
        save(storage, &entries).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage() -> (Storage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (Storage::local(dir.path()), dir)
    }

    fn work(images: &[&str]) -> Work {
        Work {
            id: String::new(),
            images: images.iter().map(|s| (*s).to_string()).collect(),
            image: None,
            title_en: "Defender restoration".to_string(),
            title_ru: "Реставрация Дефендера".to_string(),
            description_en: String::new(),
            description_ru: String::new(),
            order: 0,
            created_at: String::new(),
        }
    }

    #[tokio::test]
    async fn create_assigns_identity_and_sequential_orders() {
        let (storage, _dir) = test_storage();
        let first = create(&storage, work(&["/works/1.jpg"])).await.unwrap();
        let second = create(&storage, work(&["/works/2.jpg"])).await.unwrap();

        assert!(first.id.starts_with("work-"));
        assert_ne!(first.id, second.id);
        assert!(!first.created_at.is_empty());
        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
    }

    #[tokio::test]
    async fn legacy_singular_image_is_wrapped_on_load() {
        let (storage, _dir) = test_storage();
        storage
            .set(
                WORKS_KEY,
                &serde_json::json!([{
                    "id": "work-1700000000000-abc",
                    "image": "/x.jpg",
                    "titleEn": "Old",
                    "titleRu": "Старый",
                    "order": 0,
                    "createdAt": "2023-11-14T22:13:20.000Z"
                }]),
            )
            .await
            .unwrap();

        let works: Vec<Work> = load(&storage).await.unwrap();
        assert_eq!(works[0].images, vec!["/x.jpg".to_string()]);
        assert!(works[0].image.is_none());
    }

    #[tokio::test]
    async fn entity_with_neither_image_field_gets_empty_images() {
        let (storage, _dir) = test_storage();
        storage
            .set(
                CAR_PROJECTS_KEY,
                &serde_json::json!([{
                    "id": "car-project-1700000000000-abc",
                    "order": 0,
                    "createdAt": "2023-11-14T22:13:20.000Z"
                }]),
            )
            .await
            .unwrap();

        let projects: Vec<CarProject> = load(&storage).await.unwrap();
        assert!(projects[0].images.is_empty());
    }

    #[tokio::test]
    async fn migration_is_not_persisted_by_load() {
        let (storage, _dir) = test_storage();
        let raw = serde_json::json!([{
            "id": "work-1700000000000-abc",
            "image": "/x.jpg",
            "titleEn": "Old",
            "titleRu": "Старый",
            "order": 0,
            "createdAt": "2023-11-14T22:13:20.000Z"
        }]);
        storage.set(WORKS_KEY, &raw).await.unwrap();

        let _: Vec<Work> = load(&storage).await.unwrap();

        let stored = storage.get(WORKS_KEY).await.unwrap().unwrap();
        assert_eq!(stored, raw, "plain loads must not rewrite the blob");
    }

    #[tokio::test]
    async fn update_replaces_fields_and_preserves_identity() {
        let (storage, _dir) = test_storage();
        let created = create(&storage, work(&["/works/1.jpg"])).await.unwrap();

        let updated: Work = update(&storage, &created.id, |w: &mut Work| {
            w.title_en = "Updated".to_string();
        })
        .await
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.order, created.order);
        assert_eq!(updated.title_en, "Updated");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let (storage, _dir) = test_storage();
        let err = update::<Work>(&storage, "work-missing", |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_reindexes_and_is_silent_for_unknown_ids() {
        let (storage, _dir) = test_storage();
        let a = create(&storage, work(&["/a.jpg"])).await.unwrap();
        let b = create(&storage, work(&["/b.jpg"])).await.unwrap();
        let c = create(&storage, work(&["/c.jpg"])).await.unwrap();

        delete::<Work>(&storage, &b.id).await.unwrap();
        delete::<Work>(&storage, "work-never-existed").await.unwrap();

        let works: Vec<Work> = load(&storage).await.unwrap();
        assert_eq!(works.len(), 2);
        assert_eq!(works[0].id, a.id);
        assert_eq!(works[1].id, c.id);
        assert_eq!(works.iter().map(|w| w.order).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[tokio::test]
    async fn move_down_swaps_and_boundary_is_noop() {
        let (storage, _dir) = test_storage();
        let a = create(&storage, work(&["/a.jpg"])).await.unwrap();
        let b = create(&storage, work(&["/b.jpg"])).await.unwrap();

        move_entry::<Work>(&storage, &a.id, MoveDirection::Down)
            .await
            .unwrap();
        let works: Vec<Work> = load(&storage).await.unwrap();
        assert_eq!(works[0].id, b.id);
        assert_eq!(works[1].id, a.id);
        assert_eq!(works.iter().map(|w| w.order).collect::<Vec<_>>(), vec![0, 1]);

        // Already last: nothing changes.
        move_entry::<Work>(&storage, &a.id, MoveDirection::Down)
            .await
            .unwrap();
        let works: Vec<Work> = load(&storage).await.unwrap();
        assert_eq!(works[1].id, a.id);
    }

    #[tokio::test]
    async fn load_sorts_by_stored_order() {
        let (storage, _dir) = test_storage();
        storage
            .set(
                WORKS_KEY,
                &serde_json::json!([
                    {"id": "work-2", "images": [], "titleEn": "", "titleRu": "", "order": 1, "createdAt": ""},
                    {"id": "work-1", "images": [], "titleEn": "", "titleRu": "", "order": 0, "createdAt": ""},
                ]),
            )
            .await
            .unwrap();

        let works: Vec<Work> = load(&storage).await.unwrap();
        assert_eq!(works[0].id, "work-1");
        assert_eq!(works[1].id, "work-2");
    }
}
