//! The nested service catalog: brand → model → year → category → records.
//!
//! Brand and model keys are normalized slugs on every write and lookup, but
//! blobs persisted before normalization existed carry mixed-case keys and an
//! empty-string model key produced by a historical form bug. The read path
//! therefore matches across every stored key variant that normalizes to the
//! request, and the cleanup pass folds empty-model duplicates back into
//! their canonical records.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

use britline_core::normalize;
use britline_core::service::{ServiceDraft, ServiceRecord};

use crate::backend::Storage;
use crate::{StoreError, SERVICES_KEY};

pub type CategoryRecords = BTreeMap<String, Vec<ServiceRecord>>;
pub type YearCategories = BTreeMap<String, CategoryRecords>;
pub type ModelYears = BTreeMap<String, YearCategories>;
pub type Catalog = BTreeMap<String, ModelYears>;

/// Load the whole catalog. An absent, non-object, or malformed blob reads
/// as an empty catalog.
///
/// # Errors
///
/// Propagates storage read failures per the active storage mode.
pub async fn load(storage: &Storage) -> Result<Catalog, StoreError> {
    let Some(value) = storage.get(SERVICES_KEY).await? else {
        return Ok(Catalog::new());
    };
    if !value.is_object() {
        tracing::warn!("services blob is not an object, treating as empty");
        return Ok(Catalog::new());
    }
    match serde_json::from_value::<Catalog>(value) {
        Ok(catalog) => Ok(catalog),
        Err(e) => {
            tracing::warn!(error = %e, "services blob has unexpected shape, treating as empty");
            Ok(Catalog::new())
        }
    }
}

/// Persist the whole catalog.
///
/// # Errors
///
/// Write failures are fatal and propagate.
pub async fn save(storage: &Storage, catalog: &Catalog) -> Result<(), StoreError> {
    let value = serde_json::to_value(catalog)?;
    storage.set(SERVICES_KEY, &value).await
}

/// Load the catalog for serving: run the duplicate cleanup pass and backfill
/// record ids, persisting when anything changed.
///
/// A failed cleanup save is logged and the cleaned in-memory copy is served
/// anyway; the admin read must not break because housekeeping could not be
/// persisted.
///
/// # Errors
///
/// Propagates storage read failures.
pub async fn load_clean(storage: &Storage) -> Result<Catalog, StoreError> {
    let mut catalog = load(storage).await?;
    let mut changed = cleanup(&mut catalog);
    changed |= ensure_record_ids(&mut catalog);

    if changed {
        match save(storage, &catalog).await {
            Ok(()) => return load(storage).await,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist cleaned catalog, serving in-memory copy");
            }
        }
    }
    Ok(catalog)
}

/// Assign ids to records persisted before ids existed. Returns whether any
/// record was touched; ids become durable with the next whole-blob write.
pub fn ensure_record_ids(catalog: &mut Catalog) -> bool {
    let mut assigned = false;
    for models in catalog.values_mut() {
        for years in models.values_mut() {
            for categories in years.values_mut() {
                for record in categories.values_mut().flatten() {
                    if record.id.is_none() {
                        record.id = Some(uuid::Uuid::new_v4().to_string());
                        assigned = true;
                    }
                }
            }
        }
    }
    assigned
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

fn absorb_descriptions(canonical: &mut ServiceRecord, duplicate: &ServiceRecord) -> bool {
    let mut merged = false;
    if is_blank(&canonical.description_en) && !is_blank(&duplicate.description_en) {
        canonical.description_en = duplicate.description_en.clone();
        merged = true;
    }
    if is_blank(&canonical.description_ru) && !is_blank(&duplicate.description_ru) {
        canonical.description_ru = duplicate.description_ru.clone();
        merged = true;
    }
    merged
}

/// Merge a duplicate record into the first same-titled record stored under a
/// proper (non-empty) model key for the same year and category. Returns
/// whether a canonical match was found.
fn merge_into_canonical(
    models: &mut ModelYears,
    year: &str,
    category: &str,
    duplicate: &ServiceRecord,
) -> bool {
    for years in models.values_mut() {
        let Some(records) = years.get_mut(year).and_then(|y| y.get_mut(category)) else {
            continue;
        };
        if let Some(canonical) = records.iter_mut().find(|r| r.title == duplicate.title) {
            absorb_descriptions(canonical, duplicate);
            return true;
        }
    }
    false
}

/// Fold empty-string-model duplicates into their canonical records and prune
/// the containers this empties. Returns whether the catalog changed.
///
/// Matching is by title within the same year and category; the first
/// structural match in key order is canonical. Two unrelated records that
/// legitimately share a title will be merged; see DESIGN.md.
pub fn cleanup(catalog: &mut Catalog) -> bool {
    let mut cleaned = false;

    for models in catalog.values_mut() {
        let Some(mut empty_model) = models.remove("") else {
            continue;
        };

        for (year, categories) in &mut empty_model {
            for (category, duplicates) in categories.iter_mut() {
                let mut i = duplicates.len();
                while i > 0 {
                    i -= 1;
                    if duplicates[i].title.is_empty() {
                        continue;
                    }
                    if merge_into_canonical(models, year, category, &duplicates[i]) {
                        duplicates.remove(i);
                        cleaned = true;
                    }
                }
            }
            let before = categories.len();
            categories.retain(|_, records| !records.is_empty());
            cleaned |= categories.len() != before;
        }

        let before = empty_model.len();
        empty_model.retain(|_, categories| !categories.is_empty());
        cleaned |= empty_model.len() != before;

        if empty_model.is_empty() {
            cleaned = true;
        } else {
            models.insert(String::new(), empty_model);
        }
    }

    cleaned
}

/// Append a record, creating every missing nesting level on the way.
///
/// # Errors
///
/// Propagates storage failures; never fails on missing structure.
pub async fn add_record(
    storage: &Storage,
    brand_raw: &str,
    model_raw: &str,
    year: &str,
    category: &str,
    draft: ServiceDraft,
) -> Result<(), StoreError> {
    let brand = normalize(brand_raw);
    let model = normalize(model_raw);

    let mut catalog = load(storage).await?;
    ensure_record_ids(&mut catalog);

    catalog
        .entry(brand)
        .or_default()
        .entry(model)
        .or_default()
        .entry(year.to_string())
        .or_default()
        .entry(category.to_string())
        .or_default()
        .push(draft.into_record());

    save(storage, &catalog).await
}

/// Wholesale-replace the record at `index` in the addressed category.
///
/// An empty category array turns the call into an implicit add. Replacement
/// carries nothing over: fields absent from the draft are absent afterwards.
/// After a successful replace, the sibling empty-model duplicate with the
/// same title (if any) is merged and removed.
///
/// # Errors
///
/// Returns [`StoreError::InvalidInput`] naming the valid range when `index`
/// is out of bounds for a non-empty category.
pub async fn update_record(
    storage: &Storage,
    brand_raw: &str,
    model_raw: &str,
    year: &str,
    category: &str,
    index: usize,
    draft: ServiceDraft,
) -> Result<(), StoreError> {
    let brand = normalize(brand_raw);
    let model = normalize(model_raw);

    let mut catalog = load(storage).await?;
    ensure_record_ids(&mut catalog);

    let replaced_title = {
        let records = catalog
            .entry(brand.clone())
            .or_default()
            .entry(model.clone())
            .or_default()
            .entry(year.to_string())
            .or_default()
            .entry(category.to_string())
            .or_default();

        if records.is_empty() {
            records.push(draft.into_record());
            None
        } else if index >= records.len() {
            return Err(StoreError::InvalidInput(format!(
                "index {index} is out of bounds; the category holds {} records (valid indexes 0-{})",
                records.len(),
                records.len() - 1
            )));
        } else {
            let existing_id = records[index].id.clone();
            let mut record = draft.into_record();
            record.id = existing_id.or(record.id);
            let title = record.title.clone();
            records[index] = record;
            Some(title)
        }
    };

    if let Some(title) = replaced_title {
        merge_update_duplicate(&mut catalog, &brand, &model, year, category, index, &title);
    }

    save(storage, &catalog).await
}

/// The targeted cleanup run after an in-place update: absorb descriptions
/// from the same-titled empty-model duplicate, delete it, and prune the
/// containers this empties.
fn merge_update_duplicate(
    catalog: &mut Catalog,
    brand: &str,
    model: &str,
    year: &str,
    category: &str,
    index: usize,
    title: &str,
) {
    let Some(models) = catalog.get_mut(brand) else {
        return;
    };
    let Some(mut empty_model) = models.remove("") else {
        return;
    };

    if let Some(duplicates) = empty_model.get_mut(year).and_then(|y| y.get_mut(category)) {
        if let Some(pos) = duplicates.iter().position(|r| r.title == title) {
            let duplicate = duplicates.remove(pos);

            if let Some(canonical) = models
                .get_mut(model)
                .and_then(|m| m.get_mut(year))
                .and_then(|y| y.get_mut(category))
                .and_then(|records| records.get_mut(index))
            {
                absorb_descriptions(canonical, &duplicate);
            }

            if duplicates.is_empty() {
                if let Some(years) = empty_model.get_mut(year) {
                    years.remove(category);
                    if years.is_empty() {
                        empty_model.remove(year);
                    }
                }
            }
        }
    }

    if !empty_model.is_empty() {
        models.insert(String::new(), empty_model);
    }
}

/// Lookup parameters for a delete, carrying both the normalized and the
/// merely trimmed-lowercased forms of the requested brand and model.
struct DeleteRequest<'a> {
    brand: String,
    model: String,
    brand_lower: String,
    model_lower: String,
    year: &'a str,
    category: &'a str,
    index: usize,
}

/// Priority-ordered key-matching strategies for deletes. Persisted data may
/// hold keys written before normalization existed, so a miss under the
/// canonical keys falls through to progressively looser matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteStrategy {
    /// Exact path under normalized brand/model.
    NormalizedExact,
    /// Exact path under trimmed, lowercased (non-normalized) brand/model.
    TrimmedLowercaseExact,
    /// Scan every stored brand/model pair whose normalized or lowercased
    /// form matches the request; first structural match wins.
    FullScan,
}

const DELETE_STRATEGIES: [DeleteStrategy; 3] = [
    DeleteStrategy::NormalizedExact,
    DeleteStrategy::TrimmedLowercaseExact,
    DeleteStrategy::FullScan,
];

impl DeleteStrategy {
    fn locate(self, catalog: &Catalog, req: &DeleteRequest<'_>) -> Option<(String, String)> {
        match self {
            DeleteStrategy::NormalizedExact => locate_exact(catalog, &req.brand, &req.model, req),
            DeleteStrategy::TrimmedLowercaseExact => {
                locate_exact(catalog, &req.brand_lower, &req.model_lower, req)
            }
            DeleteStrategy::FullScan => {
                for (brand_key, models) in catalog {
                    if normalize(brand_key) != req.brand
                        && brand_key.to_lowercase() != req.brand_lower
                    {
                        continue;
                    }
                    for model_key in models.keys() {
                        if normalize(model_key) != req.model
                            && model_key.to_lowercase() != req.model_lower
                        {
                            continue;
                        }
                        if locate_exact(catalog, brand_key, model_key, req).is_some() {
                            return Some((brand_key.clone(), model_key.clone()));
                        }
                    }
                }
                None
            }
        }
    }
}

fn locate_exact(
    catalog: &Catalog,
    brand_key: &str,
    model_key: &str,
    req: &DeleteRequest<'_>,
) -> Option<(String, String)> {
    catalog
        .get(brand_key)?
        .get(model_key)?
        .get(req.year)?
        .get(req.category)?
        .get(req.index)?;
    Some((brand_key.to_string(), model_key.to_string()))
}

/// Delete the record at `index`, trying each [`DeleteStrategy`] in turn.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] naming the searched-for path when no
/// strategy finds a structural match.
pub async fn delete_record(
    storage: &Storage,
    brand_raw: &str,
    model_raw: &str,
    year: &str,
    category: &str,
    index: usize,
) -> Result<(), StoreError> {
    let req = DeleteRequest {
        brand: normalize(brand_raw),
        model: normalize(model_raw),
        brand_lower: brand_raw.trim().to_lowercase(),
        model_lower: model_raw.trim().to_lowercase(),
        year,
        category,
        index,
    };

    let mut catalog = load(storage).await?;
    ensure_record_ids(&mut catalog);

    let located = DELETE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.locate(&catalog, &req));

    let Some((brand_key, model_key)) = located else {
        return Err(StoreError::NotFound(format!(
            "service not found for {}/{}/{year}/{category} at index {index}",
            req.brand, req.model
        )));
    };

    if let Some(records) = catalog
        .get_mut(&brand_key)
        .and_then(|m| m.get_mut(&model_key))
        .and_then(|y| y.get_mut(year))
        .and_then(|c| c.get_mut(category))
    {
        records.remove(index);
    }

    save(storage, &catalog).await
}

/// Resolve the stored year key for a request: exact match first, then
/// trimmed, then percent-decoded stored keys ("2021%2B" was persisted by an
/// old client for "2021+").
fn resolve_year<'a>(years: &'a YearCategories, requested: &str) -> Option<&'a CategoryRecords> {
    if let Some(categories) = years.get(requested) {
        return Some(categories);
    }
    for (stored, categories) in years {
        if stored.trim() == requested {
            return Some(categories);
        }
        if let Ok(decoded) = percent_decode_str(stored).decode_utf8() {
            if decoded.trim() == requested {
                return Some(categories);
            }
        }
    }
    None
}

/// Public browse lookup: merge category→records maps across every stored
/// brand/model key variant that normalizes to the request, deduplicating
/// records by title within each category.
///
/// An empty result means nothing matched; the HTTP layer turns that into a
/// 404.
///
/// # Errors
///
/// Propagates storage read failures.
pub async fn lookup(
    storage: &Storage,
    brand_raw: &str,
    model_raw: &str,
    year_raw: &str,
) -> Result<CategoryRecords, StoreError> {
    let brand = normalize(brand_raw);
    let model = normalize(model_raw);
    let year = year_raw.trim();

    let catalog = load(storage).await?;
    let mut merged = CategoryRecords::new();

    for (brand_key, models) in &catalog {
        if brand_key.is_empty() || normalize(brand_key) != brand {
            continue;
        }
        for (model_key, years) in models {
            if model_key.is_empty() || normalize(model_key) != model {
                continue;
            }
            let Some(categories) = resolve_year(years, year) else {
                continue;
            };
            for (category, records) in categories {
                if records.is_empty() {
                    continue;
                }
                let bucket = merged.entry(category.clone()).or_default();
                for record in records {
                    if record.title.is_empty() {
                        continue;
                    }
                    if bucket.iter().any(|existing| existing.title == record.title) {
                        continue;
                    }
                    bucket.push(record.clone());
                }
            }
        }
    }

    merged.retain(|_, records| !records.is_empty());
    Ok(merged)
}
