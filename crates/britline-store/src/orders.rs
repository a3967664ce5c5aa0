//! The order intake store: an append-only array under the `orders` blob
//! key. Orders are created by the public intake endpoint, then only their
//! status mutates.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use britline_core::order::{Order, OrderDraft, OrderStatus};

use crate::backend::Storage;
use crate::{StoreError, ORDERS_KEY};

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_orders(items: Vec<Value>) -> Vec<Order> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Order>(item) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed order entry");
                None
            }
        })
        .collect()
}

/// Load every order. An absent or invalid blob yields an empty list.
///
/// # Errors
///
/// Propagates storage read failures per the active storage mode.
pub async fn load(storage: &Storage) -> Result<Vec<Order>, StoreError> {
    match storage.get(ORDERS_KEY).await? {
        Some(Value::Array(items)) => Ok(parse_orders(items)),
        _ => Ok(Vec::new()),
    }
}

async fn save(storage: &Storage, orders: &[Order]) -> Result<(), StoreError> {
    let value = serde_json::to_value(orders)?;
    storage.set(ORDERS_KEY, &value).await
}

/// Append a new order with a generated `order-<millis>` id, `pending`
/// status, and creation timestamp. Notification dispatch is the HTTP
/// layer's concern and must never affect the result of this call.
///
/// # Errors
///
/// Propagates storage failures.
pub async fn create(storage: &Storage, draft: OrderDraft) -> Result<Order, StoreError> {
    let mut orders = load(storage).await?;

    let order = Order {
        id: format!("order-{}", Utc::now().timestamp_millis()),
        customer_name: draft.customer_name,
        vehicle_vin: draft.vehicle_vin,
        contact: draft.contact,
        items: draft.items,
        total: draft.total,
        vehicle: draft.vehicle,
        order_type: draft.order_type,
        status: OrderStatus::Pending,
        created_at: now_iso(),
        updated_at: None,
    };

    orders.push(order.clone());
    save(storage, &orders).await?;
    Ok(order)
}

/// Set the status of the order with the given id, stamping `updatedAt`.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when no order has the id.
pub async fn update_status(
    storage: &Storage,
    id: &str,
    status: OrderStatus,
) -> Result<Order, StoreError> {
    let mut orders = load(storage).await?;
    let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
        return Err(StoreError::NotFound(format!("order '{id}' not found")));
    };

    order.status = status;
    order.updated_at = Some(now_iso());
    let updated = order.clone();

    save(storage, &orders).await?;
    Ok(updated)
}

/// Remove the order with the given id. A missing id is a silent no-op at
/// this level; the HTTP layer may still report it.
///
/// # Errors
///
/// Propagates storage failures.
pub async fn delete(storage: &Storage, id: &str) -> Result<(), StoreError> {
    let mut orders = load(storage).await?;
    orders.retain(|o| o.id != id);
    save(storage, &orders).await
}
