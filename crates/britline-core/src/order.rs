//! Customer order submissions.
//!
//! Orders are append-only: created once through the public intake endpoint,
//! then only their status (and `updatedAt`) changes until deletion.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Reviewed,
    Contacted,
    Completed,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Reviewed => write!(f, "reviewed"),
            OrderStatus::Contacted => write!(f, "contacted"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A cart line frozen at submission time. Prices are display strings
/// ("£400", "£100-150"); no arithmetic happens server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemSnapshot {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ru: Option<String>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderVehicle {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default, rename = "vehicleVIN")]
    pub vehicle_vin: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub items: Vec<CartItemSnapshot>,
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub vehicle: OrderVehicle,
    /// Set to "general-inquiry" for contact-form submissions without a cart.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    pub status: OrderStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The intake payload: everything the customer supplies, sans generated
/// fields (`id`, `status`, `createdAt`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default, rename = "vehicleVIN")]
    pub vehicle_vin: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub items: Vec<CartItemSnapshot>,
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub vehicle: OrderVehicle,
    #[serde(default, rename = "type")]
    pub order_type: Option<String>,
}
