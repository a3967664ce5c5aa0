//! Telegram Bot API client and the order-message formatter.

use std::time::Duration;

use chrono::DateTime;
use reqwest::{Client, Url};
use serde::Serialize;

use britline_core::order::Order;
use britline_core::AppConfig;

use crate::NotifyError;

const DEFAULT_BASE_URL: &str = "https://api.telegram.org/";

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Client for the Telegram `sendMessage` endpoint.
pub struct TelegramNotifier {
    client: Client,
    base_url: Url,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Creates a notifier pointed at the production Telegram API.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(bot_token: &str, chat_id: &str, timeout_secs: u64) -> Result<Self, NotifyError> {
        Self::with_base_url(bot_token, chat_id, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a notifier with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidBaseUrl`] for an unparsable URL or
    /// [`NotifyError::Http`] if the client cannot be constructed.
    pub fn with_base_url(
        bot_token: &str,
        chat_id: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("britline/0.1 (order-notifications)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NotifyError::InvalidBaseUrl {
            base_url: normalised.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            bot_token: bot_token.to_owned(),
            chat_id: chat_id.to_owned(),
        })
    }

    /// Sends an HTML-formatted message to the configured chat.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] on network failure or
    /// [`NotifyError::UnexpectedStatus`] for non-2xx responses.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = self
            .base_url
            .join(&format!("bot{}/sendMessage", self.bot_token))
            .map_err(|e| NotifyError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .post(url)
            .json(&SendMessageBody {
                chat_id: &self.chat_id,
                text,
                parse_mode: "HTML",
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotifyError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Facade the server holds: a notifier when Telegram is configured, a
/// logging no-op otherwise.
pub struct Notifier {
    inner: Option<TelegramNotifier>,
}

impl Notifier {
    /// Builds the notifier from application configuration. Missing token or
    /// chat id disables notifications with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Http`] if the HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, NotifyError> {
        let inner = match (&config.telegram_bot_token, &config.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Some(TelegramNotifier::new(
                token,
                chat_id,
                config.telegram_request_timeout_secs,
            )?),
            _ => {
                tracing::warn!("Telegram bot token or chat id not configured; notifications disabled");
                None
            }
        };
        Ok(Self { inner })
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    #[must_use]
    pub fn from_notifier(notifier: TelegramNotifier) -> Self {
        Self {
            inner: Some(notifier),
        }
    }

    /// Sends the new-order notification. Returns `false` when notifications
    /// are disabled.
    ///
    /// # Errors
    ///
    /// Propagates send failures; callers log and swallow them.
    pub async fn notify_order_created(&self, order: &Order) -> Result<bool, NotifyError> {
        let Some(notifier) = &self.inner else {
            return Ok(false);
        };
        notifier.send(&format_order_message(order)).await?;
        Ok(true)
    }
}

fn or_unspecified(value: &str) -> &str {
    if value.is_empty() {
        "Не указано"
    } else {
        value
    }
}

fn format_created_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map_or_else(|_| raw.to_string(), |dt| dt.format("%d.%m.%Y, %H:%M").to_string())
}

/// Renders the HTML order summary posted to the admin chat.
#[must_use]
pub fn format_order_message(order: &Order) -> String {
    let items_list = if order.items.is_empty() {
        "Нет услуг".to_string()
    } else {
        order
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let title = if item.title.is_empty() {
                    "Service"
                } else {
                    item.title.as_str()
                };
                format!("{}. {title}\n   💷 {}", i + 1, item.price)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let vehicle = &order.vehicle;
    let vehicle_info =
        if !vehicle.brand.is_empty() && !vehicle.model.is_empty() && !vehicle.year.is_empty() {
            format!("{} {} ({})", vehicle.brand, vehicle.model, vehicle.year)
        } else {
            "Не указано".to_string()
        };

    let order_id = order.id.strip_prefix("order-").unwrap_or(&order.id);
    let date = format_created_at(&order.created_at);

    format!(
        "🆕 <b>Новый заказ!</b>\n\
         \n\
         📋 <b>Заказ #{order_id}</b>\n\
         📅 {date}\n\
         \n\
         👤 <b>Клиент:</b>\n   \
         Имя: {name}\n   \
         Контакт: {contact}\n   \
         VIN: {vin}\n\
         \n\
         🚗 <b>Автомобиль:</b>\n   \
         {vehicle_info}\n\
         \n\
         📦 <b>Услуги ({count}):</b>\n\
         {items_list}\n\
         \n\
         💰 <b>Итого: {total}</b>\n\
         \n\
         📊 Статус: {status}",
        name = or_unspecified(&order.customer_name),
        contact = or_unspecified(&order.contact),
        vin = or_unspecified(&order.vehicle_vin),
        count = order.items.len(),
        total = order.total,
        status = order.status,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use britline_core::order::{CartItemSnapshot, OrderStatus, OrderVehicle};

    fn sample_order() -> Order {
        Order {
            id: "order-1700000000000".to_string(),
            customer_name: "Ivan".to_string(),
            vehicle_vin: "SALLAAA123".to_string(),
            contact: "+44 7000 000000".to_string(),
            items: vec![CartItemSnapshot {
                id: "x".to_string(),
                title: "Stage 1".to_string(),
                image: String::new(),
                price: "£400".to_string(),
                requirements: "No".to_string(),
                description: None,
                description_en: None,
                description_ru: None,
                brand: "land-rover".to_string(),
                model: "defender".to_string(),
                year: "2020".to_string(),
            }],
            total: "£400".to_string(),
            vehicle: OrderVehicle {
                brand: "land-rover".to_string(),
                model: "defender".to_string(),
                year: "2020".to_string(),
            },
            order_type: None,
            status: OrderStatus::Pending,
            created_at: "2023-11-14T22:13:20.000Z".to_string(),
            updated_at: None,
        }
    }

    #[test]
    fn message_includes_order_id_without_prefix() {
        let message = format_order_message(&sample_order());
        assert!(message.contains("Заказ #1700000000000"));
        assert!(!message.contains("#order-"));
    }

    #[test]
    fn message_lists_items_and_vehicle() {
        let message = format_order_message(&sample_order());
        assert!(message.contains("1. Stage 1"));
        assert!(message.contains("land-rover defender (2020)"));
        assert!(message.contains("Итого: £400"));
        assert!(message.contains("Статус: pending"));
    }

    #[test]
    fn empty_cart_renders_placeholder() {
        let mut order = sample_order();
        order.items.clear();
        let message = format_order_message(&order);
        assert!(message.contains("Нет услуг"));
        assert!(message.contains("Услуги (0)"));
    }

    #[test]
    fn missing_customer_fields_render_as_unspecified() {
        let mut order = sample_order();
        order.customer_name.clear();
        order.vehicle = OrderVehicle::default();
        let message = format_order_message(&order);
        assert!(message.contains("Имя: Не указано"));
        assert!(message.contains("🚗 <b>Автомобиль:</b>\n   Не указано"));
    }

    #[test]
    fn created_at_is_rendered_in_ru_style() {
        let message = format_order_message(&sample_order());
        assert!(message.contains("📅 14.11.2023, 22:13"));
    }
}
