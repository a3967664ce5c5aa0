//! HTTP client for the key-value blob service.
//!
//! The service exposes one JSON document per key under
//! `{base}/{store}/{key}`: `GET` returns the document or 404, `PUT` replaces
//! it wholesale. Requests carry a bearer token when one is configured.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;

use britline_core::BlobConfig;

use crate::StoreError;

pub struct BlobClient {
    client: Client,
    base_url: Url,
    store: String,
    token: Option<String>,
}

impl BlobClient {
    /// Creates a client for the configured blob service.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StoreError::InvalidInput`] if the
    /// endpoint is not a valid URL.
    pub fn new(config: &BlobConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("britline/0.1 (catalog-backend)")
            .build()?;

        // Ensure exactly one trailing slash so join() appends path segments
        // instead of replacing the last one.
        let normalised = format!("{}/", config.endpoint.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            StoreError::InvalidInput(format!("invalid blob endpoint '{}': {e}", config.endpoint))
        })?;

        Ok(Self {
            client,
            base_url,
            store: config.store.clone(),
            token: config.token.clone(),
        })
    }

    fn key_url(&self, key: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(&format!("{}/{key}", self.store))
            .map_err(|e| StoreError::InvalidInput(format!("invalid blob key '{key}': {e}")))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Fetches the JSON document stored under `key`.
    ///
    /// A 404 means the key has never been written and yields `None`. A body
    /// that is not valid JSON also yields `None`: a corrupt blob reads back
    /// as absent rather than poisoning every caller.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] on network failure or
    /// [`StoreError::UnexpectedStatus`] for non-2xx, non-404 responses.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let url = self.key_url(key)?;
        let response = self.authorize(self.client.get(url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.text().await?;
                match serde_json::from_str::<Value>(&body) {
                    Ok(value) => Ok(Some(value)),
                    Err(e) => {
                        tracing::warn!(key, error = %e, "blob contains malformed JSON, treating as absent");
                        Ok(None)
                    }
                }
            }
            status => Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                key: key.to_string(),
            }),
        }
    }

    /// Replaces the JSON document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] on network failure or
    /// [`StoreError::UnexpectedStatus`] for non-2xx responses. Callers must
    /// treat either as fatal: a failed write means the data was not saved.
    pub async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let url = self.key_url(key)?;
        let response = self
            .authorize(self.client.put(url))
            .json(value)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                key: key.to_string(),
            })
        }
    }
}
