//! Dokploy application API client.
//!
//! # Responsibilities
//! - Fetch an application's Traefik document (`application.readTraefikConfig`)
//! - Replace it (`application.updateTraefikConfig`)
//! - Decode the JSON-string payload the read endpoint returns
//!
//! # Design Decisions
//! - Reads are retried per [`RetryPolicy`]; writes are sent exactly once
//! - Any status other than 200 is an error carrying the response body
//! - The API key only ever travels in the `x-api-key` header

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::config::{RetryConfig, TimeoutConfig};
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::store::{ConfigStore, StoreError, StoreTarget};

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    application_id: &'a str,
    traefik_config: &'a str,
}

/// HTTP-backed [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct DokployStore {
    client: Client,
    retry: RetryPolicy,
}

impl DokployStore {
    pub fn new(timeouts: &TimeoutConfig, retries: &RetryConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()?;
        Ok(Self::with_client(client, RetryPolicy::from(retries)))
    }

    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    async fn read_once(&self, target: &StoreTarget) -> Result<String, StoreError> {
        let url = target.read_url()?;
        tracing::debug!(url = %url, app = %target.application_id, "Fetching Traefik config");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &target.api_key)
            .send()
            .await
            .inspect_err(|_| metrics::record_store_request("read", "error"))?;

        let status = response.status();
        metrics::record_store_request("read", status.as_str());
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(StoreError::Status {
                operation: "fetch",
                status: status.as_u16(),
                body,
            });
        }
        Ok(decode_document(&body))
    }
}

#[async_trait]
impl ConfigStore for DokployStore {
    async fn read(&self, target: &StoreTarget) -> Result<String, StoreError> {
        let document = self.retry.run("read", || self.read_once(target)).await?;
        tracing::info!(
            app = %target.application_id,
            config_size = document.len(),
            "Fetched Traefik config"
        );
        Ok(document)
    }

    async fn write(&self, target: &StoreTarget, document: &str) -> Result<String, StoreError> {
        let url = target.update_url()?;
        let payload = UpdateRequest {
            application_id: &target.application_id,
            traefik_config: document,
        };
        tracing::debug!(url = %url, app = %target.application_id, config_size = document.len(), "Updating Traefik config");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &target.api_key)
            .json(&payload)
            .send()
            .await
            .inspect_err(|_| metrics::record_store_request("write", "error"))?;

        let status = response.status();
        metrics::record_store_request("write", status.as_str());
        let body = response.text().await?;

        if status != StatusCode::OK {
            tracing::error!(app = %target.application_id, status = status.as_u16(), "Traefik config update rejected");
            return Err(StoreError::Status {
                operation: "update",
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(app = %target.application_id, "Traefik config updated");
        Ok(body)
    }
}

/// The read endpoint returns the document as a JSON string literal.
///
/// Bodies that are not valid JSON strings are trimmed, stripped of one pair of
/// surrounding double quotes, and have literal `\n` sequences unescaped.
pub fn decode_document(body: &str) -> String {
    if let Ok(text) = serde_json::from_str::<String>(body) {
        return text;
    }

    let trimmed = body.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_json_string() {
        assert_eq!(
            decode_document("\"http:\\n  routers:\\n\""),
            "http:\n  routers:\n"
        );
    }

    #[test]
    fn test_decode_fallback() {
        // Invalid JSON escape (\q) forces the fallback path.
        assert_eq!(decode_document("  \"a:\\n  b: \\q\"  "), "a:\n  b: \\q");
        assert_eq!(decode_document("plain: text"), "plain: text");
    }

    #[test]
    fn test_update_payload_is_camel_case() {
        let payload = UpdateRequest {
            application_id: "app",
            traefik_config: "http:\n",
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"applicationId": "app", "traefikConfig": "http:\n"})
        );
    }
}
