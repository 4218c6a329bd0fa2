//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use traefik_config_manager::config::AppConfig;
use traefik_config_manager::store::MemoryStore;
use traefik_config_manager::HttpServer;

pub const APP_ID: &str = "app";
pub const API_KEY: &str = "secret-key-123";

/// Typical Dokploy document: one existing router, a middleware and a service.
pub const BASE_DOC: &str = "\
http:
  routers:
    keep-router:
      rule: Host(`keep.example.com`)
      service: keep-service
  middlewares:
    redirect-to-https:
      redirectScheme:
        scheme: https
  services:
    keep-service:
      loadBalancer:
        servers:
        - url: http://keep:80
";

/// `routers:` immediately followed by an empty `middlewares:`.
pub const EMPTY_ROUTERS_DOC: &str = "\
http:
  routers:
  middlewares:
";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.store.api_domain = "http://store.local".to_string();
    config.store.api_key = API_KEY.to_string();
    config.store.application_id = APP_ID.to_string();
    config.routing.backend_service = "api-svc".to_string();
    config.routing.frontend_service = "web-svc".to_string();
    config
}

/// Router over an in-memory store seeded with `doc` for [`APP_ID`].
pub fn test_app(doc: &str) -> (Router, Arc<MemoryStore>) {
    test_app_with(test_config(), doc)
}

pub fn test_app_with(config: AppConfig, doc: &str) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_document(APP_ID, doc));
    let server = HttpServer::new(config, store.clone());
    (server.router(), store)
}

/// Send one request and decode the JSON body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, json) = send_raw(app, method, uri, body).await;
    (status, json)
}

/// Like [`send`] but also returns the response headers.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, headers, json)
}
