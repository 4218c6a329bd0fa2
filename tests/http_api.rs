//! REST API tests driven in-process through the full middleware stack.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{send, send_raw, test_app, test_app_with, test_config, BASE_DOC, APP_ID};
use traefik_config_manager::store::{ConfigStore, StoreTarget};

#[tokio::test]
async fn test_add_host_writes_document() {
    let (app, store) = test_app(BASE_DOC);

    let (status, body) = send(&app, "POST", "/api/traefik/add-host", Some(json!({"hostname": "demo.example.com"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Host 'demo.example.com' added successfully! Response: {\"success\":true}"
    );
    assert_eq!(body["data"]["hostname"], "demo.example.com");

    let stored = store.document(APP_ID).await.unwrap();
    assert_eq!(body["data"]["updatedConfig"], stored.as_str());
    assert!(stored.contains("    demo-backend-router:\n"));
    assert!(stored.contains("      service: api-svc\n"));
    assert!(stored.contains("      service: web-svc\n"));
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn test_add_existing_host_skips_write() {
    let (app, store) = test_app(BASE_DOC);

    let (status, body) = send(&app, "POST", "/api/traefik/add-host", Some(json!({"hostname": "keep.example.com"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Host 'keep.example.com' already exists in the configuration. No update needed."
    );
    assert_eq!(body["data"]["updatedConfig"], BASE_DOC);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_delete_host_round_trip() {
    let (app, store) = test_app(BASE_DOC);

    send(&app, "POST", "/api/traefik/add-host", Some(json!({"hostname": "demo.example.com"}))).await;
    let (status, body) = send(&app, "DELETE", "/api/traefik/delete-host", Some(json!({"hostname": "demo.example.com"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Host 'demo.example.com' deleted successfully! Response: {\"success\":true}"
    );
    assert_eq!(store.document(APP_ID).await.unwrap(), BASE_DOC);
    assert_eq!(store.write_count(), 2);
}

#[tokio::test]
async fn test_delete_absent_host_skips_write() {
    let (app, store) = test_app(BASE_DOC);

    let (status, body) = send(&app, "DELETE", "/api/traefik/delete-host", Some(json!({"hostname": "ghost.example.com"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Host 'ghost.example.com' not found in configuration. Nothing to delete."
    );
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_blank_hostname_rejected() {
    let (app, store) = test_app(BASE_DOC);

    let (status, body) = send(&app, "POST", "/api/traefik/add-host", Some(json!({"hostname": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Error: Hostname is required");
    assert!(body["data"].is_null());

    let (status, _) = send(&app, "DELETE", "/api/traefik/delete-host", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let (app, _) = test_app(BASE_DOC);

    let (status, body) = send(&app, "POST", "/api/traefik/add-host", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_document_is_unprocessable() {
    let (app, store) = test_app("http:\n  services: {}\n");

    let (status, body) = send(&app, "POST", "/api/traefik/add-host", Some(json!({"hostname": "demo.example.com"}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Error: Invalid config: 'routers:' section not found.");
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_get_config_and_services() {
    let (app, _) = test_app(BASE_DOC);

    let (status, body) = send(&app, "GET", "/api/traefik/config", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Configuration retrieved successfully");
    assert_eq!(body["data"]["config"], BASE_DOC);

    let (status, body) = send(&app, "GET", "/api/traefik/services", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Service URLs retrieved successfully");
    assert_eq!(
        body["data"],
        json!([{"serviceName": "keep-service", "serviceUrl": "http://keep:80", "loadBalancer": "roundrobin"}])
    );
}

#[tokio::test]
async fn test_custom_add_uses_single_service() {
    let (app, store) = test_app(BASE_DOC);

    let request = json!({
        "hostname": "demo.example.com",
        "serviceName": "app-1",
        "servicePort": 3000,
    });
    let (status, body) = send(&app, "POST", "/api/traefik/add-host-custom", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Host 'demo.example.com' added successfully with custom config! Response: {\"success\":true}"
    );

    let stored = store.document(APP_ID).await.unwrap();
    assert!(stored.contains("    demo-router:\n"));
    assert!(stored.contains("    demo-service:\n"));
    assert!(stored.contains("        - url: http://app-1:3000\n"));
    assert!(!stored.contains("demo-backend-router"));
}

#[tokio::test]
async fn test_custom_calls_target_other_application() {
    let (app, store) = test_app(BASE_DOC);
    let other = StoreTarget::new("http://store.local", "other-key", "other");
    store
        .write(&other, "http:\n  routers:\n  middlewares:\n")
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/traefik/config-custom",
        Some(json!({"applicationId": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Configuration retrieved successfully with custom config");
    assert_eq!(body["data"]["config"], "http:\n  routers:\n  middlewares:\n");

    let request = json!({"hostname": "demo.example.com", "applicationId": "other"});
    let (status, _) = send(&app, "DELETE", "/api/traefik/delete-host-custom", Some(request.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "POST", "/api/traefik/add-host-custom", Some(request)).await;
    assert_eq!(status, StatusCode::OK);

    assert!(store.document("other").await.unwrap().contains("Host(`demo.example.com`)"));
    assert_eq!(store.document(APP_ID).await.unwrap(), BASE_DOC);

    let (status, body) = send(&app, "POST", "/api/traefik/services-custom", Some(json!({"applicationId": "other"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Service URLs retrieved successfully with custom config");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_store_failure_is_bad_gateway() {
    let (app, _) = test_app(BASE_DOC);

    let (status, body) = send(
        &app,
        "POST",
        "/api/traefik/add-host-custom",
        Some(json!({"hostname": "demo.example.com", "applicationId": "missing"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["message"],
        "Error: Failed to fetch config. HTTP status: 404\nResponse: application 'missing' not found"
    );
}

#[tokio::test]
async fn test_missing_services_rejected() {
    let mut config = test_config();
    config.routing.backend_service.clear();
    let (app, store) = test_app_with(config, BASE_DOC);

    let (status, body) = send(&app, "POST", "/api/traefik/add-host", Some(json!({"hostname": "demo.example.com"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Error: Backend and frontend services are required");
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app(BASE_DOC);

    let (status, body) = send(&app, "GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["service"], "Traefik Config Manager");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_defaults_update_and_reset() {
    let (app, store) = test_app(BASE_DOC);

    let (status, body) = send(&app, "GET", "/api/config/current", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["dokployApiKey"], "secr...");
    assert_eq!(body["data"]["backendService"], "api-svc");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/config/update",
        Some(json!({"backendService": "new-api", "dokployApiKey": "rotated-key"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Configuration updated successfully");
    assert_eq!(body["data"]["backendService"], "new-api");
    assert_eq!(body["data"]["dokployApiKey"], "rota...");
    assert_eq!(body["data"]["frontendService"], "web-svc");

    send(&app, "POST", "/api/traefik/add-host", Some(json!({"hostname": "demo.example.com"}))).await;
    assert!(store.document(APP_ID).await.unwrap().contains("      service: new-api\n"));

    let (status, body) = send(&app, "POST", "/api/config/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Configuration reset to defaults successfully");

    let (_, body) = send(&app, "GET", "/api/config/current", None).await;
    assert_eq!(body["data"]["backendService"], "api-svc");
    assert_eq!(body["data"]["dokployApiKey"], "secr...");
}

#[tokio::test]
async fn test_request_id_is_set_and_propagated() {
    let (app, _) = test_app(BASE_DOC);

    let (_, headers, _) = send_raw(&app, "GET", "/api/health", None).await;
    let generated = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(generated.len(), 36);

    let request = axum::http::Request::builder()
        .uri("/api/health")
        .header("x-request-id", "trace-me")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-me");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (app, _) = test_app(BASE_DOC);

    let request = axum::http::Request::builder()
        .uri("/api/health")
        .header("origin", "http://dashboard.local")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.headers().get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _) = test_app(BASE_DOC);

    let (status, _) = send(&app, "GET", "/api/traefik/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
