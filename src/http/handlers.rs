//! REST handlers.
//!
//! Every handler loads state, delegates to [`HostManager`](crate::operations::HostManager), and wraps the
//! result in the response envelope. Validation beyond a non-blank hostname
//! happens in the operations layer.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::http::dto::{
    ConfigResponse, CustomConfigRequest, DefaultsView, HealthResponse, HostRequest, ServiceInfo,
};
use crate::http::response::{ApiError, ApiResponse};
use crate::http::server::AppState;
use crate::operations::{DefaultsUpdate, HostOperation, Overrides};

type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

fn require_hostname(hostname: Option<String>) -> Result<String, ApiError> {
    hostname
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ApiError::bad_request("Hostname is required"))
}

pub async fn add_host(
    State(state): State<AppState>,
    payload: Result<Json<HostRequest>, JsonRejection>,
) -> ApiResult<HostOperation> {
    let hostname = require_hostname(body(payload)?.hostname)?;
    tracing::info!(host = %hostname, "Received add-host request");
    let op = state.hosts.add_host(&hostname, &Overrides::default()).await?;
    Ok(ApiResponse::success(op.message.clone(), op))
}

pub async fn delete_host(
    State(state): State<AppState>,
    payload: Result<Json<HostRequest>, JsonRejection>,
) -> ApiResult<HostOperation> {
    let hostname = require_hostname(body(payload)?.hostname)?;
    tracing::info!(host = %hostname, "Received delete-host request");
    let op = state.hosts.delete_host(&hostname, &Overrides::default()).await?;
    Ok(ApiResponse::success(op.message.clone(), op))
}

pub async fn get_config(State(state): State<AppState>) -> ApiResult<ConfigResponse> {
    let config = state.hosts.current_config(&Overrides::default()).await?;
    Ok(ApiResponse::success(
        "Configuration retrieved successfully",
        ConfigResponse { config },
    ))
}

pub async fn get_services(State(state): State<AppState>) -> ApiResult<Vec<ServiceInfo>> {
    let bindings = state.hosts.service_bindings(&Overrides::default()).await?;
    Ok(ApiResponse::success(
        "Service URLs retrieved successfully",
        bindings.into_iter().map(ServiceInfo::from).collect(),
    ))
}

pub async fn add_host_custom(
    State(state): State<AppState>,
    payload: Result<Json<CustomConfigRequest>, JsonRejection>,
) -> ApiResult<HostOperation> {
    let request = body(payload)?;
    let hostname = require_hostname(request.hostname)?;
    tracing::info!(host = %hostname, "Received custom add-host request");
    let op = state.hosts.add_host(&hostname, &request.overrides).await?;
    Ok(ApiResponse::success(op.message.clone(), op))
}

pub async fn delete_host_custom(
    State(state): State<AppState>,
    payload: Result<Json<CustomConfigRequest>, JsonRejection>,
) -> ApiResult<HostOperation> {
    let request = body(payload)?;
    let hostname = require_hostname(request.hostname)?;
    tracing::info!(host = %hostname, "Received custom delete-host request");
    let op = state.hosts.delete_host(&hostname, &request.overrides).await?;
    Ok(ApiResponse::success(op.message.clone(), op))
}

pub async fn get_config_custom(
    State(state): State<AppState>,
    payload: Result<Json<CustomConfigRequest>, JsonRejection>,
) -> ApiResult<ConfigResponse> {
    let request = body(payload)?;
    let config = state.hosts.current_config(&request.overrides).await?;
    Ok(ApiResponse::success(
        "Configuration retrieved successfully with custom config",
        ConfigResponse { config },
    ))
}

pub async fn get_services_custom(
    State(state): State<AppState>,
    payload: Result<Json<CustomConfigRequest>, JsonRejection>,
) -> ApiResult<Vec<ServiceInfo>> {
    let request = body(payload)?;
    let bindings = state.hosts.service_bindings(&request.overrides).await?;
    Ok(ApiResponse::success(
        "Service URLs retrieved successfully with custom config",
        bindings.into_iter().map(ServiceInfo::from).collect(),
    ))
}

pub async fn health() -> Json<HealthResponse> {
    tracing::debug!("Health check");
    Json(HealthResponse::up())
}

pub async fn current_defaults(State(state): State<AppState>) -> ApiResponse<DefaultsView> {
    let defaults = state.hosts.defaults().load();
    ApiResponse::success("Configuration retrieved successfully", DefaultsView::from(defaults.as_ref()))
}

pub async fn update_defaults(
    State(state): State<AppState>,
    payload: Result<Json<DefaultsUpdate>, JsonRejection>,
) -> ApiResult<DefaultsView> {
    let update = body(payload)?;
    let defaults = state.hosts.defaults().update(update);
    tracing::info!("Runtime defaults updated");
    Ok(ApiResponse::success(
        "Configuration updated successfully",
        DefaultsView::from(defaults.as_ref()),
    ))
}

pub async fn reset_defaults(State(state): State<AppState>) -> ApiResponse<()> {
    state.hosts.defaults().reset();
    ApiResponse::<()>::message("Configuration reset to defaults successfully")
}
