//! Response envelope and error mapping.
//!
//! # Responsibilities
//! - Wrap every JSON body as `{success, message, data}`
//! - Map operation failures to HTTP status codes
//!
//! # Design Decisions
//! - Error bodies use the same envelope with `success: false`, `data: null`
//!   and a message prefixed with `Error: `
//! - Store failures are reported as 502; the upstream body stays in the message

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::document::EditError;
use crate::operations::OperationError;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Successful response without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Failure returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<OperationError> for ApiError {
    fn from(error: OperationError) -> Self {
        let status = match &error {
            OperationError::InvalidRequest(_) | OperationError::Edit(EditError::EmptyEntity) => {
                StatusCode::BAD_REQUEST
            }
            OperationError::Edit(EditError::MalformedDocument { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            OperationError::Store(StoreError::Status { .. } | StoreError::Http(_)) => StatusCode::BAD_GATEWAY,
            OperationError::Store(StoreError::InvalidTarget(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(format!("Error: {}", self.message));
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let status = |e: OperationError| ApiError::from(e).status;
        assert_eq!(status(EditError::EmptyEntity.into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(EditError::MalformedDocument { missing: "routers" }.into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(
                StoreError::Status {
                    operation: "fetch",
                    status: 500,
                    body: String::new()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(StoreError::InvalidTarget("x".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_envelope() {
        let body = serde_json::to_value(ApiResponse::<()>::error("Error: boom")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": false, "message": "Error: boom", "data": null})
        );
    }
}
