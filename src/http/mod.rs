//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, CORS, timeout)
//!     → request.rs (add/propagate request ID)
//!     → handlers.rs (decode dto.rs bodies, call operations)
//!     → response.rs (envelope, error → status)
//!     → Send to client
//! ```

pub mod dto;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{ApiError, ApiResponse};
pub use server::{AppState, HttpServer};
