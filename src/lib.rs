//! Traefik dynamic configuration manager.
//!
//! Adds and removes host routing blocks in a Traefik dynamic-configuration
//! document stored in Dokploy, without parsing or reformatting the document.

pub mod config;
pub mod document;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod operations;
pub mod resilience;
pub mod store;

pub use config::schema::AppConfig;
pub use document::{Document, Editor, Entity};
pub use http::HttpServer;
pub use operations::HostManager;
