//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::generator::{DEFAULT_CERT_RESOLVER, DEFAULT_PORT, DEFAULT_REDIRECT_MIDDLEWARE};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeouts for inbound requests and store calls.
    pub timeouts: TimeoutConfig,

    /// Where the Traefik document lives.
    pub store: StoreConfig,

    /// How generated routers are wired.
    pub routing: RoutingConfig,

    /// Retry policy for store reads.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub cors: CorsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Store connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time for one request in seconds, inbound and outbound.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 30,
            request_secs: 60,
        }
    }
}

/// Coordinates of the remote config store.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the Dokploy API (e.g., "https://dokploy.example.com").
    pub api_domain: String,

    /// Secret sent as `x-api-key`.
    pub api_key: String,

    /// Application whose Traefik document is edited.
    pub application_id: String,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_domain", &self.api_domain)
            .field("api_key", &"<redacted>")
            .field("application_id", &self.application_id)
            .finish()
    }
}

/// Routing defaults applied when a call carries no overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Service receiving `/api` traffic.
    pub backend_service: String,

    /// Service receiving everything else.
    pub frontend_service: String,

    /// One service for all traffic; switches to single-service mode.
    pub single_service: Option<String>,

    /// Port of `single_service` (default 8080).
    pub single_service_port: Option<u16>,

    /// Attach entry points instead of the redirect middleware.
    pub skip_middlewares: bool,

    pub cert_resolver: String,

    pub redirect_middleware: String,

    /// Tag blocks by the full hostname rather than its first label.
    pub strict_matching: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            backend_service: String::new(),
            frontend_service: String::new(),
            single_service: None,
            single_service_port: None,
            skip_middlewares: false,
            cert_resolver: DEFAULT_CERT_RESOLVER.to_string(),
            redirect_middleware: DEFAULT_REDIRECT_MIDDLEWARE.to_string(),
            strict_matching: false,
        }
    }
}

impl RoutingConfig {
    pub fn single_port(&self) -> u16 {
        self.single_service_port.unwrap_or(DEFAULT_PORT)
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, the first one included.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Cross-origin policy for the REST API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}
