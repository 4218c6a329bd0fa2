//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (CORS, request ID, tracing, timeout)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, CorsConfig};
use crate::document::Editor;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::shutdown_signal;
use crate::operations::{Defaults, DefaultsHandle, HostManager};
use crate::store::ConfigStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub hosts: HostManager,
}

/// HTTP server for the management API.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server backed by `store`.
    pub fn new(config: AppConfig, store: Arc<dyn ConfigStore>) -> Self {
        let defaults = Arc::new(DefaultsHandle::new(Defaults::from(&config)));
        let editor = Editor::with_strict_matching(config.routing.strict_matching);
        let state = AppState {
            hosts: HostManager::new(store, defaults, editor),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run top to bottom on the way in: CORS, request id, trace, timeout.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let traefik = Router::new()
            .route("/add-host", post(handlers::add_host))
            .route("/delete-host", delete(handlers::delete_host))
            .route("/config", get(handlers::get_config))
            .route("/services", get(handlers::get_services))
            .route("/add-host-custom", post(handlers::add_host_custom))
            .route("/delete-host-custom", delete(handlers::delete_host_custom))
            .route("/config-custom", post(handlers::get_config_custom))
            .route("/services-custom", post(handlers::get_services_custom));

        let defaults = Router::new()
            .route("/current", get(handlers::current_defaults))
            .route("/update", put(handlers::update_defaults))
            .route("/reset", post(handlers::reset_defaults));

        // Applied innermost first so each layer sees an axum `Body`; the
        // resulting order on the way in is CORS, request id, trace, timeout.
        Router::new()
            .nest("/api/traefik", traefik)
            .nest("/api/config", defaults)
            .route("/api/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(cors_layer(&config.cors))
    }

    /// The fully layered router, for serving elsewhere or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
        Method::HEAD,
        Method::PATCH,
    ];

    let origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(Any)
}
