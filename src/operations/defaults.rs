//! Runtime defaults shared by every request.
//!
//! # Responsibilities
//! - Hold the current store coordinates and routing services
//! - Apply partial updates and restore the startup values
//!
//! # Design Decisions
//! - The snapshot is swapped atomically (`ArcSwap`); a request loads it once
//!   and uses that snapshot throughout, so concurrent updates never mix
//! - Updates build a new snapshot instead of mutating in place

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, RoutingConfig, StoreConfig};

/// One immutable view of the defaults.
#[derive(Debug, Clone, Default)]
pub struct Defaults {
    pub store: StoreConfig,
    pub routing: RoutingConfig,
}

impl From<&AppConfig> for Defaults {
    fn from(config: &AppConfig) -> Self {
        Self {
            store: config.store.clone(),
            routing: config.routing.clone(),
        }
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DefaultsUpdate {
    pub dokploy_api_key: Option<String>,
    pub api_domain: Option<String>,
    pub application_id: Option<String>,
    pub backend_service: Option<String>,
    pub frontend_service: Option<String>,
    pub single_service: Option<String>,
    pub single_service_port: Option<u16>,
    pub skip_middlewares: Option<bool>,
}

impl std::fmt::Debug for DefaultsUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultsUpdate")
            .field("dokploy_api_key", &self.dokploy_api_key.as_ref().map(|_| "<redacted>"))
            .field("api_domain", &self.api_domain)
            .field("application_id", &self.application_id)
            .field("backend_service", &self.backend_service)
            .field("frontend_service", &self.frontend_service)
            .field("single_service", &self.single_service)
            .field("single_service_port", &self.single_service_port)
            .field("skip_middlewares", &self.skip_middlewares)
            .finish()
    }
}

impl DefaultsUpdate {
    fn apply(self, mut defaults: Defaults) -> Defaults {
        if let Some(key) = self.dokploy_api_key {
            tracing::info!("Updating Dokploy API key");
            defaults.store.api_key = key;
        }
        if let Some(domain) = self.api_domain {
            tracing::info!(domain = %domain, "Updating API domain");
            defaults.store.api_domain = domain;
        }
        if let Some(app) = self.application_id {
            tracing::info!(app = %app, "Updating application id");
            defaults.store.application_id = app;
        }
        if let Some(service) = self.backend_service {
            tracing::info!(service = %service, "Updating backend service");
            defaults.routing.backend_service = service;
        }
        if let Some(service) = self.frontend_service {
            tracing::info!(service = %service, "Updating frontend service");
            defaults.routing.frontend_service = service;
        }
        if let Some(service) = self.single_service {
            tracing::info!(service = %service, "Updating single service");
            defaults.routing.single_service = Some(service).filter(|s| !s.trim().is_empty());
        }
        if let Some(port) = self.single_service_port {
            defaults.routing.single_service_port = Some(port);
        }
        if let Some(skip) = self.skip_middlewares {
            defaults.routing.skip_middlewares = skip;
        }
        defaults
    }
}

/// Swappable defaults plus the values loaded at startup.
#[derive(Debug)]
pub struct DefaultsHandle {
    current: ArcSwap<Defaults>,
    initial: Arc<Defaults>,
}

impl DefaultsHandle {
    pub fn new(initial: Defaults) -> Self {
        let initial = Arc::new(initial);
        Self {
            current: ArcSwap::new(initial.clone()),
            initial,
        }
    }

    pub fn load(&self) -> Arc<Defaults> {
        self.current.load_full()
    }

    pub fn update(&self, update: DefaultsUpdate) -> Arc<Defaults> {
        let next = Arc::new(update.apply(Defaults::clone(&self.current.load())));
        self.current.store(next.clone());
        next
    }

    /// Restore the startup values.
    pub fn reset(&self) -> Arc<Defaults> {
        self.current.store(self.initial.clone());
        tracing::info!("Defaults reset to startup values");
        self.initial.clone()
    }
}

/// Show at most the first four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().take(4).collect();
    if visible.len() == secret.len() {
        "****".to_string()
    } else {
        format!("{visible}...")
    }
}
