//! Per-call overrides and their resolution against the defaults.
//!
//! Precedence when choosing the routing plan:
//! 1. `serviceName` given: one shared service (port from `servicePort`, else 8080)
//! 2. `routing.single_service` configured: one shared service
//! 3. otherwise separate backend and frontend services
//!
//! Blank strings count as absent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::generator::DEFAULT_PORT;
use crate::document::{RenderOptions, ServiceTargets};
use crate::operations::defaults::Defaults;
use crate::operations::OperationError;
use crate::store::StoreTarget;

#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overrides {
    pub dokploy_api_key: Option<String>,
    pub api_domain: Option<String>,
    pub application_id: Option<String>,
    pub backend_service: Option<String>,
    pub frontend_service: Option<String>,
    pub service_name: Option<String>,
    pub service_port: Option<u16>,
    pub skip_middlewares: Option<bool>,
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("dokploy_api_key", &self.dokploy_api_key.as_ref().map(|_| "<redacted>"))
            .field("api_domain", &self.api_domain)
            .field("application_id", &self.application_id)
            .field("backend_service", &self.backend_service)
            .field("frontend_service", &self.frontend_service)
            .field("service_name", &self.service_name)
            .field("service_port", &self.service_port)
            .field("skip_middlewares", &self.skip_middlewares)
            .finish()
    }
}

/// Everything one host operation needs, with no remaining fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub target: StoreTarget,
    pub targets: ServiceTargets,
    pub options: RenderOptions,
}

impl Overrides {
    /// True when no field would change the defaults.
    pub fn is_empty(&self) -> bool {
        [
            &self.dokploy_api_key,
            &self.api_domain,
            &self.application_id,
            &self.backend_service,
            &self.frontend_service,
            &self.service_name,
        ]
        .iter()
        .all(|value| non_blank(value).is_none())
            && self.service_port.is_none()
            && self.skip_middlewares.is_none()
    }

    /// Store coordinates only; enough for read-only calls.
    pub fn resolve_target(&self, defaults: &Defaults) -> StoreTarget {
        StoreTarget::new(
            pick(&self.api_domain, &defaults.store.api_domain),
            pick(&self.dokploy_api_key, &defaults.store.api_key),
            pick(&self.application_id, &defaults.store.application_id),
        )
    }

    pub fn resolve(&self, defaults: &Defaults) -> Result<ResolvedRequest, OperationError> {
        let routing = &defaults.routing;
        let mut options = RenderOptions {
            skip_middlewares: self.skip_middlewares.unwrap_or(false) || routing.skip_middlewares,
            cert_resolver: routing.cert_resolver.clone(),
            redirect_middleware: routing.redirect_middleware.clone(),
            ..RenderOptions::default()
        };

        let single = non_blank(&self.service_name)
            .map(|name| (name, self.service_port.unwrap_or(DEFAULT_PORT)))
            .or_else(|| {
                non_blank(&routing.single_service)
                    .map(|name| (name, self.service_port.unwrap_or(routing.single_port())))
            });

        let targets = match single {
            Some((service, port)) => {
                options.separate_frontend_backend = false;
                options.port = port;
                ServiceTargets::shared(service)
            }
            None => {
                let backend = pick(&self.backend_service, &routing.backend_service);
                let frontend = pick(&self.frontend_service, &routing.frontend_service);
                if backend.is_empty() || frontend.is_empty() {
                    return Err(OperationError::InvalidRequest(
                        "Backend and frontend services are required".to_string(),
                    ));
                }
                if backend == frontend {
                    options.separate_frontend_backend = false;
                    ServiceTargets::shared(backend)
                } else {
                    ServiceTargets::new(backend, frontend)
                }
            }
        };

        Ok(ResolvedRequest {
            target: self.resolve_target(defaults),
            targets,
            options,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn pick(value: &Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or(default).to_string()
}
