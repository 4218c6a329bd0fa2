//! Request and response bodies of the REST API (camelCase JSON).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::ServiceBinding;
use crate::operations::defaults::mask_secret;
use crate::operations::{Defaults, Overrides};

pub const SERVICE_NAME: &str = "Traefik Config Manager";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostRequest {
    pub hostname: Option<String>,
}

/// Hostname plus per-call overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomConfigRequest {
    pub hostname: Option<String>,
    #[serde(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub config: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub service_name: String,
    pub service_url: String,
    pub load_balancer: String,
}

impl From<ServiceBinding> for ServiceInfo {
    fn from(binding: ServiceBinding) -> Self {
        Self {
            service_name: binding.name,
            service_url: binding.target,
            load_balancer: binding.policy,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    pub fn up() -> Self {
        Self {
            status: "UP",
            timestamp: Utc::now(),
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Current defaults with the API key masked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsView {
    pub dokploy_api_key: String,
    pub api_domain: String,
    pub application_id: String,
    pub backend_service: String,
    pub frontend_service: String,
    pub single_service: Option<String>,
    pub single_service_port: Option<u16>,
    pub skip_middlewares: bool,
}

impl From<&Defaults> for DefaultsView {
    fn from(defaults: &Defaults) -> Self {
        Self {
            dokploy_api_key: mask_secret(&defaults.store.api_key),
            api_domain: defaults.store.api_domain.clone(),
            application_id: defaults.store.application_id.clone(),
            backend_service: defaults.routing.backend_service.clone(),
            frontend_service: defaults.routing.frontend_service.clone(),
            single_service: defaults.routing.single_service.clone(),
            single_service_port: defaults.routing.single_service_port,
            skip_middlewares: defaults.routing.skip_middlewares,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_request_flattens_overrides() {
        let request: CustomConfigRequest = serde_json::from_str(
            r#"{"hostname":"demo.example.com","applicationId":"app-2","servicePort":3000,"skipMiddlewares":true}"#,
        )
        .unwrap();
        assert_eq!(request.hostname.as_deref(), Some("demo.example.com"));
        assert_eq!(request.overrides.application_id.as_deref(), Some("app-2"));
        assert_eq!(request.overrides.service_port, Some(3000));
        assert_eq!(request.overrides.skip_middlewares, Some(true));
    }

    #[test]
    fn test_service_info_shape() {
        let info = ServiceInfo::from(ServiceBinding {
            name: "svc-a".into(),
            target: "http://host:8070".into(),
            policy: "roundrobin".into(),
        });
        assert_eq!(
            serde_json::to_value(info).unwrap(),
            serde_json::json!({
                "serviceName": "svc-a",
                "serviceUrl": "http://host:8070",
                "loadBalancer": "roundrobin"
            })
        );
    }

    #[test]
    fn test_defaults_view_masks_key() {
        let mut defaults = Defaults::default();
        defaults.store.api_key = "DokployAPIsecret".into();
        let view = DefaultsView::from(&defaults);
        assert_eq!(view.dokploy_api_key, "Dokp...");
    }
}
