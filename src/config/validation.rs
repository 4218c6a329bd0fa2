//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, attempts > 0)
//! - Check that a routing plan can always be resolved
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Store coordinates may be blank; callers can supply them per request

use std::fmt;

use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than zero"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than zero"));
    }

    if !config.store.api_domain.is_empty() && Url::parse(&config.store.api_domain).is_err() {
        errors.push(ValidationError::new(
            "store.api_domain",
            format!("'{}' is not a valid URL", config.store.api_domain),
        ));
    }

    let routing = &config.routing;
    match &routing.single_service {
        Some(service) if service.trim().is_empty() => {
            errors.push(ValidationError::new("routing.single_service", "must not be blank"));
        }
        Some(_) => {}
        None => {
            if routing.backend_service.trim().is_empty() {
                errors.push(ValidationError::new(
                    "routing.backend_service",
                    "required unless routing.single_service is set",
                ));
            }
            if routing.frontend_service.trim().is_empty() {
                errors.push(ValidationError::new(
                    "routing.frontend_service",
                    "required unless routing.single_service is set",
                ));
            }
        }
    }
    if routing.single_service_port == Some(0) {
        errors.push(ValidationError::new("routing.single_service_port", "must be greater than zero"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
