//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (DOKPLOY_* environment overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → routing + store sections seed the runtime defaults
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the defaults snapshot changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::AppConfig;
pub use schema::CorsConfig;
pub use schema::RetryConfig;
pub use schema::RoutingConfig;
pub use schema::StoreConfig;
pub use schema::TimeoutConfig;
