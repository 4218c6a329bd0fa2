//! Per-call store coordinates.

use std::fmt;

use url::Url;

use crate::config::StoreConfig;
use crate::store::StoreError;

const READ_PATH: &str = "/api/application.readTraefikConfig";
const UPDATE_PATH: &str = "/api/application.updateTraefikConfig";

/// Which application's document to read or write, and how to authenticate.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct StoreTarget {
    pub api_domain: String,
    pub api_key: String,
    pub application_id: String,
}

impl StoreTarget {
    pub fn new(
        api_domain: impl Into<String>,
        api_key: impl Into<String>,
        application_id: impl Into<String>,
    ) -> Self {
        Self {
            api_domain: api_domain.into(),
            api_key: api_key.into(),
            application_id: application_id.into(),
        }
    }

    /// Read endpoint including the `applicationId` query parameter.
    pub fn read_url(&self) -> Result<Url, StoreError> {
        let mut url = self.endpoint(READ_PATH)?;
        url.query_pairs_mut()
            .append_pair("applicationId", &self.application_id);
        Ok(url)
    }

    pub fn update_url(&self) -> Result<Url, StoreError> {
        self.endpoint(UPDATE_PATH)
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        if self.application_id.trim().is_empty() {
            return Err(StoreError::InvalidTarget("application id is empty".to_string()));
        }
        let domain = self.api_domain.trim().trim_end_matches('/');
        if domain.is_empty() {
            return Err(StoreError::InvalidTarget("API domain is empty".to_string()));
        }
        Url::parse(&format!("{domain}{path}"))
            .map_err(|e| StoreError::InvalidTarget(format!("'{domain}' is not a valid URL: {e}")))
    }
}

impl From<&StoreConfig> for StoreTarget {
    fn from(config: &StoreConfig) -> Self {
        Self::new(&config.api_domain, &config.api_key, &config.application_id)
    }
}

impl fmt::Debug for StoreTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreTarget")
            .field("api_domain", &self.api_domain)
            .field("api_key", &"<redacted>")
            .field("application_id", &self.application_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let target = StoreTarget::new("https://dp.example.com/", "k", "app 1");
        assert_eq!(
            target.read_url().unwrap().as_str(),
            "https://dp.example.com/api/application.readTraefikConfig?applicationId=app+1"
        );
        assert_eq!(
            target.update_url().unwrap().as_str(),
            "https://dp.example.com/api/application.updateTraefikConfig"
        );
    }

    #[test]
    fn test_invalid_targets() {
        assert!(matches!(
            StoreTarget::new("", "k", "app").read_url(),
            Err(StoreError::InvalidTarget(_))
        ));
        assert!(matches!(
            StoreTarget::new("https://dp.example.com", "k", " ").update_url(),
            Err(StoreError::InvalidTarget(_))
        ));
        assert!(matches!(
            StoreTarget::new("not a domain", "k", "app").update_url(),
            Err(StoreError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let target = StoreTarget::new("https://dp.example.com", "top-secret", "app");
        assert!(!format!("{target:?}").contains("top-secret"));
    }
}
