//! In-process [`ConfigStore`] keyed by application id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{ConfigStore, StoreError, StoreTarget};

const ACK: &str = "{\"success\":true}";

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one application's document.
    pub fn with_document(application_id: impl Into<String>, document: impl Into<String>) -> Self {
        let mut store = Self::new();
        store
            .documents
            .get_mut()
            .insert(application_id.into(), document.into());
        store
    }

    pub async fn document(&self, application_id: &str) -> Option<String> {
        self.documents.read().await.get(application_id).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn read(&self, target: &StoreTarget) -> Result<String, StoreError> {
        self.documents
            .read()
            .await
            .get(&target.application_id)
            .cloned()
            .ok_or_else(|| StoreError::Status {
                operation: "fetch",
                status: 404,
                body: format!("application '{}' not found", target.application_id),
            })
    }

    async fn write(&self, target: &StoreTarget, document: &str) -> Result<String, StoreError> {
        self.documents
            .write()
            .await
            .insert(target.application_id.clone(), document.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(ACK.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_write() {
        let store = MemoryStore::with_document("app", "http:\n");
        let target = StoreTarget::new("http://unused", "k", "app");

        assert_eq!(store.read(&target).await.unwrap(), "http:\n");
        store.write(&target, "http:\n  routers:\n").await.unwrap();
        assert_eq!(store.document("app").await.unwrap(), "http:\n  routers:\n");
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_application() {
        let store = MemoryStore::new();
        let target = StoreTarget::new("http://unused", "k", "missing");
        assert!(matches!(
            store.read(&target).await,
            Err(StoreError::Status { status: 404, .. })
        ));
    }
}
