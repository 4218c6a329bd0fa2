//! Read → edit → write cycles for host operations.

use std::sync::Arc;

use serde::Serialize;

use crate::document::{Document, Editor, Entity, Insertion, ServiceBinding};
use crate::observability::metrics;
use crate::operations::defaults::DefaultsHandle;
use crate::operations::overrides::Overrides;
use crate::operations::OperationError;
use crate::store::ConfigStore;

/// How a host operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Added,
    AlreadyExists,
    Deleted,
    NotFound,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Added => "added",
            Outcome::AlreadyExists => "already_exists",
            Outcome::Deleted => "deleted",
            Outcome::NotFound => "not_found",
        }
    }

    /// True when the store was written.
    pub fn changed(&self) -> bool {
        matches!(self, Outcome::Added | Outcome::Deleted)
    }
}

/// Result of an add or delete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostOperation {
    pub message: String,
    pub updated_config: String,
    pub hostname: String,
    #[serde(skip)]
    pub outcome: Outcome,
}

/// Host operations against one [`ConfigStore`].
#[derive(Clone)]
pub struct HostManager {
    store: Arc<dyn ConfigStore>,
    defaults: Arc<DefaultsHandle>,
    editor: Editor,
}

impl HostManager {
    pub fn new(store: Arc<dyn ConfigStore>, defaults: Arc<DefaultsHandle>, editor: Editor) -> Self {
        Self {
            store,
            defaults,
            editor,
        }
    }

    pub fn defaults(&self) -> &Arc<DefaultsHandle> {
        &self.defaults
    }

    pub async fn add_host(&self, hostname: &str, overrides: &Overrides) -> Result<HostOperation, OperationError> {
        let result = self.try_add_host(hostname, overrides).await;
        record("add", &result);
        result
    }

    pub async fn delete_host(&self, hostname: &str, overrides: &Overrides) -> Result<HostOperation, OperationError> {
        let result = self.try_delete_host(hostname, overrides).await;
        record("delete", &result);
        result
    }

    /// Current document text, as stored.
    pub async fn current_config(&self, overrides: &Overrides) -> Result<String, OperationError> {
        let target = overrides.resolve_target(&self.defaults.load());
        Ok(self.store.read(&target).await?)
    }

    pub async fn service_bindings(&self, overrides: &Overrides) -> Result<Vec<ServiceBinding>, OperationError> {
        let current = self.current_config(overrides).await?;
        let bindings = self.editor.bindings(&Document::from_text(&current));
        tracing::info!(count = bindings.len(), "Extracted service bindings");
        Ok(bindings)
    }

    async fn try_add_host(&self, hostname: &str, overrides: &Overrides) -> Result<HostOperation, OperationError> {
        let entity = Entity::new(hostname)?;
        let resolved = overrides.resolve(&self.defaults.load())?;
        let app = resolved.target.application_id.clone();
        tracing::info!(
            host = %entity,
            app = %app,
            separate = resolved.options.separate_frontend_backend,
            "Adding host"
        );

        let current = self.store.read(&resolved.target).await?;
        let doc = Document::from_text(&current);

        let updated = match self.editor.add_host(&doc, &entity, &resolved.targets, &resolved.options)? {
            Insertion::Inserted(updated) => updated,
            Insertion::AlreadyExists => {
                tracing::info!(host = %entity, app = %app, "Host already present, no update");
                return Ok(HostOperation {
                    message: format!(
                        "Host '{entity}' already exists in the configuration. No update needed."
                    ),
                    updated_config: current,
                    hostname: entity.host().to_string(),
                    outcome: Outcome::AlreadyExists,
                });
            }
        };

        let text = updated.to_text();
        let ack = self.store.write(&resolved.target, &text).await?;
        tracing::info!(host = %entity, app = %app, config_size = text.len(), "Host added");

        Ok(HostOperation {
            message: format!(
                "Host '{entity}' added successfully{}! Response: {ack}",
                custom_suffix(overrides)
            ),
            updated_config: text,
            hostname: entity.host().to_string(),
            outcome: Outcome::Added,
        })
    }

    async fn try_delete_host(&self, hostname: &str, overrides: &Overrides) -> Result<HostOperation, OperationError> {
        let entity = Entity::new(hostname)?;
        let target = overrides.resolve_target(&self.defaults.load());
        tracing::info!(host = %entity, app = %target.application_id, "Deleting host");

        let current = self.store.read(&target).await?;
        let doc = Document::from_text(&current);
        let updated = self.editor.remove_host(&doc, &entity);

        if updated == doc.trim_blank_edges() {
            tracing::info!(host = %entity, app = %target.application_id, "Host not present, nothing to delete");
            return Ok(HostOperation {
                message: format!("Host '{entity}' not found in configuration. Nothing to delete."),
                updated_config: current,
                hostname: entity.host().to_string(),
                outcome: Outcome::NotFound,
            });
        }

        let text = updated.to_text();
        let ack = self.store.write(&target, &text).await?;
        tracing::info!(host = %entity, app = %target.application_id, config_size = text.len(), "Host deleted");

        Ok(HostOperation {
            message: format!(
                "Host '{entity}' deleted successfully{}! Response: {ack}",
                custom_suffix(overrides)
            ),
            updated_config: text,
            hostname: entity.host().to_string(),
            outcome: Outcome::Deleted,
        })
    }
}

fn custom_suffix(overrides: &Overrides) -> &'static str {
    if overrides.is_empty() {
        ""
    } else {
        " with custom config"
    }
}

fn record(operation: &'static str, result: &Result<HostOperation, OperationError>) {
    match result {
        Ok(op) => metrics::record_host_operation(operation, op.outcome.as_str()),
        Err(e) => {
            tracing::error!(operation, error = %e, "Host operation failed");
            metrics::record_host_operation(operation, "error");
        }
    }
}
