//! Line-oriented editing of Traefik dynamic configuration documents.
//!
//! # Data Flow
//! ```text
//! raw text
//!     → lines.rs (Document: ordered lines, indentation helpers)
//!     → tag.rs (Entity + MatchPolicy → EntityTag)
//!
//! add host:
//!     generator.rs (router block, optional service block)
//!     → section.rs (locate routers:/services: and the splice point)
//!     → inserter.rs (splice, or AlreadyExists)
//!
//! delete host:
//!     remover.rs (single pass, drop every block the policy claims)
//!
//! list services:
//!     extractor.rs (services: → Vec<ServiceBinding>)
//! ```
//!
//! # Design Decisions
//! - The document is never parsed as YAML; comments, ordering and unknown
//!   sections survive every edit byte-for-byte
//! - Indentation is counted in spaces only; tabs are content
//! - Every function is pure: input text in, new text out

pub mod error;
pub mod extractor;
pub mod generator;
pub mod inserter;
pub mod lines;
pub mod remover;
pub mod section;
pub mod tag;

use std::sync::Arc;

pub use error::{EditError, EditResult};
pub use extractor::{extract_bindings, ServiceBinding};
pub use generator::{RenderOptions, ServiceTargets};
pub use inserter::Insertion;
pub use lines::Document;
pub use tag::{Entity, EntityTag, FullHostPolicy, MatchPolicy, PrefixPolicy};

/// Host-level edits under one [`MatchPolicy`].
#[derive(Debug, Clone)]
pub struct Editor {
    policy: Arc<dyn MatchPolicy>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Arc::new(PrefixPolicy))
    }
}

impl Editor {
    pub fn new(policy: Arc<dyn MatchPolicy>) -> Self {
        Self { policy }
    }

    /// Pick the policy from the strict-matching switch.
    pub fn with_strict_matching(strict: bool) -> Self {
        if strict {
            Self::new(Arc::new(FullHostPolicy))
        } else {
            Self::default()
        }
    }

    pub fn policy(&self) -> &dyn MatchPolicy {
        self.policy.as_ref()
    }

    /// Route `entity` to `targets`.
    ///
    /// In shared mode the backing service definition is added to `services:`
    /// as well.
    pub fn add_host(
        &self,
        doc: &Document,
        entity: &Entity,
        targets: &ServiceTargets,
        options: &RenderOptions,
    ) -> EditResult<Insertion> {
        let block = generator::render_block_with(entity, targets, options, self.policy());
        let inserted = match inserter::insert_block(doc, entity, &block)? {
            Insertion::Inserted(doc) => doc,
            Insertion::AlreadyExists => return Ok(Insertion::AlreadyExists),
        };

        if options.separate_frontend_backend {
            return Ok(Insertion::Inserted(inserted));
        }

        let service = generator::render_service_block_with(entity, targets, options, self.policy());
        let with_service = inserter::insert_service_block(&inserted, &service)?;
        Ok(Insertion::Inserted(with_service))
    }

    /// Drop every block owned by `entity`.
    pub fn remove_host(&self, doc: &Document, entity: &Entity) -> Document {
        remover::remove_entity_with(doc, entity, self.policy())
    }

    pub fn bindings(&self, doc: &Document) -> Vec<ServiceBinding> {
        extract_bindings(doc)
    }
}
