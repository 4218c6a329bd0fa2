//! Entities, their tags, and the rules that recognise their blocks.
//!
//! # Responsibilities
//! - Normalise an entity identifier (hostname)
//! - Derive the `EntityTag` used to name generated blocks
//! - Decide whether a line opens a block owned by an entity
//!
//! # Design Decisions
//! - Tag derivation and block recognition live behind [`MatchPolicy`] so the
//!   generator and the remover always agree on names
//! - [`PrefixPolicy`] is the default: the tag is the text before the first `.`,
//!   so `demo.a.com` and `demo.b.com` share a tag and their generated blocks
//!   are indistinguishable to the name fallback
//! - [`FullHostPolicy`] derives the tag from the whole hostname instead

use std::fmt;

use crate::document::error::{EditError, EditResult};

/// Suffixes appended to a tag when naming generated routers and services.
pub const BACKEND_ROUTER_SUFFIX: &str = "-backend-router";
pub const FRONTEND_ROUTER_SUFFIX: &str = "-frontend-router";
pub const ROUTER_SUFFIX: &str = "-router";
pub const SERVICE_SUFFIX: &str = "-service";

const GENERATED_SUFFIXES: [&str; 4] = [
    BACKEND_ROUTER_SUFFIX,
    FRONTEND_ROUTER_SUFFIX,
    ROUTER_SUFFIX,
    SERVICE_SUFFIX,
];

/// Header comments written above generated blocks.
pub const BACKEND_COMMENT: &str = "# Backend API routes for ";
pub const FRONTEND_COMMENT: &str = "# Frontend routes for ";
pub const SHARED_COMMENT: &str = "# Routes for ";
pub const SERVICE_COMMENT: &str = "# Service for ";

const HEADER_COMMENTS: [&str; 4] = [
    BACKEND_COMMENT,
    FRONTEND_COMMENT,
    SHARED_COMMENT,
    SERVICE_COMMENT,
];

/// The logical owner of generated blocks: a hostname.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    host: String,
}

impl Entity {
    /// Trim and accept any non-empty identifier.
    pub fn new(host: impl AsRef<str>) -> EditResult<Self> {
        let host = host.as_ref().trim();
        if host.is_empty() {
            return Err(EditError::EmptyEntity);
        }
        Ok(Self {
            host: host.to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Text before the first `.`, or the whole identifier when there is none.
    pub fn prefix(&self) -> &str {
        self.host.split('.').next().unwrap_or(&self.host)
    }

    /// The literal a router rule uses to match this host.
    pub fn host_marker(&self) -> String {
        format!("Host(`{}`)", self.host)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}

/// Name stem shared by every block generated for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag(String);

impl EntityTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<tag><suffix>`, e.g. `demo-router`.
    pub fn name(&self, suffix: &str) -> String {
        format!("{}{}", self.0, suffix)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag derivation plus block-start recognition.
pub trait MatchPolicy: Send + Sync + fmt::Debug {
    /// Tag used to name and later recognise the entity's generated blocks.
    fn tag(&self, entity: &Entity) -> EntityTag;

    /// True if `line` opens a block owned by `entity`.
    fn starts_block(&self, line: &str, entity: &Entity) -> bool {
        line.contains(&entity.host_marker())
            || is_header_comment(line, entity)
            || is_generated_name(line, &self.tag(entity))
    }
}

/// Default policy: the tag is the hostname's first label.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixPolicy;

impl MatchPolicy for PrefixPolicy {
    fn tag(&self, entity: &Entity) -> EntityTag {
        EntityTag::new(entity.prefix())
    }
}

/// Stricter policy: the tag is the whole hostname with dots replaced by dashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullHostPolicy;

impl MatchPolicy for FullHostPolicy {
    fn tag(&self, entity: &Entity) -> EntityTag {
        EntityTag::new(entity.host().replace('.', "-"))
    }
}

/// `# Backend API routes for <host>` and friends, exact after trimming.
pub fn is_header_comment(line: &str, entity: &Entity) -> bool {
    let trimmed = line.trim();
    HEADER_COMMENTS.iter().any(|comment| {
        trimmed
            .strip_prefix(comment)
            .is_some_and(|rest| rest == entity.host())
    })
}

/// Line begins, after trimming, with `<tag>` plus a generated-name suffix.
pub fn is_generated_name(line: &str, tag: &EntityTag) -> bool {
    let Some(rest) = line.trim().strip_prefix(tag.as_str()) else {
        return false;
    };
    GENERATED_SUFFIXES.iter().any(|suffix| rest.starts_with(suffix))
}
