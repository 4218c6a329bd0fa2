//! Splicing generated blocks into a document.
//!
//! # Responsibilities
//! - Refuse to insert a host whose rule marker is already present
//! - Place router blocks before the first sibling section after `routers:`
//! - Place service blocks at the end of `services:`, creating it if needed
//!
//! # Design Decisions
//! - Lines outside the splice point are copied untouched and in order
//! - Blank lines directly above the splice point are dropped; exactly one
//!   blank line separates the new block from what follows
//! - Blank lines inside the block stay empty rather than gaining indentation

use crate::document::error::{EditError, EditResult};
use crate::document::lines::{is_blank, Document};
use crate::document::section::{
    find_header, find_insertion_point, require_header, section_end, HTTP, ROUTERS,
    ROUTER_SUCCESSORS, SERVICES,
};
use crate::document::tag::Entity;

/// Result of an insert attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    Inserted(Document),
    /// The host is already routed; the caller should treat this as a no-op.
    AlreadyExists,
}

impl Insertion {
    pub fn document(&self) -> Option<&Document> {
        match self {
            Insertion::Inserted(doc) => Some(doc),
            Insertion::AlreadyExists => None,
        }
    }
}

/// Splice a rendered router `block` for `entity` under `routers:`.
pub fn insert_block(doc: &Document, entity: &Entity, block: &str) -> EditResult<Insertion> {
    if doc.contains(&entity.host_marker()) {
        tracing::debug!(host = %entity, "Host marker already present");
        return Ok(Insertion::AlreadyExists);
    }

    let routers = require_header(doc, ROUTERS)?;
    let at = find_insertion_point(doc, routers, &ROUTER_SUCCESSORS);
    let lines = indent_block(block, ROUTERS.member_indent());

    tracing::debug!(host = %entity, routers, at, added = lines.len(), "Splicing router block");
    Ok(Insertion::Inserted(doc.splice(at, lines)))
}

/// Append a rendered service `block` to `services:`.
///
/// Without a `services:` section one is created at the end of `http:`; a
/// document without `http:` is malformed.
pub fn insert_service_block(doc: &Document, block: &str) -> EditResult<Document> {
    if let Some(services) = find_header(doc, SERVICES, 0) {
        let at = section_end(doc, services);
        let lines = indent_block(block, SERVICES.member_indent());
        tracing::debug!(services, at, "Appending service block");
        return Ok(doc.splice(at, lines));
    }

    let http = find_header(doc, HTTP, 0).ok_or(EditError::MalformedDocument { missing: HTTP.name })?;
    let at = section_end(doc, http);
    let mut lines = vec![format!("{}{}:", " ".repeat(SERVICES.indent), SERVICES.name)];
    lines.extend(indent_block(block, SERVICES.member_indent()));

    tracing::debug!(http, at, "Creating services section");
    Ok(doc.splice(at, lines))
}

/// Shift every non-blank line right by `indent` spaces and end with exactly
/// one blank separator line.
fn indent_block(block: &str, indent: usize) -> Vec<String> {
    let pad = " ".repeat(indent);
    let mut lines: Vec<String> = block
        .lines()
        .map(|line| {
            if is_blank(line) {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect();

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.push(String::new());
    lines
}
