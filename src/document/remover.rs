//! Removal of every block owned by an entity.
//!
//! # Responsibilities
//! - Walk the document once, tracking the enclosing section
//! - Drop lines from a block-start match until the next sibling or section
//! - Copy all other lines verbatim
//!
//! # State Machine
//! ```text
//! Outside ──header──▶ InSection ──block start──▶ InBlock
//!    ▲                    ▲                         │
//!    └────────────────────┴── line at indent ≤ member level (kept)
//! ```
//!
//! Block starts are decided by the [`MatchPolicy`]. A line that ends a block is
//! re-examined for a new block start before it is kept, so consecutive owned
//! blocks are removed together.

use crate::document::lines::{indent_of, is_blank, Document};
use crate::document::section::{NEST, ROUTERS};
use crate::document::tag::{Entity, EntityTag, MatchPolicy, PrefixPolicy};

/// Deepest indentation at which a line can be a section header.
const MAX_HEADER_INDENT: usize = NEST;

/// Member indentation assumed before any header has been seen.
const DEFAULT_MEMBER_INDENT: usize = ROUTERS.member_indent();

/// Scanner position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Outside,
    InSection {
        name: String,
        member_indent: usize,
    },
    InBlock {
        owner: EntityTag,
        section: Option<String>,
        member_indent: usize,
    },
}

impl ScanState {
    fn member_indent(&self) -> usize {
        match self {
            ScanState::Outside => DEFAULT_MEMBER_INDENT,
            ScanState::InSection { member_indent, .. } | ScanState::InBlock { member_indent, .. } => {
                *member_indent
            }
        }
    }

    fn section(&self) -> Option<&str> {
        match self {
            ScanState::Outside => None,
            ScanState::InSection { name, .. } => Some(name.as_str()),
            ScanState::InBlock { section, .. } => section.as_deref(),
        }
    }
}

/// What to do with the line just scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Keep,
    Drop,
}

/// Single-pass remover for one entity.
#[derive(Debug)]
pub struct Remover<'a> {
    entity: &'a Entity,
    policy: &'a dyn MatchPolicy,
    tag: EntityTag,
}

impl<'a> Remover<'a> {
    pub fn new(entity: &'a Entity, policy: &'a dyn MatchPolicy) -> Self {
        Self {
            entity,
            policy,
            tag: policy.tag(entity),
        }
    }

    /// One transition of the scanner.
    pub fn step(&self, state: ScanState, line: &str) -> (ScanState, LineAction) {
        if self.policy.starts_block(line, self.entity) {
            let next = ScanState::InBlock {
                owner: self.tag.clone(),
                section: state.section().map(str::to_owned),
                member_indent: state.member_indent(),
            };
            return (next, LineAction::Drop);
        }

        match state {
            ScanState::InBlock {
                owner,
                section,
                member_indent,
            } => {
                if is_blank(line) || indent_of(line) > member_indent {
                    let same = ScanState::InBlock {
                        owner,
                        section,
                        member_indent,
                    };
                    return (same, LineAction::Drop);
                }
                let resumed = match section {
                    Some(name) => ScanState::InSection {
                        name,
                        member_indent,
                    },
                    None => ScanState::Outside,
                };
                (track_section(resumed, line), LineAction::Keep)
            }
            other => (track_section(other, line), LineAction::Keep),
        }
    }

    /// Run the scanner over `doc`.
    pub fn run(&self, doc: &Document) -> Document {
        let mut state = ScanState::Outside;
        let mut kept = Vec::with_capacity(doc.len());
        let mut dropped = 0usize;
        let mut blocks = 0usize;

        for (index, line) in doc.lines().enumerate() {
            let opened = !matches!(state, ScanState::InBlock { .. });
            let (next, action) = self.step(state, line);
            if let (true, ScanState::InBlock { owner, section, .. }) = (opened, &next) {
                blocks += 1;
                tracing::debug!(
                    owner = %owner,
                    section = section.as_deref().unwrap_or("-"),
                    line = index,
                    "Dropping owned block"
                );
            }
            state = next;
            match action {
                LineAction::Keep => kept.push(line.to_string()),
                LineAction::Drop => dropped += 1,
            }
        }

        tracing::debug!(
            host = %self.entity,
            tag = %self.tag,
            total = doc.len(),
            blocks,
            dropped,
            "Removal scan complete"
        );
        Document::from_lines(kept).trim_blank_edges()
    }
}

/// Enter a new section when `line` is a header, otherwise stay put.
fn track_section(state: ScanState, line: &str) -> ScanState {
    let indent = indent_of(line);
    let trimmed = line.trim();
    let is_header = indent <= MAX_HEADER_INDENT
        && !trimmed.starts_with('#')
        && trimmed.len() > 1
        && trimmed.ends_with(':');

    if is_header {
        ScanState::InSection {
            name: trimmed.trim_end_matches(':').to_string(),
            member_indent: indent + NEST,
        }
    } else {
        state
    }
}

/// Remove every block owned by `entity` under the default policy.
///
/// Never fails. When nothing matches the result equals the input with leading
/// and trailing blank lines trimmed.
pub fn remove_entity(doc: &Document, entity: &Entity) -> Document {
    remove_entity_with(doc, entity, &PrefixPolicy)
}

pub fn remove_entity_with(doc: &Document, entity: &Entity, policy: &dyn MatchPolicy) -> Document {
    Remover::new(entity, policy).run(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tag::FullHostPolicy;
    use pretty_assertions::assert_eq;

    fn demo() -> Entity {
        Entity::new("demo.example.com").unwrap()
    }

    #[test]
    fn test_block_start_drops_line() {
        let e = demo();
        let remover = Remover::new(&e, &PrefixPolicy);
        let (state, action) = remover.step(ScanState::Outside, "    demo-router:");
        assert_eq!(action, LineAction::Drop);
        assert!(matches!(state, ScanState::InBlock { member_indent: 4, .. }));
    }

    #[test]
    fn test_block_start_records_policy_tag_as_owner() {
        let e = demo();
        let owner = |policy: &dyn MatchPolicy| match Remover::new(&e, policy).step(
            ScanState::InSection {
                name: "routers".into(),
                member_indent: 4,
            },
            "      rule: Host(`demo.example.com`)",
        ) {
            (ScanState::InBlock { owner, section, .. }, LineAction::Drop) => {
                assert_eq!(section.as_deref(), Some("routers"));
                owner
            }
            other => panic!("expected block start, got {other:?}"),
        };
        assert_eq!(owner(&PrefixPolicy), EntityTag::new("demo"));
        assert_eq!(owner(&FullHostPolicy), EntityTag::new("demo-example-com"));
    }

    #[test]
    fn test_deeper_and_blank_lines_dropped_in_block() {
        let e = demo();
        let remover = Remover::new(&e, &PrefixPolicy);
        let in_block = ScanState::InBlock {
            owner: EntityTag::new("demo"),
            section: Some("routers".into()),
            member_indent: 4,
        };
        assert_eq!(remover.step(in_block.clone(), "      service: x").1, LineAction::Drop);
        assert_eq!(remover.step(in_block.clone(), "").1, LineAction::Drop);
        assert_eq!(remover.step(in_block, "   ").1, LineAction::Drop);
    }

    #[test]
    fn test_sibling_ends_block_and_is_kept() {
        let e = demo();
        let remover = Remover::new(&e, &PrefixPolicy);
        let in_block = ScanState::InBlock {
            owner: EntityTag::new("demo"),
            section: Some("routers".into()),
            member_indent: 4,
        };
        let (state, action) = remover.step(in_block, "    other-router:");
        assert_eq!(action, LineAction::Keep);
        assert_eq!(
            state,
            ScanState::InSection {
                name: "routers".into(),
                member_indent: 4
            }
        );
    }

    #[test]
    fn test_shallower_header_ends_block() {
        let e = demo();
        let remover = Remover::new(&e, &PrefixPolicy);
        let in_block = ScanState::InBlock {
            owner: EntityTag::new("demo"),
            section: Some("routers".into()),
            member_indent: 4,
        };
        let (state, action) = remover.step(in_block, "  middlewares:");
        assert_eq!(action, LineAction::Keep);
        assert_eq!(
            state,
            ScanState::InSection {
                name: "middlewares".into(),
                member_indent: 4
            }
        );
    }

    #[test]
    fn test_header_tracking() {
        assert_eq!(
            track_section(ScanState::Outside, "http:"),
            ScanState::InSection {
                name: "http".into(),
                member_indent: 2
            }
        );
        assert_eq!(track_section(ScanState::Outside, "    name:"), ScanState::Outside);
        assert_eq!(track_section(ScanState::Outside, "  # note:"), ScanState::Outside);
    }

    #[test]
    fn test_removes_blocks_and_keeps_neighbours() {
        let doc = Document::from_text(
            "\
http:
  routers:
    keep-a:
      rule: Host(`a.example.com`)
    # Routes for demo.example.com
    demo-router:
      rule: Host(`demo.example.com`)
      service: demo-service

    demo-router-websecure:
      rule: Host(`demo.example.com`)
      tls:
        certResolver: letsencrypt

    keep-b:
      rule: Host(`b.example.com`)
  services:
    # Service for demo.example.com
    demo-service:
      loadBalancer:
        servers:
        - url: http://app:8080
",
        );
        let expected = "\
http:
  routers:
    keep-a:
      rule: Host(`a.example.com`)
    keep-b:
      rule: Host(`b.example.com`)
  services:
";
        assert_eq!(remove_entity(&doc, &demo()).to_text(), expected);
    }

    #[test]
    fn test_marker_in_hand_written_router() {
        let doc = Document::from_text(
            "  routers:\n    manual:\n      rule: Host(`demo.example.com`)\n      service: s\n    other:\n      rule: x\n",
        );
        assert_eq!(
            remove_entity(&doc, &demo()).to_text(),
            "  routers:\n    manual:\n    other:\n      rule: x\n"
        );
    }

    #[test]
    fn test_no_match_only_trims_blank_edges() {
        let doc = Document::from_text("\nhttp:\n  routers:\n    a:\n      rule: Host(`a.b`)\n\n");
        assert_eq!(
            remove_entity(&doc, &demo()).to_text(),
            "http:\n  routers:\n    a:\n      rule: Host(`a.b`)\n"
        );
    }

    #[test]
    fn test_strict_policy_spares_shared_prefix() {
        let doc = Document::from_text("  routers:\n    demo-router:\n      rule: Host(`demo.other.org`)\n");
        assert_eq!(remove_entity(&doc, &demo()).to_text(), "  routers:\n");
        assert_eq!(
            remove_entity_with(&doc, &demo(), &FullHostPolicy).to_text(),
            "  routers:\n    demo-router:\n      rule: Host(`demo.other.org`)\n"
        );
    }
}
