//! Section lookup by literal header lines.
//!
//! # Responsibilities
//! - Find a section header (`<indent><name>:`) at or after a given line
//! - Pick the insertion point before the earliest of several successor headers
//! - Compute where a section ends
//!
//! # Design Decisions
//! - Headers are matched textually at a fixed indentation; there is no parse tree
//! - Sections under `http:` sit at two spaces, top-level sections at zero
//! - Missing successors are not an error: end-of-document is a valid point

use crate::document::error::{EditError, EditResult};
use crate::document::lines::{indent_of, is_blank, Document};

/// Indentation step between a section header and its members.
pub const NEST: usize = 2;

/// A section header as it appears in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    pub name: &'static str,
    pub indent: usize,
}

impl SectionHeader {
    /// Section nested under `http:` (two-space indent).
    pub const fn nested(name: &'static str) -> Self {
        Self { name, indent: NEST }
    }

    /// Section at column zero.
    pub const fn top_level(name: &'static str) -> Self {
        Self { name, indent: 0 }
    }

    /// Indentation of the section's direct members.
    pub const fn member_indent(&self) -> usize {
        self.indent + NEST
    }

    /// True if `line` is exactly this header, allowing trailing content after
    /// the colon only when separated by whitespace (`  middlewares: {}`).
    pub fn matches(&self, line: &str) -> bool {
        if indent_of(line) != self.indent {
            return false;
        }
        let Some(rest) = line[self.indent..].strip_prefix(self.name) else {
            return false;
        };
        match rest.strip_prefix(':') {
            Some(after) => after.is_empty() || after.starts_with(char::is_whitespace),
            None => false,
        }
    }
}

pub const HTTP: SectionHeader = SectionHeader::top_level("http");
pub const ROUTERS: SectionHeader = SectionHeader::nested("routers");
pub const SERVICES: SectionHeader = SectionHeader::nested("services");
pub const MIDDLEWARES: SectionHeader = SectionHeader::nested("middlewares");

/// Sections that may follow `routers:`, in priority order.
pub const ROUTER_SUCCESSORS: [SectionHeader; 6] = [
    MIDDLEWARES,
    SERVICES,
    SectionHeader::top_level("entryPoints"),
    SectionHeader::top_level("certificatesResolvers"),
    SectionHeader::top_level("api"),
    SectionHeader::top_level("log"),
];

/// First line at or after `from_line` matching `header`.
pub fn find_header(doc: &Document, header: SectionHeader, from_line: usize) -> Option<usize> {
    doc.lines()
        .enumerate()
        .skip(from_line)
        .find(|(_, line)| header.matches(line))
        .map(|(i, _)| i)
}

/// First two-space-indented `<name>:` header at or after `from_line`.
pub fn find_section(doc: &Document, name: &'static str, from_line: usize) -> Option<usize> {
    find_header(doc, SectionHeader::nested(name), from_line)
}

/// Like [`find_header`] but absence means the document is malformed.
pub fn require_header(doc: &Document, header: SectionHeader) -> EditResult<usize> {
    match find_header(doc, header, 0) {
        Some(line) => {
            tracing::debug!(section = header.name, line, "Found section");
            Ok(line)
        }
        None => Err(EditError::MalformedDocument {
            missing: header.name,
        }),
    }
}

/// Line before which new content for the section at `after_line` goes.
///
/// Whichever candidate header appears first after `after_line` wins,
/// regardless of its position in `candidates`. Without any, end-of-document.
pub fn find_insertion_point(
    doc: &Document,
    after_line: usize,
    candidates: &[SectionHeader],
) -> usize {
    let found = doc
        .lines()
        .enumerate()
        .skip(after_line + 1)
        .find(|(_, line)| candidates.iter().any(|c| c.matches(line)));

    match found {
        Some((index, line)) => {
            tracing::debug!(line = index, header = line.trim(), "Found next section");
            index
        }
        None => {
            tracing::debug!("No next section found, inserting at end of document");
            doc.len()
        }
    }
}

/// Index just past the section whose header is at `header_line`: the next
/// non-blank line indented at or above the header, or end-of-document.
pub fn section_end(doc: &Document, header_line: usize) -> usize {
    let header_indent = doc.line_at(header_line).map_or(0, indent_of);
    doc.lines()
        .enumerate()
        .skip(header_line + 1)
        .find(|(_, line)| !is_blank(line) && indent_of(line) <= header_indent)
        .map_or(doc.len(), |(i, _)| i)
}
