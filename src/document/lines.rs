//! Line-oriented view of a configuration document.
//!
//! # Responsibilities
//! - Split text into an ordered sequence of lines
//! - Expose indentation width per line (leading spaces only)
//! - Render back to text with a single trailing newline
//!
//! # Design Decisions
//! - Lines are stored verbatim; trailing whitespace is never touched
//! - Tabs are ordinary characters, they do not count as indentation
//! - Values are immutable; every edit builds a new `Document`

use std::fmt;

/// An ordered sequence of text lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

/// Count of leading space characters.
pub fn indent_of(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ').count()
}

/// A line is blank when it holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

impl Document {
    /// Build a document from raw text. Never fails; empty text yields an empty document.
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
        // `split` yields one trailing "" for text ending in '\n' (and for "").
        if lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        Self { lines }
    }

    pub(crate) fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Render the document. Trailing blank lines are dropped and the result ends
    /// with exactly one newline (an empty document renders as "").
    pub fn to_text(&self) -> String {
        let end = self
            .lines
            .iter()
            .rposition(|l| !is_blank(l))
            .map_or(0, |i| i + 1);
        if end == 0 {
            return String::new();
        }
        let mut text = self.lines[..end].join("\n");
        text.push('\n');
        text
    }

    pub fn line_at(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// True if any single line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Copy of the document without leading and trailing blank lines.
    pub fn trim_blank_edges(&self) -> Self {
        let start = self.lines.iter().position(|l| !is_blank(l));
        let end = self.lines.iter().rposition(|l| !is_blank(l));
        match (start, end) {
            (Some(start), Some(end)) => Self::from_lines(self.lines[start..=end].to_vec()),
            _ => Self::default(),
        }
    }

    /// Insert `inserted` before line `at`. Blank lines directly above `at` are dropped.
    pub(crate) fn splice(&self, at: usize, inserted: Vec<String>) -> Self {
        let at = at.min(self.lines.len());
        let mut head_end = at;
        while head_end > 0 && is_blank(&self.lines[head_end - 1]) {
            head_end -= 1;
        }

        let mut lines = Vec::with_capacity(head_end + inserted.len() + (self.lines.len() - at));
        lines.extend_from_slice(&self.lines[..head_end]);
        lines.extend(inserted);
        lines.extend_from_slice(&self.lines[at..]);
        Self { lines }
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
