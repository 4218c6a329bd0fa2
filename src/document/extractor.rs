//! Service binding extraction from the `services:` section.
//!
//! The document format carries no load-balancing policy, so every binding
//! reports [`DEFAULT_POLICY`].

use serde::{Deserialize, Serialize};

use crate::document::lines::{indent_of, Document};
use crate::document::section::NEST;

pub const DEFAULT_POLICY: &str = "roundrobin";

/// Member keys that belong to a service body, never service names.
const RESERVED_KEYS: [&str; 4] = ["loadBalancer", "servers", "middlewares", "passHostHeader"];

const URL_ITEM: &str = "- url:";

/// One named service endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBinding {
    pub name: String,
    pub target: String,
    pub policy: String,
}

impl ServiceBinding {
    fn new(name: String, target: String) -> Self {
        Self {
            name,
            target,
            policy: DEFAULT_POLICY.to_string(),
        }
    }
}

/// Extractor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractState {
    Outside,
    InServices {
        header_indent: usize,
    },
    InServiceBody {
        header_indent: usize,
        name: String,
        target: Option<String>,
    },
}

impl ExtractState {
    /// Complete pending binding, if any.
    fn flush(self) -> Option<ServiceBinding> {
        match self {
            ExtractState::InServiceBody {
                name,
                target: Some(target),
                ..
            } => Some(ServiceBinding::new(name, target)),
            _ => None,
        }
    }
}

/// One transition; returns the next state and a binding completed by this line.
pub fn step(state: ExtractState, line: &str) -> (ExtractState, Option<ServiceBinding>) {
    let trimmed = line.trim();
    let indent = indent_of(line);

    let header_indent = match &state {
        ExtractState::Outside => {
            if trimmed == "services:" {
                return (ExtractState::InServices { header_indent: indent }, None);
            }
            return (state, None);
        }
        ExtractState::InServices { header_indent } | ExtractState::InServiceBody { header_indent, .. } => {
            *header_indent
        }
    };

    if trimmed.is_empty() {
        return (state, None);
    }

    // Back at or above the header: the section is over.
    if indent <= header_indent {
        let emitted = state.flush();
        let (next, _) = step(ExtractState::Outside, line);
        return (next, emitted);
    }

    if indent == header_indent + NEST {
        let emitted = state.flush();
        let next = match service_name(trimmed) {
            Some(name) => ExtractState::InServiceBody {
                header_indent,
                name: name.to_string(),
                target: None,
            },
            None => ExtractState::InServices { header_indent },
        };
        return (next, emitted);
    }

    match state {
        ExtractState::InServiceBody {
            header_indent,
            name,
            target,
        } => {
            let target = match trimmed.strip_prefix(URL_ITEM) {
                Some(value) => Some(unquote(value.trim()).to_string()),
                None => target,
            };
            let next = ExtractState::InServiceBody {
                header_indent,
                name,
                target,
            };
            (next, None)
        }
        other => (other, None),
    }
}

/// Bindings in document order; names are unique, first occurrence wins.
pub fn extract_bindings(doc: &Document) -> Vec<ServiceBinding> {
    let mut state = ExtractState::Outside;
    let mut bindings: Vec<ServiceBinding> = Vec::new();

    for line in doc.lines() {
        let (next, emitted) = step(state, line);
        state = next;
        if let Some(binding) = emitted {
            push(binding, &mut bindings);
        }
    }
    if let Some(binding) = state.flush() {
        push(binding, &mut bindings);
    }

    bindings
}

fn push(binding: ServiceBinding, bindings: &mut Vec<ServiceBinding>) {
    if bindings.iter().any(|b| b.name == binding.name) {
        tracing::debug!(name = %binding.name, "Duplicate service name ignored");
        return;
    }
    tracing::debug!(name = %binding.name, target = %binding.target, "Service binding found");
    bindings.push(binding);
}

fn service_name(trimmed: &str) -> Option<&str> {
    let name = trimmed.strip_suffix(':')?;
    if name.is_empty() || RESERVED_KEYS.iter().any(|key| trimmed.contains(key)) {
        return None;
    }
    Some(name)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
