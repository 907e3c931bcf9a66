//! Detail scanner
//!
//! Table cells in the export hold "detail blocks": free text of the form
//!
//! ```text
//! Object Class: Number Comment: counts retries Used by: <a>Main</a> , <a>Retry</a>
//! ```
//!
//! where keys and values are separate text runs and values are often hyperlinks. The scanner
//! is a small state machine over the ordered text fragments of a cell:
//!
//! - a fragment that *is* a key (see [`KeyStyle`]) commits the pending pair, if any, and opens
//!   a new one
//! - any other fragment seen while a key is pending is appended to its value
//! - fragments before the first key are ignored
//! - the last pending pair is committed at the end of input
//!
//! A key followed directly by another key yields an empty value, which is kept. Duplicate
//! keys overwrite the earlier value but keep its position.

use crate::dom::{Fragment, NodeRef};
use crate::reference::Reference;
use indexmap::IndexMap;

/// Ordered key → plain value mapping.
pub type DetailMap = IndexMap<String, String>;

/// Ordered key → reference token mapping.
pub type RefMap = IndexMap<String, Reference>;

/// Ordered key → scanned detail mapping.
pub type Details = IndexMap<String, Detail>;

/// How a key fragment is recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    /// `"Key: "`, but not `"Key:: "`.
    Colon,
    /// `"Key = "`.
    Equals,
}

impl KeyStyle {
    pub fn is_key(&self, text: &str) -> bool {
        match self {
            KeyStyle::Colon => text.ends_with(": ") && !text.ends_with(":: "),
            KeyStyle::Equals => text.ends_with(" = "),
        }
    }

    pub(crate) fn clean_key(&self, text: &str) -> String {
        let separator = match self {
            KeyStyle::Colon => ':',
            KeyStyle::Equals => '=',
        };
        text.trim_matches(|c: char| c.is_whitespace() || c == separator || c == ',')
            .to_string()
    }
}

/// Strip whitespace and list commas from both ends of a value.
pub fn clean_value(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == ',')
}

/// The value side of one scanned pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detail {
    /// The value's text fragments, each with the link wrapping it.
    pub parts: Vec<Reference>,
}

impl Detail {
    /// The full value text, trimmed of whitespace and commas.
    pub fn value(&self) -> String {
        let raw: String = self.parts.iter().map(|part| part.name.as_str()).collect();
        clean_value(&raw).to_string()
    }

    /// Destination of the first link inside the value.
    pub fn link(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| part.target.as_deref())
    }

    /// The value as one reference token.
    pub fn reference(&self) -> Reference {
        Reference::new(self.value(), self.link())
    }

    /// The value split on commas, each item paired with the link whose text matches it.
    pub fn references(&self) -> Vec<Reference> {
        self.value()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                let target = self
                    .parts
                    .iter()
                    .find(|part| part.target.is_some() && part.name.trim() == item)
                    .and_then(|part| part.target.as_deref());
                Reference::new(item, target)
            })
            .collect()
    }
}

/// Run the scanner over a fragment sequence.
pub fn scan_details<'a, I>(fragments: I, style: KeyStyle) -> Details
where
    I: IntoIterator<Item = Fragment<'a>>,
{
    let mut details = Details::new();
    let mut pending: Option<(String, Detail)> = None;

    for fragment in fragments {
        if style.is_key(fragment.text) {
            if let Some((key, detail)) = pending.take() {
                details.insert(key, detail);
            }
            pending = Some((style.clean_key(fragment.text), Detail::default()));
            continue;
        }

        if let Some((_, detail)) = pending.as_mut() {
            detail
                .parts
                .push(Reference::new(fragment.text, fragment.link));
        }
    }

    if let Some((key, detail)) = pending {
        details.insert(key, detail);
    }
    details
}

/// Scan the colon-keyed detail block of a table cell.
pub fn parse_details(cell: NodeRef<'_>) -> Details {
    scan_details(cell.strings(), KeyStyle::Colon)
}

/// Flatten scanned details to plain values.
pub fn to_detail_map(details: &Details) -> DetailMap {
    details
        .iter()
        .map(|(key, detail)| (key.clone(), detail.value()))
        .collect()
}

/// Flatten scanned details to reference tokens.
pub fn to_ref_map(details: &Details) -> RefMap {
    details
        .iter()
        .map(|(key, detail)| (key.clone(), detail.reference()))
        .collect()
}
