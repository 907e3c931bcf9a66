//! Reference tokens
//!
//! Many values in an exported document are hyperlinks back into the same document: an
//! assignment's value is "object X, defined at #123". A [`Reference`] keeps both halves: the
//! human readable name and, when a link was present, its destination.
//!
//! Downstream consumers read this pair as one flat string, `"<name>:<ref>"`, with the
//! literal `None` when no link exists. The model keeps the pair as a struct; [`Reference::encode`]
//! and [`Reference::decode`] convert to and from the flat form for callers that still need it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text written in place of a missing destination in the flat form.
pub const NO_REF: &str = "None";

/// Leading marker of an in-document link destination.
pub const ANCHOR_MARKER: char = '#';

/// A display name plus an optional in-document link destination
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Reference {
    pub fn new(name: impl Into<String>, target: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            target: target.map(Into::into),
        }
    }

    /// A reference with no link.
    pub fn unlinked(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
        }
    }

    /// The anchor identifier this reference points at: the destination with its leading `#`
    /// removed. `None` when unlinked.
    pub fn anchor(&self) -> Option<&str> {
        self.target
            .as_deref()
            .map(|target| target.strip_prefix(ANCHOR_MARKER).unwrap_or(target))
    }

    /// Flat `"<name>:<ref>"` form.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}",
            self.name,
            self.target.as_deref().unwrap_or(NO_REF)
        )
    }

    /// Inverse of [`Reference::encode`]. The split happens at the last colon, so names may
    /// themselves contain colons. A token without any colon is an unlinked name.
    pub fn decode(token: &str) -> Self {
        match token.rsplit_once(':') {
            Some((name, NO_REF)) => Self::unlinked(name),
            Some((name, target)) => Self::new(name, Some(target)),
            None => Self::unlinked(token),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
