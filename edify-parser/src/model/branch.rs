//! Choose step branches

use crate::details::RefMap;
use crate::reference::Reference;
use serde::Serialize;

/// One conditional arm of a Choose step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// The `<n>` of `Branch #<n>`, verbatim.
    pub id: String,
    /// Free text boolean expression.
    pub condition: String,
    pub target_loc: Option<Reference>,
    pub source_obj: Option<Reference>,
    pub comparison_op: Option<Reference>,
    pub target_obj: Option<Reference>,
    /// Detail keys with no dedicated field.
    #[serde(skip_serializing_if = "RefMap::is_empty")]
    pub extra: RefMap,
}

impl Branch {
    pub fn new(id: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            condition: condition.into(),
            target_loc: None,
            source_obj: None,
            comparison_op: None,
            target_obj: None,
            extra: RefMap::new(),
        }
    }
}
