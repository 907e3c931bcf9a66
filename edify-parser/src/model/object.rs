//! Global and local object descriptors

use crate::reference::Reference;
use serde::Serialize;

/// A variable-like resource, scoped to the application (global) or to one workspace (local)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdifyObject {
    pub name: String,
    /// Identity anchor of the object's own definition.
    #[serde(rename = "ref")]
    pub anchor: String,
    pub obj_class: String,
    pub comment: Option<String>,
    pub initial_value: Option<String>,
    pub resource: Option<String>,
    pub used_by: Option<Vec<Reference>>,
    pub pre_alloc: Option<String>,
    pub auto_alloc: Option<String>,
    pub sys_alloc_name: Option<String>,
    pub sys_alloc_timeout: Option<String>,
}
