//! Parameter descriptors

use serde::Serialize;

/// One entry parameter of a workspace, or one application object parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    pub name: String,
    pub label: String,
    pub object_class: String,
    pub io_type: String,
    pub default_val: String,
}
