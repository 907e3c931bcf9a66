//! Workspaces
//!
//! A workspace is one named unit of step based control flow. Nested workspaces reached
//! through Subflow steps are plain [`Subflow`]s; the top level ones (entry workspace,
//! subroutines, exception handlers) are [`Subroutine`]s, which add parameters, local objects
//! and exception routing.

use crate::model::object::EdifyObject;
use crate::model::param::Param;
use crate::model::step::Step;
use crate::reference::Reference;
use indexmap::IndexMap;
use serde::Serialize;

/// A workspace with its steps and every nested workspace reachable from them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subflow {
    pub name: String,
    /// Identity anchor of the workspace heading.
    pub anchor: Option<String>,
    pub steps: Vec<Step>,
    pub subflows: Vec<Subflow>,
}

impl Subflow {
    /// Step with the given anchor.
    pub fn step(&self, anchor: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.anchor == anchor)
    }

    /// Nested subflow with the given name, searched depth first.
    pub fn find_subflow(&self, name: &str) -> Option<&Subflow> {
        self.subflows.iter().find_map(|subflow| {
            if subflow.name == name {
                Some(subflow)
            } else {
                subflow.find_subflow(name)
            }
        })
    }

    /// Number of subflows at every depth below this one.
    pub fn nested_count(&self) -> usize {
        self.subflows
            .iter()
            .map(|subflow| 1 + subflow.nested_count())
            .sum()
    }
}

/// Role of a top level workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkspaceRole {
    EntryWorkspace,
    Subroutine,
    ExceptionHandler,
}

/// A top level workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subroutine {
    pub role: WorkspaceRole,
    #[serde(flatten)]
    pub flow: Subflow,
    pub exception_workspaces: Option<Vec<String>>,
    pub called_by: Option<Vec<String>>,
    pub entry_params: Vec<Param>,
    /// Exception code → handler workspace.
    pub exception_handler_map: IndexMap<String, Reference>,
    pub local_objs: Vec<EdifyObject>,
}

impl Subroutine {
    pub fn name(&self) -> &str {
        &self.flow.name
    }
}
