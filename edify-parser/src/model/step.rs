//! Steps
//!
//! A step is one instruction of a workspace. The export labels each step with a type name;
//! the nine names we understand map onto the closed [`StepKind`] union. Identity fields
//! (`id`, anchor, optional label) are shared by every kind and live on [`Step`].

use crate::details::RefMap;
use crate::model::branch::Branch;
use crate::reference::Reference;
use serde::Serialize;
use std::fmt;

/// The type label of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepType {
    Start,
    Subflow,
    UseSystemFunction,
    CallDll,
    Choose,
    Assign,
    Call,
    Goto,
    End,
}

impl StepType {
    pub const ALL: [StepType; 9] = [
        StepType::Start,
        StepType::Subflow,
        StepType::UseSystemFunction,
        StepType::CallDll,
        StepType::Choose,
        StepType::Assign,
        StepType::Call,
        StepType::Goto,
        StepType::End,
    ];

    /// The label as written in the export.
    pub fn label(&self) -> &'static str {
        match self {
            StepType::Start => "Start",
            StepType::Subflow => "Subflow",
            StepType::UseSystemFunction => "Use System Function",
            StepType::CallDll => "Call DLL",
            StepType::Choose => "Choose",
            StepType::Assign => "Assign",
            StepType::Call => "Call",
            StepType::Goto => "Goto",
            StepType::End => "End",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Value side of an Assign step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignValue {
    /// `Expression = ...`
    Expression(RefMap),
    /// `Value = ...`
    Value(Reference),
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StepKind {
    Start {
        params: RefMap,
    },
    Subflow {
        target: Option<Reference>,
    },
    UseSystemFunction {
        func_name: Option<String>,
    },
    CallDll {
        func_name: Option<String>,
        prototype: Option<String>,
        args: Option<RefMap>,
    },
    Choose {
        branches: Vec<Branch>,
    },
    Assign {
        obj: Option<Reference>,
        val: Option<AssignValue>,
    },
    Call {
        target: Option<Reference>,
        params: RefMap,
    },
    Goto {
        target: Reference,
    },
    End {
        rtn_mode: String,
    },
}

impl StepKind {
    pub fn step_type(&self) -> StepType {
        match self {
            StepKind::Start { .. } => StepType::Start,
            StepKind::Subflow { .. } => StepType::Subflow,
            StepKind::UseSystemFunction { .. } => StepType::UseSystemFunction,
            StepKind::CallDll { .. } => StepType::CallDll,
            StepKind::Choose { .. } => StepType::Choose,
            StepKind::Assign { .. } => StepType::Assign,
            StepKind::Call { .. } => StepType::Call,
            StepKind::Goto { .. } => StepType::Goto,
            StepKind::End { .. } => StepType::End,
        }
    }
}

/// One row of a workspace's "Steps" table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: String,
    /// Anchor other steps and branches link to.
    #[serde(rename = "ref")]
    pub anchor: String,
    pub label: Option<String>,
    #[serde(flatten)]
    pub kind: StepKind,
}

impl Step {
    pub fn step_type(&self) -> StepType {
        self.kind.step_type()
    }

    /// Target of a Subflow step.
    pub fn subflow_target(&self) -> Option<&Reference> {
        match &self.kind {
            StepKind::Subflow { target } => target.as_ref(),
            _ => None,
        }
    }
}
