//! Error types for document compilation
//!
//! Two severities exist. Recoverable anomalies become [`crate::diagnostics::Diagnostic`]s and
//! parsing carries on with a default in place of the damaged field. Unrecoverable ones are a
//! [`FatalError`] that unwinds the whole run through `?`; no partial model is returned.
//!
//! Every anomaly category owns one bit of [`ErrorFlags`] so a caller can ask *which* kinds
//! of problem a run hit.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// One bit per anomaly category
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct ErrorFlags: u32 {
        const BAD_STEP_TABLE_FORMAT           = 1 << 0;
        const BAD_PARAM_TABLE_FORMAT          = 1 << 1;
        const BAD_OBJ_TABLE_FORMAT            = 1 << 2;
        const BAD_PROPS_TABLE_FORMAT          = 1 << 3;
        const BAD_WORKSPACE_LIST_TABLE_FORMAT = 1 << 4;
        const UNEXPECTED_KEYS                 = 1 << 5;
        const UNEXPECTED_DETAILS              = 1 << 6;
        const MISSING_DETAIL                  = 1 << 7;
        const AMBIGUOUS_LINKS                 = 1 << 8;
        const UNRESOLVED_SUBFLOW              = 1 << 9;
        const SUBFLOW_CYCLE                   = 1 << 10;
        const SUBFLOW_DEPTH_EXCEEDED          = 1 << 11;
        const SUBROUTINES_NOT_FOUND           = 1 << 12;
        const EXCEPTION_HANDLERS_NOT_FOUND    = 1 << 13;
        const META_PARAMETER_PROP             = 1 << 14;

        // fatal
        const UNEXPECTED_STEP_TYPE            = 1 << 16;
        const BAD_ASSIGN_VALUE                = 1 << 17;
        const MISSING_GOTO_TARGET             = 1 << 18;
        const MISSING_RETURN_MODE             = 1 << 19;
        const BAD_EXCEPTION_TABLE_FORMAT      = 1 << 20;
        const PROPS_NOT_FOUND                 = 1 << 21;
        const ENTRY_WORKSPACE_NOT_FOUND       = 1 << 22;
    }
}

/// Unrecoverable document anomalies
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FatalError {
    #[error("unexpected step type {step_type:?} at {workspace}::{step}")]
    UnexpectedStepType {
        workspace: String,
        step: String,
        step_type: String,
    },

    #[error(
        "assign step {workspace}::{step} does not start with \"Expression = \" or \"Value = \""
    )]
    BadAssignValue { workspace: String, step: String },

    #[error("goto step {workspace}::{step} does not have a target")]
    MissingGotoTarget { workspace: String, step: String },

    #[error("end step {workspace}::{step} does not have a return mode")]
    MissingReturnMode { workspace: String, step: String },

    #[error(
        "unexpected number of columns in \"Exception Handling Table\" for workspace {workspace:?}"
    )]
    BadExceptionTableRow { workspace: String },

    #[error("could not find \"Application Object Properties\" header")]
    PropertiesNotFound,

    #[error("could not find \"Entry Workspace\" header")]
    EntryWorkspaceNotFound,
}

impl FatalError {
    /// The category bit for this error.
    pub fn flag(&self) -> ErrorFlags {
        match self {
            FatalError::UnexpectedStepType { .. } => ErrorFlags::UNEXPECTED_STEP_TYPE,
            FatalError::BadAssignValue { .. } => ErrorFlags::BAD_ASSIGN_VALUE,
            FatalError::MissingGotoTarget { .. } => ErrorFlags::MISSING_GOTO_TARGET,
            FatalError::MissingReturnMode { .. } => ErrorFlags::MISSING_RETURN_MODE,
            FatalError::BadExceptionTableRow { .. } => ErrorFlags::BAD_EXCEPTION_TABLE_FORMAT,
            FatalError::PropertiesNotFound => ErrorFlags::PROPS_NOT_FOUND,
            FatalError::EntryWorkspaceNotFound => ErrorFlags::ENTRY_WORKSPACE_NOT_FOUND,
        }
    }

    /// Workspace the error occurred in, when it is tied to one.
    pub fn workspace(&self) -> Option<&str> {
        match self {
            FatalError::UnexpectedStepType { workspace, .. }
            | FatalError::BadAssignValue { workspace, .. }
            | FatalError::MissingGotoTarget { workspace, .. }
            | FatalError::MissingReturnMode { workspace, .. }
            | FatalError::BadExceptionTableRow { workspace } => Some(workspace),
            FatalError::PropertiesNotFound | FatalError::EntryWorkspaceNotFound => None,
        }
    }
}

/// Result type for the compiler's parse functions.
pub type ParseResult<T> = Result<T, FatalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_union() {
        let mut flags = ErrorFlags::empty();
        flags |= ErrorFlags::UNEXPECTED_KEYS;
        flags |= ErrorFlags::BAD_STEP_TABLE_FORMAT;
        flags |= ErrorFlags::UNEXPECTED_KEYS;
        assert!(flags.contains(ErrorFlags::UNEXPECTED_KEYS));
        assert!(flags.contains(ErrorFlags::BAD_STEP_TABLE_FORMAT));
        assert_eq!(flags.iter().count(), 2);
    }

    #[test]
    fn test_fatal_flag_and_message() {
        let err = FatalError::MissingGotoTarget {
            workspace: "Main".into(),
            step: "7".into(),
        };
        assert_eq!(err.flag(), ErrorFlags::MISSING_GOTO_TARGET);
        assert_eq!(err.to_string(), "goto step Main::7 does not have a target");
    }
}
