//! Diagnostic collection
//!
//! Parsing an exported document is best effort: a malformed table row or a missing optional
//! detail must not stop the run. Every such anomaly is recorded here with a human readable
//! message and the [`ErrorFlags`] bit of its category, and is also emitted as a `tracing`
//! event so it reaches the diagnostic stream as it happens.
//!
//! A [`Diagnostics`] value is threaded by `&mut` through every parse function and handed back
//! to the caller next to the result (see [`Parsed`]). There is no global error state.

use crate::error::{ErrorFlags, FatalError};
use serde::Serialize;
use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
        }
    }
}

/// One recorded anomaly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub flag: ErrorFlags,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
}

impl Diagnostic {
    pub fn warning(flag: ErrorFlags, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            flag,
            message: message.into(),
            workspace: None,
        }
    }

    pub fn error(flag: ErrorFlags, message: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            flag,
            message: message.into(),
            workspace: None,
        }
    }

    pub fn in_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.workspace {
            Some(workspace) => write!(f, "{} [{}]: {}", self.severity, workspace, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl From<&FatalError> for Diagnostic {
    fn from(err: &FatalError) -> Self {
        let diagnostic = Diagnostic::error(err.flag(), err.to_string());
        match err.workspace() {
            Some(workspace) => diagnostic.in_workspace(workspace),
            None => diagnostic,
        }
    }
}

/// Accumulated diagnostics of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            flag = ?diagnostic.flag,
            workspace = diagnostic.workspace.as_deref().unwrap_or(""),
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    /// Record a warning scoped to a workspace.
    pub fn warn(&mut self, flag: ErrorFlags, workspace: &str, message: impl Into<String>) {
        self.push(Diagnostic::warning(flag, message).in_workspace(workspace));
    }

    /// Record a warning that belongs to the document as a whole.
    pub fn warn_global(&mut self, flag: ErrorFlags, message: impl Into<String>) {
        self.push(Diagnostic::warning(flag, message));
    }

    /// Union of the flags of every recorded diagnostic.
    pub fn flags(&self) -> ErrorFlags {
        self.entries
            .iter()
            .fold(ErrorFlags::empty(), |acc, diagnostic| acc | diagnostic.flag)
    }

    pub fn has(&self, flag: ErrorFlags) -> bool {
        self.flags().contains(flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append another run's diagnostics.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A parse result together with the diagnostics gathered while producing it
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub value: T,
    pub diagnostics: Diagnostics,
}

impl<T> Parsed<T> {
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self { value, diagnostics }
    }

    pub fn flags(&self) -> ErrorFlags {
        self.diagnostics.flags()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_accumulate_as_union() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(diagnostics.flags(), ErrorFlags::empty());

        diagnostics.warn(ErrorFlags::BAD_STEP_TABLE_FORMAT, "Main", "bad row");
        diagnostics.warn(ErrorFlags::UNEXPECTED_KEYS, "Main", "odd key");
        diagnostics.warn(ErrorFlags::BAD_STEP_TABLE_FORMAT, "Other", "bad row");

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(
            diagnostics.flags(),
            ErrorFlags::BAD_STEP_TABLE_FORMAT | ErrorFlags::UNEXPECTED_KEYS
        );
        assert!(!diagnostics.has(ErrorFlags::SUBFLOW_CYCLE));
    }

    #[test]
    fn test_display() {
        let diagnostic =
            Diagnostic::warning(ErrorFlags::MISSING_DETAIL, "no prototype").in_workspace("Main");
        assert_eq!(diagnostic.to_string(), "warning [Main]: no prototype");
        let global = Diagnostic::warning(ErrorFlags::SUBROUTINES_NOT_FOUND, "none");
        assert_eq!(global.to_string(), "warning: none");
    }

    #[test]
    fn test_from_fatal_error() {
        let err = FatalError::MissingReturnMode {
            workspace: "Main".into(),
            step: "9".into(),
        };
        let diagnostic = Diagnostic::from(&err);
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
        assert_eq!(diagnostic.flag, ErrorFlags::MISSING_RETURN_MODE);
        assert_eq!(
            diagnostic.to_string(),
            "error [Main]: end step Main::9 does not have a return mode"
        );
    }
}
