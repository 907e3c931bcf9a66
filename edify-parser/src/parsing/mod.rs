//! Document compiler
//!
//! Turns a [`crate::dom::Document`] into the [`crate::model`] types. The work is split the
//! way the document is laid out:
//!
//! - [`tables`]: finding headings and captioned tables
//! - [`entities`]: parameter, object, exception and workspace list rows
//! - [`steps`]: the "Steps" table and its nine step grammars
//! - [`resolver`]: one workspace plus every subflow reachable from it
//! - [`assembler`]: the top level sections of the application
//!
//! Every function takes the [`crate::diagnostics::Diagnostics`] of the run by `&mut` and
//! returns [`crate::error::ParseResult`] when a fatal condition can occur inside it.

pub mod assembler;
pub mod entities;
pub mod resolver;
pub mod steps;
pub mod tables;

pub use assembler::{
    parse_app_object, parse_global_objects, parse_properties, parse_workspace,
};
pub use resolver::Resolver;

/// Default bound on subflow nesting.
pub const DEFAULT_MAX_SUBFLOW_DEPTH: usize = 64;

/// Knobs for a compile run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Rewrite `<p>` as `<p></p>` before building the tree.
    pub close_paragraphs: bool,
    /// Deepest chain of nested subflows that is resolved.
    pub max_subflow_depth: usize,
    /// Clone a subflow already resolved elsewhere instead of parsing it again.
    pub reuse_resolved: bool,
    /// Look for subflow headings before the calling heading too, once the ones after it are
    /// exhausted. Off, only following headings are searched.
    pub search_earlier_headings: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            close_paragraphs: true,
            max_subflow_depth: DEFAULT_MAX_SUBFLOW_DEPTH,
            reuse_resolved: true,
            search_earlier_headings: true,
        }
    }
}
