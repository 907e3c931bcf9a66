//! # edify-parser
//!
//! Compiler from an exported Edify application document (HTML written for people) to a typed
//! model of the application: its properties, objects and workspaces, and the steps, branches
//! and subflows inside each workspace.
//!
//! File Layout
//!
//! ```text
//! dom          the HTML tree, frozen into a navigable arena
//! details      the key/value scanner for free text detail blocks
//! reference    name + link pairs found throughout the document
//! model        the compiled application
//! parsing      table, step, workspace and application parsers
//! diagnostics  recoverable anomalies collected during a run
//! error        anomaly flags and fatal errors
//! loader       reading and compiling a document in one call
//! ```
//!
//! Most callers only need [`loader::DocumentLoader`]:
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use edify_parser::{DocumentLoader, ParseOptions};
//!
//! let parsed = DocumentLoader::from_path("export.html")?.parse(&ParseOptions::default())?;
//! for diagnostic in parsed.diagnostics.iter() {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod details;
pub mod diagnostics;
pub mod dom;
pub mod error;
pub mod loader;
pub mod model;
pub mod parsing;
pub mod reference;

pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, Parsed};
pub use error::{ErrorFlags, FatalError, ParseResult};
pub use loader::{DocumentLoader, LoaderError};
pub use model::AppObject;
pub use parsing::ParseOptions;
pub use reference::Reference;
