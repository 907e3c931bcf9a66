//! Document loading
//!
//! `DocumentLoader` reads export source from a file or a string, applies the textual
//! pre-processing and runs the compiler on it. Both the CLI and the integration tests go
//! through it.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use edify_parser::loader::DocumentLoader;
//! use edify_parser::parsing::ParseOptions;
//!
//! let parsed = DocumentLoader::from_path("export.html")?
//!     .parse(&ParseOptions::default())?;
//! println!("{} workspaces", parsed.value.subroutines.len());
//! # Ok(())
//! # }
//! ```

use crate::diagnostics::Parsed;
use crate::dom::Document;
use crate::error::FatalError;
use crate::model::AppObject;
use crate::parsing::{parse_app_object, ParseOptions};
use std::fs;
use std::path::Path;

/// Error that can occur when loading documents
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("selected file path cannot be empty")]
    EmptyPath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

/// Export source plus the shortcuts to compile it
pub struct DocumentLoader {
    source: String,
}

impl DocumentLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LoaderError::EmptyPath);
        }
        let source = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "loaded export");
        Ok(DocumentLoader { source })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
        }
    }

    /// Get the raw source string
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Build the document tree, pre-processing the source as `options` ask.
    pub fn document(&self, options: &ParseOptions) -> Document {
        if options.close_paragraphs {
            Document::parse(&close_paragraphs(&self.source))
        } else {
            Document::parse(&self.source)
        }
    }

    /// Compile the source into an [`AppObject`]
    pub fn parse(&self, options: &ParseOptions) -> Result<Parsed<AppObject>, LoaderError> {
        let document = self.document(options);
        Ok(parse_app_object(document.root(), options)?)
    }
}

/// Close every bare `<p>` on the spot.
///
/// Exports open paragraphs without closing them. An open `<p>` would otherwise adopt the
/// headings and tables that follow it and break sibling navigation.
pub fn close_paragraphs(source: &str) -> String {
    source.replace("<p>", "<p></p>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorFlags;

    const MINIMAL: &str = r##"<html><body>
        <h2>Application Object Properties</h2>
        <center><table><tr><th>Name</th><td>Demo</td></tr></table></center>
        <p>Generated export
        <h2>Entry Workspace: <a name="ws1">Main</a></h2>
        <table><caption>Steps</caption>
          <tr><td><strong><a name="s1">1</a></strong> End.<br></td>
              <td>Return Mode = <em>Normal</em></td></tr>
        </table>
        </body></html>"##;

    #[test]
    fn test_close_paragraphs() {
        assert_eq!(close_paragraphs("<p>a<p>b"), "<p></p>a<p></p>b");
        assert_eq!(close_paragraphs("<P>kept"), "<P>kept");
    }

    #[test]
    fn test_parse_from_string() {
        let parsed = DocumentLoader::from_string(MINIMAL)
            .parse(&ParseOptions::default())
            .unwrap();
        let app = parsed.value;
        assert_eq!(app.props.meta["Name"], "Demo");
        assert_eq!(app.subroutines.len(), 1);
        assert_eq!(app.entry_workspace().unwrap().name(), "Main");
        assert_eq!(
            parsed.diagnostics.flags(),
            ErrorFlags::SUBROUTINES_NOT_FOUND | ErrorFlags::EXCEPTION_HANDLERS_NOT_FOUND
        );
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(
            DocumentLoader::from_path(""),
            Err(LoaderError::EmptyPath)
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            DocumentLoader::from_path("/definitely/not/here.html"),
            Err(LoaderError::Io(_))
        ));
    }

    #[test]
    fn test_fatal_error_propagates() {
        let result = DocumentLoader::from_string("<h2>nothing</h2>").parse(&ParseOptions::default());
        assert!(matches!(
            result,
            Err(LoaderError::Fatal(FatalError::PropertiesNotFound))
        ));
    }
}
