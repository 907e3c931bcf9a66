//! Shared configuration loader for the edify toolchain.
//!
//! `defaults/edify.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`EdifyConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use edify_parser::ParseOptions;
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError as LoadError;

const DEFAULT_TOML: &str = include_str!("../defaults/edify.default.toml");

/// Top-level configuration consumed by edify applications.
#[derive(Debug, Clone, Deserialize)]
pub struct EdifyConfig {
    pub parser: ParserConfig,
    pub resolver: ResolverConfig,
    pub output: OutputConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Document pre-processing.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub close_paragraphs: bool,
}

/// Subflow resolution knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    pub max_subflow_depth: usize,
    pub reuse_resolved: bool,
    pub search_earlier_headings: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One line per workspace plus the diagnostics.
    Summary,
    /// The serialized model.
    Json,
    /// The model's `Debug` rendering.
    Debug,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub deny_warnings: bool,
}

impl EdifyConfig {
    /// The parser options these settings describe.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            close_paragraphs: self.parser.close_paragraphs,
            max_subflow_depth: self.resolver.max_subflow_depth,
            reuse_resolved: self.resolver.reuse_resolved,
            search_earlier_headings: self.resolver.search_earlier_headings,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for command line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<EdifyConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<EdifyConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.parser.close_paragraphs);
        assert_eq!(config.resolver.max_subflow_depth, 64);
        assert!(config.resolver.reuse_resolved);
        assert!(config.resolver.search_earlier_headings);
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(!config.output.pretty);
        assert!(!config.diagnostics.deny_warnings);
    }

    #[test]
    fn defaults_match_parser_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.format", "json")
            .expect("override to apply")
            .set_override("resolver.max_subflow_depth", 3u64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.parse_options().max_subflow_depth, 3);
    }

    #[test]
    fn forward_only_heading_search() {
        let config = Loader::new()
            .set_override("resolver.search_earlier_headings", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.parse_options().search_earlier_headings);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[parser]\nclose_paragraphs = false\n[output]\npretty = true")
            .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert!(!config.parser.close_paragraphs);
        assert!(config.output.pretty);
        assert_eq!(config.output.format, OutputFormat::Summary);
    }

    #[test]
    fn optional_file_may_be_absent() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/edify.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.resolver.max_subflow_depth, 64);
    }

    #[test]
    fn required_file_must_exist() {
        assert!(Loader::new()
            .with_file("/nonexistent/edify.toml")
            .build()
            .is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        let result = Loader::new()
            .set_override("output.format", "yaml")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
