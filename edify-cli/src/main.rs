//! Command-line interface for edify
//! This binary compiles an exported Edify application document into its model and prints it.
//!
//! Usage:
//!   edify `<path>` [--config `<file>`] [--format `<format>`] [--pretty]   - Compile one export
//!   edify `<path>` --deny-warnings                                     - Fail on any diagnostic
//!
//! Exit status is 0 on success, 1 when the document cannot be read or compiled, and 2 when
//! `--deny-warnings` is set and the run produced diagnostics.

mod render;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use edify_config::{EdifyConfig, LoadError, Loader, OutputFormat};
use edify_parser::{Diagnostic, DocumentLoader, LoaderError};
use std::io::{self, Write};
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "EDIFY_LOG";
/// User configuration picked up from the working directory when `--config` is absent.
const LOCAL_CONFIG: &str = "edify.toml";

fn main() {
    let matches = Command::new("edify")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile exported Edify application documents")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the exported HTML document")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format")
                .value_parser(["summary", "json", "debug"]),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Indent JSON output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("deny-warnings")
                .long("deny-warnings")
                .help("Exit with status 2 when the run produced diagnostics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Deepest chain of nested subflows to follow")
                .value_parser(value_parser!(u64)),
        )
        .get_matches();

    init_tracing();

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    });
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    handle_compile_command(path, &config);
}

/// Log events go to standard error, filtered by `EDIFY_LOG` (warnings by default).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();
    tracing_subscriber::registry().with(filter).with(layer).init();
}

/// Defaults, then the user file, then the command line flags.
fn load_config(matches: &ArgMatches) -> Result<EdifyConfig, LoadError> {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    if matches.get_flag("pretty") {
        loader = loader.set_override("output.pretty", true)?;
    }
    if matches.get_flag("deny-warnings") {
        loader = loader.set_override("diagnostics.deny_warnings", true)?;
    }
    if let Some(depth) = matches.get_one::<u64>("max-depth") {
        loader = loader.set_override("resolver.max_subflow_depth", *depth)?;
    }
    loader.build()
}

/// Compile one document and print it in the configured format
fn handle_compile_command(path: &str, config: &EdifyConfig) {
    let options = config.parse_options();
    tracing::debug!(path, format = ?config.output.format, ?options, "compiling export");
    let parsed = DocumentLoader::from_path(path)
        .and_then(|loader| loader.parse(&options))
        .unwrap_or_else(|e| {
            match &e {
                LoaderError::Fatal(fatal) => eprintln!("{}", Diagnostic::from(fatal)),
                other => eprintln!("Error reading {}: {}", path, other),
            }
            process::exit(1);
        });

    let output = match config.output.format {
        OutputFormat::Summary => Ok(render::summary(&parsed)),
        OutputFormat::Json => render::json(&parsed.value, config.output.pretty),
        OutputFormat::Debug => Ok(format!("{:#?}\n", parsed.value)),
    };
    match output {
        Ok(output) => {
            print!("{}", output);
            let _ = io::stdout().flush();
        }
        Err(e) => {
            eprintln!("Error formatting output: {}", e);
            process::exit(1);
        }
    }

    if config.diagnostics.deny_warnings && !parsed.diagnostics.is_empty() {
        eprintln!(
            "{} diagnostic(s) reported and warnings are denied",
            parsed.diagnostics.len()
        );
        process::exit(2);
    }
}
