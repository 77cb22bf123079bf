//! Library interface for the `cargo envgen` subcommand.
//!
//! Reads the configuration structs of one directory, runs the generator and
//! writes the loader (and optionally a `.env` example). Files are written
//! only after generation succeeds.

pub mod cli;
pub mod error;
pub mod output;
pub mod sources;

use camino::Utf8PathBuf;
use envgen::{EnvgenError, GenConfig, generate};

pub use cli::{Args, cargo_args};
pub use error::CliError;

/// Paths written by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Generated loader.
    pub output: Utf8PathBuf,
    /// `.env` example, when requested.
    pub env_example: Option<Utf8PathBuf>,
    /// Records that received a constructor.
    pub records: Vec<String>,
}

/// Runs one generation.
///
/// # Errors
///
/// Returns [`CliError`] if reading, generating or writing fails. Nothing is
/// written when reading or generation fails.
pub fn run(args: &Args) -> Result<Outcome, CliError> {
    let graph = sources::load_graph(&args.dir, args.file.as_deref())?;
    if !graph.contains(&args.config) {
        return Err(EnvgenError::ConfigTypeNotFound(args.config.clone()).into());
    }
    let output = args
        .file
        .clone()
        .map_or_else(|| sources::default_output(&graph, &args.config), Ok)?;

    let mut config = GenConfig::new(&args.config)
        .with_scope(&args.scope)
        .with_error_type(&args.error_type);
    if let Some(label) = graph.origin(&args.config) {
        config = config.with_source_label(label);
    }
    let generated = generate(&graph, &config)?;
    tracing::info!(records = ?generated.records, "generation succeeded");

    output::write_file(&output, &generated.source)?;
    if let Some(path) = &args.env_example {
        output::write_file(path, &generated.env_example)?;
    }

    Ok(Outcome {
        output,
        env_example: args.env_example.clone(),
        records: generated.records,
    })
}
