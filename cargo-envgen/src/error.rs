//! Error types for `cargo-envgen`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the `cargo-envgen` pipeline.
#[derive(Debug, Error)]
pub enum CliError {
    /// Generation failed; nothing was written.
    #[error(transparent)]
    Generate(#[from] envgen::EnvgenError),

    /// The input directory holds no Rust sources.
    #[error("no Rust source files found in {0}")]
    NoSources(Utf8PathBuf),

    /// The root type was not read from a file, so no default output path
    /// can be derived.
    #[error("cannot derive an output path for '{0}'; pass --file")]
    MissingRootSource(String),

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub(crate) fn io(path: &camino::Utf8Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
