//! Command-line interface definitions for `cargo-envgen`.

use std::ffi::OsString;

use camino::Utf8PathBuf;
use clap::Parser;
use envgen::config::{DEFAULT_ERROR_TYPE, DEFAULT_SCOPE};

/// Name cargo passes as the first argument to external subcommands.
const SUBCOMMAND: &str = "envgen";

/// Parsed CLI arguments for `cargo-envgen`.
#[derive(Debug, Clone, Parser)]
#[command(name = "cargo-envgen", bin_name = "cargo envgen")]
#[command(about = "Generate environment-variable loaders for configuration structs")]
#[command(version)]
pub struct Args {
    /// Directory holding the configuration sources.
    #[arg(short, long, env = "ENVGEN_DIR", default_value = ".", value_name = "path")]
    pub dir: Utf8PathBuf,
    /// Root configuration type.
    #[arg(short, long, env = "ENVGEN_CONFIG", value_name = "Type")]
    pub config: String,
    /// Output file; defaults to `<file declaring the root>_gen.rs`.
    #[arg(short, long, env = "ENVGEN_FILE", value_name = "path")]
    pub file: Option<Utf8PathBuf>,
    /// Also write a `.env` example to this path.
    #[arg(short = 'e', long = "env", env = "ENVGEN_ENV", value_name = "path")]
    pub env_example: Option<Utf8PathBuf>,
    /// Path imported at the top of the generated file.
    #[arg(long, env = "ENVGEN_SCOPE", default_value = DEFAULT_SCOPE)]
    pub scope: String,
    /// Name of the generated error enum.
    #[arg(long, env = "ENVGEN_ERROR_TYPE", default_value = DEFAULT_ERROR_TYPE)]
    pub error_type: String,
    /// Log every generation step.
    #[arg(short, long, env = "ENVGEN_VERBOSE")]
    pub verbose: bool,
}

/// Drops the `envgen` argument cargo inserts when run as `cargo envgen`.
#[must_use]
pub fn cargo_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().collect();
    if args.get(1).is_some_and(|arg| arg == SUBCOMMAND) {
        args.remove(1);
    }
    args
}
