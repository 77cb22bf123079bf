//! CLI entrypoint for `cargo-envgen`.

use cargo_envgen::{Args, CliError, cargo_args, run};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<(), CliError> {
    let args = Args::parse_from(cargo_args(std::env::args_os()));
    init_tracing(args.verbose);
    let outcome = run(&args).inspect_err(|err| tracing::error!(error = %err, "envgen failed"))?;
    tracing::info!(output = %outcome.output, "loader generated");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
