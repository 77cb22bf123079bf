//! Serves `GET`/`PUT` request lines from stdin using a store chosen through
//! the environment.

use std::io;

use envgen_demo_server::{Config, Server, ServerError};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<(), ServerError> {
    let config = Config::from_env()?;
    init_tracing(config.debug);
    tracing::debug!(?config, "configuration loaded");

    let shutdown_timeout = config.shutdown_timeout;
    let mut server = Server::new(config)
        .inspect_err(|err| tracing::error!(error = %err, "failed to start"))?;
    tracing::info!(address = %server.address(), "serving requests from stdin");
    let served = server.serve(io::stdin().lock(), io::stdout().lock())?;
    tracing::info!(
        served,
        shutdown_timeout = %humantime::format_duration(shutdown_timeout),
        "input closed, shutting down"
    );
    Ok(())
}
