//! Generates the environment loader for the server configuration.
//!
//! `src/config.rs` is parsed on every change and the loader is written to
//! `$OUT_DIR/config_gen.rs`, next to a `config.env` example file.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use envgen::{GenConfig, SchemaGraph};

const CONFIG_SOURCE: &str = "src/config.rs";

#[expect(
    clippy::print_stdout,
    reason = "build scripts talk to Cargo through stdout"
)]
fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed={CONFIG_SOURCE}");

    let source = fs::read_to_string(CONFIG_SOURCE)?;
    let mut graph = SchemaGraph::new();
    graph.add_source(CONFIG_SOURCE, &source)?;

    let config = GenConfig::new("Config").with_source_label(CONFIG_SOURCE);
    let generated = envgen::generate(&graph, &config)?;

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    fs::write(out_dir.join("config_gen.rs"), generated.source)?;
    fs::write(out_dir.join("config.env"), generated.env_example)?;
    Ok(())
}
