//! Source generator for environment-variable configuration loaders.
//!
//! Given a graph of configuration structs, `envgen` emits Rust source that
//! builds each struct from environment variables. Nested structs are loaded
//! with a key prefix, primitive fields go through one generated parser per
//! distinct (type, list, required) combination, and a struct with a
//! `build` selector gets a dispatcher that turns the selected nested
//! configuration into a shared target type.
//!
//! ```rust
//! use envgen::{GenConfig, SchemaGraph, generate};
//!
//! let graph = SchemaGraph::parse_str(r#"
//!     pub struct Config {
//!         #[env(default = "localhost")]
//!         pub host: String,
//!         pub port: u16,
//!     }
//! "#)?;
//! let generated = generate(&graph, &GenConfig::new("Config"))?;
//! assert!(generated.source.contains("pub fn from_env()"));
//! assert!(generated.env_example.contains("HOST=localhost"));
//! # Ok::<(), envgen::EnvgenError>(())
//! ```

pub mod cache;
pub mod config;
pub mod context;
pub mod converters;
pub mod cycles;
pub mod env_example;
mod error;
pub mod extract;
pub mod field;
pub mod format;
pub mod generate;
mod model;
pub mod parser;
pub mod queue;
pub mod record;

pub use config::GenConfig;
pub use converters::{Converter, ConverterTable};
pub use error::EnvgenError;
pub use generate::{Generated, Generator, generate};
pub use model::{FieldDef, FieldOptions, FieldShape, RecordDef, SchemaGraph};
