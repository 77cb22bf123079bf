//! Key-value server whose configuration is loaded by an `envgen` loader.
//!
//! The build script generates `Config::from_env` from the structs in
//! [`config`]; [`server::Server`] then builds whichever store
//! `DATA_STORE_KIND` selects.

pub mod config;
pub mod datastore;
pub mod server;

pub use config::{Config, EnvError};
pub use server::{Server, ServerError};
