//! Test helpers shared across crates.
//!
//! Generated loaders read many process-wide environment variables in one
//! call, so tests hold an [`env::Sandbox`] for their whole body: it
//! serialises environment access and restores every touched key on drop.

pub mod env;
