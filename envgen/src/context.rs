//! State owned by one generation run.

use crate::cache::{ErrorCache, ImportCache};
use crate::config::GenConfig;
use crate::converters::ConverterTable;
use crate::error::EnvgenError;
use crate::parser::ParserCache;
use crate::queue::DiscoveryQueue;

/// Queue, caches and converters shared by every step of a run.
///
/// Nothing here outlives the run, so two runs never see each other's
/// declarations.
#[derive(Debug)]
pub struct GenContext {
    /// Run settings.
    pub config: GenConfig,
    /// Identifier of the generated error enum.
    pub error: syn::Ident,
    /// Records awaiting expansion.
    pub queue: DiscoveryQueue,
    /// `use` declarations.
    pub imports: ImportCache,
    /// Error variants.
    pub errors: ErrorCache,
    /// Parser functions.
    pub parsers: ParserCache,
    /// Primitive converters.
    pub converters: ConverterTable,
}

impl GenContext {
    /// Creates the context for a run and seeds the scope import.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::InvalidTemplate`] when the configured error
    /// type is not a valid identifier.
    pub fn new(config: GenConfig, converters: ConverterTable) -> Result<Self, EnvgenError> {
        let error = syn::parse_str(&config.error_type).map_err(|source| {
            EnvgenError::invalid_template("error type", &config.error_type, source)
        })?;
        let mut imports = ImportCache::new();
        imports.add(&config.scope);
        Ok(Self {
            config,
            error,
            queue: DiscoveryQueue::new(),
            imports,
            errors: ErrorCache::new(),
            parsers: ParserCache::new(),
            converters,
        })
    }
}
