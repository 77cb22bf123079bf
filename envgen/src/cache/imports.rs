//! `use` declarations of the generated file.

use proc_macro2::TokenStream;
use quote::quote;

use super::Cache;
use crate::error::EnvgenError;

/// Import paths keyed by themselves.
#[derive(Debug, Clone, Default)]
pub struct ImportCache {
    paths: Cache<()>,
}

impl ImportCache {
    /// Creates an empty import cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a `use` path such as `std::env` or `super::*`.
    pub fn add(&mut self, path: &str) -> bool {
        let added = self.paths.add(path, ());
        if added {
            tracing::debug!(path, "import registered");
        }
        added
    }

    /// Whether `path` has been registered.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of distinct imports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no import has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Renders one `use` item per path, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::InvalidTemplate`] when a path is not a valid
    /// use tree.
    pub fn write(&self) -> Result<TokenStream, EnvgenError> {
        let mut out = TokenStream::new();
        for path in self.paths.keys() {
            let tree: syn::UseTree = syn::parse_str(path)
                .map_err(|source| EnvgenError::invalid_template("import path", path, source))?;
            out.extend(quote! { use #tree; });
        }
        Ok(out)
    }
}
