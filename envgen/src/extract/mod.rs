//! Builds a [`SchemaGraph`] from Rust source.
//!
//! Every non-generic struct in the parsed file becomes a record. Field types
//! are classified into [`crate::FieldShape`]s and `#[env(...)]` attributes
//! into [`crate::FieldOptions`]; doc comments are kept for the env example.

mod attrs;
mod docs;
mod shape;

use quote::ToTokens;
use syn::{Fields, Item, ItemStruct};

use crate::error::EnvgenError;
use crate::model::{FieldDef, RecordDef, SchemaGraph};

pub use attrs::ATTRIBUTE;
pub use shape::classify;

impl RecordDef {
    /// Extracts a record from a struct item.
    ///
    /// # Errors
    ///
    /// Returns a spanned [`syn::Error`] for generic structs, struct-level
    /// `env` attributes, and malformed field options.
    pub fn from_item(item: &ItemStruct) -> syn::Result<Self> {
        if !item.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &item.generics,
                "generic structs cannot be loaded from the environment",
            ));
        }
        attrs::reject_struct_options(&item.attrs)?;

        let fields = match &item.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unnamed(unnamed) => unnamed.unnamed.iter().collect(),
            Fields::Unit => Vec::new(),
        };
        let mut defs = Vec::with_capacity(fields.len());
        for (index, field) in fields.into_iter().enumerate() {
            defs.push(FieldDef {
                name: field.ident.as_ref().map(ToString::to_string),
                index,
                shape: shape::classify(&field.ty),
                options: attrs::field_options(&field.attrs)?,
                docs: docs::doc_text(&field.attrs),
            });
        }

        Ok(Self {
            name: item.ident.to_string(),
            docs: docs::doc_text(&item.attrs),
            fields: defs,
        })
    }
}

impl SchemaGraph {
    /// Parses `source` and collects its structs into a new graph.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::Parse`] if the source is not valid Rust or an
    /// attribute is malformed, and [`EnvgenError::DuplicateRecord`] if two
    /// structs share a name.
    pub fn parse_str(source: &str) -> Result<Self, EnvgenError> {
        let mut graph = Self::new();
        graph.add_source("<source>", source)?;
        Ok(graph)
    }

    /// Parses `source` and adds its structs to the graph, remembering
    /// `origin` as the place each one came from.
    ///
    /// # Errors
    ///
    /// See [`SchemaGraph::parse_str`].
    pub fn add_source(&mut self, origin: &str, source: &str) -> Result<(), EnvgenError> {
        let file = syn::parse_file(source).map_err(|source| EnvgenError::Parse {
            origin: origin.to_owned(),
            source,
        })?;
        self.add_file(origin, &file)
    }

    /// Adds the structs of an already parsed file.
    ///
    /// # Errors
    ///
    /// See [`SchemaGraph::parse_str`].
    pub fn add_file(&mut self, origin: &str, file: &syn::File) -> Result<(), EnvgenError> {
        for item in &file.items {
            let Item::Struct(item) = item else {
                continue;
            };
            if !item.generics.params.is_empty() {
                tracing::debug!(
                    record = %item.ident,
                    generics = %item.generics.to_token_stream(),
                    "skipping generic struct"
                );
                continue;
            }
            let record = RecordDef::from_item(item).map_err(|source| EnvgenError::Parse {
                origin: origin.to_owned(),
                source,
            })?;
            tracing::debug!(record = %record.name, origin, "record found");
            self.insert_from(record, Some(origin))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
