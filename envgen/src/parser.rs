//! Parser synthesis.
//!
//! Every primitive field is read through a small generated function. The
//! function is identified by its converter, whether it reads a list and
//! whether the key is required, so fields sharing those three traits share
//! one function.

use proc_macro2::TokenStream;
use quote::quote;

use crate::cache::{Cache, KEY_NOT_FOUND, NOT_UNICODE};
use crate::context::GenContext;
use crate::converters::{Converter, Template};
use crate::error::EnvgenError;
use crate::field::Field;

/// Identity of a generated parser function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserSignature {
    /// Converter short name.
    pub converter: &'static str,
    /// Reads a comma-separated list.
    pub slice: bool,
    /// Fails when the key is absent.
    pub required: bool,
}

impl ParserSignature {
    /// Canonical function name, e.g. `parse_u16_optional` or
    /// `parse_string_slice_required`.
    #[must_use]
    pub fn fn_name(&self) -> String {
        let slice = if self.slice { "_slice" } else { "" };
        let requirement = if self.required { "required" } else { "optional" };
        format!("parse_{}{slice}_{requirement}", self.converter)
    }
}

/// A parser waiting to be rendered.
#[derive(Debug, Clone, Copy)]
pub struct ParserDef {
    /// Function identity.
    pub signature: ParserSignature,
    /// Converter supplying the conversion template.
    pub converter: Converter,
}

/// Parser functions keyed by canonical name.
#[derive(Debug, Clone, Default)]
pub struct ParserCache {
    defs: Cache<ParserDef>,
}

impl ParserCache {
    /// Creates an empty parser cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parser unless one with the same name exists.
    pub fn add(&mut self, def: ParserDef) -> bool {
        self.defs.add(&def.signature.fn_name(), def)
    }

    /// Whether a parser with this name has been registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains(name)
    }

    /// Number of distinct parsers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether no parser has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Parser names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys()
    }

    /// Renders every registered parser.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::InvalidTemplate`] when a converter's name or
    /// type is not valid Rust.
    pub fn write(&self, error: &syn::Ident) -> Result<TokenStream, EnvgenError> {
        let mut out = TokenStream::new();
        for (name, def) in self.defs.iter() {
            out.extend(render(name, def, error)?);
        }
        Ok(out)
    }
}

fn render(name: &str, def: &ParserDef, error: &syn::Ident) -> Result<TokenStream, EnvgenError> {
    let fn_name: syn::Ident = syn::parse_str(name)
        .map_err(|source| EnvgenError::invalid_template("parser name", name, source))?;
    let rust_type = def.converter.rust_type;
    let ty: syn::Type = syn::parse_str(rust_type)
        .map_err(|source| EnvgenError::invalid_template("converter type", rust_type, source))?;
    let convert = def.converter.render(&Template {
        ty: &ty,
        error,
    });
    let ParserSignature {
        slice, required, ..
    } = def.signature;

    let value_ty = if slice {
        quote! { Vec<#ty> }
    } else {
        quote! { #ty }
    };
    let conversion = if slice {
        quote! {
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| {
                    let raw = item.to_owned();
                    #convert
                })
                .collect::<Result<#value_ty, #error>>()
        }
    } else {
        convert
    };
    let not_unicode = quote! {
        Err(env::VarError::NotUnicode(_)) => return Err(#error::NotUnicode(key.to_owned())),
    };

    let tokens = if required {
        let doc = format!(" Reads `key` as a required `{}`.", value_ty.to_string().replace(' ', ""));
        quote! {
            #[doc = #doc]
            fn #fn_name(key: &str) -> Result<#value_ty, #error> {
                let raw = match env::var(key) {
                    Ok(raw) => raw,
                    Err(env::VarError::NotPresent) => {
                        return Err(#error::KeyNotFound(key.to_owned()));
                    }
                    #not_unicode
                };
                #conversion
            }
        }
    } else {
        let doc = format!(
            " Reads `key` as an optional `{}`, falling back to `default`.",
            value_ty.to_string().replace(' ', "")
        );
        quote! {
            #[doc = #doc]
            fn #fn_name(default: Option<&str>, key: &str) -> Result<Option<#value_ty>, #error> {
                let raw = match env::var(key) {
                    Ok(raw) => raw,
                    Err(env::VarError::NotPresent) => {
                        let Some(default) = default else {
                            return Ok(None);
                        };
                        default.to_owned()
                    }
                    #not_unicode
                };
                let value: Result<#value_ty, #error> = #conversion;
                value.map(Some)
            }
        }
    };
    Ok(tokens)
}

/// Registers the parser for a primitive field, with everything it needs,
/// and returns the function name to call.
///
/// # Errors
///
/// Returns [`EnvgenError::UnknownType`] when the field's type has no
/// converter, and [`EnvgenError::InvalidTemplate`] when the converter's
/// name is not a valid identifier.
pub fn synthesize(
    field: &Field,
    record: &str,
    ctx: &mut GenContext,
) -> Result<syn::Ident, EnvgenError> {
    let Some(converter) = ctx.converters.lookup(&field.type_name).copied() else {
        return Err(EnvgenError::UnknownType {
            record: record.to_owned(),
            field: field.name.clone(),
            type_name: field.type_name.clone(),
        });
    };

    for path in converter.imports {
        ctx.imports.add(path);
    }
    for def in converter.errors {
        ctx.errors.add(*def);
    }
    ctx.imports.add("std::env");
    ctx.errors.add(NOT_UNICODE);
    if field.required {
        ctx.errors.add(KEY_NOT_FOUND);
    }

    let signature = ParserSignature {
        converter: converter.name,
        slice: field.slice,
        required: field.required,
    };
    let name = signature.fn_name();
    if ctx.parsers.add(ParserDef {
        signature,
        converter,
    }) {
        tracing::debug!(parser = %name, record, field = %field.name, "parser registered");
    }
    syn::parse_str(&name).map_err(|source| EnvgenError::invalid_template("parser name", &name, source))
}
