//! Error enum of the generated file.
//!
//! Every converter and parser declares the variants its code can return.
//! The cache keeps one [`ErrorDef`] per variant name and renders them as a
//! single enum with `Display` and `std::error::Error` impls.

use proc_macro2::TokenStream;
use quote::quote;

use super::Cache;
use crate::error::EnvgenError;

/// One variant of the generated error enum.
///
/// The variant always carries a `String` context (usually the key). When
/// `source` is set it also carries that error type, which `source()`
/// returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDef {
    /// Variant name.
    pub variant: &'static str,
    /// Human-readable message printed before the context.
    pub message: &'static str,
    /// Source error type, as Rust type syntax.
    pub source: Option<&'static str>,
}

impl ErrorDef {
    /// Declares a variant carrying only a context string.
    #[must_use]
    pub const fn new(variant: &'static str, message: &'static str) -> Self {
        Self {
            variant,
            message,
            source: None,
        }
    }

    /// Declares a variant that also wraps a source error.
    #[must_use]
    pub const fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }
}

/// A required key is missing.
pub const KEY_NOT_FOUND: ErrorDef = ErrorDef::new("KeyNotFound", "env var key not found");
/// A value is present but not valid Unicode.
pub const NOT_UNICODE: ErrorDef = ErrorDef::new("NotUnicode", "env var value is not valid unicode");
/// A value is not one of the accepted boolean tokens.
pub const INVALID_BOOL: ErrorDef = ErrorDef::new("InvalidBool", "invalid bool value");
/// An integer value failed to parse.
pub const INVALID_INT: ErrorDef =
    ErrorDef::new("InvalidInt", "invalid integer value").with_source("ParseIntError");
/// A float value failed to parse.
pub const INVALID_FLOAT: ErrorDef =
    ErrorDef::new("InvalidFloat", "invalid float value").with_source("ParseFloatError");
/// A duration value failed to parse.
pub const INVALID_DURATION: ErrorDef = ErrorDef::new("InvalidDuration", "invalid duration value")
    .with_source("humantime::DurationError");
/// The selector names no available candidate.
pub const INVALID_CHOICE: ErrorDef = ErrorDef::new("InvalidChoice", "invalid choice");
/// The selected candidate failed to convert.
pub const BUILD: ErrorDef = ErrorDef::new("Build", "failed to build selected value")
    .with_source("Box<dyn std::error::Error + Send + Sync>");

/// Error variants keyed by variant name.
#[derive(Debug, Clone, Default)]
pub struct ErrorCache {
    defs: Cache<ErrorDef>,
}

impl ErrorCache {
    /// Creates an empty error cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a variant unless one with the same name exists.
    pub fn add(&mut self, def: ErrorDef) -> bool {
        let added = self.defs.add(def.variant, def);
        if added {
            tracing::debug!(variant = def.variant, "error variant registered");
        }
        added
    }

    /// Whether a variant with this name has been registered.
    #[must_use]
    pub fn contains(&self, variant: &str) -> bool {
        self.defs.contains(variant)
    }

    /// Number of distinct variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether no variant has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Renders the error enum named `error` with its trait impls.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::InvalidTemplate`] if a variant name or source
    /// type is not valid Rust.
    pub fn write(&self, error: &syn::Ident) -> Result<TokenStream, EnvgenError> {
        let mut variants = Vec::with_capacity(self.defs.len());
        let mut display_arms = Vec::with_capacity(self.defs.len());
        let mut source_arms = Vec::new();

        for (_, def) in self.defs.iter() {
            let variant: syn::Ident = syn::parse_str(def.variant).map_err(|source| {
                EnvgenError::invalid_template("error variant", def.variant, source)
            })?;
            let message = def.message.replace('{', "{{").replace('}', "}}");
            let doc = format!(" {}.", def.message);
            if let Some(source_ty) = def.source {
                let ty: syn::Type = syn::parse_str(source_ty).map_err(|source| {
                    EnvgenError::invalid_template("error source type", source_ty, source)
                })?;
                variants.push(quote! {
                    #[doc = #doc]
                    #variant(String, #ty)
                });
                let format = format!("{message}: {{context}}: {{source}}");
                display_arms.push(quote! {
                    Self::#variant(context, source) => write!(f, #format)
                });
                let borrowed = if is_boxed(&ty) {
                    quote! { Some(&**source) }
                } else {
                    quote! { Some(source) }
                };
                source_arms.push(quote! {
                    Self::#variant(_, source) => #borrowed,
                });
            } else {
                variants.push(quote! {
                    #[doc = #doc]
                    #variant(String)
                });
                let format = format!("{message}: {{context}}");
                display_arms.push(quote! {
                    Self::#variant(context) => write!(f, #format)
                });
            }
        }

        let display_body = if display_arms.is_empty() {
            quote! { match *self {} }
        } else {
            quote! { match self { #(#display_arms,)* } }
        };
        let source_body = if source_arms.is_empty() {
            quote! { None }
        } else if source_arms.len() == self.defs.len() {
            quote! { match self { #(#source_arms)* } }
        } else {
            quote! { match self { #(#source_arms)* _ => None, } }
        };

        Ok(quote! {
            /// Errors returned while loading configuration from the environment.
            #[derive(Debug)]
            pub enum #error {
                #(#variants,)*
            }

            impl ::std::fmt::Display for #error {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    #display_body
                }
            }

            impl ::std::error::Error for #error {
                fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
                    #source_body
                }
            }
        })
    }
}

fn is_boxed(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Box"),
        _ => false,
    }
}
