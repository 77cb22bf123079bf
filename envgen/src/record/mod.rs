//! Per-record constructor emission.
//!
//! The root record gets `from_env()`, every nested record gets
//! `from_env_with_prefix(prefix)`. A record whose selector field carries a
//! `build` target also gets a dispatcher, see [`dispatch`].

pub mod dispatch;

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use crate::context::GenContext;
use crate::error::EnvgenError;
use crate::field::{Field, Member};
use crate::model::{FieldShape, RecordDef, SchemaGraph};
use crate::parser;

const SELECTED: &str = "selected";

/// An analyzed record ready to be written.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    name: String,
    docs: String,
    root: bool,
    fields: Vec<Field>,
    selector: Option<usize>,
}

impl RecordBuilder {
    /// Analyzes every field of `def`, validates its selector and enqueues
    /// the nested records it references.
    ///
    /// # Errors
    ///
    /// Propagates field analysis errors and rejects a second selector, a
    /// selector not declared as `String`, a selector without candidates and
    /// candidates not declared as `Option<T>`.
    pub fn analyze(
        def: &RecordDef,
        root: bool,
        graph: &SchemaGraph,
        ctx: &mut GenContext,
    ) -> Result<Self, EnvgenError> {
        let mut fields: Vec<Field> = Vec::with_capacity(def.fields.len());
        let mut selector: Option<usize> = None;
        for (position, field_def) in def.fields.iter().enumerate() {
            let field = Field::analyze(field_def, &def.name, graph, &ctx.converters)?;
            if field.is_selector() {
                if let Some(first) = selector.and_then(|i| fields.get(i)) {
                    return Err(EnvgenError::DuplicateSelector {
                        record: def.name.clone(),
                        first: first.name.clone(),
                        second: field.name.clone(),
                    });
                }
                if !is_string(&field_def.shape) {
                    return Err(EnvgenError::InvalidSelector {
                        record: def.name.clone(),
                        field: field.name.clone(),
                        reason: "must be declared as String",
                    });
                }
                selector = Some(position);
            }
            fields.push(field);
        }

        if let Some(selector_field) = selector.and_then(|i| fields.get(i)) {
            let selector_name = selector_field.name.clone();
            let mut candidates = 0_usize;
            for field in fields.iter_mut().filter(|f| f.custom) {
                if !field.declared_optional {
                    return Err(EnvgenError::ChoiceNotOptional {
                        record: def.name.clone(),
                        field: field.name.clone(),
                        type_name: field.type_name.clone(),
                    });
                }
                field.guarded = true;
                candidates += 1;
            }
            if candidates == 0 {
                return Err(EnvgenError::InvalidSelector {
                    record: def.name.clone(),
                    field: selector_name,
                    reason: "has no nested record fields to choose from",
                });
            }
        }

        for field in fields.iter().filter(|f| f.custom) {
            ctx.queue.add(&field.type_name);
        }

        Ok(Self {
            name: def.name.clone(),
            docs: def.docs.clone(),
            root,
            fields,
            selector,
        })
    }

    /// Record name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the root record.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.root
    }

    /// Analyzed fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The selector field, if the record has one.
    #[must_use]
    pub fn selector(&self) -> Option<&Field> {
        self.selector.and_then(|i| self.fields.get(i))
    }

    /// Candidates of the selector, in declaration order.
    pub fn candidates(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.guarded)
    }

    /// Emits the constructor and, when there is a selector, the dispatcher.
    ///
    /// Parsers, imports and error variants used by the emitted code are
    /// registered in `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::UnknownType`] for unresolvable primitives and
    /// [`EnvgenError::InvalidTemplate`] for names that are not valid Rust.
    pub fn write(&self, ctx: &mut GenContext) -> Result<TokenStream, EnvgenError> {
        let record = parse_ident("record name", &self.name)?;
        let error = ctx.error.clone();
        let selected = quote::format_ident!("{}", SELECTED);

        let mut prelude = TokenStream::new();
        let mut members = Vec::with_capacity(self.fields.len());
        let mut selector_member = None;
        for (position, field) in self.fields.iter().enumerate() {
            let member = member_tokens(field)?;
            let value = self.value(field, ctx)?;
            if Some(position) == self.selector {
                prelude.extend(quote! { let #selected = #value; });
                selector_member = Some(quote! { #member: #selected });
            } else {
                members.push(quote! { #member: #value });
            }
        }
        // Candidate guards borrow `selected`, so it moves into the literal last.
        members.extend(selector_member);

        let docs = if self.docs.is_empty() {
            String::new()
        } else {
            format!("\n\n{}", self.docs)
        };
        // A record without fields reads nothing and can be built in const context.
        let constness = self.fields.is_empty().then(|| quote! { const });
        let constructor = if self.root {
            let doc = format!(" Loads [`{}`] from the environment.{docs}", self.name);
            quote! {
                #[doc = #doc]
                ///
                /// # Errors
                ///
                /// Returns an error when a required key is missing or a value fails to parse.
                pub #constness fn from_env() -> Result<Self, #error> {
                    #prelude
                    Ok(Self { #(#members,)* })
                }
            }
        } else {
            let doc = format!(
                " Loads [`{}`] from keys starting with `prefix`.{docs}",
                self.name
            );
            let prefix = if self.fields.is_empty() {
                quote::format_ident!("_prefix")
            } else {
                quote::format_ident!("prefix")
            };
            quote! {
                #[doc = #doc]
                ///
                /// # Errors
                ///
                /// Returns an error when a required key is missing or a value fails to parse.
                pub #constness fn from_env_with_prefix(#prefix: &str) -> Result<Self, #error> {
                    #prelude
                    Ok(Self { #(#members,)* })
                }
            }
        };
        let dispatcher = dispatch::write(self, ctx)?;
        tracing::debug!(record = %self.name, root = self.root, "record written");

        Ok(quote! {
            impl #record {
                #constructor
                #dispatcher
            }
        })
    }

    /// Key expression for a field: a literal at the root, a prefixed
    /// `format!` below it.
    fn key(&self, field: &Field) -> TokenStream {
        if self.root {
            let key = &field.key;
            quote! { #key }
        } else {
            let format = format!("{{prefix}}_{}", field.key.replace('{', "{{").replace('}', "}}"));
            quote! { &format!(#format) }
        }
    }

    fn value(&self, field: &Field, ctx: &mut GenContext) -> Result<TokenStream, EnvgenError> {
        let key = self.key(field);
        if field.custom {
            let ty = parse_ident("record name", &field.type_name)?;
            let nested = quote! { #ty::from_env_with_prefix(#key)? };
            let selected = quote::format_ident!("{}", SELECTED);
            let label = &field.key;
            return Ok(if field.guarded {
                quote! {
                    if #selected == #label { Some(#nested) } else { None }
                }
            } else if field.declared_optional {
                quote! { Some(#nested) }
            } else {
                nested
            });
        }

        let parser = parser::synthesize(field, &self.name, ctx)?;
        if field.required {
            return Ok(quote! { #parser(#key)? });
        }
        let default = field
            .default_literal
            .as_ref()
            .map_or_else(|| quote! { None }, |literal| quote! { Some(#literal) });
        Ok(if field.declared_optional {
            quote! { #parser(#default, #key)? }
        } else {
            quote! { #parser(#default, #key)?.unwrap_or_default() }
        })
    }
}

fn is_string(shape: &FieldShape) -> bool {
    matches!(
        shape,
        FieldShape::Named(name) | FieldShape::Qualified(name)
            if name == "String" || name == "std::string::String"
    )
}

fn member_tokens(field: &Field) -> Result<TokenStream, EnvgenError> {
    match &field.member {
        Member::Named(name) => Ok(parse_ident("field name", name)?.into_token_stream()),
        Member::Unnamed(index) => Ok(syn::Index::from(*index).into_token_stream()),
    }
}

pub(crate) fn parse_ident(what: &'static str, value: &str) -> Result<syn::Ident, EnvgenError> {
    syn::parse_str(value).map_err(|source| EnvgenError::invalid_template(what, value, source))
}
