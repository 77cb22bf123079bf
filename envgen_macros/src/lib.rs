//! Procedural macros for `envgen`.
//!
//! [`EnvSchema`](macro@EnvSchema) registers the `env` helper attribute so
//! configuration structs can carry `#[env(...)]` options, and checks those
//! options at compile time with the same extractor the generator uses. It
//! expands to nothing: loaders are produced by the generator, usually from a
//! build script.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{Data, DeriveInput, ItemStruct, parse_macro_input};

use envgen::{FieldShape, RecordDef};

/// Validates `#[env(...)]` options on a configuration struct.
///
/// Supported field options are `default`, `key`, `build` and `build_with`.
/// Unknown options, non-string values, generic structs and field types the
/// generator cannot load are reported as compile errors.
#[proc_macro_derive(EnvSchema, attributes(env))]
pub fn derive_env_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let item = into_struct(input)?;
    let record = RecordDef::from_item(&item)?;

    let mut errors = item
        .fields
        .iter()
        .zip(&record.fields)
        .filter_map(|(field, def)| check_field(field, def).err());
    let Some(mut combined) = errors.next() else {
        return Ok(TokenStream2::new());
    };
    for err in errors {
        combined.combine(err);
    }
    Err(combined)
}

fn into_struct(input: DeriveInput) -> syn::Result<ItemStruct> {
    let DeriveInput {
        attrs,
        vis,
        ident,
        generics,
        data,
    } = input;
    match data {
        Data::Struct(data) => Ok(ItemStruct {
            attrs,
            vis,
            struct_token: data.struct_token,
            ident,
            generics,
            fields: data.fields,
            semi_token: data.semi_token,
        }),
        _ => Err(syn::Error::new_spanned(
            ident,
            "EnvSchema can only be derived for structs",
        )),
    }
}

fn check_field(field: &syn::Field, def: &envgen::FieldDef) -> syn::Result<()> {
    if let FieldShape::Unrecognized(ty) = &def.shape {
        return Err(syn::Error::new_spanned(
            &field.ty,
            format!(
                "unsupported field type `{ty}`; expected a named type, Option<T> or Vec<T>"
            ),
        ));
    }
    if let Some(target) = &def.options.build {
        syn::parse_str::<syn::Type>(target).map_err(|err| {
            syn::Error::new_spanned(field, format!("invalid build type `{target}`: {err}"))
        })?;
    }
    if let Some(method) = &def.options.build_with {
        syn::parse_str::<syn::Ident>(method).map_err(|err| {
            syn::Error::new_spanned(field, format!("invalid build_with method `{method}`: {err}"))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
