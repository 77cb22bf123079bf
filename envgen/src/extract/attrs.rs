//! `#[env(...)]` attribute parsing.

use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Lit, LitStr};

use crate::model::FieldOptions;

/// Name of the helper attribute read by the extractor.
pub const ATTRIBUTE: &str = "env";

const KEYS: &str = "`default`, `key`, `build`, `build_with`";

/// Parses every `#[env(...)]` attribute on a field into one options value.
pub(crate) fn field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident(ATTRIBUTE)) {
        attr.parse_nested_meta(|meta| apply_option(&meta, &mut options))?;
    }
    Ok(options)
}

/// Rejects `#[env(...)]` on the struct itself; options are per field.
pub(crate) fn reject_struct_options(attrs: &[Attribute]) -> syn::Result<()> {
    attrs
        .iter()
        .find(|a| a.path().is_ident(ATTRIBUTE))
        .map_or(Ok(()), |attr| {
            Err(syn::Error::new(
                attr.span(),
                "env options are only supported on fields",
            ))
        })
}

fn apply_option(meta: &ParseNestedMeta, options: &mut FieldOptions) -> syn::Result<()> {
    let Some(ident) = meta.path.get_ident() else {
        return Err(meta.error(format!("expected one of {KEYS}")));
    };
    let key = ident.to_string();
    let slot = match key.as_str() {
        "default" => &mut options.default,
        "key" => &mut options.key,
        "build" => &mut options.build,
        "build_with" => &mut options.build_with,
        other => {
            return Err(meta.error(format!(
                "unknown env option `{other}`; expected one of {KEYS}"
            )));
        }
    };
    if slot.is_some() {
        return Err(meta.error(format!("duplicate env option `{key}`")));
    }
    let value = lit_str(meta, &key)?.value();
    if value.is_empty() && key != "default" {
        return Err(meta.error(format!("env option `{key}` must not be empty")));
    }
    *slot = Some(value);
    Ok(())
}

fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(
            other.span(),
            format!("{key} must be a string"),
        )),
    }
}
