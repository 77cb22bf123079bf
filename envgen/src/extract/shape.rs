//! Type-shape classification.
//!
//! Shallow inspection of `syn::Type` values: `Option<T>` and `Vec<T>` are
//! unwrapped one level, plain and qualified paths are named, anything else is
//! unrecognised.

use quote::ToTokens;
use syn::{GenericArgument, Path, PathArguments, Type, TypePath};

use crate::model::FieldShape;

/// Classifies a declared field type.
#[must_use]
pub fn classify(ty: &Type) -> FieldShape {
    match ty {
        Type::Paren(inner) => classify(&inner.elem),
        Type::Group(inner) => classify(&inner.elem),
        Type::Path(type_path) if type_path.qself.is_none() => classify_path(type_path),
        other => FieldShape::Unrecognized(render(other)),
    }
}

fn classify_path(type_path: &TypePath) -> FieldShape {
    let unrecognized = || FieldShape::Unrecognized(render(&Type::Path(type_path.clone())));
    let Some(last) = type_path.path.segments.last() else {
        return unrecognized();
    };

    if let Some(inner) = wrapper_inner(&last.arguments) {
        let Some(name) = plain_path_name(inner) else {
            return unrecognized();
        };
        return match last.ident.to_string().as_str() {
            "Option" => FieldShape::Optional(name),
            "Vec" => FieldShape::Sequence(name),
            _ => unrecognized(),
        };
    }

    match path_name(&type_path.path) {
        Some(name) if type_path.path.segments.len() == 1 => FieldShape::Named(name),
        Some(name) => FieldShape::Qualified(name),
        None => unrecognized(),
    }
}

/// Returns the single type argument of `Wrapper<T>`.
fn wrapper_inner(args: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(angle_args) = args else {
        return None;
    };
    if angle_args.args.len() != 1 {
        return None;
    }
    let GenericArgument::Type(inner) = angle_args.args.first()? else {
        return None;
    };
    Some(inner)
}

/// Name of a path type with no generic arguments.
fn plain_path_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Paren(inner) => plain_path_name(&inner.elem),
        Type::Group(inner) => plain_path_name(&inner.elem),
        Type::Path(type_path) if type_path.qself.is_none() => path_name(&type_path.path),
        _ => None,
    }
}

/// Joins path segments with `::`, dropping any leading `::`.
fn path_name(path: &Path) -> Option<String> {
    let mut segments = Vec::with_capacity(path.segments.len());
    for segment in &path.segments {
        if !segment.arguments.is_none() {
            return None;
        }
        segments.push(segment.ident.to_string());
    }
    Some(segments.join("::"))
}

fn render(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use syn::parse_quote;

    #[rstest]
    #[case(parse_quote!(String), FieldShape::Named("String".to_owned()))]
    #[case(parse_quote!(DataStoreConfig), FieldShape::Named("DataStoreConfig".to_owned()))]
    #[case(parse_quote!(Option<u16>), FieldShape::Optional("u16".to_owned()))]
    #[case(
        parse_quote!(Option<std::time::Duration>),
        FieldShape::Optional("std::time::Duration".to_owned())
    )]
    #[case(parse_quote!(Vec<String>), FieldShape::Sequence("String".to_owned()))]
    #[case(parse_quote!(std::vec::Vec<bool>), FieldShape::Sequence("bool".to_owned()))]
    #[case(
        parse_quote!(::std::time::Duration),
        FieldShape::Qualified("std::time::Duration".to_owned())
    )]
    fn classifies_recognised_shapes(#[case] ty: Type, #[case] expected: FieldShape) {
        assert_eq!(classify(&ty), expected);
    }

    #[rstest]
    #[case(parse_quote!(&'static str))]
    #[case(parse_quote!((u8, u8)))]
    #[case(parse_quote!([u8; 4]))]
    #[case(parse_quote!(Option<Vec<String>>))]
    #[case(parse_quote!(HashMap<String, String>))]
    #[case(parse_quote!(Box<Config>))]
    fn flags_everything_else(#[case] ty: Type) {
        assert!(
            matches!(classify(&ty), FieldShape::Unrecognized(_)),
            "expected {} to be unrecognized",
            render(&ty)
        );
    }
}
