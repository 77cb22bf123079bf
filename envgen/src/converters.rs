//! Primitive converter table.
//!
//! A converter turns the raw string read from one environment variable into
//! a value of a primitive type. Each entry names the code template used
//! inside the generated parser together with the imports and error variants
//! that template needs.

use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::quote;

use crate::cache::{ErrorDef, INVALID_BOOL, INVALID_DURATION, INVALID_FLOAT, INVALID_INT};

/// Names visible to a conversion template.
///
/// Templates run inside a generated parser where `raw: String` holds the
/// value and `key: &str` holds the variable name. They must evaluate to
/// `Result<ty, error>`.
#[derive(Debug, Clone, Copy)]
pub struct Template<'a> {
    /// Target type.
    pub ty: &'a syn::Type,
    /// Generated error enum.
    pub error: &'a syn::Ident,
}

/// One primitive type the generated code can parse.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    /// Short name used in parser identities, e.g. `u16` or `duration`.
    pub name: &'static str,
    /// Type as written in generated code.
    pub rust_type: &'static str,
    /// Every spelling a field type may use to select this converter.
    pub aliases: &'static [&'static str],
    /// Zero value written to the env example for required keys.
    pub zero: &'static str,
    /// `use` paths the template relies on.
    pub imports: &'static [&'static str],
    /// Error variants the template may construct.
    pub errors: &'static [ErrorDef],
    /// Renders the conversion expression.
    pub convert: fn(&Template<'_>) -> TokenStream,
}

impl Converter {
    /// Renders this converter's template.
    #[must_use]
    pub fn render(&self, template: &Template<'_>) -> TokenStream {
        (self.convert)(template)
    }
}

fn convert_string(_: &Template<'_>) -> TokenStream {
    quote! { Ok(raw) }
}

fn convert_path(_: &Template<'_>) -> TokenStream {
    quote! { Ok(PathBuf::from(raw)) }
}

fn convert_bool(template: &Template<'_>) -> TokenStream {
    let error = template.error;
    quote! {
        match raw.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" | "t" | "1" | "on" => Ok(true),
            "n" | "no" | "false" | "f" | "0" | "off" => Ok(false),
            _ => Err(#error::InvalidBool(format!("{key}={raw}"))),
        }
    }
}

fn convert_int(template: &Template<'_>) -> TokenStream {
    let Template { ty, error } = template;
    quote! {
        raw.trim()
            .parse::<#ty>()
            .map_err(|source| #error::InvalidInt(key.to_owned(), source))
    }
}

fn convert_float(template: &Template<'_>) -> TokenStream {
    let Template { ty, error } = template;
    quote! {
        raw.trim()
            .parse::<#ty>()
            .map_err(|source| #error::InvalidFloat(key.to_owned(), source))
    }
}

fn convert_duration(template: &Template<'_>) -> TokenStream {
    let error = template.error;
    quote! {
        humantime::parse_duration(raw.trim())
            .map_err(|source| #error::InvalidDuration(key.to_owned(), source))
    }
}

macro_rules! integer {
    ($name:literal) => {
        Converter {
            name: $name,
            rust_type: $name,
            aliases: &[$name],
            zero: "0",
            imports: &["std::num::ParseIntError"],
            errors: &[INVALID_INT],
            convert: convert_int,
        }
    };
}

const BUILTIN: &[Converter] = &[
    Converter {
        name: "string",
        rust_type: "String",
        aliases: &["String", "std::string::String"],
        zero: "",
        imports: &[],
        errors: &[],
        convert: convert_string,
    },
    Converter {
        name: "bool",
        rust_type: "bool",
        aliases: &["bool"],
        zero: "false",
        imports: &[],
        errors: &[INVALID_BOOL],
        convert: convert_bool,
    },
    integer!("i8"),
    integer!("i16"),
    integer!("i32"),
    integer!("i64"),
    integer!("i128"),
    integer!("isize"),
    integer!("u8"),
    integer!("u16"),
    integer!("u32"),
    integer!("u64"),
    integer!("u128"),
    integer!("usize"),
    Converter {
        name: "f32",
        rust_type: "f32",
        aliases: &["f32"],
        zero: "0",
        imports: &["std::num::ParseFloatError"],
        errors: &[INVALID_FLOAT],
        convert: convert_float,
    },
    Converter {
        name: "f64",
        rust_type: "f64",
        aliases: &["f64"],
        zero: "0",
        imports: &["std::num::ParseFloatError"],
        errors: &[INVALID_FLOAT],
        convert: convert_float,
    },
    Converter {
        name: "duration",
        rust_type: "Duration",
        aliases: &["Duration", "std::time::Duration", "core::time::Duration"],
        zero: "0s",
        imports: &["std::time::Duration"],
        errors: &[INVALID_DURATION],
        convert: convert_duration,
    },
    Converter {
        name: "path_buf",
        rust_type: "PathBuf",
        aliases: &["PathBuf", "std::path::PathBuf"],
        zero: "",
        imports: &["std::path::PathBuf"],
        errors: &[],
        convert: convert_path,
    },
];

/// Converters keyed by every alias they answer to.
#[derive(Debug, Clone, Default)]
pub struct ConverterTable {
    by_alias: IndexMap<&'static str, Converter>,
}

impl ConverterTable {
    /// Creates a table with no converters.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the table of built-in primitive converters.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for converter in BUILTIN {
            table.insert(*converter);
        }
        table
    }

    /// Adds a converter, replacing any entry that shares one of its aliases.
    pub fn insert(&mut self, converter: Converter) {
        for alias in converter.aliases {
            self.by_alias.insert(alias, converter);
        }
    }

    /// Finds the converter for a field type name.
    #[must_use]
    pub fn lookup(&self, type_name: &str) -> Option<&Converter> {
        self.by_alias.get(type_name)
    }

    /// Whether `type_name` resolves to a converter.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.by_alias.contains_key(type_name)
    }
}
