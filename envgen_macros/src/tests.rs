//! Unit tests for the `EnvSchema` expansion.

use super::expand;
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

#[rstest]
fn valid_struct_expands_to_nothing() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        pub struct Config {
            #[env(default = "localhost")]
            host: String,
            #[env(default = "3000")]
            port: u16,
            methods: Vec<String>,
            timeout: Option<std::time::Duration>,
            data_store: DataStoreConfig,
        }
    };
    let tokens = expand(input).map_err(|err| anyhow!(err))?;
    ensure!(tokens.is_empty());
    Ok(())
}

#[rstest]
fn selector_options_are_accepted() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        pub struct DataStoreConfig {
            #[env(build = "Box<dyn DataStore>")]
            kind: String,
            #[env(key = "FILE", build_with = "open")]
            file: Option<FileDataStoreConfig>,
        }
    };
    ensure!(expand(input).is_ok());
    Ok(())
}

#[rstest]
#[case::enum_input(
    parse_quote! { enum Mode { A, B } },
    "EnvSchema can only be derived for structs"
)]
#[case::generic(
    parse_quote! { struct Wrapper<T> { value: T } },
    "generic structs cannot be loaded"
)]
#[case::unknown_option(
    parse_quote! { struct S { #[env(prefix = "APP")] a: String } },
    "unknown env option `prefix`"
)]
#[case::struct_option(
    parse_quote! { #[env(key = "APP")] struct S { a: String } },
    "only supported on fields"
)]
#[case::tuple_type(
    parse_quote! { struct S { pair: (u8, u8) } },
    "unsupported field type `(u8 , u8)`"
)]
#[case::bad_build(
    parse_quote! { struct S { #[env(build = "Box<")] kind: String } },
    "invalid build type `Box<`"
)]
#[case::bad_build_with(
    parse_quote! { struct S { #[env(build_with = "open now")] c: Option<C> } },
    "invalid build_with method `open now`"
)]
fn rejects_invalid_input(#[case] input: DeriveInput, #[case] expected: &str) -> Result<()> {
    let Err(err) = expand(input) else {
        return Err(anyhow!("expected an error containing {expected:?}"));
    };
    ensure!(
        err.to_string().contains(expected),
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
fn reports_every_bad_field() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct S {
            a: &'static str,
            b: [u8; 4],
        }
    };
    let Err(err) = expand(input) else {
        return Err(anyhow!("expected errors"));
    };
    ensure!(err.into_iter().count() == 2);
    Ok(())
}
