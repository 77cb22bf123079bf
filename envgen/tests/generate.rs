//! End-to-end generation tests.

use anyhow::{Result, anyhow, ensure};
use envgen::cache::ErrorDef;
use envgen::converters::Template;
use envgen::{
    Converter, EnvgenError, FieldDef, FieldShape, GenConfig, Generated, Generator, RecordDef,
    SchemaGraph, generate,
};
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use rstest::{fixture, rstest};

const SERVER: &str = r#"
/// Server settings.
pub struct Config {
    /// Host will configure the http server for what hostname to listen on.
    #[env(default = "localhost")]
    pub host: String,
    /// Port will configure the HTTP port to listen on.
    #[env(default = "3000")]
    pub port: u16,
    /// DataStore handles storing our data for key values.
    pub data_store: DataStoreConfig,
}

pub struct DataStoreConfig {
    #[env(build = "Box<dyn DataStore>")]
    pub kind: String,
    #[env(key = "MEM")]
    pub mem: Option<MemDataStoreConfig>,
    #[env(key = "FILE")]
    pub file: Option<FileDataStoreConfig>,
}

pub struct MemDataStoreConfig;

pub struct FileDataStoreConfig {
    /// Path of the file backing the store.
    #[env(key = "FILENAME", default = "data.db")]
    pub filename: String,
}

pub trait DataStore {}
"#;

#[fixture]
fn server() -> SchemaGraph {
    SchemaGraph::parse_str(SERVER).expect("server fixture parses")
}

fn run(graph: &SchemaGraph, root: &str) -> Result<Generated> {
    generate(graph, &GenConfig::new(root)).map_err(|err| anyhow!(err))
}

fn functions(source: &str) -> Result<Vec<String>> {
    let file = syn::parse_file(source)?;
    Ok(file
        .items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Fn(f) => Some(f.sig.ident.to_string()),
            _ => None,
        })
        .collect())
}

fn error_variants(source: &str) -> Result<Vec<String>> {
    let file = syn::parse_file(source)?;
    file.items
        .iter()
        .find_map(|item| match item {
            syn::Item::Enum(e) if e.ident == "EnvError" => {
                Some(e.variants.iter().map(|v| v.ident.to_string()).collect())
            }
            _ => None,
        })
        .ok_or_else(|| anyhow!("EnvError missing"))
}

#[rstest]
fn server_expands_each_record_once(server: SchemaGraph) -> Result<()> {
    let generated = run(&server, "Config")?;
    ensure!(
        generated.records
            == [
                "Config",
                "DataStoreConfig",
                "MemDataStoreConfig",
                "FileDataStoreConfig"
            ],
        "unexpected expansion order {:?}",
        generated.records
    );
    Ok(())
}

#[rstest]
fn server_parsers_are_deduplicated(server: SchemaGraph) -> Result<()> {
    let generated = run(&server, "Config")?;
    let functions = functions(&generated.source)?;
    ensure!(
        functions
            == [
                "parse_string_optional",
                "parse_u16_optional",
                "parse_string_required"
            ],
        "unexpected parsers {functions:?}"
    );
    Ok(())
}

#[rstest]
fn server_errors_cover_used_variants(server: SchemaGraph) -> Result<()> {
    let generated = run(&server, "Config")?;
    let variants = error_variants(&generated.source)?;
    ensure!(
        variants
            == [
                "NotUnicode",
                "InvalidInt",
                "KeyNotFound",
                "InvalidChoice",
                "Build"
            ],
        "unexpected variants {variants:?}"
    );
    Ok(())
}

#[rstest]
fn output_sections_are_ordered(server: SchemaGraph) -> Result<()> {
    let source = run(&server, "Config")?.source;
    ensure!(source.starts_with("// Code generated by envgen from `Config`. DO NOT EDIT.\n"));
    let position = |needle: &str| {
        source
            .find(needle)
            .ok_or_else(|| anyhow!("{needle:?} missing from output"))
    };
    ensure!(position("use super::*;")? < position("use std::env;")?);
    ensure!(position("use std::env;")? < position("pub enum EnvError")?);
    ensure!(position("pub enum EnvError")? < position("impl Config")?);
    ensure!(position("impl Config")? < position("impl DataStoreConfig")?);
    ensure!(position("impl FileDataStoreConfig")? < position("fn parse_string_optional")?);
    ensure!(source.contains("pub fn build(&self) -> Result<Box<dyn DataStore>, EnvError>"));
    Ok(())
}

#[rstest]
fn generation_is_deterministic(server: SchemaGraph) -> Result<()> {
    let first = run(&server, "Config")?;
    let second = run(&server, "Config")?;
    ensure!(first == second);
    Ok(())
}

#[rstest]
fn env_example_lists_prefixed_keys(server: SchemaGraph) -> Result<()> {
    let example = run(&server, "Config")?.env_example;
    for line in [
        "# Host will configure the http server for what hostname to listen on.",
        "HOST=localhost",
        "PORT=3000",
        "# one of: MEM, FILE",
        "DATA_STORE_KIND=",
        "# used when DATA_STORE_KIND=FILE",
        "DATA_STORE_FILE_FILENAME=data.db",
    ] {
        ensure!(
            example.lines().any(|l| l == line),
            "missing {line:?} in:\n{example}"
        );
    }
    Ok(())
}

#[rstest]
fn generation_options_are_applied(server: SchemaGraph) -> Result<()> {
    let config = GenConfig::new("Config")
        .with_scope("crate::settings::*")
        .with_error_type("LoadError")
        .with_source_label("src/settings.rs");
    let source = generate(&server, &config).map_err(|err| anyhow!(err))?.source;
    ensure!(source.contains("from `Config` in src/settings.rs"));
    ensure!(source.contains("use crate::settings::*;"));
    ensure!(source.contains("pub enum LoadError"));
    ensure!(!source.contains("EnvError"));
    Ok(())
}

#[rstest]
fn missing_root_is_reported(server: SchemaGraph) {
    let err = generate(&server, &GenConfig::new("Settings")).err();
    assert!(matches!(err, Some(EnvgenError::ConfigTypeNotFound(ref name)) if name == "Settings"));
}

#[rstest]
#[case::pair(
    "pub struct A { b: B } pub struct B { a: Option<A> }",
    "cyclic type graph: A -> B -> A"
)]
#[case::self_reference("pub struct A { next: Option<A> }", "cyclic type graph: A -> A")]
#[case::unknown_type(
    "pub struct A { id: Uuid }",
    "unknown type 'Uuid' for field 'id' in 'A'"
)]
#[case::unrecognized_shape(
    "pub struct A { pair: (u8, u8) }",
    "unrecognized type `(u8 , u8)` for field 'pair' in 'A'"
)]
#[case::nested_sequence(
    "pub struct A { items: Vec<B> } pub struct B { x: u8 }",
    "unknown type 'B' for field 'items' in 'A'"
)]
fn invalid_graphs_fail(#[case] source: &str, #[case] expected: &str) -> Result<()> {
    let graph = SchemaGraph::parse_str(source).map_err(|err| anyhow!(err))?;
    let err = generate(&graph, &GenConfig::new("A"))
        .err()
        .ok_or_else(|| anyhow!("expected {expected:?}"))?;
    ensure!(err.to_string() == expected, "unexpected error: {err}");
    Ok(())
}

#[rstest]
fn unreachable_records_are_not_expanded() -> Result<()> {
    let graph = SchemaGraph::parse_str(
        "pub struct A { debug: Option<bool> } pub struct Unused { broken: Uuid }",
    )
    .map_err(|err| anyhow!(err))?;
    let generated = run(&graph, "A")?;
    ensure!(generated.records == ["A"]);
    ensure!(functions(&generated.source)? == ["parse_bool_optional"]);
    ensure!(error_variants(&generated.source)? == ["InvalidBool", "NotUnicode"]);
    ensure!(generated.env_example.lines().any(|l| l == "# DEBUG="));
    Ok(())
}

#[rstest]
fn slices_and_durations_are_supported() -> Result<()> {
    let graph = SchemaGraph::parse_str(
        r#"
        pub struct A {
            #[env(default = "GET,POST")]
            methods: Vec<String>,
            ports: Vec<u16>,
            timeout: std::time::Duration,
        }
        "#,
    )
    .map_err(|err| anyhow!(err))?;
    let generated = run(&graph, "A")?;
    ensure!(
        functions(&generated.source)?
            == [
                "parse_string_slice_optional",
                "parse_u16_slice_required",
                "parse_duration_required"
            ]
    );
    ensure!(generated.source.contains("use std::time::Duration;"));
    ensure!(generated.source.contains("humantime::parse_duration"));
    ensure!(generated.env_example.lines().any(|l| l == "TIMEOUT=0s"));
    Ok(())
}

fn count_impls(source: &str, record: &str) -> Result<usize> {
    let file = syn::parse_file(source)?;
    Ok(file
        .items
        .iter()
        .filter(|item| {
            matches!(item, syn::Item::Impl(i) if i.self_ty.to_token_stream().to_string() == record)
        })
        .count())
}

fn count_imports(source: &str, path: &str) -> Result<usize> {
    let file = syn::parse_file(source)?;
    Ok(file
        .items
        .iter()
        .filter(|item| {
            matches!(item, syn::Item::Use(u) if u.tree.to_token_stream().to_string() == path)
        })
        .count())
}

#[fixture]
fn diamond() -> SchemaGraph {
    let nested = |index, name: &str, ty: &str| {
        FieldDef::named(index, name, FieldShape::Named(ty.to_owned()))
    };
    SchemaGraph::from_records([
        RecordDef::new("A", vec![nested(0, "b", "B"), nested(1, "c", "C")]),
        RecordDef::new("B", vec![nested(0, "d", "D")]),
        RecordDef::new("C", vec![nested(0, "d", "D")]),
        RecordDef::new(
            "D",
            vec![nested(0, "value", "u16").with_docs("Shared value.")],
        ),
    ])
    .expect("diamond records are unique")
}

#[rstest]
fn shared_records_are_expanded_once(diamond: SchemaGraph) -> Result<()> {
    let generated = run(&diamond, "A")?;
    ensure!(generated.records == ["A", "B", "C", "D"]);
    ensure!(count_impls(&generated.source, "D")? == 1);
    let parsers = functions(&generated.source)?;
    ensure!(parsers == ["parse_u16_required"], "parsers: {parsers:?}");
    ensure!(
        generated
            .source
            .matches("D::from_env_with_prefix(&format!(\"{prefix}_D\"))")
            .count()
            == 2,
        "both parents load D: {}",
        generated.source
    );
    let lines: Vec<&str> = generated.env_example.lines().collect();
    for line in ["B_D_VALUE=0", "C_D_VALUE=0", "# Shared value."] {
        ensure!(lines.contains(&line), "missing {line:?} in:\n{}", generated.env_example);
    }
    Ok(())
}

const INVALID_URL: ErrorDef = ErrorDef::new("InvalidUrl", "invalid url").with_source("ParseError");

fn convert_url(template: &Template<'_>) -> TokenStream {
    let Template { ty, error } = template;
    quote! {
        #ty::parse(raw.trim()).map_err(|source| #error::InvalidUrl(key.to_owned(), source))
    }
}

const URL: Converter = Converter {
    name: "url",
    rust_type: "Url",
    aliases: &["Url", "url::Url"],
    zero: "http://localhost",
    imports: &["url::Url", "url::ParseError"],
    errors: &[INVALID_URL],
    convert: convert_url,
};

#[rstest]
fn registered_converters_drive_generation() -> Result<()> {
    let graph = SchemaGraph::parse_str(
        r#"
        pub struct Mirrors {
            pub primary: Url,
            pub fallback: url::Url,
            #[env(default = "http://a,http://b")]
            pub extra: Vec<Url>,
            pub port: u16,
        }
        "#,
    )
    .map_err(|err| anyhow!(err))?;
    let mut generator = Generator::new();
    generator.converters_mut().insert(URL);
    let generated = generator
        .generate(&graph, &GenConfig::new("Mirrors"))
        .map_err(|err| anyhow!(err))?;
    let source = &generated.source;

    ensure!(
        functions(source)?
            == [
                "parse_url_required",
                "parse_url_slice_optional",
                "parse_u16_required"
            ]
    );
    ensure!(count_imports(source, "url :: Url")? == 1);
    ensure!(count_imports(source, "url :: ParseError")? == 1);
    let variants = error_variants(source)?;
    ensure!(
        variants.iter().filter(|v| *v == "InvalidUrl").count() == 1,
        "variants: {variants:?}"
    );
    ensure!(source.contains("Url::parse(raw.trim())"), "{source}");
    ensure!(generated.env_example.contains("PRIMARY=http://localhost"));

    ensure!(
        matches!(
            generate(&graph, &GenConfig::new("Mirrors")),
            Err(EnvgenError::UnknownType { ref type_name, .. }) if type_name == "Url"
        ),
        "built-in table has no Url converter"
    );
    Ok(())
}
