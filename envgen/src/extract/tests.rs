//! Tests for source extraction.

use super::*;
use crate::model::{FieldOptions, FieldShape};
use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};

const SERVER_CONFIG: &str = r#"
use std::time::Duration;

/// Server settings.
pub struct Config {
    /// Host will configure the http server for what hostname to listen on.
    #[env(default = "localhost")]
    pub host: String,
    #[env(default = "3000")]
    pub port: u16,
    pub data_store: DataStoreConfig,
}

pub struct DataStoreConfig {
    #[env(build = "Box<dyn DataStore>")]
    pub kind: String,
    #[env(key = "MEM")]
    pub mem: Option<MemDataStoreConfig>,
}

pub struct MemDataStoreConfig;

pub struct Pair(#[env(key = "LEFT")] String, u8);

pub struct Generic<T> {
    value: T,
}

pub trait DataStore {}
"#;

#[fixture]
fn graph() -> Result<SchemaGraph> {
    SchemaGraph::parse_str(SERVER_CONFIG).map_err(|err| anyhow!(err))
}

#[rstest]
fn collects_non_generic_structs(graph: Result<SchemaGraph>) -> Result<()> {
    let graph = graph?;
    let names: Vec<&str> = graph.records().map(|r| r.name.as_str()).collect();
    ensure!(
        names == ["Config", "DataStoreConfig", "MemDataStoreConfig", "Pair"],
        "unexpected records {names:?}"
    );
    ensure!(graph.origin("Config") == Some("<source>"));
    Ok(())
}

#[rstest]
fn reads_fields_in_order(graph: Result<SchemaGraph>) -> Result<()> {
    let graph = graph?;
    let config = graph.get("Config").ok_or_else(|| anyhow!("Config missing"))?;
    ensure!(config.docs == "Server settings.");
    let host = config.fields.first().ok_or_else(|| anyhow!("host missing"))?;
    ensure!(host.name.as_deref() == Some("host"));
    ensure!(host.shape == FieldShape::Named("String".to_owned()));
    ensure!(host.options.default.as_deref() == Some("localhost"));
    ensure!(host.docs.starts_with("Host will configure"));
    let names: Vec<Option<&str>> = config.fields.iter().map(|f| f.name.as_deref()).collect();
    ensure!(names == [Some("host"), Some("port"), Some("data_store")]);
    Ok(())
}

#[rstest]
fn reads_selector_and_choice_options(graph: Result<SchemaGraph>) -> Result<()> {
    let graph = graph?;
    let store = graph
        .get("DataStoreConfig")
        .ok_or_else(|| anyhow!("DataStoreConfig missing"))?;
    let [kind, mem] = store.fields.as_slice() else {
        return Err(anyhow!("expected two fields"));
    };
    ensure!(kind.options.build.as_deref() == Some("Box<dyn DataStore>"));
    ensure!(mem.shape == FieldShape::Optional("MemDataStoreConfig".to_owned()));
    ensure!(
        mem.options
            == FieldOptions {
                key: Some("MEM".to_owned()),
                ..FieldOptions::default()
            }
    );
    Ok(())
}

#[rstest]
fn tuple_and_unit_structs(graph: Result<SchemaGraph>) -> Result<()> {
    let graph = graph?;
    let unit = graph
        .get("MemDataStoreConfig")
        .ok_or_else(|| anyhow!("unit missing"))?;
    ensure!(unit.fields.is_empty());
    let pair = graph.get("Pair").ok_or_else(|| anyhow!("Pair missing"))?;
    let indices: Vec<(Option<&str>, usize)> = pair
        .fields
        .iter()
        .map(|f| (f.name.as_deref(), f.index))
        .collect();
    ensure!(indices == [(None, 0), (None, 1)]);
    ensure!(
        pair.fields.first().and_then(|f| f.options.key.as_deref()) == Some("LEFT"),
        "tuple field options should be read"
    );
    Ok(())
}

#[rstest]
fn duplicate_structs_are_rejected() -> Result<()> {
    let mut graph = SchemaGraph::parse_str("struct A { x: String }").map_err(|err| anyhow!(err))?;
    let err = graph
        .add_source("other.rs", "struct A { y: u8 }")
        .err()
        .ok_or_else(|| anyhow!("expected duplicate error"))?;
    ensure!(matches!(err, EnvgenError::DuplicateRecord(ref name) if name == "A"));
    Ok(())
}

#[rstest]
#[case::syntax("struct {", "failed to parse <source>")]
#[case::bad_option(
    "struct A { #[env(nope = \"x\")] a: String }",
    "unknown env option `nope`"
)]
#[case::struct_level("#[env(key = \"A\")] struct A;", "only supported on fields")]
fn malformed_source_fails(#[case] source: &str, #[case] expected: &str) -> Result<()> {
    let err = SchemaGraph::parse_str(source)
        .err()
        .ok_or_else(|| anyhow!("expected parse failure"))?;
    ensure!(
        err.to_string().contains(expected),
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
fn generic_items_are_rejected_directly() {
    let item: ItemStruct = syn::parse_quote! {
        struct Wrapper<T> { value: T }
    };
    assert!(RecordDef::from_item(&item).is_err());
}
