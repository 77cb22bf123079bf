//! Generation driver.
//!
//! Seeds the discovery queue with the root record and expands records until
//! the queue drains. Expansion only appends constructor tokens and fills the
//! caches; once the graph is known to be acyclic the caches are flushed in
//! front of the constructors and the whole file is formatted.

use indexmap::IndexMap;
use proc_macro2::TokenStream;

use crate::config::GenConfig;
use crate::context::GenContext;
use crate::converters::ConverterTable;
use crate::cycles::RecordEdges;
use crate::env_example;
use crate::error::EnvgenError;
use crate::format;
use crate::model::SchemaGraph;
use crate::record::RecordBuilder;

/// Output of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Formatted Rust source.
    pub source: String,
    /// `.env` example listing every reachable key.
    pub env_example: String,
    /// Records in the order they were expanded.
    pub records: Vec<String>,
}

/// Runs generation with a configurable converter table.
#[derive(Debug, Clone)]
pub struct Generator {
    converters: ConverterTable,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Creates a generator with the built-in converters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_converters(ConverterTable::builtin())
    }

    /// Creates a generator with a custom converter table.
    #[must_use]
    pub const fn with_converters(converters: ConverterTable) -> Self {
        Self { converters }
    }

    /// Mutable access to the converter table, for registering extra
    /// primitive types.
    pub const fn converters_mut(&mut self) -> &mut ConverterTable {
        &mut self.converters
    }

    /// Generates the loader for `config.root_type`.
    ///
    /// # Errors
    ///
    /// Returns the first [`EnvgenError`] met; no partial output is produced.
    pub fn generate(
        &self,
        graph: &SchemaGraph,
        config: &GenConfig,
    ) -> Result<Generated, EnvgenError> {
        let root = config.root_type.as_str();
        if !graph.contains(root) {
            return Err(EnvgenError::ConfigTypeNotFound(root.to_owned()));
        }

        let mut ctx = GenContext::new(config.clone(), self.converters.clone())?;
        let mut body = TokenStream::new();
        let mut records: IndexMap<String, RecordBuilder> = IndexMap::new();
        let mut edges = RecordEdges::new();

        ctx.queue.add(root);
        while let Some(name) = ctx.queue.pop() {
            let def = graph
                .get(&name)
                .ok_or_else(|| EnvgenError::RecordNotFound(name.clone()))?;
            tracing::debug!(record = %name, origin = graph.origin(&name), "expanding record");
            let builder = RecordBuilder::analyze(def, name == root, graph, &mut ctx)?;
            edges.touch(&name);
            for field in builder.fields().iter().filter(|f| f.custom) {
                edges.add(&name, &field.type_name);
            }
            body.extend(builder.write(&mut ctx)?);
            records.insert(name, builder);
        }

        if let Some(cycle) = edges.find_cycle() {
            return Err(EnvgenError::CyclicGraph {
                cycle: cycle.join(" -> "),
            });
        }

        let mut tokens = ctx.imports.write()?;
        tokens.extend(ctx.errors.write(&ctx.error)?);
        tokens.extend(body);
        tokens.extend(ctx.parsers.write(&ctx.error)?);

        let header = format::header(root, config.source_label.as_deref());
        let source = format::format_file(&header, tokens)?;
        let env_example = env_example::render(root, &records, &ctx.converters);
        tracing::debug!(
            records = ctx.queue.expanded(),
            parsers = ctx.parsers.len(),
            imports = ctx.imports.len(),
            errors = ctx.errors.len(),
            "generation finished"
        );

        Ok(Generated {
            source,
            env_example,
            records: records.into_keys().collect(),
        })
    }
}

/// Generates the loader for `config.root_type` with the built-in
/// converters.
///
/// # Errors
///
/// See [`Generator::generate`].
pub fn generate(graph: &SchemaGraph, config: &GenConfig) -> Result<Generated, EnvgenError> {
    Generator::new().generate(graph, config)
}
