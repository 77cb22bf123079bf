//! Schema graph handed to the generator.
//!
//! These types are the contract between metadata extraction and the engine.
//! They can be built by hand (tests do) or from Rust source with
//! [`SchemaGraph::parse_str`].

use indexmap::IndexMap;

use crate::error::EnvgenError;

/// Declared shape of a field's type.
///
/// The set is closed: anything the extractor cannot place in one of the
/// first four variants lands in [`FieldShape::Unrecognized`], which the
/// analyzer rejects when the field is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// A single-segment type name such as `String` or `DataStoreConfig`.
    Named(String),
    /// `Option<T>`.
    Optional(String),
    /// `Vec<T>`.
    Sequence(String),
    /// A multi-segment path such as `std::time::Duration`.
    Qualified(String),
    /// Any other type expression, rendered for diagnostics.
    Unrecognized(String),
}

/// Options carried by a field's `#[env(...)]` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Raw default value; forces the field to be optional.
    pub default: Option<String>,
    /// Explicit external key replacing the derived one.
    pub key: Option<String>,
    /// Dispatcher target type; marks the field as the selector.
    pub build: Option<String>,
    /// Conversion method called on this field when it is a dispatcher
    /// candidate.
    pub build_with: Option<String>,
}

/// One field of a record, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Declared name; `None` for tuple-struct fields.
    pub name: Option<String>,
    /// Position within the struct.
    pub index: usize,
    /// Declared type shape.
    pub shape: FieldShape,
    /// Parsed `#[env(...)]` options.
    pub options: FieldOptions,
    /// Doc comment text.
    pub docs: String,
}

impl FieldDef {
    /// Creates a named field with no options or docs.
    #[must_use]
    pub fn named(index: usize, name: &str, shape: FieldShape) -> Self {
        Self {
            name: Some(name.to_owned()),
            index,
            shape,
            options: FieldOptions::default(),
            docs: String::new(),
        }
    }

    /// Replaces the field's options.
    #[must_use]
    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the field's doc text.
    #[must_use]
    pub fn with_docs(mut self, docs: &str) -> Self {
        docs.clone_into(&mut self.docs);
        self
    }
}

/// A struct the generator can construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDef {
    /// Struct name; unique within a graph.
    pub name: String,
    /// Doc comment text.
    pub docs: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    /// Creates a record from its name and fields.
    #[must_use]
    pub fn new(name: &str, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.to_owned(),
            docs: String::new(),
            fields,
        }
    }
}

/// All records known to a generation run, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaGraph {
    records: IndexMap<String, RecordDef>,
    origins: IndexMap<String, String>,
}

impl SchemaGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from records.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::DuplicateRecord`] if two records share a name.
    pub fn from_records<I>(records: I) -> Result<Self, EnvgenError>
    where
        I: IntoIterator<Item = RecordDef>,
    {
        let mut graph = Self::new();
        for record in records {
            graph.insert(record)?;
        }
        Ok(graph)
    }

    /// Adds a record.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::DuplicateRecord`] if a record with the same
    /// name is already present.
    pub fn insert(&mut self, record: RecordDef) -> Result<(), EnvgenError> {
        self.insert_from(record, None)
    }

    pub(crate) fn insert_from(
        &mut self,
        record: RecordDef,
        origin: Option<&str>,
    ) -> Result<(), EnvgenError> {
        if self.records.contains_key(&record.name) {
            return Err(EnvgenError::DuplicateRecord(record.name));
        }
        if let Some(origin) = origin {
            self.origins.insert(record.name.clone(), origin.to_owned());
        }
        self.records.insert(record.name.clone(), record);
        Ok(())
    }

    /// Looks up a record by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RecordDef> {
        self.records.get(name)
    }

    /// Whether `name` is a known record.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Where a record was read from, when it came from source text.
    #[must_use]
    pub fn origin(&self, name: &str) -> Option<&str> {
        self.origins.get(name).map(String::as_str)
    }

    /// Iterates over records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &RecordDef> {
        self.records.values()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the graph holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
