//! Error type for the generation engine.

use thiserror::Error;

/// Errors that abort a generation run.
///
/// The engine has no partial-success mode: the first of these stops the run
/// and nothing is emitted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnvgenError {
    /// The requested root type is not part of the schema graph.
    #[error("config type '{0}' not found")]
    ConfigTypeNotFound(String),

    /// A record type discovered through a nested field is missing.
    #[error("record type '{0}' not found")]
    RecordNotFound(String),

    /// Two structs with the same name were fed into one schema graph.
    #[error("record type '{0}' is declared more than once")]
    DuplicateRecord(String),

    /// A field's declared type is not one of the recognised shapes.
    #[error("unrecognized type `{ty}` for field '{field}' in '{record}'")]
    UnrecognizedShape {
        /// Record declaring the field.
        record: String,
        /// Offending field.
        field: String,
        /// Rendered type expression.
        ty: String,
    },

    /// A primitive field names a type the converter table does not know.
    #[error("unknown type '{type_name}' for field '{field}' in '{record}'")]
    UnknownType {
        /// Record declaring the field.
        record: String,
        /// Offending field.
        field: String,
        /// Type name that failed to resolve.
        type_name: String,
    },

    /// Records reference each other in a loop.
    #[error("cyclic type graph: {cycle}")]
    CyclicGraph {
        /// Record names along the cycle, first name repeated at the end.
        cycle: String,
    },

    /// A record declares more than one `build` selector.
    #[error("record '{record}' declares selectors '{first}' and '{second}'; only one is allowed")]
    DuplicateSelector {
        /// Record declaring the selectors.
        record: String,
        /// First selector field.
        first: String,
        /// Second selector field.
        second: String,
    },

    /// The selector field cannot be compared against case labels.
    #[error("selector '{field}' in '{record}' {reason}")]
    InvalidSelector {
        /// Record declaring the selector.
        record: String,
        /// Selector field.
        field: String,
        /// Why the selector was rejected.
        reason: &'static str,
    },

    /// A dispatcher candidate is not declared as `Option<T>`.
    #[error("choice field '{field}' in '{record}' must be declared as Option<{type_name}>")]
    ChoiceNotOptional {
        /// Record declaring the candidate.
        record: String,
        /// Candidate field.
        field: String,
        /// Candidate record type.
        type_name: String,
    },

    /// A tag or configuration value does not parse as Rust syntax.
    #[error("invalid {what} `{value}`: {source}")]
    InvalidTemplate {
        /// What the value was meant to be.
        what: &'static str,
        /// The rejected value.
        value: String,
        /// Parser diagnostic.
        #[source]
        source: syn::Error,
    },

    /// Source text handed to the extractor failed to parse.
    #[error("failed to parse {origin}: {source}")]
    Parse {
        /// Where the source came from.
        origin: String,
        /// Parser diagnostic.
        #[source]
        source: syn::Error,
    },

    /// The assembled output is not valid Rust.
    #[error("error formatting generated code: {source}")]
    Format {
        /// Parser diagnostic.
        #[source]
        source: syn::Error,
        /// The unformatted output, kept for debugging.
        buffer: String,
    },
}

impl EnvgenError {
    pub(crate) fn invalid_template(what: &'static str, value: &str, source: syn::Error) -> Self {
        Self::InvalidTemplate {
            what,
            value: value.to_owned(),
            source,
        }
    }
}
