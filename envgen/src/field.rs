//! Field analysis.
//!
//! Turns a declared [`FieldDef`] into a [`Field`]: the shape is reduced to a
//! type name plus `slice`/`required`/`custom` flags, and the external key is
//! derived from the field name unless a `key` option overrides it.

use heck::ToShoutySnakeCase;

use crate::converters::ConverterTable;
use crate::error::EnvgenError;
use crate::model::{FieldDef, FieldShape, SchemaGraph};

/// Method called on a dispatcher candidate when no `build_with` is given.
pub const DEFAULT_BUILD_METHOD: &str = "build";

/// How a field is addressed inside a struct literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// Named field.
    Named(String),
    /// Tuple-struct field position.
    Unnamed(usize),
}

/// An analyzed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Declared name, or the type name for tuple fields.
    pub name: String,
    /// Struct-literal member.
    pub member: Member,
    /// Element type name with any `Option`/`Vec` wrapper removed.
    pub type_name: String,
    /// The key must be present.
    pub required: bool,
    /// Declared as `Vec<T>`.
    pub slice: bool,
    /// `type_name` is a record in the graph.
    pub custom: bool,
    /// Declared as `Option<T>`.
    pub declared_optional: bool,
    /// External key, before any run-time prefix.
    pub key: String,
    /// Raw default value from the `default` option.
    pub default_literal: Option<String>,
    /// Dispatcher target type when this field is the selector.
    pub selector: Option<String>,
    /// Method called when this field is a dispatcher candidate.
    pub build_with: String,
    /// Set by the record builder on dispatcher candidates.
    pub guarded: bool,
    /// Doc comment text.
    pub docs: String,
}

impl Field {
    /// Whether this field selects between candidates.
    #[must_use]
    pub const fn is_selector(&self) -> bool {
        self.selector.is_some()
    }

    /// Analyzes `def`, declared in `record`, against the known records and
    /// converters.
    ///
    /// # Errors
    ///
    /// Returns [`EnvgenError::UnrecognizedShape`] for type expressions
    /// outside the recognised shapes and [`EnvgenError::UnknownType`] for
    /// primitive fields whose type has no converter.
    pub fn analyze(
        def: &FieldDef,
        record: &str,
        graph: &SchemaGraph,
        converters: &ConverterTable,
    ) -> Result<Self, EnvgenError> {
        let member = def
            .name
            .as_ref()
            .map_or(Member::Unnamed(def.index), |name| Member::Named(name.clone()));

        let (type_name, slice, declared_optional, may_be_custom) = match &def.shape {
            FieldShape::Named(name) => (name.clone(), false, false, true),
            FieldShape::Optional(name) => (name.clone(), false, true, true),
            FieldShape::Sequence(name) => (name.clone(), true, false, false),
            FieldShape::Qualified(name) => (name.clone(), false, false, false),
            FieldShape::Unrecognized(ty) => {
                return Err(EnvgenError::UnrecognizedShape {
                    record: record.to_owned(),
                    field: display_name(def),
                    ty: ty.clone(),
                });
            }
        };

        let name = def.name.clone().unwrap_or_else(|| type_name.clone());
        let custom = may_be_custom && graph.contains(&type_name);
        if !custom && !converters.contains(&type_name) {
            return Err(EnvgenError::UnknownType {
                record: record.to_owned(),
                field: name,
                type_name,
            });
        }

        let key = def
            .options
            .key
            .clone()
            .unwrap_or_else(|| derive_key(&name));
        let default_literal = def.options.default.clone();
        if custom && default_literal.is_some() {
            tracing::warn!(record, field = %name, "default ignored on a nested record field");
        }
        if !custom && def.options.build_with.is_some() {
            tracing::warn!(record, field = %name, "build_with ignored on a primitive field");
        }

        let field = Self {
            required: !declared_optional && default_literal.is_none(),
            default_literal: if custom { None } else { default_literal },
            selector: def.options.build.clone(),
            build_with: def
                .options
                .build_with
                .clone()
                .unwrap_or_else(|| DEFAULT_BUILD_METHOD.to_owned()),
            guarded: false,
            docs: def.docs.clone(),
            name,
            member,
            type_name,
            slice,
            custom,
            declared_optional,
            key,
        };
        tracing::debug!(
            record,
            field = %field.name,
            key = %field.key,
            required = field.required,
            custom = field.custom,
            "field analyzed"
        );
        Ok(field)
    }
}

/// Derives the external key for a field or type name.
///
/// `host` becomes `HOST`, `data_store` and `DataStoreType` become
/// `DATA_STORE` and `DATA_STORE_TYPE`. Raw identifiers lose their `r#`, and
/// only the last segment of a path is used.
#[must_use]
pub fn derive_key(name: &str) -> String {
    let name = name.rsplit("::").next().unwrap_or(name);
    let name = name.strip_prefix("r#").unwrap_or(name);
    name.to_shouty_snake_case()
}

fn display_name(def: &FieldDef) -> String {
    def.name
        .clone()
        .unwrap_or_else(|| def.index.to_string())
}
