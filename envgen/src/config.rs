//! Generator configuration.

/// Default glob imported at the top of the generated file.
pub const DEFAULT_SCOPE: &str = "super::*";

/// Default name of the generated error enum.
pub const DEFAULT_ERROR_TYPE: &str = "EnvError";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// Record the run starts from.
    pub root_type: String,
    /// `use` path that brings the records into scope.
    pub scope: String,
    /// Name of the generated error enum.
    pub error_type: String,
    /// Where the records came from, shown in the header comment.
    pub source_label: Option<String>,
}

impl GenConfig {
    /// Creates a configuration rooted at `root_type` with default scope and
    /// error type.
    #[must_use]
    pub fn new(root_type: &str) -> Self {
        Self {
            root_type: root_type.to_owned(),
            scope: DEFAULT_SCOPE.to_owned(),
            error_type: DEFAULT_ERROR_TYPE.to_owned(),
            source_label: None,
        }
    }

    /// Sets the scope import.
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        scope.clone_into(&mut self.scope);
        self
    }

    /// Sets the error enum name.
    #[must_use]
    pub fn with_error_type(mut self, error_type: &str) -> Self {
        error_type.clone_into(&mut self.error_type);
        self
    }

    /// Sets the label shown in the header comment.
    #[must_use]
    pub fn with_source_label(mut self, label: &str) -> Self {
        self.source_label = Some(label.to_owned());
        self
    }
}
