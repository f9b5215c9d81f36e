//! Error types for response model assembly.

use crate::version::ProtocolVersion;

/// Errors arising while assembling a response model.
///
/// Assembly is a pure transformation of already-resolved data, so none of
/// these are retryable: the same input always yields the same failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    /// An attribute value could not be normalized into a multi-valued set.
    #[error("invalid shape for attribute `{name}`: {reason}")]
    InvalidAttributeShape { name: String, reason: String },

    /// The assertion carries no principal identifier.
    #[error("assertion carries no principal identifier")]
    MissingPrincipal,

    /// A principal attribute name collides with a field the response owns.
    #[error("principal attribute `{name}` collides with a reserved response field")]
    ReservedAttributeName { name: String },

    /// A stage tried to write a field an earlier stage already wrote.
    #[error("field `{field}` was already written by an earlier stage")]
    FieldConflict { field: String },

    /// A stage tried to write a field it does not own.
    #[error("field `{field}` is not owned by the {stage} stage")]
    FieldNotOwned {
        field: String,
        stage: ProtocolVersion,
    },

    /// A prerequisite stage failed.
    #[error("prerequisite {stage} stage failed: {source}")]
    StageDependency {
        stage: ProtocolVersion,
        #[source]
        source: Box<AssemblyError>,
    },
}

impl AssemblyError {
    /// Wrap a failure raised while running the `stage` prerequisite.
    ///
    /// Failures already wrapped by a deeper stage pass through untouched,
    /// so a chain failure is wrapped exactly once.
    pub(crate) fn wrap_stage(self, stage: ProtocolVersion) -> Self {
        match self {
            wrapped @ AssemblyError::StageDependency { .. } => wrapped,
            other => AssemblyError::StageDependency {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, unwrapping stage dependency failures.
    pub fn root_cause(&self) -> &AssemblyError {
        match self {
            AssemblyError::StageDependency { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Stable machine-readable failure class.
    pub fn code(&self) -> &'static str {
        match self {
            AssemblyError::InvalidAttributeShape { .. } => failure_class::INVALID_ATTRIBUTE_SHAPE,
            AssemblyError::MissingPrincipal => failure_class::MISSING_PRINCIPAL,
            AssemblyError::ReservedAttributeName { .. } => failure_class::RESERVED_ATTRIBUTE_NAME,
            AssemblyError::FieldConflict { .. } => failure_class::FIELD_CONFLICT,
            AssemblyError::FieldNotOwned { .. } => failure_class::FIELD_NOT_OWNED,
            AssemblyError::StageDependency { .. } => failure_class::STAGE_DEPENDENCY_FAILURE,
        }
    }
}

/// Failure class constants carried by failure documents.
pub mod failure_class {
    pub const INVALID_ATTRIBUTE_SHAPE: &str = "invalid_attribute_shape";
    pub const MISSING_PRINCIPAL: &str = "missing_principal";
    pub const RESERVED_ATTRIBUTE_NAME: &str = "reserved_attribute_name";
    pub const FIELD_CONFLICT: &str = "field_conflict";
    pub const FIELD_NOT_OWNED: &str = "field_not_owned";
    pub const STAGE_DEPENDENCY_FAILURE: &str = "stage_dependency_failure";
}
