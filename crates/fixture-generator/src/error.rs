//! Error types for fixture graph construction.

use thiserror::Error;

/// Errors that can occur while building or resolving a fixture graph.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A unique field's type has no unique-value strategy.
    #[error("Unique field not supported. {model}.{field}: {field_type}")]
    UnsupportedFieldType {
        /// Model owning the field
        model: String,
        /// Field name
        field: String,
        /// Declared type of the field
        field_type: String,
    },

    /// A relation references a model absent from the schema.
    #[error("Could not find relation target model: {0}")]
    UnknownRelationTarget(String),

    /// A unique field produced a value already used by another instance.
    #[error("Duplicate value {value} for unique field {model}.{field}")]
    DuplicateUniqueValue {
        /// Model owning the field
        model: String,
        /// Field name
        field: String,
        /// The colliding value
        value: String,
    },

    /// A factory supplied a constraint for a scalar field, or a plain value
    /// for a relation field.
    #[error("Override for {model}.{field} does not match the field kind ({expected})")]
    OverrideKindMismatch {
        /// Model owning the field
        model: String,
        /// Field name
        field: String,
        /// What the field accepts
        expected: &'static str,
    },
}

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;
