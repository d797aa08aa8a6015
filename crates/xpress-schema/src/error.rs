//! Schema error types.

use thiserror::Error;

/// Errors from building, loading, or looking up schema descriptors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested schema title was not found in the registry.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// A schema with the same title is already registered.
    #[error("Schema already registered: {0}")]
    Duplicate(String),

    /// A field definition does not compile into a validator.
    #[error("Invalid definition for field '{field}': {reason}")]
    InvalidDefinition { field: String, reason: String },

    /// A descriptor document does not have the expected shape.
    #[error("Invalid schema descriptor: {0}")]
    InvalidDescriptor(String),
}
