//! Error types for SchemaGuard operations.
//!
//! Schema consistency problems found during validation are *data* (see
//! [`crate::validator::ValidationIssue`]), never errors. The types in this
//! module cover the remaining failure modes: malformed descriptors, an absent
//! catalog, configuration problems, and I/O or serialization failures in the
//! surrounding tooling.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::models::DescriptorError;
use crate::validator::ConfigValidationError;

/// Main error type for SchemaGuard operations.
#[derive(Debug, Error)]
pub enum SchemaGuardError {
    /// The entity catalog was missing or could not be loaded
    #[error("Catalog loading failed: {0}")]
    Catalog(#[from] CatalogError),

    /// A descriptor violated a structural invariant
    #[error("Invalid descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Validation configuration was rejected
    #[error("Invalid validation configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// Configuration or setup error
    #[error("Configuration error: {message}")]
    Configuration {
        /// What went wrong
        message: String,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        /// Operation that failed
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        /// Operation that failed
        context: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with SchemaGuardError
pub type Result<T> = std::result::Result<T, SchemaGuardError>;

impl SchemaGuardError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = SchemaGuardError::configuration("Invalid check name");
        assert!(error.to_string().contains("Invalid check name"));

        let error = SchemaGuardError::io(
            "Failed to read catalog.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(error.to_string().contains("catalog.json"));
    }

    #[test]
    fn test_descriptor_error_conversion() {
        let error: SchemaGuardError = DescriptorError::ColumnCountMismatch {
            referenced_entity: "users".to_string(),
            parent_count: 1,
            child_count: 2,
        }
        .into();
        assert!(error.to_string().contains("users"));
    }

    #[test]
    fn test_catalog_error_conversion() {
        let error: SchemaGuardError = CatalogError::MissingCatalog.into();
        assert!(matches!(error, SchemaGuardError::Catalog(_)));
    }
}
