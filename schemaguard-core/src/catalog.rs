//! Catalog document loading.
//!
//! A catalog document wraps the entity definitions of one application
//! schema:
//!
//! ```json
//! {
//!   "format_version": "1.0",
//!   "entities": [
//!     { "table_name": "users", "fields": [{ "name": "id", "type": "long", "primary_key": true }] }
//!   ]
//! }
//! ```
//!
//! The document envelope is checked against an embedded JSON Schema. Entity
//! definitions inside it are deliberately left loose: definitions that cannot
//! be turned into descriptors are skipped by [`crate::extraction`] with a
//! warning instead of rejecting the whole catalog.
//!
//! # Example
//! ```rust
//! use schemaguard_core::catalog::load_catalog;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let entities = load_catalog(r#"{"format_version": "1.0", "entities": []}"#)?;
//! assert!(entities.is_empty());
//! # Ok(())
//! # }
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::extraction::extract_entities;
use crate::models::EntityDescriptor;

/// Catalog document errors with field-level reporting
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Schema compilation failed during initialization
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation {
        /// Compiler diagnostic
        message: String,
    },

    /// The document does not match the catalog format
    #[error("Catalog validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        /// Number of schema violations
        error_count: usize,
        /// One message per violation, with its instance path
        errors: Vec<String>,
    },

    /// Unsupported format version detected
    #[error("Unsupported format version '{version}'. Supported versions: {supported:?}")]
    UnsupportedVersion {
        /// Version found in the document
        version: String,
        /// Versions this build understands
        supported: Vec<String>,
    },

    /// The `entities` member is absent or null
    #[error("Catalog document has no 'entities' member")]
    MissingCatalog,

    /// JSON parsing error
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
}

/// Supported format versions
const SUPPORTED_VERSIONS: &[&str] = &["1.0"];

/// Embedded JSON Schema for the v1.0 catalog envelope
const SCHEMA_V1_0: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "SchemaGuard Entity Catalog Format v1.0",
  "type": "object",
  "required": ["format_version", "entities"],
  "properties": {
    "format_version": {
      "type": "string",
      "pattern": "^1\\.0$"
    },
    "name": { "type": "string" },
    "entities": {
      "type": "array",
      "items": { "type": "object" }
    }
  }
}"#;

/// Compiled JSON Schema instance (initialized once)
static COMPILED_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Initialize and compile the catalog JSON Schema.
///
/// Safe to call repeatedly; the compiled schema is cached on first success.
///
/// # Errors
/// Returns `CatalogError::SchemaCompilation` if the embedded schema is invalid.
pub fn initialize_catalog_validator() -> Result<(), CatalogError> {
    if COMPILED_SCHEMA.get().is_some() {
        return Ok(());
    }

    let schema_json = catalog_schema_definition()?;
    let compiled =
        jsonschema::validator_for(&schema_json).map_err(|e| CatalogError::SchemaCompilation {
            message: format!("Schema compilation error: {}", e),
        })?;

    // Another caller may have won the race; either instance is equivalent
    let _ = COMPILED_SCHEMA.set(compiled);

    Ok(())
}

/// Validate a catalog document against the catalog format.
///
/// Checks, in order: the `entities` member is present and not null, the
/// format version is supported, and the envelope matches the JSON Schema.
///
/// # Errors
/// Returns `CatalogError::SchemaCompilation` if the validator has not been
/// initialized, otherwise the first failing check.
pub fn validate_catalog_document(json_value: &Value) -> Result<(), CatalogError> {
    let schema = COMPILED_SCHEMA
        .get()
        .ok_or_else(|| CatalogError::SchemaCompilation {
            message: "Catalog validator not initialized. Call initialize_catalog_validator() first."
                .to_string(),
        })?;

    if json_value.get("entities").is_none_or(Value::is_null) {
        return Err(CatalogError::MissingCatalog);
    }

    validate_format_version(json_value)?;

    let errors: Vec<String> = schema
        .iter_errors(json_value)
        .map(|error| format!("{} at '{}'", error, error.instance_path()))
        .collect();
    if !errors.is_empty() {
        return Err(CatalogError::ValidationFailed {
            error_count: errors.len(),
            errors,
        });
    }

    Ok(())
}

fn validate_format_version(json_value: &Value) -> Result<(), CatalogError> {
    let version = json_value
        .get("format_version")
        .and_then(Value::as_str)
        .ok_or_else(|| CatalogError::ValidationFailed {
            error_count: 1,
            errors: vec!["Missing required field 'format_version'".to_string()],
        })?;

    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(CatalogError::UnsupportedVersion {
            version: version.to_string(),
            supported: SUPPORTED_VERSIONS.iter().map(|s| s.to_string()).collect(),
        });
    }

    Ok(())
}

/// Parse, validate, and extract the entities of a catalog document.
///
/// Individual entity definitions that cannot be extracted are skipped with a
/// warning; only document-level problems are errors.
///
/// # Errors
/// Returns `CatalogError::JsonParsing` for malformed JSON,
/// `CatalogError::MissingCatalog` when `entities` is absent or null, and the
/// other variants for envelope violations.
pub fn load_catalog(json_str: &str) -> Result<Vec<EntityDescriptor>, CatalogError> {
    let json_value: Value = serde_json::from_str(json_str)?;

    initialize_catalog_validator()?;
    validate_catalog_document(&json_value)?;

    let definitions = json_value
        .get("entities")
        .and_then(Value::as_array)
        .ok_or(CatalogError::MissingCatalog)?;

    let entities = extract_entities(definitions);
    tracing::debug!(
        "Loaded {} of {} entity definitions",
        entities.len(),
        definitions.len()
    );

    Ok(entities)
}

/// The embedded catalog JSON Schema as a parsed value.
pub fn catalog_schema_definition() -> Result<Value, CatalogError> {
    serde_json::from_str(SCHEMA_V1_0).map_err(|e| CatalogError::SchemaCompilation {
        message: format!("Failed to parse embedded schema: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup() {
        let _ = initialize_catalog_validator();
    }

    #[test]
    fn test_catalog_schema_initialization() {
        assert!(initialize_catalog_validator().is_ok());
        assert!(initialize_catalog_validator().is_ok());
    }

    #[test]
    fn test_catalog_minimal_document_passes() {
        setup();
        let document = json!({"format_version": "1.0", "entities": []});
        assert!(validate_catalog_document(&document).is_ok());
    }

    #[test]
    fn test_catalog_missing_entities_is_hard_failure() {
        setup();
        for document in [
            json!({"format_version": "1.0"}),
            json!({"format_version": "1.0", "entities": null}),
        ] {
            assert!(matches!(
                validate_catalog_document(&document),
                Err(CatalogError::MissingCatalog)
            ));
        }
        assert!(matches!(
            load_catalog(r#"{"format_version": "1.0", "entities": null}"#),
            Err(CatalogError::MissingCatalog)
        ));
    }

    #[test]
    fn test_catalog_unsupported_version() {
        setup();
        let document = json!({"format_version": "2.0", "entities": []});
        match validate_catalog_document(&document) {
            Err(CatalogError::UnsupportedVersion { version, supported }) => {
                assert_eq!(version, "2.0");
                assert_eq!(supported, vec!["1.0".to_string()]);
            }
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_missing_version() {
        setup();
        let document = json!({"entities": []});
        assert!(matches!(
            validate_catalog_document(&document),
            Err(CatalogError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_catalog_envelope_violations() {
        setup();
        for document in [
            json!({"format_version": "1.0", "entities": {"users": {}}}),
            json!({"format_version": "1.0", "entities": ["users"]}),
        ] {
            match validate_catalog_document(&document) {
                Err(CatalogError::ValidationFailed { error_count, errors }) => {
                    assert!(error_count >= 1);
                    assert_eq!(error_count, errors.len());
                }
                other => panic!("expected ValidationFailed, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_catalog_malformed_json() {
        assert!(matches!(
            load_catalog("{not json"),
            Err(CatalogError::JsonParsing(_))
        ));
    }

    #[test]
    fn test_catalog_load_extracts_entities() {
        let document = json!({
            "format_version": "1.0",
            "entities": [
                {
                    "table_name": "users",
                    "fields": [{"name": "id", "type": "long", "primary_key": true}]
                },
                {
                    "table_name": "tasks",
                    "fields": [
                        {"name": "id", "type": "long", "primary_key": true},
                        {"name": "user_id", "type": "long"}
                    ],
                    "foreign_keys": [
                        {"entity": "users", "parent_columns": ["id"], "child_columns": ["user_id"]}
                    ]
                },
                {"fields": []}
            ]
        });

        let entities = load_catalog(&document.to_string()).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].table_name, "users");
        assert_eq!(entities[1].foreign_keys.len(), 1);
    }

    #[test]
    fn test_catalog_schema_definition() {
        let schema = catalog_schema_definition().unwrap();
        assert_eq!(schema["required"], json!(["format_version", "entities"]));
    }
}
