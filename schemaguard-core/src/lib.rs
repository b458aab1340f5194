//! Core data structures and validation for SchemaGuard.
//!
//! SchemaGuard checks the persistence layer of an application, described as a
//! catalog of entity descriptors, for structural defects before any database
//! exists: missing keys, dangling references, type drift between related
//! columns, unindexed foreign keys, risky delete policies, orphaned tables,
//! and reference cycles.
//!
//! # Guarantees
//! - Validation is pure: no I/O, no database access, no network
//! - Identical catalogs and configurations yield identical issues
//! - Schema problems are reported as data, never as errors
//!
//! # Architecture
//! - [`extraction`] turns declarations into [`models::EntityDescriptor`]s
//! - [`catalog`] loads and checks catalog documents
//! - [`validator`] runs the rules and aggregates a [`ValidationResult`]

pub mod catalog;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod models;
pub mod validator;

// Re-export commonly used types
pub use catalog::{CatalogError, initialize_catalog_validator, load_catalog};
pub use error::{Result, SchemaGuardError};
pub use extraction::{EntityDeclaration, extract_entities};
pub use logging::init_logging;
pub use models::{
    EntityDescriptor, FieldDescriptor, FieldType, ForeignKeyDescriptor, IndexDescriptor,
    ReferentialAction, RelationDescriptor, RelationKind,
};
pub use validator::{
    Check, IssueKind, SchemaValidator, Severity, ValidationConfig, ValidationIssue,
    ValidationResult,
};
