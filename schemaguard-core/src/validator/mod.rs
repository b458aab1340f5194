//! Schema consistency validation.
//!
//! This module checks an entity catalog for structural defects:
//! - **Keys**: missing and unresolved primary keys
//! - **References**: dangling foreign keys, column and type mismatches
//! - **Indexes**: unindexed foreign keys and duplicate indexes
//! - **Delete policies**: `SET NULL` on mandatory columns, restrictive
//!   policies on owned-by relationships
//! - **Graph shape**: orphaned entities and reference cycles
//! - **Relations**: relation declarations not backed by a foreign key
//!
//! Validation never fails; every finding becomes a [`ValidationIssue`] and
//! the catalog is valid iff no issue is `Critical`.
//!
//! # Example
//! ```rust,ignore
//! use schemaguard_core::validator::{SchemaValidator, ValidationConfig};
//!
//! let validator = SchemaValidator::new(ValidationConfig::default());
//! let result = validator.validate(&entities);
//! if !result.is_valid() {
//!     eprintln!("{}", result.to_report());
//! }
//! ```

mod analyzer;
mod cascade;
mod config;
mod cycles;
mod fixes;
mod foreign_keys;
mod indexes;
mod keys;
mod models;
mod orphans;
mod relations;
mod report;

// Re-export public API
pub use analyzer::{SchemaValidator, validate, validate_entity};
pub use config::{Check, ConfigValidationError, OwnershipHeuristic, ValidationConfig};
pub use models::{
    FixKind, FixSuggestion, IssueKind, Severity, ValidationIssue, ValidationResult,
    ValidationSummary,
};
pub use report::REPORT_TITLE;
