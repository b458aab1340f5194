//! Validation configuration.
//!
//! This module provides the per-call configuration for schema validation:
//! one toggle per rule family, a minimum-severity cutoff, and the policy
//! knobs behind the ownership and root-table heuristics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::{IssueKind, Severity};

/// A single toggleable check family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Missing and unresolved primary keys
    PrimaryKeys,
    /// Foreign key targets and column matching
    ForeignKeys,
    /// Relation declarations backed by foreign keys
    Relations,
    /// Foreign key columns without a covering index
    MissingIndexes,
    /// Indexes with identical column lists
    DuplicateIndexes,
    /// On-delete policies versus column nullability
    CascadeOperations,
    /// Reference cycles between entities
    CircularDependencies,
    /// Parent/child column type agreement
    TypeCompatibility,
}

impl Check {
    /// All check families, in rule order.
    pub const ALL: [Check; 8] = [
        Check::PrimaryKeys,
        Check::ForeignKeys,
        Check::TypeCompatibility,
        Check::MissingIndexes,
        Check::DuplicateIndexes,
        Check::CascadeOperations,
        Check::CircularDependencies,
        Check::Relations,
    ];
}

impl Check {
    /// Issue kinds that disappear when this check is disabled.
    ///
    /// Type compatibility runs only alongside foreign key checks, so
    /// disabling foreign keys also removes type mismatches.
    pub fn gated_kinds(self) -> &'static [IssueKind] {
        match self {
            Check::PrimaryKeys => &[IssueKind::MissingPrimaryKey, IssueKind::CompositeKeyIssue],
            Check::ForeignKeys => &[IssueKind::InvalidForeignKeyReference, IssueKind::TypeMismatch],
            Check::TypeCompatibility => &[IssueKind::TypeMismatch],
            Check::MissingIndexes => &[IssueKind::MissingIndex],
            Check::DuplicateIndexes => &[IssueKind::DuplicateIndex],
            Check::CascadeOperations => &[
                IssueKind::MissingCascadeDelete,
                IssueKind::InvalidCascadeOperation,
            ],
            Check::CircularDependencies => &[IssueKind::CircularDependency],
            Check::Relations => &[IssueKind::RelationAnnotationMismatch],
        }
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Check::PrimaryKeys => "primary_keys",
            Check::ForeignKeys => "foreign_keys",
            Check::Relations => "relations",
            Check::MissingIndexes => "missing_indexes",
            Check::DuplicateIndexes => "duplicate_indexes",
            Check::CascadeOperations => "cascade_operations",
            Check::CircularDependencies => "circular_dependencies",
            Check::TypeCompatibility => "type_compatibility",
        };
        write!(f, "{}", name)
    }
}

/// Policy deciding when a foreign key is an "owned-by" relationship.
///
/// Owned children should disappear with their parent, so a restrictive
/// on-delete action on an owned relationship is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipHeuristic {
    /// Non-nullable child columns on a non-root entity
    #[default]
    NonNullableReference,
    /// As above, and the entity has no other foreign key
    SoleParent,
}

/// Schema validation configuration.
///
/// Defaults to every check enabled and `min_severity = Info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Enable missing and composite primary key checks
    pub validate_primary_keys: bool,
    /// Enable foreign key reference checks
    pub validate_foreign_keys: bool,
    /// Enable relation annotation checks
    pub validate_relations: bool,
    /// Enable missing foreign key index checks
    pub check_missing_indexes: bool,
    /// Enable duplicate index checks
    pub check_duplicate_indexes: bool,
    /// Enable on-delete policy checks
    pub check_cascade_operations: bool,
    /// Enable reference cycle detection
    pub check_circular_dependencies: bool,
    /// Enable parent/child type checks (requires foreign key checks)
    pub check_type_compatibility: bool,
    /// Issues below this severity are dropped from the result
    pub min_severity: Severity,
    /// Entities treated as root/reference tables in addition to those
    /// flagged on their descriptor
    pub root_entities: Vec<String>,
    /// Policy for "owned-by" foreign keys
    pub ownership: OwnershipHeuristic,
}

/// Validation errors for validation configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A root entity name is empty or whitespace
    #[error("root_entities contains a blank entity name at position {0}")]
    BlankRootEntity(usize),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_primary_keys: true,
            validate_foreign_keys: true,
            validate_relations: true,
            check_missing_indexes: true,
            check_duplicate_indexes: true,
            check_cascade_operations: true,
            check_circular_dependencies: true,
            check_type_compatibility: true,
            min_severity: Severity::Info,
            root_entities: Vec::new(),
            ownership: OwnershipHeuristic::default(),
        }
    }
}

impl ValidationConfig {
    /// Creates a new validation config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a check family is enabled.
    pub fn is_enabled(&self, check: Check) -> bool {
        match check {
            Check::PrimaryKeys => self.validate_primary_keys,
            Check::ForeignKeys => self.validate_foreign_keys,
            Check::Relations => self.validate_relations,
            Check::MissingIndexes => self.check_missing_indexes,
            Check::DuplicateIndexes => self.check_duplicate_indexes,
            Check::CascadeOperations => self.check_cascade_operations,
            Check::CircularDependencies => self.check_circular_dependencies,
            Check::TypeCompatibility => self.check_type_compatibility,
        }
    }

    /// Builder method to enable/disable a check family.
    pub fn with_check(mut self, check: Check, enabled: bool) -> Self {
        let flag = match check {
            Check::PrimaryKeys => &mut self.validate_primary_keys,
            Check::ForeignKeys => &mut self.validate_foreign_keys,
            Check::Relations => &mut self.validate_relations,
            Check::MissingIndexes => &mut self.check_missing_indexes,
            Check::DuplicateIndexes => &mut self.check_duplicate_indexes,
            Check::CascadeOperations => &mut self.check_cascade_operations,
            Check::CircularDependencies => &mut self.check_circular_dependencies,
            Check::TypeCompatibility => &mut self.check_type_compatibility,
        };
        *flag = enabled;
        self
    }

    /// Builder method to set the minimum reported severity.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Builder method to designate an additional root/reference entity.
    pub fn with_root_entity(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.root_entities.contains(&name) {
            self.root_entities.push(name);
        }
        self
    }

    /// Builder method to set the ownership heuristic.
    pub fn with_ownership(mut self, ownership: OwnershipHeuristic) -> Self {
        self.ownership = ownership;
        self
    }

    /// Whether `entity` is designated a root table by this configuration.
    pub fn is_root_entity(&self, entity: &str) -> bool {
        self.root_entities.iter().any(|name| name == entity)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(position) = self
            .root_entities
            .iter()
            .position(|name| name.trim().is_empty())
        {
            return Err(ConfigValidationError::BlankRootEntity(position));
        }
        Ok(())
    }
}
