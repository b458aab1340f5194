//! Schema validator facade.
//!
//! This module provides the main `SchemaValidator` that runs every enabled
//! rule family over an entity catalog and aggregates the findings into a
//! [`ValidationResult`].

use std::collections::BTreeSet;

use crate::models::{EntityDescriptor, RelationKind, find_entity};

use super::cascade::check_cascade_operations;
use super::config::{Check, ConfigValidationError, ValidationConfig};
use super::cycles::{check_circular_dependencies, cycle_issue, find_dependency_cycles};
use super::fixes::generate_fix_suggestions;
use super::foreign_keys::{check_foreign_key_references, check_type_compatibility};
use super::indexes::{check_duplicate_indexes, check_missing_indexes};
use super::keys::{check_composite_key, check_missing_primary_key};
use super::models::{Severity, ValidationIssue, ValidationResult, ValidationSummary};
use super::orphans::check_orphaned_entity;
use super::relations::check_relations;

/// Schema validator for entity catalogs.
///
/// The validator is stateless apart from its configuration; the same
/// catalog always yields the same issues and summary.
///
/// # Example
///
/// ```rust,ignore
/// use schemaguard_core::validator::{SchemaValidator, ValidationConfig};
///
/// let validator = SchemaValidator::new(ValidationConfig::default());
/// let result = validator.validate(&entities);
/// println!("{}", result.to_report());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    config: ValidationConfig,
}

impl SchemaValidator {
    /// Creates a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Creates a validator after checking the configuration.
    pub fn try_new(config: ValidationConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Creates a new validator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Returns a reference to the validator configuration.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates a whole catalog.
    ///
    /// Per-entity rules run in catalog order, then cycle detection runs once
    /// over the whole catalog. Issues below `min_severity` are dropped before
    /// fix suggestions and counts are derived.
    pub fn validate(&self, entities: &[EntityDescriptor]) -> ValidationResult {
        tracing::debug!("Validating {} entities", entities.len());

        let mut issues: Vec<ValidationIssue> = entities
            .iter()
            .flat_map(|entity| self.entity_rules(entity, entities))
            .collect();

        if self.config.is_enabled(Check::CircularDependencies) {
            issues.extend(check_circular_dependencies(entities));
        }

        let issues = self.retain_reportable(issues);
        let fix_suggestions = generate_fix_suggestions(&issues);
        let summary = summarize(entities, &issues);

        tracing::debug!(
            "Validation finished: {} issues ({} critical), {} fix suggestions",
            summary.total_issues,
            summary.critical,
            fix_suggestions.len()
        );

        ValidationResult::new(issues, fix_suggestions, summary)
    }

    /// Validates a single entity against the catalog it belongs to.
    ///
    /// Includes every reference cycle the entity participates in, attributed
    /// to the entity itself.
    pub fn validate_entity(
        &self,
        entity: &EntityDescriptor,
        all_entities: &[EntityDescriptor],
    ) -> Vec<ValidationIssue> {
        let mut issues = self.entity_rules(entity, all_entities);

        if self.config.is_enabled(Check::CircularDependencies) {
            issues.extend(
                find_dependency_cycles(all_entities)
                    .iter()
                    .filter(|cycle| cycle.contains(&entity.table_name.as_str()))
                    .map(|cycle| cycle_issue(cycle, &entity.table_name)),
            );
        }

        self.retain_reportable(issues)
    }

    fn entity_rules(
        &self,
        entity: &EntityDescriptor,
        catalog: &[EntityDescriptor],
    ) -> Vec<ValidationIssue> {
        let config = &self.config;
        let mut issues = Vec::new();

        if config.is_enabled(Check::PrimaryKeys) {
            issues.extend(check_missing_primary_key(entity));
            issues.extend(check_composite_key(entity));
        }
        if config.is_enabled(Check::ForeignKeys) {
            issues.extend(check_foreign_key_references(entity, catalog));
            if config.is_enabled(Check::TypeCompatibility) {
                issues.extend(check_type_compatibility(entity, catalog));
            }
        }
        if config.is_enabled(Check::MissingIndexes) {
            issues.extend(check_missing_indexes(entity));
        }
        if config.is_enabled(Check::DuplicateIndexes) {
            issues.extend(check_duplicate_indexes(entity));
        }
        if config.is_enabled(Check::CascadeOperations) {
            issues.extend(check_cascade_operations(entity, config));
        }
        issues.extend(check_orphaned_entity(entity, catalog, config));
        if config.is_enabled(Check::Relations) {
            issues.extend(check_relations(entity, catalog));
        }

        issues
    }

    fn retain_reportable(&self, mut issues: Vec<ValidationIssue>) -> Vec<ValidationIssue> {
        let min_severity = self.config.min_severity;
        issues.retain(|issue| issue.severity >= min_severity);
        issues
    }
}

/// Validates a catalog with the given configuration.
pub fn validate(entities: &[EntityDescriptor], config: &ValidationConfig) -> ValidationResult {
    SchemaValidator::new(config.clone()).validate(entities)
}

/// Validates one entity of a catalog with the given configuration.
pub fn validate_entity(
    entity: &EntityDescriptor,
    all_entities: &[EntityDescriptor],
    config: &ValidationConfig,
) -> Vec<ValidationIssue> {
    SchemaValidator::new(config.clone()).validate_entity(entity, all_entities)
}

/// Distinct child -> parent edges declared by foreign keys and relations.
fn relationship_edges(entities: &[EntityDescriptor]) -> BTreeSet<(&str, &str)> {
    let mut edges = BTreeSet::new();

    for entity in entities {
        let this = entity.table_name.as_str();
        for fk in &entity.foreign_keys {
            edges.insert((this, fk.referenced_entity.as_str()));
        }
        for relation in &entity.relations {
            let target = relation.target_entity.as_str();
            let edge = match relation.kind {
                RelationKind::OneToMany => (target, this),
                RelationKind::ManyToOne => (this, target),
                RelationKind::OneToOne => {
                    let target_holds_key = find_entity(entities, target)
                        .is_some_and(|other| other.references(this));
                    if target_holds_key {
                        (target, this)
                    } else {
                        (this, target)
                    }
                }
            };
            edges.insert(edge);
        }
    }

    edges
}

fn summarize(entities: &[EntityDescriptor], issues: &[ValidationIssue]) -> ValidationSummary {
    let mut summary = ValidationSummary {
        total_entities: entities
            .iter()
            .map(|entity| entity.table_name.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
        total_relationships: relationship_edges(entities).len(),
        total_issues: issues.len(),
        ..ValidationSummary::default()
    };

    for issue in issues {
        let counter = match issue.severity {
            Severity::Critical => &mut summary.critical,
            Severity::Error => &mut summary.errors,
            Severity::Warning => &mut summary.warnings,
            Severity::Info => &mut summary.info,
        };
        *counter = counter.saturating_add(1);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldDescriptor, FieldType, ForeignKeyDescriptor, RelationDescriptor};

    fn users() -> EntityDescriptor {
        EntityDescriptor::new("users")
            .with_field(FieldDescriptor::new("id", FieldType::Long).primary_key())
    }

    fn tasks() -> EntityDescriptor {
        EntityDescriptor::new("tasks")
            .with_field(FieldDescriptor::new("id", FieldType::Long).primary_key())
            .with_field(FieldDescriptor::new("user_id", FieldType::Long).nullable())
            .with_foreign_key(ForeignKeyDescriptor::single("users", "id", "user_id"))
    }

    #[test]
    fn test_validator_creation() {
        let config = ValidationConfig::new().with_min_severity(Severity::Warning);
        let validator = SchemaValidator::new(config.clone());
        assert_eq!(validator.config(), &config);

        let validator = SchemaValidator::with_defaults();
        assert_eq!(validator.config(), &ValidationConfig::default());
    }

    #[test]
    fn test_try_new_rejects_invalid_config() {
        let config = ValidationConfig::new().with_root_entity("");
        assert_eq!(
            SchemaValidator::try_new(config).unwrap_err(),
            ConfigValidationError::BlankRootEntity(0)
        );
        assert!(SchemaValidator::try_new(ValidationConfig::default()).is_ok());
    }

    #[test]
    fn test_summary_counts_distinct_edges() {
        let relation =
            RelationDescriptor::new("tasks", RelationKind::OneToMany, "tasks", "id", "user_id");
        let catalog = vec![users().with_relation(relation), tasks()];

        let result = SchemaValidator::with_defaults().validate(&catalog);
        assert_eq!(result.summary().total_entities, 2);
        // tasks -> users via both the foreign key and the relation
        assert_eq!(result.summary().total_relationships, 1);
    }

    #[test]
    fn test_one_to_one_edge_follows_key_holder() {
        let relation =
            RelationDescriptor::new("profile", RelationKind::OneToOne, "tasks", "id", "user_id");
        let edges_catalog = vec![users().with_relation(relation), tasks()];
        let edges = relationship_edges(&edges_catalog);
        assert_eq!(edges.into_iter().collect::<Vec<_>>(), vec![("tasks", "users")]);
    }

    #[test]
    fn test_summary_counts_match_issues() {
        let catalog = vec![
            users(),
            tasks(),
            EntityDescriptor::new("notes"),
        ];
        let result = SchemaValidator::with_defaults().validate(&catalog);
        let summary = result.summary();

        assert_eq!(summary.total_issues, result.issues().len());
        assert_eq!(
            summary.critical + summary.errors + summary.warnings + summary.info,
            summary.total_issues
        );
        for severity in Severity::DESCENDING {
            assert_eq!(
                summary.count(severity),
                result.issues_by_severity(severity).len()
            );
        }
    }

    #[test]
    fn test_free_functions_match_facade() {
        let catalog = vec![users(), tasks()];
        let config = ValidationConfig::default();
        let validator = SchemaValidator::new(config.clone());

        assert_eq!(
            validate(&catalog, &config).issues(),
            validator.validate(&catalog).issues()
        );
        assert_eq!(
            validate_entity(&catalog[1], &catalog, &config),
            validator.validate_entity(&catalog[1], &catalog)
        );
    }
}
