//! End-to-end validation of the demo task-manager catalog.
//!
//! This test suite covers:
//! - Loading a catalog document with a skipped (invalid) entity
//! - Every issue the catalog is seeded with, and nothing more
//! - Summary counts and fix suggestions
//! - Configuration toggles applied to a realistic catalog
//! - The rendered text report

#![allow(clippy::unwrap_used)]

use schemaguard_core::{
    Check, IssueKind, SchemaValidator, Severity, ValidationConfig, load_catalog,
    validator::{FixKind, validate, validate_entity},
};

const CATALOG: &str = include_str!("../../demos/task_manager.catalog.json");

fn entities() -> Vec<schemaguard_core::EntityDescriptor> {
    load_catalog(CATALOG).unwrap()
}

#[test]
fn test_catalog_loads_valid_entities_only() {
    let entities = entities();

    assert_eq!(entities.len(), 11);
    assert!(entities.iter().all(|entity| entity.table_name != "sessions"));
    assert_eq!(entities[0].table_name, "users");

    let tasks = entities.iter().find(|e| e.table_name == "tasks").unwrap();
    assert_eq!(tasks.primary_keys, vec!["id".to_string()]);
    assert_eq!(tasks.foreign_keys.len(), 3);
    assert_eq!(tasks.relations.len(), 2);

    let task_tags = entities
        .iter()
        .find(|e| e.table_name == "task_tags")
        .unwrap();
    assert!(task_tags.has_composite_key());
}

#[test]
fn test_catalog_integration_issues() {
    let result = SchemaValidator::with_defaults().validate(&entities());

    let found: Vec<(IssueKind, &str, Option<&str>)> = result
        .issues()
        .iter()
        .map(|issue| {
            (
                issue.kind,
                issue.entity_name.as_str(),
                issue.field_name.as_deref(),
            )
        })
        .collect();

    assert_eq!(
        found,
        vec![
            (
                IssueKind::RelationAnnotationMismatch,
                "users",
                Some("settings")
            ),
            (IssueKind::MissingIndex, "tasks", Some("parent_task_id")),
            (IssueKind::TypeMismatch, "reminders", Some("task_id")),
            (IssueKind::MissingIndex, "reminders", Some("task_id")),
            (IssueKind::MissingCascadeDelete, "reminders", Some("task_id")),
            (IssueKind::DuplicateIndex, "tags", None),
            (
                IssueKind::InvalidCascadeOperation,
                "attachments",
                Some("task_id")
            ),
            (IssueKind::MissingPrimaryKey, "audit_log", None),
            (IssueKind::OrphanedEntity, "audit_log", None),
            (IssueKind::CircularDependency, "workspaces", None),
        ]
    );
}

#[test]
fn test_catalog_integration_summary() {
    let result = SchemaValidator::with_defaults().validate(&entities());
    let summary = result.summary();

    assert!(!result.is_valid());
    assert_eq!(summary.total_entities, 11);
    assert_eq!(summary.total_relationships, 11);
    assert_eq!(summary.total_issues, 10);
    assert_eq!(summary.critical, 2);
    assert_eq!(summary.errors, 2);
    assert_eq!(summary.warnings, 5);
    assert_eq!(summary.info, 1);
}

#[test]
fn test_catalog_integration_fix_suggestions() {
    let result = SchemaValidator::with_defaults().validate(&entities());
    let fixes = result.fix_suggestions();

    assert_eq!(fixes.len(), 7);
    assert_eq!(fixes.iter().filter(|fix| fix.can_auto_apply).count(), 3);

    let duplicate = fixes
        .iter()
        .find(|fix| fix.fix_kind == FixKind::RemoveDuplicateIndex)
        .unwrap();
    assert_eq!(duplicate.entity_name, "tags");
    assert_eq!(duplicate.remediation, "DROP INDEX index_tags_label;");

    let index = fixes
        .iter()
        .find(|fix| fix.fix_kind == FixKind::AddIndex && fix.entity_name == "reminders")
        .unwrap();
    assert_eq!(
        index.remediation,
        "CREATE INDEX index_reminders_task_id ON reminders (task_id);"
    );

    let cycle_or_cascade_fixes = fixes.iter().filter(|fix| {
        fix.entity_name == "attachments" || fix.entity_name == "workspaces"
    });
    assert_eq!(cycle_or_cascade_fixes.count(), 0);
}

#[test]
fn test_catalog_integration_config_toggles() {
    let entities = entities();

    let errors_only = validate(
        &entities,
        &ValidationConfig::new().with_min_severity(Severity::Error),
    );
    assert_eq!(errors_only.issues().len(), 4);
    assert!(
        errors_only
            .issues()
            .iter()
            .all(|issue| issue.severity >= Severity::Error)
    );

    let without_cascade = validate(
        &entities,
        &ValidationConfig::new().with_check(Check::CascadeOperations, false),
    );
    assert_eq!(without_cascade.summary().critical, 1);
    assert_eq!(without_cascade.summary().warnings, 4);

    let audit_as_root = validate(
        &entities,
        &ValidationConfig::new().with_root_entity("audit_log"),
    );
    assert!(
        audit_as_root
            .issues_by_kind(IssueKind::OrphanedEntity)
            .is_empty()
    );
}

#[test]
fn test_catalog_integration_single_entity() {
    let entities = entities();
    let config = ValidationConfig::default();

    let projects = entities
        .iter()
        .find(|e| e.table_name == "projects")
        .unwrap();
    let issues = validate_entity(projects, &entities, &config);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::CircularDependency);
    assert_eq!(issues[0].entity_name, "projects");
    assert!(issues[0].message.contains("[workspaces, projects]"));

    let categories = entities
        .iter()
        .find(|e| e.table_name == "categories")
        .unwrap();
    assert!(validate_entity(categories, &entities, &config).is_empty());
}

#[test]
fn test_catalog_integration_report() {
    let result = SchemaValidator::with_defaults().validate(&entities());
    let report = result.to_report();

    assert!(report.contains("Database Schema Validation Report"));
    assert!(report.contains("Overall Status: INVALID"));
    assert!(report.contains("  Entities:      11"));
    assert!(report.contains("[CRITICAL] (2)"));
    assert!(report.contains("audit_log [MISSING_PRIMARY_KEY]"));
    assert!(report.contains("attachments.task_id [INVALID_CASCADE_OPERATION]"));
    assert!(report.find("[CRITICAL]").unwrap() < report.find("[INFO]").unwrap());
}
