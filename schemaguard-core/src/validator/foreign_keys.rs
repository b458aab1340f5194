//! Foreign key reference and type compatibility checks.

use crate::models::{EntityDescriptor, ForeignKeyDescriptor, find_entity};

use super::models::{IssueKind, Severity, ValidationIssue};

fn references_clause(fk: &ForeignKeyDescriptor, parent_columns: &[String]) -> String {
    format!(
        "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {}",
        fk.child_columns.join(", "),
        fk.referenced_entity,
        parent_columns.join(", "),
        fk.on_delete
    )
}

fn first_child(fk: &ForeignKeyDescriptor) -> &str {
    fk.child_columns.first().map_or("", String::as_str)
}

/// Foreign keys built without [`ForeignKeyDescriptor::new`] may pair columns
/// unevenly; those cannot be checked column by column.
fn column_count_issue(entity: &EntityDescriptor, fk: &ForeignKeyDescriptor) -> ValidationIssue {
    let issue = ValidationIssue::new(
        IssueKind::InvalidForeignKeyReference,
        Severity::Critical,
        &entity.table_name,
        format!(
            "Foreign key from '{}' to '{}' pairs {} parent column(s) with {} child column(s)",
            entity.table_name,
            fk.referenced_entity,
            fk.parent_columns.len(),
            fk.child_columns.len()
        ),
    )
    .with_suggestion(format!(
        "Give the foreign key one child column per referenced column of '{}'",
        fk.referenced_entity
    ));

    match fk.child_columns.first() {
        Some(child) => issue.with_field(child.as_str()),
        None => issue,
    }
}

/// Reports foreign keys with uneven or empty column lists, whose target
/// entity is unknown, whose parent columns are not exactly the target's
/// primary key, or whose child columns are not declared on the entity.
pub(crate) fn check_foreign_key_references(
    entity: &EntityDescriptor,
    catalog: &[EntityDescriptor],
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for fk in &entity.foreign_keys {
        if fk.parent_columns.is_empty() || fk.parent_columns.len() != fk.child_columns.len() {
            issues.push(column_count_issue(entity, fk));
            continue;
        }

        for child in &fk.child_columns {
            if entity.field(child).is_none() {
                issues.push(
                    ValidationIssue::new(
                        IssueKind::InvalidForeignKeyReference,
                        Severity::Critical,
                        &entity.table_name,
                        format!(
                            "Foreign key from '{}' to '{}' uses undeclared column '{}'",
                            entity.table_name, fk.referenced_entity, child
                        ),
                    )
                    .with_field(child.as_str())
                    .with_suggestion(format!(
                        "Declare column '{}' on '{}' or correct the foreign key",
                        child, entity.table_name
                    ))
                    .with_snippet(references_clause(fk, &fk.parent_columns)),
                );
            }
        }

        let Some(parent) = find_entity(catalog, &fk.referenced_entity) else {
            issues.push(
                ValidationIssue::new(
                    IssueKind::InvalidForeignKeyReference,
                    Severity::Critical,
                    &entity.table_name,
                    format!(
                        "Foreign key from '{}' references unknown entity '{}'",
                        entity.table_name, fk.referenced_entity
                    ),
                )
                .with_field(first_child(fk))
                .with_suggestion(format!(
                    "Add '{}' to the catalog or correct the referenced entity name",
                    fk.referenced_entity
                ))
                .with_snippet(references_clause(fk, &fk.parent_columns)),
            );
            continue;
        };

        let primary_key = parent.primary_key_columns();
        let mut expected = primary_key.clone();
        expected.sort();
        let mut declared: Vec<String> = fk
            .parent_columns
            .iter()
            .map(|column| match parent.field(column) {
                Some(field) => field.column_name.clone(),
                None => column.clone(),
            })
            .collect();
        declared.sort();

        if declared != expected {
            issues.push(
                ValidationIssue::new(
                    IssueKind::InvalidForeignKeyReference,
                    Severity::Critical,
                    &entity.table_name,
                    format!(
                        "Foreign key from '{}' to '{}' uses parent columns [{}] but the primary key of '{}' is [{}]",
                        entity.table_name,
                        parent.table_name,
                        fk.parent_columns.join(", "),
                        parent.table_name,
                        primary_key.join(", ")
                    ),
                )
                .with_field(first_child(fk))
                .with_suggestion(format!(
                    "Reference the primary key columns of '{}'",
                    parent.table_name
                ))
                .with_snippet(references_clause(fk, &primary_key)),
            );
        }
    }

    issues
}

/// Reports child columns whose type differs from the referenced parent column.
///
/// Foreign keys to unknown entities and unresolvable columns are left to
/// [`check_foreign_key_references`].
pub(crate) fn check_type_compatibility(
    entity: &EntityDescriptor,
    catalog: &[EntityDescriptor],
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for fk in &entity.foreign_keys {
        let Some(parent) = find_entity(catalog, &fk.referenced_entity) else {
            continue;
        };

        for (parent_column, child_column) in fk.column_pairs() {
            let (Some(parent_field), Some(child_field)) =
                (parent.field(parent_column), entity.field(child_column))
            else {
                continue;
            };

            if parent_field.field_type != child_field.field_type {
                issues.push(
                    ValidationIssue::new(
                        IssueKind::TypeMismatch,
                        Severity::Error,
                        &entity.table_name,
                        format!(
                            "Column '{}.{}' is {} but references '{}.{}' which is {}",
                            entity.table_name,
                            child_field.column_name,
                            child_field.field_type,
                            parent.table_name,
                            parent_field.column_name,
                            parent_field.field_type
                        ),
                    )
                    .with_field(child_field.column_name.as_str())
                    .with_suggestion(format!(
                        "Declare '{}' as {} to match the referenced column",
                        child_field.column_name, parent_field.field_type
                    ))
                    .with_snippet(format!(
                        "{} {} -- {}",
                        child_field.column_name,
                        parent_field.field_type.sql_type(),
                        parent_field.field_type
                    )),
                );
            }
        }
    }

    issues
}
