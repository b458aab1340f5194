//! On-delete policy checks.

use crate::models::{EntityDescriptor, FieldDescriptor, ForeignKeyDescriptor, ReferentialAction};

use super::config::{OwnershipHeuristic, ValidationConfig};
use super::models::{IssueKind, Severity, ValidationIssue};

fn cascade_clause(fk: &ForeignKeyDescriptor) -> String {
    format!(
        "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE CASCADE",
        fk.child_columns.join(", "),
        fk.referenced_entity,
        fk.parent_columns.join(", ")
    )
}

fn child_fields<'a>(
    entity: &'a EntityDescriptor,
    fk: &ForeignKeyDescriptor,
) -> Vec<&'a FieldDescriptor> {
    fk.child_columns
        .iter()
        .filter_map(|column| entity.field(column))
        .collect()
}

/// Whether the foreign key ties the entity's existence to its parent.
fn is_owned_by(
    entity: &EntityDescriptor,
    fk: &ForeignKeyDescriptor,
    config: &ValidationConfig,
) -> bool {
    if entity.is_root || config.is_root_entity(&entity.table_name) {
        return false;
    }
    let fields = child_fields(entity, fk);
    let mandatory = fields.len() == fk.child_columns.len()
        && !fields.is_empty()
        && fields.iter().all(|field| !field.is_nullable);

    match config.ownership {
        OwnershipHeuristic::NonNullableReference => mandatory,
        OwnershipHeuristic::SoleParent => mandatory && entity.foreign_keys.len() == 1,
    }
}

/// Reports `SET NULL` on non-nullable columns and restrictive delete
/// policies on owned-by relationships.
pub(crate) fn check_cascade_operations(
    entity: &EntityDescriptor,
    config: &ValidationConfig,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for fk in &entity.foreign_keys {
        match fk.on_delete {
            ReferentialAction::SetNull => {
                let Some(field) = child_fields(entity, fk)
                    .into_iter()
                    .find(|field| !field.is_nullable)
                else {
                    continue;
                };
                issues.push(
                    ValidationIssue::new(
                        IssueKind::InvalidCascadeOperation,
                        Severity::Critical,
                        &entity.table_name,
                        format!(
                            "ON DELETE SET NULL on '{}' references '{}' but column '{}' is not nullable",
                            entity.table_name, fk.referenced_entity, field.column_name
                        ),
                    )
                    .with_field(field.column_name.as_str())
                    .with_suggestion(format!(
                        "Make '{}' nullable or switch to ON DELETE CASCADE",
                        field.column_name
                    ))
                    .with_snippet(cascade_clause(fk)),
                );
            }
            ReferentialAction::Restrict | ReferentialAction::NoAction => {
                if !is_owned_by(entity, fk, config) {
                    continue;
                }
                let column = fk.child_columns.first().map_or("", String::as_str);
                issues.push(
                    ValidationIssue::new(
                        IssueKind::MissingCascadeDelete,
                        Severity::Warning,
                        &entity.table_name,
                        format!(
                            "Rows of '{}' depend on '{}' but deleting a parent uses ON DELETE {}",
                            entity.table_name, fk.referenced_entity, fk.on_delete
                        ),
                    )
                    .with_field(column)
                    .with_suggestion("Cascade deletes so dependent rows do not block or outlive their parent")
                    .with_snippet(cascade_clause(fk)),
                );
            }
            ReferentialAction::Cascade | ReferentialAction::SetDefault => {}
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;

    fn reminders(child: FieldDescriptor, on_delete: ReferentialAction) -> EntityDescriptor {
        EntityDescriptor::new("reminders")
            .with_field(FieldDescriptor::new("id", FieldType::Long).primary_key())
            .with_field(child)
            .with_foreign_key(
                ForeignKeyDescriptor::single("tasks", "id", "task_id").on_delete(on_delete),
            )
    }

    fn task_id() -> FieldDescriptor {
        FieldDescriptor::new("task_id", FieldType::Long)
    }

    #[test]
    fn test_cascade_passes() {
        let entity = reminders(task_id(), ReferentialAction::Cascade);
        assert!(check_cascade_operations(&entity, &ValidationConfig::default()).is_empty());
    }

    #[test]
    fn test_set_null_on_non_nullable_is_critical() {
        let entity = reminders(task_id(), ReferentialAction::SetNull);
        let issues = check_cascade_operations(&entity, &ValidationConfig::default());

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::InvalidCascadeOperation);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].field_name.as_deref(), Some("task_id"));
    }

    #[test]
    fn test_set_null_on_nullable_passes() {
        let entity = reminders(task_id().nullable(), ReferentialAction::SetNull);
        assert!(check_cascade_operations(&entity, &ValidationConfig::default()).is_empty());
    }

    #[test]
    fn test_restrict_on_owned_relationship_warns() {
        for action in [ReferentialAction::Restrict, ReferentialAction::NoAction] {
            let entity = reminders(task_id(), action);
            let issues = check_cascade_operations(&entity, &ValidationConfig::default());

            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].kind, IssueKind::MissingCascadeDelete);
            assert_eq!(issues[0].severity, Severity::Warning);
            assert!(
                issues[0]
                    .fix_snippet
                    .as_deref()
                    .is_some_and(|s| s.ends_with("ON DELETE CASCADE"))
            );
        }
    }

    #[test]
    fn test_nullable_reference_is_not_owned() {
        let entity = reminders(task_id().nullable(), ReferentialAction::NoAction);
        assert!(check_cascade_operations(&entity, &ValidationConfig::default()).is_empty());
    }

    #[test]
    fn test_root_entity_is_not_owned() {
        let flagged = reminders(task_id(), ReferentialAction::Restrict).root();
        assert!(check_cascade_operations(&flagged, &ValidationConfig::default()).is_empty());

        let configured = reminders(task_id(), ReferentialAction::Restrict);
        let config = ValidationConfig::new().with_root_entity("reminders");
        assert!(check_cascade_operations(&configured, &config).is_empty());
    }

    #[test]
    fn test_sole_parent_heuristic() {
        let entity = reminders(task_id(), ReferentialAction::Restrict)
            .with_field(FieldDescriptor::new("user_id", FieldType::Long))
            .with_foreign_key(
                ForeignKeyDescriptor::single("users", "id", "user_id")
                    .on_delete(ReferentialAction::Cascade),
            );

        let default_issues = check_cascade_operations(&entity, &ValidationConfig::default());
        assert_eq!(default_issues.len(), 1);

        let config = ValidationConfig::new().with_ownership(OwnershipHeuristic::SoleParent);
        assert!(check_cascade_operations(&entity, &config).is_empty());
    }
}
