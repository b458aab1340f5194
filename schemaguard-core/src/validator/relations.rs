//! Relation declaration checks.

use crate::models::{EntityDescriptor, RelationDescriptor, RelationKind, find_entity};

use super::models::{IssueKind, Severity, ValidationIssue};

fn column_of<'a>(entity: &'a EntityDescriptor, reference: &'a str) -> &'a str {
    entity
        .field(reference)
        .map_or(reference, |field| field.column_name.as_str())
}

/// Whether `holder` declares a foreign key to `parent` pairing `child_column`
/// with `parent_column`.
fn has_foreign_key(
    holder: &EntityDescriptor,
    parent: &EntityDescriptor,
    child_column: &str,
    parent_column: &str,
) -> bool {
    let child_column = column_of(holder, child_column);
    let parent_column = column_of(parent, parent_column);
    holder
        .foreign_keys
        .iter()
        .filter(|fk| fk.referenced_entity == parent.table_name)
        .any(|fk| {
            fk.column_pairs().any(|(parent_side, child_side)| {
                column_of(holder, child_side) == child_column
                    && column_of(parent, parent_side) == parent_column
            })
        })
}

fn expected_clause(entity: &EntityDescriptor, relation: &RelationDescriptor) -> String {
    match relation.kind {
        RelationKind::OneToMany => format!(
            "-- on {}: FOREIGN KEY ({}) REFERENCES {} ({})",
            relation.target_entity,
            relation.target_column,
            entity.table_name,
            relation.local_column
        ),
        RelationKind::ManyToOne | RelationKind::OneToOne => format!(
            "-- on {}: FOREIGN KEY ({}) REFERENCES {} ({})",
            entity.table_name, relation.local_column, relation.target_entity, relation.target_column
        ),
    }
}

fn is_backed(entity: &EntityDescriptor, target: &EntityDescriptor, relation: &RelationDescriptor) -> bool {
    let forward = || has_foreign_key(entity, target, &relation.local_column, &relation.target_column);
    let backward = || has_foreign_key(target, entity, &relation.target_column, &relation.local_column);
    match relation.kind {
        RelationKind::OneToMany => backward(),
        RelationKind::ManyToOne => forward(),
        RelationKind::OneToOne => forward() || backward(),
    }
}

/// Reports declared relations whose column pair matches no foreign key.
pub(crate) fn check_relations(
    entity: &EntityDescriptor,
    catalog: &[EntityDescriptor],
) -> Vec<ValidationIssue> {
    entity
        .relations
        .iter()
        .filter_map(|relation| {
            let message = match find_entity(catalog, &relation.target_entity) {
                None => format!(
                    "Relation '{}' on '{}' targets unknown entity '{}'",
                    relation.field_name, entity.table_name, relation.target_entity
                ),
                Some(target) if !is_backed(entity, target, relation) => format!(
                    "{} relation '{}' on '{}' ({} -> {}.{}) matches no declared foreign key",
                    relation.kind,
                    relation.field_name,
                    entity.table_name,
                    relation.local_column,
                    relation.target_entity,
                    relation.target_column
                ),
                Some(_) => return None,
            };

            Some(
                ValidationIssue::new(
                    IssueKind::RelationAnnotationMismatch,
                    Severity::Error,
                    &entity.table_name,
                    message,
                )
                .with_field(relation.field_name.as_str())
                .with_suggestion(
                    "Align the relation's columns with a foreign key or declare the missing foreign key",
                )
                .with_snippet(expected_clause(entity, relation)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldDescriptor, FieldType, ForeignKeyDescriptor};

    fn users(relation: RelationDescriptor) -> EntityDescriptor {
        EntityDescriptor::new("users")
            .with_field(FieldDescriptor::new("id", FieldType::Long).primary_key())
            .with_relation(relation)
    }

    fn tasks() -> EntityDescriptor {
        EntityDescriptor::new("tasks")
            .with_field(FieldDescriptor::new("id", FieldType::Long).primary_key())
            .with_field(FieldDescriptor::new("userId", FieldType::Long).with_column_name("user_id"))
            .with_foreign_key(ForeignKeyDescriptor::single("users", "id", "user_id"))
    }

    #[test]
    fn test_one_to_many_backed_by_child_foreign_key() {
        let relation =
            RelationDescriptor::new("tasks", RelationKind::OneToMany, "tasks", "id", "userId");
        let catalog = vec![users(relation), tasks()];
        assert!(check_relations(&catalog[0], &catalog).is_empty());
    }

    #[test]
    fn test_many_to_one_backed_by_own_foreign_key() {
        let relation =
            RelationDescriptor::new("owner", RelationKind::ManyToOne, "users", "user_id", "id");
        let catalog = vec![
            EntityDescriptor::new("users")
                .with_field(FieldDescriptor::new("id", FieldType::Long).primary_key()),
            tasks().with_relation(relation),
        ];
        assert!(check_relations(&catalog[1], &catalog).is_empty());
    }

    #[test]
    fn test_one_to_one_accepts_either_direction() {
        let relation =
            RelationDescriptor::new("owner", RelationKind::OneToOne, "tasks", "id", "user_id");
        let catalog = vec![users(relation), tasks()];
        assert!(check_relations(&catalog[0], &catalog).is_empty());
    }

    #[test]
    fn test_swapped_columns_are_a_mismatch() {
        let relation =
            RelationDescriptor::new("tasks", RelationKind::OneToMany, "tasks", "user_id", "id");
        let catalog = vec![users(relation), tasks()];

        let issues = check_relations(&catalog[0], &catalog);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::RelationAnnotationMismatch);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].field_name.as_deref(), Some("tasks"));
    }

    #[test]
    fn test_wrong_direction_is_a_mismatch() {
        let relation =
            RelationDescriptor::new("tasks", RelationKind::ManyToOne, "tasks", "id", "user_id");
        let catalog = vec![users(relation), tasks()];
        assert_eq!(check_relations(&catalog[0], &catalog).len(), 1);
    }

    #[test]
    fn test_unknown_target_is_a_mismatch() {
        let relation =
            RelationDescriptor::new("tags", RelationKind::OneToMany, "tags", "id", "user_id");
        let catalog = vec![users(relation)];

        let issues = check_relations(&catalog[0], &catalog);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("unknown entity 'tags'"));
    }
}
