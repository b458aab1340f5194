//! Primary key checks.

use crate::models::EntityDescriptor;

use super::models::{IssueKind, Severity, ValidationIssue};

/// Reports entities that declare no primary key.
pub(crate) fn check_missing_primary_key(entity: &EntityDescriptor) -> Vec<ValidationIssue> {
    if !entity.primary_keys.is_empty() {
        return Vec::new();
    }

    let snippet = match entity.fields.iter().find(|f| f.auto_generate) {
        Some(field) => format!("PRIMARY KEY ({})", field.column_name),
        None => format!(
            "ALTER TABLE {} ADD COLUMN id INTEGER PRIMARY KEY AUTOINCREMENT;",
            entity.table_name
        ),
    };

    vec![
        ValidationIssue::new(
            IssueKind::MissingPrimaryKey,
            Severity::Critical,
            &entity.table_name,
            format!("Entity '{}' declares no primary key", entity.table_name),
        )
        .with_suggestion("Mark an identifying field as the primary key")
        .with_snippet(snippet),
    ]
}

/// Reports declared primary key names that match no field of the entity.
pub(crate) fn check_composite_key(entity: &EntityDescriptor) -> Vec<ValidationIssue> {
    let resolved: Vec<&str> = entity
        .primary_keys
        .iter()
        .filter_map(|key| entity.field(key))
        .map(|field| field.column_name.as_str())
        .collect();

    entity
        .primary_keys
        .iter()
        .filter(|key| entity.field(key).is_none())
        .map(|key| {
            let message = if entity.has_composite_key() {
                format!(
                    "Composite primary key of '{}' references unknown field '{}'",
                    entity.table_name, key
                )
            } else {
                format!(
                    "Primary key of '{}' references unknown field '{}'",
                    entity.table_name, key
                )
            };
            let snippet = if resolved.is_empty() {
                format!("-- declare field '{}' on {}", key, entity.table_name)
            } else {
                format!("PRIMARY KEY ({})", resolved.join(", "))
            };

            ValidationIssue::new(
                IssueKind::CompositeKeyIssue,
                Severity::Critical,
                &entity.table_name,
                message,
            )
            .with_field(key.as_str())
            .with_suggestion(format!(
                "Declare field '{}' or remove it from the primary key",
                key
            ))
            .with_snippet(snippet)
        })
        .collect()
}
