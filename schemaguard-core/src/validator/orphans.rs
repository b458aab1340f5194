//! Orphaned entity detection.

use crate::models::EntityDescriptor;

use super::config::ValidationConfig;
use super::models::{IssueKind, Severity, ValidationIssue};

/// Reports entities that neither reference nor are referenced by any other
/// entity, unless designated a root/reference table.
pub(crate) fn check_orphaned_entity(
    entity: &EntityDescriptor,
    catalog: &[EntityDescriptor],
    config: &ValidationConfig,
) -> Vec<ValidationIssue> {
    if entity.is_root || config.is_root_entity(&entity.table_name) {
        return Vec::new();
    }
    if !entity.foreign_keys.is_empty() {
        return Vec::new();
    }
    let referenced = catalog
        .iter()
        .filter(|other| other.table_name != entity.table_name)
        .any(|other| other.references(&entity.table_name));
    if referenced {
        return Vec::new();
    }

    vec![
        ValidationIssue::new(
            IssueKind::OrphanedEntity,
            Severity::Info,
            &entity.table_name,
            format!(
                "Entity '{}' has no foreign keys and is not referenced by any other entity",
                entity.table_name
            ),
        )
        .with_suggestion("Relate the entity to the schema or designate it a root/reference table"),
    ]
}
