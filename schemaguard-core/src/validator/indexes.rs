//! Index coverage and duplication checks.

use std::collections::HashSet;

use crate::models::{EntityDescriptor, IndexDescriptor};

use super::models::{IssueKind, Severity, ValidationIssue};

fn resolve_columns(entity: &EntityDescriptor, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|column| match entity.field(column) {
            Some(field) => field.column_name.clone(),
            None => column.clone(),
        })
        .collect()
}

/// Column lists usable for lookups: declared indexes plus the primary key.
fn lookup_paths(entity: &EntityDescriptor) -> Vec<Vec<String>> {
    let mut paths: Vec<Vec<String>> = entity
        .indexes
        .iter()
        .map(|index| resolve_columns(entity, &index.columns))
        .collect();
    let primary_key = entity.primary_key_columns();
    if !primary_key.is_empty() {
        paths.push(primary_key);
    }
    paths
}

/// Reports foreign keys whose child columns are not the leading columns of
/// any index. The primary key counts as an implicit index.
pub(crate) fn check_missing_indexes(entity: &EntityDescriptor) -> Vec<ValidationIssue> {
    let paths = lookup_paths(entity);
    let mut issues = Vec::new();

    for fk in &entity.foreign_keys {
        let child = resolve_columns(entity, &fk.child_columns);
        let width = child.len();
        let wanted: HashSet<&str> = child.iter().map(String::as_str).collect();

        let covered = paths.iter().any(|path| {
            path.len() >= width
                && path[..width].iter().map(String::as_str).collect::<HashSet<_>>() == wanted
        });
        if covered {
            continue;
        }

        let leading: HashSet<&str> = paths
            .iter()
            .flat_map(|path| path.iter().take(width).map(String::as_str))
            .collect();
        let uncovered = child
            .iter()
            .find(|column| !leading.contains(column.as_str()))
            .or_else(|| child.first())
            .cloned()
            .unwrap_or_default();

        let index_name = format!("index_{}_{}", entity.table_name, child.join("_"));
        issues.push(
            ValidationIssue::new(
                IssueKind::MissingIndex,
                Severity::Warning,
                &entity.table_name,
                format!(
                    "Foreign key column(s) [{}] of '{}' referencing '{}' are not covered by an index",
                    child.join(", "),
                    entity.table_name,
                    fk.referenced_entity
                ),
            )
            .with_field(uncovered)
            .with_suggestion("Index the foreign key columns to avoid full scans on parent changes")
            .with_snippet(format!(
                "CREATE INDEX {} ON {} ({});",
                index_name,
                entity.table_name,
                child.join(", ")
            )),
        );
    }

    issues
}

/// Reports groups of indexes that declare the identical ordered column list.
pub(crate) fn check_duplicate_indexes(entity: &EntityDescriptor) -> Vec<ValidationIssue> {
    let mut groups: Vec<(Vec<String>, Vec<&IndexDescriptor>)> = Vec::new();
    for index in &entity.indexes {
        let columns = resolve_columns(entity, &index.columns);
        match groups.iter_mut().find(|(existing, _)| *existing == columns) {
            Some((_, members)) => members.push(index),
            None => groups.push((columns, vec![index])),
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(columns, members)| {
            let names: Vec<String> = members
                .iter()
                .map(|index| index.display_name(&entity.table_name))
                .collect();
            // Keep a unique index over a plain one when dropping duplicates
            let keep = members.iter().position(|index| index.is_unique).unwrap_or(0);
            let drops: Vec<String> = names
                .iter()
                .enumerate()
                .filter(|(position, _)| *position != keep)
                .map(|(_, name)| format!("DROP INDEX {};", name))
                .collect();

            ValidationIssue::new(
                IssueKind::DuplicateIndex,
                Severity::Warning,
                &entity.table_name,
                format!(
                    "Indexes [{}] on '{}' declare the same columns ({})",
                    names.join(", "),
                    entity.table_name,
                    columns.join(", ")
                ),
            )
            .with_suggestion(format!(
                "Keep '{}' and drop the others",
                names.get(keep).map_or("", String::as_str)
            ))
            .with_snippet(drops.join("\n"))
        })
        .collect()
}
