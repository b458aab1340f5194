//! Fix suggestion generation.

use super::models::{FixKind, FixSuggestion, ValidationIssue};

/// Derives one suggestion per issue whose kind has a canonical remediation,
/// preserving issue order.
pub(crate) fn generate_fix_suggestions(issues: &[ValidationIssue]) -> Vec<FixSuggestion> {
    issues
        .iter()
        .filter_map(|issue| {
            let fix_kind = FixKind::for_issue(issue.kind)?;
            Some(FixSuggestion {
                entity_name: issue.entity_name.clone(),
                field_name: issue.field_name.clone(),
                fix_kind,
                description: issue
                    .suggested_fix
                    .clone()
                    .unwrap_or_else(|| issue.message.clone()),
                remediation: issue
                    .fix_snippet
                    .clone()
                    .unwrap_or_else(|| format!("-- review {}", issue.entity_name)),
                can_auto_apply: fix_kind.can_auto_apply(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::models::{IssueKind, Severity};

    #[test]
    fn test_one_suggestion_per_fixable_issue() {
        let issues = vec![
            ValidationIssue::new(IssueKind::MissingIndex, Severity::Warning, "tasks", "no index")
                .with_field("user_id")
                .with_suggestion("Index it")
                .with_snippet("CREATE INDEX i ON tasks (user_id);"),
            ValidationIssue::new(IssueKind::OrphanedEntity, Severity::Info, "notes", "alone"),
            ValidationIssue::new(IssueKind::MissingPrimaryKey, Severity::Critical, "notes", "no pk"),
        ];

        let fixes = generate_fix_suggestions(&issues);
        assert_eq!(fixes.len(), 2);

        assert_eq!(fixes[0].fix_kind, FixKind::AddIndex);
        assert_eq!(fixes[0].entity_name, "tasks");
        assert_eq!(fixes[0].field_name.as_deref(), Some("user_id"));
        assert_eq!(fixes[0].description, "Index it");
        assert_eq!(fixes[0].remediation, "CREATE INDEX i ON tasks (user_id);");
        assert!(fixes[0].can_auto_apply);

        assert_eq!(fixes[1].fix_kind, FixKind::AddPrimaryKey);
        assert_eq!(fixes[1].description, "no pk");
        assert_eq!(fixes[1].remediation, "-- review notes");
        assert!(!fixes[1].can_auto_apply);
    }

    #[test]
    fn test_unfixable_kinds_produce_nothing() {
        let issues = vec![
            ValidationIssue::new(IssueKind::CircularDependency, Severity::Warning, "a", "cycle"),
            ValidationIssue::new(
                IssueKind::InvalidCascadeOperation,
                Severity::Critical,
                "b",
                "set null",
            ),
        ];
        assert!(generate_fix_suggestions(&issues).is_empty());
    }
}
