//! Validation result models.
//!
//! Issues and fix suggestions are immutable records created during a single
//! validation pass. [`ValidationResult`] aggregates them and exposes pure
//! read-only queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordinal impact of an issue: `Critical > Error > Warning > Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational finding
    Info,
    /// Likely problem worth reviewing
    Warning,
    /// Definite inconsistency
    Error,
    /// Structurally broken schema
    Critical,
}

impl Severity {
    /// All severities, highest first.
    pub const DESCENDING: [Severity; 4] = [
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
    ];

    /// Upper-case label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Closed catalog of schema consistency issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Entity declares no primary key
    MissingPrimaryKey,
    /// Primary key names a field the entity does not declare
    CompositeKeyIssue,
    /// Foreign key target or columns cannot be resolved
    InvalidForeignKeyReference,
    /// Child column type differs from the referenced parent column
    TypeMismatch,
    /// Foreign key columns are not covered by any index
    MissingIndex,
    /// Two indexes share the same column list
    DuplicateIndex,
    /// Owned child blocks deletion of its parent
    MissingCascadeDelete,
    /// On-delete action contradicts column nullability
    InvalidCascadeOperation,
    /// Entity is neither referenced nor referencing
    OrphanedEntity,
    /// Entities reference each other in a loop
    CircularDependency,
    /// Relation declaration has no matching foreign key
    RelationAnnotationMismatch,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IssueKind::MissingPrimaryKey => "MISSING_PRIMARY_KEY",
            IssueKind::CompositeKeyIssue => "COMPOSITE_KEY_ISSUE",
            IssueKind::InvalidForeignKeyReference => "INVALID_FOREIGN_KEY_REFERENCE",
            IssueKind::TypeMismatch => "TYPE_MISMATCH",
            IssueKind::MissingIndex => "MISSING_INDEX",
            IssueKind::DuplicateIndex => "DUPLICATE_INDEX",
            IssueKind::MissingCascadeDelete => "MISSING_CASCADE_DELETE",
            IssueKind::InvalidCascadeOperation => "INVALID_CASCADE_OPERATION",
            IssueKind::OrphanedEntity => "ORPHANED_ENTITY",
            IssueKind::CircularDependency => "CIRCULAR_DEPENDENCY",
            IssueKind::RelationAnnotationMismatch => "RELATION_ANNOTATION_MISMATCH",
        };
        write!(f, "{}", name)
    }
}

/// A single schema consistency issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Rule that produced the issue
    pub kind: IssueKind,
    /// Impact of the issue
    pub severity: Severity,
    /// Entity the issue is reported against
    pub entity_name: String,
    /// Field the issue concerns, if any
    pub field_name: Option<String>,
    /// Human-readable description
    pub message: String,
    /// Human-readable remediation hint
    pub suggested_fix: Option<String>,
    /// DDL-like remediation snippet
    pub fix_snippet: Option<String>,
}

impl ValidationIssue {
    /// Creates an issue without field, suggestion, or snippet.
    pub fn new(
        kind: IssueKind,
        severity: Severity,
        entity_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            entity_name: entity_name.into(),
            field_name: None,
            message: message.into(),
            suggested_fix: None,
            fix_snippet: None,
        }
    }

    /// Sets the field the issue concerns.
    pub fn with_field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Sets the human-readable suggested fix.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggested_fix = Some(suggestion.into());
        self
    }

    /// Sets the remediation snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.fix_snippet = Some(snippet.into());
        self
    }
}

/// Category of remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixKind {
    /// Declare a primary key
    AddPrimaryKey,
    /// Repair or add a foreign key constraint
    AddForeignKey,
    /// Index the foreign key columns
    AddIndex,
    /// Align the child column type with its parent
    FixTypeMismatch,
    /// Switch the on-delete action to CASCADE
    AddCascadeDelete,
    /// Drop the redundant index
    RemoveDuplicateIndex,
    /// Add the foreign key backing a relation
    FixRelationAnnotation,
    /// Declare the missing key fields
    AddCompositePrimaryKey,
}

impl FixKind {
    /// Canonical remediation for an issue kind, if one exists.
    pub fn for_issue(kind: IssueKind) -> Option<Self> {
        match kind {
            IssueKind::MissingPrimaryKey => Some(FixKind::AddPrimaryKey),
            IssueKind::InvalidForeignKeyReference => Some(FixKind::AddForeignKey),
            IssueKind::MissingIndex => Some(FixKind::AddIndex),
            IssueKind::TypeMismatch => Some(FixKind::FixTypeMismatch),
            IssueKind::MissingCascadeDelete => Some(FixKind::AddCascadeDelete),
            IssueKind::DuplicateIndex => Some(FixKind::RemoveDuplicateIndex),
            IssueKind::RelationAnnotationMismatch => Some(FixKind::FixRelationAnnotation),
            IssueKind::CompositeKeyIssue => Some(FixKind::AddCompositePrimaryKey),
            IssueKind::InvalidCascadeOperation
            | IssueKind::OrphanedEntity
            | IssueKind::CircularDependency => None,
        }
    }

    /// Purely additive or subtractive fixes can be applied without review.
    pub fn can_auto_apply(&self) -> bool {
        matches!(self, FixKind::RemoveDuplicateIndex | FixKind::AddIndex)
    }
}

impl std::fmt::Display for FixKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FixKind::AddPrimaryKey => "ADD_PRIMARY_KEY",
            FixKind::AddForeignKey => "ADD_FOREIGN_KEY",
            FixKind::AddIndex => "ADD_INDEX",
            FixKind::FixTypeMismatch => "FIX_TYPE_MISMATCH",
            FixKind::AddCascadeDelete => "ADD_CASCADE_DELETE",
            FixKind::RemoveDuplicateIndex => "REMOVE_DUPLICATE_INDEX",
            FixKind::FixRelationAnnotation => "FIX_RELATION_ANNOTATION",
            FixKind::AddCompositePrimaryKey => "ADD_COMPOSITE_PRIMARY_KEY",
        };
        write!(f, "{}", name)
    }
}

/// Suggested remediation derived from an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixSuggestion {
    /// Entity the fix applies to
    pub entity_name: String,
    /// Field the fix applies to, if any
    pub field_name: Option<String>,
    /// Category of the fix
    pub fix_kind: FixKind,
    /// Human-readable description
    pub description: String,
    /// Remediation text, usually DDL
    pub remediation: String,
    /// Whether the fix is safe to apply without review
    pub can_auto_apply: bool,
}

/// Issue counts for a validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Entities in the catalog
    pub total_entities: usize,
    /// Distinct entity-to-entity references
    pub total_relationships: usize,
    /// Reported issues after filtering
    pub total_issues: usize,
    /// Critical issue count
    pub critical: usize,
    /// Error issue count
    pub errors: usize,
    /// Warning issue count
    pub warnings: usize,
    /// Info issue count
    pub info: usize,
}

impl ValidationSummary {
    /// Count for one severity.
    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Error => self.errors,
            Severity::Warning => self.warnings,
            Severity::Info => self.info,
        }
    }
}

/// Outcome of validating an entity catalog.
///
/// Valid iff no issue is `Critical`. The result is read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    issues: Vec<ValidationIssue>,
    fix_suggestions: Vec<FixSuggestion>,
    summary: ValidationSummary,
    created_at: DateTime<Utc>,
}

impl ValidationResult {
    pub(crate) fn new(
        issues: Vec<ValidationIssue>,
        fix_suggestions: Vec<FixSuggestion>,
        summary: ValidationSummary,
    ) -> Self {
        let is_valid = !issues.iter().any(|i| i.severity == Severity::Critical);
        Self {
            is_valid,
            issues,
            fix_suggestions,
            summary,
            created_at: Utc::now(),
        }
    }

    /// True iff no critical issue was found.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Issues in detection order.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Fix suggestions in issue order.
    pub fn fix_suggestions(&self) -> &[FixSuggestion] {
        &self.fix_suggestions
    }

    /// Per-severity counts.
    pub fn summary(&self) -> &ValidationSummary {
        &self.summary
    }

    /// When the result was produced.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether any critical issue was found.
    pub fn has_critical_issues(&self) -> bool {
        self.summary.critical > 0
    }

    /// Issues with exactly the given severity.
    pub fn issues_by_severity(&self, severity: Severity) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .collect()
    }

    /// Issues reported against the given entity.
    pub fn issues_for_entity(&self, entity_name: &str) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.entity_name == entity_name)
            .collect()
    }

    /// Issues of the given kind.
    pub fn issues_by_kind(&self, kind: IssueKind) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|issue| issue.kind == kind).collect()
    }

    /// Whether any issue at or above `severity` exists.
    pub fn has_issues_at_or_above(&self, severity: Severity) -> bool {
        self.issues.iter().any(|issue| issue.severity >= severity)
    }
}
