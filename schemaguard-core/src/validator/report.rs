//! Plain-text report rendering.
//!
//! Issues are listed by severity (CRITICAL first), then entity name, then
//! detection order. Fix suggestions are listed by entity name, then issue
//! order. Apart from the timestamp line, the output depends only on the
//! result's issues, suggestions, and summary.

use std::fmt;

use super::models::{FixSuggestion, Severity, ValidationIssue, ValidationResult};

/// Width of the separator rule.
const RULE_WIDTH: usize = 60;

/// Report title line.
pub const REPORT_TITLE: &str = "Database Schema Validation Report";

fn location(entity: &str, field: Option<&str>) -> String {
    match field {
        Some(field) => format!("{}.{}", entity, field),
        None => entity.to_string(),
    }
}

fn write_issue(f: &mut fmt::Formatter<'_>, issue: &ValidationIssue) -> fmt::Result {
    writeln!(
        f,
        "    - {} [{}] {}",
        location(&issue.entity_name, issue.field_name.as_deref()),
        issue.kind,
        issue.message
    )?;
    if let Some(suggestion) = &issue.suggested_fix {
        writeln!(f, "      Suggested fix: {}", suggestion)?;
    }
    Ok(())
}

fn write_fix(f: &mut fmt::Formatter<'_>, fix: &FixSuggestion) -> fmt::Result {
    let mode = if fix.can_auto_apply {
        "auto-applicable"
    } else {
        "requires review"
    };
    let target = fix
        .field_name
        .as_deref()
        .map_or_else(String::new, |field| format!(" ({})", field));
    writeln!(
        f,
        "    - [{}]{} {} ({})",
        fix.fix_kind, target, fix.description, mode
    )?;
    for line in fix.remediation.lines() {
        writeln!(f, "        {}", line)?;
    }
    Ok(())
}

impl ValidationResult {
    /// Issues in report order.
    pub fn issues_in_report_order(&self) -> Vec<&ValidationIssue> {
        let mut ordered: Vec<&ValidationIssue> = self.issues().iter().collect();
        ordered.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.entity_name.cmp(&b.entity_name))
        });
        ordered
    }

    /// Renders the human-readable report.
    pub fn to_report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        let summary = self.summary();

        writeln!(f, "{}", rule)?;
        writeln!(f, "{}", REPORT_TITLE)?;
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Generated: {}",
            self.created_at().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            f,
            "Overall Status: {}",
            if self.is_valid() { "VALID" } else { "INVALID" }
        )?;
        writeln!(f)?;

        writeln!(f, "Summary:")?;
        writeln!(f, "  Entities:      {}", summary.total_entities)?;
        writeln!(f, "  Relationships: {}", summary.total_relationships)?;
        writeln!(f, "  Total Issues:  {}", summary.total_issues)?;
        writeln!(f, "  Critical:      {}", summary.critical)?;
        writeln!(f, "  Errors:        {}", summary.errors)?;
        writeln!(f, "  Warnings:      {}", summary.warnings)?;
        writeln!(f, "  Info:          {}", summary.info)?;
        writeln!(f)?;

        writeln!(f, "Issues:")?;
        let ordered = self.issues_in_report_order();
        if ordered.is_empty() {
            writeln!(f, "  No issues found.")?;
        }
        for severity in Severity::DESCENDING {
            let group: Vec<_> = ordered
                .iter()
                .filter(|issue| issue.severity == severity)
                .collect();
            if group.is_empty() {
                continue;
            }
            writeln!(f, "  [{}] ({})", severity, group.len())?;
            for issue in group {
                write_issue(f, issue)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Fix Suggestions:")?;
        let mut fixes: Vec<&FixSuggestion> = self.fix_suggestions().iter().collect();
        fixes.sort_by(|a, b| a.entity_name.cmp(&b.entity_name));
        if fixes.is_empty() {
            writeln!(f, "  No fix suggestions.")?;
        }
        let mut current: Option<&str> = None;
        for fix in fixes {
            if current != Some(fix.entity_name.as_str()) {
                writeln!(f, "  {}:", fix.entity_name)?;
                current = Some(fix.entity_name.as_str());
            }
            write_fix(f, fix)?;
        }

        writeln!(f, "{}", rule)
    }
}
