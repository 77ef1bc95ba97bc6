// SPDX-License-Identifier: PMPL-1.0-or-later
//! Fleet-compatible finding types.
//!
//! Diagnostics from the validator carry no severity. The host assigns one
//! when it turns them into findings, following the gitbot-fleet shape so
//! reports can be consumed by the fleet coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Critical issue - blocks release
    Error,
    /// Should be addressed
    Warning,
    /// Informational
    Info,
}

impl Severity {
    /// Whether this severity blocks releases
    pub fn blocks_release(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A finding attributed to a file location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Unique identifier
    pub id: Uuid,
    /// Source bot identifier
    pub source: String,
    /// Rule identifier (e.g., "alt-text/missing")
    pub rule_id: String,
    /// Human-readable rule name
    pub rule_name: String,
    pub severity: Severity,
    pub message: String,
    /// File where the issue was found
    pub file: Option<PathBuf>,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed)
    pub column: Option<usize>,
    /// Markup of the offending element
    pub element: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
    /// WCAG criterion reference
    pub wcag_criterion: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Finding {
    pub fn new(rule_id: &str, severity: Severity, message: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: "altbot".to_string(),
            rule_id: rule_id.to_string(),
            rule_name: rule_id.to_string(),
            severity,
            message: message.to_string(),
            file: None,
            line: None,
            column: None,
            element: None,
            suggestion: None,
            wcag_criterion: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_rule_name(mut self, name: &str) -> Self {
        self.rule_name = name.to_string();
        self
    }

    pub fn with_wcag(mut self, criterion: &str) -> Self {
        self.wcag_criterion = Some(criterion.to_string());
        self
    }

    pub fn with_file(mut self, file: PathBuf) -> Self {
        self.file = Some(file);
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_element(mut self, element: &str) -> Self {
        self.element = Some(element.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    /// Location string for display (`file:line:column`)
    pub fn location_string(&self) -> String {
        match (&self.file, self.line, self.column) {
            (Some(f), Some(l), Some(c)) => format!("{}:{}:{}", f.display(), l, c),
            (Some(f), Some(l), None) => format!("{}:{}", f.display(), l),
            (Some(f), None, _) => f.display().to_string(),
            _ => "<unknown>".to_string(),
        }
    }
}

/// A collection of findings with aggregation methods
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingSet {
    pub findings: Vec<Finding>,
}

impl FindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.severity == severity).collect()
    }

    pub fn by_rule(&self, rule_id: &str) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.rule_id == rule_id).collect()
    }

    pub fn errors(&self) -> Vec<&Finding> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&Finding> {
        self.by_severity(Severity::Warning)
    }

    /// Check if release should be blocked
    pub fn blocks_release(&self) -> bool {
        self.findings.iter().any(|f| f.severity.blocks_release())
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_set_aggregation() {
        let mut set = FindingSet::new();
        set.add(Finding::new("alt-text/missing", Severity::Error, "missing"));
        set.add(Finding::new("alt-text/too-short", Severity::Warning, "short"));
        set.add(Finding::new("alt-text/too-short", Severity::Warning, "short"));

        assert_eq!(set.len(), 3);
        assert_eq!(set.errors().len(), 1);
        assert_eq!(set.warnings().len(), 2);
        assert_eq!(set.by_rule("alt-text/too-short").len(), 2);
        assert!(set.blocks_release());
    }

    #[test]
    fn test_warnings_do_not_block_release() {
        let mut set = FindingSet::new();
        set.add(Finding::new("alt-text/too-short", Severity::Warning, "short"));
        assert!(!set.blocks_release());
    }

    #[test]
    fn test_location_string() {
        let finding = Finding::new("alt-text/missing", Severity::Error, "missing")
            .with_file(PathBuf::from("site/index.html"))
            .with_line(12)
            .with_column(5);
        assert_eq!(finding.location_string(), "site/index.html:12:5");

        let bare = Finding::new("alt-text/missing", Severity::Error, "missing");
        assert_eq!(bare.location_string(), "<unknown>");
    }

    #[test]
    fn test_severity_serde() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let parsed: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(parsed, Severity::Error);
    }
}
