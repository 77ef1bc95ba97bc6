// SPDX-License-Identifier: PMPL-1.0-or-later
//! Rendering of alt text findings.
//!
//! - Text: findings grouped per file, ordered by position, with a verdict
//! - JSON: the `FindingSet` as is
//! - SARIF 2.1.0: one run, with a `rules` entry per alt text rule that fired

use crate::fleet::{Finding, FindingSet, Severity};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";
const SARIF_VERSION: &str = "2.1.0";

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Sarif => "sarif",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render `findings` in the requested format
pub fn generate_report(findings: &FindingSet, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text_report(findings),
        OutputFormat::Json => json_report(findings),
        OutputFormat::Sarif => sarif_report(findings),
    }
}

fn text_report(findings: &FindingSet) -> String {
    let mut output = String::from("altbot: image alt text check\n\n");

    if findings.is_empty() {
        output.push_str("Every image has usable alt text.\n");
        output.push_str("RESULT: PASS\n");
        return output;
    }

    let by_file = group_by_file(findings);
    output.push_str(&format!(
        "{} image(s) flagged in {} file(s)\n\n",
        findings.len(),
        by_file.len()
    ));

    for (file, mut file_findings) in by_file {
        file_findings.sort_by_key(|f| (f.line, f.column));
        output.push_str(&file);
        output.push('\n');

        for finding in file_findings {
            output.push_str(&format!(
                "  {:<7} {:<7} {}  [{}]\n",
                position_label(finding),
                finding.severity.to_string(),
                finding.message,
                finding.rule_id
            ));
            if let Some(element) = &finding.element {
                output.push_str(&format!("          {}\n", element));
            }
            if let Some(suggestion) = &finding.suggestion {
                output.push_str(&format!("          fix: {}\n", suggestion));
            }
        }
        output.push('\n');
    }

    let criteria: BTreeSet<&str> = findings
        .findings
        .iter()
        .filter_map(|f| f.wcag_criterion.as_deref())
        .collect();
    if !criteria.is_empty() {
        let criteria: Vec<&str> = criteria.into_iter().collect();
        output.push_str(&format!("WCAG: {}\n", criteria.join(", ")));
    }

    let errors = findings.errors().len();
    let warnings = findings.warnings().len();
    output.push_str(&format!(
        "{} error(s), {} warning(s), {} info\n",
        errors,
        warnings,
        findings.len() - errors - warnings
    ));

    let verdict = if findings.blocks_release() {
        "FAILED"
    } else if warnings > 0 {
        "PASS WITH WARNINGS"
    } else {
        "PASS"
    };
    output.push_str(&format!("RESULT: {}\n", verdict));

    output
}

fn group_by_file(findings: &FindingSet) -> BTreeMap<String, Vec<&Finding>> {
    let mut groups: BTreeMap<String, Vec<&Finding>> = BTreeMap::new();
    for finding in &findings.findings {
        let file = finding
            .file
            .as_ref()
            .map_or_else(|| "<unknown>".to_string(), |f| f.display().to_string());
        groups.entry(file).or_default().push(finding);
    }
    groups
}

fn position_label(finding: &Finding) -> String {
    match (finding.line, finding.column) {
        (Some(line), Some(column)) => format!("{}:{}", line, column),
        (Some(line), None) => line.to_string(),
        _ => "-".to_string(),
    }
}

fn json_report(findings: &FindingSet) -> String {
    serde_json::to_string_pretty(findings).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize findings: {}\"}}", e)
    })
}

#[derive(Serialize)]
struct SarifLog<'a> {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: [SarifRun<'a>; 1],
}

#[derive(Serialize)]
struct SarifRun<'a> {
    tool: SarifTool<'a>,
    results: Vec<SarifResult<'a>>,
}

#[derive(Serialize)]
struct SarifTool<'a> {
    driver: SarifDriver<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver<'a> {
    name: &'static str,
    version: &'static str,
    information_uri: &'static str,
    rules: Vec<SarifRule<'a>>,
}

/// Rule metadata, taken from the first finding of each rule
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule<'a> {
    id: &'a str,
    name: &'a str,
    short_description: SarifText<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<SarifText<'a>>,
    default_configuration: SarifConfiguration,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<SarifRuleProperties>,
}

#[derive(Serialize)]
struct SarifConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
struct SarifRuleProperties {
    tags: Vec<String>,
}

#[derive(Serialize)]
struct SarifText<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult<'a> {
    rule_id: &'a str,
    rule_index: usize,
    level: &'static str,
    message: SarifText<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<SarifRegion>,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_column: Option<usize>,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn sarif_rule(finding: &Finding) -> SarifRule<'_> {
    SarifRule {
        id: &finding.rule_id,
        name: &finding.rule_name,
        short_description: SarifText { text: &finding.message },
        help: finding.suggestion.as_deref().map(|text| SarifText { text }),
        default_configuration: SarifConfiguration {
            level: sarif_level(finding.severity),
        },
        properties: finding.wcag_criterion.as_ref().map(|criterion| SarifRuleProperties {
            tags: vec!["accessibility".to_string(), format!("wcag{}", criterion)],
        }),
    }
}

fn sarif_location(finding: &Finding) -> Option<SarifLocation> {
    let file = finding.file.as_ref()?;
    Some(SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifactLocation {
                uri: file.display().to_string(),
            },
            region: finding.line.map(|start_line| SarifRegion {
                start_line,
                start_column: finding.column,
            }),
        },
    })
}

fn sarif_report(findings: &FindingSet) -> String {
    let mut rules: Vec<SarifRule<'_>> = Vec::new();
    let mut results = Vec::with_capacity(findings.len());

    for finding in &findings.findings {
        let rule_index = match rules.iter().position(|rule| rule.id == finding.rule_id) {
            Some(index) => index,
            None => {
                rules.push(sarif_rule(finding));
                rules.len() - 1
            }
        };

        results.push(SarifResult {
            rule_id: &finding.rule_id,
            rule_index,
            level: sarif_level(finding.severity),
            message: SarifText { text: &finding.message },
            locations: sarif_location(finding).into_iter().collect(),
        });
    }

    let log = SarifLog {
        schema: SARIF_SCHEMA,
        version: SARIF_VERSION,
        runs: [SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "altbot",
                    version: env!("CARGO_PKG_VERSION"),
                    information_uri: "https://www.w3.org/WAI/WCAG21/Understanding/non-text-content",
                    rules,
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&log).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e)
    })
}
