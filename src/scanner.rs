// SPDX-License-Identifier: PMPL-1.0-or-later
//! Directory scanner for running the pipeline across a built site.
//!
//! Walks directory trees, loads each supported document into a tree, runs
//! the pipeline, and turns diagnostics into findings.

use crate::config::{AltTextConfig, Config};
use crate::diagnostic::{AltTextIssue, Diagnostic, DiagnosticSink};
use crate::error::{AltbotError, Result};
use crate::fleet::{Finding, FindingSet};
use crate::pipeline::Pipeline;
use crate::tree::{html, Element, Node};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const WCAG_NON_TEXT_CONTENT: &str = "1.1.1";

/// Supported document encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Rendered HTML
    Html,
    /// hast syntax tree serialized as JSON
    Hast,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".hast") || name.ends_with(".hast.json") {
            Some(DocumentFormat::Hast)
        } else if name.ends_with(".html") || name.ends_with(".htm") {
            Some(DocumentFormat::Html)
        } else {
            None
        }
    }
}

/// Load a document into a tree according to its file name
pub fn load_document(path: &Path, content: &str) -> Result<Option<Node>> {
    match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Html) => Ok(Some(html::parse_document(content))),
        Some(DocumentFormat::Hast) => Node::from_json(content),
        None => Err(AltbotError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Run the pipeline over one loaded document and collect findings
pub fn analyze_document(
    path: &Path,
    tree: Option<&Node>,
    pipeline: &Pipeline,
    config: &Config,
) -> FindingSet {
    let mut collector = FindingCollector {
        path,
        config: &config.alt_text,
        findings: FindingSet::new(),
    };
    pipeline.run(tree, &mut collector);
    collector.findings
}

/// Scan a directory for images with missing or short alt text
pub fn scan_directory(dir: &Path, config: &Config) -> anyhow::Result<FindingSet> {
    let pipeline = build_pipeline(config);
    let mut all_findings = FindingSet::new();
    let mut files_scanned = 0;

    info!("Scanning directory: {}", dir.display());

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden and excluded directories, but never the root itself
            let name = e.file_name().to_str().unwrap_or("");
            if e.depth() > 0 && e.file_type().is_dir() {
                return !config.scan.is_excluded(name) && !name.starts_with('.');
            }
            true
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if !config.scan.matches(name) {
            continue;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                info!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let tree = match load_document(path, &content) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let file_findings = analyze_document(path, tree.as_ref(), &pipeline, config);
        debug!("{}: {} issue(s)", path.display(), file_findings.len());
        all_findings.extend(file_findings.findings);
        files_scanned += 1;
    }

    info!("Scanned {} files, found {} issues", files_scanned, all_findings.len());

    Ok(all_findings)
}

/// Scan a single file
pub fn scan_file(path: &Path, config: &Config) -> anyhow::Result<FindingSet> {
    let content = std::fs::read_to_string(path)?;
    let tree = load_document(path, &content)?;
    let pipeline = build_pipeline(config);
    Ok(analyze_document(path, tree.as_ref(), &pipeline, config))
}

fn build_pipeline(config: &Config) -> Pipeline {
    let pipeline = Pipeline::from_config(config);
    if pipeline.is_empty() {
        warn!("All checks are disabled by configuration, no findings will be reported");
    }
    pipeline
}

/// Sink turning diagnostics into findings for one file
struct FindingCollector<'a> {
    path: &'a Path,
    config: &'a AltTextConfig,
    findings: FindingSet,
}

impl DiagnosticSink for FindingCollector<'_> {
    fn report(&mut self, diagnostic: Diagnostic<'_>) {
        let issue = diagnostic.issue;
        let mut finding = Finding::new(
            issue.rule_id(),
            self.config.severity_for(&issue),
            &diagnostic.message(),
        )
        .with_rule_name(rule_name(&issue))
        .with_wcag(WCAG_NON_TEXT_CONTENT)
        .with_file(self.path.to_path_buf())
        .with_suggestion(&suggestion(&issue));

        if let Some(position) = diagnostic.position() {
            finding = finding
                .with_line(position.start.line)
                .with_column(position.start.column);
        }
        if let Some(element) = diagnostic.node.as_element() {
            finding = finding.with_element(&describe_element(element));
        }

        self.findings.add(finding);
    }
}

fn rule_name(issue: &AltTextIssue) -> &'static str {
    match issue {
        AltTextIssue::Missing => "Non-text Content: Missing Alt",
        AltTextIssue::TooShort { .. } => "Non-text Content: Alt Text Too Short",
    }
}

fn suggestion(issue: &AltTextIssue) -> String {
    match issue {
        AltTextIssue::Missing => {
            "Add alt=\"description\" for informative images or alt=\"\" for decorative images"
                .to_string()
        }
        AltTextIssue::TooShort { min_length } => format!(
            "Describe what the image shows in at least {} characters, or use alt=\"\" if it is decorative",
            min_length
        ),
    }
}

/// Render the start tag of an element from its text properties
fn describe_element(element: &Element) -> String {
    let attrs: String = element
        .properties
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_text()
                .map(|text| format!(" {}=\"{}\"", name, text))
        })
        .collect();
    format!("<{}{}>", element.tag_name, attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Severity;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_scan_nonexistent_dir() {
        let result = scan_directory(Path::new("/nonexistent/path"), &Config::default());
        // walkdir reports the missing root as an entry error, which is skipped
        assert!(result.is_ok());
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_document_format() {
        assert_eq!(DocumentFormat::from_path(Path::new("a/index.html")), Some(DocumentFormat::Html));
        assert_eq!(DocumentFormat::from_path(Path::new("A.HTM")), Some(DocumentFormat::Html));
        assert_eq!(DocumentFormat::from_path(Path::new("post.hast.json")), Some(DocumentFormat::Hast));
        assert_eq!(DocumentFormat::from_path(Path::new("post.hast")), Some(DocumentFormat::Hast));
        assert_eq!(DocumentFormat::from_path(Path::new("data.json")), None);
    }

    #[test]
    fn test_load_unsupported_format() {
        let err = load_document(Path::new("styles.css"), "body {}").unwrap_err();
        assert!(matches!(err, AltbotError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_findings_carry_location_and_severity() {
        let path = PathBuf::from("index.html");
        let html = "<body>\n<img src=\"a.png\">\n<img src=\"b.png\" alt=\"logo\">\n</body>";
        let tree = load_document(&path, html).unwrap();
        let config = Config::default();
        let pipeline = Pipeline::from_config(&config);

        let findings = analyze_document(&path, tree.as_ref(), &pipeline, &config);
        assert_eq!(findings.len(), 2);

        let missing = &findings.findings[0];
        assert_eq!(missing.rule_id, "alt-text/missing");
        assert_eq!(missing.severity, Severity::Error);
        assert_eq!(missing.message, "Image is missing alt text.");
        assert_eq!(missing.location_string(), "index.html:2:1");
        assert_eq!(missing.element.as_deref(), Some("<img src=\"a.png\">"));
        assert_eq!(missing.wcag_criterion.as_deref(), Some("1.1.1"));

        let short = &findings.findings[1];
        assert_eq!(short.rule_id, "alt-text/too-short");
        assert_eq!(short.severity, Severity::Warning);
        assert_eq!(short.message, "Image alt text is too short (min 10 characters).");
        assert_eq!(short.line, Some(3));
    }

    #[test]
    fn test_scan_directory_skips_excluded_and_unsupported() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        std::fs::write(root.join("index.html"), "<img src=\"a.png\">").unwrap();
        std::fs::write(root.join("notes.txt"), "<img src=\"a.png\">").unwrap();
        std::fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        std::fs::write(root.join("node_modules/pkg/readme.html"), "<img>").unwrap();
        std::fs::create_dir_all(root.join("blog")).unwrap();
        std::fs::write(
            root.join("blog/post.hast.json"),
            r#"{"type":"root","children":[{"type":"element","tagName":"img","properties":{"alt":"hi"}}]}"#,
        )
        .unwrap();
        std::fs::write(root.join("blog/broken.hast.json"), "{ nope").unwrap();

        let findings = scan_directory(root, &Config::default()).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings.by_rule("alt-text/missing").len(), 1);
        assert_eq!(findings.by_rule("alt-text/too-short").len(), 1);
    }

    #[test]
    fn test_disabled_check_reports_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<img src=\"a.png\">").unwrap();

        let mut config = Config::default();
        config.alt_text.enabled = false;
        assert!(scan_file(&path, &config).unwrap().is_empty());
    }

    #[test]
    fn test_non_object_hast_is_noop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.hast.json");
        std::fs::write(&path, "null").unwrap();
        assert!(scan_file(&path, &Config::default()).unwrap().is_empty());
    }
}
