// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration for altbot
//!
//! Loaded from YAML or TOML (chosen by file extension). Every field has a
//! default, so partial files are accepted and a missing file means defaults.

use crate::diagnostic::{AltTextIssue, DEFAULT_MIN_ALT_LENGTH};
use crate::error::{AltbotError, Result};
use crate::fleet::Severity;
use crate::validator::AltTextPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub alt_text: AltTextConfig,
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AltTextConfig {
    pub enabled: bool,
    pub min_length: usize,
    pub missing_severity: Severity,
    pub too_short_severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File name suffixes to scan (without the leading dot)
    pub extensions: Vec<String>,
    /// Directory names to skip
    pub exclude: Vec<String>,
}

impl AltTextConfig {
    pub fn policy(&self) -> AltTextPolicy {
        AltTextPolicy { min_length: self.min_length }
    }

    /// Host severity for an issue
    pub fn severity_for(&self, issue: &AltTextIssue) -> Severity {
        match issue {
            AltTextIssue::Missing => self.missing_severity,
            AltTextIssue::TooShort { .. } => self.too_short_severity,
        }
    }
}

impl Default for AltTextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_length: DEFAULT_MIN_ALT_LENGTH,
            missing_severity: Severity::Error,
            too_short_severity: Severity::Warning,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec![
                "html".to_string(),
                "htm".to_string(),
                "hast".to_string(),
                "hast.json".to_string(),
            ],
            exclude: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "target".to_string(),
                ".astro".to_string(),
                ".cache".to_string(),
            ],
        }
    }
}

impl ScanConfig {
    /// Whether a file name ends with one of the configured extensions
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_ascii_lowercase();
        self.extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext.to_ascii_lowercase())))
    }

    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.exclude.iter().any(|d| d == dir_name)
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("altbot")
        .join("config.yml")
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    if is_toml(path) {
        toml::from_str(&content)
            .map_err(|e| AltbotError::Config(format!("TOML parse error: {}", e)))
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| AltbotError::Config(format!("YAML parse error: {}", e)))
    }
}

pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = if is_toml(path) {
        toml::to_string_pretty(&config)
            .map_err(|e| AltbotError::Config(format!("TOML serialize error: {}", e)))?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.alt_text.enabled);
        assert_eq!(config.alt_text.policy(), AltTextPolicy::default());
        assert_eq!(config.alt_text.severity_for(&AltTextIssue::Missing), Severity::Error);
        assert_eq!(
            config.alt_text.severity_for(&AltTextIssue::TooShort { min_length: 10 }),
            Severity::Warning
        );
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("absent.yml")).unwrap();
        assert_eq!(config.alt_text.min_length, DEFAULT_MIN_ALT_LENGTH);
    }

    #[test]
    fn test_partial_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("altbot.yml");
        std::fs::write(&path, "alt_text:\n  min_length: 16\n  too_short_severity: error\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.alt_text.min_length, 16);
        assert_eq!(config.alt_text.too_short_severity, Severity::Error);
        assert_eq!(config.alt_text.missing_severity, Severity::Error);
        assert!(config.scan.matches("index.html"));
    }

    #[test]
    fn test_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("altbot.toml");
        std::fs::write(&path, "[alt_text]\nenabled = false\n\n[scan]\nextensions = [\"html\"]\n").unwrap();

        let config = load_config(&path).unwrap();
        assert!(!config.alt_text.enabled);
        assert!(config.scan.matches("page.HTML"));
        assert!(!config.scan.matches("page.hast.json"));
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("altbot.yml");
        std::fs::write(&path, "alt_text: [unclosed").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, AltbotError::Config(_)));
    }

    #[test]
    fn test_write_default_config_round_trips() {
        let dir = TempDir::new().unwrap();
        for name in ["nested/config.yml", "nested/config.toml"] {
            let path = dir.path().join(name);
            write_default_config(&path).unwrap();
            let config = load_config(&path).unwrap();
            assert_eq!(config.alt_text.min_length, DEFAULT_MIN_ALT_LENGTH);
            assert_eq!(config.scan.extensions, ScanConfig::default().extensions);
        }
    }

    #[test]
    fn test_scan_matching() {
        let scan = ScanConfig::default();
        assert!(scan.matches("about.htm"));
        assert!(scan.matches("post.hast.json"));
        assert!(!scan.matches("package.json"));
        assert!(!scan.matches("styles.css"));
        assert!(scan.is_excluded("node_modules"));
        assert!(!scan.is_excluded("public"));
    }
}
