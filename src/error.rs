// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for altbot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AltbotError>;

#[derive(Error, Debug)]
pub enum AltbotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}
