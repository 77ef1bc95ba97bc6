// SPDX-License-Identifier: PMPL-1.0-or-later
//! Diagnostics emitted by the alt text validator and the sinks that receive them.

use crate::tree::{Node, Position};
use std::fmt;

/// Floor for non-decorative alt text, in characters
pub const DEFAULT_MIN_ALT_LENGTH: usize = 10;

pub const MISSING_ALT_MESSAGE: &str = "Image is missing alt text.";

/// What is wrong with an image's alt text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AltTextIssue {
    /// `alt` is absent or null
    Missing,
    /// `alt` is non-empty after trimming but shorter than `min_length`
    TooShort { min_length: usize },
}

impl AltTextIssue {
    /// Stable identifier for this rule
    pub fn rule_id(&self) -> &'static str {
        match self {
            AltTextIssue::Missing => "alt-text/missing",
            AltTextIssue::TooShort { .. } => "alt-text/too-short",
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            AltTextIssue::Missing => MISSING_ALT_MESSAGE.to_string(),
            AltTextIssue::TooShort { min_length } => {
                format!("Image alt text is too short (min {} characters).", min_length)
            }
        }
    }
}

impl fmt::Display for AltTextIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// A diagnostic attributed to the node that caused it
#[derive(Debug, Clone, Copy)]
pub struct Diagnostic<'a> {
    pub issue: AltTextIssue,
    pub node: &'a Node,
}

impl<'a> Diagnostic<'a> {
    pub fn new(issue: AltTextIssue, node: &'a Node) -> Self {
        Self { issue, node }
    }

    pub fn message(&self) -> String {
        self.issue.message()
    }

    /// Source position of the offending node, if known
    pub fn position(&self) -> Option<&'a Position> {
        self.node.position()
    }

    /// Detach from the tree
    pub fn to_message(&self) -> Message {
        Message {
            issue: self.issue,
            reason: self.message(),
            position: self.position().copied(),
        }
    }
}

/// An owned diagnostic that outlives the traversal
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub issue: AltTextIssue,
    pub reason: String,
    pub position: Option<Position>,
}

/// Receives diagnostics as they are produced.
///
/// Sinks are a reporting channel only. The validator neither inspects nor
/// reacts to what a sink does with a diagnostic.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic<'_>);
}

impl DiagnosticSink for Vec<Message> {
    fn report(&mut self, diagnostic: Diagnostic<'_>) {
        self.push(diagnostic.to_message());
    }
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Diagnostic<'_>),
{
    fn report(&mut self, diagnostic: Diagnostic<'_>) {
        self(diagnostic)
    }
}
