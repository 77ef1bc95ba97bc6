// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image alt text validator - WCAG 1.1.1 Non-text Content (Level A)
//!
//! Walks a document tree depth-first (pre-order, children in order) and
//! checks every `<img>` element:
//! - `alt` absent or null: "Image is missing alt text."
//! - `alt` non-empty after trimming but under the floor: "too short"
//! - `alt=""` (or whitespace only) marks a decorative image and passes
//! - non-textual `alt` values pass
//!
//! The tree is only borrowed and never modified. Findings go to the sink
//! as they are found; nothing is buffered or deduplicated here.

use crate::diagnostic::{AltTextIssue, Diagnostic, DiagnosticSink, DEFAULT_MIN_ALT_LENGTH};
use crate::pipeline::Plugin;
use crate::tree::{Element, Node, PropertyValue};
use serde::{Deserialize, Serialize};

pub const IMAGE_TAG: &str = "img";
pub const ALT_PROPERTY: &str = "alt";

/// Thresholds applied to alt text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltTextPolicy {
    /// Minimum trimmed length of non-decorative alt text, in UTF-16 code
    /// units (so an astral character such as an emoji counts as two)
    pub min_length: usize,
}

impl Default for AltTextPolicy {
    fn default() -> Self {
        Self { min_length: DEFAULT_MIN_ALT_LENGTH }
    }
}

/// Validate every image in `root` with the default policy.
///
/// An absent root is a no-op.
pub fn validate<S>(root: Option<&Node>, sink: &mut S)
where
    S: DiagnosticSink + ?Sized,
{
    validate_with(root, &AltTextPolicy::default(), sink)
}

/// Validate every image in `root` against `policy`.
pub fn validate_with<S>(root: Option<&Node>, policy: &AltTextPolicy, sink: &mut S)
where
    S: DiagnosticSink + ?Sized,
{
    let Some(root) = root else {
        return;
    };

    // Explicit stack: depth is bounded only by the tree.
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match node {
            Node::Element(element) if element.tag_name == IMAGE_TAG => {
                if let Some(issue) = check_image(element, policy) {
                    sink.report(Diagnostic::new(issue, node));
                }
            }
            Node::Element(_) | Node::Text(_) | Node::Other(_) => {}
        }

        stack.extend(node.children().iter().rev());
    }
}

/// Whitespace stripped from both ends of alt text before measuring.
///
/// Unicode `White_Space` plus the byte order mark, minus NEL (U+0085),
/// which browsers and hast tooling keep as content.
fn is_trimmed_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// Length of alt text as measured against the policy floor
pub fn alt_length(alt: &str) -> usize {
    alt.trim_matches(is_trimmed_whitespace).encode_utf16().count()
}

/// Apply the alt text rule to a single image element
pub fn check_image(element: &Element, policy: &AltTextPolicy) -> Option<AltTextIssue> {
    match element.property(ALT_PROPERTY) {
        None | Some(PropertyValue::Null) => Some(AltTextIssue::Missing),
        Some(PropertyValue::Text(alt)) => {
            let length = alt_length(alt);
            (length > 0 && length < policy.min_length).then_some(AltTextIssue::TooShort {
                min_length: policy.min_length,
            })
        }
        Some(_) => None,
    }
}

/// Pipeline step running the alt text validator
#[derive(Debug, Clone, Default)]
pub struct ValidateAlt {
    pub policy: AltTextPolicy,
}

impl ValidateAlt {
    pub fn new(policy: AltTextPolicy) -> Self {
        Self { policy }
    }
}

impl Plugin for ValidateAlt {
    fn name(&self) -> &str {
        "validate-alt"
    }

    fn run(&self, tree: &Node, sink: &mut dyn DiagnosticSink) {
        validate_with(Some(tree), &self.policy, sink);
    }
}
