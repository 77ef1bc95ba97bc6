// SPDX-License-Identifier: PMPL-1.0-or-later
//! altbot - Image alt text linter for static-site document trees
//!
//! Runs as a post-parse, pre-render step of a site build. It walks each
//! document tree and reports `<img>` elements whose alt text is missing or
//! implausibly short (WCAG 1.1.1 Non-text Content).
//!
//! ## Rule
//!
//! - `alt` absent or null: "Image is missing alt text."
//! - `alt` trimmed to 1..=9 characters: "Image alt text is too short (min 10 characters)."
//! - `alt=""` marks a decorative image and is accepted
//!
//! The validator never modifies the tree and never decides whether the
//! build fails. Severity, rendering and exit status belong to the host
//! (the [`scanner`], [`report`] and CLI layers of this crate, or your own).
//!
//! ## Usage
//!
//! ```rust
//! use altbot::diagnostic::Message;
//! use altbot::tree::{Element, Node};
//! use altbot::validate;
//!
//! let tree = Node::root(vec![Element::new("img").with_property("alt", "ok").into()]);
//!
//! let mut messages: Vec<Message> = Vec::new();
//! validate(Some(&tree), &mut messages);
//!
//! assert_eq!(messages[0].reason, "Image alt text is too short (min 10 characters).");
//! ```

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod fleet;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod tree;
pub mod validator;

pub use config::Config;
pub use diagnostic::{AltTextIssue, Diagnostic, DiagnosticSink, Message};
pub use error::{AltbotError, Result};
pub use pipeline::{Pipeline, Plugin};
pub use tree::{Element, Node};
pub use validator::{validate, validate_with, AltTextPolicy, ValidateAlt};
