// SPDX-License-Identifier: PMPL-1.0-or-later
//! Typed document tree consumed by the validator.
//!
//! The shape follows hast (the HTML syntax tree produced by markdown and
//! HTML pipelines) but with a closed set of node kinds:
//!
//! - **Element**: a markup tag with properties and children
//! - **Text**: literal text content (hast text has no children, but any
//!   that a loosely shaped document carries are kept and traversed)
//! - **Other**: everything else (`root`, `comment`, `doctype`, ...)
//!
//! Nodes own their children, so every tree is finite and acyclic by
//! construction. Dropping a tree is iterative, so arbitrarily deep trees
//! are safe to build and discard.

pub mod html;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A location in a source file (1-indexed line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Point {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column, offset: None }
    }
}

/// Source span of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

impl Position {
    /// A zero-width span at a single point
    pub fn at(point: Point) -> Self {
        Self { start: point, end: point }
    }
}

/// Value of an element property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Explicit null
    Null,
    /// String value
    Text(String),
    /// Numeric value
    Number(f64),
    /// Boolean value
    Boolean(bool),
    /// Space- or comma-separated list (e.g. `className`)
    List(Vec<PropertyValue>),
    /// A value of a shape hast properties do not normally carry
    Other,
}

impl PropertyValue {
    /// Convert a JSON value, mapping objects to [`PropertyValue::Other`]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Boolean(*b),
            Value::Number(n) => n.as_f64().map_or(PropertyValue::Other, PropertyValue::Number),
            Value::String(s) => PropertyValue::Text(s.clone()),
            Value::Array(items) => {
                PropertyValue::List(items.iter().map(PropertyValue::from_json).collect())
            }
            Value::Object(_) => PropertyValue::Other,
        }
    }

    /// The string content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

/// Element properties, keyed by property name
pub type Properties = BTreeMap<String, PropertyValue>;

/// An element node (`<img>`, `<div>`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag_name: String,
    pub properties: Properties,
    pub children: Vec<Node>,
    pub position: Option<Position>,
}

impl Element {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: Properties::new(),
            children: Vec::new(),
            position: None,
        }
    }

    /// Set a property
    pub fn with_property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    /// Append a child node
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Set the source position
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        drop_iteratively(std::mem::take(&mut self.children));
    }
}

/// A text node
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub children: Vec<Node>,
    pub position: Option<Position>,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), children: Vec::new(), position: None }
    }
}

impl Drop for Text {
    fn drop(&mut self) {
        drop_iteratively(std::mem::take(&mut self.children));
    }
}

/// Any node that is neither an element nor text
#[derive(Debug, Clone, PartialEq)]
pub struct Other {
    /// The hast `type` tag, e.g. `root` or `comment`
    pub kind: String,
    pub children: Vec<Node>,
    pub position: Option<Position>,
}

impl Other {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), children: Vec::new(), position: None }
    }
}

impl Drop for Other {
    fn drop(&mut self) {
        drop_iteratively(std::mem::take(&mut self.children));
    }
}

/// Detach descendants onto a heap stack so dropping never recurses.
fn drop_iteratively(children: Vec<Node>) {
    let mut pending = children;
    while let Some(mut node) = pending.pop() {
        match &mut node {
            Node::Element(element) => pending.append(&mut element.children),
            Node::Text(text) => pending.append(&mut text.children),
            Node::Other(other) => pending.append(&mut other.children),
        }
    }
}

/// A node of a document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(Text),
    Other(Other),
}

impl Node {
    /// A `root` node holding the given children
    pub fn root(children: Vec<Node>) -> Self {
        let mut root = Other::new("root");
        root.children = children;
        Node::Other(root)
    }

    /// A text node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Text::new(value))
    }

    /// The hast `type` of this node
    pub fn kind(&self) -> &str {
        match self {
            Node::Element(_) => "element",
            Node::Text(_) => "text",
            Node::Other(other) => &other.kind,
        }
    }

    /// Child nodes in document order (empty for leaves)
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            Node::Text(text) => &text.children,
            Node::Other(other) => &other.children,
        }
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            Node::Element(element) => element.position.as_ref(),
            Node::Text(text) => text.position.as_ref(),
            Node::Other(other) => other.position.as_ref(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Parse a hast JSON document.
    ///
    /// Returns `Ok(None)` when the top-level value is not an object.
    pub fn from_json(input: &str) -> Result<Option<Node>> {
        let value: Value = serde_json::from_str(input)?;
        Ok(Node::from_value(&value))
    }

    /// Convert a hast JSON value, accepting loosely shaped input.
    ///
    /// Non-objects yield `None` (and are dropped when they appear as
    /// children). A missing or non-array `children` makes the node a leaf,
    /// a malformed `position` is ignored, and unknown `type` tags become
    /// [`Node::Other`].
    pub fn from_value(value: &Value) -> Option<Node> {
        let object = value.as_object()?;

        let position = object
            .get("position")
            .and_then(|p| Position::deserialize(p).ok());
        let children = || -> Vec<Node> {
            match object.get("children") {
                Some(Value::Array(items)) => items.iter().filter_map(Node::from_value).collect(),
                _ => Vec::new(),
            }
        };
        let string_field = |key: &str| -> String {
            object
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let kind = object.get("type").and_then(Value::as_str).unwrap_or_default();
        let node = match kind {
            "element" => {
                let properties = object
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|map| {
                        map.iter()
                            .map(|(name, v)| (name.clone(), PropertyValue::from_json(v)))
                            .collect()
                    })
                    .unwrap_or_default();

                Node::Element(Element {
                    tag_name: string_field("tagName"),
                    properties,
                    children: children(),
                    position,
                })
            }
            "text" => Node::Text(Text {
                value: string_field("value"),
                children: children(),
                position,
            }),
            other => Node::Other(Other {
                kind: other.to_string(),
                children: children(),
                position,
            }),
        };

        Some(node)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Other> for Node {
    fn from(other: Other) -> Self {
        Node::Other(other)
    }
}
