// SPDX-License-Identifier: PMPL-1.0-or-later
//! HTML loader: parses markup with scraper and converts it to a document tree.
//!
//! html5ever does not expose source locations, so `<img>` elements get an
//! estimated position by pairing them, in document order, with the image
//! start tags found in the source text. The pairing is all or nothing: if
//! the counts disagree, no image gets a position.

use super::{Element, Node, Other, Point, Position, PropertyValue};
use scraper::{ElementRef, Html};
use tracing::debug;

/// Start tags the parser turns into `img` (`<image>` is rewritten outside SVG)
const IMAGE_TAG_NAMES: &[&str] = &["img", "image"];

/// Elements whose content is raw text, not markup
const RAW_TEXT_TAGS: &[&str] = &[
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes", "noscript",
];

/// Parse a complete HTML document
pub fn parse_document(content: &str) -> Node {
    convert(&Html::parse_document(content), content)
}

/// Parse an HTML fragment (e.g. rendered markdown body)
pub fn parse_fragment(content: &str) -> Node {
    convert(&Html::parse_fragment(content), content)
}

fn convert(html: &Html, source: &str) -> Node {
    let mut root = Node::root(vec![convert_element(html.root_element())]);
    assign_image_positions(&mut root, &locate_image_tags(source));
    root
}

fn convert_element(element: ElementRef<'_>) -> Node {
    let value = element.value();
    let mut converted = Element::new(value.name());

    for (name, attr) in value.attrs() {
        converted
            .properties
            .insert(name.to_string(), PropertyValue::from(attr));
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            converted.children.push(convert_element(child_element));
            continue;
        }

        match child.value() {
            scraper::Node::Text(text) => {
                let content: &str = text;
                converted.children.push(Node::text(content));
            }
            scraper::Node::Comment(_) => converted.children.push(Other::new("comment").into()),
            _ => {}
        }
    }

    converted.into()
}

/// Pair `img` elements, in pre-order, with the located start tags
fn assign_image_positions(root: &mut Node, points: &[Point]) {
    let mut slots = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let children = match node {
            Node::Element(element) => {
                let Element { tag_name, children, position, .. } = element;
                if *tag_name == "img" {
                    slots.push(position);
                }
                children
            }
            Node::Text(text) => &mut text.children,
            Node::Other(other) => &mut other.children,
        };
        stack.extend(children.iter_mut().rev());
    }

    if slots.len() != points.len() {
        debug!(
            "Found {} <img> element(s) but {} start tag(s), leaving positions unset",
            slots.len(),
            points.len()
        );
        return;
    }

    for (slot, point) in slots.into_iter().zip(points) {
        *slot = Some(Position::at(*point));
    }
}

/// Find the line/column of every image start tag in the source.
///
/// Comments, raw-text element content and quoted attribute values are
/// skipped, so `<img` written inside them is not counted.
fn locate_image_tags(content: &str) -> Vec<Point> {
    let lower = content.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut offsets = Vec::new();
    let mut cursor = 0;

    while let Some(open) = find(bytes, b"<", cursor) {
        let rest = &bytes[open + 1..];
        cursor = match rest.first().copied() {
            _ if rest.starts_with(b"!--") => {
                find(bytes, b"-->", open + 2).map_or(bytes.len(), |end| end + 3)
            }
            Some(b'!' | b'?' | b'/') => skip_tag(bytes, open + 1),
            Some(c) if c.is_ascii_alphabetic() => {
                let name_end = rest
                    .iter()
                    .position(|&c| c.is_ascii_whitespace() || c == b'/' || c == b'>')
                    .map_or(bytes.len(), |len| open + 1 + len);
                let name = &lower[open + 1..name_end];
                if IMAGE_TAG_NAMES.contains(&name) {
                    offsets.push(open);
                }

                let after = skip_tag(bytes, name_end);
                if RAW_TEXT_TAGS.contains(&name) {
                    let close = format!("</{}", name);
                    find(bytes, close.as_bytes(), after).unwrap_or(bytes.len())
                } else {
                    after
                }
            }
            _ => open + 1,
        };
    }

    points_at(content, &offsets)
}

/// Index just past the `>` that closes a tag. `>` inside a quoted
/// attribute value does not close it.
fn skip_tag(bytes: &[u8], from: usize) -> usize {
    let mut index = from;
    let mut after_equals = false;
    while let Some(&c) = bytes.get(index) {
        match c {
            b'>' => return index + 1,
            b'"' | b'\'' if after_equals => {
                index = find(bytes, &[c], index + 1).unwrap_or(bytes.len());
                after_equals = false;
            }
            b'=' => after_equals = true,
            c if c.is_ascii_whitespace() => {}
            _ => after_equals = false,
        }
        index += 1;
    }
    bytes.len()
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|found| from + found)
}

/// Convert ascending byte offsets to 1-indexed line/column points
fn points_at(content: &str, offsets: &[usize]) -> Vec<Point> {
    let mut points = Vec::with_capacity(offsets.len());
    let mut targets = offsets.iter().copied().peekable();
    let (mut line, mut column) = (1, 1);

    for (index, c) in content.char_indices() {
        while targets.next_if_eq(&index).is_some() {
            points.push(Point::new(line, column));
        }
        if targets.peek().is_none() {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(node: &Node) -> Vec<&Element> {
        let mut found = Vec::new();
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            if let Node::Element(element) = node {
                if element.tag_name == "img" {
                    found.push(element);
                }
            }
            stack.extend(node.children().iter().rev());
        }
        found
    }

    #[test]
    fn test_parse_document_converts_elements() {
        let html = r#"<html><body><p>Intro <img src="a.png" alt="Chart of rainfall by month"></p></body></html>"#;
        let root = parse_document(html);
        assert_eq!(root.kind(), "root");

        let imgs = images(&root);
        assert_eq!(imgs.len(), 1);
        assert_eq!(
            imgs[0].property("alt").and_then(PropertyValue::as_text),
            Some("Chart of rainfall by month")
        );
        assert_eq!(imgs[0].property("src").and_then(PropertyValue::as_text), Some("a.png"));
    }

    #[test]
    fn test_missing_alt_has_no_property() {
        let root = parse_fragment(r#"<img src="a.png">"#);
        let imgs = images(&root);
        assert_eq!(imgs.len(), 1);
        assert!(imgs[0].property("alt").is_none());
    }

    #[test]
    fn test_valueless_alt_is_empty_text() {
        let root = parse_fragment(r#"<img src="a.png" alt>"#);
        let imgs = images(&root);
        assert_eq!(imgs[0].property("alt").and_then(PropertyValue::as_text), Some(""));
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        let root = parse_fragment(r#"<DIV><IMG SRC="a.png" ALT="Lighthouse on a cliff"></DIV>"#);
        let imgs = images(&root);
        assert_eq!(imgs.len(), 1);
        assert!(imgs[0].property("alt").is_some());
    }

    #[test]
    fn test_image_positions_are_estimated() {
        let html = "<html>\n<body>\n  <img src=\"a.png\">\n  <p>text</p><img src=\"b.png\" alt=\"x\">\n</body>\n</html>";
        let root = parse_document(html);
        let imgs = images(&root);
        assert_eq!(imgs.len(), 2);
        assert_eq!(imgs[0].position.unwrap().start, Point::new(3, 3));
        assert_eq!(imgs[1].position.unwrap().start, Point::new(4, 14));
    }

    #[test]
    fn test_locate_skips_longer_tag_names() {
        let points = locate_image_tags("<imgx> <img/> <IMG\nsrc=a>");
        assert_eq!(points, vec![Point::new(1, 8), Point::new(1, 15)]);
    }

    #[test]
    fn test_commented_out_image_is_not_counted() {
        let html = "<body>\n<!-- <img src=\"old.png\"> -->\n<p>intro</p>\n  <img src=\"new.png\">\n</body>";
        let root = parse_document(html);
        let imgs = images(&root);
        assert_eq!(imgs.len(), 1);
        assert_eq!(imgs[0].position.unwrap().start, Point::new(4, 3));
    }

    #[test]
    fn test_image_tag_is_located_as_img() {
        let html = "<body>\n<svg></svg>\n<image src=a>\n<img src=b>\n</body>";
        let root = parse_document(html);
        let lines: Vec<Option<usize>> = images(&root)
            .iter()
            .map(|img| img.position.map(|p| p.start.line))
            .collect();
        assert_eq!(lines, vec![Some(3), Some(4)]);
    }

    #[test]
    fn test_img_in_script_and_attribute_is_skipped() {
        let html = "<head><script>let s = \"<img src=x>\";</script></head>\n<body>\n<a title='<img>'>x</a><img src=b>\n</body>";
        let root = parse_document(html);
        let imgs = images(&root);
        assert_eq!(imgs.len(), 1);
        assert_eq!(imgs[0].position.unwrap().start, Point::new(3, 23));
    }

    #[test]
    fn test_count_mismatch_leaves_positions_unset() {
        // inside SVG, `<image>` stays an SVG element
        let html = "<body>\n<svg><image href=a.png /></svg>\n<img src=b>\n</body>";
        let root = parse_document(html);
        let imgs = images(&root);
        assert_eq!(imgs.len(), 1);
        assert!(imgs[0].position.is_none());
    }

    #[test]
    fn test_locate_counts_multibyte_columns() {
        let points = locate_image_tags("<p>héllo</p><img>");
        assert_eq!(points, vec![Point::new(1, 13)]);
    }

    #[test]
    fn test_text_and_comments_are_kept() {
        let root = parse_fragment("<p>hello<!-- note --></p>");
        let html_element = &root.children()[0];
        let paragraph = html_element.children()[0].as_element().unwrap();
        assert_eq!(paragraph.tag_name, "p");
        assert_eq!(paragraph.children[0], Node::text("hello"));
        assert_eq!(paragraph.children[1].kind(), "comment");
    }
}
