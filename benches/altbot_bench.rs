// SPDX-License-Identifier: PMPL-1.0-or-later
//! Benchmarks for the alt text validator

use altbot::diagnostic::Message;
use altbot::tree::{html, Element, Node};
use altbot::validate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn wide_tree(images: usize) -> Node {
    let children = (0..images)
        .map(|i| {
            let alt = match i % 3 {
                0 => "A photograph of the harbour at dusk",
                1 => "tiny",
                _ => "",
            };
            Element::new("p")
                .with_child(Node::text("caption"))
                .with_child(Element::new("img").with_property("alt", alt))
                .into()
        })
        .collect();
    Node::root(children)
}

fn deep_tree(depth: usize) -> Node {
    let mut node: Node = Element::new("img").into();
    for _ in 0..depth {
        node = Element::new("div").with_child(node).into();
    }
    node
}

fn bench_wide_tree(c: &mut Criterion) {
    let tree = wide_tree(10_000);

    c.bench_function("validate_wide_tree", |b| {
        b.iter(|| {
            let mut messages: Vec<Message> = Vec::new();
            validate(Some(black_box(&tree)), &mut messages);
            messages
        })
    });
}

fn bench_deep_tree(c: &mut Criterion) {
    let tree = deep_tree(50_000);

    c.bench_function("validate_deep_tree", |b| {
        b.iter(|| {
            let mut messages: Vec<Message> = Vec::new();
            validate(Some(black_box(&tree)), &mut messages);
            messages
        })
    });
}

fn bench_html_document(c: &mut Criterion) {
    let page: String = (0..500)
        .map(|i| format!("<section><h2>Item {}</h2><img src=\"{}.png\" alt=\"icon\"></section>\n", i, i))
        .collect();
    let document = format!("<html><body>{}</body></html>", page);

    c.bench_function("parse_and_validate_html", |b| {
        b.iter(|| {
            let tree = html::parse_document(black_box(&document));
            let mut messages: Vec<Message> = Vec::new();
            validate(Some(&tree), &mut messages);
            messages
        })
    });
}

criterion_group!(benches, bench_wide_tree, bench_deep_tree, bench_html_document);
criterion_main!(benches);
