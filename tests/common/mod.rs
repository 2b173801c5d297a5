#![allow(dead_code)]

use brightscript_rs::{Node, SyntaxTree, Token, parse};

/// Compact rendering of block nesting, e.g. `Function[If[] For[]]`.
pub fn shape(nodes: &[Node]) -> String {
    nodes
        .iter()
        .filter_map(Node::as_block)
        .map(|b| format!("{:?}[{}]", b.kind, shape(&b.children)))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn tree_shape(source: &str) -> String {
    shape(&parse(source).children)
}

/// Texts of the given nodes' leaves, whitespace dropped.
pub fn words<'s>(nodes: &[Node], source: &'s str) -> Vec<&'s str> {
    let mut out = Vec::new();
    collect_words(nodes, source, &mut out);
    out
}

fn collect_words<'s>(nodes: &[Node], source: &'s str, out: &mut Vec<&'s str>) {
    for node in nodes {
        match node {
            Node::Token(t) if !t.text(source).trim().is_empty() => out.push(t.text(source)),
            Node::Token(_) => {}
            Node::Block(b) => collect_words(&b.children, source, out),
        }
    }
}

/// Tokens must tile `[0, len)` with no gaps or overlaps.
pub fn assert_tiles(tokens: &[Token], source: &str) {
    let mut offset = 0;
    for token in tokens {
        assert_eq!(
            token.span.start, offset,
            "gap or overlap before {token:?} in {source:?}"
        );
        assert!(token.span.end > token.span.start, "empty token {token:?}");
        offset = token.span.end;
    }
    assert_eq!(
        offset,
        source.len(),
        "tokens stop short of end of {source:?}"
    );
}

pub fn assert_roundtrip(tree: &SyntaxTree<'_>) {
    assert_eq!(
        tree.to_source(),
        tree.source,
        "round-trip mismatch:\n--- expected ---\n{}\n--- got ---\n{}",
        tree.source,
        tree.to_source()
    );
    assert_tiles(&tree.tokens(), tree.source);
}
