//! Block tree produced by the parser.
//!
//! Nodes hold tokens, never text. Every node's leaves, re-sliced against
//! the source in order, reproduce that node's source exactly.

use std::ops::Range;

use crate::token::{Span, Token};

/// Kind of a keyword-delimited block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Function,
    Sub,
    If,
    For,
    While,
    Class,
    Namespace,
    Try,
}

impl BlockKind {
    pub const ALL: [Self; 8] = [
        Self::Function,
        Self::Sub,
        Self::If,
        Self::For,
        Self::While,
        Self::Class,
        Self::Namespace,
        Self::Try,
    ];

    /// Lowercase opening keyword, also the word that follows `end`.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Sub => "sub",
            Self::If => "if",
            Self::For => "for",
            Self::While => "while",
            Self::Class => "class",
            Self::Namespace => "namespace",
            Self::Try => "try",
        }
    }

    /// Single-word closers: `endif`, `endfunction`, ... and `next` for loops.
    #[must_use]
    pub const fn compact_closers(self) -> &'static [&'static str] {
        match self {
            Self::Function => &["endfunction"],
            Self::Sub => &["endsub"],
            Self::If => &["endif"],
            Self::For => &["endfor", "next"],
            Self::While => &["endwhile"],
            Self::Class => &["endclass"],
            Self::Namespace => &["endnamespace"],
            Self::Try => &["endtry"],
        }
    }

    /// Kind opened by `word`, compared case-insensitively.
    #[must_use]
    pub fn from_opener(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| word.eq_ignore_ascii_case(kind.keyword()))
    }

    /// Kind closed by the single word `word` (`EndIf`, `next`, ...).
    #[must_use]
    pub fn from_compact_closer(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            kind.compact_closers()
                .iter()
                .any(|closer| word.eq_ignore_ascii_case(closer))
        })
    }
}

/// A child of a block: a nested block or a leaf token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Block(BlockNode),
    Token(Token),
}

impl Node {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Block(block) => block.span(),
            Self::Token(token) => token.span,
        }
    }

    #[must_use]
    pub const fn as_block(&self) -> Option<&BlockNode> {
        match self {
            Self::Block(block) => Some(block),
            Self::Token(_) => None,
        }
    }

    #[must_use]
    pub const fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            Self::Block(_) => None,
        }
    }
}

/// A parsed block: header, body, and terminator children in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub kind: BlockKind,
    pub children: Vec<Node>,
    /// Index range of the body within `children`. Children before it form
    /// the header, children after it the terminator.
    pub body: Range<usize>,
    /// The block consumed one of its own closers.
    pub terminated: bool,
    /// `if` only: `then` was followed by code on the same line.
    pub inline_body: bool,
}

impl BlockNode {
    #[must_use]
    pub fn header(&self) -> &[Node] {
        &self.children[..self.body.start]
    }

    #[must_use]
    pub fn body(&self) -> &[Node] {
        &self.children[self.body.clone()]
    }

    #[must_use]
    pub fn terminator(&self) -> &[Node] {
        &self.children[self.body.end..]
    }

    /// Nested blocks directly inside this one.
    pub fn child_blocks(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Node::as_block)
    }

    /// Range from the opening keyword to the last consumed token.
    #[must_use]
    pub fn span(&self) -> Span {
        match (self.children.first(), self.children.last()) {
            (Some(first), Some(last)) => first.span().to(last.span()),
            _ => Span::default(),
        }
    }

    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span().text(source)
    }

    /// Source line holding the opening keyword, from the keyword onwards.
    #[must_use]
    pub fn first_line<'s>(&self, source: &'s str) -> &'s str {
        let text = self.text(source);
        text.lines().next().unwrap_or(text)
    }

    #[must_use]
    pub fn is_multiline(&self, source: &str) -> bool {
        self.text(source).trim_end().contains('\n')
    }
}

/// Root of a parse: the file's top-level statements and blocks, tied to
/// the source snapshot they were parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree<'s> {
    pub source: &'s str,
    pub children: Vec<Node>,
}

impl SyntaxTree<'_> {
    /// Leaf tokens in document order.
    #[must_use]
    pub fn tokens(&self) -> Vec<Token> {
        let mut out = Vec::new();
        collect_tokens(&self.children, &mut out);
        out
    }

    /// Every block in pre-order.
    #[must_use]
    pub fn blocks(&self) -> Vec<&BlockNode> {
        let mut out = Vec::new();
        collect_blocks(&self.children, &mut out);
        out
    }

    /// Blocks at the top level of the file.
    pub fn top_level_blocks(&self) -> impl Iterator<Item = &BlockNode> {
        self.children.iter().filter_map(Node::as_block)
    }

    /// Concatenation of all leaf texts; equals `source` for any parse.
    #[must_use]
    pub fn to_source(&self) -> String {
        self.tokens().iter().map(|t| t.text(self.source)).collect()
    }

    /// Deepest block nesting in the tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        fn depth_of(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .filter_map(Node::as_block)
                .map(|b| 1 + depth_of(&b.children))
                .max()
                .unwrap_or(0)
        }
        depth_of(&self.children)
    }
}

fn collect_tokens(nodes: &[Node], out: &mut Vec<Token>) {
    for node in nodes {
        match node {
            Node::Token(token) => out.push(*token),
            Node::Block(block) => collect_tokens(&block.children, out),
        }
    }
}

fn collect_blocks<'t>(nodes: &'t [Node], out: &mut Vec<&'t BlockNode>) {
    for block in nodes.iter().filter_map(Node::as_block) {
        out.push(block);
        collect_blocks(&block.children, out);
    }
}
