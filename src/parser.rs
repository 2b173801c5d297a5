use std::collections::VecDeque;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::tree::{BlockKind, BlockNode, Node, SyntaxTree};

/// Words that make a following block keyword part of the same statement
/// (`exit for`, `continue while`, `cb as function`, the `sub` of a stray
/// `end sub`).
const STATEMENT_PREFIXES: [&str; 4] = ["exit", "continue", "as", "end"];

/// Tuning knobs for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest block nesting to build. An opener past this depth is kept
    /// as a flat leaf of the enclosing body.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

impl ParseOptions {
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Parse a source buffer into a block tree.
///
/// Never fails: malformed or truncated input still yields a tree whose
/// leaves reproduce `source` exactly.
#[must_use]
pub fn parse(source: &str) -> SyntaxTree<'_> {
    parse_with(source, ParseOptions::default())
}

#[must_use]
pub fn parse_with(source: &str, options: ParseOptions) -> SyntaxTree<'_> {
    parse_tokens(source, Lexer::new(source), options)
}

/// Parse an already-produced token stream. Token spans must index into
/// `source`. The stream is pulled one token at a time.
#[must_use]
pub fn parse_tokens<I>(source: &str, tokens: I, options: ParseOptions) -> SyntaxTree<'_>
where
    I: IntoIterator<Item = Token>,
{
    Parser::new(source, tokens.into_iter(), options).parse_file()
}

/// Saved cursor state for a speculative read.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    index: usize,
    consumed: usize,
    last_significant: Option<Token>,
}

/// Token cursor over a pull stream with checkpoint/rollback.
///
/// Outside a speculation only the current token is buffered. While a
/// checkpoint is open, consumed tokens stay in `pending` so a rollback can
/// replay them.
struct Cursor<'s, I> {
    source: &'s str,
    stream: I,
    pending: VecDeque<Token>,
    index: usize,
    open_checkpoints: usize,
    consumed: usize,
    last_significant: Option<Token>,
    eof_offset: usize,
}

impl<'s, I: Iterator<Item = Token>> Cursor<'s, I> {
    const fn new(source: &'s str, stream: I) -> Self {
        Self {
            source,
            stream,
            pending: VecDeque::new(),
            index: 0,
            open_checkpoints: 0,
            consumed: 0,
            last_significant: None,
            eof_offset: 0,
        }
    }

    fn fill(&mut self) -> bool {
        while self.pending.len() <= self.index {
            match self.stream.next() {
                Some(token) if !token.is_eof() => {
                    self.eof_offset = token.span.end;
                    self.pending.push_back(token);
                }
                _ => return false,
            }
        }
        true
    }

    fn peek(&mut self) -> Token {
        if self.fill() {
            self.pending[self.index]
        } else {
            Token::end_of_input(self.eof_offset)
        }
    }

    fn bump(&mut self) -> Token {
        let token = self.peek();
        if token.is_eof() {
            return token;
        }
        if self.open_checkpoints == 0 {
            self.pending.pop_front();
        } else {
            self.index += 1;
        }
        self.consumed += 1;
        if token.is_newline(self.source) {
            self.last_significant = None;
        } else if !token.kind.is_trivia() {
            self.last_significant = Some(token);
        }
        token
    }

    /// Number of tokens consumed so far; only grows outside rollbacks.
    const fn position(&self) -> usize {
        self.consumed
    }

    /// Previous non-trivia token on the current line.
    const fn last_significant(&self) -> Option<Token> {
        self.last_significant
    }

    const fn checkpoint(&mut self) -> Checkpoint {
        self.open_checkpoints += 1;
        Checkpoint {
            index: self.index,
            consumed: self.consumed,
            last_significant: self.last_significant,
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.index = checkpoint.index;
        self.consumed = checkpoint.consumed;
        self.last_significant = checkpoint.last_significant;
        self.release();
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.index <= self.index);
        self.release();
    }

    fn release(&mut self) {
        self.open_checkpoints -= 1;
        if self.open_checkpoints == 0 {
            self.pending.drain(..self.index);
            self.index = 0;
        }
    }
}

/// Structural meaning of a token at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Open(BlockKind),
    /// `end`, possibly the first word of a two-word closer.
    End,
    /// Single-word closer such as `endif` or `next`.
    Close(BlockKind),
    Else,
    /// `elseif` or `elsif`.
    ElseIf,
    Leaf,
}

struct Parser<'s, I> {
    source: &'s str,
    cursor: Cursor<'s, I>,
    options: ParseOptions,
}

impl<'s, I: Iterator<Item = Token>> Parser<'s, I> {
    const fn new(source: &'s str, stream: I, options: ParseOptions) -> Self {
        Self {
            source,
            cursor: Cursor::new(source, stream),
            options,
        }
    }

    fn parse_file(mut self) -> SyntaxTree<'s> {
        let mut children = Vec::new();

        loop {
            let token = self.cursor.peek();
            if token.is_eof() {
                break;
            }
            let before = self.cursor.position();

            // Unmatched closers have nowhere to roll up to; keep them flat.
            match self.classify(token) {
                Step::Open(kind) if self.options.max_depth > 0 => {
                    children.push(Node::Block(self.parse_block(kind, 1)));
                }
                _ => children.push(Node::Token(self.cursor.bump())),
            }

            debug_assert!(
                self.cursor.position() > before,
                "top-level parse stalled at byte {}",
                token.span.start
            );
        }

        SyntaxTree {
            source: self.source,
            children,
        }
    }

    fn parse_block(&mut self, kind: BlockKind, depth: usize) -> BlockNode {
        let opener = self.cursor.bump();
        log::trace!("open {kind:?} at byte {}", opener.span.start);

        let mut children = vec![Node::Token(opener)];
        let inline_body = self.parse_header(kind, &mut children);

        let body_start = children.len();
        let terminator = self.parse_body(kind, depth, &mut children);
        let body_end = children.len();

        let terminated = terminator.is_some();
        children.extend(terminator.into_iter().flatten().map(Node::Token));
        log::trace!("close {kind:?} (terminated: {terminated})");

        BlockNode {
            kind,
            children,
            body: body_start..body_end,
            terminated,
            inline_body: kind == BlockKind::If && inline_body,
        }
    }

    /// Consume a block header, or the condition after `elseif`/`else if`.
    ///
    /// Stops after a newline, after `then` (for `if`), or before a token
    /// that can only start or end a block. Returns true when `then` was
    /// followed by code on the same line.
    fn parse_header(&mut self, kind: BlockKind, children: &mut Vec<Node>) -> bool {
        loop {
            let token = self.cursor.peek();
            if token.is_eof() {
                return false;
            }
            if token.is_newline(self.source) {
                children.push(Node::Token(self.cursor.bump()));
                return false;
            }
            if kind == BlockKind::If && token.is_word(self.source, "then") {
                children.push(Node::Token(self.cursor.bump()));
                return self.code_follows_on_line();
            }
            if self.classify(token) != Step::Leaf {
                log::debug!(
                    "{kind:?} header cut short at byte {} by `{}`",
                    token.span.start,
                    token.text(self.source)
                );
                return false;
            }
            children.push(Node::Token(self.cursor.bump()));
        }
    }

    /// Parse body statements until a closer. Returns the closer tokens when
    /// the block closes itself, `None` at end of input or when deferring a
    /// closer to an enclosing block.
    fn parse_body(
        &mut self,
        kind: BlockKind,
        depth: usize,
        children: &mut Vec<Node>,
    ) -> Option<Vec<Token>> {
        loop {
            let token = self.cursor.peek();
            if token.is_eof() {
                return None;
            }
            let before = self.cursor.position();

            match self.classify(token) {
                Step::Open(nested) if depth < self.options.max_depth => {
                    children.push(Node::Block(self.parse_block(nested, depth + 1)));
                }
                Step::Open(nested) => {
                    log::debug!(
                        "nesting limit {} reached; {nested:?} at byte {} kept flat",
                        self.options.max_depth,
                        token.span.start
                    );
                    children.push(Node::Token(self.cursor.bump()));
                }
                Step::End => return self.close_with_end(kind),
                Step::Close(closer) if closer == kind => {
                    return Some(vec![self.cursor.bump()]);
                }
                Step::Close(other) => {
                    log::debug!(
                        "{other:?} closer at byte {} ends {kind:?}",
                        token.span.start
                    );
                    return None;
                }
                Step::Else if kind == BlockKind::If => self.parse_else(children),
                Step::ElseIf if kind == BlockKind::If => {
                    children.push(Node::Token(self.cursor.bump()));
                    self.parse_header(BlockKind::If, children);
                }
                Step::Else | Step::ElseIf | Step::Leaf => {
                    children.push(Node::Token(self.cursor.bump()));
                }
            }

            debug_assert!(
                self.cursor.position() > before,
                "{kind:?} body stalled at byte {}",
                token.span.start
            );
        }
    }

    /// Speculatively read `end <word>`. Commits when the word closes
    /// `kind`; otherwise rolls back so an enclosing block sees `end` again.
    fn close_with_end(&mut self, kind: BlockKind) -> Option<Vec<Token>> {
        let checkpoint = self.cursor.checkpoint();
        let end = self.cursor.bump();
        let mut tokens = vec![end];
        tokens.extend(self.bump_inline_space());

        if self.cursor.peek().is_word(self.source, kind.keyword()) {
            tokens.push(self.cursor.bump());
            self.cursor.commit(checkpoint);
            return Some(tokens);
        }

        log::debug!(
            "`end` at byte {} does not close {kind:?}; deferring",
            end.span.start
        );
        self.cursor.rollback(checkpoint);
        None
    }

    /// `else` stays inside the `if`. A following `if` on the same line
    /// makes it `else if`, which takes a condition like `elseif`.
    fn parse_else(&mut self, children: &mut Vec<Node>) {
        children.push(Node::Token(self.cursor.bump()));

        let checkpoint = self.cursor.checkpoint();
        let space = self.bump_inline_space();
        if self.cursor.peek().is_word(self.source, "if") {
            self.cursor.commit(checkpoint);
            children.extend(space.into_iter().map(Node::Token));
            children.push(Node::Token(self.cursor.bump()));
            self.parse_header(BlockKind::If, children);
        } else {
            self.cursor.rollback(checkpoint);
        }
    }

    fn bump_inline_space(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while self.cursor.peek().is_inline_space(self.source) {
            tokens.push(self.cursor.bump());
        }
        tokens
    }

    /// Whether a non-comment token follows on the current line.
    fn code_follows_on_line(&mut self) -> bool {
        let checkpoint = self.cursor.checkpoint();
        self.bump_inline_space();
        let next = self.cursor.peek();
        self.cursor.rollback(checkpoint);
        !next.is_eof() && !next.kind.is_trivia()
    }

    fn classify(&self, token: Token) -> Step {
        if !token.kind.is_word() {
            return Step::Leaf;
        }
        let previous = self.cursor.last_significant();
        // Member access: `node.next`, `m.sub`.
        if previous.is_some_and(|p| p.kind == TokenKind::Dot) {
            return Step::Leaf;
        }

        let text = token.text(self.source);
        if text.eq_ignore_ascii_case("end") {
            return Step::End;
        }
        if let Some(kind) = BlockKind::from_compact_closer(text) {
            return Step::Close(kind);
        }
        if text.eq_ignore_ascii_case("else") {
            return Step::Else;
        }
        if text.eq_ignore_ascii_case("elseif") || text.eq_ignore_ascii_case("elsif") {
            return Step::ElseIf;
        }

        let continues_statement = previous.is_some_and(|p| {
            STATEMENT_PREFIXES
                .iter()
                .any(|prefix| p.is_word(self.source, prefix))
        });
        match BlockKind::from_opener(text) {
            Some(kind) if !continues_statement => Step::Open(kind),
            _ => Step::Leaf,
        }
    }
}
