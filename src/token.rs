/// Byte range into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub const fn to(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    /// Slice the covered text out of `source`.
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Control-flow or structure word (`if`, `function`, `next`, ...).
    Keyword,
    /// Type name usable after `as` (`integer`, `string`, ...).
    TypeKeyword,
    /// Global built-in function (`createobject`, `len`, ...).
    BuiltinFunction,
    /// Any other word, including a trailing type designator.
    Identifier,
    /// Double-quoted string, possibly unterminated.
    StringLiteral,
    /// Decimal or `&h` hexadecimal number.
    NumberLiteral,
    /// `true`, `false` or `invalid`.
    BooleanLiteral,
    /// Comment starting with a single `'`.
    LineComment,
    /// Comment starting with `''` or `REM`.
    RemComment,
    Operator,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Colon,
    /// Run of whitespace, newlines included.
    Whitespace,
    /// A character that cannot start any other token.
    BadCharacter,
    /// Zero-width marker at the end of the scanned range.
    EndOfInput,
}

impl TokenKind {
    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::RemComment)
    }

    /// Whitespace and comments.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace) || self.is_comment()
    }

    /// Kinds produced by the identifier-like scanning rule.
    #[must_use]
    pub const fn is_word(self) -> bool {
        matches!(
            self,
            Self::Keyword
                | Self::TypeKeyword
                | Self::BuiltinFunction
                | Self::BooleanLiteral
                | Self::Identifier
        )
    }
}

/// A classified slice of the source. The token never owns text; use
/// [`Token::text`] against the buffer it was scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span { start, end },
        }
    }

    #[must_use]
    pub const fn end_of_input(offset: usize) -> Self {
        Self::new(TokenKind::EndOfInput, offset, offset)
    }

    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.text(source)
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfInput)
    }

    /// Whitespace containing a line break; the parser's statement separator.
    #[must_use]
    pub fn is_newline(&self, source: &str) -> bool {
        self.kind == TokenKind::Whitespace && self.text(source).contains('\n')
    }

    /// Whitespace that stays on the current line.
    #[must_use]
    pub fn is_inline_space(&self, source: &str) -> bool {
        self.kind == TokenKind::Whitespace && !self.text(source).contains('\n')
    }

    /// Case-insensitive comparison of a word token against `word`.
    #[must_use]
    pub fn is_word(&self, source: &str, word: &str) -> bool {
        self.kind.is_word() && self.text(source).eq_ignore_ascii_case(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_text_and_merge() {
        let src = "end function";
        let a = Span::new(0, 3);
        let b = Span::new(4, 12);
        assert_eq!(a.text(src), "end");
        assert_eq!(a.to(b), Span::new(0, 12));
        assert_eq!(b.to(a).len(), 12);
    }

    #[test]
    fn newline_detection() {
        let src = "  \n\t";
        assert!(Token::new(TokenKind::Whitespace, 0, 4).is_newline(src));
        assert!(Token::new(TokenKind::Whitespace, 0, 2).is_inline_space(src));
        assert!(!Token::new(TokenKind::Whitespace, 0, 2).is_newline(src));
    }

    #[test]
    fn word_comparison_ignores_case() {
        let src = "EndIf";
        let tok = Token::new(TokenKind::Keyword, 0, 5);
        assert!(tok.is_word(src, "endif"));
        assert!(!Token::new(TokenKind::StringLiteral, 0, 5).is_word(src, "endif"));
    }

    #[test]
    fn eof_is_zero_width() {
        let eof = Token::end_of_input(7);
        assert!(eof.is_eof());
        assert!(eof.span.is_empty());
    }
}
