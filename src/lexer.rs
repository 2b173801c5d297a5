use std::collections::HashMap;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;
use std::sync::LazyLock;

use crate::token::{Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "if",
    "then",
    "else",
    "elseif",
    "elsif",
    "endif",
    "for",
    "to",
    "step",
    "next",
    "each",
    "endfor",
    "exitfor",
    "while",
    "endwhile",
    "exitwhile",
    "function",
    "endfunction",
    "sub",
    "endsub",
    "return",
    "exit",
    "goto",
    "stop",
    "and",
    "or",
    "not",
    "mod",
    "as",
    "in",
    "dim",
    "let",
    "print",
    "run",
    "class",
    "endclass",
    "namespace",
    "endnamespace",
    "interface",
    "implements",
    "extends",
    "public",
    "private",
    "protected",
    "override",
    "new",
    "import",
    "library",
    "alias",
    "try",
    "catch",
    "endtry",
    "finally",
    "throw",
    "continue",
    "continuefor",
    "continuewhile",
    "enum",
    "endenum",
    "const",
    "m",
    "super",
    "me",
    "global",
];

const TYPE_KEYWORDS: &[&str] = &[
    "boolean",
    "integer",
    "longinteger",
    "float",
    "double",
    "string",
    "object",
    "function",
    "dynamic",
    "brsub",
    "interface",
];

const BOOLEAN_LITERALS: &[&str] = &["true", "false", "invalid"];

const BUILTIN_FUNCTIONS: &[&str] = &[
    // math
    "abs",
    "atn",
    "cdbl",
    "cint",
    "cos",
    "csng",
    "exp",
    "fix",
    "int",
    "log",
    "rnd",
    "sgn",
    "sin",
    "sqr",
    "tan",
    // runtime
    "createobject",
    "type",
    "getglobalaa",
    "box",
    "run",
    "eval",
    "getlastruncompileerror",
    "getlastrunruntimeerror",
    // utility
    "sleep",
    "wait",
    "getinterface",
    "findmemberfunction",
    "uptime",
    "rebootsystem",
    "listdir",
    "readasciifile",
    "writeasciifile",
    "copyfile",
    "movefile",
    "matchfiles",
    "deletefile",
    "deletedirectory",
    "createdirectory",
    "formatdrive",
    "strtoi",
    "rungarbagecollector",
    "parsejson",
    "formatjson",
    "tr",
    // string
    "ucase",
    "lcase",
    "asc",
    "chr",
    "instr",
    "left",
    "len",
    "mid",
    "right",
    "str",
    "stri",
    "string",
    "stringi",
    "val",
    "substitute",
];

const TYPE_DESIGNATORS: [char; 6] = ['$', '%', '!', '#', '&', '@'];

/// Lowercase word to kind. Sets are inserted lowest precedence first so
/// that overlapping words (`function`, `string`, `run`) end up with the
/// kind of the strongest set.
static WORDS: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut words = HashMap::new();
    for (set, kind) in [
        (BUILTIN_FUNCTIONS, TokenKind::BuiltinFunction),
        (BOOLEAN_LITERALS, TokenKind::BooleanLiteral),
        (TYPE_KEYWORDS, TokenKind::TypeKeyword),
        (KEYWORDS, TokenKind::Keyword),
    ] {
        for word in set {
            words.insert(*word, kind);
        }
    }
    words
});

/// Classify an identifier-like run, case-insensitively.
///
/// Precedence is keyword, type keyword, boolean literal, built-in
/// function; anything else is an identifier. A trailing type designator
/// is part of the text, so `str$` is an identifier.
#[must_use]
pub fn classify_word(text: &str) -> TokenKind {
    let lower = text.to_ascii_lowercase();
    WORDS
        .get(lower.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier)
}

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Range start is greater than range end.
    InvertedRange { start: usize, end: usize },
    /// Range end lies past the end of the buffer.
    OutOfBounds { end: usize, len: usize },
    /// Offset falls inside a multi-byte character.
    NotCharBoundary,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvertedRange { start, end } => {
                write!(f, "range start {start} is after range end {end}")
            }
            Self::OutOfBounds { end, len } => {
                write!(f, "range end {end} exceeds buffer length {len}")
            }
            Self::NotCharBoundary => write!(f, "offset is not on a character boundary"),
        }
    }
}

/// Error produced when a lexer cannot be started on the requested range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {offset}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
}

/// Tokenize a whole source buffer.
///
/// Never fails: every byte ends up in exactly one token, and characters
/// that start no token become [`TokenKind::BadCharacter`].
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Tokenize `range` of `source`, as when resuming from an arbitrary offset.
///
/// # Errors
///
/// Returns `LexError` when the range is inverted, out of bounds, or
/// splits a character.
pub fn tokenize_range(source: &str, range: Range<usize>) -> Result<Vec<Token>, LexError> {
    Ok(Lexer::with_range(source, range)?.collect())
}

/// Pull-based scanner over a source buffer.
///
/// Iterating yields tokens until the range is exhausted; [`Lexer::next_token`]
/// additionally reports a zero-width [`TokenKind::EndOfInput`] from then on.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    end: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            end: source.len(),
        }
    }

    /// Start scanning at `range.start` and stop at `range.end`.
    pub fn with_range(source: &'a str, range: Range<usize>) -> Result<Self, LexError> {
        if range.start > range.end {
            return Err(LexError {
                kind: LexErrorKind::InvertedRange {
                    start: range.start,
                    end: range.end,
                },
                offset: range.start,
            });
        }
        if range.end > source.len() {
            return Err(LexError {
                kind: LexErrorKind::OutOfBounds {
                    end: range.end,
                    len: source.len(),
                },
                offset: range.end,
            });
        }
        for offset in [range.start, range.end] {
            if !source.is_char_boundary(offset) {
                return Err(LexError {
                    kind: LexErrorKind::NotCharBoundary,
                    offset,
                });
            }
        }
        Ok(Self {
            source,
            pos: range.start,
            end: range.end,
        })
    }

    /// Byte offset the next token will start at.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Scan one token. Returns `EndOfInput` once the range is exhausted.
    pub fn next_token(&mut self) -> Token {
        let Some(ch) = self.current() else {
            return Token::end_of_input(self.pos);
        };
        let start = self.pos;

        let kind = match ch {
            '\'' => {
                let kind = if self.byte_at(1) == Some(b'\'') {
                    TokenKind::RemComment
                } else {
                    TokenKind::LineComment
                };
                self.skip_to_line_end();
                kind
            }
            'r' | 'R' if self.at_rem() => {
                self.skip_to_line_end();
                TokenKind::RemComment
            }
            '"' => {
                self.read_string();
                TokenKind::StringLiteral
            }
            c if c.is_ascii_digit() => {
                self.bump_while(|c| c.is_ascii_digit() || c == '.');
                TokenKind::NumberLiteral
            }
            '&' if matches!(self.byte_at(1), Some(b'h' | b'H')) => {
                self.pos += 2;
                self.bump_while(|c| c.is_ascii_hexdigit());
                TokenKind::NumberLiteral
            }
            c if c.is_alphabetic() || c == '_' || c == '#' => self.read_word(start),
            c if c.is_whitespace() => {
                self.bump_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '.' => self.single(TokenKind::Dot),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),
            '+' | '-' | '*' | '/' | '\\' | '^' | '=' | '<' | '>' | '&' => self.read_operator(ch),
            _ => self.single(TokenKind::BadCharacter),
        };

        debug_assert!(self.pos > start, "lexer made no progress at {start}");
        Token::new(kind, start, self.pos)
    }

    fn current(&self) -> Option<char> {
        self.source[self.pos..self.end].chars().next()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        let index = self.pos + offset;
        (index < self.end).then(|| self.source.as_bytes()[index])
    }

    fn bump(&mut self) {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.current() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn skip_to_line_end(&mut self) {
        self.bump_while(|c| c != '\n');
    }

    /// `rem` as a whole word: the letter after it must not continue a word.
    fn at_rem(&self) -> bool {
        let is = |offset, lower: u8| {
            self.byte_at(offset)
                .is_some_and(|b| b.eq_ignore_ascii_case(&lower))
        };
        if !(is(1, b'e') && is(2, b'm')) {
            return false;
        }
        self.source[self.pos + 3..self.end]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric())
    }

    /// Unterminated strings run to the end of the range.
    fn read_string(&mut self) {
        self.bump(); // opening quote
        while let Some(c) = self.current() {
            self.bump();
            if c == '"' {
                break;
            }
        }
    }

    fn read_word(&mut self, start: usize) -> TokenKind {
        self.bump_while(|c| c.is_alphanumeric() || c == '_');
        // A leading `#` is never part of the run; it is picked up here as
        // a lone designator, so `#if` scans as `#` followed by `if`.
        let designator = self.current().filter(|c| TYPE_DESIGNATORS.contains(c));
        if designator.is_some() {
            self.bump();
        }
        classify_word(&self.source[start..self.pos])
    }

    fn read_operator(&mut self, first: char) -> TokenKind {
        self.bump();
        match (first, self.current()) {
            ('+' | '-' | '*' | '/' | '\\' | '<' | '>', Some('='))
            | ('+', Some('+'))
            | ('-', Some('-'))
            | ('<', Some('>')) => self.bump(),
            ('<', Some('<')) | ('>', Some('>')) => {
                self.bump();
                if self.current() == Some('=') {
                    self.bump();
                }
            }
            _ => {}
        }
        TokenKind::Operator
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (!token.is_eof()).then_some(token)
    }
}

impl FusedIterator for Lexer<'_> {}
