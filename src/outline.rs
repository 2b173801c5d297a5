//! Data contracts for editor-side consumers of the token stream and tree:
//! highlight categories, closing phrases, and function/sub declarations.

use crate::token::{Span, TokenKind};
use crate::tree::{BlockKind, BlockNode, Node, SyntaxTree};

/// Display category of a token for syntax colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    Keyword,
    TypeKeyword,
    String,
    Number,
    Comment,
    /// `''` and `REM` comments, shown apart from plain comments.
    RemComment,
    Operator,
    Identifier,
    BuiltinFunction,
    Parentheses,
    Braces,
    Brackets,
    Dot,
    Comma,
}

impl TokenKind {
    /// Category to paint this token with, if any. Boolean literals share
    /// the number colour.
    #[must_use]
    pub const fn highlight(self) -> Option<Highlight> {
        Some(match self {
            Self::Keyword => Highlight::Keyword,
            Self::TypeKeyword => Highlight::TypeKeyword,
            Self::StringLiteral => Highlight::String,
            Self::NumberLiteral | Self::BooleanLiteral => Highlight::Number,
            Self::LineComment => Highlight::Comment,
            Self::RemComment => Highlight::RemComment,
            Self::Operator => Highlight::Operator,
            Self::Identifier => Highlight::Identifier,
            Self::BuiltinFunction => Highlight::BuiltinFunction,
            Self::LParen | Self::RParen => Highlight::Parentheses,
            Self::LBrace | Self::RBrace => Highlight::Braces,
            Self::LBracket | Self::RBracket => Highlight::Brackets,
            Self::Dot => Highlight::Dot,
            Self::Comma => Highlight::Comma,
            Self::Colon | Self::Whitespace | Self::BadCharacter | Self::EndOfInput => return None,
        })
    }
}

impl BlockKind {
    /// Canonical closer inserted after a fresh opener, e.g. `end function`.
    #[must_use]
    pub const fn closing_phrase(self) -> &'static str {
        match self {
            Self::Function => "end function",
            Self::Sub => "end sub",
            Self::If => "end if",
            Self::For => "end for",
            Self::While => "end while",
            Self::Class => "end class",
            Self::Namespace => "end namespace",
            Self::Try => "end try",
        }
    }

    /// Every accepted spelling of this block's closer, lowercase.
    #[must_use]
    pub fn closer_spellings(self) -> Vec<&'static str> {
        let mut spellings = vec![self.closing_phrase()];
        spellings.extend_from_slice(self.compact_closers());
        spellings
    }
}

/// A named `function` or `sub` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: BlockKind,
    /// Range of the whole block.
    pub span: Span,
    /// Range of the name token.
    pub name_span: Span,
}

/// Name of a function or sub block written as `function <name>(`.
#[must_use]
pub fn declared_name(block: &BlockNode, source: &str) -> Option<Span> {
    if !matches!(block.kind, BlockKind::Function | BlockKind::Sub) {
        return None;
    }
    let mut header = block
        .header()
        .iter()
        .filter_map(Node::as_token)
        .skip(1)
        .skip_while(|t| t.is_inline_space(source));

    let name = header.next().filter(|t| t.kind.is_word())?;
    let paren = header.find(|t| !t.is_inline_space(source))?;
    (paren.kind == TokenKind::LParen).then_some(name.span)
}

/// All named function and sub blocks in the tree, in document order.
#[must_use]
pub fn declarations(tree: &SyntaxTree<'_>) -> Vec<Declaration> {
    tree.blocks()
        .into_iter()
        .filter_map(|block| {
            let name_span = declared_name(block, tree.source)?;
            Some(Declaration {
                name: name_span.text(tree.source).to_string(),
                kind: block.kind,
                span: block.span(),
                name_span,
            })
        })
        .collect()
}

/// Declarations named `name` (case-insensitive). Matches in the current
/// file win; other files are searched only when it has none.
#[must_use]
pub fn resolve<'d, O>(name: &str, current: &'d [Declaration], others: O) -> Vec<&'d Declaration>
where
    O: IntoIterator<Item = &'d [Declaration]>,
{
    let matching = |decl: &&Declaration| decl.name.eq_ignore_ascii_case(name);

    let local: Vec<_> = current.iter().filter(matching).collect();
    if !local.is_empty() {
        return local;
    }
    others
        .into_iter()
        .flat_map(|file| file.iter().filter(matching))
        .collect()
}
