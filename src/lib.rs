//! Error-tolerant lexer and block parser for `BrightScript`.
//!
//! Source text is split into classified tokens that cover every byte, then
//! grouped into a tree of `function`/`sub`/`if`/`for`/`while`/`class`/
//! `namespace`/`try` blocks. Neither step fails: text that is half-typed
//! or plainly wrong still produces a tree whose leaves reproduce the input,
//! which is what indentation, folding, and navigation need while a file is
//! being edited.
//!
//! # Quick start
//!
//! ## Tokenize
//!
//! ```
//! use brightscript_rs::{TokenKind, tokenize};
//!
//! let source = "print \"hi\" ' greet";
//! let tokens = tokenize(source);
//! assert_eq!(tokens[0].kind, TokenKind::Keyword);
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::LineComment);
//! ```
//!
//! ## Parse blocks
//!
//! ```
//! use brightscript_rs::{BlockKind, parse};
//!
//! let source = "function f()\n  if x then\n    print 1\n  end if\nend function\n";
//! let tree = parse(source);
//! let function = tree.blocks()[0];
//! assert_eq!(function.kind, BlockKind::Function);
//! assert_eq!(function.child_blocks().next().unwrap().kind, BlockKind::If);
//! assert_eq!(tree.to_source(), source);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod lexer;
pub mod outline;
pub mod parser;
pub mod token;
pub mod tree;

pub use lexer::{LexError, LexErrorKind, Lexer, classify_word, tokenize, tokenize_range};
pub use outline::{Declaration, Highlight, declarations, declared_name, resolve};
pub use parser::{ParseOptions, parse, parse_tokens, parse_with};
pub use token::{Span, Token, TokenKind};
pub use tree::{BlockKind, BlockNode, Node, SyntaxTree};
