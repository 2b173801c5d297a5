//! Lexer behaviour on realistic snippets and edge cases.

mod common;

use brightscript_rs::{Lexer, TokenKind, tokenize, tokenize_range};
use common::assert_tiles;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .map(|t| t.kind)
        .collect()
}

// -----------------------------------------------------------
// Totality.
// -----------------------------------------------------------

#[test]
fn lex_empty_input() {
    assert!(tokenize("").is_empty());
}

#[test]
fn lex_only_whitespace() {
    let tokens = tokenize("   \t  \n\n  ");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Whitespace);
}

#[test]
fn lex_garbage_is_covered() {
    let source = "~`?\u{0}\u{7f}€ ©|;";
    let tokens = tokenize(source);
    assert_tiles(&tokens, source);
    assert!(tokens.iter().any(|t| t.kind == TokenKind::BadCharacter));
}

#[test]
fn lex_truncated_mid_token() {
    for source in ["\"unclosed", "&h", "'", "1.", "a$", "<<", "REM"] {
        assert_tiles(&tokenize(source), source);
    }
}

#[test]
fn lex_bom_is_a_bad_character() {
    let source = "\u{FEFF}sub main()";
    let tokens = tokenize(source);
    assert_eq!(tokens[0].kind, TokenKind::BadCharacter);
    assert_eq!(tokens[0].text(source), "\u{FEFF}");
    assert_tiles(&tokens, source);
}

// -----------------------------------------------------------
// Classification.
// -----------------------------------------------------------

#[test]
fn lex_function_header() {
    assert_eq!(
        kinds("Function Main(args As Object) As Void"),
        vec![
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::LParen,
            TokenKind::Identifier,
            TokenKind::Keyword,
            TokenKind::TypeKeyword,
            TokenKind::RParen,
            TokenKind::Keyword,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn lex_builtins_and_literals() {
    assert_eq!(
        kinds("x = CreateObject(\"roArray\", 10, true) + invalid"),
        vec![
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::BuiltinFunction,
            TokenKind::LParen,
            TokenKind::StringLiteral,
            TokenKind::Comma,
            TokenKind::NumberLiteral,
            TokenKind::Comma,
            TokenKind::BooleanLiteral,
            TokenKind::RParen,
            TokenKind::Operator,
            TokenKind::BooleanLiteral,
        ]
    );
}

#[test]
fn lex_punctuation() {
    assert_eq!(
        kinds("a.b[0]: {k: 1}"),
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::LBracket,
            TokenKind::NumberLiteral,
            TokenKind::RBracket,
            TokenKind::Colon,
            TokenKind::LBrace,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::NumberLiteral,
            TokenKind::RBrace,
        ]
    );
}

#[test]
fn lex_keywords_any_case() {
    for word in ["FUNCTION", "Function", "function", "EndFunction", "END"] {
        let tokens = tokenize(word);
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].kind.is_word(), "{word} should be a word");
    }
    assert_eq!(tokenize("ENDIF")[0].kind, TokenKind::Keyword);
}

#[test]
fn lex_comment_stops_at_newline() {
    let source = "x = 1 ' note\ny = 2";
    let tokens = tokenize(source);
    let comment = tokens
        .iter()
        .find(|t| t.kind == TokenKind::LineComment)
        .expect("comment");
    assert_eq!(comment.text(source), "' note");
    assert_eq!(tokens.last().map(|t| t.text(source)), Some("2"));
}

#[test]
fn lex_rem_needs_word_boundary() {
    assert_eq!(kinds("rem: x")[0], TokenKind::RemComment);
    assert_eq!(kinds("remark = 1")[0], TokenKind::Identifier);
    assert_eq!(kinds("Rem2 = 1")[0], TokenKind::Identifier);
}

#[test]
fn lex_double_apostrophe_is_rem_comment() {
    let source = "'' TODO: doc\n' plain";
    assert_eq!(
        kinds(source),
        vec![TokenKind::RemComment, TokenKind::LineComment]
    );
}

#[test]
fn lex_string_ends_at_next_quote() {
    let source = "\"a\"\"b\"";
    let tokens = tokenize(source);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].text(source), "\"a\"");
    assert_eq!(tokens[1].text(source), "\"b\"");
}

#[test]
fn lex_string_spans_lines_when_unclosed() {
    let source = "s = \"abc\nnext";
    let tokens = tokenize(source);
    assert_eq!(
        tokens.last().map(|t| t.kind),
        Some(TokenKind::StringLiteral)
    );
}

#[test]
fn lex_increment_operator_run() {
    let source = "i++ : j-- : k <<= 2";
    let ops: Vec<_> = tokenize(source)
        .into_iter()
        .filter(|t| t.kind == TokenKind::Operator)
        .map(|t| t.text(source))
        .collect();
    assert_eq!(ops, ["++", "--", "<<="]);
}

#[test]
fn lex_ampersand_without_h_is_operator() {
    let source = "a & b";
    assert_eq!(kinds(source)[1], TokenKind::Operator);
}

// -----------------------------------------------------------
// Restartability.
// -----------------------------------------------------------

#[test]
fn lex_resume_matches_full_scan_at_token_boundary() {
    let source = "sub a()\n  print 1\nend sub\n";
    let full = tokenize(source);
    let resume_at = full[5].span.start;
    let resumed = tokenize_range(source, resume_at..source.len()).expect("range");
    assert_eq!(resumed, full[5..]);
}

#[test]
fn lex_range_end_truncates() {
    let source = "\"long string\"";
    let tokens = tokenize_range(source, 0..5).expect("range");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text(source), "\"long");
}

#[test]
fn lex_error_message() {
    let err = tokenize_range("abc", 0..10).unwrap_err();
    assert_eq!(
        err.to_string(),
        "range end 10 exceeds buffer length 3 at byte 10"
    );
}

#[test]
fn lex_offset_tracks_progress() {
    let mut lexer = Lexer::new("ab cd");
    assert_eq!(lexer.offset(), 0);
    lexer.next_token();
    assert_eq!(lexer.offset(), 2);
    assert_eq!(lexer.by_ref().count(), 2);
    assert!(lexer.next_token().is_eof());
}
