#![allow(dead_code)]

use sigil_front::{SyntaxError, Token, TokenKind, tokenize_str, validate};

/// Tokenize `source`, panicking on lexical errors.
pub fn lex(source: &str) -> Vec<Token> {
    tokenize_str(source).unwrap_or_else(|errors| {
        panic!("unexpected lexical errors: {errors:?}\n--- source ---\n{source}")
    })
}

pub fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).into_iter().map(|t| t.kind).collect()
}

/// Assert that `source` is a well-formed program.
pub fn assert_valid(source: &str) {
    if let Err(errors) = validate(&lex(source)) {
        panic!("expected valid program, got {errors:?}\n--- source ---\n{source}");
    }
}

/// Assert that `source` tokenizes but fails validation; returns the errors.
pub fn syntax_errors(source: &str) -> Vec<SyntaxError> {
    match validate(&lex(source)) {
        Ok(()) => panic!("expected syntax errors\n--- source ---\n{source}"),
        Err(errors) => errors,
    }
}

/// First recorded syntax error message.
pub fn first_message(source: &str) -> String {
    syntax_errors(source)
        .into_iter()
        .next()
        .map(|e| e.message)
        .unwrap_or_default()
}
