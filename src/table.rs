//! Plain-text reports for token lists and error lists.
//!
//! One row per item, newline-terminated, suitable for printing as-is.

use std::fmt::Write;

use crate::lexer::LexError;
use crate::parser::SyntaxError;
use crate::token::Token;

/// Width of the kind column in token tables.
const KIND_WIDTH: usize = 20;

/// Render a token table: `Line N: <kind> -> <text>` per token.
#[must_use]
pub fn format_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        // Writing into a String never fails.
        let _ = writeln!(
            out,
            "Line {}: {:<width$} -> {}",
            token.line,
            token.kind,
            token.text,
            width = KIND_WIDTH
        );
    }
    out
}

/// Render lexical errors as `Line N: <message>`.
#[must_use]
pub fn format_lex_errors(errors: &[LexError]) -> String {
    let mut out = String::new();
    for error in errors {
        let _ = writeln!(out, "Line {}: {}", error.line, error.kind);
    }
    out
}

/// Render syntax errors, one per line.
#[must_use]
pub fn format_syntax_errors(errors: &[SyntaxError]) -> String {
    let mut out = String::new();
    for error in errors {
        let _ = writeln!(out, "{error}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_str;

    #[test]
    fn token_rows_are_aligned() {
        let tokens = tokenize_str("@x = 5;").expect("should tokenize");
        let table = format_tokens(&tokens);
        let rows: Vec<_> = table.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], "Line 1: identifier           -> @x");
        assert_eq!(rows[3], "Line 1: delimiter            -> ;");
    }

    #[test]
    fn empty_table() {
        assert!(format_tokens(&[]).is_empty());
    }

    #[test]
    fn lex_error_rows() {
        let errors = tokenize_str("count").unwrap_err();
        assert_eq!(
            format_lex_errors(&errors),
            "Line 1: unrecognized token: 'count' - did you mean '@count'?\n"
        );
    }

    #[test]
    fn generic_lex_error_row() {
        let errors = tokenize_str("@x = 5 #;").unwrap_err();
        assert_eq!(format_lex_errors(&errors), "Line 1: unrecognized token: '#;'\n");
    }
}
