//! Tokenizer and syntax validator for the sigil teaching language.
//!
//! Source text is split into classified tokens by an ordered list of
//! lexical rules, then checked against the grammar by a recursive-descent
//! validator. Nothing is built or executed: the result is either the token
//! list of a well-formed program or the errors that prevented it.
//!
//! # Quick start
//!
//! ```
//! use sigil_front::{tokenize_str, validate};
//!
//! let tokens = tokenize_str("int @x = 5;\nprint(@x);").unwrap();
//! assert!(validate(&tokens).is_ok());
//! ```
//!
//! ## Errors from either phase
//!
//! ```
//! use sigil_front::{Error, check_str};
//!
//! let err = check_str("count = 1;").unwrap_err();
//! let Error::Lex(errors) = err else { panic!("expected lexical errors") };
//! assert!(errors[0].to_string().contains("@count"));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod lexer;
pub mod parser;
pub mod table;
pub mod token;

pub use lexer::{LexError, LexErrorKind, tokenize, tokenize_str};
pub use parser::{Line, Parser, SyntaxError, validate};
pub use table::{format_lex_errors, format_syntax_errors, format_tokens};
pub use token::{DATA_TYPES, KEYWORDS, RETURN_TYPES, Token, TokenKind};

/// Unified error type covering both phases. The two never mix: syntax
/// validation only runs on input that tokenized cleanly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Every unrecognized lexeme in the input.
    #[error("lexical analysis failed with {} error(s)", .0.len())]
    Lex(Vec<LexError>),
    /// Errors recorded by the validator before it stopped.
    #[error("syntax analysis failed with {} error(s)", .0.len())]
    Syntax(Vec<SyntaxError>),
}

/// Tokenize and validate source lines in one step.
///
/// Returns the token list of a well-formed program.
pub fn check<I, S>(lines: I) -> Result<Vec<Token>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens = tokenize(lines).map_err(Error::Lex)?;
    validate(&tokens).map_err(Error::Syntax)?;
    Ok(tokens)
}

/// Tokenize and validate a whole source text in one step.
pub fn check_str(source: &str) -> Result<Vec<Token>, Error> {
    check(source.lines())
}
