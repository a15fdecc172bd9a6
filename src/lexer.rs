use std::fmt;
use std::sync::LazyLock;

use log::{debug, trace};
use regex::Regex;

use crate::token::{KEYWORDS, Token, TokenKind};

/// Lexical rules in priority order. The first rule that matches a
/// non-empty prefix of the remaining line wins.
static RULES: LazyLock<Vec<(TokenKind, Regex)>> = LazyLock::new(|| {
    let keywords = format!(r"^(?:{})\b", KEYWORDS.join("|"));
    [
        (TokenKind::Comment, r"^\?.*"),
        (TokenKind::Keyword, keywords.as_str()),
        (TokenKind::Delimiter, r"^[:()\[\];,]"),
        (TokenKind::Identifier, r"^[@$][a-zA-Z][a-zA-Z0-9_]*\b"),
        (TokenKind::NegativeDecimal, r"^-[0-9]+\.[0-9]+"),
        (TokenKind::Decimal, r"^[0-9]+\.[0-9]+"),
        (TokenKind::Negative, r"^-[0-9]+"),
        (TokenKind::Integer, r"^\+?[0-9]+"),
        (TokenKind::AssignOp, r"^(?:\+\+|--|=)"),
        // `.` is an operator; digits on both sides make a decimal first.
        (TokenKind::ArithOp, r"^[-+*/^.]"),
        (TokenKind::CompareOp, r"^(?:<>|><|<=|>=|==|<|>)"),
        (TokenKind::BoolOp, r"^(?:and|or)\b"),
        (TokenKind::Text, r#"^["'].*["']"#),
    ]
    .into_iter()
    .map(|(kind, pattern)| {
        let re = Regex::new(pattern).expect("lexical rule pattern is valid");
        (kind, re)
    })
    .collect()
});

/// A bare word that would be a valid identifier with a sigil in front.
static BARE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*\b").expect("bare word pattern is valid")
});

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Lexeme that no rule accepts.
    Unrecognized { lexeme: String },
    /// Bare word that is probably a variable written without `@`.
    MissingSigil { lexeme: String },
}

impl LexErrorKind {
    /// The offending lexeme.
    #[must_use]
    pub fn lexeme(&self) -> &str {
        match self {
            Self::Unrecognized { lexeme } | Self::MissingSigil { lexeme } => lexeme,
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized { lexeme } => {
                write!(f, "unrecognized token: '{lexeme}'")
            }
            Self::MissingSigil { lexeme } => {
                write!(
                    f,
                    "unrecognized token: '{lexeme}' - did you mean '@{lexeme}'?"
                )
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
}

impl LexError {
    /// Human-readable message without the line number.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Tokenize source lines into a flat token list.
///
/// Lines are numbered from 1. Blank lines produce nothing. Scanning never
/// stops early: every unrecognized lexeme in the input is collected.
///
/// # Errors
///
/// Returns every `LexError` found. No tokens are returned in that case.
pub fn tokenize<I, S>(lines: I) -> Result<Vec<Token>, Vec<LexError>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lexer = Lexer::default();
    for (index, line) in lines.into_iter().enumerate() {
        lexer.scan_line(index + 1, line.as_ref());
    }
    lexer.finish()
}

/// Tokenize a whole source text, splitting it on line breaks.
///
/// # Errors
///
/// See [`tokenize`].
pub fn tokenize_str(source: &str) -> Result<Vec<Token>, Vec<LexError>> {
    tokenize(source.lines())
}

#[derive(Default)]
struct Lexer {
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl Lexer {
    fn scan_line(&mut self, line: usize, text: &str) {
        let mut rest = text.trim();

        while let Some(ch) = rest.chars().next() {
            if ch.is_whitespace() {
                rest = &rest[ch.len_utf8()..];
                continue;
            }

            if let Some((kind, len)) = Self::match_rule(rest) {
                let lexeme = &rest[..len];
                trace!("line {line}: {kind} {lexeme:?}");
                self.tokens.push(Token::new(line, kind, lexeme));
                rest = &rest[len..];
            } else {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                self.unrecognized(line, &rest[..end]);
                rest = &rest[end..];
            }
        }
    }

    fn match_rule(rest: &str) -> Option<(TokenKind, usize)> {
        RULES.iter().find_map(|(kind, re)| {
            re.find(rest)
                .filter(|m| !m.is_empty())
                .map(|m| (*kind, m.end()))
        })
    }

    fn unrecognized(&mut self, line: usize, lexeme: &str) {
        let lexeme = lexeme.to_string();
        let kind = if BARE_WORD.is_match(&lexeme) {
            LexErrorKind::MissingSigil { lexeme }
        } else {
            LexErrorKind::Unrecognized { lexeme }
        };
        debug!("line {line}: {kind}");
        self.errors.push(LexError { kind, line });
    }

    fn finish(self) -> Result<Vec<Token>, Vec<LexError>> {
        if self.errors.is_empty() {
            debug!("tokenized {} token(s)", self.tokens.len());
            Ok(self.tokens)
        } else {
            debug!("tokenizing failed with {} error(s)", self.errors.len());
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize_str(source)
            .expect("should tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn assignment_statement() {
        let tokens = tokenize_str("@x = 5;").expect("should tokenize");
        assert_eq!(
            tokens,
            vec![
                Token::new(1, TokenKind::Identifier, "@x"),
                Token::new(1, TokenKind::AssignOp, "="),
                Token::new(1, TokenKind::Integer, "5"),
                Token::new(1, TokenKind::Delimiter, ";"),
            ]
        );
    }

    #[test]
    fn negative_decimal_is_one_token() {
        let tokens = tokenize_str("-3.5").expect("should tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::NegativeDecimal);
        assert_eq!(tokens[0].text, "-3.5");
    }

    #[test]
    fn numeric_kinds() {
        assert_eq!(
            kinds("1.5 -2 +3 4"),
            vec![
                TokenKind::Decimal,
                TokenKind::Negative,
                TokenKind::Integer,
                TokenKind::Integer,
            ]
        );
    }

    #[test]
    fn minus_before_space_is_arith() {
        assert_eq!(
            kinds("@a - 1"),
            vec![TokenKind::Identifier, TokenKind::ArithOp, TokenKind::Integer]
        );
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens = tokenize_str("@x = 1; ? set x = 1").expect("should tokenize");
        let last = tokens.last().expect("has tokens");
        assert_eq!(last.kind, TokenKind::Comment);
        assert_eq!(last.text, "? set x = 1");
    }

    #[test]
    fn keywords_match_whole_words() {
        let tokens = tokenize_str("returns return").expect("should tokenize");
        assert_eq!(tokens[0].text, "returns");
        assert_eq!(tokens[1].text, "return");

        let err = tokenize_str("integer").unwrap_err();
        assert_eq!(
            err[0].kind,
            LexErrorKind::MissingSigil {
                lexeme: "integer".to_string()
            }
        );
    }

    #[test]
    fn keyword_followed_by_delimiter() {
        assert_eq!(
            kinds("print(@x);"),
            vec![
                TokenKind::Keyword,
                TokenKind::Delimiter,
                TokenKind::Identifier,
                TokenKind::Delimiter,
                TokenKind::Delimiter,
            ]
        );
    }

    #[test]
    fn double_equals_is_two_assign_ops() {
        assert_eq!(
            kinds("@a == @b"),
            vec![
                TokenKind::Identifier,
                TokenKind::AssignOp,
                TokenKind::AssignOp,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn compare_and_bool_ops() {
        assert_eq!(
            kinds("<> <= > and or"),
            vec![
                TokenKind::CompareOp,
                TokenKind::CompareOp,
                TokenKind::CompareOp,
                TokenKind::BoolOp,
                TokenKind::BoolOp,
            ]
        );
    }

    #[test]
    fn text_quotes_may_differ() {
        let tokens = tokenize_str(r#"print("mixed');"#).expect("should tokenize");
        assert_eq!(tokens[2].kind, TokenKind::Text);
        assert_eq!(tokens[2].text, r#""mixed'"#);
    }

    #[test]
    fn text_runs_to_last_quote() {
        let tokens = tokenize_str(r#"print("a", "b");"#).expect("should tokenize");
        assert_eq!(tokens[2].text, r#""a", "b""#);
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn blank_lines_keep_numbering() {
        let tokens = tokenize(["", "   ", "@x;"]).expect("should tokenize");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.line == 3));
    }

    #[test]
    fn bare_word_suggests_sigil() {
        let errors = tokenize_str("count").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 1);
        assert!(errors[0].message().contains("@count"));
    }

    #[test]
    fn lex_error_messages() {
        let errors = tokenize_str("count #").unwrap_err();
        assert_eq!(
            errors[0].message(),
            "unrecognized token: 'count' - did you mean '@count'?"
        );
        assert_eq!(errors[1].message(), "unrecognized token: '#'");
        assert_eq!(
            errors[1].to_string(),
            "unrecognized token: '#' at line 1"
        );
    }

    #[test]
    fn generic_unrecognized_token() {
        let errors = tokenize_str("@x = #5;").unwrap_err();
        assert_eq!(
            errors[0].kind,
            LexErrorKind::Unrecognized {
                lexeme: "#5;".to_string()
            }
        );
    }

    #[test]
    fn errors_collected_across_lines() {
        let errors = tokenize(["foo = 1;", "@ok = 2;", "@y = ~;"]).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line, 1);
        assert_eq!(errors[1].line, 3);
        assert_eq!(errors[1].kind.lexeme(), "~;");
    }

    #[test]
    fn empty_input_is_empty_token_list() {
        let tokens = tokenize(Vec::<String>::new()).expect("should tokenize");
        assert!(tokens.is_empty());
    }
}
