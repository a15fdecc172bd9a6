use std::fmt;

/// Every reserved word of the language.
pub const KEYWORDS: &[&str] = &[
    "if", "while", "start", "end", "return", "returns", "else", "elif", "choose", "case", "range",
    "define", "int", "float", "string", "bool", "void", "print", "true", "false",
];

/// Keywords that name a variable or parameter type.
pub const DATA_TYPES: &[&str] = &["int", "float", "string", "bool"];

/// Keywords allowed after `returns` in a function declaration.
pub const RETURN_TYPES: &[&str] = &["int", "float", "string", "bool", "void"];

/// Token kinds produced by the lexer.
///
/// The declaration order is the order in which the lexical rules are
/// tried, so earlier kinds win when several rules match a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `?` to end of line.
    Comment,
    /// One of [`KEYWORDS`].
    Keyword,
    /// `:`, `(`, `)`, `;`, `[`, `]` or `,`.
    Delimiter,
    /// `@name` or `$name`.
    Identifier,
    /// `-1.5`
    NegativeDecimal,
    /// `1.5`
    Decimal,
    /// `-1`
    Negative,
    /// `1` or `+1`
    Integer,
    /// `=`, `++` or `--`.
    AssignOp,
    /// `+`, `-`, `*`, `/` or `^`.
    ArithOp,
    /// `<>`, `><`, `<=`, `>=`, `==`, `<` or `>`.
    CompareOp,
    /// `and` or `or`.
    BoolOp,
    /// Quoted text, quotes included.
    Text,
}

impl TokenKind {
    /// Label used in token tables.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Keyword => "keyword",
            Self::Delimiter => "delimiter",
            Self::Identifier => "identifier",
            Self::NegativeDecimal => "negative_decimal",
            Self::Decimal => "decimal",
            Self::Negative => "negative",
            Self::Integer => "integer",
            Self::AssignOp => "assign_op",
            Self::ArithOp => "arith_op",
            Self::CompareOp => "compare_op",
            Self::BoolOp => "bool_op",
            Self::Text => "text",
        }
    }

    /// True for the four numeric literal kinds.
    #[must_use]
    pub const fn is_number(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Decimal | Self::Negative | Self::NegativeDecimal
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A single token with its kind, exact lexeme, and 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub line: usize,
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    #[must_use]
    pub fn new(line: usize, kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            text: text.into(),
        }
    }

    /// True if the token has this kind and exactly this text.
    #[must_use]
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.is(TokenKind::Keyword, word)
    }

    /// True for `int`, `float`, `string` and `bool`.
    #[must_use]
    pub fn is_data_type(&self) -> bool {
        self.kind == TokenKind::Keyword && DATA_TYPES.contains(&self.text.as_str())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.text)
    }
}
