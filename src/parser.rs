use std::fmt;

use log::{debug, trace};

use crate::token::{DATA_TYPES, RETURN_TYPES, Token, TokenKind};

/// Source line a syntax error points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    At(usize),
    /// The token stream ran out before the construct was complete.
    Unknown,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(line) => write!(f, "line {line}"),
            Self::Unknown => write!(f, "unknown line"),
        }
    }
}

/// Error produced during syntax validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at {line}: {message}")]
pub struct SyntaxError {
    pub line: Line,
    pub message: String,
}

/// Validate a token stream against the grammar.
///
/// # Errors
///
/// Returns the accumulated `SyntaxError`s when the stream does not match.
pub fn validate(tokens: &[Token]) -> Result<(), Vec<SyntaxError>> {
    let mut parser = Parser::new(tokens);
    if parser.parse() {
        Ok(())
    } else {
        Err(parser.into_errors())
    }
}

/// Marker for a rule that did not match. Any message has already been
/// recorded in the parser's error list.
#[derive(Debug)]
struct Failed;

type Outcome = Result<(), Failed>;

/// What an unfinished expression does once its inner operand is done.
#[derive(Debug, Clone, Copy)]
enum Resume {
    /// After `(`: expect `)`, then an optional operator.
    CloseParen,
    /// After `) op`: pass the operand's result through.
    AfterParenOp,
    /// After `value op`: a failed operand is reported here.
    AfterValueOp,
}

/// Recursive-descent validator over a borrowed token list.
///
/// Comment tokens stay in the list; the cursor primitives look past them.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Run the validator. Returns true iff no error was recorded.
    ///
    /// There is no recovery: the first statement that fails ends the run.
    pub fn parse(&mut self) -> bool {
        while let Some(token) = self.current() {
            let line = token.line;
            if self.statement().is_err() {
                if self.errors.is_empty() {
                    self.errors.push(SyntaxError {
                        line: Line::At(line),
                        message: "No syntax match for this statement".to_string(),
                    });
                }
                break;
            }
        }

        debug!(
            "validated {} token(s), {} error(s)",
            self.tokens.len(),
            self.errors.len()
        );
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }

    // -----------------------------------------------------------
    // Cursor primitives.
    // -----------------------------------------------------------

    /// Index of the first non-comment token at or after the cursor.
    fn significant(&self) -> Option<usize> {
        (self.pos..self.tokens.len()).find(|&i| self.tokens[i].kind != TokenKind::Comment)
    }

    fn current(&self) -> Option<&'a Token> {
        let tokens = self.tokens;
        self.significant().map(|i| &tokens[i])
    }

    /// The token after the current one.
    fn peek(&self) -> Option<&'a Token> {
        let tokens = self.tokens;
        let next = self.significant()? + 1;
        tokens[next..]
            .iter()
            .find(|t| t.kind != TokenKind::Comment)
    }

    fn advance(&mut self) {
        if let Some(i) = self.significant() {
            self.pos = i + 1;
        }
    }

    /// Consume the current token if it has `kind` (and `text`, if given).
    /// The cursor does not move on a mismatch.
    fn match_token(&mut self, kind: TokenKind, text: Option<&str>) -> Option<&'a Token> {
        let token = self.current()?;
        if token.kind != kind || text.is_some_and(|t| t != token.text) {
            return None;
        }
        self.advance();
        Some(token)
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        self.match_token(kind, None).is_some()
    }

    fn keyword(&mut self, word: &str) -> bool {
        self.match_token(TokenKind::Keyword, Some(word)).is_some()
    }

    fn delimiter(&mut self, delim: &str) -> bool {
        self.match_token(TokenKind::Delimiter, Some(delim)).is_some()
    }

    fn any_keyword(&mut self, words: &[&str]) -> bool {
        words.iter().any(|w| self.keyword(w))
    }

    fn number(&mut self) -> bool {
        match self.current() {
            Some(token) if token.kind.is_number() => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn boolean(&mut self) -> bool {
        self.keyword("true") || self.keyword("false")
    }

    /// Record an error at the current token's line.
    fn error(&mut self, message: impl Into<String>) -> Failed {
        let line = self.current().map_or(Line::Unknown, |t| Line::At(t.line));
        let message = message.into();
        debug!("{line}: {message}");
        self.errors.push(SyntaxError { line, message });
        Failed
    }

    fn expect(&mut self, delim: &str, message: &str) -> Outcome {
        if self.delimiter(delim) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn expect_keyword(&mut self, word: &str, message: &str) -> Outcome {
        if self.keyword(word) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    // -----------------------------------------------------------
    // Statements.
    // -----------------------------------------------------------

    fn statement(&mut self) -> Outcome {
        let Some(token) = self.current() else {
            return Err(self.error("Unexpected end of input"));
        };
        trace!("statement at line {}: {token}", token.line);

        if token.is_data_type() {
            return match self.peek() {
                Some(next) if next.kind == TokenKind::Identifier => self.variable_declaration(),
                _ => Err(self.error("Expected variable name after type")),
            };
        }

        if self.keyword("define") {
            return self.function_declaration();
        }
        if self.keyword("if") {
            return self.if_statement();
        }
        if self.keyword("while") {
            return self.while_statement();
        }
        if self.keyword("range") {
            return self.range_statement();
        }
        if self.keyword("choose") {
            return self.choose_statement();
        }
        if self.keyword("else") {
            return self.else_statement();
        }
        if self.keyword("print") {
            return self.print_statement();
        }
        if self.keyword("return") {
            return self.return_statement();
        }

        self.expression_statement()
    }

    /// `type identifier [ '=' (expression | text) ] ';'`
    fn variable_declaration(&mut self) -> Outcome {
        self.advance(); // type

        if !self.match_kind(TokenKind::Identifier) {
            return Err(self.error("Expected variable name after type"));
        }
        // A value right after the name means the `=` was left out.
        if self.expression().is_ok() {
            return Err(self.error("Expected '=' before assignment"));
        }

        if self.match_token(TokenKind::AssignOp, Some("=")).is_some()
            && self.expression().is_err()
            && !self.match_kind(TokenKind::Text)
        {
            return Err(self.error("Expected expression or text after '='"));
        }

        self.expect(";", "Expected ';' after declaration")
    }

    /// Assignment to an existing variable, a bare variable, or an expression.
    fn expression_statement(&mut self) -> Outcome {
        if !self.match_kind(TokenKind::Identifier) {
            return self.expression();
        }

        if self.match_kind(TokenKind::AssignOp) {
            if self.expression().is_err() {
                return Err(self.error("Expected expression after assignment"));
            }
            return self.expect(";", "Expected ';' after statement");
        }

        Ok(())
    }

    /// `'define' identifier 'returns' type '(' params? ')' ':' body`
    fn function_declaration(&mut self) -> Outcome {
        if !self.match_kind(TokenKind::Identifier) {
            return Err(self.error("Expected function name after 'define'"));
        }
        self.expect_keyword("returns", "Expected 'returns' in function declaration")?;
        if !self.any_keyword(RETURN_TYPES) {
            return Err(self.error("Expected return type after 'returns'"));
        }
        self.expect("(", "Expected '(' for parameters")?;

        if !self.delimiter(")") {
            loop {
                if !self.any_keyword(DATA_TYPES) {
                    return Err(self.error("Expected parameter type"));
                }
                if !self.match_kind(TokenKind::Identifier) {
                    return Err(self.error("Expected parameter name"));
                }
                if self.delimiter(")") {
                    break;
                }
                if !self.delimiter(",") {
                    return Err(self.error("Expected ',' or ')' after parameter"));
                }
            }
        }

        self.expect(":", "Expected ':' before function body")?;
        self.body("function")
    }

    fn if_statement(&mut self) -> Outcome {
        self.condition_head("if")?;
        self.body("if")?;

        while self.keyword("elif") {
            self.condition_head("elif")?;
            self.body("elif")?;
        }
        if self.keyword("else") {
            self.else_statement()?;
        }

        Ok(())
    }

    fn while_statement(&mut self) -> Outcome {
        self.condition_head("while")?;
        self.body("while")
    }

    /// `'(' bound ',' bound ',' bound ')' ':' body`
    fn range_statement(&mut self) -> Outcome {
        self.expect("(", "Expected '(' after 'range'")?;
        self.bound("start")?;
        self.expect(",", "Expected ',' after start value")?;
        self.bound("end")?;
        self.expect(",", "Expected ',' after end value")?;
        self.bound("step")?;
        self.expect(")", "Expected ')' after range bounds")?;
        self.expect(":", "Expected ':' after ')'")?;
        self.body("range")
    }

    fn bound(&mut self, which: &str) -> Outcome {
        if self.number() || self.match_kind(TokenKind::Identifier) || self.expression().is_ok() {
            Ok(())
        } else {
            Err(self.error(format!("Expected {which} value")))
        }
    }

    /// `'(' identifier ')' ':' 'start' ('case' case_body)* 'end'`
    fn choose_statement(&mut self) -> Outcome {
        self.expect("(", "Expected '(' after 'choose'")?;
        if !self.match_kind(TokenKind::Identifier) {
            return Err(self.error("Expected a variable inside choose statement"));
        }
        self.expect(")", "Expected ')' after variable")?;
        self.expect(":", "Expected ':' after choose clause")?;
        self.expect_keyword("start", "Expected 'start' for choose body")?;

        loop {
            if self.keyword("end") {
                return Ok(());
            }
            if self.current().is_none() {
                return Err(self.error("Missing 'end' for choose statement"));
            }
            if !self.keyword("case") {
                return Err(self.error("Expected 'case' or 'end' in choose block"));
            }
            self.case_statement()?;
        }
    }

    /// `value ':' statement*`, ending before the next `case` or `end`.
    fn case_statement(&mut self) -> Outcome {
        let has_value = self.match_kind(TokenKind::Identifier)
            || self.match_kind(TokenKind::Text)
            || self.number()
            || self.boolean()
            || self.expression().is_ok();
        if !has_value {
            return Err(self.error("Expected value after 'case'"));
        }
        self.expect(":", "Expected ':' after case value")?;

        loop {
            match self.current() {
                None => return Err(self.error("Missing 'end' for choose statement")),
                Some(t) if t.is_keyword("case") || t.is_keyword("end") => return Ok(()),
                Some(_) => self.statement()?,
            }
        }
    }

    fn else_statement(&mut self) -> Outcome {
        self.expect(":", "Expected ':' after 'else'")?;
        self.body("else")
    }

    /// `'(' printable ')' ';'`
    fn print_statement(&mut self) -> Outcome {
        self.expect("(", "Expected '(' after 'print'")?;

        let printable = self.match_kind(TokenKind::Text)
            || self.number()
            || self.match_kind(TokenKind::Identifier)
            || self.expression().is_ok()
            || self.boolean();
        if !printable {
            return Err(self.error("Missing value to print"));
        }

        self.expect(")", "Expected ')' after print value")?;
        self.expect(";", "Expected ';' after print")
    }

    fn return_statement(&mut self) -> Outcome {
        let has_value = self.match_kind(TokenKind::Identifier)
            || self.expression().is_ok()
            || self.match_kind(TokenKind::Text)
            || self.number()
            || self.boolean();
        if !has_value {
            return Err(self.error(
                "Expected variable, number, text or expression after 'return'",
            ));
        }
        self.expect(";", "Expected ';' after return value")
    }

    // -----------------------------------------------------------
    // Shared pieces.
    // -----------------------------------------------------------

    /// `'(' condition ')' ':'`
    fn condition_head(&mut self, construct: &str) -> Outcome {
        self.expect("(", &format!("Expected '(' after '{construct}'"))?;
        self.condition()?;
        self.expect(")", "Expected ')' after condition")?;
        self.expect(":", "Expected ':' after condition")
    }

    /// `'start' statement* 'end'`
    fn body(&mut self, construct: &str) -> Outcome {
        self.expect_keyword("start", &format!("Expected 'start' for {construct} body"))?;
        loop {
            if self.keyword("end") {
                return Ok(());
            }
            if self.current().is_none() {
                return Err(self.error(format!("Missing 'end' for {construct} body")));
            }
            self.statement()?;
        }
    }

    /// `operand [op operand [op condition]]`, run as a loop.
    fn condition(&mut self) -> Outcome {
        loop {
            self.condition_operand()?;
            if !self.condition_op() {
                return Ok(());
            }
            if self.condition_operand().is_err() {
                return Err(self.error("Expected expression after operator"));
            }
            if !self.condition_op() {
                return Ok(());
            }
        }
    }

    fn condition_operand(&mut self) -> Outcome {
        if self.expression().is_ok() || self.boolean() {
            Ok(())
        } else {
            Err(Failed)
        }
    }

    fn condition_op(&mut self) -> bool {
        self.match_kind(TokenKind::CompareOp) || self.match_kind(TokenKind::BoolOp)
    }

    /// `'(' expression ')' [op expression] | value [op expression]`
    ///
    /// Runs without recursion: every point where the grammar would
    /// re-enter `expression` pushes a [`Resume`] and starts the next
    /// operand, and each finished operand unwinds the stack until a frame
    /// asks for another one. Nesting depth is bounded only by the heap.
    ///
    /// A failing first operand records nothing, so callers can try other
    /// alternatives. A failing operand after a value operator records
    /// `Expected valid expression after operator` once per enclosing
    /// value operator, innermost first.
    fn expression(&mut self) -> Outcome {
        let mut pending: Vec<Resume> = Vec::new();

        loop {
            // Start an operand.
            if self.delimiter("(") {
                pending.push(Resume::CloseParen);
                continue;
            }
            let mut outcome = if self.number() || self.match_kind(TokenKind::Identifier) {
                if self.match_kind(TokenKind::ArithOp) {
                    pending.push(Resume::AfterValueOp);
                    continue;
                }
                if self.starts_expression() {
                    Err(self.error("Missing operator between numbers"))
                } else {
                    Ok(())
                }
            } else {
                Err(Failed)
            };

            // Unwind until a frame needs another operand.
            loop {
                match pending.pop() {
                    None => return outcome,
                    Some(Resume::AfterParenOp) => {}
                    Some(Resume::AfterValueOp) => {
                        if outcome.is_err() {
                            outcome = Err(self.error("Expected valid expression after operator"));
                        }
                    }
                    Some(Resume::CloseParen) => {
                        if outcome.is_err() {
                            continue;
                        }
                        if self.delimiter(")") {
                            if self.match_kind(TokenKind::ArithOp) {
                                pending.push(Resume::AfterParenOp);
                                break;
                            }
                        } else {
                            outcome = Err(self.error("Missing closing parenthesis"));
                        }
                    }
                }
            }
        }
    }

    fn starts_expression(&self) -> bool {
        self.current().is_some_and(|t| {
            t.kind.is_number() || t.kind == TokenKind::Identifier || t.is(TokenKind::Delimiter, "(")
        })
    }
}
