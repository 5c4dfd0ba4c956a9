mod expr;

use std::fmt::Display;

pub use expr::{Expr, LiteralValue};

use cursor::Line;
use errors::{LoxError, Reporter};
use scanner::{Token, TokenData, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserErrorType {
    MissingRightParen,
    ExpectedExpression,
    ExpectedEndOfExpression,
    TooDeeplyNested,
}

impl Display for ParserErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ParserErrorType::MissingRightParen => "Expected ')' after expression.",
                ParserErrorType::ExpectedExpression => "Expected expression.",
                ParserErrorType::ExpectedEndOfExpression => "Expected end of expression.",
                ParserErrorType::TooDeeplyNested => "Expression is nested too deeply.",
            }
        )
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub struct ParseError<'a> {
    pub error: ParserErrorType,
    /// The token the parser choked on.
    pub token: Token<'a>,
}

impl<'a> ParseError<'a> {
    fn new(error: ParserErrorType, token: Token<'a>) -> Self {
        Self { error, token }
    }
}

impl<'a> From<&ParseError<'a>> for LoxError {
    fn from(error: &ParseError<'a>) -> Self {
        LoxError::new(error.token.line, error.token.location(), error.error)
    }
}

impl Display for ParseError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", LoxError::from(self))
    }
}

pub type Result<'a, T> = std::result::Result<T, ParseError<'a>>;

/// Parses a whole token stream into a single expression, reporting a failure.
pub fn parse<'a>(tokens: Vec<Token<'a>>, reporter: &mut dyn Reporter) -> Result<'a, Expr<'a>> {
    Parser::new(tokens).parse(reporter)
}

/// How many groupings and unary operators may enclose each other.
pub const MAX_NESTING: usize = 100;
/// Height of the deepest tree the parser builds, evaluating and dropping it recurse this deep.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    nesting: usize,
    /// Height of the expression the last grammar rule returned.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let line = tokens.last().map_or(Line(1), |t| t.line);
            tokens.push(Token::eof(line));
        }
        Self { tokens, current: 0, nesting: 0, depth: 0 }
    }

    /// Parses the remaining tokens as exactly one expression.
    ///
    /// There is no recovery: the first error aborts the whole parse, is handed to `reporter`,
    /// and no partial tree is returned.
    pub fn parse(&mut self, reporter: &mut dyn Reporter) -> Result<'a, Expr<'a>> {
        let result = self.expression().and_then(|expr| {
            if self.is_at_end() {
                Ok(expr)
            } else {
                Err(ParseError::new(ParserErrorType::ExpectedEndOfExpression, self.peek().clone()))
            }
        });

        match &result {
            Ok(expr) => log::debug!("Parsed {expr}"),
            Err(e) => reporter.error(e.into()),
        }

        result
    }

    pub fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.comparison()?;

        while let Some(operator) = self.match_any(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let left_depth = self.depth;
            let right = self.comparison()?;
            expr = self.binary(expr, left_depth, operator, right)?;
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.addition()?;

        while let Some(operator) = self.match_any(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let left_depth = self.depth;
            let right = self.addition()?;
            expr = self.binary(expr, left_depth, operator, right)?;
        }
        Ok(expr)
    }

    fn addition(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.multiplication()?;

        while let Some(operator) = self.match_any(&[TokenKind::Plus, TokenKind::Minus]) {
            let left_depth = self.depth;
            let right = self.multiplication()?;
            expr = self.binary(expr, left_depth, operator, right)?;
        }
        Ok(expr)
    }

    fn multiplication(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.unary()?;

        while let Some(operator) = self.match_any(&[TokenKind::Star, TokenKind::Slash]) {
            let left_depth = self.depth;
            let right = self.unary()?;
            expr = self.binary(expr, left_depth, operator, right)?;
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Some(operator) = self.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
            let right = self.nested(&operator, Self::unary)?;
            self.deepen(&operator)?;
            return Ok(Expr::Unary { operator, right: Box::new(right) });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let data = self.peek().data.clone();
        let value = match data {
            TokenData::False => LiteralValue::Boolean(false),
            TokenData::True => LiteralValue::Boolean(true),
            TokenData::Nil => LiteralValue::Nil,
            TokenData::Number(n) => LiteralValue::Number(n),
            TokenData::Str(s) => LiteralValue::Str(s),
            TokenData::LeftParen => {
                let paren = self.advance();
                let expr = self.nested(&paren, Self::expression)?;
                self.consume_or_error(TokenKind::RightParen, ParserErrorType::MissingRightParen)?;
                self.deepen(&paren)?;
                return Ok(Expr::Grouping(Box::new(expr)));
            }
            _ => {
                return Err(ParseError::new(
                    ParserErrorType::ExpectedExpression,
                    self.peek().clone(),
                ))
            }
        };

        self.advance();
        self.depth = 1;
        Ok(Expr::Literal(value))
    }

    fn binary(
        &mut self,
        left: Expr<'a>,
        left_depth: usize,
        operator: Token<'a>,
        right: Expr<'a>,
    ) -> Result<'a, Expr<'a>> {
        self.depth = self.depth.max(left_depth);
        self.deepen(&operator)?;
        Ok(Expr::Binary { left: Box::new(left), operator, right: Box::new(right) })
    }

    /// Accounts for a node on top of the expression the last rule returned.
    fn deepen(&mut self, token: &Token<'a>) -> Result<'a, ()> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new(ParserErrorType::TooDeeplyNested, token.clone()));
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs `rule` for the operand of `token`, failing once `MAX_NESTING` operands are open.
    fn nested<T>(
        &mut self,
        token: &Token<'a>,
        rule: impl FnOnce(&mut Self) -> Result<'a, T>,
    ) -> Result<'a, T> {
        if self.nesting >= MAX_NESTING {
            return Err(ParseError::new(ParserErrorType::TooDeeplyNested, token.clone()));
        }
        self.nesting += 1;
        let result = rule(self);
        self.nesting -= 1;
        result
    }

    /// Discards tokens until the start of what is probably the next statement: just past a
    /// `;`, or right before a keyword that begins a declaration or statement.
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind() == TokenKind::Semicolon {
                return;
            }

            use TokenKind::*;
            match self.peek().kind() {
                Class | Fun | Var | For | If | While | Print | Return => return,
                _ => {}
            }

            self.advance();
        }
    }
}

// Helpers
impl<'a> Parser<'a> {
    pub fn peek(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token<'a> {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Returns the current token and moves past it, unless it is `Eof`.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token<'a>> {
        kinds.contains(&self.peek().kind()).then(|| self.advance())
    }

    fn consume_or_error(
        &mut self,
        kind: TokenKind,
        error_type: ParserErrorType,
    ) -> Result<'a, Token<'a>> {
        match self.match_any(&[kind]) {
            Some(token) => Ok(token),
            None => Err(ParseError::new(error_type, self.peek().clone())),
        }
    }
}
