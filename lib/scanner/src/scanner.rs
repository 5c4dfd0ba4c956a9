use cursor::Cursor;
use errors::{Location, LoxError, Reporter};

pub mod token;
pub use token::{Token, TokenData, TokenKind};
use token::TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("Unexpected character.")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Invalid number literal '{0}'.")]
    InvalidNumber(String),
}

/// Scans all of `source`, reporting lexical errors along the way.
pub fn scan<'a>(source: &'a str, reporter: &mut dyn Reporter) -> Vec<Token<'a>> {
    Scanner::new(source).scan_tokens(reporter)
}

pub struct Scanner<'a> {
    start: Cursor<'a>,
    cursor: Cursor<'a>,
    tokens: Vec<Token<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { start: Cursor::new(source), cursor: Cursor::new(source), tokens: Vec::new() }
    }

    /// Never fails: an erroneous character or string is reported and skipped, and scanning
    /// goes on with whatever follows. The result always ends with an `Eof` token.
    pub fn scan_tokens(mut self, reporter: &mut dyn Reporter) -> Vec<Token<'a>> {
        loop {
            self.start = self.cursor.clone();
            let Some(c) = self.cursor.next() else { break };

            match self.scan_token(c) {
                Ok(Some(data)) => self.add_token(data),
                Ok(None) => (),
                Err(e) => {
                    log::debug!("Scan error on line {}: {e:?}", self.cursor.line());
                    reporter.error(LoxError::new(self.cursor.line(), Location::Unspecified, e));
                }
            }
        }

        self.tokens.push(Token::eof(self.cursor.line()));
        self.tokens
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.cursor)
    }

    fn add_token(&mut self, data: TokenData<'a>) {
        let token = Token::new(data, self.lexeme(), self.cursor.line());
        log::trace!("{:?}", token);
        self.tokens.push(token);
    }

    /// Scans the rest of the lexeme starting with `c`. `Ok(None)` means nothing to emit.
    fn scan_token(&mut self, c: char) -> Result<Option<TokenData<'a>>, ScanError> {
        let data = match c {
            '(' => LeftParen,
            ')' => RightParen,
            '{' => LeftBrace,
            '}' => RightBrace,
            ',' => Comma,
            '.' => Dot,
            '-' => Minus,
            '+' => Plus,
            ';' => Semicolon,
            '*' => Star,

            '!' => self.either('=', BangEqual, Bang),
            '=' => self.either('=', EqualEqual, Equal),
            '<' => self.either('=', LessEqual, Less),
            '>' => self.either('=', GreaterEqual, Greater),

            '/' => {
                if self.cursor.next_if_eq('/') {
                    // Comment, the newline is left for the main loop
                    self.cursor.advance_while(|c| c != '\n');
                    return Ok(None);
                }
                Slash
            }

            ' ' | '\r' | '\t' | '\n' => return Ok(None),

            '"' => self.string()?,

            d if d.is_ascii_digit() => self.number()?,

            c if is_alpha(c) => self.identifier(),

            c => return Err(ScanError::UnexpectedCharacter(c)),
        };
        Ok(Some(data))
    }

    fn either(
        &mut self,
        expected: char,
        matched: TokenData<'a>,
        otherwise: TokenData<'a>,
    ) -> TokenData<'a> {
        if self.cursor.next_if_eq(expected) {
            matched
        } else {
            otherwise
        }
    }

    fn string(&mut self) -> Result<TokenData<'a>, ScanError> {
        self.cursor.advance_while(|c| c != '"');
        if self.cursor.is_at_end() {
            return Err(ScanError::UnterminatedString);
        }
        self.cursor.next();

        let lexeme = self.lexeme();
        Ok(Str(&lexeme[1..lexeme.len() - 1]))
    }

    fn number(&mut self) -> Result<TokenData<'a>, ScanError> {
        self.cursor.advance_while(|c| c.is_ascii_digit());

        // A trailing '.' is not part of the number
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        let lexeme = self.lexeme();
        lexeme.parse().map(Number).map_err(|_| ScanError::InvalidNumber(lexeme.to_string()))
    }

    fn identifier(&mut self) -> TokenData<'a> {
        self.cursor.advance_while(|c| is_alpha(c) || c.is_ascii_digit());
        token::keyword(self.lexeme()).unwrap_or(Identifier)
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
