//! Lexer/Scanner for bytelox source code.

use crate::lexer::token::{Token, TokenKind};

/// The lexer produces tokens on demand from a borrowed source buffer.
pub struct Scanner<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: usize,
    finished: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            finished: false,
        }
    }

    /// Scan all tokens from the source, up to and including `Eof`.
    pub fn scan_tokens(&mut self) -> Vec<Token<'src>> {
        self.by_ref().collect()
    }

    /// Scan the next token.
    ///
    /// Once the end of input is reached every further call returns `Eof`.
    pub fn scan_token(&mut self) -> Token<'src> {
        self.skip_whitespace_and_comments();
        self.start = self.current;

        let Some(c) = self.advance() else {
            return Token::eof(self.line);
        };

        match c {
            b'(' => self.make_token(TokenKind::LeftParen),
            b')' => self.make_token(TokenKind::RightParen),
            b'{' => self.make_token(TokenKind::LeftBrace),
            b'}' => self.make_token(TokenKind::RightBrace),
            b',' => self.make_token(TokenKind::Comma),
            b'.' => self.make_token(TokenKind::Dot),
            b'-' => self.make_token(TokenKind::Minus),
            b'+' => self.make_token(TokenKind::Plus),
            b';' => self.make_token(TokenKind::Semicolon),
            b'/' => self.make_token(TokenKind::Slash),
            b'*' => self.make_token(TokenKind::Star),

            b'!' => self.make_token_if(b'=', TokenKind::BangEqual, TokenKind::Bang),
            b'=' => self.make_token_if(b'=', TokenKind::EqualEqual, TokenKind::Equal),
            b'<' => self.make_token_if(b'=', TokenKind::LessEqual, TokenKind::Less),
            b'>' => self.make_token_if(b'=', TokenKind::GreaterEqual, TokenKind::Greater),

            b'"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_alpha(c) => self.scan_identifier(),

            _ => {
                // Swallow the rest of a multi-byte character so later slices stay on
                // char boundaries.
                while !self.source.is_char_boundary(self.current) {
                    self.current += 1;
                }
                Token::error("Unexpected character.", self.line)
            }
        }
    }

    /// Byte range in the source of the most recently scanned token, including
    /// the quotes of a string literal.
    pub fn token_span(&self) -> std::ops::Range<usize> {
        self.start..self.current
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r') => {
                    self.current += 1;
                }
                Some(b'\n') => {
                    self.current += 1;
                    self.line += 1;
                }
                Some(b'/') if self.peek_next() == Some(b'/') => {
                    while self.peek().is_some_and(|c| c != b'\n') {
                        self.current += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_string(&mut self) -> Token<'src> {
        while let Some(c) = self.peek() {
            if c == b'"' {
                break;
            }
            if c == b'\n' {
                self.line += 1;
            }
            self.current += 1;
        }

        if self.is_at_end() {
            return Token::error("Unterminated string.", self.line);
        }

        // The closing quote.
        self.current += 1;
        let lexeme = &self.source[self.start + 1..self.current - 1];
        Token::new(TokenKind::String, lexeme, self.line)
    }

    fn scan_number(&mut self) -> Token<'src> {
        self.consume_digits();

        // A fractional part needs at least one digit after the dot.
        if self.peek() == Some(b'.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.current += 1;
            self.consume_digits();
        }

        self.make_token(TokenKind::Number)
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.current += 1;
        }
    }

    fn scan_identifier(&mut self) -> Token<'src> {
        while self
            .peek()
            .is_some_and(|c| is_alpha(c) || c.is_ascii_digit())
        {
            self.current += 1;
        }

        let text = &self.source[self.start..self.current];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.current += 1;
        Some(c)
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.current).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.source.as_bytes().get(self.current + 1).copied()
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token::new(kind, &self.source[self.start..self.current], self.line)
    }

    fn make_token_if(&mut self, next: u8, matched: TokenKind, otherwise: TokenKind) -> Token<'src> {
        let kind = if self.match_byte(next) { matched } else { otherwise };
        self.make_token(kind)
    }
}

/// Yields every token up to and including the first `Eof`, then stops.
impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.scan_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}
