//! Parser state for the single-pass compiler.
//!
//! The parser owns the scanner and a two-token window over its output. It
//! records diagnostics instead of aborting, so one pass can report several
//! independent errors.

mod precedence;

pub use precedence::{get_rule, ParseFn, ParseRule, Precedence};

use crate::error::{Diagnostic, Location};
use crate::lexer::{Scanner, Token, TokenKind};

pub struct Parser<'src> {
    scanner: Scanner<'src>,
    pub(crate) previous: Token<'src>,
    pub(crate) current: Token<'src>,
    had_error: bool,
    panic_mode: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let start = Token::eof(1);
        Self {
            scanner: Scanner::new(source),
            previous: start,
            current: start,
            had_error: false,
            panic_mode: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn panic_mode(&self) -> bool {
        self.panic_mode
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // ===== Token manipulation =====

    /// Step to the next non-error token, reporting any error tokens on the way.
    pub fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let message = self.current.lexeme;
            self.error_at_current(message);
        }
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub fn match_token(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    pub fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.check(kind) {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    /// Skip tokens until a statement boundary and leave panic mode.
    pub fn synchronize(&mut self) {
        self.panic_mode = false;

        while self.current.kind != TokenKind::Eof {
            if self.previous.kind == TokenKind::Semicolon || self.current.kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    // ===== Diagnostics =====

    pub fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    pub fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;

        let location = match token.kind {
            TokenKind::Eof => Location::End,
            TokenKind::Error => Location::None,
            _ => Location::Lexeme(token.lexeme.to_string()),
        };
        self.diagnostics
            .push(Diagnostic::new(token.line, location, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_skips_error_tokens() {
        let mut parser = Parser::new("@ 1");
        parser.advance();
        assert_eq!(parser.current.kind, TokenKind::Number);
        assert!(parser.had_error());
        assert_eq!(
            parser.diagnostics()[0].to_string(),
            "[line 1] Error: Unexpected character."
        );
    }

    #[test]
    fn test_panic_mode_suppresses_cascades() {
        let mut parser = Parser::new("1");
        parser.advance();
        parser.error_at_current("first");
        parser.error_at_current("second");
        assert_eq!(parser.diagnostics().len(), 1);
        assert!(parser.panic_mode());
    }

    #[test]
    fn test_consume_reports_at_current() {
        let mut parser = Parser::new("1 2");
        parser.advance();
        parser.consume(TokenKind::Number, "unused");
        parser.consume(TokenKind::Eof, "Expect end of expression.");
        assert_eq!(
            parser.diagnostics()[0].to_string(),
            "[line 1] Error at '2': Expect end of expression."
        );
    }

    #[test]
    fn test_consume_at_end() {
        let mut parser = Parser::new("");
        parser.advance();
        parser.consume(TokenKind::RightParen, "Expect ')' after expression.");
        assert_eq!(
            parser.diagnostics()[0].to_string(),
            "[line 1] Error at end: Expect ')' after expression."
        );
    }

    #[test]
    fn test_synchronize_stops_after_semicolon() {
        let mut parser = Parser::new("1 2 ; 3");
        parser.advance();
        parser.error_at_current("boom");
        parser.synchronize();
        assert!(!parser.panic_mode());
        assert_eq!(parser.previous.kind, TokenKind::Semicolon);
        assert_eq!(parser.current.lexeme, "3");
    }

    #[test]
    fn test_synchronize_stops_at_statement_keyword() {
        let mut parser = Parser::new("1 2 print 3");
        parser.advance();
        parser.error_at_current("boom");
        parser.synchronize();
        assert_eq!(parser.current.kind, TokenKind::Print);
        assert!(parser.had_error());
    }

    #[test]
    fn test_synchronize_runs_to_end() {
        let mut parser = Parser::new("1 2 3");
        parser.advance();
        parser.synchronize();
        assert!(parser.check(TokenKind::Eof));
    }
}
