use crate::lexer::{Scanner, TokenKind};
use colored::Colorize;

#[derive(Clone, Default)]
pub struct SyntaxHighlighter;

impl SyntaxHighlighter {
    pub fn new() -> Self {
        Self
    }

    pub fn highlight(&self, source: &str) -> String {
        let mut scanner = Scanner::new(source);
        let mut result = String::new();
        let mut last_end = 0;

        loop {
            let token = scanner.scan_token();
            if token.kind == TokenKind::Eof {
                break;
            }

            let span = scanner.token_span();
            result.push_str(&source[last_end..span.start]);
            result.push_str(&self.colorize(token.kind, &source[span.clone()]));
            last_end = span.end;
        }

        result.push_str(&source[last_end..]);
        result
    }

    fn colorize(&self, kind: TokenKind, text: &str) -> String {
        use TokenKind::*;

        match kind {
            Number => text.bright_blue().to_string(),
            String => text.bright_green().to_string(),
            True | False => text.bright_magenta().to_string(),
            Nil => text.cyan().to_string(),

            And | Class | Else | For | Fun | If | Or | Print | Return | Super | This | Var
            | While => text.bright_yellow().bold().to_string(),

            Plus | Minus | Star | Slash | Equal | EqualEqual | BangEqual | Less | LessEqual
            | Greater | GreaterEqual | Bang => text.red().to_string(),

            LeftParen | RightParen | LeftBrace | RightBrace | Comma | Dot | Semicolon => {
                text.white().bold().to_string()
            }

            Identifier => text.white().to_string(),
            Error => text.red().underline().to_string(),
            Eof => text.to_string(),
        }
    }
}
