//! Single-pass compiler: a Pratt parser that emits bytecode as it parses.

use crate::bytecode::chunk::{Chunk, MAX_CONSTANT_INDEX};
use crate::bytecode::instruction::OpCode;
use crate::bytecode::value::Value;
use crate::error::CompileError;
use crate::lexer::TokenKind;
use crate::parser::{get_rule, ParseFn, Parser, Precedence};

/// Deepest chain of nested `parse_precedence` calls accepted before the
/// expression is rejected.
const MAX_NESTING_DEPTH: usize = 1024;

/// Compile source text into a chunk.
///
/// Returns every diagnostic raised during the pass if any were.
pub fn compile(source: &str) -> Result<Chunk, CompileError> {
    Compiler::new(source).compile()
}

/// The compiler state: a parser driving the scanner plus the chunk being filled.
pub struct Compiler<'src> {
    parser: Parser<'src>,
    chunk: Chunk,
    depth: usize,
}

impl<'src> Compiler<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            parser: Parser::new(source),
            chunk: Chunk::new(),
            depth: 0,
        }
    }

    /// Parse one top-level expression, require end of input and emit RETURN.
    pub fn compile(mut self) -> Result<Chunk, CompileError> {
        self.parser.advance();
        self.expression();
        if self.parser.panic_mode() {
            self.parser.synchronize();
        }
        self.parser
            .consume(TokenKind::Eof, "Expect end of expression.");
        self.emit_op(OpCode::Return);

        if self.parser.had_error() {
            Err(CompileError::new(self.parser.into_diagnostics()))
        } else {
            Ok(self.chunk)
        }
    }

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn parse_precedence(&mut self, precedence: Precedence) {
        if self.depth == MAX_NESTING_DEPTH {
            self.parser.error_at_current("Expression nests too deeply.");
            return;
        }

        self.depth += 1;
        self.parse_operand_and_operators(precedence);
        self.depth -= 1;
    }

    fn parse_operand_and_operators(&mut self, precedence: Precedence) {
        self.parser.advance();
        let Some(prefix) = get_rule(self.parser.previous.kind).prefix else {
            self.parser.error("Expect expression.");
            return;
        };
        self.apply(prefix);

        while precedence <= get_rule(self.parser.current.kind).precedence {
            self.parser.advance();
            if let Some(infix) = get_rule(self.parser.previous.kind).infix {
                self.apply(infix);
            }
        }
    }

    fn apply(&mut self, action: ParseFn) {
        match action {
            ParseFn::Grouping => self.grouping(),
            ParseFn::Unary => self.unary(),
            ParseFn::Binary => self.binary(),
            ParseFn::Literal => self.literal(),
            ParseFn::Number => self.number(),
        }
    }

    // ===== Parse actions =====

    fn grouping(&mut self) {
        self.expression();
        self.parser
            .consume(TokenKind::RightParen, "Expect ')' after expression.");
    }

    fn unary(&mut self) {
        let operator = self.parser.previous.kind;

        self.parse_precedence(Precedence::Unary);

        match operator {
            TokenKind::Minus => self.emit_op(OpCode::Negate),
            TokenKind::Bang => self.emit_op(OpCode::Not),
            _ => {}
        }
    }

    fn binary(&mut self) {
        let operator = self.parser.previous.kind;
        let rule = get_rule(operator);
        self.parse_precedence(rule.precedence.next());

        match operator {
            TokenKind::BangEqual => self.emit_ops(OpCode::Equal, OpCode::Not),
            TokenKind::EqualEqual => self.emit_op(OpCode::Equal),
            TokenKind::Greater => self.emit_op(OpCode::Greater),
            TokenKind::GreaterEqual => self.emit_ops(OpCode::Less, OpCode::Not),
            TokenKind::Less => self.emit_op(OpCode::Less),
            TokenKind::LessEqual => self.emit_ops(OpCode::Greater, OpCode::Not),
            TokenKind::Plus => self.emit_op(OpCode::Add),
            TokenKind::Minus => self.emit_op(OpCode::Subtract),
            TokenKind::Star => self.emit_op(OpCode::Multiply),
            TokenKind::Slash => self.emit_op(OpCode::Divide),
            _ => {}
        }
    }

    fn literal(&mut self) {
        match self.parser.previous.kind {
            TokenKind::False => self.emit_op(OpCode::False),
            TokenKind::Nil => self.emit_op(OpCode::Nil),
            TokenKind::True => self.emit_op(OpCode::True),
            _ => {}
        }
    }

    fn number(&mut self) {
        match self.parser.previous.lexeme.parse::<f64>() {
            Ok(n) => self.emit_constant(Value::Number(n)),
            Err(_) => self.parser.error("Invalid number literal."),
        }
    }

    // ===== Emission =====

    fn emit_byte(&mut self, byte: u8) {
        self.chunk.write(byte, self.parser.previous.line);
    }

    fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op.into());
    }

    fn emit_ops(&mut self, first: OpCode, second: OpCode) {
        self.emit_op(first);
        self.emit_op(second);
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_op(OpCode::Constant);
        self.emit_byte(index);
    }

    fn make_constant(&mut self, value: Value) -> u8 {
        let index = self.chunk.add_constant(value);
        if index > MAX_CONSTANT_INDEX {
            self.parser.error("Too many constants in one chunk.");
            return 0;
        }
        index as u8
    }
}
