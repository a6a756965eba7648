//! Error types for compilation and execution.

use std::fmt;

use thiserror::Error;

/// Where a compile diagnostic points within its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// The offending token was produced by the scanner as an error token.
    None,
    /// The offending token was the end of input.
    End,
    /// The offending token's lexeme.
    Lexeme(String),
}

/// A single compile-time diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, location: Location, message: impl Into<String>) -> Self {
        Self {
            line,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error", self.line)?;
        match &self.location {
            Location::None => {}
            Location::End => write!(f, " at end")?,
            Location::Lexeme(lexeme) => write!(f, " at '{}'", lexeme)?,
        }
        write!(f, ": {}", self.message)
    }
}

/// Compilation failed; carries every diagnostic raised during the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct CompileError {
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

/// Runtime errors raised by the VM dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("{message}\n[line {line}] in script")]
    TypeError { message: String, line: usize },

    #[error("Stack overflow.\n[line {line}] in script")]
    StackOverflow { line: usize },

    #[error("Stack underflow.\n[line {line}] in script")]
    StackUnderflow { line: usize },

    #[error("Invalid opcode {byte}.\n[line {line}] in script")]
    InvalidOpcode { byte: u8, line: usize },

    #[error("Invalid constant index {index}.\n[line {line}] in script")]
    InvalidConstant { index: usize, line: usize },

    #[error("Unexpected end of bytecode.")]
    UnexpectedEnd,
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>, line: usize) -> Self {
        Self::TypeError {
            message: message.into(),
            line,
        }
    }

    /// Source line of the failing instruction, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::TypeError { line, .. } => Some(*line),
            Self::StackOverflow { line } => Some(*line),
            Self::StackUnderflow { line } => Some(*line),
            Self::InvalidOpcode { line, .. } => Some(*line),
            Self::InvalidConstant { line, .. } => Some(*line),
            Self::UnexpectedEnd => None,
        }
    }
}

/// A unified error type for a full source-to-result interpretation.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InterpretError {
    /// Process exit code for this failure (sysexits conventions).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Compile(_) => 65,
            Self::Runtime(_) => 70,
            Self::Io(_) => 74,
        }
    }
}
