//! bytelox: a single-pass bytecode compiler and stack VM for a small
//! dynamically-typed expression language.
//!
//! This is the library root that exports all modules.
//!
//! # Pipeline
//!
//! Source text is scanned on demand, compiled in one pass by a Pratt parser
//! straight into a [`bytecode::Chunk`], and executed by [`bytecode::Vm`].

// Allow some clippy lints that are stylistic and not critical
#![allow(clippy::module_inception)]

pub mod bytecode;
pub mod error;
pub mod lexer;
pub mod memory;
pub mod parser;
pub mod repl;
pub mod repl_highlight;

use bytecode::{Chunk, Value, Vm};
use error::{CompileError, InterpretError, RuntimeError};

/// Compile source code to a bytecode chunk without executing.
pub fn compile(source: &str) -> Result<Chunk, CompileError> {
    bytecode::compile(source)
}

/// Compile and run source code on a fresh VM.
pub fn interpret(source: &str) -> Result<Value, InterpretError> {
    Vm::new().interpret(source)
}

/// Run an already compiled chunk on a fresh VM.
pub fn interpret_chunk(chunk: &Chunk) -> Result<Value, RuntimeError> {
    Vm::new().interpret_chunk(chunk)
}

/// Disassemble compiled bytecode to a string.
pub fn disassemble(chunk: &Chunk) -> String {
    bytecode::disassemble_chunk(chunk, "code")
}
