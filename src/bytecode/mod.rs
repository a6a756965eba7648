//! Bytecode module for the bytelox VM.
//!
//! Source text is compiled in a single pass straight into a [`Chunk`] and
//! executed by the stack-based [`Vm`]; no syntax tree is built.
//!
//! # Architecture
//!
//! - `instruction`: OpCode definitions for the bytecode instruction set
//! - `value`: Run-time values
//! - `chunk`: Bytecode chunks containing instructions, constants and lines
//! - `compiler`: Pratt parser that emits bytecode as it parses
//! - `vm`: Stack-based virtual machine for executing bytecode
//! - `disassembler`: Debug output for bytecode inspection

pub mod chunk;
pub mod compiler;
pub mod disassembler;
pub mod instruction;
pub mod value;
pub mod vm;

mod tests;

pub use chunk::{Chunk, LineRun, MAX_CONSTANT_INDEX};
pub use compiler::{compile, Compiler};
pub use disassembler::{disassemble_chunk, disassemble_instruction, print_disassembly};
pub use instruction::OpCode;
pub use value::Value;
pub use vm::{Vm, VmConfig, VmState, STACK_MAX};
