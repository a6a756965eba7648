//! Bytecode chunk containing instructions, constants and line information.

use crate::bytecode::instruction::OpCode;
use crate::bytecode::value::Value;
use crate::memory::{free_tracked, push_tracked, AllocationCounter};

/// Largest constant index addressable by a one-byte operand.
pub const MAX_CONSTANT_INDEX: usize = u8::MAX as usize;

/// A run of consecutive code bytes emitted for the same source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRun {
    pub line: usize,
    pub run: usize,
}

/// A chunk of bytecode: the compiled unit handed from compiler to VM.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    code: Vec<u8>,
    constants: Vec<Value>,
    lines: Vec<LineRun>,
    allocations: AllocationCounter,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one byte, tagged with its source line.
    pub fn write(&mut self, byte: u8, line: usize) {
        push_tracked(&mut self.code, byte, &mut self.allocations);

        match self.lines.last_mut() {
            Some(last) if last.line == line => last.run += 1,
            _ => push_tracked(&mut self.lines, LineRun { line, run: 1 }, &mut self.allocations),
        }
    }

    /// Append an opcode byte.
    pub fn write_op(&mut self, op: OpCode, line: usize) {
        self.write(op.into(), line);
    }

    /// Add a constant to the pool and return its index.
    ///
    /// The caller is responsible for checking the index against
    /// [`MAX_CONSTANT_INDEX`] before emitting it as an operand.
    pub fn add_constant(&mut self, value: Value) -> usize {
        push_tracked(&mut self.constants, value, &mut self.allocations);
        self.constants.len() - 1
    }

    pub fn constant(&self, index: usize) -> Option<Value> {
        self.constants.get(index).copied()
    }

    /// Get the source line of the byte at `offset`.
    pub fn get_line(&self, offset: usize) -> Option<usize> {
        let mut end = 0;
        for run in &self.lines {
            end += run.run;
            if offset < end {
                return Some(run.line);
            }
        }
        None
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    pub fn lines(&self) -> &[LineRun] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Bytes currently held by this chunk's buffers.
    pub fn bytes_allocated(&self) -> usize {
        self.allocations.bytes_allocated()
    }

    /// Release all buffers, leaving an empty chunk.
    pub fn free(&mut self) {
        free_tracked(&mut self.code, &mut self.allocations);
        free_tracked(&mut self.constants, &mut self.allocations);
        free_tracked(&mut self.lines, &mut self.allocations);
    }
}
