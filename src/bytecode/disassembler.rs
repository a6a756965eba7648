//! Bytecode disassembler for debugging.

use crate::bytecode::chunk::Chunk;
use crate::bytecode::instruction::OpCode;
use std::fmt::Write;

/// Disassemble a chunk into human-readable output under a `== name ==` header.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "== {} ==", name);

    let mut offset = 0;
    while offset < chunk.len() {
        offset = disassemble_instruction(chunk, offset, &mut output);
    }

    output
}

/// Disassemble a single instruction and return the offset of the next one.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, output: &mut String) -> usize {
    let _ = write!(output, "{:04} ", offset);

    // Line number, or | if same as the previous byte
    let line = chunk.get_line(offset);
    if offset > 0 && line == chunk.get_line(offset - 1) {
        output.push_str("   | ");
    } else {
        let _ = write!(output, "{:4} ", line.unwrap_or(0));
    }

    let Some(&byte) = chunk.code().get(offset) else {
        let _ = writeln!(output, "<end of chunk>");
        return offset + 1;
    };
    let Some(opcode) = OpCode::from_u8(byte) else {
        let _ = writeln!(output, "Unknown opcode {}", byte);
        return offset + 1;
    };

    match opcode {
        OpCode::Constant => constant_instruction(chunk, opcode, offset, output),
        OpCode::Nil
        | OpCode::True
        | OpCode::False
        | OpCode::Equal
        | OpCode::Greater
        | OpCode::Less
        | OpCode::Negate
        | OpCode::Add
        | OpCode::Subtract
        | OpCode::Multiply
        | OpCode::Divide
        | OpCode::Not
        | OpCode::Return => {
            let _ = writeln!(output, "{}", opcode);
            offset + 1
        }
    }
}

fn constant_instruction(chunk: &Chunk, opcode: OpCode, offset: usize, output: &mut String) -> usize {
    let Some(&index) = chunk.code().get(offset + 1) else {
        let _ = writeln!(output, "{:<16} <missing operand>", opcode);
        return offset + 1;
    };
    match chunk.constant(index as usize) {
        Some(value) => {
            let _ = writeln!(output, "{:<16} {:4} '{}'", opcode, index, value);
        }
        None => {
            let _ = writeln!(output, "{:<16} {:4} <invalid>", opcode, index);
        }
    }
    offset + 1 + opcode.operand_size()
}

/// Print disassembly to stdout.
pub fn print_disassembly(chunk: &Chunk, name: &str) {
    print!("{}", disassemble_chunk(chunk, name));
}
