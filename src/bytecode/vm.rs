//! Stack-based virtual machine for executing bytecode.

use crate::bytecode::chunk::Chunk;
use crate::bytecode::compiler::compile;
use crate::bytecode::disassembler::{disassemble_instruction, print_disassembly};
use crate::bytecode::instruction::OpCode;
use crate::bytecode::value::Value;
use crate::error::{InterpretError, RuntimeError};

/// Default operand stack capacity.
pub const STACK_MAX: usize = 256;

/// Result type for VM operations.
pub type VmResult<T> = Result<T, RuntimeError>;

/// Where the VM is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmState {
    Ready,
    Running,
    HaltedOk,
    HaltedCompileError,
    HaltedRuntimeError,
}

/// Tunables for a VM instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Operand stack capacity; pushing past it is a stack overflow.
    pub stack_max: usize,
    /// Dump the stack and each instruction to stderr before dispatch.
    pub trace_execution: bool,
    /// Print the chunk listing after a successful compile.
    pub print_code: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_max: STACK_MAX,
            trace_execution: false,
            print_code: false,
        }
    }
}

/// The bytecode virtual machine.
#[derive(Debug)]
pub struct Vm {
    state: VmState,
    ip: usize,
    stack: Vec<Value>,
    config: VmConfig,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            state: VmState::Ready,
            ip: 0,
            stack: Vec::with_capacity(config.stack_max),
            config,
        }
    }

    pub fn state(&self) -> VmState {
        self.state
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut VmConfig {
        &mut self.config
    }

    /// Compile and run source text.
    pub fn interpret(&mut self, source: &str) -> Result<Value, InterpretError> {
        let chunk = match compile(source) {
            Ok(chunk) => chunk,
            Err(err) => {
                self.state = VmState::HaltedCompileError;
                return Err(err.into());
            }
        };

        if self.config.print_code {
            print_disassembly(&chunk, "code");
        }

        Ok(self.interpret_chunk(&chunk)?)
    }

    /// Run a compiled chunk.
    pub fn interpret_chunk(&mut self, chunk: &Chunk) -> VmResult<Value> {
        self.reset_stack();
        self.ip = 0;
        self.state = VmState::Running;

        match self.run(chunk) {
            Ok(value) => {
                self.state = VmState::HaltedOk;
                Ok(value)
            }
            Err(err) => {
                self.reset_stack();
                self.state = VmState::HaltedRuntimeError;
                Err(err)
            }
        }
    }

    /// Main execution loop.
    fn run(&mut self, chunk: &Chunk) -> VmResult<Value> {
        loop {
            if self.config.trace_execution {
                self.trace(chunk);
            }

            let byte = self.read_byte(chunk)?;
            let opcode = OpCode::from_u8(byte).ok_or_else(|| RuntimeError::InvalidOpcode {
                byte,
                line: self.current_line(chunk),
            })?;

            match opcode {
                OpCode::Constant => {
                    let index = self.read_byte(chunk)? as usize;
                    let value = chunk.constant(index).ok_or_else(|| {
                        RuntimeError::InvalidConstant {
                            index,
                            line: self.current_line(chunk),
                        }
                    })?;
                    self.push(chunk, value)?;
                }

                OpCode::Nil => self.push(chunk, Value::Nil)?,
                OpCode::True => self.push(chunk, Value::Bool(true))?,
                OpCode::False => self.push(chunk, Value::Bool(false))?,

                OpCode::Equal => {
                    let b = self.pop(chunk)?;
                    let a = self.pop(chunk)?;
                    self.push(chunk, Value::Bool(a == b))?;
                }

                OpCode::Greater => self.binary_op(chunk, |a, b| Value::Bool(a > b))?,
                OpCode::Less => self.binary_op(chunk, |a, b| Value::Bool(a < b))?,
                OpCode::Add => self.binary_op(chunk, |a, b| Value::Number(a + b))?,
                OpCode::Subtract => self.binary_op(chunk, |a, b| Value::Number(a - b))?,
                OpCode::Multiply => self.binary_op(chunk, |a, b| Value::Number(a * b))?,
                OpCode::Divide => self.binary_op(chunk, |a, b| Value::Number(a / b))?,

                OpCode::Not => {
                    let value = self.pop(chunk)?;
                    self.push(chunk, Value::Bool(value.is_falsey()))?;
                }

                OpCode::Negate => {
                    let Some(n) = self.peek(chunk, 0)?.as_number() else {
                        return Err(RuntimeError::type_error(
                            "Operand must be a number.",
                            self.current_line(chunk),
                        ));
                    };
                    self.pop(chunk)?;
                    self.push(chunk, Value::Number(-n))?;
                }

                OpCode::Return => {
                    let result = self.pop(chunk)?;
                    self.reset_stack();
                    return Ok(result);
                }
            }
        }
    }

    fn read_byte(&mut self, chunk: &Chunk) -> VmResult<u8> {
        let byte = *chunk
            .code()
            .get(self.ip)
            .ok_or(RuntimeError::UnexpectedEnd)?;
        self.ip += 1;
        Ok(byte)
    }

    /// Line of the instruction currently executing.
    fn current_line(&self, chunk: &Chunk) -> usize {
        chunk.get_line(self.ip.saturating_sub(1)).unwrap_or(0)
    }

    fn reset_stack(&mut self) {
        self.stack.clear();
    }

    fn push(&mut self, chunk: &Chunk, value: Value) -> VmResult<()> {
        if self.stack.len() >= self.config.stack_max {
            return Err(RuntimeError::StackOverflow {
                line: self.current_line(chunk),
            });
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self, chunk: &Chunk) -> VmResult<Value> {
        self.stack.pop().ok_or_else(|| RuntimeError::StackUnderflow {
            line: self.current_line(chunk),
        })
    }

    fn peek(&self, chunk: &Chunk, distance: usize) -> VmResult<Value> {
        self.stack
            .len()
            .checked_sub(1 + distance)
            .and_then(|index| self.stack.get(index).copied())
            .ok_or_else(|| RuntimeError::StackUnderflow {
                line: self.current_line(chunk),
            })
    }

    /// Pop two numbers and push `op(a, b)`. Operands stay in place on a type error.
    fn binary_op<F>(&mut self, chunk: &Chunk, op: F) -> VmResult<()>
    where
        F: FnOnce(f64, f64) -> Value,
    {
        let (Some(b), Some(a)) = (
            self.peek(chunk, 0)?.as_number(),
            self.peek(chunk, 1)?.as_number(),
        ) else {
            return Err(RuntimeError::type_error(
                "Operands must be numbers.",
                self.current_line(chunk),
            ));
        };
        self.pop(chunk)?;
        self.pop(chunk)?;
        self.push(chunk, op(a, b))
    }

    fn trace(&self, chunk: &Chunk) {
        let mut line = String::from("          ");
        for value in &self.stack {
            line.push_str(&format!("[ {} ]", value));
        }
        eprintln!("{}", line);

        let mut instruction = String::new();
        disassemble_instruction(chunk, self.ip, &mut instruction);
        eprint!("{}", instruction);
    }
}
