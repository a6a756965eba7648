//! End-to-end tests: source through compiler and VM.

#[cfg(test)]
mod tests {
    use crate::bytecode::{
        compile, disassemble_instruction, Chunk, OpCode, Value, Vm, VmConfig, VmState,
    };
    use crate::error::{InterpretError, RuntimeError};
    use pretty_assertions::assert_eq;

    fn eval(source: &str) -> Value {
        Vm::new().interpret(source).unwrap()
    }

    fn runtime_error(source: &str) -> RuntimeError {
        match Vm::new().interpret(source) {
            Err(InterpretError::Runtime(err)) => err,
            other => panic!("Expected runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("nil"), Value::Nil);
        assert_eq!(eval("true"), Value::Bool(true));
        assert_eq!(eval("false"), Value::Bool(false));
        assert_eq!(eval("42"), Value::Number(42.0));
        assert_eq!(eval("3.25"), Value::Number(3.25));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3"), Value::Number(7.0));
        assert_eq!(eval("(1 + 2) * 3"), Value::Number(9.0));
        assert_eq!(eval("-2 * 3"), Value::Number(-6.0));
        assert_eq!(eval("1 + 2 < 4"), Value::Bool(true));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(eval("8 - 3 - 2"), Value::Number(3.0));
        assert_eq!(eval("16 / 4 / 2"), Value::Number(2.0));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("1 >= 2"), Value::Bool(false));
        assert_eq!(eval("2 >= 2"), Value::Bool(true));
        assert_eq!(eval("1 <= 2"), Value::Bool(true));
        assert_eq!(eval("3 <= 2"), Value::Bool(false));
        assert_eq!(eval("1 > 2"), Value::Bool(false));
        assert_eq!(eval("1 < 2"), Value::Bool(true));
        assert_eq!(eval("1 != 2"), Value::Bool(true));
    }

    #[test]
    fn test_equality_is_kind_sensitive() {
        assert_eq!(eval("nil == false"), Value::Bool(false));
        assert_eq!(eval("nil == nil"), Value::Bool(true));
        assert_eq!(eval("0 == false"), Value::Bool(false));
        assert_eq!(eval("true == true"), Value::Bool(true));
        assert_eq!(eval("1 == 1.0"), Value::Bool(true));
    }

    #[test]
    fn test_not_and_truthiness() {
        assert_eq!(eval("!nil"), Value::Bool(true));
        assert_eq!(eval("!0"), Value::Bool(false));
        assert_eq!(eval("!!true"), Value::Bool(true));
    }

    #[test]
    fn test_nested_expression() {
        assert_eq!(eval("!(5 - 4 > 3 * 2 == !nil)"), Value::Bool(true));
    }

    #[test]
    fn test_division_by_zero_follows_ieee() {
        assert_eq!(eval("1 / 0"), Value::Number(f64::INFINITY));
        assert_eq!(eval("-1 / 0"), Value::Number(f64::NEG_INFINITY));
        assert_eq!(eval("(0 / 0) == (0 / 0)"), Value::Bool(false));
    }

    #[test]
    fn test_constant_overflow() {
        let source = (0..257)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        let err = Vm::new().interpret(&source).unwrap_err();
        assert_eq!(err.exit_code(), 65);
        assert!(err.to_string().contains("Too many constants in one chunk."));
    }

    #[test]
    fn test_type_errors_report_line_and_clear_stack() {
        let err = runtime_error("-nil");
        assert_eq!(err, RuntimeError::type_error("Operand must be a number.", 1));

        let err = runtime_error("1 +\n\ntrue");
        assert_eq!(err.to_string(), "Operands must be numbers.\n[line 3] in script");

        let err = runtime_error("nil < 1");
        assert_eq!(err.line(), Some(1));

        let mut vm = Vm::new();
        assert!(vm.interpret("1 + (2 * -false)").is_err());
        assert_eq!(vm.state(), VmState::HaltedRuntimeError);
        assert!(vm.stack().is_empty());
    }

    #[test]
    fn test_hand_built_negate_nil() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Nil, 7);
        chunk.write_op(OpCode::Negate, 8);
        chunk.write_op(OpCode::Return, 8);

        let mut vm = Vm::new();
        let err = vm.interpret_chunk(&chunk).unwrap_err();
        assert_eq!(err.line(), Some(8));
        assert!(vm.stack().is_empty());
    }

    #[test]
    fn test_deep_nesting_overflows_stack() {
        let depth = 300;
        let source = format!("{}true{}", "true == (".repeat(depth), ")".repeat(depth));

        let err = runtime_error(&source);
        assert_eq!(err, RuntimeError::StackOverflow { line: 1 });

        let mut vm = Vm::with_config(VmConfig {
            stack_max: 512,
            ..VmConfig::default()
        });
        assert_eq!(vm.interpret(&source).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_line_round_trip() {
        let chunk = compile("1 +\n2 *\n\n(3 -\n4)").unwrap();

        let mut offset = 0;
        let mut scratch = String::new();
        let mut seen = Vec::new();
        while offset < chunk.len() {
            seen.push((chunk.code()[offset], chunk.get_line(offset)));
            offset = disassemble_instruction(&chunk, offset, &mut scratch);
        }

        let c = OpCode::Constant as u8;
        assert_eq!(
            seen,
            vec![
                (c, Some(1)),
                (c, Some(2)),
                (c, Some(4)),
                (c, Some(5)),
                (OpCode::Subtract as u8, Some(5)),
                (OpCode::Multiply as u8, Some(5)),
                (OpCode::Add as u8, Some(5)),
                (OpCode::Return as u8, Some(5)),
            ]
        );
        assert_eq!(offset, chunk.len());
        assert_eq!(Vm::new().interpret_chunk(&chunk).unwrap(), Value::Number(-1.0));
    }
}
