//! bytelox CLI: run a script, evaluate code, or start the REPL.

use std::env;
use std::process;

use colored::Colorize;

use bytelox::bytecode::{Vm, VmConfig};
use bytelox::error::InterpretError;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI command to execute.
enum Command {
    /// Run a script file
    Run { file: String },
    /// Evaluate a string
    Eval { code: String },
    /// Start the REPL
    Repl,
}

/// CLI options parsed from arguments.
struct Options {
    command: Command,
    config: VmConfig,
}

fn print_usage() {
    eprintln!("bytelox {} - bytecode expression VM", VERSION);
    eprintln!();
    eprintln!("Usage: bytelox [options] [script]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e <code>        Evaluate code and print the result");
    eprintln!("  --disassemble    Print the compiled chunk before running");
    eprintln!("  --trace          Trace the stack and each instruction to stderr");
    eprintln!("  --stack-max N    Operand stack capacity (default: 256)");
    eprintln!("  --help, -h       Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  bytelox                         Start interactive REPL");
    eprintln!("  bytelox expr.lox                Run a script file");
    eprintln!("  bytelox -e '1 + 2 * 3'          Evaluate code directly");
    eprintln!("  bytelox --disassemble -e '!nil' Show the bytecode, then run it");
}

fn usage_error(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(64);
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut options = Options {
        command: Command::Repl,
        config: VmConfig::default(),
    };

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "-e" => {
                i += 1;
                if i >= args.len() {
                    usage_error("-e requires a code argument");
                }
                options.command = Command::Eval {
                    code: args[i].clone(),
                };
            }
            "--disassemble" => options.config.print_code = true,
            "--trace" => options.config.trace_execution = true,
            "--stack-max" => {
                i += 1;
                if i >= args.len() {
                    usage_error("--stack-max requires a number");
                }
                options.config.stack_max = match args[i].parse() {
                    Ok(n) if n > 0 => n,
                    _ => usage_error(&format!("Invalid stack size: {}", args[i])),
                };
            }
            _ if arg.starts_with('-') => {
                usage_error(&format!("Unknown option: {}", arg));
            }
            _ => {
                if let Command::Run { .. } = options.command {
                    usage_error("Only one script file can be specified");
                }
                options.command = Command::Run { file: arg.clone() };
            }
        }
        i += 1;
    }

    options
}

fn main() {
    let options = parse_args();

    match &options.command {
        Command::Repl => bytelox::repl::run_repl(options.config),
        Command::Run { file } => run_file(file, options.config),
        Command::Eval { code } => run_source(code, options.config),
    }
}

fn run_file(path: &str, config: VmConfig) {
    match std::fs::read_to_string(path) {
        Ok(source) => run_source(&source, config),
        Err(e) => exit_with(InterpretError::Io(e), Some(path)),
    }
}

fn run_source(source: &str, config: VmConfig) {
    let mut vm = Vm::with_config(config);
    match vm.interpret(source) {
        Ok(value) => println!("{}", value),
        Err(e) => exit_with(e, None),
    }
}

fn exit_with(error: InterpretError, path: Option<&str>) -> ! {
    match (&error, path) {
        (InterpretError::Io(e), Some(path)) => {
            eprintln!("{}", format!("Could not read file '{}': {}", path, e).red())
        }
        _ => eprintln!("{}", error.to_string().red()),
    }
    process::exit(error.exit_code());
}
