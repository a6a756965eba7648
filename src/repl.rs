use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;

use crate::bytecode::{Value, Vm, VmConfig};
use crate::error::InterpretError;
use crate::repl_highlight::SyntaxHighlighter;

const HISTORY_FILE: &str = ".bytelox_history";

pub struct Repl {
    vm: Vm,
    history: Vec<String>,
    history_file: PathBuf,
    highlighter: SyntaxHighlighter,
    highlighting_enabled: bool,
}

impl Repl {
    pub fn new(config: VmConfig) -> Self {
        let mut repl = Self::with_history_file(config, Self::get_history_path());
        repl.load_history();
        repl
    }

    pub fn with_history_file(config: VmConfig, history_file: PathBuf) -> Self {
        Self {
            vm: Vm::with_config(config),
            history: Vec::new(),
            history_file,
            highlighter: SyntaxHighlighter::new(),
            highlighting_enabled: true,
        }
    }

    fn get_history_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            home.join(HISTORY_FILE)
        } else {
            PathBuf::from(HISTORY_FILE)
        }
    }

    fn load_history(&mut self) {
        if let Ok(content) = std::fs::read_to_string(&self.history_file) {
            for line in content.lines() {
                if !line.trim().is_empty() {
                    self.history.push(line.to_string());
                }
            }
        }
    }

    fn save_history(&self) {
        if let Some(parent) = self.history_file.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let content = self.history.join("\n");
        let _ = std::fs::write(&self.history_file, content);
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn config(&self) -> &VmConfig {
        self.vm.config()
    }

    pub fn run(&mut self) {
        println!("bytelox {} - REPL", env!("CARGO_PKG_VERSION"));
        println!("Type .help for available commands.\n");

        let stdin = io::stdin();

        loop {
            print!("> ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) => {
                    self.save_history();
                    println!();
                    break;
                }
                Ok(_) => {
                    let line = line.trim_end();
                    if line.trim().is_empty() {
                        continue;
                    }
                    self.history.push(line.to_string());

                    if line.starts_with('.') {
                        if !self.handle_command(line) {
                            self.save_history();
                            break;
                        }
                    } else {
                        self.execute_line(line);
                    }
                }
                Err(e) => {
                    eprintln!("{}", format!("Error reading input: {}", e).red());
                    self.save_history();
                    break;
                }
            }
        }
    }

    /// Handle a dot command. Returns `false` when the REPL should exit.
    pub fn handle_command(&mut self, line: &str) -> bool {
        match line.trim() {
            ".help" => self.cmd_help(),
            ".exit" | ".quit" => return false,
            ".trace" => {
                let config = self.vm.config_mut();
                config.trace_execution = !config.trace_execution;
                println!("Execution tracing {}.", on_off(config.trace_execution));
            }
            ".disasm" => {
                let config = self.vm.config_mut();
                config.print_code = !config.print_code;
                println!("Disassembly {}.", on_off(config.print_code));
            }
            ".highlight" => {
                self.highlighting_enabled = !self.highlighting_enabled;
                println!("Syntax highlighting {}.", on_off(self.highlighting_enabled));
            }
            ".history" => self.cmd_history(),
            other => println!(
                "Unknown command: {}. Type .help for available commands.",
                other
            ),
        }
        true
    }

    fn cmd_help(&self) {
        println!();
        println!("bytelox REPL Commands");
        println!();
        println!(".help          - Show this help message");
        println!(".trace         - Toggle instruction tracing (stderr)");
        println!(".disasm        - Toggle printing the compiled chunk");
        println!(".highlight     - Toggle syntax highlighting of input");
        println!(".history       - Show command history");
        println!(".exit / Ctrl+D - Exit the REPL");
        println!();
    }

    fn cmd_history(&self) {
        println!("History:");
        for (i, entry) in self.history.iter().enumerate() {
            println!("{:4}  {}", i + 1, entry);
        }
    }

    fn execute_line(&mut self, line: &str) {
        if self.highlighting_enabled {
            println!("{}", self.highlighter.highlight(line));
        }
        match self.execute(line) {
            Ok(value) => println!("{}", value),
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }

    /// Compile and run one line on a fresh interpretation.
    pub fn execute(&mut self, source: &str) -> Result<Value, InterpretError> {
        self.vm.interpret(source)
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

pub fn run_repl(config: VmConfig) {
    let mut repl = Repl::new(config);
    repl.run();
}
