//! Shell driver
//!
//! Owns the interpreter state and runs the parse-execute loop over one
//! input source: parse a top-level input, optionally pretty-print it,
//! execute it, record `?`, repeat until end of input or an exit request.

use crate::interpreter::{Interpreter, InterpreterError};
use crate::io::InputSource;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Exit code reported for lexical and syntax errors.
pub const SYNTAX_ERROR_STATUS: i32 = 2;

#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    /// Print each parsed tree before executing it.
    pub pretty_print: bool,
}

pub struct Shell {
    pub options: ShellOptions,
    pub interpreter: Interpreter,
}

impl Shell {
    pub fn new(options: ShellOptions) -> Self {
        Self {
            options,
            interpreter: Interpreter::new(),
        }
    }

    /// Parse and execute every input from the source. The return value is
    /// the shell's exit code: the last status, an explicit exit request, or
    /// 2 on a syntax error.
    pub fn run(&mut self, source: InputSource) -> i32 {
        let mut parser = Parser::new(Lexer::new(source));
        let mut exit_code = 0;
        while !parser.at_end() {
            match parser.parse_input() {
                Ok(None) => {}
                Ok(Some(node)) => {
                    if self.options.pretty_print {
                        print!("{}", node.tree_string());
                    }
                    match self.interpreter.execute(&node) {
                        Ok(status) => exit_code = status,
                        Err(InterpreterError::Exit(code)) => {
                            self.interpreter.variables.set_status(code);
                            return code;
                        }
                        // loop controls that escaped every loop: resume
                        // straight-line execution
                        Err(InterpreterError::Break(_))
                        | Err(InterpreterError::Continue(_)) => exit_code = 0,
                        Err(e) => {
                            eprintln!("oxsh: {e}");
                            exit_code = 1;
                        }
                    }
                    self.interpreter.variables.set_status(exit_code);
                }
                Err(e) => {
                    eprintln!("oxsh: {e}");
                    return SYNTAX_ERROR_STATUS;
                }
            }
        }
        exit_code
    }

    /// Run an in-memory script (`-c` and tests).
    pub fn run_string(&mut self, script: &str) -> i32 {
        self.run(InputSource::from_string(script))
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(ShellOptions::default())
    }
}
