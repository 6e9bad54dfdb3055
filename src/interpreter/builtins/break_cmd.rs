//! break - exit enclosing loops

use crate::interpreter::errors::{ExecResult, InterpreterError};
use crate::interpreter::interpreter::Interpreter;

/// Parse the loop count shared by `break` and `continue`: default 1, must
/// be a positive integer.
pub fn parse_loop_count(builtin: &str, args: &[String]) -> Result<u32, i32> {
    match args.first() {
        None => Ok(1),
        Some(arg) => match arg.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => {
                eprintln!("oxsh: {builtin}: {arg}: loop count out of range");
                Err(1)
            }
        },
    }
}

pub fn handle_break(interp: &Interpreter, args: &[String]) -> ExecResult {
    // outside any loop, break silently does nothing
    if interp.loop_depth == 0 {
        return Ok(0);
    }
    match parse_loop_count("break", args) {
        Ok(count) => Err(InterpreterError::Break(count)),
        Err(status) => Ok(status),
    }
}
