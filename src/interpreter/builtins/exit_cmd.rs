//! exit - leave the shell

use crate::interpreter::errors::{ExecResult, InterpreterError};
use crate::interpreter::interpreter::Interpreter;

/// `exit [n]`. Without an argument the last status (`?`) is used. The
/// request carries the status modulo 256.
pub fn handle_exit(interp: &mut Interpreter, args: &[String]) -> ExecResult {
    let code: i64 = match args.first() {
        None => i64::from(interp.variables.last_status()),
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("oxsh: exit: {arg}: numeric argument required");
                return Err(InterpreterError::Exit(2));
            }
        },
    };
    Err(InterpreterError::Exit(code.rem_euclid(256) as i32))
}
