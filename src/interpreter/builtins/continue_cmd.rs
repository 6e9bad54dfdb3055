//! continue - restart an enclosing loop

use crate::interpreter::builtins::break_cmd::parse_loop_count;
use crate::interpreter::errors::{ExecResult, InterpreterError};
use crate::interpreter::interpreter::Interpreter;

pub fn handle_continue(interp: &Interpreter, args: &[String]) -> ExecResult {
    // outside any loop, continue silently does nothing
    if interp.loop_depth == 0 {
        return Ok(0);
    }
    match parse_loop_count("continue", args) {
        Ok(count) => Err(InterpreterError::Continue(count)),
        Err(status) => Ok(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continue_defaults_to_one() {
        let mut interp = Interpreter::new();
        interp.loop_depth = 1;
        assert_eq!(
            handle_continue(&interp, &[]),
            Err(InterpreterError::Continue(1))
        );
    }

    #[test]
    fn test_continue_with_count() {
        let mut interp = Interpreter::new();
        interp.loop_depth = 2;
        assert_eq!(
            handle_continue(&interp, &["3".to_string()]),
            Err(InterpreterError::Continue(3))
        );
    }

    #[test]
    fn test_continue_outside_loop_is_a_no_op() {
        let interp = Interpreter::new();
        assert_eq!(handle_continue(&interp, &[]), Ok(0));
    }
}
