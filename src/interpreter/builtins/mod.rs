//! Builtin commands
//!
//! Builtins run in the shell process itself, so their effects on the
//! stores, the environment and the working directory persist. They are
//! dispatched by name after function lookup and before PATH search.

pub mod break_cmd;
pub mod cd_cmd;
pub mod continue_cmd;
pub mod echo_cmd;
pub mod exit_cmd;
pub mod export_cmd;
pub mod source_cmd;
pub mod unset_cmd;

use crate::interpreter::errors::ExecResult;
use crate::interpreter::interpreter::Interpreter;

/// Dispatch a builtin by name; `None` when the command is not a builtin.
pub fn dispatch(interp: &mut Interpreter, argv: &[String]) -> Option<ExecResult> {
    let args = &argv[1..];
    match argv[0].as_str() {
        "echo" => Some(echo_cmd::handle_echo(args)),
        "true" => Some(Ok(0)),
        "false" => Some(Ok(1)),
        "exit" => Some(exit_cmd::handle_exit(interp, args)),
        "break" => Some(break_cmd::handle_break(interp, args)),
        "continue" => Some(continue_cmd::handle_continue(interp, args)),
        "." => Some(source_cmd::handle_source(interp, args)),
        "export" => Some(export_cmd::handle_export(args)),
        "cd" => Some(cd_cmd::handle_cd(args)),
        "unset" => Some(unset_cmd::handle_unset(interp, args)),
        _ => None,
    }
}
