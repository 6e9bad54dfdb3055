//! Control flow and failure signals of the executor
//!
//! Execution returns `Result<i32, InterpreterError>`: `Ok` carries a
//! shell-visible status in 0..=255, and the error type carries everything
//! that is not a plain status. `break`, `continue` and `exit` are modeled as
//! errors so they unwind the execution stack through `?` until a loop (or
//! the top level) consumes them.

/// Non-status outcome propagating through the execution stack.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpreterError {
    /// Exit `n` enclosing loops; each loop level consumes one count.
    #[error("break")]
    Break(u32),

    /// Restart the `n`-th enclosing loop.
    #[error("continue")]
    Continue(u32),

    /// Leave the shell with the given status.
    #[error("exit")]
    Exit(i32),

    /// pipe/fork/wait/dup/open failure; the message names the operation.
    #[error("{0}")]
    System(String),
}

impl InterpreterError {
    pub fn system(message: impl Into<String>) -> Self {
        Self::System(message.into())
    }
}

/// Result of executing a tree node.
pub type ExecResult = Result<i32, InterpreterError>;
