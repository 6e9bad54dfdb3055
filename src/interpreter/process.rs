//! Process plumbing
//!
//! Thin wrappers over `fork`, `execvp`, `waitpid`, `pipe` and `dup2`. Stdio
//! is flushed before every fork so buffered output is never duplicated into
//! a child.

use std::ffi::CString;
use std::io::Write;
use std::os::fd::{FromRawFd, OwnedFd};

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{dup2, execvp, fork, pipe, ForkResult, Pid};

use crate::interpreter::errors::{ExecResult, InterpreterError};

/// Status reported when a command cannot be found.
pub const NOT_FOUND_STATUS: i32 = 127;
/// Status reported when a command exists but cannot be executed.
pub const NOT_EXECUTABLE_STATUS: i32 = 126;

/// Flush the stdio buffers; call before forking and before exiting a child.
pub fn flush_stdio() {
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
}

/// Wait for a child and map its wait status to a shell status.
pub fn wait_for(pid: Pid) -> ExecResult {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(128 + signal as i32),
            Ok(_) => {} // stopped or continued: keep waiting
            Err(Errno::EINTR) => {}
            Err(errno) => return Err(InterpreterError::system(format!("waitpid: {errno}"))),
        }
    }
}

/// `dup2` retrying on EINTR.
pub fn dup2_retry(from: i32, to: i32) -> Result<(), Errno> {
    loop {
        match dup2(from, to) {
            Ok(_) => return Ok(()),
            Err(Errno::EINTR) => {}
            Err(errno) => return Err(errno),
        }
    }
}

pub fn make_pipe() -> Result<(OwnedFd, OwnedFd), InterpreterError> {
    let (read_fd, write_fd) =
        pipe().map_err(|errno| InterpreterError::system(format!("pipe: {errno}")))?;
    // SAFETY: `pipe()` returns two freshly created, unique, open file descriptors.
    Ok(unsafe { (OwnedFd::from_raw_fd(read_fd), OwnedFd::from_raw_fd(write_fd)) })
}

/// Replace the current (child) process image, searching PATH. On failure
/// the child reports on stderr and exits; it never returns into the
/// parent's parse loop.
pub fn exec_external(argv: &[String]) -> ! {
    let c_args: Result<Vec<CString>, _> = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect();
    let status = match c_args {
        Err(_) => {
            eprintln!("oxsh: {}: command name contains NUL", argv[0]);
            NOT_FOUND_STATUS
        }
        Ok(c_args) => match execvp(&c_args[0], &c_args) {
            Err(Errno::ENOENT) => {
                eprintln!("oxsh: {}: command not found", argv[0]);
                NOT_FOUND_STATUS
            }
            Err(Errno::EACCES) => {
                eprintln!("oxsh: {}: cannot execute", argv[0]);
                NOT_EXECUTABLE_STATUS
            }
            Err(errno) => {
                eprintln!("oxsh: {}: {errno}", argv[0]);
                NOT_EXECUTABLE_STATUS
            }
            Ok(never) => match never {},
        },
    };
    flush_stdio();
    std::process::exit(status)
}

/// Run an external command: fork, exec in the child, wait in the parent.
pub fn run_external(argv: &[String]) -> ExecResult {
    flush_stdio();
    // SAFETY: the child only calls async-signal-safe-ish exec paths and
    // always exits; it never returns into the interpreter.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => wait_for(child),
        Ok(ForkResult::Child) => exec_external(argv),
        Err(errno) => Err(InterpreterError::system(format!("fork: {errno}"))),
    }
}
