//! Scoped redirections
//!
//! Applying a redirection list opens each target, saves the descriptor
//! currently occupying the slot and `dup2`s the new one into place, left to
//! right. The returned guard restores the saved descriptors in reverse
//! order when dropped, so the fd table is identical on every exit path,
//! including error propagation. Saved copies live at fd 10 or above with
//! close-on-exec set, out of reach of script-visible IO numbers.

use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;

use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg};

use crate::ast::{RedirKind, RedirectionNode};
use crate::interpreter::errors::InterpreterError;
use crate::interpreter::process;

/// Lowest fd used for saved descriptors.
const SAVED_FD_MIN: i32 = 10;

fn open_target(redir: &RedirectionNode) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    match redir.kind {
        RedirKind::In | RedirKind::DupIn => {
            options.read(true);
        }
        RedirKind::Out | RedirKind::DupOut => {
            options.write(true).create(true).truncate(true).mode(0o644);
        }
        RedirKind::AppendOut => {
            options.write(true).create(true).append(true).mode(0o644);
        }
        RedirKind::ReadWrite => {
            options.read(true).write(true).create(true).mode(0o644);
        }
    }
    options.open(&redir.target)
}

/// Restores the saved file descriptors on drop.
pub struct RedirGuard {
    saved: Vec<(i32, Option<OwnedFd>)>,
}

impl RedirGuard {
    /// Apply redirections left to right. On a mid-list failure the entries
    /// applied so far are restored when the partial guard drops.
    pub fn apply(redirections: &[RedirectionNode]) -> Result<RedirGuard, InterpreterError> {
        process::flush_stdio();
        let mut guard = RedirGuard { saved: Vec::new() };
        for redir in redirections {
            let file = open_target(redir)
                .map_err(|e| InterpreterError::system(format!("{}: {e}", redir.target)))?;

            let saved = match fcntl(redir.fd, FcntlArg::F_DUPFD_CLOEXEC(SAVED_FD_MIN)) {
                // SAFETY: F_DUPFD returned a fresh descriptor we own.
                Ok(fd) => Some(unsafe { OwnedFd::from_raw_fd(fd) }),
                Err(Errno::EBADF) => None, // slot was closed; re-close on restore
                Err(errno) => {
                    return Err(InterpreterError::system(format!("dup: {errno}")));
                }
            };
            guard.saved.push((redir.fd, saved));

            if let Err(errno) = process::dup2_retry(file.as_raw_fd(), redir.fd) {
                return Err(InterpreterError::system(format!("dup2: {errno}")));
            }
            // `file` drops here, closing its descriptor
        }
        Ok(guard)
    }
}

impl Drop for RedirGuard {
    fn drop(&mut self) {
        process::flush_stdio();
        while let Some((fd, saved)) = self.saved.pop() {
            match saved {
                Some(old) => {
                    let _ = process::dup2_retry(old.as_raw_fd(), fd);
                    // `old` drops here, closing the saved copy
                }
                None => {
                    let _ = nix::unistd::close(fd);
                }
            }
        }
    }
}
