//! Seekable character source for the lexer
//!
//! The lexer needs four things from its input: read a byte, look at the next
//! byte without consuming it, push one byte back, and checkpoint/rewind the
//! stream (a single save slot). Every source is therefore materialized as
//! something seekable: files are read in place, strings become in-memory
//! cursors, and stdin is drained up front (spilling to a temp file past a
//! size threshold so huge piped scripts don't live in memory).

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Stdin larger than this is spilled to an unnamed temp file.
const STDIN_SPILL_THRESHOLD: usize = 1 << 20;

trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// A seekable byte stream with one-byte pushback and a single-slot checkpoint.
pub struct InputSource {
    inner: Box<dyn ReadSeek>,
    saved: u64,
    /// Set once `get` hits end of input; `unread` is a no-op afterwards.
    at_end: bool,
}

impl InputSource {
    fn new(inner: Box<dyn ReadSeek>) -> Self {
        Self {
            inner,
            saved: 0,
            at_end: false,
        }
    }

    /// Open a script file.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Wrap an in-memory script (the `-c` form, sourced lines, tests).
    pub fn from_string(input: &str) -> Self {
        Self::new(Box::new(Cursor::new(input.as_bytes().to_vec())))
    }

    /// Drain standard input into a seekable buffer.
    pub fn from_stdin() -> std::io::Result<Self> {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;

        if buffer.len() > STDIN_SPILL_THRESHOLD {
            let mut file = tempfile::tempfile()?;
            file.write_all(&buffer)?;
            file.seek(SeekFrom::Start(0))?;
            Ok(Self::new(Box::new(file)))
        } else {
            Ok(Self::new(Box::new(Cursor::new(buffer))))
        }
    }

    /// Next byte, or `None` at end of input. Read errors end the stream.
    pub fn get(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte) {
            Ok(1) => {
                self.at_end = false;
                Some(byte[0])
            }
            _ => {
                self.at_end = true;
                None
            }
        }
    }

    /// Next byte without advancing.
    pub fn peek(&mut self) -> Option<u8> {
        let c = self.get();
        if c.is_some() {
            self.unread();
        }
        c
    }

    /// Push back the byte returned by the last successful `get`.
    pub fn unread(&mut self) {
        if !self.at_end {
            let _ = self.inner.seek(SeekFrom::Current(-1));
        }
    }

    /// Record the current offset in the single checkpoint slot.
    pub fn save(&mut self) {
        if let Ok(pos) = self.inner.stream_position() {
            self.saved = pos;
        }
    }

    /// Rewind to the last saved offset.
    pub fn restore(&mut self) {
        if self.inner.seek(SeekFrom::Start(self.saved)).is_ok() {
            self.at_end = false;
        }
    }
}
