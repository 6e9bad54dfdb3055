//! echo - write arguments to standard output
//!
//! Options: `-n` suppresses the trailing newline, `-e` enables the `\n`,
//! `\t` and `\\` escapes, `-E` disables them again. Option parsing consumes
//! a leading run of `-[neE]+` arguments; the first argument that is not
//! such a run ends it.

use std::io::Write;

use crate::interpreter::errors::ExecResult;

/// True for an option argument: `-` followed only by `n`, `e`, `E`.
fn is_option_run(arg: &str) -> bool {
    arg.len() >= 2
        && arg.starts_with('-')
        && arg[1..].chars().all(|c| matches!(c, 'n' | 'e' | 'E'))
}

/// Interpret the escapes enabled by `-e`.
fn apply_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

pub fn handle_echo(args: &[String]) -> ExecResult {
    let mut newline = true;
    let mut escapes = false;
    let mut rest = args;
    while let Some((first, tail)) = rest.split_first() {
        if !is_option_run(first) {
            break;
        }
        for c in first[1..].chars() {
            match c {
                'n' => newline = false,
                'e' => escapes = true,
                _ => escapes = false,
            }
        }
        rest = tail;
    }

    let words: Vec<String> = rest
        .iter()
        .map(|w| if escapes { apply_escapes(w) } else { w.clone() })
        .collect();

    // written through the fd so redirections apply, flushed so nothing is
    // left in the buffer once they are undone
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let _ = out.write_all(words.join(" ").as_bytes());
    if newline {
        let _ = out.write_all(b"\n");
    }
    let _ = out.flush();
    Ok(0)
}
