//! Variable expansion
//!
//! Expands the segment list of an expandable word into its final string.
//! `Normal` segments are appended verbatim; `DoubleQuote` segments undergo
//! `$` substitution: `$NAME`, `${NAME}`, the specials `?`, `$`, `#`, `*`,
//! `@`, and `RANDOM`. Lookup order is the process environment first, then
//! the variable store, then the empty string.
//!
//! Expansion always returns a fresh string; nothing is cached in the tree.

use std::iter::Peekable;
use std::str::Chars;

use rand::Rng;

use crate::ast::Word;
use crate::lexer::token::{Segment, SegmentKind};
use crate::store::VariableStore;

/// Expand a word to the string handed to commands.
pub fn expand_word(word: &Word, vars: &VariableStore) -> String {
    match word {
        Word::Literal(text) => text.clone(),
        Word::Expandable(segments) => expand_segments(segments, vars),
    }
}

/// Expand a segment list by concatenating each expanded segment.
pub fn expand_segments(segments: &[Segment], vars: &VariableStore) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment.kind {
            SegmentKind::Normal => out.push_str(&segment.text),
            SegmentKind::DoubleQuote => substitute(&segment.text, vars, &mut out),
        }
    }
    out
}

fn substitute(text: &str, vars: &VariableStore, out: &mut String) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('$') => out.push('$'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '$' => match scan_name(&mut chars) {
                Some(name) => out.push_str(&lookup(&name, vars)),
                None => out.push('$'),
            },
            _ => out.push(c),
        }
    }
}

/// Parse a parameter name after `$`: `{NAME}`, one special, or a name run.
fn scan_name(chars: &mut Peekable<Chars>) -> Option<String> {
    match chars.peek() {
        Some('{') => {
            chars.next();
            let mut name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    return Some(name);
                }
                name.push(c);
            }
            // missing `}` is caught by the lexer; stay lenient here
            Some(name)
        }
        Some(&c) if matches!(c, '?' | '$' | '#' | '*' | '@') => {
            chars.next();
            Some(c.to_string())
        }
        Some(&c) if c.is_ascii_alphanumeric() || c == '_' => {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            Some(name)
        }
        _ => None,
    }
}

fn lookup(name: &str, vars: &VariableStore) -> String {
    match name {
        "RANDOM" => {
            let n: i32 = rand::thread_rng().gen_range(0..=32767);
            n.to_string()
        }
        // no positional parameters in this shell
        "*" | "@" => String::new(),
        _ => std::env::var(name)
            .ok()
            .or_else(|| vars.get(name).map(str::to_string))
            .unwrap_or_default(),
    }
}
