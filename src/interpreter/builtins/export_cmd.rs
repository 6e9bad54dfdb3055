//! export - set environment variables
//!
//! With no arguments the environment is printed as `name=value` lines.
//! `name=value` sets the variable; a bare `name` creates it empty when
//! absent.

use std::io::Write;

use crate::interpreter::errors::ExecResult;

lazy_static::lazy_static! {
    static ref IDENTIFIER: regex_lite::Regex =
        regex_lite::Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

/// Validate an environment variable name.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

pub fn handle_export(args: &[String]) -> ExecResult {
    if args.is_empty() {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for (name, value) in std::env::vars() {
            let _ = writeln!(out, "{name}={value}");
        }
        let _ = out.flush();
        return Ok(0);
    }

    let mut status = 0;
    for arg in args {
        match arg.find('=') {
            Some(eq) => {
                let (name, value) = (&arg[..eq], &arg[eq + 1..]);
                if !is_valid_identifier(name) {
                    eprintln!("oxsh: export: `{arg}': not a valid identifier");
                    status = 1;
                    continue;
                }
                std::env::set_var(name, value);
            }
            None => {
                if !is_valid_identifier(arg) {
                    eprintln!("oxsh: export: `{arg}': not a valid identifier");
                    status = 1;
                    continue;
                }
                if std::env::var_os(arg).is_none() {
                    std::env::set_var(arg, "");
                }
            }
        }
    }
    Ok(status)
}
