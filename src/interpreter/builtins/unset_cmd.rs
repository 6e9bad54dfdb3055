//! unset - remove shell variables or functions

use crate::interpreter::errors::ExecResult;
use crate::interpreter::interpreter::Interpreter;

/// `unset [-v|-f] name...`; `-v` (variables) is the default.
pub fn handle_unset(interp: &mut Interpreter, args: &[String]) -> ExecResult {
    let mut functions = false;
    let mut names = args;
    if let Some((first, rest)) = args.split_first() {
        match first.as_str() {
            "-f" => {
                functions = true;
                names = rest;
            }
            "-v" => names = rest,
            opt if opt.starts_with('-') => {
                eprintln!("oxsh: unset: {opt}: invalid option");
                return Ok(2);
            }
            _ => {}
        }
    }
    for name in names {
        if functions {
            interp.functions.unset(name);
        } else {
            interp.variables.unset(name);
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_variable() {
        let mut interp = Interpreter::new();
        interp.variables.set("x", "1");
        assert_eq!(handle_unset(&mut interp, &["x".to_string()]), Ok(0));
        assert_eq!(interp.variables.get("x"), None);
    }

    #[test]
    fn test_unset_dash_v() {
        let mut interp = Interpreter::new();
        interp.variables.set("x", "1");
        let args = vec!["-v".to_string(), "x".to_string()];
        assert_eq!(handle_unset(&mut interp, &args), Ok(0));
        assert_eq!(interp.variables.get("x"), None);
    }

    #[test]
    fn test_unset_function() {
        use crate::ast::{CommandNode, Node};
        use std::rc::Rc;

        let mut interp = Interpreter::new();
        interp.functions.define(
            "f",
            Rc::new(Node::Command(CommandNode {
                name: "true".to_string(),
                args: vec![],
            })),
        );
        let args = vec!["-f".to_string(), "f".to_string()];
        assert_eq!(handle_unset(&mut interp, &args), Ok(0));
        assert!(interp.functions.get("f").is_none());
    }

    #[test]
    fn test_unset_unknown_option() {
        let mut interp = Interpreter::new();
        assert_eq!(handle_unset(&mut interp, &["-x".to_string()]), Ok(2));
    }
}
